//! JSON-RPC server exposing the mock auction chain.
//!
//! Decodes wire parameters, forwards to the contract handlers, and maps
//! contract errors to JSON-RPC errors. State is a single `ChainState`
//! behind an `RwLock`; every write entry point takes the lock for the
//! whole call so bid ordering is serialized.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use jsonrpsee::core::async_trait;
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::server::Server;
use jsonrpsee::types::ErrorObjectOwned;
use parking_lot::RwLock;
use tracing::info;

use bidnox_mock_chain::{handlers, CallContext, ChainState};
use bidnox_types::rpc::{
    AuctionViewRpc, BidViewRpc, BlockInfo, ComputeBidHashParams, CreateAuctionParams,
    CreatedAuction, PlaceBidParams, RevealBidParams, TxReceipt,
};
use bidnox_types::{Address, Felt};

/// RPC surface of the auction node.
#[rpc(server)]
pub trait BidnoxChainApi {
    // ============ Auction Entry Points ============

    #[method(name = "auction_createAuction")]
    async fn auction_create_auction(
        &self,
        params: CreateAuctionParams,
    ) -> Result<CreatedAuction, ErrorObjectOwned>;

    #[method(name = "auction_placeBid")]
    async fn auction_place_bid(&self, params: PlaceBidParams)
        -> Result<TxReceipt, ErrorObjectOwned>;

    #[method(name = "auction_revealBid")]
    async fn auction_reveal_bid(
        &self,
        params: RevealBidParams,
    ) -> Result<TxReceipt, ErrorObjectOwned>;

    #[method(name = "auction_finalizeAuction")]
    async fn auction_finalize_auction(
        &self,
        sender: String,
        auction_id: u64,
    ) -> Result<TxReceipt, ErrorObjectOwned>;

    #[method(name = "auction_cancelAuction")]
    async fn auction_cancel_auction(
        &self,
        sender: String,
        auction_id: u64,
    ) -> Result<TxReceipt, ErrorObjectOwned>;

    /// Commitment over an amount/secret pair, as the contract computes it.
    #[method(name = "auction_computeBidHash")]
    async fn auction_compute_bid_hash(
        &self,
        params: ComputeBidHashParams,
    ) -> Result<String, ErrorObjectOwned>;

    // ============ Query Methods ============

    #[method(name = "query_getAuction")]
    async fn query_get_auction(
        &self,
        auction_id: u64,
    ) -> Result<Option<AuctionViewRpc>, ErrorObjectOwned>;

    #[method(name = "query_getBid")]
    async fn query_get_bid(
        &self,
        auction_id: u64,
        bidder: String,
    ) -> Result<Option<BidViewRpc>, ErrorObjectOwned>;

    #[method(name = "query_getAuctionCount")]
    async fn query_get_auction_count(&self) -> Result<u64, ErrorObjectOwned>;

    #[method(name = "query_isAuctionActive")]
    async fn query_is_auction_active(&self, auction_id: u64) -> Result<bool, ErrorObjectOwned>;

    #[method(name = "query_isAuctionEnded")]
    async fn query_is_auction_ended(&self, auction_id: u64) -> Result<bool, ErrorObjectOwned>;

    #[method(name = "query_listAuctions")]
    async fn query_list_auctions(&self) -> Result<Vec<AuctionViewRpc>, ErrorObjectOwned>;

    // ============ Chain Methods ============

    #[method(name = "chain_getBlockInfo")]
    async fn chain_get_block_info(&self) -> Result<BlockInfo, ErrorObjectOwned>;

    #[method(name = "chain_getClassHashAt")]
    async fn chain_get_class_hash_at(
        &self,
        address: String,
    ) -> Result<Option<String>, ErrorObjectOwned>;

    // ============ Admin Methods ============

    /// Advance the chain by one block.
    #[method(name = "admin_advanceBlock")]
    async fn admin_advance_block(&self) -> Result<BlockInfo, ErrorObjectOwned>;

    /// Set the current timestamp (for testing time-dependent logic).
    #[method(name = "admin_setTimestamp")]
    async fn admin_set_timestamp(&self, timestamp: u64) -> Result<bool, ErrorObjectOwned>;
}

struct BidnoxChainServer {
    state: Arc<RwLock<ChainState>>,
}

impl BidnoxChainServer {
    fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ChainState::new())),
        }
    }

    fn rpc_error(msg: impl std::fmt::Display) -> ErrorObjectOwned {
        ErrorObjectOwned::owned(-32000, msg.to_string(), None::<()>)
    }

    fn parse_address(s: &str) -> Result<Address, ErrorObjectOwned> {
        Address::from_hex(s).map_err(|e| Self::rpc_error(format!("invalid address {s:?}: {e}")))
    }

    fn parse_secret(s: &str) -> Result<Felt, ErrorObjectOwned> {
        Felt::from_hex(s).map_err(|e| Self::rpc_error(format!("invalid secret: {e}")))
    }

    fn context(state: &ChainState, sender: Address) -> CallContext {
        CallContext {
            sender,
            block_height: state.block_height,
            timestamp: state.timestamp,
        }
    }

    fn receipt(state: &mut ChainState) -> TxReceipt {
        TxReceipt {
            tx_hash: state.next_tx_hash(),
            block_height: state.block_height,
        }
    }
}

#[async_trait]
impl BidnoxChainApiServer for BidnoxChainServer {
    async fn auction_create_auction(
        &self,
        params: CreateAuctionParams,
    ) -> Result<CreatedAuction, ErrorObjectOwned> {
        let sender = Self::parse_address(&params.sender)?;
        let asset_id = params.asset_id.to_biguint().map_err(Self::rpc_error)?;
        let starting_price = params.starting_price.to_biguint().map_err(Self::rpc_error)?;

        let mut state = self.state.write();
        let ctx = Self::context(&state, sender);
        let auction_id = handlers::handle_create_auction(
            &mut state,
            &ctx,
            asset_id,
            starting_price,
            params.duration_seconds,
        )
        .map_err(Self::rpc_error)?;
        let tx_hash = state.next_tx_hash();

        info!(auction_id, seller = %sender, "auction created");
        Ok(CreatedAuction {
            auction_id,
            tx_hash,
        })
    }

    async fn auction_place_bid(
        &self,
        params: PlaceBidParams,
    ) -> Result<TxReceipt, ErrorObjectOwned> {
        let sender = Self::parse_address(&params.sender)?;
        let commitment = Felt::from_hex(&params.commitment)
            .map_err(|e| Self::rpc_error(format!("invalid commitment: {e}")))?;

        let mut state = self.state.write();
        let ctx = Self::context(&state, sender);
        handlers::handle_place_bid(&mut state, &ctx, params.auction_id, commitment)
            .map_err(Self::rpc_error)?;

        info!(auction_id = params.auction_id, bidder = %sender, "sealed bid placed");
        Ok(Self::receipt(&mut state))
    }

    async fn auction_reveal_bid(
        &self,
        params: RevealBidParams,
    ) -> Result<TxReceipt, ErrorObjectOwned> {
        let sender = Self::parse_address(&params.sender)?;
        let amount = params.amount.to_biguint().map_err(Self::rpc_error)?;
        let secret = Self::parse_secret(&params.secret)?;

        let mut state = self.state.write();
        let ctx = Self::context(&state, sender);
        handlers::handle_reveal_bid(&mut state, &ctx, params.auction_id, amount, secret)
            .map_err(Self::rpc_error)?;

        info!(auction_id = params.auction_id, bidder = %sender, "bid revealed");
        Ok(Self::receipt(&mut state))
    }

    async fn auction_finalize_auction(
        &self,
        sender: String,
        auction_id: u64,
    ) -> Result<TxReceipt, ErrorObjectOwned> {
        let sender = Self::parse_address(&sender)?;

        let mut state = self.state.write();
        let ctx = Self::context(&state, sender);
        handlers::handle_finalize_auction(&mut state, &ctx, auction_id)
            .map_err(Self::rpc_error)?;

        info!(auction_id, "auction finalized");
        Ok(Self::receipt(&mut state))
    }

    async fn auction_cancel_auction(
        &self,
        sender: String,
        auction_id: u64,
    ) -> Result<TxReceipt, ErrorObjectOwned> {
        let sender = Self::parse_address(&sender)?;

        let mut state = self.state.write();
        let ctx = Self::context(&state, sender);
        handlers::handle_cancel_auction(&mut state, &ctx, auction_id).map_err(Self::rpc_error)?;

        info!(auction_id, "auction cancelled");
        Ok(Self::receipt(&mut state))
    }

    async fn auction_compute_bid_hash(
        &self,
        params: ComputeBidHashParams,
    ) -> Result<String, ErrorObjectOwned> {
        let amount = params.amount.to_biguint().map_err(Self::rpc_error)?;
        let secret = Self::parse_secret(&params.secret)?;
        Ok(handlers::compute_bid_hash(&amount, &secret).to_hex())
    }

    async fn query_get_auction(
        &self,
        auction_id: u64,
    ) -> Result<Option<AuctionViewRpc>, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(state
            .auctions
            .get(&auction_id)
            .map(|a| AuctionViewRpc::from(&a.view())))
    }

    async fn query_get_bid(
        &self,
        auction_id: u64,
        bidder: String,
    ) -> Result<Option<BidViewRpc>, ErrorObjectOwned> {
        let bidder = Self::parse_address(&bidder)?;
        let state = self.state.read();
        Ok(state
            .bids
            .get(&(auction_id, bidder))
            .map(|b| BidViewRpc::from(&b.view())))
    }

    async fn query_get_auction_count(&self) -> Result<u64, ErrorObjectOwned> {
        Ok(self.state.read().auction_count())
    }

    async fn query_is_auction_active(&self, auction_id: u64) -> Result<bool, ErrorObjectOwned> {
        let state = self.state.read();
        let auction = state
            .auctions
            .get(&auction_id)
            .ok_or_else(|| Self::rpc_error(format!("auction {auction_id} not found")))?;
        Ok(handlers::is_auction_active(auction, state.timestamp))
    }

    async fn query_is_auction_ended(&self, auction_id: u64) -> Result<bool, ErrorObjectOwned> {
        let state = self.state.read();
        let auction = state
            .auctions
            .get(&auction_id)
            .ok_or_else(|| Self::rpc_error(format!("auction {auction_id} not found")))?;
        Ok(handlers::is_auction_ended(auction, state.timestamp))
    }

    async fn query_list_auctions(&self) -> Result<Vec<AuctionViewRpc>, ErrorObjectOwned> {
        let state = self.state.read();
        let mut auctions: Vec<_> = state.auctions.values().collect();
        auctions.sort_by_key(|a| a.auction_id);
        Ok(auctions
            .into_iter()
            .map(|a| AuctionViewRpc::from(&a.view()))
            .collect())
    }

    async fn chain_get_block_info(&self) -> Result<BlockInfo, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(BlockInfo {
            height: state.block_height,
            timestamp: state.timestamp,
        })
    }

    async fn chain_get_class_hash_at(
        &self,
        address: String,
    ) -> Result<Option<String>, ErrorObjectOwned> {
        let address = Self::parse_address(&address)?;
        let state = self.state.read();
        Ok(state.classes.get(&address).map(Felt::to_hex))
    }

    async fn admin_advance_block(&self) -> Result<BlockInfo, ErrorObjectOwned> {
        let mut state = self.state.write();
        state.advance_block();
        Ok(BlockInfo {
            height: state.block_height,
            timestamp: state.timestamp,
        })
    }

    async fn admin_set_timestamp(&self, timestamp: u64) -> Result<bool, ErrorObjectOwned> {
        let mut state = self.state.write();
        state.set_timestamp(timestamp);
        info!("Timestamp set to {}", timestamp);
        Ok(true)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bidnox_mock_chain=info".parse().unwrap())
                .add_directive("jsonrpsee=warn".parse().unwrap()),
        )
        .init();

    let addr: SocketAddr = "127.0.0.1:9944".parse()?;

    info!("Starting auction node on {}", addr);

    let server = Server::builder().build(addr).await?;
    let handle = server.start(BidnoxChainServer::new().into_rpc());

    info!("Auction node running. Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    handle.stop()?;
    handle.stopped().await;

    Ok(())
}
