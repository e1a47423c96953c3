//! The contract seam: read/write entry points of the auction platform.

use std::sync::Arc;

use jsonrpsee::core::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use num_bigint::BigUint;
use tracing::debug;

use bidnox_types::rpc::{
    AuctionViewRpc, BidViewRpc, ComputeBidHashParams, CreateAuctionParams, CreatedAuction,
    PlaceBidParams, RevealBidParams, TxReceipt, U256Rpc,
};
use bidnox_types::{Address, AuctionView, BidView, Felt};

use crate::cache::ClassHashCache;
use crate::error::ClientError;

/// Read/write interface to the deployed auction contract.
///
/// The commitment hash in `compute_bid_hash` is owned by the contract and
/// treated as an opaque external call by everything in this crate.
#[async_trait]
pub trait AuctionContract: Send + Sync {
    async fn get_auction(&self, auction_id: u64) -> Result<Option<AuctionView>, ClientError>;

    async fn get_bid(
        &self,
        auction_id: u64,
        bidder: &Address,
    ) -> Result<Option<BidView>, ClientError>;

    async fn get_auction_count(&self) -> Result<u64, ClientError>;

    async fn is_auction_active(&self, auction_id: u64) -> Result<bool, ClientError>;

    async fn is_auction_ended(&self, auction_id: u64) -> Result<bool, ClientError>;

    async fn compute_bid_hash(
        &self,
        amount: &BigUint,
        secret: &Felt,
    ) -> Result<Felt, ClientError>;

    async fn create_auction(
        &self,
        sender: &Address,
        asset_id: &BigUint,
        starting_price: &BigUint,
        duration_seconds: u64,
    ) -> Result<CreatedAuction, ClientError>;

    async fn place_bid(
        &self,
        sender: &Address,
        auction_id: u64,
        commitment: &Felt,
    ) -> Result<TxReceipt, ClientError>;

    async fn reveal_bid(
        &self,
        sender: &Address,
        auction_id: u64,
        amount: &BigUint,
        secret: &Felt,
    ) -> Result<TxReceipt, ClientError>;

    async fn finalize_auction(
        &self,
        sender: &Address,
        auction_id: u64,
    ) -> Result<TxReceipt, ClientError>;

    async fn cancel_auction(
        &self,
        sender: &Address,
        auction_id: u64,
    ) -> Result<TxReceipt, ClientError>;

    /// Class hash of a deployed contract, `None` when nothing is deployed
    /// at the address.
    async fn class_hash_at(&self, address: &Address) -> Result<Option<Felt>, ClientError>;
}

/// JSON-RPC implementation of [`AuctionContract`].
pub struct RpcAuctionContract {
    client: HttpClient,
    class_hashes: Arc<ClassHashCache>,
}

impl RpcAuctionContract {
    /// Connect to an auction node at `url`.
    ///
    /// The cache is constructed by the caller at application start and
    /// shared by reference; this type never creates implicit singletons.
    pub fn connect(url: &str, class_hashes: Arc<ClassHashCache>) -> Result<Self, ClientError> {
        let client = HttpClientBuilder::default()
            .build(url)
            .map_err(|e| ClientError::ContractCallFailed(e.to_string()))?;
        Ok(Self {
            client,
            class_hashes,
        })
    }
}

#[async_trait]
impl AuctionContract for RpcAuctionContract {
    async fn get_auction(&self, auction_id: u64) -> Result<Option<AuctionView>, ClientError> {
        let wire: Option<AuctionViewRpc> = self
            .client
            .request("query_getAuction", rpc_params![auction_id])
            .await?;
        Ok(wire.as_ref().map(AuctionView::try_from).transpose()?)
    }

    async fn get_bid(
        &self,
        auction_id: u64,
        bidder: &Address,
    ) -> Result<Option<BidView>, ClientError> {
        let wire: Option<BidViewRpc> = self
            .client
            .request("query_getBid", rpc_params![auction_id, bidder.to_string()])
            .await?;
        Ok(wire.as_ref().map(BidView::try_from).transpose()?)
    }

    async fn get_auction_count(&self) -> Result<u64, ClientError> {
        Ok(self
            .client
            .request("query_getAuctionCount", rpc_params![])
            .await?)
    }

    async fn is_auction_active(&self, auction_id: u64) -> Result<bool, ClientError> {
        Ok(self
            .client
            .request("query_isAuctionActive", rpc_params![auction_id])
            .await?)
    }

    async fn is_auction_ended(&self, auction_id: u64) -> Result<bool, ClientError> {
        Ok(self
            .client
            .request("query_isAuctionEnded", rpc_params![auction_id])
            .await?)
    }

    async fn compute_bid_hash(
        &self,
        amount: &BigUint,
        secret: &Felt,
    ) -> Result<Felt, ClientError> {
        let params = ComputeBidHashParams {
            amount: U256Rpc::from_biguint(amount),
            secret: secret.to_hex(),
        };
        let hash: String = self
            .client
            .request("auction_computeBidHash", rpc_params![params])
            .await?;
        Felt::from_hex(&hash)
            .map_err(|e| ClientError::ContractCallFailed(format!("malformed bid hash: {e}")))
    }

    async fn create_auction(
        &self,
        sender: &Address,
        asset_id: &BigUint,
        starting_price: &BigUint,
        duration_seconds: u64,
    ) -> Result<CreatedAuction, ClientError> {
        let params = CreateAuctionParams {
            sender: sender.to_string(),
            asset_id: U256Rpc::from_biguint(asset_id),
            starting_price: U256Rpc::from_biguint(starting_price),
            duration_seconds,
        };
        Ok(self
            .client
            .request("auction_createAuction", rpc_params![params])
            .await?)
    }

    async fn place_bid(
        &self,
        sender: &Address,
        auction_id: u64,
        commitment: &Felt,
    ) -> Result<TxReceipt, ClientError> {
        let params = PlaceBidParams {
            sender: sender.to_string(),
            auction_id,
            commitment: commitment.to_hex(),
        };
        Ok(self
            .client
            .request("auction_placeBid", rpc_params![params])
            .await?)
    }

    async fn reveal_bid(
        &self,
        sender: &Address,
        auction_id: u64,
        amount: &BigUint,
        secret: &Felt,
    ) -> Result<TxReceipt, ClientError> {
        let params = RevealBidParams {
            sender: sender.to_string(),
            auction_id,
            amount: U256Rpc::from_biguint(amount),
            secret: secret.to_hex(),
        };
        Ok(self
            .client
            .request("auction_revealBid", rpc_params![params])
            .await?)
    }

    async fn finalize_auction(
        &self,
        sender: &Address,
        auction_id: u64,
    ) -> Result<TxReceipt, ClientError> {
        Ok(self
            .client
            .request(
                "auction_finalizeAuction",
                rpc_params![sender.to_string(), auction_id],
            )
            .await?)
    }

    async fn cancel_auction(
        &self,
        sender: &Address,
        auction_id: u64,
    ) -> Result<TxReceipt, ClientError> {
        Ok(self
            .client
            .request(
                "auction_cancelAuction",
                rpc_params![sender.to_string(), auction_id],
            )
            .await?)
    }

    async fn class_hash_at(&self, address: &Address) -> Result<Option<Felt>, ClientError> {
        let key = address.to_string();
        if let Some(hash) = self.class_hashes.get(&key) {
            debug!(address = %key, "class hash served from cache");
            return Ok(Some(hash));
        }

        let wire: Option<String> = self
            .client
            .request("chain_getClassHashAt", rpc_params![key.clone()])
            .await?;

        match wire {
            Some(hash) => {
                let hash = Felt::from_hex(&hash).map_err(|e| {
                    ClientError::ContractCallFailed(format!("malformed class hash: {e}"))
                })?;
                self.class_hashes.insert(key, hash.clone());
                Ok(Some(hash))
            }
            None => Ok(None),
        }
    }
}
