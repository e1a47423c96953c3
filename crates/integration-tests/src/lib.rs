//! End-to-end tests for the sealed-bid auction flow.
//!
//! These drive the real client orchestration (secret generation, local
//! persistence, commit, reveal) against the mock chain's contract handlers
//! called in-process, so the whole lifecycle runs without a server:
//! 1. Auction creation
//! 2. Sealed bid placement with locally stored secrets
//! 3. Reveal and commitment verification
//! 4. Finalization / cancellation

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use jsonrpsee::core::async_trait;
use num_bigint::BigUint;
use parking_lot::RwLock;

use bidnox_client::{
    place_bid, reveal_bid, reveal_stored_bid, AuctionContract, ClientError, SecretStore,
};
use bidnox_mock_chain::{handlers, CallContext, ChainState, ContractError};
use bidnox_types::rpc::{CreatedAuction, TxReceipt};
use bidnox_types::{Address, AuctionStatus, AuctionView, BidView, Felt};

/// [`AuctionContract`] over an in-process [`ChainState`].
///
/// Mirrors what the RPC server does per call: take the lock, build a
/// context from the chain clock, dispatch to a handler.
struct LocalContract {
    state: Arc<RwLock<ChainState>>,
}

impl LocalContract {
    fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ChainState::new())),
        }
    }

    fn set_time(&self, timestamp: u64) {
        self.state.write().set_timestamp(timestamp);
    }

    fn receipt(state: &mut ChainState) -> TxReceipt {
        TxReceipt {
            tx_hash: state.next_tx_hash(),
            block_height: state.block_height,
        }
    }
}

fn contract_err(e: ContractError) -> ClientError {
    ClientError::ContractCallFailed(e.to_string())
}

#[async_trait]
impl AuctionContract for LocalContract {
    async fn get_auction(&self, auction_id: u64) -> Result<Option<AuctionView>, ClientError> {
        Ok(self.state.read().auctions.get(&auction_id).map(|a| a.view()))
    }

    async fn get_bid(
        &self,
        auction_id: u64,
        bidder: &Address,
    ) -> Result<Option<BidView>, ClientError> {
        Ok(self
            .state
            .read()
            .bids
            .get(&(auction_id, *bidder))
            .map(|b| b.view()))
    }

    async fn get_auction_count(&self) -> Result<u64, ClientError> {
        Ok(self.state.read().auction_count())
    }

    async fn is_auction_active(&self, auction_id: u64) -> Result<bool, ClientError> {
        let state = self.state.read();
        let auction = state
            .auctions
            .get(&auction_id)
            .ok_or_else(|| contract_err(ContractError::AuctionNotFound(auction_id)))?;
        Ok(handlers::is_auction_active(auction, state.timestamp))
    }

    async fn is_auction_ended(&self, auction_id: u64) -> Result<bool, ClientError> {
        let state = self.state.read();
        let auction = state
            .auctions
            .get(&auction_id)
            .ok_or_else(|| contract_err(ContractError::AuctionNotFound(auction_id)))?;
        Ok(handlers::is_auction_ended(auction, state.timestamp))
    }

    async fn compute_bid_hash(
        &self,
        amount: &BigUint,
        secret: &Felt,
    ) -> Result<Felt, ClientError> {
        Ok(handlers::compute_bid_hash(amount, secret))
    }

    async fn create_auction(
        &self,
        sender: &Address,
        asset_id: &BigUint,
        starting_price: &BigUint,
        duration_seconds: u64,
    ) -> Result<CreatedAuction, ClientError> {
        let mut state = self.state.write();
        let ctx = CallContext {
            sender: *sender,
            block_height: state.block_height,
            timestamp: state.timestamp,
        };
        let auction_id = handlers::handle_create_auction(
            &mut state,
            &ctx,
            asset_id.clone(),
            starting_price.clone(),
            duration_seconds,
        )
        .map_err(contract_err)?;
        let tx_hash = state.next_tx_hash();
        Ok(CreatedAuction {
            auction_id,
            tx_hash,
        })
    }

    async fn place_bid(
        &self,
        sender: &Address,
        auction_id: u64,
        commitment: &Felt,
    ) -> Result<TxReceipt, ClientError> {
        let mut state = self.state.write();
        let ctx = CallContext {
            sender: *sender,
            block_height: state.block_height,
            timestamp: state.timestamp,
        };
        handlers::handle_place_bid(&mut state, &ctx, auction_id, commitment.clone())
            .map_err(contract_err)?;
        Ok(Self::receipt(&mut state))
    }

    async fn reveal_bid(
        &self,
        sender: &Address,
        auction_id: u64,
        amount: &BigUint,
        secret: &Felt,
    ) -> Result<TxReceipt, ClientError> {
        let mut state = self.state.write();
        let ctx = CallContext {
            sender: *sender,
            block_height: state.block_height,
            timestamp: state.timestamp,
        };
        handlers::handle_reveal_bid(&mut state, &ctx, auction_id, amount.clone(), secret.clone())
            .map_err(contract_err)?;
        Ok(Self::receipt(&mut state))
    }

    async fn finalize_auction(
        &self,
        sender: &Address,
        auction_id: u64,
    ) -> Result<TxReceipt, ClientError> {
        let mut state = self.state.write();
        let ctx = CallContext {
            sender: *sender,
            block_height: state.block_height,
            timestamp: state.timestamp,
        };
        handlers::handle_finalize_auction(&mut state, &ctx, auction_id).map_err(contract_err)?;
        Ok(Self::receipt(&mut state))
    }

    async fn cancel_auction(
        &self,
        sender: &Address,
        auction_id: u64,
    ) -> Result<TxReceipt, ClientError> {
        let mut state = self.state.write();
        let ctx = CallContext {
            sender: *sender,
            block_height: state.block_height,
            timestamp: state.timestamp,
        };
        handlers::handle_cancel_auction(&mut state, &ctx, auction_id).map_err(contract_err)?;
        Ok(Self::receipt(&mut state))
    }

    async fn class_hash_at(&self, address: &Address) -> Result<Option<Felt>, ClientError> {
        Ok(self.state.read().classes.get(address).cloned())
    }
}

static STORE_COUNTER: AtomicU32 = AtomicU32::new(0);

fn temp_store() -> (SecretStore, PathBuf) {
    let dir = std::env::temp_dir().join(format!(
        "bidnox-e2e-{}-{}",
        std::process::id(),
        STORE_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    (SecretStore::open(&dir).unwrap(), dir)
}

fn addr(byte: u8) -> Address {
    let mut bytes = [0u8; 32];
    bytes[31] = byte;
    Address(bytes)
}

fn strk(n: u32) -> BigUint {
    BigUint::from(n) * BigUint::from(10u64).pow(18)
}

#[tokio::test]
async fn full_sealed_bid_auction_flow() {
    let contract = LocalContract::new();
    let (store, dir) = temp_store();

    let seller = addr(1);
    let alice = addr(2);
    let bob = addr(3);

    contract.set_time(1_000);
    let created = contract
        .create_auction(&seller, &BigUint::from(7u8), &strk(10), 3_600)
        .await
        .unwrap();
    let id = created.auction_id;
    assert_eq!(id, 1);
    assert!(contract.is_auction_active(id).await.unwrap());

    // Both bidders commit; secrets stay on this machine.
    place_bid(&contract, &store, id, &alice, &strk(15)).await.unwrap();
    place_bid(&contract, &store, id, &bob, &strk(20)).await.unwrap();
    assert!(store.has(id, &alice));
    assert!(store.has(id, &bob));

    let bid = contract.get_bid(id, &alice).await.unwrap().unwrap();
    assert!(!bid.revealed);
    assert_eq!(bid.amount, None);

    // Past the end of the bidding window.
    contract.set_time(1_000 + 3_600);
    assert!(contract.is_auction_ended(id).await.unwrap());

    reveal_stored_bid(&contract, &store, id, &alice).await.unwrap();
    reveal_stored_bid(&contract, &store, id, &bob).await.unwrap();

    // Reveal cleared the local records.
    assert!(!store.has(id, &alice));
    assert!(!store.has(id, &bob));

    let auction = contract.get_auction(id).await.unwrap().unwrap();
    assert_eq!(auction.highest_bid, strk(20));
    assert_eq!(auction.highest_bidder, Some(bob));

    contract.finalize_auction(&seller, id).await.unwrap();
    let auction = contract.get_auction(id).await.unwrap().unwrap();
    assert_eq!(auction.status(1_000 + 3_600), AuctionStatus::Finalized);

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn failed_reveal_keeps_secret_for_retry() {
    let contract = LocalContract::new();
    let (store, dir) = temp_store();

    let alice = addr(2);
    contract.set_time(0);
    let id = contract
        .create_auction(&addr(1), &BigUint::from(1u8), &strk(10), 100)
        .await
        .unwrap()
        .auction_id;

    place_bid(&contract, &store, id, &alice, &strk(12)).await.unwrap();
    contract.set_time(100);

    // Wrong amount: the contract rejects the reveal, the secret survives.
    let stored = store.retrieve(id, &alice).unwrap();
    let err = reveal_bid(
        &contract,
        &store,
        id,
        &alice,
        &strk(13),
        &stored.secret.to_hex(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ClientError::ContractCallFailed(_)));
    assert!(store.has(id, &alice));

    // Retry with the stored record succeeds and clears it.
    reveal_stored_bid(&contract, &store, id, &alice).await.unwrap();
    assert!(!store.has(id, &alice));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn failed_placement_leaves_stored_secret() {
    let contract = LocalContract::new();
    let (store, dir) = temp_store();

    let alice = addr(2);
    contract.set_time(0);
    let id = contract
        .create_auction(&addr(1), &BigUint::from(1u8), &strk(10), 100)
        .await
        .unwrap()
        .auction_id;

    // Bidding window already over; the submission fails after the secret
    // was persisted.
    contract.set_time(100);
    let err = place_bid(&contract, &store, id, &alice, &strk(12))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ContractCallFailed(_)));
    assert!(store.has(id, &alice));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn rebid_replaces_commitment_and_secret() {
    let contract = LocalContract::new();
    let (store, dir) = temp_store();

    let alice = addr(2);
    contract.set_time(0);
    let id = contract
        .create_auction(&addr(1), &BigUint::from(1u8), &strk(10), 100)
        .await
        .unwrap()
        .auction_id;

    let first = place_bid(&contract, &store, id, &alice, &strk(12)).await.unwrap();
    let second = place_bid(&contract, &store, id, &alice, &strk(15)).await.unwrap();
    assert_ne!(first.commitment, second.commitment);

    // The chain and the store both hold the second bid now.
    let on_chain = contract.get_bid(id, &alice).await.unwrap().unwrap();
    assert_eq!(on_chain.commitment, second.commitment);
    assert_eq!(store.retrieve(id, &alice).unwrap().amount, strk(15));

    contract.set_time(100);
    reveal_stored_bid(&contract, &store, id, &alice).await.unwrap();

    let auction = contract.get_auction(id).await.unwrap().unwrap();
    assert_eq!(auction.highest_bid, strk(15));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn reveal_without_local_secret_fails() {
    let contract = LocalContract::new();
    let (store, dir) = temp_store();

    contract.set_time(0);
    let id = contract
        .create_auction(&addr(1), &BigUint::from(1u8), &strk(10), 100)
        .await
        .unwrap()
        .auction_id;

    let err = reveal_stored_bid(&contract, &store, id, &addr(2))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::SecretNotFound { auction_id } if auction_id == id));

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn cancelled_auction_rejects_bids() {
    let contract = LocalContract::new();
    let (store, dir) = temp_store();

    let seller = addr(1);
    contract.set_time(0);
    let id = contract
        .create_auction(&seller, &BigUint::from(1u8), &strk(10), 100)
        .await
        .unwrap()
        .auction_id;

    // Only the seller may cancel.
    assert!(contract.cancel_auction(&addr(9), id).await.is_err());
    contract.cancel_auction(&seller, id).await.unwrap();

    let err = place_bid(&contract, &store, id, &addr(2), &strk(12))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ContractCallFailed(_)));

    let auction = contract.get_auction(id).await.unwrap().unwrap();
    assert_eq!(auction.status(50), AuctionStatus::Cancelled);
    assert!(!contract.is_auction_active(id).await.unwrap());

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn class_hash_lookup_for_platform() {
    let contract = LocalContract::new();

    let deployed = contract
        .class_hash_at(&bidnox_mock_chain::platform_address())
        .await
        .unwrap();
    assert_eq!(deployed, Some(bidnox_mock_chain::platform_class_hash()));

    assert_eq!(contract.class_hash_at(&addr(99)).await.unwrap(), None);
}
