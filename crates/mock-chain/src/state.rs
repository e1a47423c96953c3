//! In-memory chain state for the mock auction node.

use std::collections::HashMap;

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use bidnox_types::{Address, AuctionView, BidView, Felt};

/// Address the auction platform contract is "deployed" at.
///
/// Derived from a fixed tag so every node instance agrees on it.
pub fn platform_address() -> Address {
    let digest = Sha256::digest(b"BIDNOX_AUCTION_PLATFORM_ADDRESS_V1");
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    // Clear the top bits so the address reads as an in-range felt.
    bytes[0] &= 0x07;
    Address(bytes)
}

/// Class hash reported for the platform contract.
pub fn platform_class_hash() -> Felt {
    Felt::from_bytes_be(&Sha256::digest(b"BIDNOX_AUCTION_PLATFORM_CLASS_V1"))
}

/// Stored state of a single auction.
#[derive(Debug, Clone)]
pub struct AuctionRecord {
    pub auction_id: u64,
    pub seller: Address,
    pub asset_id: BigUint,
    pub starting_price: BigUint,
    pub start_time: u64,
    pub duration: u64,
    pub end_time: u64,
    pub highest_bid: BigUint,
    pub highest_bidder: Option<Address>,
    pub finalized: bool,
    pub cancelled: bool,
}

impl AuctionRecord {
    pub fn view(&self) -> AuctionView {
        AuctionView {
            auction_id: self.auction_id,
            seller: self.seller,
            asset_id: self.asset_id.clone(),
            starting_price: self.starting_price.clone(),
            start_time: self.start_time,
            duration: self.duration,
            end_time: self.end_time,
            highest_bid: self.highest_bid.clone(),
            highest_bidder: self.highest_bidder,
            finalized: self.finalized,
            cancelled: self.cancelled,
        }
    }
}

/// A sealed bid as held by the contract.
#[derive(Debug, Clone)]
pub struct SealedBid {
    pub bidder: Address,
    pub commitment: Felt,
    /// Filled in at reveal.
    pub amount: Option<BigUint>,
    pub revealed: bool,
    pub timestamp: u64,
}

impl SealedBid {
    pub fn view(&self) -> BidView {
        BidView {
            bidder: self.bidder,
            commitment: self.commitment.clone(),
            amount: self.amount.clone(),
            revealed: self.revealed,
            timestamp: self.timestamp,
        }
    }
}

/// Full simulated chain state.
///
/// Wrapped in a `parking_lot::RwLock` by the server; nothing in here
/// synchronizes on its own.
pub struct ChainState {
    pub auctions: HashMap<u64, AuctionRecord>,
    pub bids: HashMap<(u64, Address), SealedBid>,
    /// Deployed class hashes by contract address.
    pub classes: HashMap<Address, Felt>,
    pub block_height: u64,
    pub timestamp: u64,
    next_auction_id: u64,
    tx_counter: u64,
}

impl ChainState {
    pub fn new() -> Self {
        let mut classes = HashMap::new();
        classes.insert(platform_address(), platform_class_hash());
        Self {
            auctions: HashMap::new(),
            bids: HashMap::new(),
            classes,
            block_height: 0,
            timestamp: 0,
            next_auction_id: 1,
            tx_counter: 0,
        }
    }

    /// Allocate the next sequential auction id, starting at 1.
    pub fn allocate_auction_id(&mut self) -> u64 {
        let id = self.next_auction_id;
        self.next_auction_id += 1;
        id
    }

    /// Total auctions ever created. Ids run `1..=count` with no gaps.
    pub fn auction_count(&self) -> u64 {
        self.next_auction_id - 1
    }

    pub fn advance_block(&mut self) {
        self.block_height += 1;
        self.timestamp += 12; // ~12 second blocks
    }

    pub fn set_timestamp(&mut self, ts: u64) {
        self.timestamp = ts;
    }

    /// Deterministic per-submission transaction hash.
    pub fn next_tx_hash(&mut self) -> String {
        self.tx_counter += 1;
        let mut hasher = Sha256::new();
        hasher.update(b"BIDNOX_TX");
        hasher.update(self.block_height.to_be_bytes());
        hasher.update(self.tx_counter.to_be_bytes());
        Felt::from_bytes_be(&hasher.finalize()).to_hex()
    }
}

impl Default for ChainState {
    fn default() -> Self {
        Self::new()
    }
}
