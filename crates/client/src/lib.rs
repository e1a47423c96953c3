//! Client SDK for the Bidnox sealed-bid auction platform.
//!
//! This crate provides a high-level API for:
//! - Generating and persisting bid secrets for the commit-reveal scheme
//! - Placing sealed bids and revealing them after the auction ends
//! - Creating, finalizing and querying auctions
//!
//! The contract itself runs elsewhere; everything here talks to it through
//! the [`contract::AuctionContract`] seam.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod bid;
pub mod cache;
pub mod contract;
pub mod error;
pub mod format;
pub mod query;
pub mod secret;
pub mod store;
pub mod validate;

pub use bid::{place_bid, reveal_bid, reveal_stored_bid, PlacedBid};
pub use contract::{AuctionContract, RpcAuctionContract};
pub use error::ClientError;
pub use secret::generate_bid_secret;
pub use store::SecretStore;

/// Current wall-clock time as unix seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
