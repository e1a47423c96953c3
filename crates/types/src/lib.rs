//! Core type definitions for the Bidnox sealed-bid auction client.
//!
//! This crate provides the shared data structures used across the client and
//! the mock chain node: field elements over the Stark prime, addresses,
//! auction projections, status derivation, and the JSON wire types.

use num_bigint::BigUint;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod felt;
pub mod rpc;
pub mod status;
pub mod u256;

pub use felt::{Felt, FeltError};
pub use status::{auction_status, AuctionStatus};
pub use u256::{felt_pair_to_integer, integer_to_felt_pair};

/// Fixed-width account/contract identifier (32 bytes, big-endian).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 32]);

/// Errors from parsing an [`Address`] out of a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid hex in address")]
    InvalidHex,

    #[error("address longer than 32 bytes")]
    TooLong,
}

impl Address {
    /// Parse an address from a hex string with an optional `0x` prefix.
    ///
    /// Shorter inputs are zero-extended on the left, matching the numeric
    /// interpretation used on the wire.
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(AddressError::InvalidHex);
        }
        if digits.len() > 64 {
            return Err(AddressError::TooLong);
        }

        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        let bytes = hex::decode(&padded).map_err(|_| AddressError::InvalidHex)?;

        let mut addr = [0u8; 32];
        addr[32 - bytes.len()..].copy_from_slice(&bytes);
        Ok(Self(addr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Read-only projection of an auction's on-chain state.
///
/// Never mutated locally; refreshed by re-querying the contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionView {
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

impl AuctionView {
    /// Derive the auction status at the given wall-clock time.
    pub fn status(&self, now: u64) -> AuctionStatus {
        auction_status(
            Some(self.end_time),
            Some(self.finalized),
            Some(self.cancelled),
            now,
        )
    }
}

/// A bidder's sealed bid as stored by the contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BidView {
    pub bidder: Address,
    pub commitment: Felt,
    /// Set once the bid has been revealed.
    pub amount: Option<BigUint>,
    pub revealed: bool,
    pub timestamp: u64,
}
