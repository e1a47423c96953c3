//! JSON wire types for the auction RPC surface.
//!
//! These are string-valued versions of the data-model entities. Wide
//! integers travel as `{low, high}` hex pairs; the typed decode into
//! [`AuctionView`]/[`BidView`] happens here and nowhere else.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::u256::{felt_pair_to_integer, integer_to_felt_pair};
use crate::{Address, AddressError, AuctionView, BidView, Felt, FeltError};

/// Errors from decoding a wire value into the data model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("invalid field element: {0}")]
    Felt(#[from] FeltError),

    #[error("invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("invalid hex integer: {0:?}")]
    InvalidHex(String),
}

fn parse_hex_uint(s: &str) -> Result<BigUint, WireError> {
    let digits = s.trim().strip_prefix("0x").unwrap_or(s.trim());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(WireError::InvalidHex(s.to_string()));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| WireError::InvalidHex(s.to_string()))
}

/// A u256 split into 128-bit halves, each hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct U256Rpc {
    pub low: String,
    pub high: String,
}

impl U256Rpc {
    pub fn from_biguint(value: &BigUint) -> Self {
        let (low, high) = integer_to_felt_pair(value);
        Self {
            low: format!("0x{low:x}"),
            high: format!("0x{high:x}"),
        }
    }

    pub fn to_biguint(&self) -> Result<BigUint, WireError> {
        let low = parse_hex_uint(&self.low)?;
        let high = parse_hex_uint(&self.high)?;
        Ok(felt_pair_to_integer(&low, &high))
    }
}

/// Current simulated block info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockInfo {
    pub height: u64,
    pub timestamp: u64,
}

/// Receipt returned by write entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_height: u64,
}

/// Result of creating an auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedAuction {
    pub auction_id: u64,
    pub tx_hash: String,
}

/// Parameters for `auction_createAuction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuctionParams {
    pub sender: String,
    pub asset_id: U256Rpc,
    pub starting_price: U256Rpc,
    pub duration_seconds: u64,
}

/// Parameters for `auction_placeBid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceBidParams {
    pub sender: String,
    pub auction_id: u64,
    /// Hex-encoded bid commitment.
    pub commitment: String,
}

/// Parameters for `auction_revealBid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealBidParams {
    pub sender: String,
    pub auction_id: u64,
    pub amount: U256Rpc,
    /// Hex-encoded secret.
    pub secret: String,
}

/// Parameters for `auction_computeBidHash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeBidHashParams {
    pub amount: U256Rpc,
    /// Hex-encoded secret.
    pub secret: String,
}

/// Auction projection for RPC responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionViewRpc {
    pub auction_id: u64,
    pub seller: String,
    pub asset_id: U256Rpc,
    pub starting_price: U256Rpc,
    pub start_time: u64,
    pub duration: u64,
    pub end_time: u64,
    pub highest_bid: U256Rpc,
    pub highest_bidder: Option<String>,
    pub finalized: bool,
    pub cancelled: bool,
}

impl From<&AuctionView> for AuctionViewRpc {
    fn from(a: &AuctionView) -> Self {
        Self {
            auction_id: a.auction_id,
            seller: a.seller.to_string(),
            asset_id: U256Rpc::from_biguint(&a.asset_id),
            starting_price: U256Rpc::from_biguint(&a.starting_price),
            start_time: a.start_time,
            duration: a.duration,
            end_time: a.end_time,
            highest_bid: U256Rpc::from_biguint(&a.highest_bid),
            highest_bidder: a.highest_bidder.as_ref().map(Address::to_string),
            finalized: a.finalized,
            cancelled: a.cancelled,
        }
    }
}

impl TryFrom<&AuctionViewRpc> for AuctionView {
    type Error = WireError;

    fn try_from(a: &AuctionViewRpc) -> Result<Self, Self::Error> {
        Ok(Self {
            auction_id: a.auction_id,
            seller: Address::from_hex(&a.seller)?,
            asset_id: a.asset_id.to_biguint()?,
            starting_price: a.starting_price.to_biguint()?,
            start_time: a.start_time,
            duration: a.duration,
            end_time: a.end_time,
            highest_bid: a.highest_bid.to_biguint()?,
            highest_bidder: a
                .highest_bidder
                .as_deref()
                .map(Address::from_hex)
                .transpose()?,
            finalized: a.finalized,
            cancelled: a.cancelled,
        })
    }
}

/// Sealed bid projection for RPC responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidViewRpc {
    pub bidder: String,
    pub commitment: String,
    pub amount: Option<U256Rpc>,
    pub revealed: bool,
    pub timestamp: u64,
}

impl From<&BidView> for BidViewRpc {
    fn from(b: &BidView) -> Self {
        Self {
            bidder: b.bidder.to_string(),
            commitment: b.commitment.to_hex(),
            amount: b.amount.as_ref().map(U256Rpc::from_biguint),
            revealed: b.revealed,
            timestamp: b.timestamp,
        }
    }
}

impl TryFrom<&BidViewRpc> for BidView {
    type Error = WireError;

    fn try_from(b: &BidViewRpc) -> Result<Self, Self::Error> {
        Ok(Self {
            bidder: Address::from_hex(&b.bidder)?,
            commitment: Felt::from_hex(&b.commitment)?,
            amount: b.amount.as_ref().map(U256Rpc::to_biguint).transpose()?,
            revealed: b.revealed,
            timestamp: b.timestamp,
        })
    }
}
