//! Bid placement and reveal orchestration.
//!
//! Placement runs commit-side: generate a secret, ask the contract for the
//! commitment over (amount, secret), persist the secret locally, then
//! submit. The persist happens BEFORE the transaction so a secret is never
//! lost to a failed submission; a retry reuses or freely overwrites it,
//! since no on-chain commitment was accepted.
//!
//! Reveal runs the other side: normalize the secret, submit
//! (auction, amount, secret) for verification, and clear the local record
//! only after the contract confirms. Local state is never purged before
//! on-chain confirmation.

use num_bigint::BigUint;
use tracing::{info, warn};

use bidnox_types::rpc::TxReceipt;
use bidnox_types::{Address, Felt};

use crate::contract::AuctionContract;
use crate::error::ClientError;
use crate::secret::generate_bid_secret;
use crate::store::SecretStore;

/// Outcome of a successful bid placement.
#[derive(Debug, Clone)]
pub struct PlacedBid {
    pub commitment: Felt,
    pub receipt: TxReceipt,
}

/// Place a sealed bid on `auction_id` for `amount` (smallest unit).
pub async fn place_bid<C: AuctionContract + ?Sized>(
    contract: &C,
    store: &SecretStore,
    auction_id: u64,
    bidder: &Address,
    amount: &BigUint,
) -> Result<PlacedBid, ClientError> {
    let secret = generate_bid_secret();

    let commitment = contract.compute_bid_hash(amount, &secret).await?;

    // Persisted before submission; see module docs.
    store.store(auction_id, bidder, &secret, amount)?;

    let receipt = contract.place_bid(bidder, auction_id, &commitment).await?;

    info!(
        auction_id,
        bidder = %bidder,
        tx_hash = %receipt.tx_hash,
        "sealed bid placed"
    );

    Ok(PlacedBid {
        commitment,
        receipt,
    })
}

/// Reveal a bid with an explicitly supplied secret.
///
/// The secret is re-normalized first; reveal never reaches the network
/// with a malformed secret. On contract rejection the stored record is
/// left untouched so the user can retry.
pub async fn reveal_bid<C: AuctionContract + ?Sized>(
    contract: &C,
    store: &SecretStore,
    auction_id: u64,
    bidder: &Address,
    amount: &BigUint,
    secret: &str,
) -> Result<TxReceipt, ClientError> {
    let secret = Felt::from_hex(secret)?;

    let receipt = contract
        .reveal_bid(bidder, auction_id, amount, &secret)
        .await?;

    store.clear(auction_id, bidder);

    info!(
        auction_id,
        bidder = %bidder,
        tx_hash = %receipt.tx_hash,
        "bid revealed"
    );

    Ok(receipt)
}

/// Reveal using the locally stored secret and amount for this auction.
pub async fn reveal_stored_bid<C: AuctionContract + ?Sized>(
    contract: &C,
    store: &SecretStore,
    auction_id: u64,
    bidder: &Address,
) -> Result<TxReceipt, ClientError> {
    let stored = store.retrieve(auction_id, bidder).ok_or_else(|| {
        warn!(auction_id, bidder = %bidder, "no usable bid secret on this machine");
        ClientError::SecretNotFound { auction_id }
    })?;

    let receipt = contract
        .reveal_bid(bidder, auction_id, &stored.amount, &stored.secret)
        .await?;

    store.clear(auction_id, bidder);

    info!(
        auction_id,
        bidder = %bidder,
        tx_hash = %receipt.tx_hash,
        "bid revealed from stored secret"
    );

    Ok(receipt)
}
