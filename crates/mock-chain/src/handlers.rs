//! Contract entry point handlers.
//!
//! Each handler takes the chain state, a call context, and the decoded
//! arguments, enforces the auction rules, and mutates state on success.
//! The RPC server is a thin shell over these functions so tests can call
//! them in-process.

use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

use bidnox_types::Felt;

use crate::error::ContractError;
use crate::state::{AuctionRecord, ChainState, SealedBid};

use bidnox_types::Address;

/// Context for a contract call.
#[derive(Debug, Clone, Copy)]
pub struct CallContext {
    pub sender: Address,
    pub block_height: u64,
    pub timestamp: u64,
}

/// Commitment over `(amount, secret)`.
///
/// Domain-tagged SHA-256, length-prefixing the variable-width amount so
/// distinct `(amount, secret)` pairs never serialize identically. The
/// digest is reduced into the field.
pub fn compute_bid_hash(amount: &BigUint, secret: &Felt) -> Felt {
    let amount_bytes = amount.to_bytes_be();
    let mut hasher = Sha256::new();
    hasher.update(b"BIDNOX_COMMITMENT_V1:");
    hasher.update((amount_bytes.len() as u64).to_be_bytes());
    hasher.update(&amount_bytes);
    hasher.update(secret.to_bytes_be32());
    Felt::from_bytes_be(&hasher.finalize())
}

pub fn handle_create_auction(
    state: &mut ChainState,
    ctx: &CallContext,
    asset_id: BigUint,
    starting_price: BigUint,
    duration_seconds: u64,
) -> Result<u64, ContractError> {
    if duration_seconds == 0 {
        return Err(ContractError::InvalidDuration);
    }
    if starting_price.is_zero() {
        return Err(ContractError::ZeroStartingPrice);
    }

    let auction_id = state.allocate_auction_id();
    let end_time = ctx.timestamp + duration_seconds;
    state.auctions.insert(
        auction_id,
        AuctionRecord {
            auction_id,
            seller: ctx.sender,
            asset_id,
            starting_price,
            start_time: ctx.timestamp,
            duration: duration_seconds,
            end_time,
            highest_bid: BigUint::zero(),
            highest_bidder: None,
            finalized: false,
            cancelled: false,
        },
    );
    Ok(auction_id)
}

pub fn handle_place_bid(
    state: &mut ChainState,
    ctx: &CallContext,
    auction_id: u64,
    commitment: Felt,
) -> Result<(), ContractError> {
    let auction = state
        .auctions
        .get(&auction_id)
        .ok_or(ContractError::AuctionNotFound(auction_id))?;
    if auction.cancelled {
        return Err(ContractError::AuctionCancelled);
    }
    if auction.finalized {
        return Err(ContractError::AlreadyFinalized);
    }
    if ctx.timestamp >= auction.end_time {
        return Err(ContractError::BiddingEnded);
    }

    // Re-bidding replaces the sealed commitment, but a revealed bid is
    // locked in.
    if let Some(existing) = state.bids.get(&(auction_id, ctx.sender)) {
        if existing.revealed {
            return Err(ContractError::AlreadyRevealed);
        }
    }

    state.bids.insert(
        (auction_id, ctx.sender),
        SealedBid {
            bidder: ctx.sender,
            commitment,
            amount: None,
            revealed: false,
            timestamp: ctx.timestamp,
        },
    );
    Ok(())
}

pub fn handle_reveal_bid(
    state: &mut ChainState,
    ctx: &CallContext,
    auction_id: u64,
    amount: BigUint,
    secret: Felt,
) -> Result<(), ContractError> {
    let (starting_price, end_time, cancelled, finalized) = {
        let auction = state
            .auctions
            .get(&auction_id)
            .ok_or(ContractError::AuctionNotFound(auction_id))?;
        (
            auction.starting_price.clone(),
            auction.end_time,
            auction.cancelled,
            auction.finalized,
        )
    };
    if cancelled {
        return Err(ContractError::AuctionCancelled);
    }
    // Finalization freezes the outcome; late reveals are locked out.
    if finalized {
        return Err(ContractError::AlreadyFinalized);
    }
    if ctx.timestamp < end_time {
        return Err(ContractError::BiddingNotEnded);
    }

    let bid = state
        .bids
        .get_mut(&(auction_id, ctx.sender))
        .ok_or(ContractError::BidNotFound)?;
    if bid.revealed {
        return Err(ContractError::AlreadyRevealed);
    }
    if compute_bid_hash(&amount, &secret) != bid.commitment {
        return Err(ContractError::CommitmentMismatch);
    }
    if amount < starting_price {
        return Err(ContractError::BidBelowStartingPrice);
    }

    bid.revealed = true;
    bid.amount = Some(amount.clone());

    if let Some(auction) = state.auctions.get_mut(&auction_id) {
        if amount > auction.highest_bid {
            auction.highest_bid = amount;
            auction.highest_bidder = Some(ctx.sender);
        }
    }
    Ok(())
}

pub fn handle_finalize_auction(
    state: &mut ChainState,
    ctx: &CallContext,
    auction_id: u64,
) -> Result<(), ContractError> {
    let auction = state
        .auctions
        .get_mut(&auction_id)
        .ok_or(ContractError::AuctionNotFound(auction_id))?;
    if auction.cancelled {
        return Err(ContractError::AuctionCancelled);
    }
    if auction.finalized {
        return Err(ContractError::AlreadyFinalized);
    }
    if ctx.timestamp < auction.end_time {
        return Err(ContractError::BiddingNotEnded);
    }

    auction.finalized = true;
    Ok(())
}

pub fn handle_cancel_auction(
    state: &mut ChainState,
    ctx: &CallContext,
    auction_id: u64,
) -> Result<(), ContractError> {
    let auction = state
        .auctions
        .get_mut(&auction_id)
        .ok_or(ContractError::AuctionNotFound(auction_id))?;
    if auction.seller != ctx.sender {
        return Err(ContractError::NotSeller);
    }
    if auction.finalized {
        return Err(ContractError::AlreadyFinalized);
    }
    if auction.cancelled {
        return Err(ContractError::AlreadyCancelled);
    }

    auction.cancelled = true;
    Ok(())
}

/// Bidding is open: not cancelled, not finalized, clock before end time.
pub fn is_auction_active(auction: &AuctionRecord, now: u64) -> bool {
    !auction.cancelled && !auction.finalized && now < auction.end_time
}

/// Bidding closed by the clock. Cancelled auctions never "end".
pub fn is_auction_ended(auction: &AuctionRecord, now: u64) -> bool {
    !auction.cancelled && now >= auction.end_time
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        Address(bytes)
    }

    fn ctx(sender: Address, timestamp: u64) -> CallContext {
        CallContext {
            sender,
            block_height: 1,
            timestamp,
        }
    }

    fn create(state: &mut ChainState, seller: Address, now: u64) -> u64 {
        handle_create_auction(
            state,
            &ctx(seller, now),
            BigUint::from(1u8),
            BigUint::from(100u32),
            3600,
        )
        .unwrap()
    }

    #[test]
    fn create_auction_validates_inputs() {
        let mut state = ChainState::new();
        let seller = addr(1);

        assert_eq!(
            handle_create_auction(
                &mut state,
                &ctx(seller, 0),
                BigUint::from(1u8),
                BigUint::from(100u32),
                0,
            ),
            Err(ContractError::InvalidDuration)
        );
        assert_eq!(
            handle_create_auction(
                &mut state,
                &ctx(seller, 0),
                BigUint::from(1u8),
                BigUint::zero(),
                60,
            ),
            Err(ContractError::ZeroStartingPrice)
        );

        let id = create(&mut state, seller, 1000);
        assert_eq!(id, 1);
        let auction = &state.auctions[&id];
        assert_eq!(auction.end_time, 1000 + 3600);
        assert_eq!(auction.seller, seller);
    }

    #[test]
    fn full_commit_reveal_flow() {
        let mut state = ChainState::new();
        let seller = addr(1);
        let bidder = addr(2);
        let id = create(&mut state, seller, 0);

        let amount = BigUint::from(150u32);
        let secret = Felt::from(0xdeadbeefu64);
        let commitment = compute_bid_hash(&amount, &secret);

        handle_place_bid(&mut state, &ctx(bidder, 10), id, commitment).unwrap();

        // Too early to reveal.
        assert_eq!(
            handle_reveal_bid(&mut state, &ctx(bidder, 10), id, amount.clone(), secret.clone()),
            Err(ContractError::BiddingNotEnded)
        );

        handle_reveal_bid(&mut state, &ctx(bidder, 3600), id, amount.clone(), secret).unwrap();

        let auction = &state.auctions[&id];
        assert_eq!(auction.highest_bid, amount);
        assert_eq!(auction.highest_bidder, Some(bidder));
        let bid = &state.bids[&(id, bidder)];
        assert!(bid.revealed);
        assert_eq!(bid.amount, Some(amount));
    }

    #[test]
    fn reveal_rejects_wrong_secret() {
        let mut state = ChainState::new();
        let bidder = addr(2);
        let id = create(&mut state, addr(1), 0);

        let amount = BigUint::from(150u32);
        let secret = Felt::from(7u64);
        let commitment = compute_bid_hash(&amount, &secret);
        handle_place_bid(&mut state, &ctx(bidder, 10), id, commitment).unwrap();

        assert_eq!(
            handle_reveal_bid(&mut state, &ctx(bidder, 3600), id, amount, Felt::from(8u64)),
            Err(ContractError::CommitmentMismatch)
        );
        assert!(!state.bids[&(id, bidder)].revealed);
    }

    #[test]
    fn reveal_rejects_wrong_amount() {
        let mut state = ChainState::new();
        let bidder = addr(2);
        let id = create(&mut state, addr(1), 0);

        let secret = Felt::from(7u64);
        let commitment = compute_bid_hash(&BigUint::from(150u32), &secret);
        handle_place_bid(&mut state, &ctx(bidder, 10), id, commitment).unwrap();

        // The commitment binds the amount too.
        assert_eq!(
            handle_reveal_bid(
                &mut state,
                &ctx(bidder, 3600),
                id,
                BigUint::from(151u32),
                secret,
            ),
            Err(ContractError::CommitmentMismatch)
        );
    }

    #[test]
    fn reveal_rejects_below_starting_price() {
        let mut state = ChainState::new();
        let bidder = addr(2);
        let id = create(&mut state, addr(1), 0);

        let amount = BigUint::from(99u32);
        let secret = Felt::from(7u64);
        let commitment = compute_bid_hash(&amount, &secret);
        handle_place_bid(&mut state, &ctx(bidder, 10), id, commitment).unwrap();

        assert_eq!(
            handle_reveal_bid(&mut state, &ctx(bidder, 3600), id, amount, secret),
            Err(ContractError::BidBelowStartingPrice)
        );
    }

    #[test]
    fn rebid_overwrites_until_revealed() {
        let mut state = ChainState::new();
        let bidder = addr(2);
        let id = create(&mut state, addr(1), 0);

        let first = compute_bid_hash(&BigUint::from(150u32), &Felt::from(1u64));
        let second_amount = BigUint::from(200u32);
        let second_secret = Felt::from(2u64);
        let second = compute_bid_hash(&second_amount, &second_secret);

        handle_place_bid(&mut state, &ctx(bidder, 10), id, first).unwrap();
        handle_place_bid(&mut state, &ctx(bidder, 20), id, second.clone()).unwrap();
        assert_eq!(state.bids[&(id, bidder)].commitment, second);

        handle_reveal_bid(
            &mut state,
            &ctx(bidder, 3600),
            id,
            second_amount,
            second_secret,
        )
        .unwrap();

        // Revealed bids are locked: no new commitment, no second reveal.
        assert_eq!(
            handle_place_bid(&mut state, &ctx(bidder, 3600), id, Felt::from(3u64)),
            Err(ContractError::BiddingEnded)
        );
        assert_eq!(
            handle_reveal_bid(
                &mut state,
                &ctx(bidder, 3600),
                id,
                BigUint::from(200u32),
                Felt::from(2u64),
            ),
            Err(ContractError::AlreadyRevealed)
        );
    }

    #[test]
    fn place_bid_window_checks() {
        let mut state = ChainState::new();
        let bidder = addr(2);
        let id = create(&mut state, addr(1), 0);

        assert_eq!(
            handle_place_bid(&mut state, &ctx(bidder, 99), 42, Felt::from(1u64)),
            Err(ContractError::AuctionNotFound(42))
        );
        // Boundary: bidding closes exactly at end_time.
        assert_eq!(
            handle_place_bid(&mut state, &ctx(bidder, 3600), id, Felt::from(1u64)),
            Err(ContractError::BiddingEnded)
        );
    }

    #[test]
    fn highest_bid_tracks_strict_maximum() {
        let mut state = ChainState::new();
        let id = create(&mut state, addr(1), 0);

        let a = (addr(2), BigUint::from(200u32), Felt::from(1u64));
        let b = (addr(3), BigUint::from(200u32), Felt::from(2u64));
        for (bidder, amount, secret) in [&a, &b] {
            let commitment = compute_bid_hash(amount, secret);
            handle_place_bid(&mut state, &ctx(*bidder, 10), id, commitment).unwrap();
        }
        handle_reveal_bid(&mut state, &ctx(a.0, 3600), id, a.1.clone(), a.2.clone()).unwrap();
        handle_reveal_bid(&mut state, &ctx(b.0, 3600), id, b.1.clone(), b.2.clone()).unwrap();

        // Ties keep the earlier revealer.
        assert_eq!(state.auctions[&id].highest_bidder, Some(a.0));
    }

    #[test]
    fn finalize_rules() {
        let mut state = ChainState::new();
        let seller = addr(1);
        let id = create(&mut state, seller, 0);

        assert_eq!(
            handle_finalize_auction(&mut state, &ctx(seller, 100), id),
            Err(ContractError::BiddingNotEnded)
        );
        handle_finalize_auction(&mut state, &ctx(seller, 3600), id).unwrap();
        assert_eq!(
            handle_finalize_auction(&mut state, &ctx(seller, 3600), id),
            Err(ContractError::AlreadyFinalized)
        );
    }

    #[test]
    fn finalize_freezes_the_outcome() {
        let mut state = ChainState::new();
        let seller = addr(1);
        let id = create(&mut state, seller, 0);

        let a = (addr(2), BigUint::from(150u32), Felt::from(1u64));
        let b = (addr(3), BigUint::from(500u32), Felt::from(2u64));
        for (bidder, amount, secret) in [&a, &b] {
            let commitment = compute_bid_hash(amount, secret);
            handle_place_bid(&mut state, &ctx(*bidder, 10), id, commitment).unwrap();
        }

        handle_reveal_bid(&mut state, &ctx(a.0, 3600), id, a.1.clone(), a.2.clone()).unwrap();
        handle_finalize_auction(&mut state, &ctx(seller, 3600), id).unwrap();
        assert_eq!(state.auctions[&id].highest_bidder, Some(a.0));

        // A higher bid revealed after settlement must not change the winner.
        assert_eq!(
            handle_reveal_bid(&mut state, &ctx(b.0, 3700), id, b.1.clone(), b.2.clone()),
            Err(ContractError::AlreadyFinalized)
        );
        assert_eq!(state.auctions[&id].highest_bid, a.1);
        assert_eq!(state.auctions[&id].highest_bidder, Some(a.0));
        assert!(!state.bids[&(id, b.0)].revealed);
    }

    #[test]
    fn cancel_rules() {
        let mut state = ChainState::new();
        let seller = addr(1);
        let id = create(&mut state, seller, 0);

        assert_eq!(
            handle_cancel_auction(&mut state, &ctx(addr(9), 100), id),
            Err(ContractError::NotSeller)
        );
        handle_cancel_auction(&mut state, &ctx(seller, 100), id).unwrap();
        assert_eq!(
            handle_cancel_auction(&mut state, &ctx(seller, 100), id),
            Err(ContractError::AlreadyCancelled)
        );
        assert_eq!(
            handle_place_bid(&mut state, &ctx(addr(2), 100), id, Felt::from(1u64)),
            Err(ContractError::AuctionCancelled)
        );
    }

    #[test]
    fn activity_predicates() {
        let mut state = ChainState::new();
        let id = create(&mut state, addr(1), 0);
        let auction = state.auctions[&id].clone();

        assert!(is_auction_active(&auction, 100));
        assert!(!is_auction_active(&auction, 3600));
        assert!(!is_auction_ended(&auction, 3599));
        assert!(is_auction_ended(&auction, 3600));

        let mut cancelled = auction;
        cancelled.cancelled = true;
        assert!(!is_auction_active(&cancelled, 100));
        assert!(!is_auction_ended(&cancelled, 9999));
    }

    #[test]
    fn bid_hash_separates_inputs() {
        let amount = BigUint::from(150u32);
        let secret = Felt::from(7u64);
        let base = compute_bid_hash(&amount, &secret);

        assert_eq!(base, compute_bid_hash(&amount, &secret));
        assert_ne!(base, compute_bid_hash(&BigUint::from(151u32), &secret));
        assert_ne!(base, compute_bid_hash(&amount, &Felt::from(8u64)));
    }
}
