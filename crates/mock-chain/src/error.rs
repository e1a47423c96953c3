//! Error conditions raised by the auction contract logic.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("auction {0} not found")]
    AuctionNotFound(u64),

    #[error("bidding period has ended")]
    BiddingEnded,

    #[error("bidding period has not ended")]
    BiddingNotEnded,

    #[error("auction is cancelled")]
    AuctionCancelled,

    #[error("auction already finalized")]
    AlreadyFinalized,

    #[error("auction already cancelled")]
    AlreadyCancelled,

    #[error("bid already revealed")]
    AlreadyRevealed,

    #[error("no bid from this address")]
    BidNotFound,

    #[error("revealed values do not match the commitment")]
    CommitmentMismatch,

    #[error("bid is below the starting price")]
    BidBelowStartingPrice,

    #[error("duration must be greater than zero")]
    InvalidDuration,

    #[error("starting price must be greater than zero")]
    ZeroStartingPrice,

    #[error("only the seller may cancel")]
    NotSeller,
}
