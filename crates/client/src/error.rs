//! Client error taxonomy.

use thiserror::Error;

use bidnox_types::rpc::WireError;
use bidnox_types::FeltError;

/// Errors surfaced by the client SDK.
///
/// Contract rejections are caught at the orchestration boundary and
/// returned as values, never panicked, so a caller can render a message.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid secret format: {0}")]
    InvalidSecretFormat(#[from] FeltError),

    #[error("contract call failed: {0}")]
    ContractCallFailed(String),

    #[error("bid of {amount} STRK is below the starting price of {starting_price} STRK")]
    InsufficientBid {
        amount: String,
        starting_price: String,
    },

    #[error("local secret storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("no stored bid secret for auction {auction_id}")]
    SecretNotFound { auction_id: u64 },
}

impl From<WireError> for ClientError {
    fn from(e: WireError) -> Self {
        ClientError::ContractCallFailed(format!("malformed contract response: {e}"))
    }
}

impl From<jsonrpsee::core::Error> for ClientError {
    fn from(e: jsonrpsee::core::Error) -> Self {
        ClientError::ContractCallFailed(e.to_string())
    }
}
