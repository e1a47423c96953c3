//! In-memory Bidnox auction node.
//!
//! Simulates the on-chain auction contract for local development and
//! integration tests: sealed-bid placement, commit-reveal verification,
//! finalization, and a controllable block clock. The binary in this crate
//! serves the same logic over JSON-RPC.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ContractError;
pub use handlers::{compute_bid_hash, CallContext};
pub use state::{platform_address, platform_class_hash, ChainState};
