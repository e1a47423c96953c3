//! Local secret store for pending sealed bids.
//!
//! Each `(auction_id, bidder)` pair maps to one JSON record under a
//! dedicated directory, surviving restarts the way the browser original
//! survived reloads. Records are owned exclusively by this machine; no
//! server ever sees a secret. Concurrent writers are not coordinated:
//! last write wins, which is an accepted race.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::warn;

use bidnox_types::{Address, Felt};

use crate::error::ClientError;

/// Namespace prefix keeping bid records apart from anything else that
/// might share the directory.
const KEY_PREFIX: &str = "bid";

/// On-disk record for one pending bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidSecretRecord {
    /// Hex-encoded secret.
    pub secret: String,
    /// Decimal amount in the smallest unit.
    pub amount: String,
    /// Creation time, unix milliseconds.
    pub timestamp: u64,
}

/// A retrieved secret, re-normalized and ready for reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBid {
    pub secret: Felt,
    pub amount: BigUint,
}

/// Durable key-value store for bid secrets.
pub struct SecretStore {
    dir: PathBuf,
}

impl SecretStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| ClientError::StorageUnavailable(format!("{}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn record_path(&self, auction_id: u64, bidder: &Address) -> PathBuf {
        self.dir
            .join(format!("{KEY_PREFIX}_{auction_id}_{bidder}.json"))
    }

    /// Write (or overwrite) the record for `(auction_id, bidder)`.
    ///
    /// A failure here is fatal to the placement flow: a secret that cannot
    /// survive a restart must not be committed to on-chain.
    pub fn store(
        &self,
        auction_id: u64,
        bidder: &Address,
        secret: &Felt,
        amount: &BigUint,
    ) -> Result<(), ClientError> {
        let record = BidSecretRecord {
            secret: secret.to_hex(),
            amount: amount.to_string(),
            timestamp: unix_now_millis(),
        };
        let body = serde_json::to_string(&record)
            .map_err(|e| ClientError::StorageUnavailable(e.to_string()))?;

        let path = self.record_path(auction_id, bidder);
        fs::write(&path, body)
            .map_err(|e| ClientError::StorageUnavailable(format!("{}: {e}", path.display())))
    }

    /// Read and re-normalize the record for `(auction_id, bidder)`.
    ///
    /// Corrupt data (unparseable JSON, invalid secret or amount) reads as
    /// `None` with a logged diagnostic rather than an error: a missing
    /// secret means the user cannot reveal, not that the client crashes.
    pub fn retrieve(&self, auction_id: u64, bidder: &Address) -> Option<StoredBid> {
        let path = self.record_path(auction_id, bidder);
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read bid secret");
                return None;
            }
        };

        let record: BidSecretRecord = match serde_json::from_str(&body) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt bid secret record");
                return None;
            }
        };

        let secret = match Felt::from_hex(&record.secret) {
            Ok(secret) => secret,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stored secret failed normalization");
                return None;
            }
        };

        let amount = match BigUint::from_str(&record.amount) {
            Ok(amount) => amount,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stored amount is not a decimal integer");
                return None;
            }
        };

        Some(StoredBid { secret, amount })
    }

    /// Remove the record. A no-op when no record exists.
    pub fn clear(&self, auction_id: u64, bidder: &Address) {
        let path = self.record_path(auction_id, bidder);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to clear bid secret");
            }
        }
    }

    /// Existence check without deserialization.
    pub fn has(&self, auction_id: u64, bidder: &Address) -> bool {
        self.record_path(auction_id, bidder).exists()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn unix_now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
