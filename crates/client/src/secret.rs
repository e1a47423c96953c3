//! Bid secret generation.

use rand::rngs::OsRng;
use rand::RngCore;

use bidnox_types::Felt;

/// Number of random bytes drawn per secret.
///
/// 30 bytes (240 bits) sits comfortably below the ~251-bit field modulus,
/// so the reduction below never rejects and introduces no bias.
pub const SECRET_BYTES: usize = 30;

/// Generate a fresh blinding secret for a sealed bid.
///
/// Must be called once per bid placement; secrets are never reused.
pub fn generate_bid_secret() -> Felt {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);

    // Reduction is a no-op at this byte count but is applied regardless.
    Felt::from_bytes_be(&bytes)
}
