//! Field elements over the Stark prime.
//!
//! Every value handed to the contract as a `felt` parameter must lie in
//! `[0, P)` with P = 2^251 + 17·2^192 + 1. Parsing reduces the magnitude
//! modulo P rather than rejecting it; only empty, non-hex, or negative
//! inputs are errors.

use num_bigint::{BigInt, BigUint, Sign};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors from normalizing a value into the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeltError {
    #[error("empty value")]
    Empty,

    #[error("invalid hex digit in value")]
    InvalidHex,

    #[error("value cannot be negative")]
    Negative,
}

/// The field modulus P = 2^251 + 17·2^192 + 1.
pub fn modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| {
        (BigUint::from(1u8) << 251u32) + (BigUint::from(17u8) << 192u32) + BigUint::from(1u8)
    })
}

/// A normalized field element in `[0, P)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Felt(BigUint);

impl Felt {
    /// Parse a hex string with an optional `0x` prefix, reducing modulo P.
    ///
    /// Idempotent with respect to [`Felt::to_hex`]: parsing a rendered
    /// element returns the same element.
    pub fn from_hex(s: &str) -> Result<Self, FeltError> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(FeltError::Empty);
        }
        // `parse_bytes` tolerates a leading sign; only hex digits are valid.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FeltError::InvalidHex);
        }
        let value = BigUint::parse_bytes(digits.as_bytes(), 16).ok_or(FeltError::InvalidHex)?;
        Ok(Self::from_biguint(value))
    }

    /// Reduce an unsigned integer into the field.
    pub fn from_biguint(value: BigUint) -> Self {
        Self(value % modulus())
    }

    /// Reduce a signed integer into the field, rejecting negative values.
    pub fn from_bigint(value: &BigInt) -> Result<Self, FeltError> {
        if value.sign() == Sign::Minus {
            return Err(FeltError::Negative);
        }
        Ok(Self::from_biguint(value.magnitude().clone()))
    }

    /// Interpret big-endian bytes as an unsigned integer and reduce.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self::from_biguint(BigUint::from_bytes_be(bytes))
    }

    /// Render as a `0x`-prefixed lowercase hex string.
    ///
    /// Leading zero nibbles are dropped; the zero element renders as `0x0`.
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }

    /// Big-endian bytes left-padded to 32.
    pub fn to_bytes_be32(&self) -> [u8; 32] {
        let bytes = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for Felt {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Felt::from_hex(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use num_traits::Num;

    #[test]
    fn modulus_value() {
        let expected = BigUint::from_str_radix(
            "800000000000011000000000000000000000000000000000000000000000001",
            16,
        )
        .unwrap();
        assert_eq!(*modulus(), expected);
        assert_eq!(modulus().bits(), 252);
    }

    #[test]
    fn parse_with_and_without_prefix() {
        assert_eq!(Felt::from_hex("0xff").unwrap(), Felt::from(255u64));
        assert_eq!(Felt::from_hex("ff").unwrap(), Felt::from(255u64));
        assert_eq!(Felt::from_hex("0x0").unwrap(), Felt::from(0u64));
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = ["0x1", "0xdeadbeef", "ffffffffffffffffffffffffffffffff"];
        for input in inputs {
            let once = Felt::from_hex(input).unwrap();
            let twice = Felt::from_hex(&once.to_hex()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn oversized_values_reduce_instead_of_failing() {
        // P itself reduces to zero, P + 5 to five.
        let p_hex = format!("{:x}", modulus());
        assert_eq!(Felt::from_hex(&p_hex).unwrap(), Felt::from(0u64));

        let over = modulus() + BigUint::from(5u8);
        assert_eq!(Felt::from_biguint(over), Felt::from(5u64));
    }

    #[test]
    fn normalized_values_stay_in_range() {
        let samples = [
            Felt::from_hex("0x1").unwrap(),
            Felt::from_biguint(modulus() * BigUint::from(3u8) + BigUint::from(7u8)),
            Felt::from_bytes_be(&[0xffu8; 64]),
        ];
        for felt in samples {
            assert!(felt.as_biguint() < modulus());
        }
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Felt::from_hex(""), Err(FeltError::Empty));
        assert_eq!(Felt::from_hex("0x"), Err(FeltError::Empty));
        assert_eq!(Felt::from_hex("0xg1"), Err(FeltError::InvalidHex));
        assert_eq!(Felt::from_hex("+5"), Err(FeltError::InvalidHex));
        assert_eq!(Felt::from_hex("0x+5"), Err(FeltError::InvalidHex));
        assert_eq!(Felt::from_hex("-5"), Err(FeltError::InvalidHex));
        assert_eq!(
            Felt::from_bigint(&BigInt::from(-5)),
            Err(FeltError::Negative)
        );
    }

    #[test]
    fn hex_rendering_drops_leading_zeros() {
        assert_eq!(Felt::from_hex("0x00ff").unwrap().to_hex(), "0xff");
        assert_eq!(Felt::from(0u64).to_hex(), "0x0");
    }

    #[test]
    fn bytes_be32_roundtrip() {
        let felt = Felt::from_hex("0x1234abcd").unwrap();
        let bytes = felt.to_bytes_be32();
        assert_eq!(Felt::from_bytes_be(&bytes), felt);
    }

    #[test]
    fn serde_as_hex_string() {
        let felt = Felt::from_hex("0xabc").unwrap();
        let json = serde_json::to_string(&felt).unwrap();
        assert_eq!(json, "\"0xabc\"");
        let back: Felt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, felt);
    }
}
