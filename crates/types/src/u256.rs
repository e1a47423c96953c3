//! Reconstruction of wide integers transmitted as split 128-bit pairs.
//!
//! Amounts and asset ids cross the wire as `{low, high}` field pairs;
//! this module is the single place where that encoding is handled.

use num_bigint::BigUint;
use num_traits::One;

/// Reconstruct `value = (high << 128) + low`.
pub fn felt_pair_to_integer(low: &BigUint, high: &BigUint) -> BigUint {
    (high << 128u32) + low
}

/// Split a value into its low/high 128-bit halves.
pub fn integer_to_felt_pair(value: &BigUint) -> (BigUint, BigUint) {
    let mask = (BigUint::one() << 128u32) - BigUint::one();
    (value & &mask, value >> 128u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_have_zero_high() {
        let value = BigUint::from(42u64);
        let (low, high) = integer_to_felt_pair(&value);
        assert_eq!(low, value);
        assert_eq!(high, BigUint::from(0u8));
        assert_eq!(felt_pair_to_integer(&low, &high), value);
    }

    #[test]
    fn wide_values_roundtrip() {
        let value = (BigUint::from(7u8) << 200u32) + BigUint::from(123456789u64);
        let (low, high) = integer_to_felt_pair(&value);
        assert!(low.bits() <= 128);
        assert_eq!(felt_pair_to_integer(&low, &high), value);
    }

    #[test]
    fn boundary_at_128_bits() {
        let value = BigUint::one() << 128u32;
        let (low, high) = integer_to_felt_pair(&value);
        assert_eq!(low, BigUint::from(0u8));
        assert_eq!(high, BigUint::one());
        assert_eq!(felt_pair_to_integer(&low, &high), value);
    }
}
