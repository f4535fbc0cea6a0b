//! Fixed-point math utilities for deterministic simulation.
//!
//! All simulation quantities use fixed-point arithmetic to ensure
//! deterministic behavior across platforms. Floating-point values only
//! appear at the data boundary and are converted once, when the catalog
//! is built.

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Convert an authored decimal value into fixed-point.
///
/// Returns `None` for NaN, infinities and values outside the fixed range.
#[must_use]
pub fn checked_from_f64(value: f64) -> Option<Fixed> {
    if !value.is_finite() {
        return None;
    }
    Fixed::checked_from_num(value)
}

/// Slack absorbed by [`floor_tolerant`], 2^-10.
///
/// Authored decimals such as `0.9` are not exact in binary fixed-point, so
/// `50 * 0.9` lands just below 45.
pub const FLOOR_TOLERANCE: Fixed = Fixed::from_bits(1 << 22);

/// Floor that treats values within [`FLOOR_TOLERANCE`] below an integer as
/// that integer.
#[must_use]
pub fn floor_tolerant(value: Fixed) -> Fixed {
    value.saturating_add(FLOOR_TOLERANCE).floor()
}

/// Raise `base` to an integer power by repeated squaring.
///
/// Saturates at [`Fixed::MAX`] instead of overflowing, so runaway cost
/// scaling stays finite.
#[must_use]
pub fn pow_saturating(base: Fixed, mut exp: u32) -> Fixed {
    let mut result = Fixed::ONE;
    let mut factor = base;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.saturating_mul(factor);
        }
        exp >>= 1;
        if exp > 0 {
            factor = factor.saturating_mul(factor);
        }
    }
    result
}

/// Ratio `numerator / (numerator + other)`, or zero when the sum is zero.
#[must_use]
pub fn share_of(numerator: Fixed, other: Fixed) -> Fixed {
    let total = numerator.saturating_add(other);
    if total <= Fixed::ZERO {
        Fixed::ZERO
    } else {
        numerator / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow_saturating_small_exponents() {
        let two = Fixed::from_num(2);
        assert_eq!(pow_saturating(two, 0), Fixed::ONE);
        assert_eq!(pow_saturating(two, 1), two);
        assert_eq!(pow_saturating(two, 10), Fixed::from_num(1024));
    }

    #[test]
    fn test_pow_saturating_fractional_base() {
        let base = Fixed::from_num(1.5);
        assert_eq!(pow_saturating(base, 2), Fixed::from_num(2.25));
    }

    #[test]
    fn test_pow_saturating_clamps() {
        let big = Fixed::from_num(1000);
        assert_eq!(pow_saturating(big, 8), Fixed::MAX);
    }

    #[test]
    fn test_floor_tolerant() {
        let product = Fixed::from_num(50) * Fixed::from_num(0.9);
        assert!(product < Fixed::from_num(45));
        assert_eq!(floor_tolerant(product), Fixed::from_num(45));
        assert_eq!(floor_tolerant(Fixed::from_num(11.5)), Fixed::from_num(11));
    }

    #[test]
    fn test_checked_from_f64() {
        assert_eq!(checked_from_f64(0.5), Some(Fixed::from_num(0.5)));
        assert!(checked_from_f64(f64::NAN).is_none());
        assert!(checked_from_f64(f64::INFINITY).is_none());
        assert!(checked_from_f64(1.0e12).is_none());
    }

    #[test]
    fn test_serde_roundtrip_is_exact() {
        let value = Fixed::from_num(12.375) + Fixed::DELTA;
        let text = ron::to_string(&value).unwrap();
        let back: Fixed = ron::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_share_of() {
        assert_eq!(share_of(Fixed::ZERO, Fixed::ZERO), Fixed::ZERO);
        assert_eq!(
            share_of(Fixed::from_num(1), Fixed::from_num(3)),
            Fixed::from_num(0.25)
        );
    }
}
