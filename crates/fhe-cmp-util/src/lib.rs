#![crate_name = "fhe_cmp_util"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Utilities for the fhe-cmp library.

use itertools::Itertools;
use num_bigint_dig::{prime::probably_prime, BigUint};
use num_traits::PrimInt;

/// Returns whether the modulus p is prime; this function is 100% accurate
/// for the moduli used by this library.
pub fn is_prime(p: u64) -> bool {
    probably_prime(&BigUint::from(p), 0)
}

/// Little-endian binary decomposition of `n`.
///
/// The decomposition of 0 is empty, so that a loop over the set bits of an
/// exponent never multiplies anything in.
pub fn bit_decomposition(n: u64) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bit_length(n));
    let mut m = n;
    while m > 0 {
        bits.push(m & 1 == 1);
        m >>= 1;
    }
    bits
}

/// Number of bits needed to write `n` in binary (0 for `n = 0`).
pub fn bit_length(n: u64) -> usize {
    (u64::BITS - n.leading_zeros()) as usize
}

/// Indices of the set bits of `n`, lowest first.
pub fn set_bits(n: u64) -> Vec<usize> {
    bit_decomposition(n)
        .into_iter()
        .enumerate()
        .filter_map(|(i, b)| b.then_some(i))
        .collect_vec()
}

/// Half of the width of the centered domain of an odd modulus, i.e.
/// `(p - 1) / 2`.
pub fn half_width<T: PrimInt>(p: T) -> T {
    (p - T::one()) >> 1
}

/// Whether `value` lies in the centered domain `[-(p-1)/2, (p-1)/2]`.
pub fn in_centered_domain(value: i64, p: u64) -> bool {
    let bound = half_width(p) as i64;
    value >= -bound && value <= bound
}

/// Integer division rounding toward zero, returning `None` for a zero
/// divisor or an overflowing quotient.
pub fn div_trunc(dividend: i64, divisor: i64) -> Option<i64> {
    dividend.checked_div(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn primality() {
        for p in [2u64, 3, 5, 7, 11, 13, 17, 257, 65537, 1_000_000_007] {
            assert!(is_prime(p), "{p} should be prime");
        }
        for n in [0u64, 1, 4, 9, 15, 256, 65535, 1_000_000_008] {
            assert!(!is_prime(n), "{n} should not be prime");
        }
    }

    #[test]
    fn decomposition_of_small_values() {
        assert!(bit_decomposition(0).is_empty());
        assert_eq!(bit_decomposition(1), vec![true]);
        assert_eq!(bit_decomposition(6), vec![false, true, true]);
        assert_eq!(bit_decomposition(256).len(), 9);
        assert_eq!(set_bits(13), vec![0, 2, 3]);
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(256), 9);
    }

    #[test]
    fn centered_domain() {
        assert_eq!(half_width(257u64), 128);
        assert!(in_centered_domain(128, 257));
        assert!(in_centered_domain(-128, 257));
        assert!(!in_centered_domain(129, 257));
        assert!(!in_centered_domain(-129, 257));
    }

    #[test]
    fn truncating_division() {
        assert_eq!(div_trunc(7, 2), Some(3));
        assert_eq!(div_trunc(-7, 2), Some(-3));
        assert_eq!(div_trunc(7, -2), Some(-3));
        assert_eq!(div_trunc(7, 0), None);
    }

    proptest! {
        #[test]
        fn decomposition_recomposes(n: u64) {
            let recomposed = bit_decomposition(n)
                .iter()
                .enumerate()
                .fold(0u128, |acc, (i, b)| acc + ((*b as u128) << i));
            prop_assert_eq!(recomposed, n as u128);
            prop_assert_eq!(bit_decomposition(n).len(), bit_length(n));
        }
    }
}
