//! Dense polynomials with coefficients in `Z_p`.
//!
//! A polynomial is a slice of residues, index 0 holding the constant term.
//! Trailing zero coefficients are kept: the length of the output of each
//! operation only depends on the length of its inputs.

use crate::zq::Modulus;
use itertools::Itertools;

/// Product of two polynomials; the result has `a.len() + b.len() - 1`
/// coefficients, or none if either input is empty.
pub fn poly_mul(a: &[u64], b: &[u64], q: &Modulus) -> Vec<u64> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }
    let mut r = vec![0u64; a.len() + b.len() - 1];
    for (i, ai) in a.iter().enumerate() {
        if *ai == 0 {
            continue;
        }
        for (j, bj) in b.iter().enumerate() {
            r[i + j] = q.add(r[i + j], q.mul(*ai, *bj));
        }
    }
    r
}

/// Sum of two polynomials over the longer of the two lengths, missing
/// coefficients being treated as zero.
pub fn poly_add(a: &[u64], b: &[u64], q: &Modulus) -> Vec<u64> {
    (0..a.len().max(b.len()))
        .map(|i| {
            let ai = a.get(i).copied().unwrap_or_default();
            let bi = b.get(i).copied().unwrap_or_default();
            q.add(ai, bi)
        })
        .collect_vec()
}

/// Multiply every coefficient by the residue `s`.
pub fn poly_scale(a: &[u64], s: u64, q: &Modulus) -> Vec<u64> {
    let s = q.reduce(s);
    a.iter().map(|ai| q.mul(*ai, s)).collect_vec()
}

/// Map signed coefficients to their representatives in `[0, p)`.
pub fn normalize(a: &[i64], q: &Modulus) -> Vec<u64> {
    q.reduce_vec_i64(a)
}

/// Evaluate the polynomial at `x` using Horner's rule.
pub fn evaluate(a: &[u64], x: u64, q: &Modulus) -> u64 {
    let x = q.reduce(x);
    a.iter().rev().fold(0, |acc, ai| q.add(q.mul(acc, x), *ai))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn product_length_and_values() {
        let q = Modulus::new(7).unwrap();
        // (x + 1)(x - 1) = x^2 - 1
        let r = poly_mul(&[1, 1], &[6, 1], &q);
        assert_eq!(r, vec![6, 0, 1]);
        assert!(poly_mul(&[], &[1, 2], &q).is_empty());
        assert_eq!(poly_mul(&[3], &[5], &q), vec![1]);
    }

    #[test]
    fn sum_over_longer_length() {
        let q = Modulus::new(7).unwrap();
        assert_eq!(poly_add(&[6, 6, 6], &[1], &q), vec![0, 6, 6]);
        assert_eq!(poly_add(&[], &[3, 4], &q), vec![3, 4]);
        assert_eq!(poly_scale(&[1, 2, 3], 9, &q), vec![2, 4, 6]);
    }

    #[test]
    fn normalization() {
        let q = Modulus::new(257).unwrap();
        assert_eq!(normalize(&[-1, 0, 256, -257, 300], &q), vec![256, 0, 256, 0, 43]);
    }

    #[test]
    fn horner() {
        let q = Modulus::new(11).unwrap();
        // 2 + 3x + x^2 at x = 4: 2 + 12 + 16 = 30 = 8 mod 11
        assert_eq!(evaluate(&[2, 3, 1], 4, &q), 8);
        assert_eq!(evaluate(&[], 4, &q), 0);
    }

    proptest! {
        #[test]
        fn product_evaluates_as_product(
            a in prop::collection::vec(0u64..257, 1..20),
            b in prop::collection::vec(0u64..257, 1..20),
            x in 0u64..257,
        ) {
            let q = Modulus::new(257).unwrap();
            let ab = poly_mul(&a, &b, &q);
            prop_assert_eq!(ab.len(), a.len() + b.len() - 1);
            prop_assert_eq!(
                evaluate(&ab, x, &q),
                q.mul(evaluate(&a, x, &q), evaluate(&b, x, &q))
            );
            prop_assert_eq!(
                evaluate(&poly_add(&a, &b, &q), x, &q),
                q.add(evaluate(&a, x, &q), evaluate(&b, x, &q))
            );
        }
    }
}
