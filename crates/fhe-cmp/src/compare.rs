//! Comparison operators.
//!
//! Every predicate is the interpolating polynomial of its indicator table,
//! evaluated on the input (or on the difference of the two inputs). The
//! results are encryptions of `0` or `1`, or of `-1`, `0` and `1` for the
//! sign.
//!
//! The two-operand orderings (`gt`, `gteq`, `lt`, `lteq`, `max`, `min`) read
//! the sign of `a - b` in `Z_p`. They are exact only when
//! `|a - b| <= (p-1)/2`; beyond that the difference wraps around and the
//! result is that of the opposite ordering. Operands encrypted with
//! [`KeyMaterial::encrypt_comparable`] always satisfy this bound.

use crate::evaluator::Evaluator;
use crate::keys::{Ciphertext, KeyMaterial};
use crate::{Error, Result};
use fhe_cmp_math::interpolation::InterpolationTable;
use fhe_cmp_math::zq::Modulus;
use fhe_cmp_traits::ArithmeticEngine;
use tracing::debug;

impl<'a, K: KeyMaterial> Evaluator<'a, K> {
    /// Encrypts `1` if `c > 0`, `-1` if `c < 0`, and `0` otherwise.
    pub fn sign(&self, ct: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.apply(ct, &InterpolationTable::sign(&self.q))
    }

    /// Encrypts `1` if `c = 0`.
    pub fn equal_zero(&self, ct: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.apply(ct, &InterpolationTable::equal_zero(&self.q))
    }

    /// Encrypts `1` if `c > 0`.
    pub fn greater_than_zero(&self, ct: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.apply(ct, &InterpolationTable::greater_than_zero(&self.q))
    }

    /// Encrypts `1` if `c >= 0`.
    pub fn greater_equal_zero(&self, ct: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.apply(ct, &InterpolationTable::greater_equal_zero(&self.q))
    }

    /// Encrypts `1` if `c < 0`.
    pub fn lower_than_zero(&self, ct: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.apply(ct, &InterpolationTable::lower_than_zero(&self.q))
    }

    /// Encrypts `1` if `c <= 0`.
    pub fn lower_equal_zero(&self, ct: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.apply(ct, &InterpolationTable::lower_equal_zero(&self.q))
    }

    /// Encrypts `1` if `a = b`.
    ///
    /// Exact over the whole centered domain, since two distinct values of
    /// the domain never differ by a multiple of `p`.
    pub fn equal(&self, a: &Ciphertext<K>, b: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.equal_zero(&self.sub(a, b)?)
    }

    /// Encrypts `1` if `a > b`.
    ///
    /// Requires `|a - b| <= (p-1)/2`, otherwise the difference wraps around
    /// modulo `p` and the result is wrong.
    pub fn gt(&self, a: &Ciphertext<K>, b: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.greater_than_zero(&self.sub(a, b)?)
    }

    /// Encrypts `1` if `a >= b`.
    ///
    /// Requires `|a - b| <= (p-1)/2`, otherwise the difference wraps around
    /// modulo `p` and the result is wrong.
    pub fn gteq(&self, a: &Ciphertext<K>, b: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.greater_equal_zero(&self.sub(a, b)?)
    }

    /// Encrypts `1` if `a < b`.
    ///
    /// Requires `|a - b| <= (p-1)/2`, otherwise the difference wraps around
    /// modulo `p` and the result is wrong.
    pub fn lt(&self, a: &Ciphertext<K>, b: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.lower_than_zero(&self.sub(a, b)?)
    }

    /// Encrypts `1` if `a <= b`.
    ///
    /// Requires `|a - b| <= (p-1)/2`, otherwise the difference wraps around
    /// modulo `p` and the result is wrong.
    pub fn lteq(&self, a: &Ciphertext<K>, b: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.lower_equal_zero(&self.sub(a, b)?)
    }

    /// Encrypts `max(a, b) = gteq(a, b)·a + gt(b, a)·b`.
    ///
    /// `gt(b, a)` is evaluated as `lt(a - b)`, so that both selectors share
    /// the powers of `a - b`. Requires `|a - b| <= (p-1)/2`, otherwise the
    /// result is `min(a, b)`.
    pub fn max(&self, a: &Ciphertext<K>, b: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        let tables = [
            InterpolationTable::greater_equal_zero(&self.q),
            InterpolationTable::lower_than_zero(&self.q),
        ];
        self.select(a, b, &tables)
    }

    /// Encrypts `min(a, b) = lteq(a, b)·a + lt(b, a)·b`.
    ///
    /// `lt(b, a)` is evaluated as `gt(a - b)`, so that both selectors share
    /// the powers of `a - b`. Requires `|a - b| <= (p-1)/2`, otherwise the
    /// result is `max(a, b)`.
    pub fn min(&self, a: &Ciphertext<K>, b: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        let tables = [
            InterpolationTable::lower_equal_zero(&self.q),
            InterpolationTable::greater_than_zero(&self.q),
        ];
        self.select(a, b, &tables)
    }

    fn select(
        &self,
        a: &Ciphertext<K>,
        b: &Ciphertext<K>,
        tables: &[InterpolationTable; 2],
    ) -> Result<Ciphertext<K>> {
        let selectors = self.apply_many(&self.sub(a, b)?, tables)?;
        let pick_a = self.mul(&selectors[0], a)?;
        let pick_b = self.mul(&selectors[1], b)?;
        self.add(&pick_a, &pick_b)
    }

    /// Encrypts `(a - b)^(p-1)`, i.e. `0` if `a = b` and `1` otherwise, by
    /// Fermat's little theorem.
    pub fn not_equal_fermat(&self, a: &Ciphertext<K>, b: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.power(&self.sub(a, b)?, self.q.modulus() - 1)
    }

    /// Encrypts `1 - (a - b)^(p-1)`, i.e. `1` if `a = b` and `0` otherwise.
    pub fn equal_fermat(&self, a: &Ciphertext<K>, b: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        let one = self.constant(1, self.options.batch_width)?;
        self.sub(&one, &self.not_equal_fermat(a, b)?)
    }

    /// Number of positions among the first `batch` slots where `a` and `b`
    /// differ, in slot 0.
    ///
    /// The count is a residue modulo `p`, hence exact as long as `batch < p`.
    pub fn count_differences(
        &self,
        a: &Ciphertext<K>,
        b: &Ciphertext<K>,
        batch: usize,
    ) -> Result<Ciphertext<K>> {
        self.check_width(batch)?;
        debug!("counting differences over {} slots", batch);
        let indicators = self.power_batched(&self.sub(a, b)?, self.q.modulus() - 1, batch)?;
        self.keys
            .engine()
            .sum_slots(&indicators, batch)
            .map_err(Error::engine)
    }
}

/// Encode a byte string into one residue per slot, e.g. to compare two
/// strings with [`Evaluator::count_differences`].
///
/// Shorter strings are implicitly padded with zeros by the encryption.
pub fn encode_bytes(bytes: &[u8], q: &Modulus) -> Result<Vec<u64>> {
    bytes
        .iter()
        .map(|b| {
            let b = *b as u64;
            if b < q.modulus() {
                Ok(b)
            } else {
                Err(Error::UnspecifiedInput(format!(
                    "Byte {} is not a residue modulo {}",
                    b,
                    q.modulus()
                )))
            }
        })
        .collect()
}
