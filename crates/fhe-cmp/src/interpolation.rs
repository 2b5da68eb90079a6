//! Encrypted polynomials and their homomorphic evaluation.

use crate::evaluator::Evaluator;
use crate::keys::{Ciphertext, KeyMaterial};
use crate::{Error, ParametersError, Result};
use fhe_cmp_math::interpolation::InterpolationTable;
use fhe_cmp_traits::ArithmeticEngine;
use rayon::prelude::*;
use tracing::debug;

/// A polynomial whose coefficients are encrypted one per ciphertext, each
/// replicated over the first `width` slots.
pub struct EncryptedPolynomial<K: KeyMaterial> {
    coefficients: Vec<Ciphertext<K>>,
    width: usize,
}

impl<K: KeyMaterial> EncryptedPolynomial<K> {
    /// Encrypt the coefficients of a polynomial, constant term first.
    pub fn encrypt(keys: &K, coefficients: &[u64], width: usize) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Error::TooFewValues(0, 1));
        }
        let slots = keys.engine().slots();
        if width == 0 || width > slots {
            return Err(ParametersError::InvalidBatchWidth(width, slots).into());
        }
        let coefficients = coefficients
            .iter()
            .map(|c| keys.encrypt_residues(&vec![*c; width]))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            coefficients,
            width,
        })
    }

    /// The encrypted coefficients.
    pub fn coefficients(&self) -> &[Ciphertext<K>] {
        &self.coefficients
    }

    /// Number of coefficients.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether the polynomial has no coefficient; never true for an
    /// encrypted polynomial.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Number of slots holding the coefficients.
    pub fn width(&self) -> usize {
        self.width
    }
}

impl<'a, K: KeyMaterial> Evaluator<'a, K> {
    /// Encrypt a polynomial over the batch width of the evaluator.
    pub fn encrypt_polynomial(&self, coefficients: &[u64]) -> Result<EncryptedPolynomial<K>> {
        EncryptedPolynomial::encrypt(self.keys, coefficients, self.options.batch_width)
    }

    /// Evaluate `poly[0] + Σ powers[i]·poly[i+1]`, where `powers[i]` encrypts
    /// `c^(i+1)`.
    ///
    /// There must be exactly one power less than coefficients.
    pub fn evaluate(
        &self,
        powers: &[Ciphertext<K>],
        poly: &EncryptedPolynomial<K>,
    ) -> Result<Ciphertext<K>> {
        let (constant, coefficients) = poly
            .coefficients
            .split_first()
            .ok_or(Error::TooFewValues(0, 1))?;
        if powers.len() < coefficients.len() {
            return Err(Error::TooFewValues(powers.len(), coefficients.len()));
        }
        if powers.len() > coefficients.len() {
            return Err(Error::TooManyValues(powers.len(), coefficients.len()));
        }

        let terms = if self.options.parallel {
            powers
                .par_iter()
                .zip(coefficients.par_iter())
                .map(|(power, coefficient)| self.mul(power, coefficient))
                .collect::<Result<Vec<_>>>()?
        } else {
            powers
                .iter()
                .zip(coefficients.iter())
                .map(|(power, coefficient)| self.mul(power, coefficient))
                .collect::<Result<Vec<_>>>()?
        };
        terms
            .iter()
            .try_fold(constant.clone(), |acc, term| self.add(&acc, term))
    }

    /// Evaluate the interpolating polynomial of `table` given the powers of
    /// the input.
    pub fn evaluate_table(
        &self,
        powers: &[Ciphertext<K>],
        table: &InterpolationTable,
    ) -> Result<Ciphertext<K>> {
        let poly = self.encrypt_polynomial(&table.interpolate()?)?;
        self.evaluate(powers, &poly)
    }

    /// Apply the function described by a full-domain table to a ciphertext.
    pub fn apply(&self, ct: &Ciphertext<K>, table: &InterpolationTable) -> Result<Ciphertext<K>> {
        if !table.is_full_domain() {
            return Err(Error::TooFewValues(
                table.len(),
                self.q.modulus() as usize,
            ));
        }
        debug!("applying a table of {} points", table.len());
        let powers = self.powers_batched(ct, self.options.batch_width)?;
        self.evaluate_table(&powers, table)
    }

    /// Apply several full-domain tables to the same ciphertext, sharing the
    /// powers of the input.
    pub fn apply_many(
        &self,
        ct: &Ciphertext<K>,
        tables: &[InterpolationTable],
    ) -> Result<Vec<Ciphertext<K>>> {
        if let Some(table) = tables.iter().find(|t| !t.is_full_domain()) {
            return Err(Error::TooFewValues(
                table.len(),
                self.q.modulus() as usize,
            ));
        }
        let powers = self.powers_batched(ct, self.options.batch_width)?;
        tables
            .iter()
            .map(|table| self.evaluate_table(&powers, table))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EncryptedPolynomial;
    use crate::evaluator::{EvaluationOptions, Evaluator};
    use crate::keys::{KeyMaterial, SinglePartyKeys};
    use crate::reference::{ReferenceEngine, ReferenceParametersBuilder};
    use crate::Error;
    use fhe_cmp_math::interpolation::InterpolationTable;
    use fhe_cmp_math::zq::Modulus;
    use rand::thread_rng;
    use std::error::Error as StdError;

    fn keys(p: u64, slots: usize) -> Result<SinglePartyKeys<ReferenceEngine>, Box<dyn StdError>> {
        let par = ReferenceParametersBuilder::new()
            .set_plaintext_modulus(p)
            .set_slots(slots)
            .build_arc()?;
        Ok(SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut thread_rng())?)
    }

    #[test]
    fn interpolated_functions() -> Result<(), Box<dyn StdError>> {
        for p in [5, 7, 11, 13] {
            let keys = keys(p, 1)?;
            let q = Modulus::new(p)?;
            let evaluator = Evaluator::new(&keys)?;
            let table = InterpolationTable::from_fn(&q, |x| (3 * x * x - x + 2) % 5);
            for (x, fx) in table.points() {
                let ct = keys.encrypt(&[*x])?;
                let result = evaluator.apply(&ct, &table)?;
                assert_eq!(keys.decrypt(&result)?, vec![q.center(q.reduce_i64(*fx))]);
            }
        }
        Ok(())
    }

    #[test]
    fn evaluate_polynomial() -> Result<(), Box<dyn StdError>> {
        let keys = keys(257, 2)?;
        let evaluator =
            Evaluator::with_options(&keys, EvaluationOptions::default().with_batch_width(2))?;

        // 1 + 2x + 3x^2 at x = 4 and x = -1.
        let poly = evaluator.encrypt_polynomial(&[1, 2, 3])?;
        assert_eq!(poly.len(), 3);
        assert_eq!(poly.width(), 2);
        let x = keys.encrypt(&[4, -1])?;
        let powers = evaluator.powers_batched(&x, 2)?;
        let result = evaluator.evaluate(&powers[..2], &poly)?;
        assert_eq!(keys.decrypt(&result)?, vec![57, 2]);

        assert!(matches!(
            evaluator.evaluate(&powers[..1], &poly),
            Err(Error::TooFewValues(1, 2))
        ));
        assert!(matches!(
            evaluator.evaluate(&powers[..3], &poly),
            Err(Error::TooManyValues(3, 2))
        ));
        assert!(matches!(
            EncryptedPolynomial::encrypt(&keys, &[], 1),
            Err(Error::TooFewValues(0, 1))
        ));
        Ok(())
    }

    #[test]
    fn partial_tables_are_rejected() -> Result<(), Box<dyn StdError>> {
        let keys = keys(17, 1)?;
        let q = Modulus::new(17)?;
        let evaluator = Evaluator::new(&keys)?;
        let table = InterpolationTable::new(&[0, 1, 2], &[0, 1, 4], &q)?;
        let ct = keys.encrypt(&[1])?;
        assert!(matches!(
            evaluator.apply(&ct, &table),
            Err(Error::TooFewValues(3, 17))
        ));
        Ok(())
    }

    #[test]
    fn apply_many() -> Result<(), Box<dyn StdError>> {
        let keys = keys(13, 1)?;
        let q = Modulus::new(13)?;
        let options = EvaluationOptions::default().with_parallel(true);
        let evaluator = Evaluator::with_options(&keys, options)?;
        let tables = [InterpolationTable::sign(&q), InterpolationTable::equal_zero(&q)];
        for (x, expected) in [(-4, [-1, 0]), (0, [0, 1]), (6, [1, 0])] {
            let ct = keys.encrypt(&[x])?;
            let results = evaluator.apply_many(&ct, &tables)?;
            assert_eq!(keys.decrypt(&results[0])?, vec![expected[0]]);
            assert_eq!(keys.decrypt(&results[1])?, vec![expected[1]]);
        }
        Ok(())
    }
}
