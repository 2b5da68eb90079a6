//! Homomorphic evaluation of comparison and division operators.

use crate::keys::{Ciphertext, KeyMaterial};
use crate::{Error, ParametersError, Result};
use fhe_cmp_math::zq::Modulus;
use fhe_cmp_traits::ArithmeticEngine;

/// Options of an [`Evaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Number of leading slots evaluated by the operators. Slots beyond the
    /// batch width are zero in the results.
    pub batch_width: usize,
    /// Whether independent multiplications run on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            batch_width: 1,
            parallel: false,
        }
    }
}

impl EvaluationOptions {
    /// Set the batch width.
    pub fn with_batch_width(mut self, batch_width: usize) -> Self {
        self.batch_width = batch_width;
        self
    }

    /// Enable or disable parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Evaluates operators on ciphertexts encrypted under some [`KeyMaterial`].
///
/// The operators are spread over the `power`, `interpolation`, `compare` and
/// `division` modules.
pub struct Evaluator<'a, K: KeyMaterial> {
    pub(crate) keys: &'a K,
    pub(crate) q: Modulus,
    pub(crate) options: EvaluationOptions,
}

impl<'a, K: KeyMaterial> Evaluator<'a, K> {
    /// Create an evaluator with the default options.
    pub fn new(keys: &'a K) -> Result<Self> {
        Self::with_options(keys, EvaluationOptions::default())
    }

    /// Create an evaluator with the given options.
    pub fn with_options(keys: &'a K, options: EvaluationOptions) -> Result<Self> {
        let q = *keys.modulus();
        let evaluator = Self { keys, q, options };
        evaluator.check_width(options.batch_width)?;
        Ok(evaluator)
    }

    /// The keys of the evaluator.
    pub fn keys(&self) -> &'a K {
        self.keys
    }

    /// The plaintext modulus.
    pub fn modulus(&self) -> &Modulus {
        &self.q
    }

    /// The options of the evaluator.
    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub(crate) fn check_width(&self, width: usize) -> Result<()> {
        let slots = self.keys.engine().slots();
        if width == 0 || width > slots {
            Err(ParametersError::InvalidBatchWidth(width, slots).into())
        } else {
            Ok(())
        }
    }

    pub(crate) fn add(&self, lhs: &Ciphertext<K>, rhs: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.keys.engine().add(lhs, rhs).map_err(Error::engine)
    }

    pub(crate) fn sub(&self, lhs: &Ciphertext<K>, rhs: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.keys.engine().sub(lhs, rhs).map_err(Error::engine)
    }

    pub(crate) fn mul(&self, lhs: &Ciphertext<K>, rhs: &Ciphertext<K>) -> Result<Ciphertext<K>> {
        self.keys
            .engine()
            .multiply(self.keys.evaluation_key(), lhs, rhs)
            .map_err(Error::engine)
    }

    /// Encryption of the residue `value` in the first `width` slots.
    pub(crate) fn constant(&self, value: u64, width: usize) -> Result<Ciphertext<K>> {
        self.keys.encrypt_residues(&vec![self.q.reduce(value); width])
    }

    /// Sum of ciphertexts; the sum of nothing is an encryption of zero over
    /// the batch width.
    pub(crate) fn sum<I>(&self, cts: I) -> Result<Ciphertext<K>>
    where
        I: IntoIterator<Item = Ciphertext<K>>,
    {
        let mut iter = cts.into_iter();
        match iter.next() {
            Some(first) => iter.try_fold(first, |acc, ct| self.add(&acc, &ct)),
            None => self.constant(0, self.options.batch_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EvaluationOptions, Evaluator};
    use crate::keys::{KeyMaterial, SinglePartyKeys};
    use crate::reference::{ReferenceEngine, ReferenceParameters};
    use crate::{Error, ParametersError};
    use rand::thread_rng;
    use std::error::Error as StdError;

    #[test]
    fn options() -> Result<(), Box<dyn StdError>> {
        let par = ReferenceParameters::default_arc(4)?;
        let keys = SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut thread_rng())?;

        let evaluator = Evaluator::new(&keys)?;
        assert_eq!(evaluator.options(), &EvaluationOptions::default());
        assert_eq!(evaluator.modulus().modulus(), 257);

        let options = EvaluationOptions::default()
            .with_batch_width(4)
            .with_parallel(true);
        let evaluator = Evaluator::with_options(&keys, options)?;
        assert!(evaluator.options().parallel);

        for width in [0, 5] {
            assert!(matches!(
                Evaluator::with_options(&keys, options.with_batch_width(width)),
                Err(Error::ParametersError(ParametersError::InvalidBatchWidth(w, 4))) if w == width
            ));
        }
        Ok(())
    }

    #[test]
    fn sum() -> Result<(), Box<dyn StdError>> {
        let par = ReferenceParameters::default_arc(2)?;
        let keys = SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut thread_rng())?;
        let evaluator = Evaluator::new(&keys)?;

        let cts = vec![keys.encrypt(&[1, -2])?, keys.encrypt(&[3, 4])?, keys.encrypt(&[-5, 6])?];
        assert_eq!(keys.decrypt(&evaluator.sum(cts)?)?, vec![-1, 8]);
        assert_eq!(keys.decrypt(&evaluator.sum(vec![])?)?, vec![0, 0]);
        Ok(())
    }

    #[test]
    fn empty_sum_spans_the_batch() -> Result<(), Box<dyn StdError>> {
        let par = ReferenceParameters::default_arc(4)?;
        let keys = SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut thread_rng())?;
        let options = EvaluationOptions::default().with_batch_width(3);
        let evaluator = Evaluator::with_options(&keys, options)?;

        let zero = evaluator.sum(vec![])?;
        assert_eq!(keys.decrypt(&zero)?, vec![0; 4]);
        let ct = keys.encrypt(&[7, -1, 2, 5])?;
        assert_eq!(keys.decrypt(&evaluator.add(&zero, &ct)?)?, vec![7, -1, 2, 5]);
        Ok(())
    }
}
