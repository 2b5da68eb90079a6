//! Encrypted powers by square-and-multiply.

use crate::evaluator::Evaluator;
use crate::keys::{Ciphertext, KeyMaterial};
use crate::Result;
use fhe_cmp_util::{bit_length, set_bits};
use rayon::prelude::*;
use tracing::{debug, trace};

impl<'a, K: KeyMaterial> Evaluator<'a, K> {
    /// Repeated squares `[c, c^2, c^4, ..., c^(2^bit_length)]`.
    pub fn powers_of_two(
        &self,
        ct: &Ciphertext<K>,
        bit_length: usize,
    ) -> Result<Vec<Ciphertext<K>>> {
        let mut squares = Vec::with_capacity(bit_length + 1);
        squares.push(ct.clone());
        for i in 0..bit_length {
            let square = self.mul(&squares[i], &squares[i])?;
            squares.push(square);
        }
        Ok(squares)
    }

    /// All the powers `[c^1, ..., c^(p-1)]`, computed in slot 0 only.
    ///
    /// This takes `O(p log p)` multiplications, which dominate the cost of
    /// every operator.
    pub fn powers(&self, ct: &Ciphertext<K>) -> Result<Vec<Ciphertext<K>>> {
        self.powers_batched(ct, 1)
    }

    /// All the powers `[c^1, ..., c^(p-1)]`, computed in the first `width`
    /// slots; the other slots of the powers are zero.
    pub fn powers_batched(&self, ct: &Ciphertext<K>, width: usize) -> Result<Vec<Ciphertext<K>>> {
        self.check_width(width)?;
        let max = self.q.modulus() - 1;
        let squares = self.powers_of_two(ct, bit_length(max) - 1)?;
        debug!(
            "computing {} powers over {} slots from {} squares",
            max,
            width,
            squares.len()
        );
        if self.options.parallel {
            (1..=max)
                .into_par_iter()
                .map(|e| self.combine(&squares, e, width))
                .collect()
        } else {
            (1..=max)
                .map(|e| self.combine(&squares, e, width))
                .collect()
        }
    }

    /// The single power `c^e`, computed in the first slots of the batch.
    pub fn power(&self, ct: &Ciphertext<K>, e: u64) -> Result<Ciphertext<K>> {
        self.power_batched(ct, e, self.options.batch_width)
    }

    pub(crate) fn power_batched(
        &self,
        ct: &Ciphertext<K>,
        e: u64,
        width: usize,
    ) -> Result<Ciphertext<K>> {
        self.check_width(width)?;
        let squares = self.powers_of_two(ct, bit_length(e).saturating_sub(1))?;
        self.combine(&squares, e, width)
    }

    /// Product of the squares selected by the bits of `e`, starting from an
    /// encryption of 1 in the first `width` slots.
    fn combine(&self, squares: &[Ciphertext<K>], e: u64, width: usize) -> Result<Ciphertext<K>> {
        trace!("combining power {}", e);
        set_bits(e)
            .into_iter()
            .try_fold(self.constant(1, width)?, |acc, i| self.mul(&acc, &squares[i]))
    }
}

#[cfg(test)]
mod tests {
    use crate::evaluator::{EvaluationOptions, Evaluator};
    use crate::keys::{KeyMaterial, SinglePartyKeys};
    use crate::reference::{ReferenceEngine, ReferenceParametersBuilder};
    use fhe_cmp_math::zq::Modulus;
    use rand::thread_rng;
    use std::error::Error;

    fn keys(p: u64, slots: usize) -> Result<SinglePartyKeys<ReferenceEngine>, Box<dyn Error>> {
        let par = ReferenceParametersBuilder::new()
            .set_plaintext_modulus(p)
            .set_slots(slots)
            .build_arc()?;
        Ok(SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut thread_rng())?)
    }

    #[test]
    fn powers_of_two() -> Result<(), Box<dyn Error>> {
        let keys = keys(257, 1)?;
        let evaluator = Evaluator::new(&keys)?;
        let ct = keys.encrypt(&[3])?;
        let squares = evaluator.powers_of_two(&ct, 4)?;
        assert_eq!(squares.len(), 5);
        let q = Modulus::new(257)?;
        for (i, square) in squares.iter().enumerate() {
            assert_eq!(
                keys.decrypt_residues(square)?,
                vec![q.pow(3, 1 << i)]
            );
        }
        Ok(())
    }

    #[test]
    fn powers() -> Result<(), Box<dyn Error>> {
        for p in [7, 13, 17] {
            let keys = keys(p, 2)?;
            let q = Modulus::new(p)?;
            for parallel in [false, true] {
                let options = EvaluationOptions::default().with_parallel(parallel);
                let evaluator = Evaluator::with_options(&keys, options)?;
                for v in 0..p {
                    let ct = keys.encrypt_residues(&[v, 1])?;
                    let powers = evaluator.powers(&ct)?;
                    assert_eq!(powers.len() as u64, p - 1);
                    for (e, power) in powers.iter().enumerate() {
                        // Only slot 0 is evaluated.
                        assert_eq!(
                            keys.decrypt_residues(power)?,
                            vec![q.pow(v, e as u64 + 1), 0]
                        );
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn powers_batched() -> Result<(), Box<dyn Error>> {
        let keys = keys(11, 4)?;
        let q = Modulus::new(11)?;
        let evaluator = Evaluator::new(&keys)?;
        let ct = keys.encrypt_residues(&[2, 3, 4, 5])?;
        let powers = evaluator.powers_batched(&ct, 3)?;
        for (e, power) in powers.iter().enumerate() {
            let e = e as u64 + 1;
            assert_eq!(
                keys.decrypt_residues(power)?,
                vec![q.pow(2, e), q.pow(3, e), q.pow(4, e), 0]
            );
        }
        assert!(evaluator.powers_batched(&ct, 5).is_err());
        Ok(())
    }

    #[test]
    fn single_power() -> Result<(), Box<dyn Error>> {
        let keys = keys(257, 1)?;
        let q = Modulus::new(257)?;
        let evaluator = Evaluator::new(&keys)?;
        let ct = keys.encrypt(&[-5])?;
        for e in [0, 1, 2, 3, 100, 255, 256] {
            assert_eq!(
                keys.decrypt_residues(&evaluator.power(&ct, e)?)?,
                vec![q.pow(252, e)]
            );
        }
        Ok(())
    }
}
