//! Integer division by a public or an encrypted divisor.
//!
//! Both the dividend and the divisor are read as centered integers and the
//! quotient is rounded toward zero: `-7 / 2 = -3` and `7 / -2 = -3`.

use crate::evaluator::Evaluator;
use crate::keys::{Ciphertext, KeyMaterial};
use crate::{Error, Result};
use fhe_cmp_math::interpolation::InterpolationTable;
use fhe_cmp_util::in_centered_domain;
use rayon::prelude::*;
use tracing::debug;

impl<'a, K: KeyMaterial> Evaluator<'a, K> {
    /// Divide an encrypted dividend by a public divisor.
    ///
    /// Fails with [`Error::DivisionUndefined`] when the divisor is zero, and
    /// with [`Error::DomainOutOfRange`] when it lies outside of the domain,
    /// before any homomorphic operation.
    pub fn divide(&self, dividend: &Ciphertext<K>, divisor: i64) -> Result<Ciphertext<K>> {
        if divisor == 0 {
            return Err(Error::division_by_zero());
        }
        if !in_centered_domain(divisor, self.q.modulus()) {
            return Err(Error::out_of_domain(divisor, self.q.modulus()));
        }
        let table = InterpolationTable::integer_division(divisor, &self.q)?;
        self.apply(dividend, &table)
    }

    /// Divide an encrypted dividend by an encrypted divisor.
    ///
    /// Every candidate divisor is tried: for each non-zero residue `i`, the
    /// quotient by `i` is multiplied by an encryption of `divisor = i`, and
    /// the products are summed. This costs `O(p)` polynomial evaluations, or
    /// `O(p^2 log p)` multiplications. A zero divisor matches no candidate
    /// and yields an encryption of zero.
    pub fn divide_private(
        &self,
        dividend: &Ciphertext<K>,
        divisor: &Ciphertext<K>,
    ) -> Result<Ciphertext<K>> {
        let width = self.options.batch_width;
        let p = self.q.modulus();
        debug!("private division over {} candidates", p - 1);

        let dividend_powers = self.powers_batched(dividend, width)?;
        let equal_zero = InterpolationTable::equal_zero(&self.q).interpolate()?;
        let equal_zero = self.encrypt_polynomial(&equal_zero)?;

        let candidate = |i: u64| -> Result<Ciphertext<K>> {
            let table = InterpolationTable::integer_division(self.q.center(i), &self.q)?;
            let quotient = self.evaluate_table(&dividend_powers, &table)?;
            let difference = self.sub(&self.constant(i, width)?, divisor)?;
            let difference_powers = self.powers_batched(&difference, width)?;
            let indicator = self.evaluate(&difference_powers, &equal_zero)?;
            self.mul(&indicator, &quotient)
        };

        let terms = if self.options.parallel {
            (1..p)
                .into_par_iter()
                .map(candidate)
                .collect::<Result<Vec<_>>>()?
        } else {
            (1..p).map(candidate).collect::<Result<Vec<_>>>()?
        };
        self.sum(terms)
    }
}

#[cfg(test)]
mod tests {
    use crate::evaluator::{EvaluationOptions, Evaluator};
    use crate::keys::{KeyMaterial, SinglePartyKeys};
    use crate::reference::{ReferenceEngine, ReferenceParameters, ReferenceParametersBuilder};
    use crate::Error;
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
    fn public_divisor() -> Result<(), Box<dyn StdError>> {
        let keys = keys(11, 1)?;
        let evaluator = Evaluator::new(&keys)?;
        for d in (-5..=5).filter(|d| *d != 0) {
            for a in -5..=5 {
                let ct = keys.encrypt(&[a])?;
                assert_eq!(
                    keys.decrypt(&evaluator.divide(&ct, d)?)?,
                    vec![a / d],
                    "{a} / {d}"
                );
            }
        }
        Ok(())
    }

    #[test]
    fn public_divisor_spot_checks() -> Result<(), Box<dyn StdError>> {
        let par = ReferenceParameters::default_arc(1)?;
        let keys = SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut thread_rng())?;
        let evaluator = Evaluator::new(&keys)?;
        let cases = [(100, 7, 14), (-100, 7, -14), (-7, 2, -3), (7, -2, -3), (128, -128, -1)];
        for (a, d, q) in cases {
            let ct = keys.encrypt(&[a])?;
            assert_eq!(keys.decrypt(&evaluator.divide(&ct, d)?)?, vec![q]);
        }
        Ok(())
    }

    #[test]
    fn invalid_public_divisor() -> Result<(), Box<dyn StdError>> {
        let keys = keys(11, 1)?;
        let evaluator = Evaluator::new(&keys)?;
        let ct = keys.encrypt(&[4])?;
        assert!(matches!(
            evaluator.divide(&ct, 0),
            Err(Error::DivisionUndefined(_))
        ));
        assert!(matches!(
            evaluator.divide(&ct, 6),
            Err(Error::DomainOutOfRange { value: 6, bound: 5 })
        ));
        Ok(())
    }

    #[test]
    fn private_divisor_agrees_with_public_divisor() -> Result<(), Box<dyn StdError>> {
        let keys = keys(7, 1)?;
        for parallel in [false, true] {
            let options = EvaluationOptions::default().with_parallel(parallel);
            let evaluator = Evaluator::with_options(&keys, options)?;
            for d in -3..=3 {
                let divisor = keys.encrypt(&[d])?;
                for a in -3..=3 {
                    let dividend = keys.encrypt(&[a])?;
                    let private = evaluator.divide_private(&dividend, &divisor)?;
                    let private = keys.decrypt(&private)?;
                    if d == 0 {
                        assert_eq!(private, vec![0]);
                    } else {
                        let public = keys.decrypt(&evaluator.divide(&dividend, d)?)?;
                        assert_eq!(private, public, "{a} / {d}");
                        assert_eq!(private, vec![a / d]);
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn private_divisor_batched() -> Result<(), Box<dyn StdError>> {
        let keys = keys(11, 3)?;
        let options = EvaluationOptions::default().with_batch_width(3);
        let evaluator = Evaluator::with_options(&keys, options)?;
        let dividend = keys.encrypt(&[5, -4, 3])?;
        let divisor = keys.encrypt(&[2, 3, 0])?;
        assert_eq!(
            keys.decrypt(&evaluator.divide_private(&dividend, &divisor)?)?,
            vec![2, -1, 0]
        );
        Ok(())
    }
}
