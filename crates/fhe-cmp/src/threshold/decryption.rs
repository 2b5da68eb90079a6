//! Decryption of a ciphertext by every holder of threshold keys.

use crate::keys::KeyMaterial;
use crate::threshold::{KeyHolder, ThresholdKeys};
use crate::{Error, Result};
use fhe_cmp_traits::{ArithmeticEngine, ThresholdEngine};
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// A decryption round: the lead holder decrypts first, then every main
/// holder in join order, then the shares are fused.
pub struct DecryptionRound<'a, E: ThresholdEngine> {
    keys: &'a ThresholdKeys<E>,
    ct: &'a <E as ArithmeticEngine>::Ciphertext,
    shares: Vec<E::DecryptionShare>,
}

impl<'a, E: ThresholdEngine> DecryptionRound<'a, E> {
    /// Start a round with the share of the lead holder.
    pub fn lead<R: RngCore + CryptoRng>(
        keys: &'a ThresholdKeys<E>,
        ct: &'a <E as ArithmeticEngine>::Ciphertext,
        lead: &KeyHolder<E>,
        rng: &mut R,
    ) -> Result<Self> {
        lead.check(keys.session(), 0)?;
        let share = keys
            .engine()
            .partial_decrypt_lead(ct, lead.secret_key(), rng)
            .map_err(Error::engine)?;
        Ok(Self {
            keys,
            ct,
            shares: vec![share],
        })
    }

    /// Add the share of the next main holder.
    pub fn main<R: RngCore + CryptoRng>(
        mut self,
        holder: &KeyHolder<E>,
        rng: &mut R,
    ) -> Result<Self> {
        let expected = self.shares.len();
        if expected >= self.keys.holders() {
            return Err(Error::sequence(format!(
                "holder {} presented after all {} shares",
                holder.index(),
                self.keys.holders()
            )));
        }
        holder.check(self.keys.session(), expected)?;
        let share = self
            .keys
            .engine()
            .partial_decrypt_main(self.ct, holder.secret_key(), rng)
            .map_err(Error::engine)?;
        self.shares.push(share);
        Ok(self)
    }

    /// The shares collected so far, lead first.
    pub fn shares(&self) -> &[E::DecryptionShare] {
        &self.shares
    }

    /// Fuse the shares of every holder into residues.
    pub fn fuse_residues(self) -> Result<Vec<u64>> {
        if self.shares.len() < self.keys.holders() {
            return Err(Error::sequence(format!(
                "missing the share of holder {}",
                self.shares.len()
            )));
        }
        debug!(
            "session {:?}: fusing {} shares",
            self.keys.session(),
            self.shares.len()
        );
        self.keys
            .engine()
            .fuse_decryption(&self.shares)
            .map_err(Error::engine)
    }

    /// Fuse the shares of every holder into centered integers.
    pub fn fuse(self) -> Result<Vec<i64>> {
        let q = *self.keys.modulus();
        Ok(q.center_vec(&self.fuse_residues()?))
    }
}

#[cfg(test)]
mod tests {
    use super::DecryptionRound;
    use crate::evaluator::Evaluator;
    use crate::keys::KeyMaterial;
    use crate::reference::{ReferenceEngine, ReferenceParameters, ReferenceParametersBuilder};
    use crate::threshold::{KeyCombination, KeyHolder, ThresholdKeys};
    use crate::Error;
    use rand::thread_rng;
    use std::error::Error as StdError;

    type Setup = (ThresholdKeys<ReferenceEngine>, Vec<KeyHolder<ReferenceEngine>>);

    fn combine(engine: ReferenceEngine, n: usize) -> Result<Setup, Box<dyn StdError>> {
        let mut rng = thread_rng();
        let (mut run, lead) = KeyCombination::init(engine, &mut rng)?;
        let mut holders = vec![lead];
        for _ in 1..n {
            let (next, holder) = run.join(&mut rng)?;
            run = next;
            holders.push(holder);
        }
        let mut added = run.accumulate_added(&holders[1], &mut rng)?;
        for holder in &holders[2..] {
            added = added.accumulate_added(holder, &mut rng)?;
        }
        let seeded = added.seed_final(&holders[0], &mut rng)?;
        let mut accumulated = seeded.accumulate_final(&holders[1], &mut rng)?;
        for holder in &holders[2..] {
            accumulated = accumulated.accumulate_final(holder, &mut rng)?;
        }
        Ok((accumulated.install()?, holders))
    }

    fn decrypt(
        keys: &ThresholdKeys<ReferenceEngine>,
        holders: &[KeyHolder<ReferenceEngine>],
        ct: &crate::reference::Ciphertext,
    ) -> Result<Vec<i64>, Box<dyn StdError>> {
        let mut rng = thread_rng();
        let mut round = DecryptionRound::lead(keys, ct, &holders[0], &mut rng)?;
        for holder in &holders[1..] {
            round = round.main(holder, &mut rng)?;
        }
        Ok(round.fuse()?)
    }

    #[test]
    fn two_holders_compare() -> Result<(), Box<dyn StdError>> {
        let par = ReferenceParameters::default_arc(1)?;
        let (keys, holders) = combine(ReferenceEngine::new(&par), 2)?;
        assert_eq!(keys.holders(), 2);

        let evaluator = Evaluator::new(&keys)?;
        let a = keys.encrypt(&[5])?;
        let b = keys.encrypt(&[3])?;
        let gt = evaluator.gt(&a, &b)?;
        assert_eq!(decrypt(&keys, &holders, &gt)?, vec![1]);
        assert_eq!(decrypt(&keys, &holders, &a)?, vec![5]);
        Ok(())
    }

    #[test]
    fn several_holders() -> Result<(), Box<dyn StdError>> {
        let par = ReferenceParametersBuilder::new()
            .set_plaintext_modulus(13)
            .set_slots(2)
            .build_arc()?;
        for n in 2..=5 {
            let (keys, holders) = combine(ReferenceEngine::new(&par), n)?;
            let evaluator = Evaluator::new(&keys)?;
            for (x, y) in [(-3, 2), (3, -3), (2, 2)] {
                let a = keys.encrypt(&[x])?;
                let b = keys.encrypt(&[y])?;
                let max = evaluator.max(&a, &b)?;
                let min = evaluator.min(&a, &b)?;
                assert_eq!(decrypt(&keys, &holders, &max)?, vec![x.max(y), 0]);
                assert_eq!(decrypt(&keys, &holders, &min)?, vec![x.min(y), 0]);
            }
            let a = keys.encrypt(&[6])?;
            let quotient = evaluator.divide(&a, -4)?;
            assert_eq!(decrypt(&keys, &holders, &quotient)?, vec![-1, 0]);
        }
        Ok(())
    }

    #[test]
    fn sequence_violations() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let par = ReferenceParametersBuilder::new()
            .set_plaintext_modulus(17)
            .build_arc()?;
        let (keys, holders) = combine(ReferenceEngine::new(&par), 3)?;
        let (_, strangers) = combine(ReferenceEngine::new(&par), 3)?;
        let ct = keys.encrypt(&[4])?;

        // The lead share must come from holder 0 of the same session.
        assert!(matches!(
            DecryptionRound::lead(&keys, &ct, &holders[1], &mut rng),
            Err(Error::ProtocolSequenceViolation(_))
        ));
        assert!(matches!(
            DecryptionRound::lead(&keys, &ct, &strangers[0], &mut rng),
            Err(Error::ProtocolSequenceViolation(_))
        ));

        // Main shares come in join order, once each.
        let round = DecryptionRound::lead(&keys, &ct, &holders[0], &mut rng)?;
        assert!(matches!(
            round.main(&holders[2], &mut rng),
            Err(Error::ProtocolSequenceViolation(_))
        ));
        let round = DecryptionRound::lead(&keys, &ct, &holders[0], &mut rng)?;
        assert!(matches!(
            round.main(&holders[0], &mut rng),
            Err(Error::ProtocolSequenceViolation(_))
        ));
        let round = DecryptionRound::lead(&keys, &ct, &holders[0], &mut rng)?;
        assert!(matches!(
            round.main(&strangers[1], &mut rng),
            Err(Error::ProtocolSequenceViolation(_))
        ));
        let round = DecryptionRound::lead(&keys, &ct, &holders[0], &mut rng)?
            .main(&holders[1], &mut rng)?;
        assert_eq!(round.shares().len(), 2);
        assert!(matches!(
            round.main(&holders[1], &mut rng),
            Err(Error::ProtocolSequenceViolation(_))
        ));

        // Every share is needed.
        let round = DecryptionRound::lead(&keys, &ct, &holders[0], &mut rng)?
            .main(&holders[1], &mut rng)?;
        assert!(matches!(round.fuse(), Err(Error::ProtocolSequenceViolation(_))));

        let round = DecryptionRound::lead(&keys, &ct, &holders[0], &mut rng)?
            .main(&holders[1], &mut rng)?
            .main(&holders[2], &mut rng)?;
        assert!(matches!(
            round.main(&holders[2], &mut rng),
            Err(Error::ProtocolSequenceViolation(_))
        ));
        Ok(())
    }
}
