//! Key material: the encryption entry points shared by single-party and
//! threshold keys.

use crate::{Error, Result};
use fhe_cmp_math::zq::Modulus;
use fhe_cmp_traits::ArithmeticEngine;
use rand::{thread_rng, CryptoRng, RngCore};

/// The ciphertext type of a [`KeyMaterial`].
pub type Ciphertext<K> = <<K as KeyMaterial>::Engine as ArithmeticEngine>::Ciphertext;

/// Keys under which values can be encrypted and multiplied.
///
/// The comparison and division operators are written once against this
/// trait, and work identically with [`SinglePartyKeys`] and
/// [`crate::threshold::ThresholdKeys`].
pub trait KeyMaterial: Send + Sync {
    /// The engine performing the homomorphic arithmetic.
    type Engine: ArithmeticEngine;

    /// The engine.
    fn engine(&self) -> &Self::Engine;

    /// The public key used for encryption.
    fn public_key(&self) -> &<Self::Engine as ArithmeticEngine>::PublicKey;

    /// The key used for homomorphic multiplication.
    fn evaluation_key(&self) -> &<Self::Engine as ArithmeticEngine>::EvaluationKey;

    /// The plaintext modulus, validated once when the keys are created.
    fn modulus(&self) -> &Modulus;

    /// Encrypt residues modulo the plaintext modulus.
    fn encrypt_residues_with_rng<R: RngCore + CryptoRng>(
        &self,
        values: &[u64],
        rng: &mut R,
    ) -> Result<<Self::Engine as ArithmeticEngine>::Ciphertext> {
        self.engine()
            .encrypt(self.public_key(), values, rng)
            .map_err(Error::engine)
    }

    /// Encrypt residues modulo the plaintext modulus.
    fn encrypt_residues(
        &self,
        values: &[u64],
    ) -> Result<<Self::Engine as ArithmeticEngine>::Ciphertext> {
        self.encrypt_residues_with_rng(values, &mut thread_rng())
    }

    /// Encrypt integers of the centered domain `[-(p-1)/2, (p-1)/2]`.
    ///
    /// Returns [`Error::DomainOutOfRange`] for the first value outside of
    /// the domain, before anything is encrypted.
    fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        values: &[i64],
        rng: &mut R,
    ) -> Result<<Self::Engine as ArithmeticEngine>::Ciphertext> {
        let bound = self.modulus().half_width();
        let residues = bounded_residues(self.modulus(), values, bound)?;
        self.encrypt_residues_with_rng(&residues, rng)
    }

    /// Encrypt integers of the centered domain `[-(p-1)/2, (p-1)/2]`.
    fn encrypt(&self, values: &[i64]) -> Result<<Self::Engine as ArithmeticEngine>::Ciphertext> {
        self.encrypt_with_rng(values, &mut thread_rng())
    }

    /// Encrypt operands of the two-operand comparisons, which lie in
    /// `[-(p-1)/4, (p-1)/4]`.
    ///
    /// The difference of two such operands stays in the centered domain,
    /// so `equal`, `gt`, `gteq`, `lt`, `lteq`, `max` and `min` are exact on
    /// them. Returns [`Error::DomainOutOfRange`] with the bound `(p-1)/4`
    /// for the first value outside of that range.
    fn encrypt_comparable_with_rng<R: RngCore + CryptoRng>(
        &self,
        values: &[i64],
        rng: &mut R,
    ) -> Result<<Self::Engine as ArithmeticEngine>::Ciphertext> {
        let bound = comparison_bound(self.modulus());
        let residues = bounded_residues(self.modulus(), values, bound)?;
        self.encrypt_residues_with_rng(&residues, rng)
    }

    /// Encrypt operands of the two-operand comparisons, which lie in
    /// `[-(p-1)/4, (p-1)/4]`.
    fn encrypt_comparable(
        &self,
        values: &[i64],
    ) -> Result<<Self::Engine as ArithmeticEngine>::Ciphertext> {
        self.encrypt_comparable_with_rng(values, &mut thread_rng())
    }
}

/// Largest absolute value of the operands whose differences stay in the
/// centered domain: `(p-1)/4`.
pub fn comparison_bound(q: &Modulus) -> u64 {
    q.half_width() >> 1
}

fn bounded_residues(q: &Modulus, values: &[i64], bound: u64) -> Result<Vec<u64>> {
    values
        .iter()
        .map(|v| {
            if v.unsigned_abs() <= bound {
                Ok(q.reduce_i64(*v))
            } else {
                Err(Error::DomainOutOfRange { value: *v, bound })
            }
        })
        .collect()
}

/// Keys of a single holder, who can decrypt on their own.
pub struct SinglePartyKeys<E: ArithmeticEngine> {
    engine: E,
    q: Modulus,
    pk: E::PublicKey,
    sk: E::SecretKey,
    ek: E::EvaluationKey,
}

impl<E: ArithmeticEngine> SinglePartyKeys<E> {
    /// Generate a key pair and its multiplication key.
    pub fn generate<R: RngCore + CryptoRng>(engine: E, rng: &mut R) -> Result<Self> {
        let q = Modulus::new(engine.plaintext_modulus())?;
        let (pk, sk) = engine.generate_key_pair(rng).map_err(Error::engine)?;
        let ek = engine
            .generate_evaluation_key(&sk, rng)
            .map_err(Error::engine)?;
        Ok(Self {
            engine,
            q,
            pk,
            sk,
            ek,
        })
    }

    /// The secret key.
    pub fn secret_key(&self) -> &E::SecretKey {
        &self.sk
    }

    /// Decrypt into residues modulo the plaintext modulus.
    pub fn decrypt_residues(&self, ct: &E::Ciphertext) -> Result<Vec<u64>> {
        self.engine.decrypt(&self.sk, ct).map_err(Error::engine)
    }

    /// Decrypt into centered integers.
    pub fn decrypt(&self, ct: &E::Ciphertext) -> Result<Vec<i64>> {
        Ok(self.q.center_vec(&self.decrypt_residues(ct)?))
    }
}

impl<E: ArithmeticEngine> KeyMaterial for SinglePartyKeys<E> {
    type Engine = E;

    fn engine(&self) -> &E {
        &self.engine
    }

    fn public_key(&self) -> &E::PublicKey {
        &self.pk
    }

    fn modulus(&self) -> &Modulus {
        &self.q
    }

    fn evaluation_key(&self) -> &E::EvaluationKey {
        &self.ek
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyMaterial, SinglePartyKeys};
    use crate::reference::{ReferenceEngine, ReferenceParameters};
    use crate::Error;
    use rand::thread_rng;
    use std::error::Error as StdError;

    #[test]
    fn encrypt_decrypt() -> Result<(), Box<dyn StdError>> {
        let par = ReferenceParameters::default_arc(1)?;
        let keys = SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut thread_rng())?;
        assert_eq!(keys.modulus().modulus(), 257);
        assert!(std::ptr::eq(keys.modulus(), keys.modulus()));
        for v in -128..=128 {
            let ct = keys.encrypt(&[v])?;
            assert_eq!(keys.decrypt(&ct)?, vec![v]);
        }
        let ct = keys.encrypt_residues(&[200])?;
        assert_eq!(keys.decrypt_residues(&ct)?, vec![200]);
        assert_eq!(keys.decrypt(&ct)?, vec![-57]);
        Ok(())
    }

    #[test]
    fn out_of_domain() -> Result<(), Box<dyn StdError>> {
        let par = ReferenceParameters::default_arc(4)?;
        let keys = SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut thread_rng())?;
        for v in [129, -129, 257, i64::MIN] {
            assert!(matches!(
                keys.encrypt(&[0, v]),
                Err(Error::DomainOutOfRange { value, bound: 128 }) if value == v
            ));
        }
        assert!(matches!(
            keys.encrypt(&[1, 2, 3, 4, 5]),
            Err(Error::TooManyValues(5, 4))
        ));
        Ok(())
    }
}
