//! Keys of the reference engine.
//!
//! A secret key is a single residue `s`. A public key is a pair
//! `(b, a) = (-a·s, a)`, and an evaluation key is a pair `(k0, k1)` such that
//! `k0 + k1·s = s²`.

use std::fmt::Debug;
use std::sync::Arc;

use crate::proto::reference::{EvaluationKey as EvaluationKeyProto, PublicKey as PublicKeyProto};
use crate::reference::ReferenceParameters;
use crate::{Error, Result};
use fhe_cmp_traits::{DeserializeParametrized, FheParametrized, Serialize};
use prost::Message;
use rand::{CryptoRng, RngCore};
use zeroize_derive::{Zeroize, ZeroizeOnDrop};

/// Secret key of the reference engine.
#[derive(PartialEq, Eq, Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    #[zeroize(skip)]
    pub(crate) par: Arc<ReferenceParameters>,
    pub(crate) s: u64,
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("par", &self.par)
            .finish_non_exhaustive()
    }
}

impl SecretKey {
    /// Generate a random non-zero [`SecretKey`].
    pub fn random<R: RngCore + CryptoRng>(par: &Arc<ReferenceParameters>, rng: &mut R) -> Self {
        Self {
            par: par.clone(),
            s: par.plaintext_modulus().random_nonzero(rng),
        }
    }
}

impl FheParametrized for SecretKey {
    type Parameters = ReferenceParameters;
}

/// Public key of the reference engine.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PublicKey {
    pub(crate) par: Arc<ReferenceParameters>,
    pub(crate) b: u64,
    pub(crate) a: u64,
}

impl PublicKey {
    /// Generate the public key of `sk` with fresh randomness.
    pub fn new<R: RngCore + CryptoRng>(sk: &SecretKey, rng: &mut R) -> Self {
        let q = sk.par.plaintext_modulus();
        let a = q.random_nonzero(rng);
        Self {
            par: sk.par.clone(),
            b: q.neg(q.mul(a, sk.s)),
            a,
        }
    }
}

impl FheParametrized for PublicKey {
    type Parameters = ReferenceParameters;
}

impl Serialize for PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        PublicKeyProto {
            b: self.b,
            a: self.a,
        }
        .encode_to_vec()
    }
}

impl DeserializeParametrized for PublicKey {
    type Error = Error;

    fn from_bytes(bytes: &[u8], par: &Arc<ReferenceParameters>) -> Result<Self> {
        let proto = PublicKeyProto::decode(bytes).map_err(|_| Error::SerializationError)?;
        check_residues(&[proto.b, proto.a], par)?;
        Ok(Self {
            par: par.clone(),
            b: proto.b,
            a: proto.a,
        })
    }
}

/// Multiplication key of the reference engine.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EvaluationKey {
    pub(crate) par: Arc<ReferenceParameters>,
    pub(crate) k0: u64,
    pub(crate) k1: u64,
}

impl EvaluationKey {
    /// Generate the multiplication key of a single secret key.
    pub fn new<R: RngCore + CryptoRng>(sk: &SecretKey, rng: &mut R) -> Self {
        let q = sk.par.plaintext_modulus();
        let k1 = q.random_nonzero(rng);
        Self {
            par: sk.par.clone(),
            k0: q.sub(q.mul(sk.s, sk.s), q.mul(k1, sk.s)),
            k1,
        }
    }
}

impl FheParametrized for EvaluationKey {
    type Parameters = ReferenceParameters;
}

impl Serialize for EvaluationKey {
    fn to_bytes(&self) -> Vec<u8> {
        EvaluationKeyProto {
            k0: self.k0,
            k1: self.k1,
        }
        .encode_to_vec()
    }
}

impl DeserializeParametrized for EvaluationKey {
    type Error = Error;

    fn from_bytes(bytes: &[u8], par: &Arc<ReferenceParameters>) -> Result<Self> {
        let proto = EvaluationKeyProto::decode(bytes).map_err(|_| Error::SerializationError)?;
        check_residues(&[proto.k0, proto.k1], par)?;
        Ok(Self {
            par: par.clone(),
            k0: proto.k0,
            k1: proto.k1,
        })
    }
}

/// Ensure that deserialized values are residues modulo the plaintext modulus.
pub(crate) fn check_residues(values: &[u64], par: &ReferenceParameters) -> Result<()> {
    if values.iter().any(|v| *v >= par.plaintext()) {
        Err(Error::SerializationError)
    } else {
        Ok(())
    }
}
