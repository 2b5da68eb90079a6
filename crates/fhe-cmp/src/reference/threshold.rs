//! Multiparty objects of the reference engine.

use std::sync::Arc;

use crate::proto::reference::{
    DecryptionShare as DecryptionShareProto, KeySwitchHint as KeySwitchHintProto,
    MultKeyShare as MultKeyShareProto,
};
use crate::reference::keys::check_residues;
use crate::reference::ReferenceParameters;
use crate::{Error, Result};
use fhe_cmp_traits::{DeserializeParametrized, FheParametrized, Serialize};
use prost::Message;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed of a common random element.
pub type Seed = <ChaCha8Rng as SeedableRng>::Seed;

/// A non-zero residue sampled from a public seed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CommonRandomElement {
    seed: Seed,
}

impl CommonRandomElement {
    /// Generate a new random element.
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = Seed::default();
        rng.fill_bytes(&mut seed);
        Self { seed }
    }

    /// Generate the element from a shared seed.
    pub fn new_deterministic(seed: Seed) -> Self {
        Self { seed }
    }

    /// The seed of the element.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// The residue modulo the plaintext modulus of `par`.
    pub fn value(&self, par: &ReferenceParameters) -> u64 {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        par.plaintext_modulus().random_nonzero(&mut rng)
    }
}

/// Key-switching hint from a secret `s_from` onto a secret `s_to`:
/// `(h0, a) = (-a·s_to + s_from, a)`, where `a` is a common random element.
///
/// Hints sharing the same common random element can be added together.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct KeySwitchHint {
    pub(crate) par: Arc<ReferenceParameters>,
    pub(crate) h0: u64,
    pub(crate) crp: CommonRandomElement,
}

impl KeySwitchHint {
    /// The common random element of the hint.
    pub fn common_random_element(&self) -> &CommonRandomElement {
        &self.crp
    }

    pub(crate) fn a(&self) -> u64 {
        self.crp.value(&self.par)
    }
}

impl FheParametrized for KeySwitchHint {
    type Parameters = ReferenceParameters;
}

impl Serialize for KeySwitchHint {
    fn to_bytes(&self) -> Vec<u8> {
        KeySwitchHintProto {
            h0: self.h0,
            seed: self.crp.seed.to_vec(),
        }
        .encode_to_vec()
    }
}

impl DeserializeParametrized for KeySwitchHint {
    type Error = Error;

    fn from_bytes(bytes: &[u8], par: &Arc<ReferenceParameters>) -> Result<Self> {
        let proto = KeySwitchHintProto::decode(bytes).map_err(|_| Error::SerializationError)?;
        check_residues(&[proto.h0], par)?;
        let seed: Seed = proto
            .seed
            .try_into()
            .map_err(|_| Error::SerializationError)?;
        Ok(Self {
            par: par.clone(),
            h0: proto.h0,
            crp: CommonRandomElement::new_deterministic(seed),
        })
    }
}

/// A term of the multiplication key under the combined secret.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MultKeyShare {
    pub(crate) par: Arc<ReferenceParameters>,
    pub(crate) m0: u64,
    pub(crate) m1: u64,
}

impl FheParametrized for MultKeyShare {
    type Parameters = ReferenceParameters;
}

impl Serialize for MultKeyShare {
    fn to_bytes(&self) -> Vec<u8> {
        MultKeyShareProto {
            m0: self.m0,
            m1: self.m1,
        }
        .encode_to_vec()
    }
}

impl DeserializeParametrized for MultKeyShare {
    type Error = Error;

    fn from_bytes(bytes: &[u8], par: &Arc<ReferenceParameters>) -> Result<Self> {
        let proto = MultKeyShareProto::decode(bytes).map_err(|_| Error::SerializationError)?;
        check_residues(&[proto.m0, proto.m1], par)?;
        Ok(Self {
            par: par.clone(),
            m0: proto.m0,
            m1: proto.m1,
        })
    }
}

/// Role of a holder in a multiparty decryption.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ShareRole {
    /// The share of the first holder, which carries the `c0` component.
    Lead,
    /// The share of any other holder.
    Main,
}

/// Partial decryption of a ciphertext by a single holder.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DecryptionShare {
    pub(crate) par: Arc<ReferenceParameters>,
    pub(crate) role: ShareRole,
    pub(crate) values: Vec<u64>,
}

impl DecryptionShare {
    /// The role of the holder who produced the share.
    pub fn role(&self) -> ShareRole {
        self.role
    }
}

impl FheParametrized for DecryptionShare {
    type Parameters = ReferenceParameters;
}

impl Serialize for DecryptionShare {
    fn to_bytes(&self) -> Vec<u8> {
        DecryptionShareProto {
            lead: self.role == ShareRole::Lead,
            values: self.values.clone(),
        }
        .encode_to_vec()
    }
}

impl DeserializeParametrized for DecryptionShare {
    type Error = Error;

    fn from_bytes(bytes: &[u8], par: &Arc<ReferenceParameters>) -> Result<Self> {
        let proto = DecryptionShareProto::decode(bytes).map_err(|_| Error::SerializationError)?;
        if proto.values.len() != par.slots() {
            return Err(Error::SerializationError);
        }
        check_residues(&proto.values, par)?;
        Ok(Self {
            par: par.clone(),
            role: if proto.lead {
                ShareRole::Lead
            } else {
                ShareRole::Main
            },
            values: proto.values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CommonRandomElement, DecryptionShare, KeySwitchHint, MultKeyShare, ShareRole};
    use crate::reference::ReferenceParameters;
    use fhe_cmp_traits::{DeserializeParametrized, Serialize};
    use rand::thread_rng;
    use std::error::Error;

    #[test]
    fn common_random_element() {
        let par = ReferenceParameters::default_arc(4).unwrap();
        let crp = CommonRandomElement::new(&mut thread_rng());
        let same = CommonRandomElement::new_deterministic(*crp.seed());
        assert_eq!(crp.value(&par), same.value(&par));
        assert_ne!(crp.value(&par), 0);
    }

    #[test]
    fn serialize() -> Result<(), Box<dyn Error>> {
        let par = ReferenceParameters::default_arc(4)?;

        let hint = KeySwitchHint {
            par: par.clone(),
            h0: 12,
            crp: CommonRandomElement::new(&mut thread_rng()),
        };
        assert_eq!(KeySwitchHint::from_bytes(&hint.to_bytes(), &par)?, hint);

        let key = MultKeyShare {
            par: par.clone(),
            m0: 3,
            m1: 256,
        };
        assert_eq!(MultKeyShare::from_bytes(&key.to_bytes(), &par)?, key);

        for role in [ShareRole::Lead, ShareRole::Main] {
            let share = DecryptionShare {
                par: par.clone(),
                role,
                values: vec![0, 1, 2, 3],
            };
            assert_eq!(DecryptionShare::from_bytes(&share.to_bytes(), &par)?, share);
        }

        let short = DecryptionShare {
            par: par.clone(),
            role: ShareRole::Main,
            values: vec![0, 1],
        };
        assert!(DecryptionShare::from_bytes(&short.to_bytes(), &par).is_err());
        Ok(())
    }
}
