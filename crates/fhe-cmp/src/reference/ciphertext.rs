//! Ciphertexts of the reference engine.

use std::sync::Arc;

use crate::proto::reference::Ciphertext as CiphertextProto;
use crate::reference::keys::check_residues;
use crate::reference::ReferenceParameters;
use crate::{Error, Result};
use fhe_cmp_traits::{DeserializeParametrized, FheParametrized, Serialize};
use prost::Message;

/// A ciphertext of the reference engine.
///
/// Slot `j` holds a pair `(c0[j], c1[j])` that decrypts to `c0[j] + c1[j]·s`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Ciphertext {
    pub(crate) par: Arc<ReferenceParameters>,
    pub(crate) c0: Vec<u64>,
    pub(crate) c1: Vec<u64>,
}

impl Ciphertext {
    /// The parameters of the ciphertext.
    pub fn parameters(&self) -> &Arc<ReferenceParameters> {
        &self.par
    }

    /// Number of slots of the ciphertext.
    pub fn len(&self) -> usize {
        self.c0.len()
    }

    /// Whether the ciphertext has no slot.
    pub fn is_empty(&self) -> bool {
        self.c0.is_empty()
    }
}

impl FheParametrized for Ciphertext {
    type Parameters = ReferenceParameters;
}

impl From<&Ciphertext> for CiphertextProto {
    fn from(ct: &Ciphertext) -> Self {
        CiphertextProto {
            c0: ct.c0.clone(),
            c1: ct.c1.clone(),
        }
    }
}

impl Serialize for Ciphertext {
    fn to_bytes(&self) -> Vec<u8> {
        CiphertextProto::from(self).encode_to_vec()
    }
}

impl DeserializeParametrized for Ciphertext {
    type Error = Error;

    fn from_bytes(bytes: &[u8], par: &Arc<ReferenceParameters>) -> Result<Self> {
        let proto = CiphertextProto::decode(bytes).map_err(|_| Error::SerializationError)?;
        if proto.c0.len() != par.slots() || proto.c1.len() != par.slots() {
            return Err(Error::SerializationError);
        }
        check_residues(&proto.c0, par)?;
        check_residues(&proto.c1, par)?;
        Ok(Self {
            par: par.clone(),
            c0: proto.c0,
            c1: proto.c1,
        })
    }
}
