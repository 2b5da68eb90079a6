//! Parameters of the reference engine.

use std::fmt::Debug;
use std::sync::Arc;

use crate::proto::reference::Parameters as ParametersProto;
use crate::{Error, ParametersError, Result};
use fhe_cmp_math::zq::Modulus;
use fhe_cmp_traits::{Deserialize, FheParameters, Serialize};
use prost::Message;
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Parameters of the reference engine: a plaintext modulus and a number of
/// slots per ciphertext.
#[derive(PartialEq, Eq, Clone)]
pub struct ReferenceParameters {
    plaintext: Modulus,
    slots: usize,
}

impl Debug for ReferenceParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceParameters")
            .field("plaintext", &self.plaintext.modulus())
            .field("slots", &self.slots)
            .finish()
    }
}

impl FheParameters for ReferenceParameters {}

impl ReferenceParameters {
    /// Largest number of slots of a ciphertext.
    pub const MAX_SLOTS: usize = 1 << 16;

    /// Returns the plaintext modulus.
    pub const fn plaintext(&self) -> u64 {
        self.plaintext.modulus()
    }

    /// Returns the plaintext modulus as a [`Modulus`].
    pub const fn plaintext_modulus(&self) -> &Modulus {
        &self.plaintext
    }

    /// Returns the number of slots.
    pub const fn slots(&self) -> usize {
        self.slots
    }

    /// Plain description of the parameters.
    pub fn config(&self) -> ParametersConfig {
        ParametersConfig {
            plaintext_modulus: self.plaintext(),
            slots: self.slots,
        }
    }

    /// Build parameters from a plain description.
    pub fn from_config(config: &ParametersConfig) -> Result<Arc<Self>> {
        ReferenceParametersBuilder::new()
            .set_plaintext_modulus(config.plaintext_modulus)
            .set_slots(config.slots)
            .build_arc()
    }

    /// Parameters with the plaintext modulus 257 used throughout the demos.
    ///
    /// Fails unless `slots` lies in `1..=MAX_SLOTS`.
    pub fn default_arc(slots: usize) -> Result<Arc<Self>> {
        ReferenceParametersBuilder::new()
            .set_plaintext_modulus(257)
            .set_slots(slots)
            .build_arc()
    }
}

/// Plain description of [`ReferenceParameters`], e.g. for a configuration
/// file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerdeSerialize, SerdeDeserialize)]
pub struct ParametersConfig {
    /// The plaintext modulus, an odd prime.
    pub plaintext_modulus: u64,
    /// The number of slots per ciphertext.
    #[serde(default = "default_slots")]
    pub slots: usize,
}

fn default_slots() -> usize {
    ReferenceParametersBuilder::DEFAULT_SLOTS
}

/// Builder for the parameters of the reference engine.
#[derive(Debug)]
pub struct ReferenceParametersBuilder {
    plaintext: u64,
    slots: usize,
}

impl ReferenceParametersBuilder {
    /// Number of slots when none is set.
    pub const DEFAULT_SLOTS: usize = 16;

    /// Creates a new instance of the builder
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            plaintext: Default::default(),
            slots: Self::DEFAULT_SLOTS,
        }
    }

    /// Sets the plaintext modulus. Building fails if the plaintext modulus
    /// is not an odd prime smaller than 2^31.
    pub fn set_plaintext_modulus(&mut self, plaintext: u64) -> &mut Self {
        self.plaintext = plaintext;
        self
    }

    /// Sets the number of slots.
    pub fn set_slots(&mut self, slots: usize) -> &mut Self {
        self.slots = slots;
        self
    }

    /// Build a new `ReferenceParameters` inside an `Arc`.
    pub fn build_arc(&self) -> Result<Arc<ReferenceParameters>> {
        self.build().map(Arc::new)
    }

    /// Build a new `ReferenceParameters`.
    pub fn build(&self) -> Result<ReferenceParameters> {
        let plaintext = Modulus::new(self.plaintext)
            .map_err(|e| Error::ParametersError(ParametersError::InvalidPlaintext(e.to_string())))?;

        if self.slots == 0 || self.slots > ReferenceParameters::MAX_SLOTS {
            return Err(Error::ParametersError(ParametersError::InvalidSlots(
                self.slots,
                ReferenceParameters::MAX_SLOTS,
            )));
        }

        Ok(ReferenceParameters {
            plaintext,
            slots: self.slots,
        })
    }
}

impl From<&ReferenceParameters> for ParametersProto {
    fn from(par: &ReferenceParameters) -> Self {
        ParametersProto {
            plaintext: par.plaintext(),
            slots: par.slots as u32,
        }
    }
}

impl Serialize for ReferenceParameters {
    fn to_bytes(&self) -> Vec<u8> {
        ParametersProto::from(self).encode_to_vec()
    }
}

impl Deserialize for ReferenceParameters {
    type Error = Error;

    fn try_deserialize(bytes: &[u8]) -> Result<Self> {
        let proto = ParametersProto::decode(bytes).map_err(|_| Error::SerializationError)?;
        ReferenceParametersBuilder::new()
            .set_plaintext_modulus(proto.plaintext)
            .set_slots(proto.slots as usize)
            .build()
    }
}
