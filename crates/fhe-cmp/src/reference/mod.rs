//! A noise-free reference engine over `Z_p`.
//!
//! The engine implements [`fhe_cmp_traits::ArithmeticEngine`] and
//! [`fhe_cmp_traits::ThresholdEngine`] exactly, with a scalar secret and
//! slot-wise ciphertexts. It is meant for testing and demonstrating the
//! protocols of this crate and is **not secure**.

mod ciphertext;
mod engine;
mod keys;
mod parameters;
mod threshold;

pub use ciphertext::Ciphertext;
pub use engine::ReferenceEngine;
pub use keys::{EvaluationKey, PublicKey, SecretKey};
pub use parameters::{ParametersConfig, ReferenceParameters, ReferenceParametersBuilder};
pub use threshold::{
    CommonRandomElement, DecryptionShare, KeySwitchHint, MultKeyShare, Seed, ShareRole,
};
