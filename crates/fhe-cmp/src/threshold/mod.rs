//! Threshold keys: key combination and multiparty decryption.
//!
//! The secret key is shared additively among the holders. Every holder
//! takes part in the combination of the keys, and in every decryption.

mod decryption;
mod key_combination;

pub use decryption::DecryptionRound;
pub use key_combination::{
    AddedAccumulated, FinalAccumulated, FinalSeeded, Joined, KeyCombination, KeyHolder, SessionId,
    ThresholdKeys,
};
