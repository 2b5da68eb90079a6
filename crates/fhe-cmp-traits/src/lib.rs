#![crate_name = "fhe_cmp_traits"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Traits for the fhe-cmp library.
//!
//! The comparison layer never looks inside a ciphertext. Everything it needs
//! from an encryption scheme is captured by [`ArithmeticEngine`] (single key
//! arithmetic over `Z_p`) and [`ThresholdEngine`] (the key-combination and
//! multiparty decryption primitives).

use rand::{CryptoRng, RngCore};
use std::{fmt::Debug, sync::Arc};

/// The homomorphic encryption parameters.
pub trait FheParameters {}

/// Indicates that an object is parametrized.
pub trait FheParametrized {
    /// The type of the FHE parameters.
    type Parameters: FheParameters;
}

/// Serialization.
pub trait Serialize {
    /// Serialize `Self` into a vector of bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// Deserialization of a parametrized value.
pub trait DeserializeParametrized
where
    Self: Sized,
    Self: FheParametrized,
{
    /// The type of error returned.
    type Error;

    /// Attempt to deserialize from a vector of bytes
    fn from_bytes(bytes: &[u8], par: &Arc<Self::Parameters>) -> Result<Self, Self::Error>;
}

/// Deserialization without context.
pub trait Deserialize
where
    Self: Sized,
{
    /// The type of error returned.
    type Error;

    /// Attempt to deserialize from a vector of bytes
    fn try_deserialize(bytes: &[u8]) -> Result<Self, Self::Error>;
}

/// Arithmetic homomorphic encryption over `Z_p`.
///
/// Plaintexts are vectors of residues in `[0, p)`, one per slot. A value
/// shorter than [`ArithmeticEngine::slots`] is padded with zeros.
pub trait ArithmeticEngine: Send + Sync {
    /// Opaque ciphertext handle.
    type Ciphertext: Clone + Debug + Send + Sync;
    /// Public key used for encryption.
    type PublicKey: Clone + Debug + Send + Sync;
    /// Secret key; only ever borrowed by the engine.
    type SecretKey: Send + Sync;
    /// Key enabling ciphertext-ciphertext multiplication.
    type EvaluationKey: Clone + Debug + Send + Sync;
    /// Errors surfaced by the engine (e.g. exhausted noise budget).
    type Error: std::error::Error + Send + Sync + 'static;

    /// The plaintext modulus `p`.
    fn plaintext_modulus(&self) -> u64;

    /// Number of plaintext slots in a ciphertext.
    fn slots(&self) -> usize;

    /// Generate a fresh key pair.
    fn generate_key_pair<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::PublicKey, Self::SecretKey), Self::Error>;

    /// Generate the multiplication key of a single key holder.
    fn generate_evaluation_key<R: RngCore + CryptoRng>(
        &self,
        sk: &Self::SecretKey,
        rng: &mut R,
    ) -> Result<Self::EvaluationKey, Self::Error>;

    /// Encrypt a vector of residues under `pk`.
    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        pk: &Self::PublicKey,
        values: &[u64],
        rng: &mut R,
    ) -> Result<Self::Ciphertext, Self::Error>;

    /// Decrypt into a vector of [`ArithmeticEngine::slots`] residues.
    fn decrypt(&self, sk: &Self::SecretKey, ct: &Self::Ciphertext)
        -> Result<Vec<u64>, Self::Error>;

    /// Homomorphic addition.
    fn add(
        &self,
        lhs: &Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext, Self::Error>;

    /// Homomorphic subtraction.
    fn sub(
        &self,
        lhs: &Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext, Self::Error>;

    /// Homomorphic negation.
    fn negate(&self, ct: &Self::Ciphertext) -> Result<Self::Ciphertext, Self::Error>;

    /// Homomorphic slot-wise multiplication, relinearized with `ek`.
    fn multiply(
        &self,
        ek: &Self::EvaluationKey,
        lhs: &Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext, Self::Error>;

    /// Sum of the first `batch_size` slots, placed in slot 0.
    fn sum_slots(
        &self,
        ct: &Self::Ciphertext,
        batch_size: usize,
    ) -> Result<Self::Ciphertext, Self::Error>;
}

/// Multiparty primitives of an [`ArithmeticEngine`].
///
/// The secret key of the combined public key is the sum of the holders'
/// secret keys. The multiplication key for that sum is built in two passes:
/// the *added* key-switching hint accumulates every holder's secret, then
/// every holder multiplies its own secret into the added hint and the
/// resulting shares are summed.
pub trait ThresholdEngine: ArithmeticEngine {
    /// Additive key-switching hint.
    type KeySwitchHint: Clone + Debug + Send + Sync;
    /// A (partial) multiplication key under the combined secret.
    type MultKeyShare: Clone + Debug + Send + Sync;
    /// Partial decryption of a ciphertext by a single holder.
    type DecryptionShare: Clone + Debug + Send + Sync;

    /// Key-switching hint from `sk_from` onto `sk_to`, with fresh randomness.
    fn key_switch_hint<R: RngCore + CryptoRng>(
        &self,
        sk_from: &Self::SecretKey,
        sk_to: &Self::SecretKey,
        rng: &mut R,
    ) -> Result<Self::KeySwitchHint, Self::Error>;

    /// Generate a key pair whose public key extends the combined `pk`.
    fn multiparty_key_gen<R: RngCore + CryptoRng>(
        &self,
        pk: &Self::PublicKey,
        rng: &mut R,
    ) -> Result<(Self::PublicKey, Self::SecretKey), Self::Error>;

    /// Key-switching hint reusing the public randomness of `previous`.
    fn extend_key_switch_hint<R: RngCore + CryptoRng>(
        &self,
        sk_from: &Self::SecretKey,
        sk_to: &Self::SecretKey,
        previous: &Self::KeySwitchHint,
        rng: &mut R,
    ) -> Result<Self::KeySwitchHint, Self::Error>;

    /// Sum of two hints sharing the same public randomness.
    fn add_hints(
        &self,
        lhs: &Self::KeySwitchHint,
        rhs: &Self::KeySwitchHint,
    ) -> Result<Self::KeySwitchHint, Self::Error>;

    /// First multiplication key term, computed by the lead holder.
    fn seed_mult_key<R: RngCore + CryptoRng>(
        &self,
        sk: &Self::SecretKey,
        added: &Self::KeySwitchHint,
        rng: &mut R,
    ) -> Result<Self::MultKeyShare, Self::Error>;

    /// Multiplication key term of a main holder.
    fn extend_mult_key<R: RngCore + CryptoRng>(
        &self,
        sk: &Self::SecretKey,
        added: &Self::KeySwitchHint,
        rng: &mut R,
    ) -> Result<Self::MultKeyShare, Self::Error>;

    /// Sum of two multiplication key terms.
    fn add_mult_keys(
        &self,
        lhs: &Self::MultKeyShare,
        rhs: &Self::MultKeyShare,
    ) -> Result<Self::MultKeyShare, Self::Error>;

    /// Turn the fully accumulated key into a usable evaluation key.
    fn install_mult_key(
        &self,
        key: Self::MultKeyShare,
    ) -> Result<Self::EvaluationKey, Self::Error>;

    /// Lead partial decryption (holder 0).
    fn partial_decrypt_lead<R: RngCore + CryptoRng>(
        &self,
        ct: &Self::Ciphertext,
        sk: &Self::SecretKey,
        rng: &mut R,
    ) -> Result<Self::DecryptionShare, Self::Error>;

    /// Main partial decryption (holders 1..n).
    fn partial_decrypt_main<R: RngCore + CryptoRng>(
        &self,
        ct: &Self::Ciphertext,
        sk: &Self::SecretKey,
        rng: &mut R,
    ) -> Result<Self::DecryptionShare, Self::Error>;

    /// Combine the shares of every holder into residues.
    fn fuse_decryption(&self, shares: &[Self::DecryptionShare]) -> Result<Vec<u64>, Self::Error>;
}
