//! Combination of the keys of several holders into a single public key and
//! a single multiplication key.
//!
//! The protocol is a chain of states, each transition consuming the previous
//! state:
//!
//! ```text
//! init -> join* -> accumulate_added* -> seed_final -> accumulate_final* -> install
//! ```
//!
//! Calling a transition out of phase does not compile. Presenting a holder out
//! of turn, twice, or from another session is rejected with
//! [`Error::ProtocolSequenceViolation`] before the engine is invoked.

use std::fmt::Debug;

use crate::keys::KeyMaterial;
use crate::{Error, Result};
use fhe_cmp_math::zq::Modulus;
use fhe_cmp_traits::{ArithmeticEngine, ThresholdEngine};
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Identifier of a protocol run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(rng.next_u64())
    }
}

/// The key share of one holder.
///
/// Holder 0 is the lead holder; the others are main holders, indexed in
/// join order.
pub struct KeyHolder<E: ThresholdEngine> {
    index: usize,
    session: SessionId,
    sk: E::SecretKey,
    pk: E::PublicKey,
}

impl<E: ThresholdEngine> Debug for KeyHolder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyHolder")
            .field("index", &self.index)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<E: ThresholdEngine> KeyHolder<E> {
    /// Index of the holder.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this is the lead holder.
    pub fn is_lead(&self) -> bool {
        self.index == 0
    }

    /// Session in which the holder joined.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The combined public key obtained when the holder joined.
    pub fn public_key(&self) -> &E::PublicKey {
        &self.pk
    }

    pub(crate) fn secret_key(&self) -> &E::SecretKey {
        &self.sk
    }

    pub(crate) fn check(&self, session: SessionId, expected: usize) -> Result<()> {
        if self.session != session {
            Err(Error::foreign_holder(self.index))
        } else if self.index != expected {
            Err(Error::unexpected_holder(self.index, expected))
        } else {
            Ok(())
        }
    }
}

/// Holders are joining; the lead hint is ready.
pub struct Joined<E: ThresholdEngine> {
    lead_hint: E::KeySwitchHint,
}

/// The added hint includes the holders `0..=k`.
pub struct AddedAccumulated<E: ThresholdEngine> {
    added: E::KeySwitchHint,
    k: usize,
}

/// The lead holder seeded the multiplication key.
pub struct FinalSeeded<E: ThresholdEngine> {
    added: E::KeySwitchHint,
    key: E::MultKeyShare,
}

/// The multiplication key includes the holders `0..=k`.
pub struct FinalAccumulated<E: ThresholdEngine> {
    added: E::KeySwitchHint,
    key: E::MultKeyShare,
    k: usize,
}

/// A run of the key-combination protocol, in state `S`.
pub struct KeyCombination<E: ThresholdEngine, S> {
    engine: E,
    session: SessionId,
    public_keys: Vec<E::PublicKey>,
    state: S,
}

impl<E: ThresholdEngine, S> KeyCombination<E, S> {
    /// Number of holders who joined.
    pub fn holders(&self) -> usize {
        self.public_keys.len()
    }

    /// The session of the run.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The current combined public key.
    pub fn public_key(&self) -> &E::PublicKey {
        // There is always at least the key of the lead holder.
        &self.public_keys[self.public_keys.len() - 1]
    }

    /// The successive combined public keys, one per holder.
    pub fn public_keys(&self) -> &[E::PublicKey] {
        &self.public_keys
    }

    fn map_state<T, F: FnOnce(S) -> T>(self, f: F) -> KeyCombination<E, T> {
        KeyCombination {
            engine: self.engine,
            session: self.session,
            public_keys: self.public_keys,
            state: f(self.state),
        }
    }

    fn check_holder(&self, holder: &KeyHolder<E>, expected: usize) -> Result<()> {
        if expected >= self.holders() {
            return Err(Error::sequence(format!(
                "holder {} presented after all {} holders",
                holder.index,
                self.holders()
            )));
        }
        holder.check(self.session, expected)
    }

    fn check_complete(&self, k: usize, phase: &str) -> Result<()> {
        if k + 1 < self.holders() {
            Err(Error::sequence(format!(
                "holder {} has not contributed to the {} key",
                k + 1,
                phase
            )))
        } else {
            Ok(())
        }
    }
}

impl<E: ThresholdEngine> KeyCombination<E, Joined<E>> {
    /// Start a run: the lead holder generates its key pair and a key-switching
    /// hint of its secret onto itself.
    pub fn init<R: RngCore + CryptoRng>(engine: E, rng: &mut R) -> Result<(Self, KeyHolder<E>)> {
        let session = SessionId::random(rng);
        let (pk, sk) = engine.generate_key_pair(rng).map_err(Error::engine)?;
        let lead_hint = engine.key_switch_hint(&sk, &sk, rng).map_err(Error::engine)?;
        debug!("session {:?}: lead holder initialized", session);
        let holder = KeyHolder {
            index: 0,
            session,
            sk,
            pk: pk.clone(),
        };
        Ok((
            Self {
                engine,
                session,
                public_keys: vec![pk],
                state: Joined { lead_hint },
            },
            holder,
        ))
    }

    /// A new holder joins, extending the combined public key.
    pub fn join<R: RngCore + CryptoRng>(mut self, rng: &mut R) -> Result<(Self, KeyHolder<E>)> {
        let (pk, sk) = self
            .engine
            .multiparty_key_gen(self.public_key(), rng)
            .map_err(Error::engine)?;
        let index = self.holders();
        debug!("session {:?}: holder {} joined", self.session, index);
        self.public_keys.push(pk.clone());
        let holder = KeyHolder {
            index,
            session: self.session,
            sk,
            pk,
        };
        Ok((self, holder))
    }

    /// Holder 1 adds its key-switching hint to the lead hint.
    ///
    /// At least two holders must have joined.
    pub fn accumulate_added<R: RngCore + CryptoRng>(
        self,
        holder: &KeyHolder<E>,
        rng: &mut R,
    ) -> Result<KeyCombination<E, AddedAccumulated<E>>> {
        if self.holders() < 2 {
            return Err(Error::TooFewValues(self.holders(), 2));
        }
        self.check_holder(holder, 1)?;
        let added = extend_added(&self.engine, &self.state.lead_hint, holder, rng)?;
        debug!("session {:?}: holder 1 accumulated the added key", self.session);
        Ok(self.map_state(|_| AddedAccumulated { added, k: 1 }))
    }
}

impl<E: ThresholdEngine> KeyCombination<E, AddedAccumulated<E>> {
    /// The next holder adds its key-switching hint.
    pub fn accumulate_added<R: RngCore + CryptoRng>(
        self,
        holder: &KeyHolder<E>,
        rng: &mut R,
    ) -> Result<Self> {
        let k = self.state.k + 1;
        self.check_holder(holder, k)?;
        let added = extend_added(&self.engine, &self.state.added, holder, rng)?;
        debug!("session {:?}: holder {} accumulated the added key", self.session, k);
        Ok(self.map_state(|_| AddedAccumulated { added, k }))
    }

    /// The lead holder seeds the multiplication key from the added hint of
    /// every holder.
    pub fn seed_final<R: RngCore + CryptoRng>(
        self,
        lead: &KeyHolder<E>,
        rng: &mut R,
    ) -> Result<KeyCombination<E, FinalSeeded<E>>> {
        self.check_complete(self.state.k, "added")?;
        self.check_holder(lead, 0)?;
        let key = self
            .engine
            .seed_mult_key(lead.secret_key(), &self.state.added, rng)
            .map_err(Error::engine)?;
        debug!("session {:?}: lead holder seeded the final key", self.session);
        Ok(self.map_state(|s| FinalSeeded {
            added: s.added,
            key,
        }))
    }
}

impl<E: ThresholdEngine> KeyCombination<E, FinalSeeded<E>> {
    /// Holder 1 adds its term to the multiplication key.
    pub fn accumulate_final<R: RngCore + CryptoRng>(
        self,
        holder: &KeyHolder<E>,
        rng: &mut R,
    ) -> Result<KeyCombination<E, FinalAccumulated<E>>> {
        self.check_holder(holder, 1)?;
        let key = extend_final(&self.engine, &self.state.added, &self.state.key, holder, rng)?;
        debug!("session {:?}: holder 1 accumulated the final key", self.session);
        Ok(self.map_state(|s| FinalAccumulated {
            added: s.added,
            key,
            k: 1,
        }))
    }
}

impl<E: ThresholdEngine> KeyCombination<E, FinalAccumulated<E>> {
    /// The next holder adds its term to the multiplication key.
    pub fn accumulate_final<R: RngCore + CryptoRng>(
        self,
        holder: &KeyHolder<E>,
        rng: &mut R,
    ) -> Result<Self> {
        let k = self.state.k + 1;
        self.check_holder(holder, k)?;
        let key = extend_final(&self.engine, &self.state.added, &self.state.key, holder, rng)?;
        debug!("session {:?}: holder {} accumulated the final key", self.session, k);
        Ok(self.map_state(|s| FinalAccumulated {
            added: s.added,
            key,
            k,
        }))
    }

    /// Install the multiplication key once every holder contributed.
    pub fn install(self) -> Result<ThresholdKeys<E>> {
        self.check_complete(self.state.k, "final")?;
        let holders = self.holders();
        let q = Modulus::new(self.engine.plaintext_modulus())?;
        let ek = self
            .engine
            .install_mult_key(self.state.key)
            .map_err(Error::engine)?;
        let pk = self.public_keys[holders - 1].clone();
        debug!("session {:?}: keys of {} holders installed", self.session, holders);
        Ok(ThresholdKeys {
            engine: self.engine,
            q,
            session: self.session,
            holders,
            pk,
            ek,
        })
    }
}

fn extend_added<E: ThresholdEngine, R: RngCore + CryptoRng>(
    engine: &E,
    previous: &E::KeySwitchHint,
    holder: &KeyHolder<E>,
    rng: &mut R,
) -> Result<E::KeySwitchHint> {
    let hint = engine
        .extend_key_switch_hint(holder.secret_key(), holder.secret_key(), previous, rng)
        .map_err(Error::engine)?;
    engine.add_hints(previous, &hint).map_err(Error::engine)
}

fn extend_final<E: ThresholdEngine, R: RngCore + CryptoRng>(
    engine: &E,
    added: &E::KeySwitchHint,
    previous: &E::MultKeyShare,
    holder: &KeyHolder<E>,
    rng: &mut R,
) -> Result<E::MultKeyShare> {
    let term = engine
        .extend_mult_key(holder.secret_key(), added, rng)
        .map_err(Error::engine)?;
    engine.add_mult_keys(previous, &term).map_err(Error::engine)
}

/// Keys combined by several holders.
///
/// Anyone can encrypt and evaluate under these keys; decryption needs a
/// [`crate::threshold::DecryptionRound`] with every holder.
pub struct ThresholdKeys<E: ThresholdEngine> {
    engine: E,
    q: Modulus,
    session: SessionId,
    holders: usize,
    pk: E::PublicKey,
    ek: E::EvaluationKey,
}

impl<E: ThresholdEngine> ThresholdKeys<E> {
    /// Number of holders.
    pub fn holders(&self) -> usize {
        self.holders
    }

    /// The session in which the keys were combined.
    pub fn session(&self) -> SessionId {
        self.session
    }
}

impl<E: ThresholdEngine> KeyMaterial for ThresholdKeys<E> {
    type Engine = E;

    fn engine(&self) -> &E {
        &self.engine
    }

    fn public_key(&self) -> &<E as ArithmeticEngine>::PublicKey {
        &self.pk
    }

    fn modulus(&self) -> &Modulus {
        &self.q
    }

    fn evaluation_key(&self) -> &<E as ArithmeticEngine>::EvaluationKey {
        &self.ek
    }
}
