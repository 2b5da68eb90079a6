//! Arithmetic and threshold operations of the reference engine.

use std::sync::Arc;

use crate::reference::threshold::{CommonRandomElement, ShareRole};
use crate::reference::{
    Ciphertext, DecryptionShare, EvaluationKey, KeySwitchHint, MultKeyShare, PublicKey,
    ReferenceParameters, SecretKey,
};
use crate::{Error, Result};
use fhe_cmp_math::zq::Modulus;
use fhe_cmp_traits::{ArithmeticEngine, FheParametrized, ThresholdEngine};
use itertools::{izip, Itertools};
use rand::{CryptoRng, RngCore};

/// Noise-free engine over `Z_p`.
///
/// Every operation is exact, so that the comparison protocols can be tested
/// end to end. The engine offers no security whatsoever: a ciphertext slot
/// `(m + r·b, r·a)` reveals `m` to anyone who knows `a` and `b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEngine {
    par: Arc<ReferenceParameters>,
}

impl ReferenceEngine {
    /// Create an engine for the given parameters.
    pub fn new(par: &Arc<ReferenceParameters>) -> Self {
        Self { par: par.clone() }
    }

    /// The parameters of the engine.
    pub fn parameters(&self) -> &Arc<ReferenceParameters> {
        &self.par
    }

    fn q(&self) -> &Modulus {
        self.par.plaintext_modulus()
    }

    fn check(&self, par: &Arc<ReferenceParameters>) -> Result<()> {
        if Arc::ptr_eq(par, &self.par) || **par == *self.par {
            Ok(())
        } else {
            Err(Error::incompatible_parameters())
        }
    }

    fn slotwise<F: Fn(u64, u64) -> u64>(
        &self,
        lhs: &Ciphertext,
        rhs: &Ciphertext,
        f: F,
    ) -> Result<Ciphertext> {
        self.check(&lhs.par)?;
        self.check(&rhs.par)?;
        Ok(Ciphertext {
            par: self.par.clone(),
            c0: izip!(&lhs.c0, &rhs.c0).map(|(x, y)| f(*x, *y)).collect_vec(),
            c1: izip!(&lhs.c1, &rhs.c1).map(|(x, y)| f(*x, *y)).collect_vec(),
        })
    }

    fn hint(
        &self,
        sk_from: &SecretKey,
        sk_to: &SecretKey,
        crp: CommonRandomElement,
    ) -> Result<KeySwitchHint> {
        self.check(&sk_from.par)?;
        self.check(&sk_to.par)?;
        let q = self.q();
        let a = crp.value(&self.par);
        Ok(KeySwitchHint {
            par: self.par.clone(),
            h0: q.add(q.neg(q.mul(a, sk_to.s)), sk_from.s),
            crp,
        })
    }

    fn mult_key_term(&self, sk: &SecretKey, added: &KeySwitchHint) -> Result<MultKeyShare> {
        self.check(&sk.par)?;
        self.check(&added.par)?;
        let q = self.q();
        Ok(MultKeyShare {
            par: self.par.clone(),
            m0: q.mul(sk.s, added.h0),
            m1: q.mul(sk.s, added.a()),
        })
    }
}

impl FheParametrized for ReferenceEngine {
    type Parameters = ReferenceParameters;
}

impl ArithmeticEngine for ReferenceEngine {
    type Ciphertext = Ciphertext;
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;
    type EvaluationKey = EvaluationKey;
    type Error = Error;

    fn plaintext_modulus(&self) -> u64 {
        self.par.plaintext()
    }

    fn slots(&self) -> usize {
        self.par.slots()
    }

    fn generate_key_pair<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(PublicKey, SecretKey)> {
        let sk = SecretKey::random(&self.par, rng);
        let pk = PublicKey::new(&sk, rng);
        Ok((pk, sk))
    }

    fn generate_evaluation_key<R: RngCore + CryptoRng>(
        &self,
        sk: &SecretKey,
        rng: &mut R,
    ) -> Result<EvaluationKey> {
        self.check(&sk.par)?;
        Ok(EvaluationKey::new(sk, rng))
    }

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        pk: &PublicKey,
        values: &[u64],
        rng: &mut R,
    ) -> Result<Ciphertext> {
        self.check(&pk.par)?;
        if values.len() > self.slots() {
            return Err(Error::TooManyValues(values.len(), self.slots()));
        }
        let q = self.q();
        let r = q.random_vec(self.slots(), rng);
        let m = values
            .iter()
            .map(|v| q.reduce(*v))
            .chain(std::iter::repeat(0))
            .take(self.slots());
        let (c0, c1) = izip!(m, &r)
            .map(|(mj, rj)| (q.add(mj, q.mul(*rj, pk.b)), q.mul(*rj, pk.a)))
            .unzip();
        Ok(Ciphertext {
            par: self.par.clone(),
            c0,
            c1,
        })
    }

    fn decrypt(&self, sk: &SecretKey, ct: &Ciphertext) -> Result<Vec<u64>> {
        self.check(&sk.par)?;
        self.check(&ct.par)?;
        let q = self.q();
        Ok(izip!(&ct.c0, &ct.c1)
            .map(|(c0, c1)| q.add(*c0, q.mul(*c1, sk.s)))
            .collect_vec())
    }

    fn add(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        let q = *self.q();
        self.slotwise(lhs, rhs, |x, y| q.add(x, y))
    }

    fn sub(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        let q = *self.q();
        self.slotwise(lhs, rhs, |x, y| q.sub(x, y))
    }

    fn negate(&self, ct: &Ciphertext) -> Result<Ciphertext> {
        self.check(&ct.par)?;
        let q = self.q();
        Ok(Ciphertext {
            par: self.par.clone(),
            c0: ct.c0.iter().map(|c| q.neg(*c)).collect_vec(),
            c1: ct.c1.iter().map(|c| q.neg(*c)).collect_vec(),
        })
    }

    fn multiply(
        &self,
        ek: &EvaluationKey,
        lhs: &Ciphertext,
        rhs: &Ciphertext,
    ) -> Result<Ciphertext> {
        self.check(&ek.par)?;
        self.check(&lhs.par)?;
        self.check(&rhs.par)?;
        let q = self.q();
        // The degree-2 term d2 is relinearized with k0 + k1·s = s².
        let (c0, c1) = izip!(&lhs.c0, &lhs.c1, &rhs.c0, &rhs.c1)
            .map(|(x0, x1, y0, y1)| {
                let d0 = q.mul(*x0, *y0);
                let d1 = q.add(q.mul(*x0, *y1), q.mul(*x1, *y0));
                let d2 = q.mul(*x1, *y1);
                (q.add(d0, q.mul(d2, ek.k0)), q.add(d1, q.mul(d2, ek.k1)))
            })
            .unzip();
        Ok(Ciphertext {
            par: self.par.clone(),
            c0,
            c1,
        })
    }

    fn sum_slots(&self, ct: &Ciphertext, batch_size: usize) -> Result<Ciphertext> {
        self.check(&ct.par)?;
        if batch_size == 0 {
            return Err(Error::TooFewValues(batch_size, 1));
        }
        if batch_size > self.slots() {
            return Err(Error::TooManyValues(batch_size, self.slots()));
        }
        let q = self.q();
        let sum = |c: &[u64]| {
            let mut out = vec![0u64; c.len()];
            out[0] = c[..batch_size].iter().fold(0, |acc, x| q.add(acc, *x));
            out
        };
        Ok(Ciphertext {
            par: self.par.clone(),
            c0: sum(&ct.c0),
            c1: sum(&ct.c1),
        })
    }
}

impl ThresholdEngine for ReferenceEngine {
    type KeySwitchHint = KeySwitchHint;
    type MultKeyShare = MultKeyShare;
    type DecryptionShare = DecryptionShare;

    fn key_switch_hint<R: RngCore + CryptoRng>(
        &self,
        sk_from: &SecretKey,
        sk_to: &SecretKey,
        rng: &mut R,
    ) -> Result<KeySwitchHint> {
        self.hint(sk_from, sk_to, CommonRandomElement::new(rng))
    }

    fn multiparty_key_gen<R: RngCore + CryptoRng>(
        &self,
        pk: &PublicKey,
        rng: &mut R,
    ) -> Result<(PublicKey, SecretKey)> {
        self.check(&pk.par)?;
        let q = self.q();
        let sk = SecretKey::random(&self.par, rng);
        let combined = PublicKey {
            par: self.par.clone(),
            b: q.sub(pk.b, q.mul(pk.a, sk.s)),
            a: pk.a,
        };
        Ok((combined, sk))
    }

    fn extend_key_switch_hint<R: RngCore + CryptoRng>(
        &self,
        sk_from: &SecretKey,
        sk_to: &SecretKey,
        previous: &KeySwitchHint,
        _rng: &mut R,
    ) -> Result<KeySwitchHint> {
        self.check(&previous.par)?;
        self.hint(sk_from, sk_to, previous.crp)
    }

    fn add_hints(&self, lhs: &KeySwitchHint, rhs: &KeySwitchHint) -> Result<KeySwitchHint> {
        self.check(&lhs.par)?;
        self.check(&rhs.par)?;
        if lhs.crp != rhs.crp {
            return Err(Error::UnspecifiedInput(
                "Key-switching hints with different common random elements".to_string(),
            ));
        }
        Ok(KeySwitchHint {
            par: self.par.clone(),
            h0: self.q().add(lhs.h0, rhs.h0),
            crp: lhs.crp,
        })
    }

    fn seed_mult_key<R: RngCore + CryptoRng>(
        &self,
        sk: &SecretKey,
        added: &KeySwitchHint,
        _rng: &mut R,
    ) -> Result<MultKeyShare> {
        self.mult_key_term(sk, added)
    }

    fn extend_mult_key<R: RngCore + CryptoRng>(
        &self,
        sk: &SecretKey,
        added: &KeySwitchHint,
        _rng: &mut R,
    ) -> Result<MultKeyShare> {
        self.mult_key_term(sk, added)
    }

    fn add_mult_keys(&self, lhs: &MultKeyShare, rhs: &MultKeyShare) -> Result<MultKeyShare> {
        self.check(&lhs.par)?;
        self.check(&rhs.par)?;
        let q = self.q();
        Ok(MultKeyShare {
            par: self.par.clone(),
            m0: q.add(lhs.m0, rhs.m0),
            m1: q.add(lhs.m1, rhs.m1),
        })
    }

    fn install_mult_key(&self, key: MultKeyShare) -> Result<EvaluationKey> {
        self.check(&key.par)?;
        Ok(EvaluationKey {
            par: key.par,
            k0: key.m0,
            k1: key.m1,
        })
    }

    fn partial_decrypt_lead<R: RngCore + CryptoRng>(
        &self,
        ct: &Ciphertext,
        sk: &SecretKey,
        _rng: &mut R,
    ) -> Result<DecryptionShare> {
        Ok(DecryptionShare {
            par: self.par.clone(),
            role: ShareRole::Lead,
            values: self.decrypt(sk, ct)?,
        })
    }

    fn partial_decrypt_main<R: RngCore + CryptoRng>(
        &self,
        ct: &Ciphertext,
        sk: &SecretKey,
        _rng: &mut R,
    ) -> Result<DecryptionShare> {
        self.check(&sk.par)?;
        self.check(&ct.par)?;
        let q = self.q();
        Ok(DecryptionShare {
            par: self.par.clone(),
            role: ShareRole::Main,
            values: ct.c1.iter().map(|c1| q.mul(*c1, sk.s)).collect_vec(),
        })
    }

    fn fuse_decryption(&self, shares: &[DecryptionShare]) -> Result<Vec<u64>> {
        let (lead, mains) = shares
            .split_first()
            .ok_or(Error::TooFewValues(0, 1))?;
        if lead.role != ShareRole::Lead {
            return Err(Error::UnspecifiedInput(
                "The first decryption share must be the lead share".to_string(),
            ));
        }
        self.check(&lead.par)?;
        let q = self.q();
        let mut values = lead.values.clone();
        for share in mains {
            self.check(&share.par)?;
            if share.role != ShareRole::Main {
                return Err(Error::UnspecifiedInput(
                    "Only the first decryption share can be a lead share".to_string(),
                ));
            }
            values
                .iter_mut()
                .zip(&share.values)
                .for_each(|(v, w)| *v = q.add(*v, *w));
        }
        Ok(values)
    }
}
