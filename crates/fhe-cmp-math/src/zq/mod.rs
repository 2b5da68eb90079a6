//! Arithmetic in the prime field `Z_p`.

use crate::{Error, Result};
use fhe_cmp_util::{half_width, is_prime};
use itertools::Itertools;
use rand::{distributions::Uniform, CryptoRng, Rng, RngCore};

/// Structure encapsulating an odd prime modulus `p` smaller than 2^31.
///
/// Residues are represented by `u64` values in `[0, p)`; since `p < 2^31`,
/// the product of two residues never overflows. The centered representative
/// of a residue `r` is `r` if `r <= (p-1)/2` and `r - p` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modulus {
    p: u64,
}

impl Modulus {
    /// Exclusive upper bound on the supported moduli.
    pub const MAX: u64 = 1 << 31;

    /// Create a modulus from an odd prime smaller than [`Modulus::MAX`].
    pub fn new(p: u64) -> Result<Self> {
        if p < 3 || p >= Self::MAX || p & 1 == 0 || !is_prime(p) {
            Err(Error::InvalidModulus(p))
        } else {
            Ok(Self { p })
        }
    }

    /// Returns the value of the modulus.
    pub const fn modulus(&self) -> u64 {
        self.p
    }

    /// Returns `(p-1)/2`, the largest absolute value of the centered domain.
    pub fn half_width(&self) -> u64 {
        half_width(self.p)
    }

    /// Reduce `a` modulo `p`.
    pub const fn reduce(&self, a: u64) -> u64 {
        a % self.p
    }

    /// Reduce a signed integer into `[0, p)`.
    pub fn reduce_i64(&self, a: i64) -> u64 {
        a.rem_euclid(self.p as i64) as u64
    }

    /// Reduce a vector of signed integers into `[0, p)`.
    pub fn reduce_vec_i64(&self, a: &[i64]) -> Vec<u64> {
        a.iter().map(|ai| self.reduce_i64(*ai)).collect_vec()
    }

    /// Centered representative of `a` in `[-(p-1)/2, (p-1)/2]`.
    pub fn center(&self, a: u64) -> i64 {
        let a = self.reduce(a);
        if a > self.half_width() {
            a as i64 - self.p as i64
        } else {
            a as i64
        }
    }

    /// Centered representatives of a vector of residues.
    pub fn center_vec(&self, a: &[u64]) -> Vec<i64> {
        a.iter().map(|ai| self.center(*ai)).collect_vec()
    }

    /// Modular addition of residues.
    pub fn add(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.p && b < self.p);
        let c = a + b;
        if c >= self.p {
            c - self.p
        } else {
            c
        }
    }

    /// Modular subtraction of residues.
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.p && b < self.p);
        if a >= b {
            a - b
        } else {
            a + self.p - b
        }
    }

    /// Modular negation of a residue.
    pub fn neg(&self, a: u64) -> u64 {
        debug_assert!(a < self.p);
        if a == 0 {
            0
        } else {
            self.p - a
        }
    }

    /// Modular multiplication of residues.
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.p && b < self.p);
        (a * b) % self.p
    }

    /// Modular exponentiation by square-and-multiply.
    pub fn pow(&self, a: u64, e: u64) -> u64 {
        let mut base = self.reduce(a);
        let mut e = e;
        let mut result = 1;
        while e > 0 {
            if e & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            e >>= 1;
        }
        result
    }

    /// Modular inverse `a^(p-2)`, by Fermat's little theorem.
    ///
    /// Returns [`Error::DivisionUndefined`] when `a ≡ 0 mod p`.
    pub fn inv(&self, a: u64) -> Result<u64> {
        let a = self.reduce(a);
        if a == 0 {
            Err(Error::DivisionUndefined(a, self.p))
        } else {
            Ok(self.pow(a, self.p - 2))
        }
    }

    /// Sample a vector of uniform residues.
    pub fn random_vec<R: RngCore + CryptoRng>(&self, size: usize, rng: &mut R) -> Vec<u64> {
        rng.sample_iter(Uniform::new(0, self.p))
            .take(size)
            .collect_vec()
    }

    /// Sample a uniform non-zero residue.
    pub fn random_nonzero<R: RngCore + CryptoRng>(&self, rng: &mut R) -> u64 {
        rng.gen_range(1..self.p)
    }
}
