//! Lagrange interpolation over `Z_p` and the interpolation tables of the
//! comparison and division operators.
//!
//! Every function `f: Z_p -> Z_p` is a polynomial of degree at most `p - 1`.
//! A table listing `f` on each of the `p` residues therefore determines a
//! unique polynomial, which [`lagrange_interpolate`] recovers.

use std::collections::HashSet;

use crate::poly::{poly_add, poly_mul, poly_scale};
use crate::zq::Modulus;
use crate::{Error, Result};
use fhe_cmp_util::div_trunc;
use itertools::Itertools;

/// Interpolating polynomial of a set of points `(x_i, f(x_i))`.
///
/// The abscissas must be pairwise distinct modulo `p`. The output has exactly
/// `points.len()` coefficients (constant term first), hence degree smaller
/// than the number of points.
pub fn lagrange_interpolate(points: &[(i64, i64)], q: &Modulus) -> Result<Vec<u64>> {
    let x = points.iter().map(|(xi, _)| q.reduce_i64(*xi)).collect_vec();
    check_distinct(points, &x, q)?;

    let mut result = vec![0u64; points.len()];
    for (i, (xi, (_, fxi))) in x.iter().zip(points.iter()).enumerate() {
        let fxi = q.reduce_i64(*fxi);
        if fxi == 0 {
            // The basis polynomial would be scaled by zero.
            continue;
        }
        let mut numerator = vec![1u64];
        let mut denominator = 1u64;
        for (j, xj) in x.iter().enumerate() {
            if i != j {
                numerator = poly_mul(&numerator, &[q.neg(*xj), 1], q);
                denominator = q.mul(denominator, q.sub(*xi, *xj));
            }
        }
        let scale = q.mul(q.inv(denominator)?, fxi);
        result = poly_add(&result, &poly_scale(&numerator, scale, q), q);
    }
    Ok(result)
}

fn check_distinct(points: &[(i64, i64)], x: &[u64], q: &Modulus) -> Result<()> {
    let mut seen = HashSet::with_capacity(x.len());
    for (xi, (raw, _)) in x.iter().zip(points.iter()) {
        if !seen.insert(*xi) {
            return Err(Error::DuplicatePoint(*raw, q.modulus()));
        }
    }
    Ok(())
}

/// A list of interpolation points `(x, f(x))` with centered coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationTable {
    modulus: Modulus,
    points: Vec<(i64, i64)>,
}

impl InterpolationTable {
    /// Create a table from abscissas and values.
    pub fn new(x: &[i64], fx: &[i64], q: &Modulus) -> Result<Self> {
        if x.len() != fx.len() {
            return Err(Error::MismatchedTable(x.len(), fx.len()));
        }
        let points = x.iter().copied().zip(fx.iter().copied()).collect_vec();
        check_distinct(&points, &q.reduce_vec_i64(x), q)?;
        Ok(Self {
            modulus: *q,
            points,
        })
    }

    /// Full-domain table of `f`, listing `f(x)` for `x = 0, 1, ..., (p-1)/2`
    /// followed by `x = -(p-1)/2, ..., -1`.
    pub fn from_fn<F: Fn(i64) -> i64>(q: &Modulus, f: F) -> Self {
        let points = (0..q.modulus())
            .map(|r| {
                let x = q.center(r);
                (x, f(x))
            })
            .collect_vec();
        Self {
            modulus: *q,
            points,
        }
    }

    /// `1` on positive values, `-1` on negative values, `0` at zero.
    pub fn sign(q: &Modulus) -> Self {
        Self::from_fn(q, i64::signum)
    }

    /// `1` at zero, `0` elsewhere.
    pub fn equal_zero(q: &Modulus) -> Self {
        Self::from_fn(q, |x| (x == 0) as i64)
    }

    /// `1` on positive values, `0` elsewhere.
    pub fn greater_than_zero(q: &Modulus) -> Self {
        Self::from_fn(q, |x| (x > 0) as i64)
    }

    /// `1` on non-negative values, `0` elsewhere.
    pub fn greater_equal_zero(q: &Modulus) -> Self {
        Self::from_fn(q, |x| (x >= 0) as i64)
    }

    /// `1` on negative values, `0` elsewhere.
    pub fn lower_than_zero(q: &Modulus) -> Self {
        Self::from_fn(q, |x| (x < 0) as i64)
    }

    /// `1` on non-positive values, `0` elsewhere.
    pub fn lower_equal_zero(q: &Modulus) -> Self {
        Self::from_fn(q, |x| (x <= 0) as i64)
    }

    /// Quotient of the division by `divisor`, rounded toward zero.
    ///
    /// Both the dividend and the divisor are read as centered integers, so
    /// `-7 / 2 = -3` and `7 / -2 = -3`. Fails when the divisor is zero.
    pub fn integer_division(divisor: i64, q: &Modulus) -> Result<Self> {
        if divisor == 0 {
            return Err(Error::DivisionUndefined(0, q.modulus()));
        }
        Ok(Self::from_fn(q, |x| {
            div_trunc(x, divisor).unwrap_or_default()
        }))
    }

    /// The modulus of the table.
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// The points of the table.
    pub fn points(&self) -> &[(i64, i64)] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the table lists every residue of `Z_p`.
    pub fn is_full_domain(&self) -> bool {
        self.points.len() as u64 == self.modulus.modulus()
    }

    /// Coefficients of the interpolating polynomial, normalized in `[0, p)`.
    pub fn interpolate(&self) -> Result<Vec<u64>> {
        lagrange_interpolate(&self.points, &self.modulus)
    }
}
