#![crate_name = "fhe_cmp_math"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Mathematical utilities for the fhe-cmp library: arithmetic in the prime
//! field `Z_p`, polynomials with coefficients in `Z_p`, and Lagrange
//! interpolation of functions `Z_p -> Z_p`.

mod errors;

pub mod interpolation;
pub mod poly;
pub mod zq;

pub use errors::{Error, Result};
