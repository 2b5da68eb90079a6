#![crate_name = "fhe_cmp"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Comparison, sign and integer division over encrypted integers, with
//! threshold key combination.
//!
//! Every operator is the interpolating polynomial over `Z_p` of a lookup
//! table, evaluated homomorphically from the powers of its input. The
//! homomorphic arithmetic is delegated to an engine implementing
//! [`fhe_cmp_traits::ArithmeticEngine`]; the [`reference`] engine is exact
//! and insecure, for testing.

mod errors;

pub mod compare;
pub mod division;
pub mod evaluator;
pub mod interpolation;
pub mod keys;
pub mod power;
pub mod proto;
pub mod reference;
pub mod threshold;

pub use errors::{Error, ParametersError, Result};
pub use evaluator::{EvaluationOptions, Evaluator};
pub use keys::{Ciphertext, KeyMaterial, SinglePartyKeys};

// Test the source code included in the README.
#[macro_use]
extern crate doc_comment;
doctest!("../README.md");
