//! Protobuf messages of the reference engine.

#[allow(clippy::all)]
mod generated;

pub use generated::*;
