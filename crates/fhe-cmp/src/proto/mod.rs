//! Protobuf definitions and serialization.

/// Protobuf for the reference engine.
pub mod reference;
