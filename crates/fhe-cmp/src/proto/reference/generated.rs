#![allow(missing_docs)]
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Parameters {
    #[prost(uint64, tag = "1")]
    pub plaintext: u64,
    #[prost(uint32, tag = "2")]
    pub slots: u32,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ciphertext {
    #[prost(uint64, repeated, tag = "1")]
    pub c0: ::prost::alloc::vec::Vec<u64>,
    #[prost(uint64, repeated, tag = "2")]
    pub c1: ::prost::alloc::vec::Vec<u64>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PublicKey {
    #[prost(uint64, tag = "1")]
    pub b: u64,
    #[prost(uint64, tag = "2")]
    pub a: u64,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EvaluationKey {
    #[prost(uint64, tag = "1")]
    pub k0: u64,
    #[prost(uint64, tag = "2")]
    pub k1: u64,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeySwitchHint {
    #[prost(uint64, tag = "1")]
    pub h0: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub seed: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MultKeyShare {
    #[prost(uint64, tag = "1")]
    pub m0: u64,
    #[prost(uint64, tag = "2")]
    pub m1: u64,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DecryptionShare {
    #[prost(bool, tag = "1")]
    pub lead: bool,
    #[prost(uint64, repeated, tag = "2")]
    pub values: ::prost::alloc::vec::Vec<u64>,
}
