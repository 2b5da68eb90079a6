use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Indicates an invalid modulus
    #[error("Invalid modulus: modulus {0} should be an odd prime smaller than 2^31")]
    InvalidModulus(u64),

    /// Indicates an attempt to invert zero.
    #[error("Division undefined: {0} has no inverse modulo {1}")]
    DivisionUndefined(u64, u64),

    /// Indicates that two interpolation points share the same abscissa.
    #[error("Duplicate interpolation point: x = {0} appears twice modulo {1}")]
    DuplicatePoint(i64, u64),

    /// Indicates that the interpolation abscissas and values differ in length.
    #[error("Mismatched interpolation table: {0} abscissas for {1} values")]
    MismatchedTable(usize, usize),
}
