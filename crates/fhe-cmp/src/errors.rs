use std::error::Error as StdError;

use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Indicates a division by zero, or the inversion of zero.
    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    /// Indicates that a clear integer lies outside the centered domain.
    #[error("Value {value} is outside of the domain [-{bound}, {bound}]")]
    DomainOutOfRange {
        /// The offending value.
        value: i64,
        /// The largest absolute value of the domain.
        bound: u64,
    },

    /// Indicates that a protocol step was invoked out of order, twice, or
    /// with a holder from another session.
    #[error("Protocol sequence violation: {0}")]
    ProtocolSequenceViolation(String),

    /// Indicates that too many values were provided.
    #[error("Too many values provided: {0} exceeds limit {1}")]
    TooManyValues(usize, usize),

    /// Indicates that too few values were provided.
    #[error("Too few values provided: {0} is below limit {1}")]
    TooFewValues(usize, usize),

    /// Indicates that an input is invalid.
    #[error("{0}")]
    UnspecifiedInput(String),

    /// Indicates a parameter error.
    #[error("{0}")]
    ParametersError(ParametersError),

    /// Indicates a serialization error.
    #[error("Serialization error")]
    SerializationError,

    /// Indicates an error in the finite field arithmetic.
    #[error("{0}")]
    MathError(#[from] fhe_cmp_math::Error),

    /// An error reported by the arithmetic engine.
    #[error("Engine error: {0}")]
    Engine(#[source] Box<dyn StdError + Send + Sync>),

    /// Indicates a default error
    #[error("{0}")]
    DefaultError(String),
}

/// Separate enum to indicate parameters-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParametersError {
    /// Indicates an invalid plaintext modulus.
    #[error("Invalid plaintext: {0}")]
    InvalidPlaintext(String),

    /// Indicates an invalid number of slots.
    #[error("Invalid number of slots: {0} should be between 1 and {1}")]
    InvalidSlots(usize, usize),

    /// Indicates an invalid batch width.
    #[error("Invalid batch width: {0} should be between 1 and {1}")]
    InvalidBatchWidth(usize, usize),
}

impl From<ParametersError> for Error {
    fn from(e: ParametersError) -> Self {
        Self::ParametersError(e)
    }
}

impl Error {
    /// Wrap an error raised by an arithmetic engine.
    ///
    /// Errors of this library raised by the reference engine are returned
    /// unchanged.
    pub fn engine<E: StdError + Send + Sync + 'static>(e: E) -> Self {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(e);
        match boxed.downcast::<Error>() {
            Ok(e) => *e,
            Err(boxed) => Self::Engine(boxed),
        }
    }

    /// Create a division-by-zero error.
    pub fn division_by_zero() -> Self {
        Self::DivisionUndefined("the divisor is zero".to_string())
    }

    /// Create a domain error for `value` modulo `p`.
    pub fn out_of_domain(value: i64, p: u64) -> Self {
        Self::DomainOutOfRange {
            value,
            bound: (p - 1) >> 1,
        }
    }

    /// Create a protocol sequence error.
    pub fn sequence<S: Into<String>>(msg: S) -> Self {
        Self::ProtocolSequenceViolation(msg.into())
    }

    /// Create an error for a holder presented out of turn.
    pub fn unexpected_holder(index: usize, expected: usize) -> Self {
        Self::ProtocolSequenceViolation(format!(
            "holder {} presented while holder {} was expected",
            index, expected
        ))
    }

    /// Create an error for a holder of another session.
    pub fn foreign_holder(index: usize) -> Self {
        Self::ProtocolSequenceViolation(format!(
            "holder {} belongs to another session",
            index
        ))
    }

    /// Create an error for parameters that do not match.
    pub fn incompatible_parameters() -> Self {
        Self::DefaultError("Incompatible parameters".to_string())
    }
}
