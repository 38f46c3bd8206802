//! Error types for the chain crate.
//!
//! Two families live here. [`ChainError`] is what callers see from indexing,
//! slicing and lookup construction. [`Unsupported`] is what a [`Source`]
//! reports when it cannot perform a pushed-down operation; the chain absorbs
//! it and keeps the source unchanged, so it never reaches the caller.
//!
//! [`Source`]: crate::Source

use thiserror::Error;

/// Broad classification of a [`ChainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The argument itself is unacceptable (negative bound, zero step, bad pattern).
    Value,
    /// The argument is acceptable but points past the end of the chain.
    Index,
}

/// Errors returned by chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// A slice bound or index was negative.
    #[error("lazy chains do not support negative indexing")]
    NegativeIndex,

    /// A slice step of zero was requested.
    #[error("lazy chain slice step cannot be zero")]
    ZeroStep,

    /// The chain produced fewer elements than the requested position.
    #[error("lazy chain index {index} out of range")]
    IndexOutOfRange { index: usize },

    /// Invalid regular expression pattern in a lookup.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),
}

impl ChainError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChainError::IndexOutOfRange { .. } => ErrorKind::Index,
            ChainError::NegativeIndex | ChainError::ZeroStep | ChainError::InvalidRegex(_) => {
                ErrorKind::Value
            }
        }
    }
}

/// Why a source declined a pushed-down operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unsupported {
    /// The source does not implement the operation at all.
    #[error("operation not supported by this source")]
    Missing,

    /// The source implements the operation but rejects this argument.
    #[error("invalid argument for this source: {0}")]
    InvalidArgument(String),

    /// A lookup or ordering named a field the source does not have.
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;
