//! Error types for argument parsing.

use argv_schema_core::SchemaError;
use thiserror::Error;

/// Errors raised while scanning a token sequence or validating its result.
///
/// Every variant aborts the parse call; no partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `-x` or `--name` token does not resolve to a declared option.
    #[error("unknown option {0}")]
    UnknownOption(String),

    /// A positional token arrived after the operand stack was exhausted.
    #[error("unknown argument `{0}`")]
    UnknownArgument(String),

    /// An option expecting an argument was followed by another option.
    #[error("missing value for option --{option} before `{token}`")]
    MissingValue { option: String, token: String },

    /// A token could not be coerced to the field's type.
    #[error("expecting {hint} for argument {id}, got `{token}`")]
    InvalidValue {
        id: String,
        hint: String,
        token: String,
    },

    /// A parse or validate hook rejected the value.
    #[error("invalid value for argument {id}: {reason}")]
    Rejected { id: String, reason: String },

    /// A second value was assigned to a field that is not `many`.
    #[error("expecting {hint} for argument {id}: value given more than once")]
    DuplicateValue { id: String, hint: String },

    /// A required field is still unset after defaulting.
    #[error("missing argument {0}")]
    MissingArgument(String),
}

/// Any error a one-shot parse can produce: schema construction or parsing.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
