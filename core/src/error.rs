//! Error type for schema construction.
//!
//! Every variant is raised while a schema is being loaded or normalized,
//! before any token is parsed.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or normalizing a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A declaration carries a property outside its kind's property set.
    #[error("unknown property `{property}` on field `{field}`")]
    UnknownProperty { field: String, property: String },

    /// Two fields claim the same id, short id or long id.
    #[error("id conflict: `{first}` and `{second}` both claim `{id}`")]
    IdConflict {
        first: String,
        second: String,
        id: String,
    },

    /// The declared type is not a member of the type set for the field kind.
    #[error("invalid type `{ty}` for field `{field}`")]
    InvalidType { field: String, ty: String },

    /// Declared properties contradict each other.
    #[error("property mismatch on field `{field}`: {reason}")]
    PropertyMismatch { field: String, reason: String },

    /// Loosely-typed declaration data is malformed.
    #[error("invalid declaration for field `{field}`: {reason}")]
    InvalidDeclaration { field: String, reason: String },

    /// Schema file extension is not one of the supported formats.
    #[error("unsupported schema file {0}: expected .json, .yaml or .yml")]
    UnsupportedFormat(PathBuf),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
