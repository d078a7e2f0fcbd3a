//! Core schema types for schema-driven argument parsing.
//!
//! This crate defines how a command line is declared and normalized:
//!
//! - [`FieldDecl`] — attributes shared by options and operands (type,
//!   default, requiredness, multiplicity, parse/validate hooks).
//! - [`OptionDecl`] / [`OperandDecl`] — per-kind declaration records.
//! - [`RawSchema`] — declarations in author order, built in code or loaded
//!   from JSON/YAML.
//! - [`Schema`] — the normalized result: an option cache keyed by short and
//!   long identifiers plus an ordered operand stack.
//!
//! Normalization ([`Schema::new`]) infers types from defaults, derives
//! display hints, allocates short/long identifiers and rejects conflicting
//! declarations. Reserved `help`/`version` options are merged in with
//! [`merge_schemas`].
//!
//! # Example
//!
//! ```
//! use argv_schema_core::*;
//!
//! let raw = RawSchema::new()
//!     .option("count", FieldDecl::typed(ArgType::Number).with_default(1))
//!     .option("dryRun", FieldDecl::flag())
//!     .operand("files", FieldDecl::new().many());
//!
//! let schema = Schema::new(raw).unwrap();
//! assert_eq!(schema.resolve("dry-run").unwrap().short_id, 'd');
//! assert_eq!(schema.operands()[0].id, "files");
//!
//! let bad = RawSchema::new().option("n", FieldDecl::new().required().with_default(1));
//! assert!(matches!(Schema::new(bad), Err(SchemaError::PropertyMismatch { .. })));
//! ```

mod allocate;
mod error;
mod merge;
mod normalize;
mod schema;
mod source;
mod types;

pub use error::{Result, SchemaError};
pub use merge::{HELP_ID, VERSION_ID, merge_schemas, reserved_schema};
pub use schema::{FieldSpec, OptionSpec, Schema};
pub use types::*;
