//! Non-mutating schema merge and the reserved `help`/`version` options.
//!
//! [`merge_schemas`] combines a base schema (usually [`reserved_schema`])
//! with a caller-supplied overlay. Both inputs are left untouched and a new
//! [`RawSchema`] is returned, so the reserved defaults stay an immutable
//! constant shared by every parser.
//!
//! # Example
//!
//! ```
//! use argv_schema_core::*;
//!
//! let overlay = RawSchema::new()
//!     .option("help", OptionDecl::from(FieldDecl::new()).with_short('?'))
//!     .option("count", FieldDecl::typed(ArgType::Number));
//!
//! let merged = merge_schemas(&reserved_schema(), &overlay);
//! assert_eq!(merged.option_ids(), vec!["help", "count", "version"]);
//!
//! let help = merged.find_option("help").unwrap();
//! assert_eq!(help.short_id, Some('?'));
//! assert_eq!(help.field.description.as_deref(), Some("Show help"));
//! ```

use crate::types::{FieldDecl, OperandDecl, OptionDecl, RawSchema};

/// Field id of the reserved help flag.
pub const HELP_ID: &str = "help";
/// Field id of the reserved version flag.
pub const VERSION_ID: &str = "version";

/// Returns the reserved options merged into every schema.
pub fn reserved_schema() -> RawSchema {
    RawSchema::new()
        .option(HELP_ID, FieldDecl::flag().with_description("Show help"))
        .option(VERSION_ID, FieldDecl::flag().with_description("Show version"))
}

/// Merges `overlay` onto `base` without mutating either.
///
/// Overlay declarations keep their declaration order and win property by
/// property; a base declaration with the same id fills the properties the
/// overlay leaves unset. An overlay `default` without a `type` drops the base
/// type so it can be inferred from the new default. Base declarations the
/// overlay does not mention are appended afterwards in base order.
pub fn merge_schemas(base: &RawSchema, overlay: &RawSchema) -> RawSchema {
    let mut merged = RawSchema::new();

    for (id, decl) in &overlay.options {
        let decl = match base.find_option(id) {
            Some(existing) => merge_option(existing, decl),
            None => decl.clone(),
        };
        merged.options.push((id.clone(), decl));
    }
    for (id, decl) in &base.options {
        if overlay.find_option(id).is_none() {
            merged.options.push((id.clone(), decl.clone()));
        }
    }

    for (id, decl) in &overlay.operands {
        let decl = match base.find_operand(id) {
            Some(existing) => OperandDecl::from(merge_field(&existing.field, &decl.field)),
            None => decl.clone(),
        };
        merged.operands.push((id.clone(), decl));
    }
    for (id, decl) in &base.operands {
        if overlay.find_operand(id).is_none() {
            merged.operands.push((id.clone(), decl.clone()));
        }
    }

    merged
}

fn merge_option(base: &OptionDecl, overlay: &OptionDecl) -> OptionDecl {
    OptionDecl {
        field: merge_field(&base.field, &overlay.field),
        short_id: overlay.short_id.or(base.short_id),
        long_id: overlay.long_id.clone().or_else(|| base.long_id.clone()),
    }
}

fn merge_field(base: &FieldDecl, overlay: &FieldDecl) -> FieldDecl {
    FieldDecl {
        description: overlay
            .description
            .clone()
            .or_else(|| base.description.clone()),
        arg_type: match (overlay.arg_type, &overlay.default) {
            (Some(ty), _) => Some(ty),
            (None, Some(_)) => None,
            (None, None) => base.arg_type,
        },
        hint: overlay.hint.clone().or_else(|| base.hint.clone()),
        required: overlay.required || base.required,
        default: overlay.default.clone().or_else(|| base.default.clone()),
        many: overlay.many || base.many,
        parse: overlay.parse.clone().or_else(|| base.parse.clone()),
        validate: overlay.validate.clone().or_else(|| base.validate.clone()),
    }
}
