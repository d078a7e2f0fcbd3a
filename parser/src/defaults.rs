//! Post-scan defaulting and required-field validation.

use argv_schema_core::Schema;

use crate::args::ParsedArgs;
use crate::error::ParseError;

/// Fills unset fields from their defaults, then rejects any required field
/// that is still unset.
///
/// Options are reported by long id, operands by field id.
pub(crate) fn apply_defaults(
    schema: &Schema,
    mut args: ParsedArgs,
) -> Result<ParsedArgs, ParseError> {
    for field in schema.fields() {
        if let Some(default) = &field.default {
            args.fill(&field.id, default.clone());
        }
    }

    for option in schema.options() {
        if option.field.required && !args.contains(option.id()) {
            return Err(ParseError::MissingArgument(option.long_id.clone()));
        }
    }
    for operand in schema.operands() {
        if operand.required && !args.contains(&operand.id) {
            return Err(ParseError::MissingArgument(operand.id.clone()));
        }
    }

    Ok(args)
}
