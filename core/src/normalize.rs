//! Field normalization.
//!
//! Turns a loose [`FieldDecl`] into a fully populated [`FieldSpec`]: infers
//! the type from the default, derives the display hint, and rejects
//! contradictory property combinations.

use crate::error::{Result, SchemaError};
use crate::schema::FieldSpec;
use crate::types::{ArgType, FieldDecl, FieldKind, Value};

/// Normalizes one declaration of the given kind.
pub(crate) fn normalize_field(id: &str, decl: &FieldDecl, kind: FieldKind) -> Result<FieldSpec> {
    if id.is_empty() {
        return Err(SchemaError::InvalidDeclaration {
            field: id.to_string(),
            reason: "id cannot be empty".to_string(),
        });
    }

    if decl.required && decl.default.is_some() {
        return Err(mismatch(id, "`required` and `default` are mutually exclusive"));
    }

    let mut many = decl.many;
    let mut arg_type = decl.arg_type;

    if let Some(default) = &decl.default {
        let inferred = check_default(id, default, arg_type)?;
        if default.is_list() {
            many = true;
        }
        arg_type = arg_type.or(inferred);
    }

    if kind == FieldKind::Operand && arg_type == Some(ArgType::Boolean) {
        return Err(SchemaError::InvalidType {
            field: id.to_string(),
            ty: ArgType::Boolean.to_string(),
        });
    }

    let hint = decl
        .hint
        .clone()
        .or_else(|| arg_type.map(|ty| ty.hint()));

    let value_type = match (kind, arg_type) {
        (_, Some(ty)) => ty,
        (FieldKind::Operand, None) => ArgType::String,
        (FieldKind::Option, None) if many || decl.parse.is_some() => ArgType::String,
        (FieldKind::Option, None) => ArgType::Boolean,
    };

    let default = decl.default.clone().map(|value| match value {
        Value::List(_) => value,
        scalar if many => Value::List(vec![scalar]),
        scalar => scalar,
    });

    Ok(FieldSpec {
        id: id.to_string(),
        kind,
        description: decl.description.clone(),
        value_type,
        hint: hint.or_else(|| (value_type != ArgType::Boolean).then(|| value_type.hint())),
        required: decl.required,
        default,
        many,
        parse: decl.parse.clone(),
        validate: decl.validate.clone(),
    })
}

/// Checks a default against the declared type and returns its runtime type.
fn check_default(
    id: &str,
    default: &Value,
    declared: Option<ArgType>,
) -> Result<Option<ArgType>> {
    let items: &[Value] = match default {
        Value::List(items) => items,
        scalar => std::slice::from_ref(scalar),
    };

    let expected = declared.or_else(|| items.first().and_then(Value::arg_type));
    for item in items {
        if item.is_list() {
            return Err(mismatch(id, "`default` cannot contain nested lists"));
        }
        if let (Some(expected), Some(found)) = (expected, item.arg_type()) {
            if expected != found {
                return Err(mismatch(
                    id,
                    &format!("`default` is a {found} but the field type is {expected}"),
                ));
            }
        }
    }

    Ok(expected)
}

fn mismatch(id: &str, reason: &str) -> SchemaError {
    SchemaError::PropertyMismatch {
        field: id.to_string(),
        reason: reason.to_string(),
    }
}
