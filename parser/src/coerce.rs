//! Conversion of primitive tokens into typed values.

use argv_schema_core::{ArgType, FieldSpec, Value};

use crate::error::ParseError;

/// Converts `raw` to the typed value for `field`.
///
/// A `parse` hook replaces the built-in conversion; a `validate` hook runs
/// on whatever value results.
pub(crate) fn coerce(field: &FieldSpec, raw: &str) -> Result<Value, ParseError> {
    let value = match &field.parse {
        Some(hook) => hook.call(raw).map_err(|reason| rejected(field, reason))?,
        None => match field.value_type {
            ArgType::Number => parse_number(raw)
                .map(Value::Number)
                .ok_or_else(|| invalid(field, raw))?,
            ArgType::Boolean => parse_bool(raw)
                .map(Value::Boolean)
                .ok_or_else(|| invalid(field, raw))?,
            ArgType::String => Value::String(raw.to_string()),
        },
    };

    validate(field, value)
}

/// Value for a flag occurrence, optionally with an attached `=true`/`=false`.
pub(crate) fn coerce_flag(field: &FieldSpec, attached: Option<&str>) -> Result<Value, ParseError> {
    match attached {
        Some(raw) => coerce(field, raw),
        None => validate(field, Value::Boolean(true)),
    }
}

fn validate(field: &FieldSpec, value: Value) -> Result<Value, ParseError> {
    if let Some(hook) = &field.validate {
        hook.call(&value).map_err(|reason| rejected(field, reason))?;
    }
    Ok(value)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn invalid(field: &FieldSpec, raw: &str) -> ParseError {
    ParseError::InvalidValue {
        id: field.id.clone(),
        hint: field.display_hint(),
        token: raw.to_string(),
    }
}

fn rejected(field: &FieldSpec, reason: String) -> ParseError {
    ParseError::Rejected {
        id: field.id.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use argv_schema_core::{FieldDecl, RawSchema, Schema};

    use super::*;

    fn field(decl: FieldDecl) -> FieldSpec {
        let schema = Schema::without_reserved(RawSchema::new().option("field", decl)).unwrap();
        schema.option("field").unwrap().field.clone()
    }

    #[test]
    fn test_number_coercion() {
        let spec = field(FieldDecl::typed(ArgType::Number));
        assert_eq!(coerce(&spec, "3").unwrap(), Value::Number(3.0));
        assert_eq!(coerce(&spec, "-1.5").unwrap(), Value::Number(-1.5));
    }

    #[test]
    fn test_number_coercion_rejects_text() {
        let spec = field(FieldDecl::typed(ArgType::Number));
        let err = coerce(&spec, "three").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidValue {
                id: "field".to_string(),
                hint: "NUMBER".to_string(),
                token: "three".to_string(),
            }
        );
        assert!(coerce(&spec, "NaN").is_err());
        assert!(coerce(&spec, "").is_err());
    }

    #[test]
    fn test_string_passes_through() {
        let spec = field(FieldDecl::typed(ArgType::String));
        assert_eq!(coerce(&spec, " spaced ").unwrap(), Value::from(" spaced "));
    }

    #[test]
    fn test_parse_hook_replaces_builtin() {
        let spec = field(
            FieldDecl::typed(ArgType::Number).with_parse(|raw| Ok(Value::from(raw.to_uppercase()))),
        );
        assert_eq!(coerce(&spec, "abc").unwrap(), Value::from("ABC"));
    }

    #[test]
    fn test_parse_hook_error_is_rejection() {
        let spec = field(FieldDecl::new().with_parse(|_| Err("nope".to_string())));
        let err = coerce(&spec, "x").unwrap_err();
        assert!(matches!(err, ParseError::Rejected { ref reason, .. } if reason == "nope"));
    }

    #[test]
    fn test_validate_hook_runs_after_coercion() {
        let spec = field(FieldDecl::typed(ArgType::Number).with_validate(|v| {
            match v.as_f64() {
                Some(n) if n <= 10.0 => Ok(()),
                _ => Err("must be at most 10".to_string()),
            }
        }));
        assert!(coerce(&spec, "10").is_ok());
        let err = coerce(&spec, "11").unwrap_err();
        assert_eq!(err.to_string(), "invalid value for argument field: must be at most 10");
    }

    #[test]
    fn test_flag_values() {
        let spec = field(FieldDecl::flag());
        assert_eq!(coerce_flag(&spec, None).unwrap(), Value::Boolean(true));
        assert_eq!(coerce_flag(&spec, Some("false")).unwrap(), Value::Boolean(false));
        assert!(matches!(
            coerce_flag(&spec, Some("maybe")),
            Err(ParseError::InvalidValue { ref hint, .. }) if hint == "BOOLEAN"
        ));
    }
}
