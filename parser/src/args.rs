//! The result map produced by a parse call.

use std::collections::BTreeMap;

use argv_schema_core::{FieldSpec, Value};
use serde::Serialize;

use crate::error::ParseError;

/// Parsed values keyed by field id.
///
/// `many` fields hold a [`Value::List`]; flags hold [`Value::Boolean`].
/// Serializes as a plain map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedArgs {
    values: BTreeMap<String, Value>,
}

impl ParsedArgs {
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn get_str(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(Value::as_str)
    }

    pub fn get_f64(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(Value::as_f64)
    }

    /// Whether a flag is set to `true`.
    pub fn flag(&self, id: &str) -> bool {
        self.get(id).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_list(&self, id: &str) -> Option<&[Value]> {
        self.get(id).and_then(Value::as_list)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.values
    }

    /// Records one matched value, appending for `many` fields.
    pub(crate) fn insert(&mut self, field: &FieldSpec, value: Value) -> Result<(), ParseError> {
        match self.values.get_mut(&field.id) {
            Some(Value::List(items)) if field.many => items.push(value),
            Some(_) => {
                return Err(ParseError::DuplicateValue {
                    id: field.id.clone(),
                    hint: field.display_hint(),
                });
            }
            None if field.many => {
                self.values.insert(field.id.clone(), Value::List(vec![value]));
            }
            None => {
                self.values.insert(field.id.clone(), value);
            }
        }
        Ok(())
    }

    /// Sets a value for a field that has none yet.
    pub(crate) fn fill(&mut self, id: &str, value: Value) {
        self.values.entry(id.to_string()).or_insert(value);
    }
}

#[cfg(test)]
mod tests {
    use argv_schema_core::{ArgType, FieldDecl, RawSchema, Schema};

    use super::*;

    fn fields() -> Schema {
        Schema::without_reserved(
            RawSchema::new()
                .option("name", FieldDecl::typed(ArgType::String))
                .option("tags", FieldDecl::new().many()),
        )
        .unwrap()
    }

    #[test]
    fn test_many_field_accumulates() {
        let schema = fields();
        let tags = &schema.option("tags").unwrap().field;
        let mut args = ParsedArgs::default();

        args.insert(tags, Value::from("a")).unwrap();
        args.insert(tags, Value::from("b")).unwrap();
        assert_eq!(args.get("tags"), Some(&Value::from(vec!["a", "b"])));
    }

    #[test]
    fn test_scalar_field_rejects_second_value() {
        let schema = fields();
        let name = &schema.option("name").unwrap().field;
        let mut args = ParsedArgs::default();

        args.insert(name, Value::from("x")).unwrap();
        let err = args.insert(name, Value::from("y")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expecting STRING for argument name: value given more than once"
        );
        assert_eq!(args.get_str("name"), Some("x"));
    }

    #[test]
    fn test_fill_does_not_overwrite() {
        let mut args = ParsedArgs::default();
        args.fill("count", Value::from(1));
        args.fill("count", Value::from(2));
        assert_eq!(args.get_f64("count"), Some(1.0));
        assert!(!args.flag("count"));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let schema = fields();
        let mut args = ParsedArgs::default();
        args.insert(&schema.option("name").unwrap().field, Value::from("x"))
            .unwrap();
        args.fill("verbose", Value::Boolean(true));

        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "x", "verbose": true }));
    }
}
