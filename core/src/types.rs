//! Declaration type definitions for argv schemas.
//!
//! This module defines the data model a caller uses to describe the options
//! and operands of a command line. The declaration records are deliberately
//! loose (most attributes optional); [`Schema::new`](crate::Schema::new)
//! turns them into fully populated specs.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Argument type of an option or operand.
///
/// The set is closed: options accept all three, operands only
/// [`String`](ArgType::String) and [`Number`](ArgType::Number).
///
/// # Examples
///
/// ```
/// use argv_schema_core::ArgType;
///
/// assert_eq!(ArgType::from_name("number"), Some(ArgType::Number));
/// assert_eq!(ArgType::from_name("date"), None);
/// assert_eq!(ArgType::Number.hint(), "NUMBER");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    /// Free-form string value.
    String,
    /// Numeric value (parsed as `f64`).
    Number,
    /// Boolean value; options of this type are flags.
    Boolean,
}

impl ArgType {
    /// Returns the lowercase type name used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgType::String => "string",
            ArgType::Number => "number",
            ArgType::Boolean => "boolean",
        }
    }

    /// Looks up a type by its schema name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ArgType::String),
            "number" => Some(ArgType::Number),
            "boolean" => Some(ArgType::Boolean),
            _ => None,
        }
    }

    /// Returns the default display hint for this type (uppercased name).
    pub fn hint(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed argument value.
///
/// Serialized untagged, so JSON `3` maps to [`Value::Number`], `"x"` to
/// [`Value::String`], `true` to [`Value::Boolean`] and arrays to
/// [`Value::List`].
///
/// # Examples
///
/// ```
/// use argv_schema_core::{ArgType, Value};
///
/// let v = Value::from(3.0);
/// assert_eq!(v.arg_type(), Some(ArgType::Number));
///
/// let list = Value::from(vec!["a", "b"]);
/// assert_eq!(list.arg_type(), Some(ArgType::String));
/// assert_eq!(list.as_list().map(|l| l.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    /// Returns the argument type of this value.
    ///
    /// Lists report the type of their first element; empty lists report
    /// `None`.
    pub fn arg_type(&self) -> Option<ArgType> {
        match self {
            Value::Boolean(_) => Some(ArgType::Boolean),
            Value::Number(_) => Some(ArgType::Number),
            Value::String(_) => Some(ArgType::String),
            Value::List(items) => items.first().and_then(Value::arg_type),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&rendered.join(","))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

type ParseFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;
type ValidateFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// User-supplied conversion from a raw token to a typed value.
///
/// When present on a field it replaces the built-in coercion entirely.
#[derive(Clone)]
pub struct ParseHook(Arc<ParseFn>);

impl ParseHook {
    pub fn new(f: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, raw: &str) -> Result<Value, String> {
        (self.0)(raw)
    }
}

impl fmt::Debug for ParseHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParseHook(..)")
    }
}

/// User-supplied check run on every coerced value of a field.
#[derive(Clone)]
pub struct ValidateHook(Arc<ValidateFn>);

impl ValidateHook {
    pub fn new(f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: &Value) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for ValidateHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidateHook(..)")
    }
}

/// Which declaration set a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Option,
    Operand,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Option => f.write_str("option"),
            FieldKind::Operand => f.write_str("operand"),
        }
    }
}

/// Attributes shared by option and operand declarations.
///
/// Every attribute is optional; normalization fills in the rest. Use the
/// constructors and `with_*` builder methods to declare fields in code.
///
/// # Examples
///
/// ```
/// use argv_schema_core::{ArgType, FieldDecl};
///
/// let count = FieldDecl::typed(ArgType::Number)
///     .with_description("How many times to retry")
///     .with_default(3);
/// assert_eq!(count.arg_type, Some(ArgType::Number));
/// assert!(!count.required);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    /// Human-readable description for help renderers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared argument type (inferred from `default` when absent).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub arg_type: Option<ArgType>,
    /// Display label for the value (defaults to the uppercased type).
    #[serde(alias = "name", default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the field must end up with a value.
    #[serde(default)]
    pub required: bool,
    /// Value used when the field is absent from the input.
    #[serde(alias = "value", default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Whether repeated occurrences accumulate into a list.
    #[serde(alias = "multiple", default)]
    pub many: bool,
    #[serde(skip)]
    pub parse: Option<ParseHook>,
    #[serde(skip)]
    pub validate: Option<ValidateHook>,
}

impl FieldDecl {
    /// Creates an empty declaration; every attribute is left to inference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a boolean flag declaration.
    pub fn flag() -> Self {
        Self::typed(ArgType::Boolean)
    }

    /// Creates a declaration with an explicit type.
    pub fn typed(arg_type: ArgType) -> Self {
        Self {
            arg_type: Some(arg_type),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_type(mut self, arg_type: ArgType) -> Self {
        self.arg_type = Some(arg_type);
        self
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as accumulating repeated occurrences.
    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }

    pub fn with_parse(
        mut self,
        f: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.parse = Some(ParseHook::new(f));
        self
    }

    pub fn with_validate(
        mut self,
        f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(ValidateHook::new(f));
        self
    }
}

/// Declaration of a named option (`-x` / `--name`).
///
/// # Examples
///
/// ```
/// use argv_schema_core::{FieldDecl, OptionDecl};
///
/// let verbose = OptionDecl::from(FieldDecl::flag()).with_short('V');
/// assert_eq!(verbose.short_id, Some('V'));
/// assert!(verbose.long_id.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct OptionDecl {
    #[serde(flatten)]
    pub field: FieldDecl,
    /// Explicit single-character identifier.
    #[serde(rename = "shortId", skip_serializing_if = "Option::is_none")]
    pub short_id: Option<char>,
    /// Explicit long identifier (without the leading `--`).
    #[serde(rename = "longId", skip_serializing_if = "Option::is_none")]
    pub long_id: Option<String>,
}

impl OptionDecl {
    pub fn new(field: FieldDecl) -> Self {
        Self {
            field,
            short_id: None,
            long_id: None,
        }
    }

    pub fn with_short(mut self, short: char) -> Self {
        self.short_id = Some(short);
        self
    }

    pub fn with_long(mut self, long: &str) -> Self {
        self.long_id = Some(long.to_string());
        self
    }
}

impl From<FieldDecl> for OptionDecl {
    fn from(field: FieldDecl) -> Self {
        Self::new(field)
    }
}

/// Declaration of a positional operand.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct OperandDecl {
    pub field: FieldDecl,
}

impl From<FieldDecl> for OperandDecl {
    fn from(field: FieldDecl) -> Self {
        Self { field }
    }
}

/// A schema as written by its author: options and operands in declaration
/// order, before normalization.
///
/// Declaring an id twice replaces the earlier declaration in place.
///
/// # Examples
///
/// ```
/// use argv_schema_core::{ArgType, FieldDecl, RawSchema};
///
/// let raw = RawSchema::new()
///     .option("count", FieldDecl::typed(ArgType::Number))
///     .option("verbose", FieldDecl::flag())
///     .operand("files", FieldDecl::new().many());
///
/// assert_eq!(raw.option_ids(), vec!["count", "verbose"]);
/// assert!(raw.find_operand("files").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RawSchema {
    pub options: Vec<(String, OptionDecl)>,
    pub operands: Vec<(String, OperandDecl)>,
}

impl RawSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares (or redeclares) an option.
    pub fn option(mut self, id: &str, decl: impl Into<OptionDecl>) -> Self {
        let decl = decl.into();
        match self.options.iter_mut().find(|(existing, _)| existing == id) {
            Some((_, slot)) => *slot = decl,
            None => self.options.push((id.to_string(), decl)),
        }
        self
    }

    /// Declares (or redeclares) an operand.
    pub fn operand(mut self, id: &str, decl: impl Into<OperandDecl>) -> Self {
        let decl = decl.into();
        match self.operands.iter_mut().find(|(existing, _)| existing == id) {
            Some((_, slot)) => *slot = decl,
            None => self.operands.push((id.to_string(), decl)),
        }
        self
    }

    /// Appends a trailing operand that absorbs every remaining token.
    pub fn with_catch_all(self, id: &str) -> Self {
        self.operand(id, FieldDecl::typed(ArgType::String).many())
    }

    pub fn find_option(&self, id: &str) -> Option<&OptionDecl> {
        self.options
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, decl)| decl)
    }

    pub fn find_operand(&self, id: &str) -> Option<&OperandDecl> {
        self.operands
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, decl)| decl)
    }

    pub fn option_ids(&self) -> Vec<&str> {
        self.options.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn operand_ids(&self) -> Vec<&str> {
        self.operands.iter().map(|(id, _)| id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_type_names_roundtrip() {
        for ty in [ArgType::String, ArgType::Number, ArgType::Boolean] {
            assert_eq!(ArgType::from_name(ty.as_str()), Some(ty));
        }
        assert_eq!(ArgType::Boolean.hint(), "BOOLEAN");
    }

    #[test]
    fn test_value_deserializes_untagged() {
        let v: Value = serde_json::from_str("3").unwrap();
        assert_eq!(v, Value::Number(3.0));

        let v: Value = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(v, Value::from(vec!["a", "b"]));

        let v: Value = serde_json::from_str("false").unwrap();
        assert_eq!(v.as_bool(), Some(false));
    }

    #[test]
    fn test_empty_list_has_no_type() {
        assert_eq!(Value::List(Vec::new()).arg_type(), None);
    }

    #[test]
    fn test_value_display_joins_lists() {
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a,b");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_field_decl_aliases() {
        let decl: FieldDecl =
            serde_json::from_str(r#"{"name": "FILE", "value": "x", "multiple": true}"#).unwrap();
        assert_eq!(decl.hint.as_deref(), Some("FILE"));
        assert_eq!(decl.default, Some(Value::from("x")));
        assert!(decl.many);
    }

    #[test]
    fn test_raw_schema_redeclare_replaces_in_place() {
        let raw = RawSchema::new()
            .option("a", FieldDecl::flag())
            .option("b", FieldDecl::flag())
            .option("a", FieldDecl::typed(ArgType::Number));

        assert_eq!(raw.option_ids(), vec!["a", "b"]);
        assert_eq!(
            raw.find_option("a").and_then(|d| d.field.arg_type),
            Some(ArgType::Number)
        );
    }

    #[test]
    fn test_catch_all_is_many_string_operand() {
        let raw = RawSchema::new().with_catch_all("rest");
        let rest = raw.find_operand("rest").unwrap();
        assert!(rest.field.many);
        assert_eq!(rest.field.arg_type, Some(ArgType::String));
    }

    #[test]
    fn test_hooks_are_callable() {
        let decl = FieldDecl::new()
            .with_parse(|raw| Ok(Value::from(raw.len() as f64)))
            .with_validate(|v| match v.as_f64() {
                Some(n) if n > 0.0 => Ok(()),
                _ => Err("must be positive".to_string()),
            });

        let parsed = decl.parse.as_ref().unwrap().call("abc").unwrap();
        assert_eq!(parsed, Value::Number(3.0));
        assert!(decl.validate.as_ref().unwrap().call(&parsed).is_ok());
        assert!(
            decl.validate
                .as_ref()
                .unwrap()
                .call(&Value::Number(0.0))
                .is_err()
        );
    }
}
