//! Loading schemas from loosely-typed data.
//!
//! Schema documents are JSON or YAML of the shape
//!
//! ```yaml
//! options:
//!   count:
//!     type: number
//!     default: 3
//!   verbose:
//!     shortId: V
//! operands:
//!   files:
//!     many: true
//! ```
//!
//! Every declaration is checked against the property set for its kind
//! before it is deserialized, so a typo surfaces as
//! [`SchemaError::UnknownProperty`] naming both the property and the field.
//! Key order in the document is the declaration order.

use std::io::BufReader;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use crate::error::{Result, SchemaError};
use crate::types::{ArgType, FieldDecl, FieldKind, OperandDecl, OptionDecl, RawSchema};

const SCHEMA_SECTIONS: &[&str] = &["options", "operands"];

const FIELD_PROPERTIES: &[&str] = &[
    "description",
    "type",
    "name",
    "hint",
    "required",
    "default",
    "value",
    "many",
    "multiple",
];

const SHORT_ID_KEYS: &[&str] = &["shortId", "short_id"];
const LONG_ID_KEYS: &[&str] = &["longId", "long_id"];

impl RawSchema {
    /// Builds a raw schema from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownProperty`] for unrecognized keys,
    /// [`SchemaError::InvalidType`] for a `type` outside the type set, and
    /// [`SchemaError::InvalidDeclaration`] for malformed declarations.
    ///
    /// # Examples
    ///
    /// ```
    /// use argv_schema_core::{RawSchema, SchemaError};
    ///
    /// let raw = RawSchema::from_json_value(serde_json::json!({
    ///     "options": { "count": { "type": "number" } },
    ///     "operands": { "files": { "many": true } }
    /// }))
    /// .unwrap();
    /// assert_eq!(raw.option_ids(), vec!["count"]);
    ///
    /// let err = RawSchema::from_json_value(serde_json::json!({
    ///     "options": { "count": { "typ": "number" } }
    /// }))
    /// .unwrap_err();
    /// assert!(matches!(err, SchemaError::UnknownProperty { .. }));
    /// ```
    pub fn from_json_value(value: JsonValue) -> Result<Self> {
        let mut root = into_object("<schema>", value)?;
        if let Some(key) = root.keys().find(|k| !SCHEMA_SECTIONS.contains(&k.as_str())) {
            return Err(SchemaError::UnknownProperty {
                field: "<schema>".to_string(),
                property: key.clone(),
            });
        }

        let mut raw = RawSchema::new();
        if let Some(options) = root.remove("options") {
            for (id, decl) in into_object("options", options)? {
                let decl = option_from_json(&id, decl)?;
                raw = raw.option(&id, decl);
            }
        }
        if let Some(operands) = root.remove("operands") {
            for (id, decl) in into_object("operands", operands)? {
                let map = into_object(&id, decl)?;
                let field = field_from_json(&id, map, FieldKind::Operand)?;
                raw = raw.operand(&id, OperandDecl::from(field));
            }
        }

        Ok(raw)
    }

    /// Parses a JSON schema document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Parses a YAML schema document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_json_value(value)
    }

    /// Loads a schema file, choosing the format from its extension
    /// (`.json`, `.yaml` or `.yml`).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedFormat`] for other extensions,
    /// [`SchemaError::IoError`] if the file cannot be read, or a parse error
    /// from the matching format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let value: JsonValue = match ext {
            "json" => {
                let reader = BufReader::new(std::fs::File::open(path)?);
                serde_json::from_reader(reader)?
            }
            "yaml" | "yml" => {
                let reader = BufReader::new(std::fs::File::open(path)?);
                serde_yaml::from_reader(reader)?
            }
            _ => return Err(SchemaError::UnsupportedFormat(path.to_path_buf())),
        };
        Self::from_json_value(value)
    }
}

fn option_from_json(id: &str, decl: JsonValue) -> Result<OptionDecl> {
    let mut map = into_object(id, decl)?;

    let short_id = match take_any(&mut map, SHORT_ID_KEYS) {
        Some(JsonValue::String(s)) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c != '-' => Some(c),
                _ => return Err(invalid(id, &format!("shortId `{s}` must be one character"))),
            }
        }
        Some(other) => return Err(invalid(id, &format!("shortId must be a string, got {other}"))),
        None => None,
    };

    let long_id = match take_any(&mut map, LONG_ID_KEYS) {
        Some(JsonValue::String(s)) if !s.is_empty() && !s.starts_with('-') => Some(s),
        Some(other) => return Err(invalid(id, &format!("invalid longId {other}"))),
        None => None,
    };

    Ok(OptionDecl {
        field: field_from_json(id, map, FieldKind::Option)?,
        short_id,
        long_id,
    })
}

fn field_from_json(id: &str, map: Map<String, JsonValue>, kind: FieldKind) -> Result<FieldDecl> {
    if let Some(key) = map.keys().find(|k| !FIELD_PROPERTIES.contains(&k.as_str())) {
        return Err(SchemaError::UnknownProperty {
            field: id.to_string(),
            property: key.clone(),
        });
    }

    if let Some(ty) = map.get("type") {
        let valid = ty
            .as_str()
            .and_then(ArgType::from_name)
            .is_some_and(|t| kind == FieldKind::Option || t != ArgType::Boolean);
        if !valid {
            return Err(SchemaError::InvalidType {
                field: id.to_string(),
                ty: ty.as_str().map(String::from).unwrap_or_else(|| ty.to_string()),
            });
        }
    }

    if map.contains_key("name") && map.contains_key("hint") {
        return Err(invalid(id, "`name` and `hint` are aliases; set only one"));
    }
    if map.contains_key("default") && map.contains_key("value") {
        return Err(invalid(id, "`default` and `value` are aliases; set only one"));
    }
    if map.contains_key("many") && map.contains_key("multiple") {
        return Err(invalid(id, "`many` and `multiple` are aliases; set only one"));
    }

    let decl: FieldDecl = serde_json::from_value(JsonValue::Object(map))
        .map_err(|err| invalid(id, &err.to_string()))?;
    Ok(decl)
}

fn take_any(map: &mut Map<String, JsonValue>, keys: &[&str]) -> Option<JsonValue> {
    keys.iter().find_map(|key| map.remove(*key))
}

fn into_object(field: &str, value: JsonValue) -> Result<Map<String, JsonValue>> {
    match value {
        JsonValue::Object(map) => Ok(map),
        JsonValue::Null => Ok(Map::new()),
        other => Err(invalid(field, &format!("expected a mapping, got {other}"))),
    }
}

fn invalid(field: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidDeclaration {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
