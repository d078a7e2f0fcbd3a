//! Normalized schema: the option cache and operand stack a parser reads.
//!
//! A [`Schema`] is built once from a [`RawSchema`] and is immutable
//! afterwards, so any number of parse calls can share it.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::allocate::IdAllocator;
use crate::error::{Result, SchemaError};
use crate::merge::{merge_schemas, reserved_schema};
use crate::normalize::normalize_field;
use crate::types::{ArgType, FieldKind, ParseHook, RawSchema, ValidateHook, Value};

/// A fully populated field declaration.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub id: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Effective type after inference.
    #[serde(rename = "type")]
    pub value_type: ArgType,
    /// Display label; `None` only for untyped flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub required: bool,
    /// Default value; a list whenever `many` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub many: bool,
    #[serde(skip)]
    pub parse: Option<ParseHook>,
    #[serde(skip)]
    pub validate: Option<ValidateHook>,
}

impl FieldSpec {
    /// Whether a match consumes an argument token.
    ///
    /// Options of type [`ArgType::Boolean`] are flags; every operand takes a
    /// value.
    pub fn takes_value(&self) -> bool {
        self.kind == FieldKind::Operand || self.value_type != ArgType::Boolean
    }

    /// Label used in "expecting ..." messages.
    pub fn display_hint(&self) -> String {
        self.hint.clone().unwrap_or_else(|| self.value_type.hint())
    }
}

/// A normalized option with its allocated identifiers.
#[derive(Debug, Clone, Serialize)]
pub struct OptionSpec {
    #[serde(flatten)]
    pub field: FieldSpec,
    #[serde(rename = "shortId")]
    pub short_id: char,
    #[serde(rename = "longId")]
    pub long_id: String,
}

impl OptionSpec {
    pub fn id(&self) -> &str {
        &self.field.id
    }

    pub fn takes_value(&self) -> bool {
        self.field.takes_value()
    }
}

/// Normalized schema with an option cache and an operand stack.
///
/// # Examples
///
/// ```
/// use argv_schema_core::*;
///
/// let raw = RawSchema::new()
///     .option("maxRetries", FieldDecl::new().with_default(3))
///     .option("verbose", FieldDecl::flag())
///     .operand("files", FieldDecl::new().many());
///
/// let schema = Schema::new(raw).unwrap();
/// let retries = schema.resolve("max-retries").unwrap();
/// assert_eq!(retries.short_id, 'm');
/// assert_eq!(retries.field.value_type, ArgType::Number);
///
/// // Reserved options are merged in after the declared ones.
/// assert!(schema.resolve("help").is_some());
/// assert_eq!(schema.resolve("V").unwrap().id(), "version");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    options: Vec<OptionSpec>,
    operands: Vec<FieldSpec>,
    #[serde(skip)]
    cache: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from `raw` merged with the reserved `help` and
    /// `version` options.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when a declaration is inconsistent or two
    /// fields claim the same identifier.
    pub fn new(raw: RawSchema) -> Result<Self> {
        let merged = merge_schemas(&reserved_schema(), &raw);
        Self::build(&merged)
    }

    /// Builds a schema from `raw` alone, without the reserved options.
    pub fn without_reserved(raw: RawSchema) -> Result<Self> {
        Self::build(&raw)
    }

    fn build(raw: &RawSchema) -> Result<Self> {
        let mut seen: HashMap<&str, FieldKind> = HashMap::new();
        let declared = raw
            .option_ids()
            .into_iter()
            .map(|id| (id, FieldKind::Option))
            .chain(raw.operand_ids().into_iter().map(|id| (id, FieldKind::Operand)));
        for (id, kind) in declared {
            if let Some(first) = seen.insert(id, kind) {
                return Err(SchemaError::IdConflict {
                    first: format!("{first} {id}"),
                    second: format!("{kind} {id}"),
                    id: id.to_string(),
                });
            }
        }

        let mut allocator = IdAllocator::new();
        let mut options = Vec::with_capacity(raw.options.len());
        for (id, decl) in &raw.options {
            let field = normalize_field(id, &decl.field, FieldKind::Option)?;
            let (short_id, long_id) = allocator.allocate(id, decl)?;
            options.push(OptionSpec {
                field,
                short_id,
                long_id,
            });
        }

        let mut operands = Vec::with_capacity(raw.operands.len());
        for (id, decl) in &raw.operands {
            if let Some(previous) = operands.last().filter(|p: &&FieldSpec| p.many) {
                return Err(SchemaError::PropertyMismatch {
                    field: previous.id.clone(),
                    reason: format!("only the last operand may be `many`, but `{id}` follows"),
                });
            }
            operands.push(normalize_field(id, &decl.field, FieldKind::Operand)?);
        }

        let mut cache = HashMap::with_capacity(options.len() * 2);
        for (index, option) in options.iter().enumerate() {
            cache.insert(option.short_id.to_string(), index);
            cache.insert(option.long_id.clone(), index);
        }

        debug!(
            options = options.len(),
            operands = operands.len(),
            "Normalized schema"
        );

        Ok(Self {
            options,
            operands,
            cache,
        })
    }

    /// Resolves a short or long identifier through the option cache.
    pub fn resolve(&self, key: &str) -> Option<&OptionSpec> {
        self.cache.get(key).map(|&index| &self.options[index])
    }

    pub fn resolve_short(&self, short: char) -> Option<&OptionSpec> {
        let mut buf = [0u8; 4];
        self.resolve(short.encode_utf8(&mut buf))
    }

    /// Finds an option by its field id.
    pub fn option(&self, id: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.field.id == id)
    }

    /// Finds an operand by its field id.
    pub fn operand(&self, id: &str) -> Option<&FieldSpec> {
        self.operands.iter().find(|o| o.id == id)
    }

    /// Options in canonical (allocation) order.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// The operand stack, first-declared first.
    pub fn operands(&self) -> &[FieldSpec] {
        &self.operands
    }

    /// All fields: options first, then operands.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.options
            .iter()
            .map(|o| &o.field)
            .chain(self.operands.iter())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::types::{FieldDecl, OptionDecl};

    #[test]
    fn test_cache_maps_both_ids_to_same_option() {
        let schema = Schema::without_reserved(
            RawSchema::new().option("count", FieldDecl::typed(ArgType::Number)),
        )
        .unwrap();

        let by_short = schema.resolve("c").unwrap();
        let by_long = schema.resolve("count").unwrap();
        assert!(std::ptr::eq(by_short, by_long));
        assert!(std::ptr::eq(schema.resolve_short('c').unwrap(), by_long));
    }

    #[test]
    fn test_reserved_options_follow_declared_ones() {
        let schema = Schema::new(RawSchema::new().option("host", FieldDecl::typed(ArgType::String)))
            .unwrap();

        let ids: Vec<&str> = schema.options().iter().map(OptionSpec::id).collect();
        assert_eq!(ids, vec!["host", "help", "version"]);
        assert_eq!(schema.option("host").unwrap().short_id, 'h');
        assert_eq!(schema.option("help").unwrap().short_id, 'H');
    }

    #[test]
    fn test_overriding_reserved_option_keeps_user_position() {
        let raw = RawSchema::new()
            .option("version", OptionDecl::from(FieldDecl::new()).with_short('x'))
            .option("verbose", FieldDecl::flag());

        let schema = Schema::new(raw).unwrap();
        let version = schema.option("version").unwrap();
        assert_eq!(version.short_id, 'x');
        assert_eq!(version.field.description.as_deref(), Some("Show version"));
        assert_eq!(schema.option("verbose").unwrap().short_id, 'v');
    }

    #[test]
    fn test_duplicate_explicit_short_ids_conflict() {
        let raw = RawSchema::new()
            .option("alpha", OptionDecl::from(FieldDecl::flag()).with_short('q'))
            .option("beta", OptionDecl::from(FieldDecl::flag()).with_short('q'));

        let err = Schema::new(raw).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::IdConflict { ref first, ref second, .. }
                if first == "alpha" && second == "beta"
        ));
    }

    #[test]
    fn test_option_and_operand_sharing_id_conflict() {
        let raw = RawSchema::new()
            .option("file", FieldDecl::typed(ArgType::String))
            .operand("file", FieldDecl::new());
        let err = Schema::without_reserved(raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "id conflict: `option file` and `operand file` both claim `file`"
        );
    }

    #[test]
    fn test_many_operand_must_be_last() {
        let raw = RawSchema::new()
            .operand("files", FieldDecl::new().many())
            .operand("dest", FieldDecl::new());
        let err = Schema::without_reserved(raw).unwrap_err();
        assert!(matches!(err, SchemaError::PropertyMismatch { ref field, .. } if field == "files"));
    }

    #[test]
    fn test_allocated_ids_are_unique() {
        let raw = RawSchema::new()
            .option("alpha", FieldDecl::flag())
            .option("all", FieldDecl::flag())
            .option("beta", FieldDecl::typed(ArgType::String))
            .option("bravo", FieldDecl::typed(ArgType::Number));
        let schema = Schema::new(raw).unwrap();

        let mut keys = HashSet::new();
        for option in schema.options() {
            assert!(keys.insert(option.short_id.to_string()));
            assert!(keys.insert(option.long_id.clone()));
        }
    }

    #[test]
    fn test_serializes_normalized_fields() {
        let schema = Schema::without_reserved(
            RawSchema::new().option("count", FieldDecl::new().with_default(2)),
        )
        .unwrap();

        let json = serde_json::to_value(&schema).unwrap();
        let count = &json["options"][0];
        assert_eq!(count["id"], "count");
        assert_eq!(count["type"], "number");
        assert_eq!(count["hint"], "NUMBER");
        assert_eq!(count["shortId"], "c");
        assert_eq!(count["longId"], "count");
    }
}
