//! Short and long identifier allocation for options.
//!
//! Short and long identifiers share a single namespace because both are
//! keys of the same option cache. Allocation is first-come in the order
//! options are handed to [`IdAllocator::allocate`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SchemaError};
use crate::types::OptionDecl;

static ACRONYM_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("static regex must compile"));
static CAMEL_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("static regex must compile"));
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("static regex must compile"));

/// Converts a field id to kebab-case (`maxRetries` → `max-retries`).
pub(crate) fn kebab_case(id: &str) -> String {
    let split = ACRONYM_BOUNDARY_RE.replace_all(id, "$1-$2");
    let split = CAMEL_BOUNDARY_RE.replace_all(&split, "$1-$2");
    SEPARATOR_RE.replace_all(&split, "-").to_lowercase()
}

/// Tracks which field owns each identifier.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    claimed: HashMap<String, String>,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Assigns the short and long identifiers for one option.
    pub(crate) fn allocate(&mut self, id: &str, decl: &OptionDecl) -> Result<(char, String)> {
        let short = match decl.short_id {
            Some(short) => {
                self.claim(short.to_string(), id)?;
                short
            }
            None => self.auto_short(id)?,
        };

        let long = decl.long_id.clone().unwrap_or_else(|| kebab_case(id));
        if long.is_empty() {
            return Err(SchemaError::InvalidDeclaration {
                field: id.to_string(),
                reason: "long id cannot be empty".to_string(),
            });
        }
        self.claim(long.clone(), id)?;

        Ok((short, long))
    }

    fn auto_short(&mut self, id: &str) -> Result<char> {
        let first = id.chars().next().ok_or_else(|| SchemaError::InvalidDeclaration {
            field: id.to_string(),
            reason: "id cannot be empty".to_string(),
        })?;

        if !self.claimed.contains_key(&first.to_string()) {
            self.claimed.insert(first.to_string(), id.to_string());
            return Ok(first);
        }

        let mut upper = first.to_uppercase();
        let fallback = match (upper.next(), upper.next()) {
            (Some(c), None) if c != first => Some(c),
            _ => None,
        };

        match fallback {
            Some(c) => {
                self.claim(c.to_string(), id)?;
                Ok(c)
            }
            None => Err(self.conflict(&first.to_string(), id)),
        }
    }

    fn claim(&mut self, key: String, owner: &str) -> Result<()> {
        match self.claimed.get(&key) {
            Some(existing) if existing != owner => Err(self.conflict(&key, owner)),
            Some(_) => Ok(()),
            None => {
                self.claimed.insert(key, owner.to_string());
                Ok(())
            }
        }
    }

    fn conflict(&self, key: &str, owner: &str) -> SchemaError {
        SchemaError::IdConflict {
            first: self.claimed.get(key).cloned().unwrap_or_default(),
            second: owner.to_string(),
            id: key.to_string(),
        }
    }
}
