//! Schema-driven argument parsing.
//!
//! A [`Parser`] is built once from a [`RawSchema`] and can then parse any
//! number of argument vectors. Every parse call is independent; the parser
//! holds no mutable state and may be shared across threads.
//!
//! # Example
//!
//! ```
//! use argv_schema_parser::{ArgType, FieldDecl, Parser, RawSchema, Value};
//!
//! let parser = Parser::new(
//!     RawSchema::new()
//!         .option("count", FieldDecl::typed(ArgType::Number).with_default(1))
//!         .option("verbose", FieldDecl::flag())
//!         .operand("files", FieldDecl::new().many()),
//! )
//! .unwrap();
//!
//! let args = parser
//!     .parse(["-v", "--count", "3", "a.txt", "b.txt"])
//!     .unwrap()
//!     .into_args()
//!     .unwrap();
//!
//! assert_eq!(args.get_f64("count"), Some(3.0));
//! assert!(args.flag("verbose"));
//! assert_eq!(args.get("files"), Some(&Value::from(vec!["a.txt", "b.txt"])));
//! ```

mod args;
mod coerce;
mod defaults;
mod engine;
mod error;
mod expand;
mod token;

use std::ffi::OsString;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

pub use args::ParsedArgs;
pub use argv_schema_core::{
    ArgType, FieldDecl, FieldSpec, OptionDecl, OptionSpec, RawSchema, Schema, SchemaError, Value,
};
pub use error::{Error, ParseError, Result};

use defaults::apply_defaults;
use engine::Engine;
use token::TokenQueue;

/// Produces help text for a schema when `--help` is matched.
pub trait HelpRenderer: Send + Sync {
    fn render(&self, schema: &Schema) -> String;
}

impl<F> HelpRenderer for F
where
    F: Fn(&Schema) -> String + Send + Sync,
{
    fn render(&self, schema: &Schema) -> String {
        self(schema)
    }
}

/// Result of a successful parse call.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Values for every matched or defaulted field.
    Args(ParsedArgs),
    /// `--help` was given. Carries rendered text when a renderer is set.
    /// Defaults and required checks are skipped.
    Help(Option<String>),
}

impl ParseOutcome {
    pub fn args(&self) -> Option<&ParsedArgs> {
        match self {
            Self::Args(args) => Some(args),
            Self::Help(_) => None,
        }
    }

    pub fn into_args(self) -> Option<ParsedArgs> {
        match self {
            Self::Args(args) => Some(args),
            Self::Help(_) => None,
        }
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help(_))
    }
}

/// A reusable parser over a normalized schema.
#[derive(Clone)]
pub struct Parser {
    schema: Schema,
    renderer: Option<Arc<dyn HelpRenderer>>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("schema", &self.schema)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl Parser {
    /// Normalizes `raw` (with the reserved `help` and `version` options
    /// merged in) and builds a parser for it.
    pub fn new(raw: RawSchema) -> std::result::Result<Self, SchemaError> {
        Ok(Self::from_schema(Schema::new(raw)?))
    }

    pub fn from_schema(schema: Schema) -> Self {
        Self {
            schema,
            renderer: None,
        }
    }

    pub fn with_help_renderer(mut self, renderer: impl HelpRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Parses an argument vector, not including the program name.
    pub fn parse<I, S>(&self, args: I) -> std::result::Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue = TokenQueue::new(args);
        debug!(tokens = queue.len(), "Parsing arguments");

        let scan = Engine::new(&self.schema, queue).run()?;
        if scan.help_requested {
            debug!("Help requested");
            let text = self
                .renderer
                .as_ref()
                .map(|renderer| renderer.render(&self.schema));
            return Ok(ParseOutcome::Help(text));
        }

        let args = apply_defaults(&self.schema, scan.args)?;
        debug!(fields = args.len(), "Parsed arguments");
        Ok(ParseOutcome::Args(args))
    }

    /// Parses the current process arguments, skipping the program name.
    pub fn parse_env(&self) -> std::result::Result<ParseOutcome, ParseError> {
        self.parse_os(std::env::args_os().skip(1))
    }

    /// Parses OS strings, converting non-UTF-8 arguments lossily.
    pub fn parse_os<I>(&self, args: I) -> std::result::Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = OsString>,
    {
        self.parse(args.into_iter().map(|arg| arg.to_string_lossy().into_owned()))
    }
}

/// Builds a parser for `raw` and parses `args` with it.
pub fn parse<I, S>(raw: RawSchema, args: I) -> Result<ParseOutcome>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(Parser::new(raw)?.parse(args)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> Parser {
        Parser::new(
            RawSchema::new()
                .option("name", FieldDecl::typed(ArgType::String).required())
                .option("level", FieldDecl::new().with_default(2)),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_applied_after_scan() {
        let args = parser().parse(["--name", "x"]).unwrap().into_args().unwrap();
        assert_eq!(args.get_str("name"), Some("x"));
        assert_eq!(args.get_f64("level"), Some(2.0));
        assert!(!args.contains("help"));
    }

    #[test]
    fn test_help_skips_required_check() {
        let outcome = parser().parse(["--help"]).unwrap();
        assert_eq!(outcome, ParseOutcome::Help(None));
        assert!(outcome.args().is_none());
    }

    #[test]
    fn test_help_uses_renderer() {
        let parser = parser().with_help_renderer(|schema: &Schema| {
            format!("{} options", schema.options().len())
        });
        let outcome = parser.parse(["-h"]).unwrap();
        assert_eq!(outcome, ParseOutcome::Help(Some("4 options".to_string())));
    }

    #[test]
    fn test_version_is_plain_flag() {
        let args = parser()
            .parse(["--name", "x", "--version"])
            .unwrap()
            .into_args()
            .unwrap();
        assert!(args.flag("version"));
    }

    #[test]
    fn test_parser_is_reusable() {
        let parser = parser();
        assert!(parser.parse(["--name", "a"]).is_ok());
        assert!(parser.parse(["--name", "b"]).is_ok());
        assert!(parser.parse(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_one_shot_parse_reports_schema_errors() {
        let raw = RawSchema::new().option("x", FieldDecl::new().required().with_default(1));
        let err = parse(raw, ["-x"]).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::PropertyMismatch { .. })));
    }

    #[test]
    fn test_parse_os_converts_lossily() {
        let parser = Parser::new(RawSchema::new().with_catch_all("rest")).unwrap();
        let args = parser
            .parse_os(vec![OsString::from("a"), OsString::from("b")])
            .unwrap()
            .into_args()
            .unwrap();
        assert_eq!(args.get("rest"), Some(&Value::from(vec!["a", "b"])));
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_os_replaces_invalid_utf8() {
        use std::os::unix::ffi::OsStringExt;

        let parser = Parser::new(RawSchema::new().operand("path", FieldDecl::new())).unwrap();
        let raw = OsString::from_vec(vec![b'a', 0xff, b'b']);
        let args = parser.parse_os([raw]).unwrap().into_args().unwrap();
        assert_eq!(args.get_str("path"), Some("a\u{FFFD}b"));
    }

    #[test]
    fn test_parse_env_reads_process_arguments() {
        let parser = Parser::new(RawSchema::new().with_catch_all("rest")).unwrap();
        assert_eq!(
            parser.parse_env(),
            parser.parse_os(std::env::args_os().skip(1))
        );
    }

    #[test]
    fn test_parser_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Parser>();
    }
}
