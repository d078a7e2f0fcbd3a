//! Token expansion: quoting, comma lists, `=` values and short clusters.

use argv_schema_core::{HELP_ID, OptionSpec, Schema};

use crate::error::ParseError;
use crate::token::TokenQueue;

/// Ends option parsing; every later token is an operand.
pub(crate) const TERMINATOR: &str = "--";

const QUOTES: [char; 2] = ['"', '\''];

/// Strips a matching pair of surrounding quotes.
pub(crate) fn unquote(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    if text.len() >= 2 && QUOTES.contains(&first) && text.ends_with(first) {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// Expands one value token.
///
/// Quoted tokens are unwrapped verbatim. Anything else is split on commas:
/// the first piece is returned and the rest are pushed back onto `queue` as
/// continuations.
pub(crate) fn expand_value(text: &str, queue: &mut TokenQueue) -> String {
    if let Some(inner) = unquote(text) {
        return inner.to_string();
    }

    let mut pieces = text.split(',').map(str::to_string);
    let first = pieces.next().unwrap_or_default();
    queue.push_continuations(pieces.collect());
    first
}

/// Splits the body of a long option (without `--`) at the first `=`.
pub(crate) fn split_long(body: &str) -> (&str, Option<&str>) {
    match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    }
}

pub(crate) fn is_number(text: &str) -> bool {
    text.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Whether a surface token should be resolved as an option.
///
/// The lone `-` and negative numbers are positional, including a comma list
/// that starts with one (`-1,-2`).
pub(crate) fn is_option_like(text: &str) -> bool {
    text.starts_with('-') && text != "-" && !text.split(',').next().is_some_and(is_number)
}

/// One resolved character of a short-option cluster.
#[derive(Debug)]
pub(crate) enum ShortMatch<'s> {
    Flag(&'s OptionSpec),
    /// An option taking a value, with the rest of the cluster if non-empty.
    Valued(&'s OptionSpec, Option<String>),
}

/// Resolves a cluster such as `abc` (from `-abc`) character by character.
///
/// The first character whose option takes a value claims the remainder of
/// the cluster as its attached value, skipping one leading `=`. Expansion
/// also stops at the help flag.
pub(crate) fn expand_cluster<'s>(
    schema: &'s Schema,
    cluster: &str,
) -> Result<Vec<ShortMatch<'s>>, ParseError> {
    let mut matches = Vec::new();

    for (offset, c) in cluster.char_indices() {
        let option = schema
            .resolve_short(c)
            .ok_or_else(|| ParseError::UnknownOption(format!("-{c}")))?;

        if option.takes_value() {
            let rest = &cluster[offset + c.len_utf8()..];
            let rest = rest.strip_prefix('=').unwrap_or(rest);
            let attached = (!rest.is_empty()).then(|| rest.to_string());
            matches.push(ShortMatch::Valued(option, attached));
            break;
        }
        matches.push(ShortMatch::Flag(option));
        if option.id() == HELP_ID {
            break;
        }
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use argv_schema_core::{ArgType, FieldDecl, RawSchema};

    use super::*;

    fn schema() -> Schema {
        Schema::without_reserved(
            RawSchema::new()
                .option("all", FieldDecl::flag())
                .option("bytes", FieldDecl::flag())
                .option("count", FieldDecl::typed(ArgType::Number)),
        )
        .unwrap()
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a,b\""), Some("a,b"));
        assert_eq!(unquote("'x'"), Some("x"));
        assert_eq!(unquote("\"\""), Some(""));
        assert_eq!(unquote("\"mixed'"), None);
        assert_eq!(unquote("\""), None);
        assert_eq!(unquote("plain"), None);
    }

    #[test]
    fn test_expand_value_splits_commas() {
        let mut queue = TokenQueue::new(Vec::<String>::new());
        assert_eq!(expand_value("a,b,c", &mut queue), "a");
        assert_eq!(queue.pop_continuation().unwrap().text, "b");
        assert_eq!(queue.pop_continuation().unwrap().text, "c");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_expand_value_keeps_quoted_commas() {
        let mut queue = TokenQueue::new(Vec::<String>::new());
        assert_eq!(expand_value("\"a,b\"", &mut queue), "a,b");
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_split_long() {
        assert_eq!(split_long("name=value"), ("name", Some("value")));
        assert_eq!(split_long("name=a=b"), ("name", Some("a=b")));
        assert_eq!(split_long("name="), ("name", Some("")));
        assert_eq!(split_long("name"), ("name", None));
    }

    #[test]
    fn test_option_like() {
        assert!(is_option_like("-x"));
        assert!(is_option_like("--name"));
        assert!(!is_option_like("-"));
        assert!(!is_option_like("-3"));
        assert!(!is_option_like("-2.5"));
        assert!(!is_option_like("file"));
        assert!(is_option_like("-inf"));
        assert!(!is_option_like("-1,-2"));
        assert!(!is_option_like("-3,x"));
        assert!(is_option_like("-a,1"));
    }

    #[test]
    fn test_cluster_of_flags() {
        let schema = schema();
        let matches = expand_cluster(&schema, "ab").unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches!(matches[0], ShortMatch::Flag(o) if o.id() == "all"));
        assert!(matches!(matches[1], ShortMatch::Flag(o) if o.id() == "bytes"));
    }

    #[test]
    fn test_cluster_value_claims_rest() {
        let schema = schema();
        let matches = expand_cluster(&schema, "ac=5").unwrap();
        assert_eq!(matches.len(), 2);
        match &matches[1] {
            ShortMatch::Valued(option, Some(rest)) => {
                assert_eq!(option.id(), "count");
                assert_eq!(rest, "5");
            }
            other => panic!("unexpected match: {other:?}"),
        }

        let matches = expand_cluster(&schema, "cab").unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches!(&matches[0], ShortMatch::Valued(_, Some(rest)) if rest == "ab"));
    }

    #[test]
    fn test_cluster_stops_at_help() {
        let schema = Schema::new(RawSchema::new().option("all", FieldDecl::flag())).unwrap();
        let matches = expand_cluster(&schema, "ahz").unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches!(matches[1], ShortMatch::Flag(o) if o.id() == "help"));
    }

    #[test]
    fn test_cluster_unknown_char() {
        let schema = schema();
        let err = expand_cluster(&schema, "az").unwrap_err();
        assert_eq!(err, ParseError::UnknownOption("-z".to_string()));
    }
}
