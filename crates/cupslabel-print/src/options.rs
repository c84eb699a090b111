// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job option parser.
//
// Job options are entered by hand as `key=value` pairs separated by newlines
// or commas, for example:
//
//     print-scaling=none
//     TrimMode=Strong, BlankSpace=False
//
// Values are typed by shape (boolean, integer, otherwise string). A value of
// `none` means "do not send this attribute", which lets a user switch off an
// option without deleting the line.

use tracing::debug;

use cupslabel_core::tags::{AttributeTagRegistry, WireTag};
use cupslabel_core::types::{AttributeValue, JobAttributes};

/// The right-hand side of a parsed option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    /// `none`: leave the attribute out of the job.
    Omit,
    Set(AttributeValue),
}

/// A single `key=value` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOptionToken {
    pub key: String,
    pub value: TokenValue,
}

impl JobOptionToken {
    /// Parse one comma-free token. Returns `None` for tokens without `=` or
    /// with an empty key.
    pub fn parse(token: &str) -> Option<Self> {
        let (key, value) = token.trim().split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_owned(),
            value: type_value(value.trim()),
        })
    }
}

fn type_value(value: &str) -> TokenValue {
    if value.eq_ignore_ascii_case("none") {
        return TokenValue::Omit;
    }
    if value.eq_ignore_ascii_case("true") {
        return TokenValue::Set(AttributeValue::Boolean(true));
    }
    if value.eq_ignore_ascii_case("false") {
        return TokenValue::Set(AttributeValue::Boolean(false));
    }
    if is_integer_literal(value)
        && let Ok(n) = value.parse::<i64>()
    {
        return TokenValue::Set(AttributeValue::Integer(n));
    }
    TokenValue::Set(AttributeValue::Text(value.to_owned()))
}

/// `-?[0-9]+`, whole string.
fn is_integer_literal(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Split free text into option tokens, in order of appearance.
pub fn tokenize(text: &str) -> impl Iterator<Item = JobOptionToken> + '_ {
    text.split(is_line_break)
        .flat_map(|line| line.split(','))
        .filter_map(JobOptionToken::parse)
}

/// Line boundaries: `\n`, a lone `\r`, and the other Unicode line and
/// paragraph separators. `\r\n` yields an empty line in between, which
/// the token filter drops.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Parse free-text job options into typed attributes.
///
/// Every key that ends up in the result is registered in `registry` as a
/// keyword unless it already has a tag. Later occurrences of a key replace
/// earlier ones; `none` tokens are skipped.
pub fn parse_job_options(text: &str, registry: &AttributeTagRegistry) -> JobAttributes {
    let mut attrs = JobAttributes::new();

    for token in tokenize(text) {
        match token.value {
            TokenValue::Omit => {
                debug!(key = %token.key, "job option suppressed");
            }
            TokenValue::Set(value) => {
                registry.register_if_absent(&token.key, WireTag::Keyword);
                attrs.set(token.key, value);
            }
        }
    }

    debug!(count = attrs.len(), "parsed job options");
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> JobAttributes {
        parse_job_options(text, &AttributeTagRegistry::with_defaults())
    }

    #[test]
    fn mixed_types_and_suppression() {
        let attrs = parse("a=1,b=true,c=none,d=x=y");
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.get("a"), Some(&AttributeValue::Integer(1)));
        assert_eq!(attrs.get("b"), Some(&AttributeValue::Boolean(true)));
        assert_eq!(attrs.get("c"), None);
        assert_eq!(attrs.get("d"), Some(&AttributeValue::Text("x=y".into())));
    }

    #[test]
    fn booleans_ignore_case() {
        assert_eq!(parse("key=TRUE").get("key"), Some(&AttributeValue::Boolean(true)));
        assert_eq!(parse("key=true").get("key"), Some(&AttributeValue::Boolean(true)));
        assert_eq!(parse("key=False").get("key"), Some(&AttributeValue::Boolean(false)));
    }

    #[test]
    fn default_option_block() {
        let attrs = parse(cupslabel_core::config::DEFAULT_JOB_OPTIONS);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("TrimMode"), Some(&AttributeValue::from("Strong")));
        assert_eq!(attrs.get("BlankSpace"), Some(&AttributeValue::Boolean(false)));
        assert!(!attrs.contains("print-scaling"));
        assert!(!attrs.contains("orientation-requested"));
    }

    #[test]
    fn integers() {
        let attrs = parse("n=-12\np=+3\nq=1.5\nr=-\ns=007");
        assert_eq!(attrs.get("n"), Some(&AttributeValue::Integer(-12)));
        assert_eq!(attrs.get("p"), Some(&AttributeValue::from("+3")));
        assert_eq!(attrs.get("q"), Some(&AttributeValue::from("1.5")));
        assert_eq!(attrs.get("r"), Some(&AttributeValue::from("-")));
        assert_eq!(attrs.get("s"), Some(&AttributeValue::Integer(7)));
    }

    #[test]
    fn oversized_integer_stays_text() {
        let attrs = parse("big=99999999999999999999");
        assert_eq!(attrs.get("big"), Some(&AttributeValue::from("99999999999999999999")));
    }

    #[test]
    fn malformed_tokens_are_ignored() {
        let attrs = parse(" , novalue, =orphan ,\n\n  spaced key = spaced value  ,\r\n");
        assert_eq!(attrs.len(), 1);
        assert_eq!(
            attrs.get("spaced key"),
            Some(&AttributeValue::from("spaced value"))
        );
    }

    #[test]
    fn every_line_ending_separates_tokens() {
        let attrs = parse("a=1\rb=2\r\nc=3\nd=4\u{2028}e=5");
        assert_eq!(attrs.len(), 5);
        assert_eq!(attrs.get("a"), Some(&AttributeValue::Integer(1)));
        assert_eq!(attrs.get("b"), Some(&AttributeValue::Integer(2)));
        assert_eq!(attrs.get("e"), Some(&AttributeValue::Integer(5)));
    }

    #[test]
    fn last_write_wins() {
        let attrs = parse("TrimMode=Weak\nTrimMode=Strong");
        assert_eq!(attrs.get("TrimMode"), Some(&AttributeValue::from("Strong")));
    }

    #[test]
    fn none_keeps_earlier_value() {
        let attrs = parse("copies=2,copies=NONE");
        assert_eq!(attrs.get("copies"), Some(&AttributeValue::Integer(2)));
    }

    #[test]
    fn empty_value_is_empty_string() {
        assert_eq!(parse("media=").get("media"), Some(&AttributeValue::from("")));
    }

    #[test]
    fn unknown_keys_registered_as_keyword() {
        let registry = AttributeTagRegistry::with_defaults();
        parse_job_options("Darkness=3, BlankSpace=true, Skipped=none", &registry);
        assert_eq!(registry.tag_for("Darkness"), Some(WireTag::Keyword));
        assert_eq!(registry.tag_for("BlankSpace"), Some(WireTag::Boolean));
        assert_eq!(registry.tag_for("Skipped"), None);
    }

    #[test]
    fn token_parsing() {
        assert_eq!(JobOptionToken::parse("no-equals"), None);
        assert_eq!(JobOptionToken::parse(" = x"), None);
        assert_eq!(
            JobOptionToken::parse(" sides = None "),
            Some(JobOptionToken {
                key: "sides".into(),
                value: TokenValue::Omit
            })
        );
    }
}
