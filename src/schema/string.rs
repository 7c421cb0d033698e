//! The string tester and its format-checked subtypes.
//!
//! Every subtype (`regexp`, `ip`, `alphanumeric`, `email`, `hex`, `token`,
//! `url`) coerces exactly like `string`, then checks its format, and shares
//! the string constraints. Lengths count Unicode scalar values.

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

use super::error::{Rejection, SchemaError};
use super::normalize::Child;
use super::tester::{Constraint, Resolution, Tester, bind_base, count_arg};
use super::types::Arg;
use super::validator::Scope;
use super::value::Value;

static ALPHANUMERIC: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$"));
static EMAIL: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$"));
static HEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^0[xX][0-9a-fA-F]+$"));
static TOKEN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$"));
static URL: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^https?://[a-zA-Z0-9_-]+(\.[a-zA-Z0-9_-]+)*(:[0-9]+)?/?(/[.a-zA-Z0-9_-]*)*$")
});

/// The format a string subtype enforces after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Any string.
    Plain,
    /// Any string; the `type` entry carries the pattern to match.
    Pattern,
    /// An IPv4 dotted quad or an IPv6 address.
    Ip,
    /// One or more ASCII letters or digits.
    Alphanumeric,
    /// `local@domain.tld`.
    Email,
    /// `0x` followed by hexadecimal digits.
    Hex,
    /// One or more ASCII letters, digits or underscores.
    Token,
    /// An `http` or `https` URL.
    Url,
}

impl Format {
    /// Checks `s` and returns the rejection message template on failure.
    fn check(self, s: &str) -> Result<(), &'static str> {
        let (ok, message) = match self {
            Self::Plain | Self::Pattern => return Ok(()),
            Self::Ip => (
                s.parse::<IpAddr>().is_ok(),
                ":label is not a valid ip address",
            ),
            Self::Alphanumeric => (matches(&ALPHANUMERIC, s), ":label is not alphanumeric"),
            Self::Email => (matches(&EMAIL, s), ":label is not a valid email address"),
            Self::Hex => (matches(&HEX, s), ":label is not a hexadecimal value"),
            Self::Token => (matches(&TOKEN, s), ":label is not a valid token"),
            Self::Url => (matches(&URL, s), ":label is not a valid url"),
        };
        if ok { Ok(()) } else { Err(message) }
    }
}

fn matches(pattern: &LazyLock<Result<Regex, regex::Error>>, s: &str) -> bool {
    pattern.as_ref().is_ok_and(|re| re.is_match(s))
}

/// Converts a scalar to its string form and checks a [`Format`].
#[derive(Debug, Clone, Copy)]
pub struct StringTester {
    format: Format,
}

impl StringTester {
    /// Creates a tester enforcing `format`.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }
}

impl Tester for StringTester {
    fn coerce(&self, value: Value) -> Result<Value, Rejection> {
        let text = value
            .to_text()
            .ok_or_else(|| Rejection::invalid(":label could not be converted to string"))?;
        self.format.check(&text).map_err(Rejection::invalid)?;
        Ok(Value::String(text))
    }

    fn bind_type(&self, child: Child<'_>, _scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        match (self.format, child) {
            (Format::Pattern, Child::Pattern(pattern)) => {
                Ok(Resolution::apply(StringOp::Match(pattern.clone())))
            }
            _ => Ok(Resolution::Ignore),
        }
    }

    fn bind(&self, name: &str, arg: &Arg, _scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        let op = match name {
            "lowercase" => StringOp::Lowercase,
            "uppercase" => StringOp::Uppercase,
            "trim" => StringOp::Trim,
            "replace" => replace_arg(name, arg)?,
            "truncate" => StringOp::Truncate(count_arg(name, arg)?),
            "max" => StringOp::Max(count_arg(name, arg)?),
            "min" => StringOp::Min(count_arg(name, arg)?),
            "length" => StringOp::Length(count_arg(name, arg)?),
            "match" => StringOp::Match(pattern_arg(name, arg)?),
            _ => return bind_base(name, arg),
        };
        Ok(Resolution::apply(op))
    }
}

/// Reads a pattern given either as a regex or as a pattern string.
pub(crate) fn pattern_arg(name: &str, arg: &Arg) -> Result<Regex, SchemaError> {
    match arg {
        Arg::Pattern(pattern) => Ok(pattern.clone()),
        Arg::Value(Value::String(source)) => Regex::new(source)
            .map_err(|e| SchemaError::invalid_argument(name, e.to_string())),
        _ => Err(SchemaError::invalid_argument(name, "expected a pattern")),
    }
}

/// Reads `replace` given as a pattern/replacement pair, or as a two-item
/// list whose first item is matched literally.
fn replace_arg(name: &str, arg: &Arg) -> Result<StringOp, SchemaError> {
    match arg {
        Arg::Replace {
            pattern,
            replacement,
        } => Ok(StringOp::Replace {
            pattern: pattern.clone(),
            replacement: replacement.clone(),
        }),
        Arg::Value(Value::Sequence(items)) => match items.as_slice() {
            [Value::String(search), Value::String(replacement)] => {
                let pattern = Regex::new(&regex::escape(search))
                    .map_err(|e| SchemaError::invalid_argument(name, e.to_string()))?;
                Ok(StringOp::Replace {
                    pattern,
                    replacement: replacement.clone(),
                })
            }
            _ => Err(SchemaError::invalid_argument(
                name,
                "expected [search, replacement] strings",
            )),
        },
        _ => Err(SchemaError::invalid_argument(
            name,
            "expected a pattern and a replacement",
        )),
    }
}

#[derive(Debug)]
enum StringOp {
    Lowercase,
    Uppercase,
    Trim,
    Replace { pattern: Regex, replacement: String },
    Truncate(usize),
    Max(usize),
    Min(usize),
    Length(usize),
    Match(Regex),
}

impl Constraint for StringOp {
    fn apply(&self, value: Value) -> Result<Value, Rejection> {
        let text = value
            .to_text()
            .ok_or_else(|| Rejection::invalid(":label is not a string"))?;
        let out = match self {
            Self::Lowercase => text.to_lowercase(),
            Self::Uppercase => text.to_uppercase(),
            Self::Trim => text.trim().to_owned(),
            Self::Replace {
                pattern,
                replacement,
            } => pattern.replace(&text, replacement.as_str()).into_owned(),
            Self::Truncate(n) => text.chars().take(*n).collect(),
            Self::Max(n) => {
                if text.chars().count() > *n {
                    return Err(Rejection::invalid(format!(
                        ":label is longer than {n} characters"
                    )));
                }
                text
            }
            Self::Min(n) => {
                if text.chars().count() < *n {
                    return Err(Rejection::invalid(format!(
                        ":label is shorter than {n} characters"
                    )));
                }
                text
            }
            Self::Length(n) => {
                if text.chars().count() != *n {
                    return Err(Rejection::invalid(format!(
                        ":label is not {n} characters long"
                    )));
                }
                text
            }
            Self::Match(pattern) => {
                if !pattern.is_match(&text) {
                    return Err(Rejection::invalid(":label does not match pattern"));
                }
                text
            }
        };
        Ok(Value::String(out))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::schema::registry::Registry;
    use crate::schema::validator::Scope;

    fn apply(name: &str, arg: impl Into<Arg>, input: &str) -> Result<Value, Rejection> {
        let registry = Registry::builtin();
        let scope = Scope::detached(&registry);
        match StringTester::new(Format::Plain).bind(name, &arg.into(), &scope) {
            Ok(Resolution::Apply(op)) => op.apply(Value::from(input)),
            other => panic!("expected {name} to bind, got {other:?}"),
        }
    }

    fn regex(source: &str) -> Regex {
        Regex::new(source).unwrap_or_else(|e| panic!("{e}"))
    }

    #[rstest]
    #[case::number(Value::from(42), "42")]
    #[case::fraction(Value::from(0.5), "0.5")]
    #[case::boolean(Value::Bool(false), "false")]
    #[case::string(Value::from("x"), "x")]
    fn scalars_convert_to_string(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(
            StringTester::new(Format::Plain).coerce(value),
            Ok(Value::from(expected))
        );
    }

    #[test]
    fn mapping_cannot_convert_to_string() {
        let result = StringTester::new(Format::Plain).coerce(Value::mapping([("a", 1)]));
        assert_eq!(
            result,
            Err(Rejection::invalid(":label could not be converted to string"))
        );
    }

    #[rstest]
    #[case::lowercase("lowercase", "AbC", "abc")]
    #[case::uppercase("uppercase", "AbC", "ABC")]
    #[case::trim("trim", "  padded \t", "padded")]
    fn transforms_rewrite_the_value(#[case] name: &str, #[case] input: &str, #[case] out: &str) {
        assert_eq!(apply(name, true, input), Ok(Value::from(out)));
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(apply("truncate", 3, "héllo"), Ok(Value::from("hél")));
        assert_eq!(apply("truncate", 10, "short"), Ok(Value::from("short")));
    }

    #[test]
    fn replace_literal_pair_replaces_first_occurrence() {
        let arg = vec![Value::from("."), Value::from("-")];
        assert_eq!(apply("replace", arg, "a.b.c"), Ok(Value::from("a-b.c")));
    }

    #[test]
    fn replace_pattern_expands_groups() {
        let arg = Arg::Replace {
            pattern: regex(r"(\w+)@(\w+)"),
            replacement: "$2 at $1".to_owned(),
        };
        assert_eq!(apply("replace", arg, "ada@home"), Ok(Value::from("home at ada")));
    }

    #[rstest]
    #[case::max_ok("max", 3, "abc", true)]
    #[case::max_too_long("max", 3, "abcd", false)]
    #[case::min_ok("min", 2, "ab", true)]
    #[case::min_too_short("min", 2, "a", false)]
    #[case::length_exact("length", 2, "ab", true)]
    #[case::length_wrong("length", 2, "abc", false)]
    fn length_bounds(#[case] name: &str, #[case] n: i32, #[case] input: &str, #[case] ok: bool) {
        assert_eq!(apply(name, n, input).is_ok(), ok);
    }

    #[test]
    fn max_message_names_the_bound() {
        assert_eq!(
            apply("max", 3, "abcd"),
            Err(Rejection::invalid(":label is longer than 3 characters"))
        );
    }

    #[test]
    fn match_accepts_pattern_strings() {
        assert!(apply("match", "^[0-9]+$", "123").is_ok());
        assert!(apply("match", "^[0-9]+$", "12a").is_err());
    }

    #[test]
    fn invalid_match_pattern_is_a_schema_error() {
        let registry = Registry::builtin();
        let scope = Scope::detached(&registry);
        let result = StringTester::new(Format::Plain).bind("match", &Arg::from("(unclosed"), &scope);
        assert!(matches!(result, Err(SchemaError::InvalidArgument { .. })));
    }

    #[rstest]
    #[case::ipv4(Format::Ip, "192.168.0.1", true)]
    #[case::ipv4_out_of_range(Format::Ip, "256.1.1.1", false)]
    #[case::ipv4_single_group(Format::Ip, "127", false)]
    #[case::ipv6(Format::Ip, "::1", true)]
    #[case::alphanumeric(Format::Alphanumeric, "abc123", true)]
    #[case::alphanumeric_space(Format::Alphanumeric, "abc 123", false)]
    #[case::email(Format::Email, "ada@example.com", true)]
    #[case::email_no_domain(Format::Email, "ada@example", false)]
    #[case::hex(Format::Hex, "0xFF", true)]
    #[case::hex_no_prefix(Format::Hex, "FF", false)]
    #[case::token(Format::Token, "snake_case_1", true)]
    #[case::token_hyphen(Format::Token, "kebab-case", false)]
    #[case::url(Format::Url, "https://example.com:8080/a/b.html", true)]
    #[case::url_hyphenated_host(Format::Url, "http://my-site.org", true)]
    #[case::url_bad_scheme(Format::Url, "ftp://example.com", false)]
    fn formats_are_checked_on_coercion(
        #[case] format: Format,
        #[case] input: &str,
        #[case] ok: bool,
    ) {
        assert_eq!(StringTester::new(format).coerce(Value::from(input)).is_ok(), ok);
    }

    #[test]
    fn regexp_type_matches_the_pattern() {
        let registry = Registry::builtin();
        let scope = Scope::detached(&registry);
        let pattern = regex("^a+$");
        let tester = StringTester::new(Format::Pattern);
        let Ok(Resolution::Apply(op)) = tester.bind_type(Child::Pattern(&pattern), &scope) else {
            panic!("regexp type should bind");
        };
        assert!(op.apply(Value::from("aaa")).is_ok());
        assert_eq!(
            op.apply(Value::from("b")),
            Err(Rejection::invalid(":label does not match pattern"))
        );
    }

    #[test]
    fn plain_string_ignores_type() {
        let registry = Registry::builtin();
        let scope = Scope::detached(&registry);
        let result = StringTester::new(Format::Plain).bind_type(Child::None, &scope);
        assert!(matches!(result, Ok(Resolution::Ignore)));
    }
}
