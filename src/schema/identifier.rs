//! Type identifiers.
//!
//! [`TypeName`] is the closed set of built-in identifiers. Custom testers
//! may be registered under further identifiers; those must match the ASCII
//! pattern `^[a-z_][a-z0-9_]*$` (lower case, because native type markers
//! are lower-cased before lookup). Type identifiers never share a namespace
//! with schema keys, so a tester may be called `label` or `default`.

use std::fmt;
use std::str::FromStr;

use super::error::SchemaError;

/// The built-in type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// Accepts any present value.
    Mixed,
    /// Rejects every present value.
    Forbidden,
    /// Any value with a string form.
    String,
    /// A string matching a pattern.
    Regexp,
    /// An IPv4 or IPv6 address.
    Ip,
    /// ASCII letters and digits.
    Alphanumeric,
    /// An e-mail address.
    Email,
    /// A `0x`-prefixed hexadecimal literal.
    Hex,
    /// ASCII letters, digits and underscores.
    Token,
    /// An `http` or `https` URL.
    Url,
    /// A point in time.
    Date,
    /// A mapping of fields.
    Object,
    /// A sequence of elements.
    Array,
    /// A double-precision number.
    Number,
    /// A number rounded to a whole value.
    Integer,
    /// A boolean.
    Boolean,
}

impl TypeName {
    /// Every built-in identifier, in registry order.
    pub const ALL: [Self; 16] = [
        Self::Mixed,
        Self::Forbidden,
        Self::String,
        Self::Regexp,
        Self::Ip,
        Self::Alphanumeric,
        Self::Email,
        Self::Hex,
        Self::Token,
        Self::Url,
        Self::Date,
        Self::Object,
        Self::Array,
        Self::Number,
        Self::Integer,
        Self::Boolean,
    ];

    /// Returns the identifier string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::Forbidden => "forbidden",
            Self::String => "string",
            Self::Regexp => "regexp",
            Self::Ip => "ip",
            Self::Alphanumeric => "alphanumeric",
            Self::Email => "email",
            Self::Hex => "hex",
            Self::Token => "token",
            Self::Url => "url",
            Self::Date => "date",
            Self::Object => "object",
            Self::Array => "array",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeName {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownType {
                type_name: s.to_owned(),
            })
    }
}

/// Validates that a string is a legal custom type identifier.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidIdentifier`] if the string is empty or
/// does not match `^[a-z_][a-z0-9_]*$`.
///
/// # Examples
///
///     use sane_schema::schema::validate_type_identifier;
///
///     assert!(validate_type_identifier("port").is_ok());
///     assert!(validate_type_identifier("iso_country").is_ok());
///     assert!(validate_type_identifier("Port").is_err());
///     assert!(validate_type_identifier("9lives").is_err());
pub fn validate_type_identifier(s: &str) -> Result<(), SchemaError> {
    if s.is_empty() {
        return Err(SchemaError::InvalidIdentifier {
            identifier: s.to_owned(),
            reason: "identifier must not be empty".to_owned(),
        });
    }

    if !is_valid_identifier_pattern(s) {
        return Err(SchemaError::InvalidIdentifier {
            identifier: s.to_owned(),
            reason: concat!(
                "must match the pattern ",
                "^[a-z_][a-z0-9_]*$ ",
                "(lower-case ASCII letters, digits, and underscores; ",
                "must not start with a digit)"
            )
            .to_owned(),
        });
    }

    Ok(())
}

/// Returns `true` if the string matches `^[a-z_][a-z0-9_]*$`.
fn is_valid_identifier_pattern(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
