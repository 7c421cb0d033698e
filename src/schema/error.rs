//! Error types for schema compilation and value validation.
//!
//! Two disjoint classes exist. [`SchemaError`] reports a defect in the
//! schema itself and is raised while compiling, before any value is seen.
//! [`ValidationError`] reports a value that does not satisfy its schema and
//! carries the trail of field labels that locates the offending value.

use std::fmt;

/// Placeholder substituted with the quoted field path when a
/// [`ValidationError`] is rendered.
pub const LABEL_PLACEHOLDER: &str = ":label";

/// Label used when neither the caller nor the schema names the value.
pub(crate) const DEFAULT_LABEL: &str = "value";

/// Error kind used when a required value is absent.
pub const UNDEFINED_KIND: &str = "undefined";

/// Errors raised while compiling a schema.
///
/// These indicate a mistake in the schema definition, not in the data, and
/// are never produced for a value that merely fails its constraints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A schema (or the `type` of a schema spec) was not given.
    #[error("schema is undefined")]
    Undefined,

    /// A list shorthand held more than one element schema.
    #[error("schema list has {len} items, expected at most 1")]
    ListTooLong {
        /// Number of element schemas supplied.
        len: usize,
    },

    /// The `type` of a schema spec was itself a schema spec.
    #[error("the type of a schema spec cannot itself be a schema spec")]
    NestedSpec,

    /// The resolved type identifier is not registered.
    #[error("\"{type_name}\" is not a known schema type")]
    UnknownType {
        /// The unresolved type identifier.
        type_name: String,
    },

    /// A schema entry names a constraint the tester does not provide.
    #[error("\"{constraint}\" is not a valid function for type \"{type_name}\"")]
    UnknownConstraint {
        /// The constraint key found in the schema.
        constraint: String,
        /// The type identifier of the schema holding the key.
        type_name: String,
    },

    /// A constraint argument has the wrong shape.
    #[error("invalid argument for \"{constraint}\": {reason}")]
    InvalidArgument {
        /// The constraint key whose argument was rejected.
        constraint: String,
        /// A human-readable explanation of the expected argument.
        reason: String,
    },

    /// A custom type identifier failed lexical validation.
    #[error("invalid type identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        /// The identifier that failed validation.
        identifier: String,
        /// A human-readable explanation of why it is invalid.
        reason: String,
    },

    /// A custom tester was registered under an identifier already in use.
    #[error("type identifier '{identifier}' is already registered")]
    DuplicateType {
        /// The identifier that is already taken.
        identifier: String,
    },
}

impl SchemaError {
    /// Builds an [`SchemaError::InvalidArgument`] for `constraint`.
    pub(crate) fn invalid_argument(constraint: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            constraint: constraint.to_owned(),
            reason: reason.into(),
        }
    }
}

/// A value that failed validation.
///
/// The message is a template containing [`LABEL_PLACEHOLDER`]. Labels are
/// collected innermost-first while the error propagates out of nested
/// object fields and array elements; [`ValidationError::path`] renders them
/// outermost-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    kind: String,
    message: String,
    trail: Vec<String>,
}

impl ValidationError {
    /// Creates an error of the given kind with an empty label trail.
    ///
    /// # Examples
    ///
    ///     use sane_schema::schema::ValidationError;
    ///
    ///     let err = ValidationError::new("number", ":label is not positive");
    ///     assert_eq!(err.kind(), "number");
    ///     assert_eq!(err.to_string(), "\"value\" is not positive");
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            trail: Vec::new(),
        }
    }

    /// Returns the kind tag: `"undefined"` or the failing tester's type.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the unrendered message template.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns every collected label, outermost first, including the label
    /// of the top-level value.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.trail.iter().rev().map(String::as_str).collect()
    }

    /// Returns the dotted path of the offending value.
    ///
    /// The default top-level label `"value"` is left out of nested paths,
    /// so `{a: {b: "x"}}` failing on `b` yields `a.b`. A top-level label
    /// given by the caller or the schema is kept, giving `user.name`.
    #[must_use]
    pub fn path(&self) -> String {
        let labels = self.labels();
        match labels.split_first() {
            None => DEFAULT_LABEL.to_owned(),
            Some((root, nested)) if *root == DEFAULT_LABEL && !nested.is_empty() => {
                nested.join(".")
            }
            Some(_) => labels.join("."),
        }
    }

    /// Appends the label of the enclosing value.
    pub(crate) fn push_label(&mut self, label: &str) {
        self.trail.push(label.to_owned());
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = format!("\"{}\"", self.path());
        f.write_str(&self.message.replace(LABEL_PLACEHOLDER, &quoted))
    }
}

impl std::error::Error for ValidationError {}

/// Why a tester or constraint refused a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A message template reported under the failing tester's own type.
    Invalid(String),
    /// A complete error, such as one raised by a nested validation.
    Error(ValidationError),
}

impl Rejection {
    /// Builds a [`Rejection::Invalid`] from a message template.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Converts the rejection into an error reported under `kind` unless it
    /// already carries one.
    #[must_use]
    pub fn into_error(self, kind: &str) -> ValidationError {
        match self {
            Self::Invalid(message) => ValidationError::new(kind, message),
            Self::Error(error) => error,
        }
    }
}

impl From<ValidationError> for Rejection {
    fn from(error: ValidationError) -> Self {
        Self::Error(error)
    }
}

/// Any failure raised by [`crate::schema::sanitize`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// The schema could not be compiled.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The value did not satisfy the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors that can occur when loading values from YAML text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// YAML deserialization failed.
    #[error("YAML deserialization failed: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn nested(labels: &[&str]) -> ValidationError {
        let mut err = ValidationError::new("number", ":label could not be converted to a number");
        for label in labels {
            err.push_label(label);
        }
        err
    }

    #[rstest]
    #[case::top_level(&["value"], "value")]
    #[case::custom_top_level(&["age"], "age")]
    #[case::one_field(&["b", "value"], "b")]
    #[case::two_fields(&["b", "a", "value"], "a.b")]
    #[case::array_element(&["name", "0", "users", "value"], "users.0.name")]
    #[case::named_root(&["name", "user"], "user.name")]
    #[case::named_root_deep(&["b", "a", "payload"], "payload.a.b")]
    fn path_renders_outermost_first(#[case] labels: &[&str], #[case] expected: &str) {
        assert_eq!(nested(labels).path(), expected);
    }

    #[test]
    fn display_substitutes_quoted_path() {
        let err = nested(&["b", "a", "value"]);
        assert_eq!(err.to_string(), "\"a.b\" could not be converted to a number");
    }

    #[test]
    fn labels_include_root() {
        let err = nested(&["b", "a", "value"]);
        assert_eq!(err.labels(), vec!["value", "a", "b"]);
    }

    #[test]
    fn invalid_rejection_takes_given_kind() {
        let err = Rejection::invalid(":label is not positive").into_error("integer");
        assert_eq!(err.kind(), "integer");
    }

    #[test]
    fn error_rejection_keeps_its_kind() {
        let inner = ValidationError::new("number", ":label is not a number");
        let err = Rejection::from(inner).into_error("integer");
        assert_eq!(err.kind(), "number");
    }

    #[test]
    fn schema_error_messages_are_actionable() {
        let err = SchemaError::UnknownConstraint {
            constraint: "bogus".to_owned(),
            type_name: "string".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "\"bogus\" is not a valid function for type \"string\""
        );
    }
}
