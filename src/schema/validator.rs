//! The validation engine.
//!
//! A schema is compiled once into a [`Validator`]: the shorthand is
//! normalized, the tester is looked up, and every entry is bound to a
//! constraint, so defects in the schema surface as [`SchemaError`]s before
//! any value is seen. Checking a value then resolves absence against the
//! `default` and `required` policy, coerces through the tester, and applies
//! the constraints in declaration order. Nested fields and elements are
//! checked by their own compiled validators; each level adds its label to a
//! failure on the way out.

use std::sync::{Arc, LazyLock};

use tracing::{debug, trace};

use super::error::{
    DEFAULT_LABEL, Failure, Rejection, SchemaError, UNDEFINED_KIND, ValidationError,
};
use super::identifier::TypeName;
use super::normalize::{Canonical, normalize};
use super::registry::Registry;
use super::tester::{Constraint, Resolution, Tester};
use super::types::{Arg, Producer, Schema};
use super::value::Value;

static BUILTIN: LazyLock<Registry> = LazyLock::new(Registry::builtin);

/// The compilation context handed to testers while binding a schema.
///
/// Gives container testers access to the registry, for compiling nested
/// schemas, and to the other entries of the schema being bound.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    registry: &'a Registry,
    canonical: Option<&'a Canonical<'a>>,
}

impl<'a> Scope<'a> {
    /// Compiles a nested schema against the same registry.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the nested schema is malformed.
    pub fn compile(&self, schema: &Schema) -> Result<Validator, SchemaError> {
        Validator::with_registry(schema, self.registry)
    }

    /// Returns the entry named `name` of the schema being bound.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&'a Arg> {
        self.canonical.and_then(|canonical| canonical.entry(name))
    }

    /// A scope with no enclosing schema.
    #[cfg(test)]
    pub(crate) const fn detached(registry: &'a Registry) -> Self {
        Self {
            registry,
            canonical: None,
        }
    }
}

/// What a missing value becomes.
#[derive(Debug, Clone)]
enum Fallback {
    Value(Value),
    Produce(Producer),
}

impl Fallback {
    fn from_arg(arg: &Arg) -> Result<Self, SchemaError> {
        match arg {
            Arg::Value(value) => Ok(Self::Value(value.clone())),
            Arg::Produce(producer) => Ok(Self::Produce(producer.clone())),
            _ => Err(SchemaError::invalid_argument(
                "default",
                "expected a value or a producer",
            )),
        }
    }

    fn resolve(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Produce(producer) => producer.produce(),
        }
    }
}

/// A compiled schema.
///
/// Compiling never looks at a value, and checking never changes the
/// validator, so one validator may check any number of values from any
/// number of threads.
///
/// # Examples
///
///     use sane_schema::schema::{Schema, SchemaSpec, Validator, Value};
///
///     let schema = Schema::fields([
///         ("name", SchemaSpec::new("string").flag("trim").into()),
///         ("age", Schema::from("integer")),
///     ]);
///     let validator = Validator::new(&schema).unwrap();
///     let out = validator
///         .validate(&Value::mapping([("name", " Ada "), ("age", "36")]))
///         .unwrap();
///     assert_eq!(out, Value::mapping([("name", Value::from("Ada")), ("age", Value::from(36))]));
#[derive(Debug)]
pub struct Validator {
    type_name: String,
    tester: Arc<dyn Tester>,
    label: Option<String>,
    fallback: Option<Fallback>,
    required: Option<bool>,
    constraints: Vec<Box<dyn Constraint>>,
}

impl Validator {
    /// Compiles a schema against the built-in types.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the schema, or any schema nested in
    /// it, is malformed, names an unknown type, or uses a constraint its
    /// type does not provide.
    pub fn new(schema: &Schema) -> Result<Self, SchemaError> {
        Self::with_registry(schema, &BUILTIN)
    }

    /// Compiles a schema against `registry`.
    ///
    /// # Errors
    ///
    /// As [`Validator::new`].
    pub fn with_registry(schema: &Schema, registry: &Registry) -> Result<Self, SchemaError> {
        let canonical = normalize(schema)?;
        let type_name = canonical.type_name();
        let tester = registry
            .get(type_name)
            .ok_or_else(|| SchemaError::UnknownType {
                type_name: type_name.to_owned(),
            })?;
        let scope = Scope {
            registry,
            canonical: Some(&canonical),
        };

        let mut validator = Self {
            type_name: type_name.to_owned(),
            tester: Arc::clone(&tester),
            label: None,
            fallback: None,
            required: None,
            constraints: Vec::new(),
        };
        validator.push(tester.bind_type(canonical.child(), &scope)?);

        for (name, arg) in canonical.entries() {
            match name {
                "type" => {}
                "default" => validator.fallback = Some(Fallback::from_arg(arg)?),
                "required" => {
                    let required = arg.as_value().and_then(Value::as_bool).ok_or_else(|| {
                        SchemaError::invalid_argument(name, "expected a boolean")
                    })?;
                    validator.required = Some(required);
                }
                "label" => {
                    let label = arg.as_value().and_then(Value::as_str).ok_or_else(|| {
                        SchemaError::invalid_argument(name, "expected a string")
                    })?;
                    validator.label = Some(label.to_owned());
                }
                _ => match tester.bind(name, arg, &scope)? {
                    Resolution::Unknown => {
                        return Err(SchemaError::UnknownConstraint {
                            constraint: name.to_owned(),
                            type_name: validator.type_name,
                        });
                    }
                    resolution => validator.push(resolution),
                },
            }
        }

        trace!(
            type_name = %validator.type_name,
            constraints = validator.constraints.len(),
            "compiled schema"
        );
        Ok(validator)
    }

    fn push(&mut self, resolution: Resolution) {
        if let Resolution::Apply(constraint) = resolution {
            self.constraints.push(constraint);
        }
    }

    /// Returns the resolved type identifier.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Checks a possibly missing value.
    ///
    /// `label` names the value in errors; without one the schema's `label`
    /// is used, and failing that `"value"`. A missing, null or empty-string
    /// value takes the schema's `default`; failing that it is returned
    /// unchanged when `required` is `false`; failing that an array starts
    /// empty; otherwise the value is reported missing. `Ok(None)` means the
    /// value is absent and optional.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] whose label trail ends with this
    /// value's label.
    pub fn check(
        &self,
        value: Option<&Value>,
        label: Option<&str>,
    ) -> Result<Option<Value>, ValidationError> {
        let label = label
            .or(self.label.as_deref())
            .unwrap_or(DEFAULT_LABEL);
        trace!(label, type_name = %self.type_name, "checking value");

        let input = match value {
            Some(present) if !present.is_blank() => present.clone(),
            _ => {
                if let Some(fallback) = &self.fallback {
                    return Ok(Some(fallback.resolve()));
                }
                if self.required == Some(false) {
                    return Ok(value.cloned());
                }
                if self.type_name != TypeName::Array.as_str() {
                    let mut err = ValidationError::new(UNDEFINED_KIND, ":label is missing");
                    err.push_label(label);
                    debug!(label, kind = UNDEFINED_KIND, "value is missing");
                    return Err(err);
                }
                Value::Sequence(Vec::new())
            }
        };

        self.run(input).map(Some).map_err(|mut err| {
            debug!(label, kind = err.kind(), "value rejected");
            err.push_label(label);
            err
        })
    }

    fn run(&self, input: Value) -> Result<Value, ValidationError> {
        let kind = self.type_name.as_str();
        let coerced = self
            .tester
            .coerce(input)
            .map_err(|rejection| rejection.into_error(kind))?;
        self.constraints
            .iter()
            .try_fold(coerced, |value, constraint| constraint.apply(value))
            .map_err(|rejection: Rejection| rejection.into_error(kind))
    }

    /// Checks a present value under its default label.
    ///
    /// An optional schema that resolves to absence yields [`Value::Null`].
    ///
    /// # Errors
    ///
    /// As [`Validator::check`].
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        self.check(Some(value), None)
            .map(Option::unwrap_or_default)
    }

    /// Checks a present value under `label`.
    ///
    /// # Errors
    ///
    /// As [`Validator::check`].
    pub fn validate_as(&self, value: &Value, label: &str) -> Result<Value, ValidationError> {
        self.check(Some(value), Some(label))
            .map(Option::unwrap_or_default)
    }
}

/// Validates a value, returning value errors as data.
///
/// The outer result reports a malformed schema; the inner result is the
/// coerced value or the reason it was rejected. A missing value that the
/// schema allows to be absent comes back as [`Value::Null`].
///
/// # Errors
///
/// Returns a [`SchemaError`] when the schema cannot be compiled.
///
/// # Examples
///
///     use sane_schema::schema::{Schema, Value, validate};
///
///     let out = validate(Some(&Value::from("42")), &Schema::from("integer"), None).unwrap();
///     assert_eq!(out, Ok(Value::from(42)));
///
///     let err = validate(Some(&Value::from("abc")), &Schema::from("integer"), None)
///         .unwrap()
///         .unwrap_err();
///     assert_eq!(err.kind(), "number");
pub fn validate(
    value: Option<&Value>,
    schema: &Schema,
    label: Option<&str>,
) -> Result<Result<Value, ValidationError>, SchemaError> {
    let validator = Validator::new(schema)?;
    Ok(validator
        .check(value, label)
        .map(Option::unwrap_or_default))
}

/// Validates a value, failing on either a malformed schema or an invalid
/// value.
///
/// # Errors
///
/// Returns [`Failure::Schema`] when the schema cannot be compiled and
/// [`Failure::Validation`] when the value is rejected.
pub fn sanitize(
    value: Option<&Value>,
    schema: &Schema,
    label: Option<&str>,
) -> Result<Value, Failure> {
    Ok(validate(value, schema, label)??)
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
