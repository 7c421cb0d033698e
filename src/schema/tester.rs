//! The tester capability set.
//!
//! A [`Tester`] owns the coercion rules of one type identifier and binds
//! the schema's named entries to [`Constraint`] operations ahead of time.
//! Every tester understands the base constraints `allow`, `disallow` and
//! `custom`; the engine consumes `type`, `default`, `required` and `label`
//! itself. This module also holds the testers with no constraints of their
//! own: `mixed`, `forbidden` and `boolean`.

use std::fmt;

use super::error::{Rejection, SchemaError};
use super::normalize::Child;
use super::types::{Arg, Check};
use super::validator::Scope;
use super::value::Value;

/// Coercion and constraint binding for one type identifier.
///
/// Implement this trait and register it with
/// [`Registry::register`](super::Registry::register) to add a type.
pub trait Tester: fmt::Debug + Send + Sync {
    /// Converts a present, non-blank value to the type's representation.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the value cannot be converted.
    fn coerce(&self, value: Value) -> Result<Value, Rejection>;

    /// Binds the `type` entry. The default treats it as a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the child description is malformed.
    fn bind_type(&self, _child: Child<'_>, _scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        Ok(Resolution::Ignore)
    }

    /// Binds a named constraint. The default knows only the base
    /// constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the argument is malformed.
    fn bind(&self, name: &str, arg: &Arg, _scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        bind_base(name, arg)
    }
}

/// An operation applied to a coerced value.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Checks the value and returns it, possibly transformed.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the value violates the constraint.
    fn apply(&self, value: Value) -> Result<Value, Rejection>;
}

/// The outcome of binding a schema entry.
#[derive(Debug)]
pub enum Resolution {
    /// The entry is applied as this constraint.
    Apply(Box<dyn Constraint>),
    /// The entry is accepted but has no runtime effect.
    Ignore,
    /// The tester has no constraint of that name.
    Unknown,
}

impl Resolution {
    /// Boxes a constraint into [`Resolution::Apply`].
    #[must_use]
    pub fn apply(constraint: impl Constraint + 'static) -> Self {
        Self::Apply(Box::new(constraint))
    }
}

// ── Base constraints ────────────────────────────────────────────────

/// Constraints available on every tester.
#[derive(Debug)]
enum BaseOp {
    Allow(Vec<Value>),
    Disallow(Vec<Value>),
    Custom(Check),
}

impl Constraint for BaseOp {
    fn apply(&self, mut value: Value) -> Result<Value, Rejection> {
        match self {
            Self::Allow(members) if !members.contains(&value) => {
                Err(Rejection::invalid(":label is not an allowed value"))
            }
            Self::Disallow(members) if members.contains(&value) => {
                Err(Rejection::invalid(":label is a disallowed value"))
            }
            Self::Custom(check) => {
                check.run(&mut value).map_err(Rejection::Invalid)?;
                Ok(value)
            }
            Self::Allow(_) | Self::Disallow(_) => Ok(value),
        }
    }
}

/// Binds `allow`, `disallow` and `custom`.
///
/// # Errors
///
/// Returns [`SchemaError::InvalidArgument`] when `custom` is not given a
/// check or `allow`/`disallow` are not given values.
pub fn bind_base(name: &str, arg: &Arg) -> Result<Resolution, SchemaError> {
    match name {
        "allow" => Ok(Resolution::apply(BaseOp::Allow(members(name, arg)?))),
        "disallow" => Ok(Resolution::apply(BaseOp::Disallow(members(name, arg)?))),
        "custom" => match arg {
            Arg::Check(check) => Ok(Resolution::apply(BaseOp::Custom(check.clone()))),
            _ => Err(SchemaError::invalid_argument(name, "expected a check")),
        },
        _ => Ok(Resolution::Unknown),
    }
}

/// A list argument is the set of members; any other value is a set of one.
fn members(name: &str, arg: &Arg) -> Result<Vec<Value>, SchemaError> {
    match arg {
        Arg::Value(Value::Sequence(items)) => Ok(items.clone()),
        Arg::Value(value) => Ok(vec![value.clone()]),
        _ => Err(SchemaError::invalid_argument(name, "expected a value or a list of values")),
    }
}

// ── Argument helpers ────────────────────────────────────────────────

/// Reads a numeric argument.
pub(crate) fn number_arg(name: &str, arg: &Arg) -> Result<f64, SchemaError> {
    arg.as_value()
        .and_then(Value::as_f64)
        .filter(|n| !n.is_nan())
        .ok_or_else(|| SchemaError::invalid_argument(name, "expected a number"))
}

/// Reads a non-negative whole-number argument such as a length.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is checked to be a whole number within u32 range"
)]
pub(crate) fn count_arg(name: &str, arg: &Arg) -> Result<usize, SchemaError> {
    let n = number_arg(name, arg)?;
    if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return Err(SchemaError::invalid_argument(
            name,
            "expected a non-negative whole number",
        ));
    }
    Ok(n as usize)
}

// ── Testers without constraints of their own ────────────────────────

/// Accepts any present value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedTester;

impl Tester for MixedTester {
    fn coerce(&self, value: Value) -> Result<Value, Rejection> {
        Ok(value)
    }
}

/// Rejects every present value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbiddenTester;

impl Tester for ForbiddenTester {
    fn coerce(&self, _value: Value) -> Result<Value, Rejection> {
        Err(Rejection::invalid(":label is forbidden"))
    }
}

/// Coerces booleans, strings and numbers to a boolean.
///
/// The strings `"1"`, `"true"` and `"yes"` (in any case) are `true`; other
/// strings are `false`. Zero and NaN are `false`; other numbers are `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanTester;

impl Tester for BooleanTester {
    fn coerce(&self, value: Value) -> Result<Value, Rejection> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(b)),
            Value::String(s) => {
                let truthy = ["1", "true", "yes"]
                    .iter()
                    .any(|word| s.eq_ignore_ascii_case(word));
                Ok(Value::Bool(truthy))
            }
            Value::Number(n) => Ok(Value::Bool(n != 0.0 && !n.is_nan())),
            _ => Err(Rejection::invalid(
                ":label cannot be converted to a boolean value",
            )),
        }
    }
}
