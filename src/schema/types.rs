//! In-memory schema descriptions.
//!
//! A [`Schema`] is one of the shorthand forms a caller may write: a type
//! name, a native type marker, a pattern, a one-element list, a boolean, a
//! map of field schemas, or a full [`SchemaSpec`] naming a type plus an
//! ordered set of constraints. Schemas are never mutated by validation, so
//! one schema may back any number of concurrent validators.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::Regex;

use super::value::Value;

// ── Schema ──────────────────────────────────────────────────────────

/// A schema in any of its shorthand forms.
///
/// # Examples
///
///     use sane_schema::schema::{Schema, SchemaSpec};
///
///     let user = Schema::fields([
///         ("name", Schema::from("string")),
///         ("age", SchemaSpec::new("integer").with("min", 0).into()),
///         ("tags", Schema::list("token")),
///     ]);
#[derive(Debug, Clone)]
pub enum Schema {
    /// A type identifier such as `"string"` or `"integer"`.
    Name(String),
    /// A native type marker; its name is lower-cased into an identifier.
    Native(&'static str),
    /// A string that must match the pattern.
    Pattern(Regex),
    /// An array whose elements match the single element schema, or any
    /// elements when the list is empty.
    List(Vec<Self>),
    /// `true` accepts anything, `false` rejects everything.
    Any(bool),
    /// An object with the given field schemas.
    Fields(IndexMap<String, Self>),
    /// A type plus constraints.
    Spec(SchemaSpec),
}

impl Schema {
    /// Builds an object schema from field name/schema pairs.
    #[must_use]
    pub fn fields<K, S, I>(fields: I) -> Self
    where
        K: Into<String>,
        S: Into<Self>,
        I: IntoIterator<Item = (K, S)>,
    {
        Self::Fields(
            fields
                .into_iter()
                .map(|(name, schema)| (name.into(), schema.into()))
                .collect(),
        )
    }

    /// Builds an array schema whose elements match `element`.
    #[must_use]
    pub fn list(element: impl Into<Self>) -> Self {
        Self::List(vec![element.into()])
    }

    /// Builds a schema from a native type marker.
    ///
    /// # Examples
    ///
    ///     use sane_schema::schema::{Schema, StringType};
    ///
    ///     let schema = Schema::native::<StringType>();
    #[must_use]
    pub const fn native<T: NativeType>() -> Self {
        Self::Native(T::NAME)
    }
}

impl From<&str> for Schema {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for Schema {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<bool> for Schema {
    fn from(accept: bool) -> Self {
        Self::Any(accept)
    }
}

impl From<Regex> for Schema {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<Vec<Self>> for Schema {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl From<IndexMap<String, Self>> for Schema {
    fn from(fields: IndexMap<String, Self>) -> Self {
        Self::Fields(fields)
    }
}

impl From<SchemaSpec> for Schema {
    fn from(spec: SchemaSpec) -> Self {
        Self::Spec(spec)
    }
}

// ── Native type markers ─────────────────────────────────────────────

/// A marker type standing for a type identifier, the way a constructor
/// reference names a type.
///
/// Implement it for a custom marker to reference a tester registered under
/// the lower-cased `NAME`.
pub trait NativeType {
    /// The marker's name; lower-cased it becomes the type identifier.
    const NAME: &'static str;
}

macro_rules! native_markers {
    ($($(#[$doc:meta])* $marker:ident => $name:literal;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $marker;

            impl NativeType for $marker {
                const NAME: &'static str = $name;
            }
        )*
    };
}

native_markers! {
    /// Marker for the `string` type.
    StringType => "String";
    /// Marker for the `number` type.
    NumberType => "Number";
    /// Marker for the `integer` type.
    IntegerType => "Integer";
    /// Marker for the `boolean` type.
    BooleanType => "Boolean";
    /// Marker for the `date` type.
    DateType => "Date";
    /// Marker for the `array` type.
    ArrayType => "Array";
    /// Marker for the `object` type.
    ObjectType => "Object";
}

// ── SchemaSpec ──────────────────────────────────────────────────────

/// The canonical schema form: a type plus constraints in declaration
/// order.
///
/// The keys `type`, `default`, `required` and `label` are consumed by the
/// validation engine; every other key names a constraint of the resolved
/// type and is applied in the order it was added.
///
/// # Examples
///
///     use sane_schema::schema::SchemaSpec;
///
///     let spec = SchemaSpec::new("string")
///         .flag("trim")
///         .with("max", 20)
///         .default_to("anonymous")
///         .label("username");
#[derive(Debug, Clone, Default)]
pub struct SchemaSpec {
    ty: Option<Box<Schema>>,
    entries: IndexMap<String, Arg>,
}

impl SchemaSpec {
    /// Creates a spec of the given type with no constraints.
    #[must_use]
    pub fn new(ty: impl Into<Schema>) -> Self {
        Self {
            ty: Some(Box::new(ty.into())),
            entries: IndexMap::new(),
        }
    }

    /// Returns the declared type, if any.
    #[must_use]
    pub fn ty(&self) -> Option<&Schema> {
        self.ty.as_deref()
    }

    /// Returns the entries in declaration order.
    #[must_use]
    pub const fn entries(&self) -> &IndexMap<String, Arg> {
        &self.entries
    }

    /// Returns the entry stored under `name`.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&Arg> {
        self.entries.get(name)
    }

    /// Sets the type.
    #[must_use]
    pub fn of(mut self, ty: impl Into<Schema>) -> Self {
        self.ty = Some(Box::new(ty.into()));
        self
    }

    /// Adds a constraint with its argument.
    ///
    /// Adding a name twice replaces the argument but keeps the original
    /// position.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, arg: impl Into<Arg>) -> Self {
        self.entries.insert(name.into(), arg.into());
        self
    }

    /// Adds a constraint that takes no argument, such as `trim`.
    #[must_use]
    pub fn flag(self, name: impl Into<String>) -> Self {
        self.with(name, true)
    }

    /// Sets the value returned when the input is missing.
    #[must_use]
    pub fn default_to(self, value: impl Into<Value>) -> Self {
        self.with("default", Arg::Value(value.into()))
    }

    /// Sets a producer called for a fresh value whenever the input is
    /// missing.
    #[must_use]
    pub fn default_with<F>(self, produce: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.with("default", Arg::Produce(Producer::new(produce)))
    }

    /// Sets whether a missing input is an error.
    #[must_use]
    pub fn required(self, required: bool) -> Self {
        self.with("required", required)
    }

    /// Marks the input as optional; shorthand for `required(false)`.
    #[must_use]
    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Sets the label used for this value in error messages.
    #[must_use]
    pub fn label(self, label: impl Into<String>) -> Self {
        self.with("label", Arg::Value(Value::String(label.into())))
    }

    /// Sets how an object schema treats undeclared fields.
    #[must_use]
    pub fn strict(self, strict: Strict) -> Self {
        self.with("strict", strict)
    }

    /// Adds a caller-defined check that may inspect or rewrite the value.
    ///
    /// The check returns a message template (using `:label`) to reject the
    /// value.
    #[must_use]
    pub fn custom<F>(self, check: F) -> Self
    where
        F: Fn(&mut Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.with("custom", Arg::Check(Check::new(check)))
    }
}

// ── Arguments ───────────────────────────────────────────────────────

/// The argument of a schema entry.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A literal value: a number, string, flag, list of allowed values,
    /// date, and so on.
    Value(Value),
    /// A regular expression.
    Pattern(Regex),
    /// A pattern with its replacement, for the `replace` constraint.
    Replace {
        /// The pattern to search for; the first match is replaced.
        pattern: Regex,
        /// The replacement text; `$1`-style group references expand.
        replacement: String,
    },
    /// A caller-defined check, for the `custom` constraint.
    Check(Check),
    /// A default value producer, for the `default` key.
    Produce(Producer),
}

impl Arg {
    /// Returns the literal value, if this argument is one.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

macro_rules! literal_args {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

literal_args!(bool, f64, i32, u32, &str, String, Vec<Value>, DateTime<Utc>);

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Regex> for Arg {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<Strict> for Arg {
    fn from(strict: Strict) -> Self {
        match strict {
            Strict::Drop => Self::Value(Value::Bool(true)),
            Strict::Keep => Self::Value(Value::Bool(false)),
            Strict::Reject => Self::Value(Value::from(Strict::REJECT_KEYWORD)),
        }
    }
}

/// How an object schema treats fields it does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strict {
    /// Undeclared fields are dropped from the output.
    #[default]
    Drop,
    /// Undeclared fields are copied to the output unchanged.
    Keep,
    /// Undeclared fields are a validation failure.
    Reject,
}

impl Strict {
    /// The string argument value selecting [`Strict::Reject`].
    pub const REJECT_KEYWORD: &'static str = "throw";

    /// Reads the policy from a `strict` entry: `false` keeps, `"throw"`
    /// rejects, anything else drops.
    #[must_use]
    pub fn from_arg(arg: Option<&Arg>) -> Self {
        match arg.and_then(Arg::as_value) {
            Some(Value::Bool(false)) => Self::Keep,
            Some(Value::String(s)) if s == Self::REJECT_KEYWORD => Self::Reject,
            _ => Self::Drop,
        }
    }
}

type CheckFn = dyn Fn(&mut Value) -> Result<(), String> + Send + Sync;

/// A caller-defined check run by the `custom` constraint.
#[derive(Clone)]
pub struct Check(Arc<CheckFn>);

impl Check {
    /// Wraps a check closure.
    #[must_use]
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&mut Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    /// Runs the check, which may rewrite `value`.
    ///
    /// # Errors
    ///
    /// Returns the check's message template when it rejects the value.
    pub fn run(&self, value: &mut Value) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Check(..)")
    }
}

type ProduceFn = dyn Fn() -> Value + Send + Sync;

/// A zero-argument producer of default values.
#[derive(Clone)]
pub struct Producer(Arc<ProduceFn>);

impl Producer {
    /// Wraps a producer closure.
    #[must_use]
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(produce))
    }

    /// Produces a fresh value.
    #[must_use]
    pub fn produce(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Producer(..)")
    }
}
