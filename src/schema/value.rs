//! The dynamic value type checked and produced by validators.
//!
//! `Value` mirrors the data model of self-describing formats (null, bool,
//! number, string, sequence, mapping) and adds a `Date` instant produced by
//! the date tester plus an `Accessor` variant for objects that expose their
//! fields through a getter instead of plain properties. Mappings preserve
//! insertion order via `IndexMap`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::{self, MapAccess, SeqAccess, Visitor};

/// Read access to an object whose fields are fetched through a getter.
///
/// Object schemas read declared fields with [`Accessor::get`] and, under
/// strict handling, enumerate the remaining fields with
/// [`Accessor::keys`].
pub trait Accessor: fmt::Debug + Send + Sync {
    /// Returns the value of `field`, or `None` when it is not present.
    fn get(&self, field: &str) -> Option<Value>;

    /// Returns the names of all fields the object exposes.
    fn keys(&self) -> Vec<String>;
}

/// A dynamic value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// An explicit null.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A double-precision number.
    Number(f64),
    /// A string.
    String(String),
    /// A point in time.
    Date(DateTime<Utc>),
    /// An ordered sequence of values.
    Sequence(Vec<Self>),
    /// An ordered mapping of string keys to values.
    Mapping(IndexMap<String, Self>),
    /// An object read through a getter.
    Accessor(Arc<dyn Accessor>),
}

impl Value {
    /// Builds a mapping from key/value pairs, preserving their order.
    #[must_use]
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Returns `true` for values treated as missing: null and the empty
    /// string.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the string slice for `String` values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number for `Number` values.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean for `Bool` values.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Reads a field of a mapping or accessor.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Self> {
        match self {
            Self::Mapping(entries) => entries.get(name).cloned(),
            Self::Accessor(accessor) => accessor.get(name),
            _ => None,
        }
    }

    /// Returns the field names of a mapping or accessor.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self {
            Self::Mapping(entries) => entries.keys().cloned().collect(),
            Self::Accessor(accessor) => accessor.keys(),
            _ => Vec::new(),
        }
    }

    /// Converts a scalar into its string form.
    ///
    /// Integral numbers render without a fractional part (`42`, not
    /// `42.0`) and dates render as RFC 3339. Null, sequences and objects
    /// have no string form.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(format_number(*n)),
            Self::Date(d) => Some(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Null | Self::Sequence(_) | Self::Mapping(_) | Self::Accessor(_) => None,
        }
    }
}

/// Formats a number the way it is written in messages and string output.
#[must_use]
pub(crate) fn format_number(n: f64) -> String {
    if n.is_infinite() {
        return if n.is_sign_positive() {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        };
    }
    n.to_string()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            (Self::Accessor(a), Self::Accessor(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Self>> for Value {
    fn from(entries: IndexMap<String, Self>) -> Self {
        Self::Mapping(entries)
    }
}

impl From<Arc<dyn Accessor>> for Value {
    fn from(accessor: Arc<dyn Accessor>) -> Self {
        Self::Accessor(accessor)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Visitor implementation for deserializing arbitrary self-describing data
/// into `Value`.
struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any value (null, bool, number, string, sequence, or mapping)")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(v))
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "numbers are doubles; integers beyond 2^53 round"
    )]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::Number(v as f64))
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "numbers are doubles; integers beyond 2^53 round"
    )]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, val)) = map.next_entry()? {
            entries.insert(key, val);
        }
        Ok(Value::Mapping(entries))
    }
}
