//! Resolution of schema shorthand into canonical form.
//!
//! Every [`Schema`] resolves to one type identifier, an optional child
//! description carried by the shorthand (a pattern, a field map, or an
//! element schema), and the ordered entries of the enclosing
//! [`SchemaSpec`], if any. Normalization borrows the schema and never
//! modifies it.

use std::borrow::Cow;

use indexmap::IndexMap;
use regex::Regex;

use super::error::SchemaError;
use super::identifier::TypeName;
use super::types::{Arg, Schema, SchemaSpec};

/// The `type` argument carried by a shorthand schema.
#[derive(Debug, Clone, Copy)]
pub enum Child<'a> {
    /// The type was named directly; there is no child description.
    None,
    /// A pattern, from a regular-expression shorthand.
    Pattern(&'a Regex),
    /// Field schemas, from a field-map shorthand.
    Fields(&'a IndexMap<String, Schema>),
    /// The element schema, from a list shorthand; `None` for an empty list.
    Element(Option<&'a Schema>),
}

/// A schema resolved to its canonical form.
#[derive(Debug, Clone)]
pub struct Canonical<'a> {
    type_name: Cow<'a, str>,
    child: Child<'a>,
    spec: Option<&'a SchemaSpec>,
}

impl<'a> Canonical<'a> {
    /// Returns the resolved type identifier.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the child description for the `type` constraint.
    #[must_use]
    pub const fn child(&self) -> Child<'a> {
        self.child
    }

    /// Returns the schema entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a Arg)> + use<'a> {
        self.spec
            .into_iter()
            .flat_map(|spec| spec.entries().iter().map(|(name, arg)| (name.as_str(), arg)))
    }

    /// Returns the entry stored under `name`.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&'a Arg> {
        self.spec.and_then(|spec| spec.entry(name))
    }
}

/// Resolves a schema into canonical form.
///
/// Resolution rules, in priority order:
///
/// - A [`SchemaSpec`] keeps its entries; its type resolves by the rules
///   below.
/// - A list of one schema is an array of that schema; an empty list is an
///   array of anything; a longer list is an error.
/// - A pattern is a `regexp` matching it.
/// - A field map is an `object` with those fields.
/// - `true` is `mixed`; `false` is `forbidden`.
/// - A native marker resolves to its lower-cased name.
/// - A name is used as given.
///
/// The identifier is not checked against a registry here.
///
/// # Errors
///
/// Returns [`SchemaError::Undefined`] for a spec without a type,
/// [`SchemaError::ListTooLong`] for a list of more than one schema, and
/// [`SchemaError::NestedSpec`] when a spec's type is itself a spec.
///
/// # Examples
///
///     use sane_schema::schema::{Schema, normalize};
///
///     let schema = Schema::list("number");
///     let canonical = normalize(&schema).unwrap();
///     assert_eq!(canonical.type_name(), "array");
pub fn normalize(schema: &Schema) -> Result<Canonical<'_>, SchemaError> {
    match schema {
        Schema::Spec(spec) => {
            let ty = spec.ty().ok_or(SchemaError::Undefined)?;
            let (type_name, child) = resolve_type(ty)?;
            Ok(Canonical {
                type_name,
                child,
                spec: Some(spec),
            })
        }
        other => {
            let (type_name, child) = resolve_type(other)?;
            Ok(Canonical {
                type_name,
                child,
                spec: None,
            })
        }
    }
}

fn resolve_type(ty: &Schema) -> Result<(Cow<'_, str>, Child<'_>), SchemaError> {
    let builtin = |name: TypeName| Cow::Borrowed(name.as_str());
    match ty {
        Schema::List(items) => match items.as_slice() {
            [] => Ok((builtin(TypeName::Array), Child::Element(None))),
            [element] => Ok((builtin(TypeName::Array), Child::Element(Some(element)))),
            _ => Err(SchemaError::ListTooLong { len: items.len() }),
        },
        Schema::Pattern(pattern) => Ok((builtin(TypeName::Regexp), Child::Pattern(pattern))),
        Schema::Fields(fields) => Ok((builtin(TypeName::Object), Child::Fields(fields))),
        Schema::Any(true) => Ok((builtin(TypeName::Mixed), Child::None)),
        Schema::Any(false) => Ok((builtin(TypeName::Forbidden), Child::None)),
        Schema::Native(name) => Ok((native_identifier(*name), Child::None)),
        Schema::Name(name) => Ok((Cow::Borrowed(name.as_str()), Child::None)),
        Schema::Spec(_) => Err(SchemaError::NestedSpec),
    }
}

/// Lower-cases a native marker name into a type identifier.
fn native_identifier(name: &'static str) -> Cow<'static, str> {
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}
