//! The `object` and `array` testers.
//!
//! Both recurse into the engine: every declared field and every element is
//! validated by a [`Validator`] compiled alongside the enclosing schema, so
//! a failure deep inside a structure carries one label per level.

use indexmap::IndexMap;

use super::error::{Rejection, SchemaError};
use super::identifier::TypeName;
use super::normalize::Child;
use super::tester::{Constraint, Resolution, Tester, bind_base, count_arg};
use super::types::{Arg, Schema, Strict};
use super::validator::{Scope, Validator};
use super::value::Value;

// ── Object ──────────────────────────────────────────────────────────

/// Accepts mappings and accessors; validates declared fields.
///
/// Without a field map (or with an empty one) the input passes through
/// unchanged. With one, the output is a mapping of the declared fields in
/// declaration order, followed by any undeclared fields the [`Strict`]
/// policy keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectTester;

impl Tester for ObjectTester {
    fn coerce(&self, value: Value) -> Result<Value, Rejection> {
        match value {
            Value::Mapping(_) | Value::Accessor(_) => Ok(value),
            _ => Err(Rejection::invalid(":label is not an object")),
        }
    }

    fn bind_type(&self, child: Child<'_>, scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        let Child::Fields(fields) = child else {
            return Ok(Resolution::Ignore);
        };
        if fields.is_empty() {
            return Ok(Resolution::Ignore);
        }
        let compiled = fields
            .iter()
            .map(|(name, schema)| Ok((name.clone(), scope.compile(schema)?)))
            .collect::<Result<IndexMap<_, _>, SchemaError>>()?;
        Ok(Resolution::apply(ObjectFields {
            fields: compiled,
            strict: Strict::from_arg(scope.entry("strict")),
        }))
    }

    fn bind(&self, name: &str, arg: &Arg, _scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        match name {
            // Read by `bind_type`.
            "strict" => Ok(Resolution::Ignore),
            _ => bind_base(name, arg),
        }
    }
}

#[derive(Debug)]
struct ObjectFields {
    fields: IndexMap<String, Validator>,
    strict: Strict,
}

impl Constraint for ObjectFields {
    fn apply(&self, value: Value) -> Result<Value, Rejection> {
        let mut output = IndexMap::with_capacity(self.fields.len());
        for (name, validator) in &self.fields {
            let field = value.field(name);
            if let Some(out) = validator.check(field.as_ref(), Some(name.as_str()))? {
                output.insert(name.clone(), out);
            }
        }

        if self.strict != Strict::Drop {
            for key in value.keys() {
                if self.fields.contains_key(&key) {
                    continue;
                }
                if self.strict == Strict::Reject {
                    return Err(Rejection::invalid(format!(
                        ":label contains unexpected \"{key}\""
                    )));
                }
                if let Some(extra) = value.field(&key) {
                    output.insert(key, extra);
                }
            }
        }

        Ok(Value::Mapping(output))
    }
}

// ── Array ───────────────────────────────────────────────────────────

/// Accepts sequences; validates every element and bounds the count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayTester;

impl Tester for ArrayTester {
    fn coerce(&self, value: Value) -> Result<Value, Rejection> {
        match value {
            Value::Sequence(_) => Ok(value),
            _ => Err(Rejection::invalid(":label is not an array")),
        }
    }

    fn bind_type(&self, child: Child<'_>, scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        let element = match child {
            Child::Element(Some(schema)) => scope.compile(schema)?,
            Child::Element(None) => scope.compile(&Schema::from(TypeName::Mixed.as_str()))?,
            Child::None | Child::Pattern(_) | Child::Fields(_) => return Ok(Resolution::Ignore),
        };
        Ok(Resolution::apply(ArrayOp::Elements(Box::new(element))))
    }

    fn bind(&self, name: &str, arg: &Arg, _scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        match name {
            "min" => Ok(Resolution::apply(ArrayOp::Min(count_arg(name, arg)?))),
            "max" => Ok(Resolution::apply(ArrayOp::Max(count_arg(name, arg)?))),
            _ => bind_base(name, arg),
        }
    }
}

#[derive(Debug)]
enum ArrayOp {
    Elements(Box<Validator>),
    Min(usize),
    Max(usize),
}

impl Constraint for ArrayOp {
    fn apply(&self, value: Value) -> Result<Value, Rejection> {
        let Value::Sequence(items) = value else {
            return Err(Rejection::invalid(":label is not an array"));
        };
        match self {
            Self::Elements(element) => {
                let mut output = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let label = index.to_string();
                    if let Some(out) = element.check(Some(item), Some(label.as_str()))? {
                        output.push(out);
                    }
                }
                Ok(Value::Sequence(output))
            }
            Self::Min(n) if items.len() < *n => Err(Rejection::invalid(format!(
                ":label has less than {n} items"
            ))),
            Self::Max(n) if items.len() > *n => Err(Rejection::invalid(format!(
                ":label has more than {n} items"
            ))),
            Self::Min(_) | Self::Max(_) => Ok(Value::Sequence(items)),
        }
    }
}

