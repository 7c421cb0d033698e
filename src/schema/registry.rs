//! The registry of type identifiers.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::container::{ArrayTester, ObjectTester};
use super::date::DateTester;
use super::error::SchemaError;
use super::identifier::{TypeName, validate_type_identifier};
use super::number::NumberTester;
use super::string::{Format, StringTester};
use super::tester::{BooleanTester, ForbiddenTester, MixedTester, Tester};

/// Maps type identifiers to the testers that implement them.
///
/// [`Registry::builtin`] holds every built-in type. Further testers may be
/// registered under new identifiers; an identifier cannot be registered
/// twice, so built-in behaviour cannot be replaced.
///
/// # Examples
///
///     use sane_schema::schema::{Registry, Rejection, Tester, Value};
///
///     #[derive(Debug)]
///     struct Even;
///
///     impl Tester for Even {
///         fn coerce(&self, value: Value) -> Result<Value, Rejection> {
///             match value.as_f64() {
///                 Some(n) if n % 2.0 == 0.0 => Ok(value),
///                 _ => Err(Rejection::invalid(":label is not even")),
///             }
///         }
///     }
///
///     let mut registry = Registry::builtin();
///     registry.register("even", Even).unwrap();
///     assert!(registry.contains("even"));
#[derive(Debug, Clone)]
pub struct Registry {
    testers: IndexMap<String, Arc<dyn Tester>>,
}

impl Registry {
    /// Creates a registry holding only the built-in types.
    #[must_use]
    pub fn builtin() -> Self {
        let testers = TypeName::ALL
            .into_iter()
            .map(|name| (name.as_str().to_owned(), builtin_tester(name)))
            .collect();
        Self { testers }
    }

    /// Registers a tester under a new identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] if the identifier is not
    /// a legal custom identifier, or [`SchemaError::DuplicateType`] if it
    /// is already registered.
    pub fn register(
        &mut self,
        identifier: &str,
        tester: impl Tester + 'static,
    ) -> Result<(), SchemaError> {
        validate_type_identifier(identifier)?;
        if self.testers.contains_key(identifier) {
            return Err(SchemaError::DuplicateType {
                identifier: identifier.to_owned(),
            });
        }
        debug!(identifier, "registered custom tester");
        self.testers.insert(identifier.to_owned(), Arc::new(tester));
        Ok(())
    }

    /// Returns the tester registered under `identifier`.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<Arc<dyn Tester>> {
        self.testers.get(identifier).cloned()
    }

    /// Returns `true` if `identifier` is registered.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.testers.contains_key(identifier)
    }

    /// Returns every registered identifier, built-ins first.
    #[must_use]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.testers.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_tester(name: TypeName) -> Arc<dyn Tester> {
    match name {
        TypeName::Mixed => Arc::new(MixedTester),
        TypeName::Forbidden => Arc::new(ForbiddenTester),
        TypeName::String => Arc::new(StringTester::new(Format::Plain)),
        TypeName::Regexp => Arc::new(StringTester::new(Format::Pattern)),
        TypeName::Ip => Arc::new(StringTester::new(Format::Ip)),
        TypeName::Alphanumeric => Arc::new(StringTester::new(Format::Alphanumeric)),
        TypeName::Email => Arc::new(StringTester::new(Format::Email)),
        TypeName::Hex => Arc::new(StringTester::new(Format::Hex)),
        TypeName::Token => Arc::new(StringTester::new(Format::Token)),
        TypeName::Url => Arc::new(StringTester::new(Format::Url)),
        TypeName::Date => Arc::new(DateTester),
        TypeName::Object => Arc::new(ObjectTester),
        TypeName::Array => Arc::new(ArrayTester),
        TypeName::Number => Arc::new(NumberTester::number()),
        TypeName::Integer => Arc::new(NumberTester::integer()),
        TypeName::Boolean => Arc::new(BooleanTester),
    }
}
