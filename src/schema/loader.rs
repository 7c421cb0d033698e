//! Loading input values from YAML text.
//!
//! Provides [`load_value`] for a single YAML document and [`load_values`]
//! for a stream of documents separated by `---`. Both produce plain
//! [`Value`] trees ready to be handed to a validator.

use super::error::LoadError;
use super::value::Value;

/// Loads one value from a YAML document.
///
/// # Errors
///
/// Returns [`LoadError::Deserialize`] if the YAML is malformed.
///
/// # Examples
///
///     use sane_schema::schema::{Value, load_value};
///
///     let value = load_value("{name: Ada, age: 36}").unwrap();
///     assert_eq!(value.field("age"), Some(Value::from(36)));
pub fn load_value(input: &str) -> Result<Value, LoadError> {
    serde_saphyr::from_str(input)
        .map_err(|error| LoadError::Deserialize(first_line(&error.to_string())))
}

/// Loads every document of a multi-document YAML stream, in order.
///
/// # Errors
///
/// Returns [`LoadError::Deserialize`] if any document is malformed.
pub fn load_values(input: &str) -> Result<Vec<Value>, LoadError> {
    serde_saphyr::from_multiple(input)
        .map_err(|error| LoadError::Deserialize(first_line(&error.to_string())))
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or(message).to_owned()
}
