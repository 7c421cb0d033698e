//! Shared test helpers for integration tests.

use sane_schema::schema::{Value, load_values};

/// Loads every YAML document of a file in the `tests/fixtures/`
/// directory.
///
/// # Panics
///
/// Panics if the file cannot be read or is not valid YAML.
pub fn load_fixture(name: &str) -> Vec<Value> {
    let yaml = std::fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"));
    load_values(&yaml).unwrap_or_else(|e| panic!("failed to load fixture {name}: {e}"))
}
