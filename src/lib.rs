//! `sane_schema` validates and coerces dynamic values against declarative
//! schemas.
//!
//! Values arrive already deserialized (from YAML, JSON or hand-built
//! [`schema::Value`]s). A schema names a type such as `"integer"` or
//! `"email"` and lists constraints such as `min`, `trim` or `match`. The
//! result is either the coerced value or an error naming the offending
//! field by its dotted path.
//!
//!     use sane_schema::schema::{Schema, SchemaSpec, Value};
//!
//!     let schema = Schema::fields([
//!         ("port", Schema::from(SchemaSpec::new("integer").flag("port"))),
//!         ("host", Schema::from(SchemaSpec::new("string").default_to("localhost"))),
//!     ]);
//!     let input = Value::mapping([("port", "8080")]);
//!     let out = sane_schema::sanitize(Some(&input), &schema, None).unwrap();
//!     assert_eq!(
//!         out,
//!         Value::mapping([("port", Value::from(8080)), ("host", Value::from("localhost"))]),
//!     );

/// Schemas, values and the validation engine.
pub mod schema;

pub use schema::{sanitize, validate};
