//! Schema-driven validation and coercion of dynamic values.
//!
//! A [`Schema`] describes the expected shape of a [`Value`]: a type plus
//! constraints, written in any of several shorthand forms. Compiling a
//! schema into a [`Validator`] resolves the shorthand, looks the type up
//! in a [`Registry`] and binds every constraint, so schema defects are
//! reported as [`SchemaError`]s before any value is processed. Checking a
//! value coerces it to the type's representation, applies each constraint
//! in declaration order and recurses into object fields and array elements.
//! A rejected value yields a [`ValidationError`] locating the offending
//! field by its dotted path.

mod container;
mod date;
mod error;
mod identifier;
mod loader;
mod normalize;
mod number;
mod registry;
mod string;
mod tester;
mod types;
mod validator;
mod value;

pub use container::{ArrayTester, ObjectTester};
pub use date::{DateTester, parse_date};
pub use error::{
    Failure, LABEL_PLACEHOLDER, LoadError, Rejection, SchemaError, UNDEFINED_KIND, ValidationError,
};
pub use identifier::{TypeName, validate_type_identifier};
pub use loader::{load_value, load_values};
pub use normalize::{Canonical, Child, normalize};
pub use number::NumberTester;
pub use registry::Registry;
pub use string::{Format, StringTester};
pub use tester::{
    BooleanTester, Constraint, ForbiddenTester, MixedTester, Resolution, Tester, bind_base,
};
pub use types::{
    Arg, ArrayType, BooleanType, Check, DateType, IntegerType, NativeType, NumberType, ObjectType,
    Producer, Schema, SchemaSpec, Strict, StringType,
};
pub use validator::{Scope, Validator, sanitize, validate};
pub use value::{Accessor, Value};
