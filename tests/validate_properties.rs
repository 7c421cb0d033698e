//! Property tests: sanitized output is a fixed point of its schema.

use proptest::prelude::*;
use sane_schema::schema::{Schema, SchemaSpec, Validator, Value};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e12..1.0e12f64).prop_map(Value::Number),
        "[a-zA-Z0-9._-][ a-zA-Z0-9._-]{0,11}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::vec(("[a-c]", inner), 0..4).prop_map(Value::mapping),
        ]
    })
}

fn schemas() -> Vec<Schema> {
    vec![
        Schema::from("mixed"),
        SchemaSpec::new("string").flag("trim").flag("lowercase").into(),
        SchemaSpec::new("string").with("truncate", 4).flag("uppercase").into(),
        Schema::from("integer"),
        SchemaSpec::new("number").with("precision", 2).into(),
        Schema::from("boolean"),
        Schema::from("date"),
        Schema::list("integer"),
        Schema::List(vec![]),
        Schema::fields([
            ("a", Schema::from(SchemaSpec::new("number").optional())),
            ("b", Schema::from(SchemaSpec::new("string").default_to("none"))),
        ]),
    ]
}

proptest! {
    #[test]
    fn sanitized_values_are_fixed_points(value in arb_value(), index in 0usize..10) {
        let schema = schemas().into_iter().nth(index).unwrap_or_else(|| Schema::from("mixed"));
        let validator = Validator::new(&schema).unwrap_or_else(|e| panic!("{e}"));
        if let Ok(once) = validator.validate(&value) {
            prop_assert_eq!(validator.validate(&once), Ok(once.clone()));
        }
    }

    #[test]
    fn validation_is_deterministic(value in arb_value(), index in 0usize..10) {
        let schema = schemas().into_iter().nth(index).unwrap_or_else(|| Schema::from("mixed"));
        let validator = Validator::new(&schema).unwrap_or_else(|e| panic!("{e}"));
        prop_assert_eq!(validator.validate(&value), validator.validate(&value));
    }
}
