//! Regression corpus: user records loaded from YAML fixtures.

mod common;

use common::load_fixture;
use rstest::{fixture, rstest};
use sane_schema::schema::{Schema, SchemaSpec, Validator, Value};

/// The schema every record in the corpus is checked against.
#[fixture]
fn user_validator() -> Validator {
    let schema = Schema::fields([
        (
            "name",
            Schema::from(SchemaSpec::new("string").flag("trim").with("min", 1)),
        ),
        ("email", SchemaSpec::new("email").flag("lowercase").into()),
        (
            "age",
            SchemaSpec::new("integer").with("min", 0).with("max", 150).into(),
        ),
        (
            "port",
            SchemaSpec::new("integer").flag("port").optional().into(),
        ),
        (
            "tags",
            SchemaSpec::new(Schema::list("token")).with("max", 3).into(),
        ),
        (
            "role",
            SchemaSpec::new("string")
                .with("allow", vec![Value::from("admin"), Value::from("user")])
                .default_to("user")
                .into(),
        ),
        ("active", SchemaSpec::new("boolean").default_to(false).into()),
    ]);
    Validator::new(&schema).unwrap_or_else(|e| panic!("user schema should compile: {e}"))
}

fn field(doc: &Value, name: &str) -> Value {
    doc.field(name)
        .unwrap_or_else(|| panic!("fixture document lacks '{name}': {doc:?}"))
}

#[rstest]
fn valid_corpus_sanitizes_to_expected_output(user_validator: Validator) {
    let docs = load_fixture("user_valid.yaml");
    assert!(!docs.is_empty(), "corpus should not be empty");
    for (index, doc) in docs.iter().enumerate() {
        let result = user_validator.validate(&field(doc, "input"));
        assert_eq!(
            result,
            Ok(field(doc, "output")),
            "document {index} sanitized unexpectedly"
        );
    }
}

#[rstest]
fn sanitized_corpus_is_a_fixed_point(user_validator: Validator) {
    for doc in load_fixture("user_valid.yaml") {
        let once = user_validator
            .validate(&field(&doc, "input"))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(user_validator.validate(&once), Ok(once.clone()));
    }
}

#[rstest]
fn invalid_corpus_is_rejected_at_the_expected_field(user_validator: Validator) {
    let docs = load_fixture("user_invalid.yaml");
    assert!(!docs.is_empty(), "corpus should not be empty");
    for (index, doc) in docs.iter().enumerate() {
        let Err(err) = user_validator.validate(&field(doc, "input")) else {
            panic!("document {index} should be rejected");
        };
        assert_eq!(
            Some(err.kind()),
            field(doc, "kind").as_str(),
            "document {index}: {err}"
        );
        assert_eq!(
            Some(err.path().as_str()),
            field(doc, "path").as_str(),
            "document {index}: {err}"
        );
    }
}
