//! Behaviour-driven tests for value validation.
//!
//! These tests use `rstest` parameterization to express Given/When/Then
//! acceptance criteria for coercion, absence handling, strict objects and
//! error reporting through the public entry points.

use rstest::rstest;
use sane_schema::schema::{
    Failure, Schema, SchemaError, SchemaSpec, Strict, UNDEFINED_KIND, Value,
};
use sane_schema::{sanitize, validate};

fn checked(value: Option<&Value>, schema: &Schema) -> Result<Value, String> {
    validate(value, schema, None)
        .unwrap_or_else(|e| panic!("schema should compile: {e}"))
        .map_err(|e| e.to_string())
}

// ── Given a scalar schema, coercion produces the native value ────────

#[rstest]
#[case::integer_from_text(Value::from("42"), "integer", Value::from(42))]
#[case::integer_rounds(Value::from(2.5), "integer", Value::from(3))]
#[case::number_from_prefix(Value::from("3.5kg"), "number", Value::from(3.5))]
#[case::string_from_number(Value::from(7), "string", Value::from("7"))]
#[case::boolean_from_yes(Value::from("Yes"), "boolean", Value::Bool(true))]
#[case::boolean_from_one(Value::from(1), "boolean", Value::Bool(true))]
#[case::boolean_from_zero_text(Value::from("0"), "boolean", Value::Bool(false))]
#[case::boolean_from_zero(Value::from(0), "boolean", Value::Bool(false))]
#[case::hex_kept(Value::from("0xff"), "hex", Value::from("0xff"))]
#[case::ip_kept(Value::from("10.0.0.1"), "ip", Value::from("10.0.0.1"))]
fn given_a_scalar_schema_when_validated_then_value_is_coerced(
    #[case] input: Value,
    #[case] type_name: &str,
    #[case] expected: Value,
) {
    assert_eq!(checked(Some(&input), &Schema::from(type_name)), Ok(expected));
}

// ── Given an unconvertible value, the error names the field ─────────

#[rstest]
#[case::integer(Value::from("abc"), "integer", "\"value\" could not be converted to a number")]
#[case::ip_single_group(Value::from("127"), "ip", "\"value\" is not a valid ip address")]
#[case::url(Value::from("example.com"), "url", "\"value\" is not a valid url")]
#[case::date(Value::from("someday"), "date", "\"value\" could not be converted to a date")]
#[case::boolean(Value::Sequence(vec![]), "boolean", "\"value\" cannot be converted to a boolean value")]
fn given_an_unconvertible_value_when_validated_then_message_is_rendered(
    #[case] input: Value,
    #[case] type_name: &str,
    #[case] expected: &str,
) {
    assert_eq!(
        checked(Some(&input), &Schema::from(type_name)),
        Err(expected.to_owned())
    );
}

// ── Given a missing value, absence policy decides ───────────────────

#[rstest]
#[case::default_first(
    SchemaSpec::new("string").default_to("hi").optional(),
    Ok(Value::from("hi"))
)]
#[case::optional_second(SchemaSpec::new("string").optional(), Ok(Value::Null))]
#[case::array_third(SchemaSpec::new(Schema::list("number")), Ok(Value::Sequence(vec![])))]
#[case::failure_last(SchemaSpec::new("string"), Err("\"value\" is missing".to_owned()))]
fn given_a_missing_value_when_validated_then_absence_policy_applies(
    #[case] spec: SchemaSpec,
    #[case] expected: Result<Value, String>,
) {
    assert_eq!(checked(None, &spec.into()), expected);
}

#[test]
fn given_a_missing_required_value_when_validated_then_kind_is_undefined() {
    let err = validate(None, &Schema::from("number"), Some("count"))
        .unwrap_or_else(|e| panic!("{e}"))
        .err();
    assert_eq!(err.as_ref().map(|e| e.kind()), Some(UNDEFINED_KIND));
    assert_eq!(err.map(|e| e.path()), Some("count".to_owned()));
}

// ── Given an object with undeclared fields, strict mode decides ─────

#[rstest]
#[case::dropped(None, Ok(vec!["id"]))]
#[case::kept(Some(Strict::Keep), Ok(vec!["id", "note"]))]
#[case::rejected(Some(Strict::Reject), Err("\"value\" contains unexpected \"note\"".to_owned()))]
fn given_undeclared_fields_when_validated_then_strict_mode_applies(
    #[case] strict: Option<Strict>,
    #[case] expected: Result<Vec<&str>, String>,
) {
    let mut spec = SchemaSpec::new(Schema::fields([("id", "integer")]));
    if let Some(strict) = strict {
        spec = spec.strict(strict);
    }
    let input = Value::mapping([("id", Value::from("5")), ("note", Value::from("x"))]);
    let result = checked(Some(&input), &spec.into()).map(|out| out.keys());
    let expected = expected.map(|keys| keys.into_iter().map(str::to_owned).collect::<Vec<_>>());
    assert_eq!(result, expected);
}

// ── Given nested structures, failures carry the dotted path ─────────

#[rstest]
#[case::object_in_object(
    Schema::fields([("a", Schema::fields([("b", "number")]))]),
    Value::mapping([("a", Value::mapping([("b", "x")]))]),
    "a.b"
)]
#[case::element_in_object(
    Schema::fields([("list", Schema::list("integer"))]),
    Value::mapping([("list", vec![Value::from(1), Value::from(2), Value::from("z")])]),
    "list.2"
)]
#[case::object_in_array(
    Schema::list(Schema::fields([("id", "integer")])),
    Value::from(vec![Value::mapping([("id", "nope")])]),
    "0.id"
)]
fn given_a_nested_failure_when_validated_then_path_locates_it(
    #[case] schema: Schema,
    #[case] input: Value,
    #[case] path: &str,
) {
    let err = validate(Some(&input), &schema, None)
        .unwrap_or_else(|e| panic!("{e}"))
        .err();
    assert_eq!(err.map(|e| e.path()), Some(path.to_owned()));
}

// ── Given a malformed schema, it fails before any value is seen ─────

#[rstest]
#[case::unknown_type(Schema::from("uuid"))]
#[case::long_list(Schema::List(vec!["a".into(), "b".into()]))]
#[case::unknown_constraint(SchemaSpec::new("date").flag("trim").into())]
#[case::untyped_spec(SchemaSpec::default().with("min", 1).into())]
fn given_a_malformed_schema_when_validated_then_schema_error_is_raised(#[case] schema: Schema) {
    assert!(validate(Some(&Value::from("x")), &schema, None).is_err());
    assert!(matches!(
        sanitize(Some(&Value::from("x")), &schema, None),
        Err(Failure::Schema(_))
    ));
}

#[test]
fn given_an_unknown_constraint_when_compiled_then_message_names_it() {
    let schema: Schema = SchemaSpec::new("string").with("bogus", 1).into();
    assert_eq!(
        validate(Some(&Value::from("x")), &schema, None).err(),
        Some(SchemaError::UnknownConstraint {
            constraint: "bogus".to_owned(),
            type_name: "string".to_owned(),
        })
    );
}

// ── Given the throwing entry point, value errors become failures ────

#[test]
fn given_an_invalid_value_when_sanitized_then_failure_renders_the_path() {
    let schema = Schema::fields([("age", "integer")]);
    let input = Value::mapping([("age", "old")]);
    let failure = sanitize(Some(&input), &schema, None).err();
    assert_eq!(
        failure.map(|f| f.to_string()),
        Some("\"age\" could not be converted to a number".to_owned())
    );
}
