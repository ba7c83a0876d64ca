use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use rengbis_compiler::{validate, ResultKind, SchemaBundle, Schema, Value};
use rengbis_schema::Label;

fn root(source: &str) -> Schema {
    SchemaBundle::from_source(source)
        .unwrap()
        .root
        .expect("a root schema")
}

fn object(entries: &[(&str, Value)]) -> Value {
    Value::Object(
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect(),
    )
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn number(value: &str) -> Value {
    Value::Number(value.parse().unwrap())
}

fn sample_values() -> Vec<Value> {
    vec![
        Value::Null,
        Value::Bool(true),
        number("3.14"),
        text("anything"),
        Value::Array(vec![number("1")]),
        Value::Tuple(vec![number("1"), text("x")]),
        object(&[("key", Value::Bool(false))]),
    ]
}

#[test]
fn any_accepts_everything_and_fail_accepts_nothing() {
    for value in sample_values() {
        assert!(validate(&Schema::Any, &value).is_valid());
        assert!(!validate(&Schema::Fail, &value).is_valid());
    }
}

#[test]
fn type_mismatches_name_both_kinds() {
    let result = validate(&root("= boolean"), &text("true"));
    assert_eq!(
        result.error_messages(),
        vec!["expected boolean; text found".to_string()]
    );

    let result = validate(&root("= { a: text }"), &Value::Array(vec![]));
    assert_eq!(
        result.error_messages(),
        vec!["expected object; array found".to_string()]
    );
}

#[test]
fn given_text_matches_exactly() {
    let schema = root(r#"= "yes""#);
    assert!(validate(&schema, &text("yes")).is_valid());
    let result = validate(&schema, &text("no"));
    assert_eq!(
        result.error_messages(),
        vec!["given text ('yes') not matching: 'no'".to_string()]
    );
}

#[test]
fn regex_matches_the_entire_string() {
    let schema = root(r#"= text [ regex = "[a-z]+" ]"#);
    assert!(validate(&schema, &text("joe")).is_valid());
    // A substring match is not enough.
    let result = validate(&schema, &text("joe99"));
    assert_eq!(
        result.error_messages(),
        vec!["regex ([a-z]+) not matching: 'joe99'".to_string()]
    );
}

#[test]
fn glyph_format_patterns() {
    let schema = root(r####"= text [ pattern = "###-XX" ]"####);
    assert!(validate(&schema, &text("123-ab")).is_valid());
    let result = validate(&schema, &text("123_ab"));
    assert_eq!(
        result.error_messages(),
        vec!["format (###-XX) not matching: '123_ab'".to_string()]
    );
}

#[test]
fn numeric_coercion_accepts_trimmed_decimal_text() {
    let schema = root("= number [ integer, 0 <= value <= 100 ]");
    assert!(validate(&schema, &number("30")).is_valid());
    assert!(validate(&schema, &text("30")).is_valid());
    assert!(validate(&schema, &text(" 30 ")).is_valid());

    let result = validate(&schema, &text("3.14"));
    assert_eq!(
        result.error_messages(),
        vec!["integer constraint not met: 3.14".to_string()]
    );

    let result = validate(&schema, &text("200"));
    assert_eq!(
        result.error_messages(),
        vec!["value constraint (0 <= value <= 100) not met: 200".to_string()]
    );

    let result = validate(&schema, &text("thirty"));
    assert_eq!(
        result.error_messages(),
        vec!["expected number; text found".to_string()]
    );
}

#[test]
fn exclusive_value_bounds() {
    let schema = root("= number [ value > 0 ]");
    assert!(validate(&schema, &number("0.001")).is_valid());
    let result = validate(&schema, &number("0"));
    assert_eq!(
        result.error_messages(),
        vec!["value constraint (value > 0) not met: 0".to_string()]
    );
}

#[test]
fn alternatives_accept_iff_any_option_accepts() {
    let schema = root(r#"= number | "n/a""#);
    let matching = [number("1"), text("n/a"), text("5")];
    for value in matching {
        assert!(validate(&schema, &value).is_valid());
    }
    let result = validate(&schema, &text("none"));
    assert_eq!(
        result.error_messages(),
        vec!["could not match value 'none' with any of the available options".to_string()]
    );
}

#[test]
fn a_successful_alternative_option_keeps_its_warnings() {
    let schema = root("= @deprecated number | text");
    let result = validate(&schema, &number("1"));
    assert!(result.is_valid());
    assert!(result.has_warnings());

    // The second option matches without touching the deprecated one...
    let result = validate(&schema, &text("x"));
    assert!(result.is_valid());
    // ...but the deprecated first option was still probed and rejected,
    // so no warning survives.
    assert!(!result.has_warnings());
}

#[test]
fn object_field_order_does_not_change_the_outcome() {
    let forward = Schema::object([
        (Label::mandatory("a"), root("= number")),
        (Label::mandatory("b"), root("= text")),
    ])
    .unwrap();
    let backward = Schema::object([
        (Label::mandatory("b"), root("= text")),
        (Label::mandatory("a"), root("= number")),
    ])
    .unwrap();
    let value = object(&[("a", number("1")), ("b", text("x"))]);
    let bad = object(&[("a", text("x")), ("b", number("1"))]);
    assert_eq!(
        validate(&forward, &value).is_valid(),
        validate(&backward, &value).is_valid()
    );
    assert_eq!(
        validate(&forward, &bad).is_valid(),
        validate(&backward, &bad).is_valid()
    );
}

#[test]
fn missing_mandatory_fields_with_defaults_are_fine() {
    let schema = root(r#"= { name: text, role: text ?= "guest" }"#);
    assert!(validate(&schema, &object(&[("name", text("Joe"))])).is_valid());

    let schema = root("= { name: text, retries: number ?= 3 }");
    assert!(validate(&schema, &object(&[("name", text("Joe"))])).is_valid());
}

#[test]
fn map_values_all_validate_against_one_schema() {
    let schema = root("= { ...: number }");
    assert!(validate(&schema, &object(&[("a", number("1")), ("b", number("2"))])).is_valid());

    let result = validate(&schema, &object(&[("a", number("1")), ("b", text("x"))]));
    assert_eq!(
        result.error_messages(),
        vec!["expected number; text found (at $.b)".to_string()]
    );
}

#[test]
fn tuples_zip_align_and_report_length_differences() {
    let schema = root("= (number, text)");
    assert!(validate(&schema, &Value::Tuple(vec![number("1"), text("x")])).is_valid());
    // Arrays are accepted in tuple position.
    assert!(validate(&schema, &Value::Array(vec![number("1"), text("x")])).is_valid());

    let result = validate(&schema, &Value::Tuple(vec![number("1")]));
    assert_eq!(
        result.error_messages(),
        vec!["expected tuple of 2 items; 1 found".to_string()]
    );

    let result = validate(&schema, &Value::Tuple(vec![text("x"), text("y"), text("z")]));
    assert_eq!(
        result.error_messages(),
        vec![
            "expected tuple of 2 items; 3 found".to_string(),
            "expected number; text found (at $[0])".to_string(),
        ]
    );
}

#[test]
fn list_errors_carry_item_paths() {
    let schema = root("= { id: text }*");
    let value = Value::Array(vec![
        object(&[("id", text("1"))]),
        object(&[("id", number("2"))]),
    ]);
    let result = validate(&schema, &value);
    assert_eq!(
        result.error_messages(),
        vec!["expected text; number found (at $[1].id)".to_string()]
    );
}

#[test]
fn simple_uniqueness_compares_structurally() {
    let schema = root("= number* [ unique ]");
    assert!(validate(
        &schema,
        &Value::Array(vec![number("1"), number("2")])
    )
    .is_valid());

    let result = validate(
        &schema,
        &Value::Array(vec![number("1"), number("2"), number("1.0")]),
    );
    assert_eq!(
        result.error_messages(),
        vec!["unique constraint not met: 1.0 (at $[2])".to_string()]
    );
}

#[test]
fn multiple_unique_clauses_hold_independently() {
    let schema = root("= { id: text, region: text }* [ unique = id, unique = region ]");
    let value = Value::Array(vec![
        object(&[("id", text("1")), ("region", text("eu"))]),
        object(&[("id", text("2")), ("region", text("eu"))]),
    ]);
    let result = validate(&schema, &value);
    assert_eq!(
        result.error_messages(),
        vec!["unique constraint (region) not met: 'eu' (at $[1])".to_string()]
    );
}

#[test]
fn deprecated_fields_warn_once_per_use() {
    let schema = root("= { @deprecated old: text, new: number }");
    let result = validate(
        &schema,
        &object(&[("old", text("x")), ("new", number("42"))]),
    );
    assert!(result.is_valid());
    assert_eq!(result.kind(), ResultKind::WithWarnings);
    assert_eq!(
        result.warning_messages(),
        vec!["deprecated element used (at $.old)".to_string()]
    );

    // An absent deprecated field produces no warning.
    let result = validate(&schema, &object(&[("new", number("42"))]));
    assert!(!result.has_warnings());
    // The missing mandatory field is still an error, though.
    assert!(!result.is_valid());
}

#[test]
fn errors_accumulate_in_pre_order() {
    let schema = root("= { a: number, b: { c: boolean } }");
    let value = object(&[
        ("a", text("x")),
        ("b", object(&[("c", number("1"))])),
    ]);
    let result = validate(&schema, &value);
    assert_eq!(
        result.error_messages(),
        vec![
            "expected number; text found (at $.a)".to_string(),
            "expected boolean; number found (at $.b.c)".to_string(),
        ]
    );
}

#[test]
fn unresolved_references_are_validation_errors() {
    let schema = Schema::named_ref("ghost");
    let result = validate(&schema, &text("x"));
    assert_eq!(
        result.error_messages(),
        vec!["unresolved reference `ghost`".to_string()]
    );
}

#[test]
fn binary_without_an_encoding_measures_utf8_bytes() {
    let schema = root("= binary [ bytes == 5 ]");
    assert!(validate(&schema, &text("hello")).is_valid());
    assert!(!validate(&schema, &text("hi")).is_valid());
}

#[test]
fn hex_and_base32_encodings() {
    let schema = root("= binary [ encoding = 'hex', bytes == 2 ]");
    assert!(validate(&schema, &text("BEEF")).is_valid());
    assert!(validate(&schema, &text("beef")).is_valid());
    assert!(!validate(&schema, &text("xyz")).is_valid());

    let schema = root("= binary [ encoding = 'base32' ]");
    assert!(validate(&schema, &text("MZXW6===")).is_valid());
}

#[test]
fn time_formats_validate_text() {
    let schema = root("= time [ format = 'iso8601-date' ]");
    assert!(validate(&schema, &text("2024-02-29")).is_valid());
    let result = validate(&schema, &text("29/02/2024"));
    assert_eq!(
        result.error_messages(),
        vec!["format (iso8601-date) not matching: '29/02/2024'".to_string()]
    );

    let schema = root(r#"= time [ format = "%d/%m/%Y" ]"#);
    assert!(validate(&schema, &text("29/02/2024")).is_valid());
}

#[test]
fn validation_is_deterministic() {
    let schema = root("= { a: number, b: text* [ unique ] }");
    let value = object(&[
        ("a", text("nope")),
        ("b", Value::Array(vec![text("x"), text("x")])),
    ]);
    let first = validate(&schema, &value);
    let second = validate(&schema, &value);
    assert_eq!(first, second);
}

#[test]
fn empty_objects_allow_extra_keys() {
    let schema = root("= {}");
    let mut entries = IndexMap::new();
    entries.insert("anything".to_string(), Value::Null);
    assert!(validate(&schema, &Value::Object(entries)).is_valid());
}
