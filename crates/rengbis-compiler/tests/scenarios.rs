//! End-to-end scenarios: schema source in, document text in, verdict
//! out.

use pretty_assertions::assert_eq;
use rengbis_compiler::{parse_document, readers, validate, SchemaBundle, Schema};
use rengbis_schema::{Bound, ListConstraints, SizeRange, TextConstraints};

fn root(source: &str) -> Schema {
    SchemaBundle::from_source(source)
        .unwrap()
        .root
        .expect("a root schema")
}

#[test]
fn parsing_base_types_and_list_suffixes() {
    assert_eq!(root("= number"), Schema::number(Default::default(), None));
    assert_eq!(
        root("= number*"),
        Schema::list(
            Schema::number(Default::default(), None),
            ListConstraints::default()
        )
    );
    assert_eq!(
        root("= number+"),
        Schema::list(
            Schema::number(Default::default(), None),
            ListConstraints::at_least_one()
        )
    );
}

#[test]
fn text_length_ranges_against_json() {
    let schema = root("= text [ 10 <= length <= 100 ]");

    let value = readers::json::parse(r#""Joe Clipperz""#).unwrap();
    assert!(validate(&schema, &value).is_valid());

    let value = readers::json::parse(r#""Joe""#).unwrap();
    let result = validate(&schema, &value);
    assert!(!result.is_valid());
    assert!(result.error_messages()[0].starts_with("length constraint"));
    assert_eq!(
        result.error_messages(),
        vec!["length constraint (10 <= length <= 100) not met: 3".to_string()]
    );
}

#[test]
fn objects_with_optional_fields_against_json() {
    let schema = root("= { name: text, age?: number }");

    let value = readers::json::parse(r#"{"name": "John"}"#).unwrap();
    assert!(validate(&schema, &value).is_valid());

    // Extra keys are permitted.
    let value =
        readers::json::parse(r#"{"name": "John", "age": 30, "hobbies": ["x"]}"#).unwrap();
    assert!(validate(&schema, &value).is_valid());

    let value = readers::json::parse("{}").unwrap();
    let result = validate(&schema, &value);
    assert_eq!(
        result.error_messages(),
        vec!["Value is missing expected key name".to_string()]
    );
}

#[test]
fn enums_against_yaml() {
    let schema = root(r#"= "yes" | "no""#);

    for document in ["yes", "no"] {
        let value = readers::yaml::parse(document).unwrap();
        assert!(validate(&schema, &value).is_valid());
    }

    let value = readers::yaml::parse("maybe").unwrap();
    let result = validate(&schema, &value);
    assert_eq!(
        result.error_messages(),
        vec!["enum type does not include provided value: 'maybe'".to_string()]
    );
}

#[test]
fn binary_encoding_with_decoded_size() {
    let schema = root("= binary [ encoding = 'base64', bytes == 11 ]");

    // "Hello World" is 11 bytes once decoded.
    let value = readers::json::parse(r#""SGVsbG8gV29ybGQ=""#).unwrap();
    assert!(validate(&schema, &value).is_valid());

    // "Hello" is only 5.
    let value = readers::json::parse(r#""SGVsbG8=""#).unwrap();
    let result = validate(&schema, &value);
    assert_eq!(
        result.error_messages(),
        vec!["bytes constraint (11) not met: 5".to_string()]
    );

    let value = readers::json::parse(r#""not base64!""#).unwrap();
    let result = validate(&schema, &value);
    assert_eq!(
        result.error_messages(),
        vec!["encoding (base64) not matching: 'not base64!'".to_string()]
    );
}

#[test]
fn list_uniqueness_by_field() {
    let schema = root("= { id: text, name: text }* [ unique = id ]");

    let value = readers::json::parse(
        r#"[{"id": "1", "name": "A"}, {"id": "2", "name": "A"}]"#,
    )
    .unwrap();
    assert!(validate(&schema, &value).is_valid());

    let value = readers::json::parse(
        r#"[{"id": "1", "name": "A"}, {"id": "1", "name": "B"}]"#,
    )
    .unwrap();
    let result = validate(&schema, &value);
    assert!(!result.is_valid());
    assert!(result.error_messages()[0].starts_with("unique constraint (id) not met"));
}

#[test]
fn named_values_resolve_without_leftover_references() {
    let bundle = SchemaBundle::from_source("foo = number*\n= foo").unwrap();
    let root = bundle.root.expect("a root schema");
    assert_eq!(
        root,
        Schema::list(
            Schema::number(Default::default(), None),
            ListConstraints::default()
        )
    );
    assert!(root.dependencies().is_empty());
}

#[test]
fn deprecated_field_use_warns_but_stays_valid() {
    let schema = root("= { @deprecated old: text, new: number }");
    let value = readers::json::parse(r#"{"old": "x", "new": 42}"#).unwrap();
    let result = validate(&schema, &value);
    assert!(result.is_valid());
    assert!(result.has_warnings());
}

#[test]
fn print_round_trip_for_a_constrained_text() {
    let schema = Schema::text(
        TextConstraints {
            size: Some(
                SizeRange::new(Some(Bound::Inclusive(10)), Some(Bound::Inclusive(100))).unwrap(),
            ),
            regex: Some("^[a-z]+$".into()),
            format: None,
        },
        None,
    )
    .unwrap();

    let printed = format!("= {}", schema.to_source());
    let reparsed = parse_document(&printed).unwrap().root.expect("a root schema");
    assert_eq!(reparsed, schema);
}

#[test]
fn csv_records_validate_as_a_list_of_objects() {
    let schema = root("= { id: number [ integer ], name: text }* [ unique = id ]");
    let value = readers::csv::parse("id,name\n1,Joe\n2,Ann\n").unwrap();
    assert!(validate(&schema, &value).is_valid());

    let value = readers::csv::parse("id,name\n1,Joe\n1,Ann\n").unwrap();
    assert!(!validate(&schema, &value).is_valid());
}

#[test]
fn xml_documents_validate_through_the_same_tree() {
    let schema = root("= { name: text, tag?: text* }");
    let value =
        readers::xml::parse("<person><name>Joe</name><tag>a</tag><tag>b</tag></person>").unwrap();
    assert!(validate(&schema, &value).is_valid());
}
