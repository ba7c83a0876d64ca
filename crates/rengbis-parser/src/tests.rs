//! Round-trip tests: the canonical printer and the parser are two sides
//! of the same grammar.

use pretty_assertions::assert_eq;
use rengbis_schema::{
    BinaryConstraints, BinaryEncoding, Bound, Label, ListConstraints, NumericConstraints, Schema,
    SizeRange, TextConstraints, TimeFormat, Uniqueness, ValueRange,
};

use crate::{parse_document, Definition, Document};

fn reparsed(schema: &Schema) -> Schema {
    let document = Document {
        definitions: Vec::new(),
        root: Some(schema.clone()),
    };
    let source = document.to_source();
    parse_document(&source)
        .unwrap_or_else(|error| panic!("printed schema failed to parse: {error}\n{source}"))
        .root
        .expect("a root schema")
}

#[track_caller]
fn assert_round_trips(schema: Schema) {
    assert_eq!(reparsed(&schema), schema);
}

#[test]
fn scalars_round_trip() {
    assert_round_trips(Schema::Any);
    assert_round_trips(Schema::Fail);
    assert_round_trips(Schema::boolean(Some(false)));
    assert_round_trips(Schema::given("a \"quoted\" value\nwith a newline"));
    assert_round_trips(Schema::number(Default::default(), Some("-12.50".parse().unwrap())));
    assert_round_trips(Schema::enumeration(vec!["yes".into(), "no".into()]).unwrap());
}

#[test]
fn constrained_scalars_round_trip() {
    assert_round_trips(
        Schema::text(
            TextConstraints {
                size: Some(
                    SizeRange::new(Some(Bound::Inclusive(10)), Some(Bound::Exclusive(100)))
                        .unwrap(),
                ),
                regex: Some("^[a-z]+$".into()),
                format: Some("###-XX".into()),
            },
            Some("fallback".into()),
        )
        .unwrap(),
    );
    assert_round_trips(Schema::number(
        NumericConstraints {
            value: Some(ValueRange::new(
                Some(Bound::Exclusive("-1.5".parse().unwrap())),
                None,
            )
            .unwrap()),
            integer: true,
        },
        None,
    ));
    assert_round_trips(Schema::binary(BinaryConstraints {
        encoding: Some(BinaryEncoding::Hex),
        size: Some(SizeRange::exact(16)),
    }));
    assert_round_trips(Schema::time(TimeFormat::Iso8601Date).unwrap());
    assert_round_trips(Schema::time(TimeFormat::Custom("%d/%m/%Y".into())).unwrap());
}

#[test]
fn composites_round_trip() {
    let object = Schema::object([
        (
            Label::mandatory("name"),
            Schema::text(Default::default(), None).unwrap(),
        ),
        (
            Label::optional("age"),
            Schema::number(
                NumericConstraints {
                    integer: true,
                    value: None,
                },
                None,
            ),
        ),
        (
            Label::mandatory("tags"),
            Schema::list(
                Schema::text(Default::default(), None).unwrap(),
                ListConstraints {
                    size: Some(SizeRange::at_least(1)),
                    unique: vec![Uniqueness::Simple],
                },
            ),
        ),
    ])
    .unwrap();
    assert_round_trips(object.clone());
    assert_round_trips(Schema::map(object.clone()));
    assert_round_trips(Schema::tuple(vec![object, Schema::Any]).unwrap());
    assert_round_trips(
        Schema::alternative(vec![
            Schema::number(Default::default(), None),
            Schema::given("n/a"),
        ])
        .unwrap(),
    );
    assert_round_trips(Schema::list(
        Schema::alternative(vec![
            Schema::number(Default::default(), None),
            Schema::text(Default::default(), None).unwrap(),
        ])
        .unwrap(),
        ListConstraints::default(),
    ));
}

#[test]
fn annotations_round_trip() {
    assert_round_trips(Schema::documented(
        "multi-line\ndocumentation",
        Schema::object([(
            Label::mandatory("id"),
            Schema::documented(
                "identifier",
                Schema::deprecated(Schema::text(Default::default(), None).unwrap()),
            ),
        )])
        .unwrap(),
    ));
    assert_round_trips(
        Schema::alternative(vec![
            Schema::documented("first option", Schema::number(Default::default(), None)),
            Schema::deprecated(Schema::text(Default::default(), None).unwrap()),
        ])
        .unwrap(),
    );
}

#[test]
fn annotations_next_to_closing_delimiters_round_trip() {
    // A doc comment runs to the end of its line; none of these may
    // swallow the `)`, `}` or `*` that follows.
    assert_round_trips(Schema::list(
        Schema::documented("per-item note", Schema::number(Default::default(), None)),
        ListConstraints::default(),
    ));
    assert_round_trips(Schema::list(
        Schema::documented(
            "per-item note",
            Schema::deprecated(Schema::number(Default::default(), None)),
        ),
        ListConstraints::default(),
    ));
    assert_round_trips(
        Schema::tuple(vec![
            Schema::documented("first", Schema::number(Default::default(), None)),
            Schema::documented("second", Schema::given("x")),
        ])
        .unwrap(),
    );
    assert_round_trips(Schema::map(Schema::documented(
        "value note",
        Schema::boolean(None),
    )));
}

#[test]
fn references_round_trip() {
    assert_round_trips(Schema::named_ref("user"));
    assert_round_trips(Schema::scoped_ref("base", "uuid"));
}

#[test]
fn documents_round_trip() {
    let document = Document {
        definitions: vec![
            Definition::Import {
                namespace: "base".to_string(),
                path: "types/base.rengbis".to_string(),
            },
            Definition::Named {
                name: "user".to_string(),
                schema: Schema::documented(
                    "a user record",
                    Schema::object([
                        (Label::mandatory("id"), Schema::scoped_ref("base", "uuid")),
                        (
                            Label::mandatory("name"),
                            Schema::text(Default::default(), None).unwrap(),
                        ),
                    ])
                    .unwrap(),
                ),
            },
            Definition::Named {
                name: "legacy".to_string(),
                schema: Schema::deprecated(Schema::named_ref("user")),
            },
        ],
        root: Some(Schema::list(
            Schema::named_ref("user"),
            ListConstraints::default(),
        )),
    };
    let printed = document.to_source();
    assert_eq!(parse_document(&printed).unwrap(), document);
}

#[test]
fn printing_is_idempotent() {
    let source = "= { name: text [ 1 <= length <= 64 ], age?: number [ integer ] }";
    let first = parse_document(source).unwrap();
    let second = parse_document(&first.to_source()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_source(), second.to_source());
}
