use std::fs;

use pretty_assertions::assert_eq;
use rengbis_compiler::{LoadError, SchemaBundle, Schema};
use rengbis_schema::ListConstraints;

#[test]
fn named_values_resolve_into_the_root() {
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
fn forward_references_resolve_by_iteration() {
    let bundle = SchemaBundle::from_source("a = b*\nb = number\n= a").unwrap();
    assert_eq!(
        bundle.root,
        Some(Schema::list(
            Schema::number(Default::default(), None),
            ListConstraints::default()
        ))
    );
    for schema in bundle.definitions.values() {
        assert!(schema.dependencies().is_empty());
    }
}

#[test]
fn duplicate_definitions_are_rejected() {
    let error = SchemaBundle::from_source("a = number\na = text").unwrap_err();
    assert!(matches!(
        error,
        LoadError::DuplicateDefinition { name } if name == "a"
    ));
}

#[test]
fn unknown_names_are_unresolved_references() {
    let error = SchemaBundle::from_source("a = ghost*\n= a").unwrap_err();
    let LoadError::UnresolvedReferences { names } = error else {
        panic!("expected unresolved references");
    };
    assert_eq!(names, vec!["ghost".to_string()]);
}

#[test]
fn an_unknown_root_reference_is_unresolved_too() {
    let error = SchemaBundle::from_source("= ghost").unwrap_err();
    assert!(matches!(error, LoadError::UnresolvedReferences { .. }));
}

#[test]
fn definition_cycles_are_detected() {
    let error = SchemaBundle::from_source("a = b*\nb = a*").unwrap_err();
    let LoadError::CycleDetected { mut names } = error else {
        panic!("expected a cycle");
    };
    names.sort();
    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);

    let error = SchemaBundle::from_source("node = node*").unwrap_err();
    assert!(matches!(error, LoadError::CycleDetected { .. }));
}

#[test]
fn imports_namespace_definitions_and_roots() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("base.rengbis"),
        "uuid = text [ pattern = \"@@@@@@@@\" ]\n= uuid\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("main.rengbis"),
        "base => import \"base.rengbis\"\nuser = { id: base.uuid, fallback: base }\n= user*\n",
    )
    .unwrap();

    let bundle = SchemaBundle::load(dir.path().join("main.rengbis")).unwrap();
    assert!(bundle.definitions.contains_key("base"));
    assert!(bundle.definitions.contains_key("base.uuid"));
    assert!(bundle.definitions.contains_key("user"));
    let root = bundle.root.expect("a root schema");
    assert!(root.dependencies().is_empty());
}

#[test]
fn diamond_imports_load_the_shared_file_once() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("shared.rengbis"), "id = text\n").unwrap();
    fs::write(
        dir.path().join("left.rengbis"),
        "shared => import \"shared.rengbis\"\nrecord = { id: shared.id }\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("right.rengbis"),
        "shared => import \"shared.rengbis\"\nentry = shared.id*\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("main.rengbis"),
        "left => import \"left.rengbis\"\nright => import \"right.rengbis\"\n= (left.record, right.entry)\n",
    )
    .unwrap();

    let bundle = SchemaBundle::load(dir.path().join("main.rengbis")).unwrap();
    assert!(bundle.definitions.contains_key("left.shared.id"));
    assert!(bundle.definitions.contains_key("right.shared.id"));
    assert!(bundle.root.is_some());
}

#[test]
fn import_cycles_are_detected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.rengbis"),
        "b => import \"b.rengbis\"\nx = b.y\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("b.rengbis"),
        "a => import \"a.rengbis\"\ny = a.x\n",
    )
    .unwrap();

    let error = SchemaBundle::load(dir.path().join("a.rengbis")).unwrap_err();
    assert!(matches!(error, LoadError::CycleDetected { .. }));
}

#[test]
fn missing_import_targets_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("main.rengbis"),
        "ghost => import \"ghost.rengbis\"\n= any\n",
    )
    .unwrap();

    let error = SchemaBundle::load(dir.path().join("main.rengbis")).unwrap_err();
    assert!(matches!(
        error,
        LoadError::ImportNotFound { namespace, .. } if namespace == "ghost"
    ));
}

#[test]
fn source_text_cannot_import() {
    let error = SchemaBundle::from_source("x => import \"x.rengbis\"\n= any").unwrap_err();
    assert!(matches!(error, LoadError::ImportNotFound { .. }));
}

#[test]
fn source_text_with_a_base_directory_can_import() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("base.rengbis"), "uuid = text\n").unwrap();

    let bundle = SchemaBundle::from_source_in(
        "base => import \"base.rengbis\"\n= base.uuid\n",
        dir.path(),
    )
    .unwrap();
    assert_eq!(
        bundle.root,
        Some(Schema::text(Default::default(), None).unwrap())
    );
}
