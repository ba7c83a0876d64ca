//! Checks for lists, tuples, objects and maps.

use indexmap::IndexMap;
use rengbis_schema::{Label, ListConstraints, Schema, Uniqueness};

use super::Walker;
use crate::values::Value;

pub(super) fn check_list(
    walker: &mut Walker,
    item: &Schema,
    constraints: &ListConstraints,
    values: &[Value],
) {
    if let Some(size) = &constraints.size {
        let length = values.len() as u64;
        if !size.contains(&length) {
            walker.error(format!(
                "size constraint ({}) not met: {length}",
                size.describe("size")
            ));
        }
    }
    for (index, value) in values.iter().enumerate() {
        walker.push_index(index);
        walker.check(item, value);
        walker.pop();
    }
    for uniqueness in &constraints.unique {
        match uniqueness {
            Uniqueness::Simple => check_simple_uniqueness(walker, values),
            Uniqueness::ByFields(fields) => check_field_uniqueness(walker, fields, values),
        }
    }
}

fn check_simple_uniqueness(walker: &mut Walker, values: &[Value]) {
    for (index, value) in values.iter().enumerate() {
        if values[..index].contains(value) {
            walker.push_index(index);
            walker.error(format!("unique constraint not met: {value}"));
            walker.pop();
        }
    }
}

/// Items that are not objects are skipped here; the item schema already
/// reports them.
fn check_field_uniqueness(walker: &mut Walker, fields: &[String], values: &[Value]) {
    let keys: Vec<Option<Vec<Option<&Value>>>> = values
        .iter()
        .map(|value| match value {
            Value::Object(entries) => {
                Some(fields.iter().map(|field| entries.get(field)).collect())
            }
            _ => None,
        })
        .collect();
    for (index, key) in keys.iter().enumerate() {
        let Some(key) = key else { continue };
        if keys[..index].iter().any(|seen| seen.as_ref() == Some(key)) {
            walker.push_index(index);
            walker.error(format!(
                "unique constraint ({}) not met: {}",
                fields.join(", "),
                render_key(key)
            ));
            walker.pop();
        }
    }
}

fn render_key(key: &[Option<&Value>]) -> String {
    key.iter()
        .map(|value| match value {
            Some(value) => value.to_string(),
            None => "absent".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Zip-aligned: the shared prefix is validated item by item, and any
/// length difference is one error.
pub(super) fn check_tuple(walker: &mut Walker, schemas: &[Schema], values: &[Value]) {
    if schemas.len() != values.len() {
        walker.error(format!(
            "expected tuple of {} items; {} found",
            schemas.len(),
            values.len()
        ));
    }
    for (index, (schema, value)) in schemas.iter().zip(values).enumerate() {
        walker.push_index(index);
        walker.check(schema, value);
        walker.pop();
    }
}

/// Extra keys in the value are permitted; a missing mandatory field is
/// an error unless the field schema carries a default.
pub(super) fn check_object(
    walker: &mut Walker,
    fields: &IndexMap<Label, Schema>,
    entries: &IndexMap<String, Value>,
) {
    for (label, field_schema) in fields {
        match entries.get(label.name()) {
            Some(value) => {
                walker.push_key(label.name());
                walker.check(field_schema, value);
                walker.pop();
            }
            None if label.is_optional() => {}
            None if field_schema.has_default() => {}
            None => {
                walker.error(format!("Value is missing expected key {}", label.name()));
            }
        }
    }
}

pub(super) fn check_map(
    walker: &mut Walker,
    value_schema: &Schema,
    entries: &IndexMap<String, Value>,
) {
    for (key, value) in entries {
        walker.push_key(key);
        walker.check(value_schema, value);
        walker.pop();
    }
}
