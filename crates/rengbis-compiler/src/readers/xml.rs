//! XML reader. Element children become object fields keyed by tag
//! name, repeated siblings collect into an array under that name,
//! attributes become fields, and mixed content lands under `_text`.

use indexmap::IndexMap;

use super::{scalar, ReadError};
use crate::values::Value;

pub fn parse(input: &str) -> Result<Value, ReadError> {
    let document = roxmltree::Document::parse(input)?;
    Ok(element_value(document.root_element()))
}

fn element_value(node: roxmltree::Node<'_, '_>) -> Value {
    let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();
    for attribute in node.attributes() {
        groups
            .entry(attribute.name().to_string())
            .or_default()
            .push(scalar(attribute.value()));
    }

    let mut content = String::new();
    for child in node.children() {
        if child.is_element() {
            groups
                .entry(child.tag_name().name().to_string())
                .or_default()
                .push(element_value(child));
        } else if let Some(text) = child.text() {
            content.push_str(text);
        }
    }
    let content = content.trim();

    // A leaf element is just its scalar content.
    if groups.is_empty() {
        return scalar(content);
    }

    let mut fields: IndexMap<String, Value> = groups
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                values.pop().expect("one value")
            } else {
                Value::Array(values)
            };
            (name, value)
        })
        .collect();
    if !content.is_empty() {
        fields.insert("_text".to_string(), Value::Text(content.to_string()));
    }
    Value::Object(fields)
}
