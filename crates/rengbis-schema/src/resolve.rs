//! Free-reference extraction and reference substitution.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::Schema;

/// A free reference inside a schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Reference {
    /// `NamedRef` to a definition in the same file.
    Named(String),
    /// `ScopedRef` into an imported namespace; an empty name addresses
    /// the imported file's root.
    Scoped { namespace: String, name: String },
}

impl Reference {
    /// The key under which a combined definition table stores the
    /// referent: `name`, `namespace.name`, or `namespace` alone for an
    /// imported root.
    pub fn key(&self) -> String {
        match self {
            Reference::Named(name) => name.clone(),
            Reference::Scoped { namespace, name } if name.is_empty() => namespace.clone(),
            Reference::Scoped { namespace, name } => format!("{namespace}.{name}"),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Substituting the named definitions would expand forever.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cyclic definitions: {}", .names.join(" -> "))]
pub struct CycleError {
    pub names: Vec<String>,
}

impl Schema {
    /// The free references of this schema, in pre-order.
    pub fn dependencies(&self) -> IndexSet<Reference> {
        let mut references = IndexSet::new();
        self.collect_dependencies(&mut references);
        references
    }

    fn collect_dependencies(&self, references: &mut IndexSet<Reference>) {
        match self {
            Schema::NamedRef(name) => {
                references.insert(Reference::Named(name.clone()));
            }
            Schema::ScopedRef { namespace, name } => {
                references.insert(Reference::Scoped {
                    namespace: namespace.clone(),
                    name: name.clone(),
                });
            }
            Schema::List { item, .. } => item.collect_dependencies(references),
            Schema::Tuple(items) | Schema::Alternative(items) => {
                for item in items {
                    item.collect_dependencies(references);
                }
            }
            Schema::Object(fields) => {
                for schema in fields.values() {
                    schema.collect_dependencies(references);
                }
            }
            Schema::Map(value) => value.collect_dependencies(references),
            Schema::Documented { inner, .. } | Schema::Deprecated(inner) => {
                inner.collect_dependencies(references)
            }
            Schema::Any
            | Schema::Fail
            | Schema::Boolean { .. }
            | Schema::Text { .. }
            | Schema::GivenText(_)
            | Schema::Numeric { .. }
            | Schema::Binary(_)
            | Schema::Time(_)
            | Schema::Enum(_) => {}
        }
    }

    /// Expand every reference with an entry in `table`, recursively, so
    /// that the result is free of every name the table knows. Unknown
    /// references are preserved. Structure-preserving and idempotent;
    /// fails when a table entry reaches itself again.
    pub fn substitute(&self, table: &IndexMap<String, Schema>) -> Result<Schema, CycleError> {
        self.substitute_inner(table, &mut Vec::new())
    }

    fn substitute_inner(
        &self,
        table: &IndexMap<String, Schema>,
        in_flight: &mut Vec<String>,
    ) -> Result<Schema, CycleError> {
        Ok(match self {
            Schema::NamedRef(name) => return expand(self, name, table, in_flight),
            Schema::ScopedRef { namespace, name } => {
                let key = if name.is_empty() {
                    namespace.clone()
                } else {
                    format!("{namespace}.{name}")
                };
                return expand(self, &key, table, in_flight);
            }
            Schema::List { item, constraints } => Schema::List {
                item: Box::new(item.substitute_inner(table, in_flight)?),
                constraints: constraints.clone(),
            },
            Schema::Tuple(items) => Schema::Tuple(
                items
                    .iter()
                    .map(|item| item.substitute_inner(table, in_flight))
                    .collect::<Result<_, _>>()?,
            ),
            Schema::Alternative(options) => Schema::Alternative(
                options
                    .iter()
                    .map(|option| option.substitute_inner(table, in_flight))
                    .collect::<Result<_, _>>()?,
            ),
            Schema::Object(fields) => Schema::Object(
                fields
                    .iter()
                    .map(|(label, schema)| {
                        Ok((label.clone(), schema.substitute_inner(table, in_flight)?))
                    })
                    .collect::<Result<IndexMap<_, _>, CycleError>>()?,
            ),
            Schema::Map(value) => {
                Schema::Map(Box::new(value.substitute_inner(table, in_flight)?))
            }
            Schema::Documented { doc, inner } => Schema::Documented {
                doc: doc.clone(),
                inner: Box::new(inner.substitute_inner(table, in_flight)?),
            },
            Schema::Deprecated(inner) => {
                Schema::Deprecated(Box::new(inner.substitute_inner(table, in_flight)?))
            }
            leaf => leaf.clone(),
        })
    }
}

fn expand(
    reference: &Schema,
    key: &str,
    table: &IndexMap<String, Schema>,
    in_flight: &mut Vec<String>,
) -> Result<Schema, CycleError> {
    let Some(definition) = table.get(key) else {
        return Ok(reference.clone());
    };
    if in_flight.iter().any(|name| name == key) {
        let mut names = in_flight.clone();
        names.push(key.to_string());
        return Err(CycleError { names });
    }
    in_flight.push(key.to_string());
    let expanded = definition.substitute_inner(table, in_flight);
    in_flight.pop();
    expanded
}
