//! Walking a resolved schema against a generic value tree.

mod collection;
mod diagnostics;
mod scalar;

pub use diagnostics::{Diagnostic, ResultKind, ValidationResult};

use rengbis_schema::Schema;

use crate::values::Value;

/// Validate `value` against a fully-resolved `schema`.
///
/// All errors in a subtree are collected; validation does not stop at
/// the first failure, except inside an `Alternative`, which accepts on
/// the first succeeding option. Diagnostics come out in a deterministic
/// pre-order traversal of the schema and value.
pub fn validate(schema: &Schema, value: &Value) -> ValidationResult {
    let mut walker = Walker::new();
    walker.check(schema, value);
    ValidationResult {
        errors: walker.errors,
        warnings: walker.warnings,
    }
}

enum Segment {
    Key(String),
    Index(usize),
}

pub(crate) struct Walker {
    path: Vec<Segment>,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Walker {
    fn new() -> Self {
        Self {
            path: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn path_string(&self) -> String {
        let mut rendered = String::from("$");
        for segment in &self.path {
            match segment {
                Segment::Key(key) => {
                    rendered.push('.');
                    rendered.push_str(key);
                }
                Segment::Index(index) => {
                    rendered.push('[');
                    rendered.push_str(&index.to_string());
                    rendered.push(']');
                }
            }
        }
        rendered
    }

    pub(crate) fn error(&mut self, message: String) {
        self.errors.push(Diagnostic::new(self.path_string(), message));
    }

    pub(crate) fn warn(&mut self, message: String) {
        self.warnings
            .push(Diagnostic::new(self.path_string(), message));
    }

    pub(crate) fn type_error(&mut self, expected: &str, value: &Value) {
        self.error(format!("expected {expected}; {} found", value.kind()));
    }

    pub(crate) fn push_key(&mut self, key: &str) {
        self.path.push(Segment::Key(key.to_string()));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.path.push(Segment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.path.pop();
    }

    pub(crate) fn check(&mut self, schema: &Schema, value: &Value) {
        match schema {
            Schema::Any => {}
            Schema::Fail => self.error(format!("expected nothing; {} found", value.kind())),
            Schema::Boolean { .. } => {
                if !matches!(value, Value::Bool(_)) {
                    self.type_error("boolean", value);
                }
            }
            Schema::Text { constraints, .. } => match value {
                Value::Text(text) => scalar::check_text(self, constraints, text),
                other => self.type_error("text", other),
            },
            Schema::GivenText(expected) => match value {
                Value::Text(text) if text == expected => {}
                Value::Text(text) => {
                    self.error(format!("given text ('{expected}') not matching: '{text}'"));
                }
                other => self.type_error("text", other),
            },
            Schema::Numeric { constraints, .. } => scalar::check_numeric(self, constraints, value),
            Schema::Binary(constraints) => match value {
                Value::Text(text) => scalar::check_binary(self, constraints, text),
                other => self.type_error("binary", other),
            },
            Schema::Time(format) => match value {
                Value::Text(text) => scalar::check_time(self, format, text),
                other => self.type_error("time", other),
            },
            Schema::Enum(values) => match value {
                Value::Text(text) if values.iter().any(|candidate| candidate == text) => {}
                Value::Text(text) => {
                    self.error(format!(
                        "enum type does not include provided value: '{text}'"
                    ));
                }
                other => self.type_error("text", other),
            },
            Schema::List { item, constraints } => match value {
                Value::Array(items) => collection::check_list(self, item, constraints, items),
                other => self.type_error("array", other),
            },
            Schema::Tuple(items) => match value {
                Value::Tuple(values) | Value::Array(values) => {
                    collection::check_tuple(self, items, values);
                }
                other => self.type_error("tuple", other),
            },
            Schema::Alternative(options) => self.check_alternative(options, value),
            Schema::Object(fields) => match value {
                Value::Object(entries) => collection::check_object(self, fields, entries),
                other => self.type_error("object", other),
            },
            Schema::Map(value_schema) => match value {
                Value::Object(entries) => collection::check_map(self, value_schema, entries),
                other => self.type_error("object", other),
            },
            Schema::Documented { inner, .. } => self.check(inner, value),
            Schema::Deprecated(inner) => {
                self.warn("deprecated element used".to_string());
                self.check(inner, value);
            }
            Schema::NamedRef(_) | Schema::ScopedRef { .. } => {
                let key = schema
                    .dependencies()
                    .iter()
                    .map(|reference| reference.key())
                    .next()
                    .unwrap_or_default();
                self.error(format!("unresolved reference `{key}`"));
            }
        }
    }

    /// First succeeding option wins; its warnings are kept. When none
    /// succeeds, a single error reports the value.
    fn check_alternative(&mut self, options: &[Schema], value: &Value) {
        for option in options {
            let mut probe = Walker {
                path: std::mem::take(&mut self.path),
                errors: Vec::new(),
                warnings: Vec::new(),
            };
            probe.check(option, value);
            self.path = probe.path;
            if probe.errors.is_empty() {
                self.warnings.extend(probe.warnings);
                return;
            }
        }
        self.error(format!(
            "could not match value {value} with any of the available options"
        ));
    }
}
