//! The schema tree and its invariant-enforcing constructors.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::constraints::{
    strftime_pattern_is_valid, BinaryConstraints, ListConstraints, NumericConstraints,
    TextConstraints, TimeFormat,
};

/// An immutable tree describing the permitted shape of a value.
///
/// Equality is structural; object field order never affects comparison.
/// Variants that carry invariants are built through the fallible
/// constructors below, which is also how the parser builds them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Schema {
    /// Accepts anything.
    Any,
    /// Accepts nothing.
    Fail,
    Boolean {
        default: Option<bool>,
    },
    Text {
        constraints: TextConstraints,
        default: Option<String>,
    },
    /// Accepts exactly one string.
    GivenText(String),
    Numeric {
        constraints: NumericConstraints,
        default: Option<Decimal>,
    },
    Binary(BinaryConstraints),
    Time(TimeFormat),
    /// A closed set of permitted strings, at least one, all distinct.
    Enum(Vec<String>),
    List {
        item: Box<Schema>,
        constraints: ListConstraints,
    },
    /// Fixed-length heterogeneous sequence, at least two items.
    Tuple(Vec<Schema>),
    /// Accepted when any option accepts; at least two options.
    Alternative(Vec<Schema>),
    /// Field labels are unique by name.
    Object(IndexMap<Label, Schema>),
    /// Arbitrary string keys, one schema for every value.
    Map(Box<Schema>),
    /// Attaches a doc comment; transparent to validation.
    Documented {
        doc: String,
        inner: Box<Schema>,
    },
    /// Use of the inner schema produces a warning.
    Deprecated(Box<Schema>),
    /// Reference to a named definition in the same file.
    NamedRef(String),
    /// Reference into an imported namespace; an empty name addresses the
    /// imported file's root.
    ScopedRef {
        namespace: String,
        name: String,
    },
}

/// A rejected construction: which model invariant the input violated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSchema {
    #[error("a tuple needs at least two items, got {0}")]
    TupleArity(usize),
    #[error("an alternative needs at least two options, got {0}")]
    AlternativeArity(usize),
    #[error("an enum needs at least one value")]
    EmptyEnum,
    #[error("enum value \"{0}\" is listed more than once")]
    DuplicateEnumValue(String),
    #[error("object field `{0}` is defined more than once")]
    DuplicateLabel(String),
    #[error("invalid regex: {0}")]
    Regex(String),
    #[error("invalid time pattern \"{0}\"")]
    TimePattern(String),
    #[error("empty range: no value satisfies {min} as minimum and {max} as maximum")]
    EmptyRange { min: String, max: String },
}

impl Schema {
    pub fn boolean(default: Option<bool>) -> Self {
        Schema::Boolean { default }
    }

    /// Fails when the regex constraint is not a valid regular expression.
    pub fn text(
        constraints: TextConstraints,
        default: Option<String>,
    ) -> Result<Self, InvalidSchema> {
        if let Some(pattern) = &constraints.regex {
            regex::Regex::new(pattern)
                .map_err(|error| InvalidSchema::Regex(error.to_string()))?;
        }
        Ok(Schema::Text {
            constraints,
            default,
        })
    }

    pub fn given(literal: impl Into<String>) -> Self {
        Schema::GivenText(literal.into())
    }

    pub fn number(constraints: NumericConstraints, default: Option<Decimal>) -> Self {
        Schema::Numeric {
            constraints,
            default,
        }
    }

    pub fn binary(constraints: BinaryConstraints) -> Self {
        Schema::Binary(constraints)
    }

    /// Fails when a custom template is not valid strftime syntax.
    pub fn time(format: TimeFormat) -> Result<Self, InvalidSchema> {
        if let TimeFormat::Custom(pattern) = &format {
            if !strftime_pattern_is_valid(pattern) {
                return Err(InvalidSchema::TimePattern(pattern.clone()));
            }
        }
        Ok(Schema::Time(format))
    }

    pub fn enumeration(values: Vec<String>) -> Result<Self, InvalidSchema> {
        if values.is_empty() {
            return Err(InvalidSchema::EmptyEnum);
        }
        for (position, value) in values.iter().enumerate() {
            if values[..position].contains(value) {
                return Err(InvalidSchema::DuplicateEnumValue(value.clone()));
            }
        }
        Ok(Schema::Enum(values))
    }

    pub fn list(item: Schema, constraints: ListConstraints) -> Self {
        Schema::List {
            item: Box::new(item),
            constraints,
        }
    }

    pub fn tuple(items: Vec<Schema>) -> Result<Self, InvalidSchema> {
        if items.len() < 2 {
            return Err(InvalidSchema::TupleArity(items.len()));
        }
        Ok(Schema::Tuple(items))
    }

    pub fn alternative(options: Vec<Schema>) -> Result<Self, InvalidSchema> {
        if options.len() < 2 {
            return Err(InvalidSchema::AlternativeArity(options.len()));
        }
        Ok(Schema::Alternative(options))
    }

    pub fn object(
        fields: impl IntoIterator<Item = (Label, Schema)>,
    ) -> Result<Self, InvalidSchema> {
        let mut map = IndexMap::new();
        for (label, schema) in fields {
            let name = label.name().to_string();
            if map.insert(label, schema).is_some() {
                return Err(InvalidSchema::DuplicateLabel(name));
            }
        }
        Ok(Schema::Object(map))
    }

    pub fn map(value: Schema) -> Self {
        Schema::Map(Box::new(value))
    }

    pub fn named_ref(name: impl Into<String>) -> Self {
        Schema::NamedRef(name.into())
    }

    pub fn scoped_ref(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Schema::ScopedRef {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Attach a doc comment. Documenting an already documented schema
    /// prepends to the existing doc, so `Documented` never nests.
    pub fn documented(doc: impl Into<String>, inner: Schema) -> Self {
        let doc = doc.into();
        match inner {
            Schema::Documented {
                doc: existing,
                inner,
            } => Schema::Documented {
                doc: format!("{doc}\n{existing}"),
                inner,
            },
            other => Schema::Documented {
                doc,
                inner: Box::new(other),
            },
        }
    }

    /// Mark as deprecated. `Documented` stays the outermost wrapper:
    /// deprecating a documented schema moves the deprecation inside.
    pub fn deprecated(inner: Schema) -> Self {
        match inner {
            Schema::Documented { doc, inner } => Schema::Documented {
                doc,
                inner: Box::new(Schema::deprecated(*inner)),
            },
            already @ Schema::Deprecated(_) => already,
            other => Schema::Deprecated(Box::new(other)),
        }
    }

    /// Whether a value for this schema can be defaulted when absent.
    /// Looks through annotations.
    pub fn has_default(&self) -> bool {
        match self {
            Schema::Boolean { default } => default.is_some(),
            Schema::Text { default, .. } => default.is_some(),
            Schema::Numeric { default, .. } => default.is_some(),
            Schema::Documented { inner, .. } | Schema::Deprecated(inner) => inner.has_default(),
            _ => false,
        }
    }

    /// Peel `Documented`/`Deprecated` wrappers: the attached doc (if
    /// any), whether the schema is deprecated, and the underlying
    /// schema.
    pub fn split_annotations(&self) -> (Option<&str>, bool, &Schema) {
        match self {
            Schema::Documented { doc, inner } => {
                let (_, deprecated, base) = inner.split_annotations();
                (Some(doc), deprecated, base)
            }
            Schema::Deprecated(inner) => {
                let (doc, _, base) = inner.split_annotations();
                (doc, true, base)
            }
            other => (None, false, other),
        }
    }

}

/// A field label. Two labels are equal when their names are equal;
/// optionality does not participate in comparison or hashing, so an
/// object cannot hold a mandatory and an optional field of the same
/// name.
#[derive(Clone, Debug)]
pub struct Label {
    name: String,
    optional: bool,
}

impl Label {
    pub fn mandatory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

// Lets object fields be looked up by bare name.
impl std::borrow::Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.name
    }
}
