//! Constraint value objects attached to schema variants.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use rust_decimal::Decimal;

use crate::schema::InvalidSchema;

/// One endpoint of a [`Range`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound<T> {
    Inclusive(T),
    Exclusive(T),
}

impl<T> Bound<T> {
    pub fn value(&self) -> &T {
        match self {
            Bound::Inclusive(value) | Bound::Exclusive(value) => value,
        }
    }

    pub fn is_inclusive(&self) -> bool {
        matches!(self, Bound::Inclusive(_))
    }
}

/// An interval with optional endpoints; an absent endpoint is
/// unconstrained.
///
/// The surface `== N` form is stored as two inclusive endpoints on the
/// same value and prints back as `==`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Range<T> {
    min: Option<Bound<T>>,
    max: Option<Bound<T>>,
}

/// Sizes: text length in characters, list length, decoded byte count.
pub type SizeRange = Range<u64>;

/// Numeric value bounds, over arbitrary-precision decimals.
pub type ValueRange = Range<Decimal>;

impl<T: PartialOrd + fmt::Display> Range<T> {
    /// Build a range, rejecting empty intervals: with both endpoints
    /// present, `min < max` must hold, or `min <= max` when both are
    /// inclusive.
    pub fn new(min: Option<Bound<T>>, max: Option<Bound<T>>) -> Result<Self, InvalidSchema> {
        if let (Some(lo), Some(hi)) = (&min, &max) {
            let closed = lo.is_inclusive() && hi.is_inclusive();
            let ordered = if closed {
                lo.value() <= hi.value()
            } else {
                lo.value() < hi.value()
            };
            if !ordered {
                return Err(InvalidSchema::EmptyRange {
                    min: lo.value().to_string(),
                    max: hi.value().to_string(),
                });
            }
        }
        Ok(Self { min, max })
    }

    pub fn exact(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            min: Some(Bound::Inclusive(value.clone())),
            max: Some(Bound::Inclusive(value)),
        }
    }

    pub fn at_least(value: T) -> Self {
        Self {
            min: Some(Bound::Inclusive(value)),
            max: None,
        }
    }

    pub fn at_most(value: T) -> Self {
        Self {
            min: None,
            max: Some(Bound::Inclusive(value)),
        }
    }

    pub fn min(&self) -> Option<&Bound<T>> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Bound<T>> {
        self.max.as_ref()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// The single admitted value, when both endpoints are inclusive and
    /// equal.
    pub fn as_exact(&self) -> Option<&T> {
        match (&self.min, &self.max) {
            (Some(Bound::Inclusive(lo)), Some(Bound::Inclusive(hi))) if lo == hi => Some(lo),
            _ => None,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        let above_min = match &self.min {
            None => true,
            Some(Bound::Inclusive(lo)) => value >= lo,
            Some(Bound::Exclusive(lo)) => value > lo,
        };
        let below_max = match &self.max {
            None => true,
            Some(Bound::Inclusive(hi)) => value <= hi,
            Some(Bound::Exclusive(hi)) => value < hi,
        };
        above_min && below_max
    }

    /// Surface form of the constraint, e.g. `length == 3`,
    /// `value > 0`, `10 <= length <= 100`.
    pub fn render(&self, subject: &str) -> String {
        if let Some(value) = self.as_exact() {
            return format!("{subject} == {value}");
        }
        match (&self.min, &self.max) {
            (Some(lo), None) => {
                let op = if lo.is_inclusive() { ">=" } else { ">" };
                format!("{subject} {op} {}", lo.value())
            }
            (None, Some(hi)) => {
                let op = if hi.is_inclusive() { "<=" } else { "<" };
                format!("{subject} {op} {}", hi.value())
            }
            (Some(lo), Some(hi)) => {
                let lo_op = if lo.is_inclusive() { "<=" } else { "<" };
                let hi_op = if hi.is_inclusive() { "<=" } else { "<" };
                format!("{} {lo_op} {subject} {hi_op} {}", lo.value(), hi.value())
            }
            (None, None) => subject.to_string(),
        }
    }

    /// Short form for diagnostics: the bare value for `==` constraints,
    /// the full comparison otherwise.
    pub fn describe(&self, subject: &str) -> String {
        match self.as_exact() {
            Some(value) => value.to_string(),
            None => self.render(subject),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextConstraints {
    /// Length in characters.
    pub size: Option<SizeRange>,
    /// Full-match regular expression.
    pub regex: Option<String>,
    /// Glyph pattern: `#` digit, `X` letter, `@` alphanumeric, `*` any
    /// single character, everything else literal.
    pub format: Option<String>,
}

impl TextConstraints {
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.regex.is_none() && self.format.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NumericConstraints {
    pub value: Option<ValueRange>,
    /// Forbids fractional parts; does not constrain representation.
    pub integer: bool,
}

impl NumericConstraints {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && !self.integer
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BinaryConstraints {
    pub encoding: Option<BinaryEncoding>,
    /// Size in bytes, measured after decoding when an encoding is set.
    pub size: Option<SizeRange>,
}

impl BinaryConstraints {
    pub fn is_empty(&self) -> bool {
        self.encoding.is_none() && self.size.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryEncoding {
    Base64,
    Base32,
    Hex,
}

impl BinaryEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryEncoding::Base64 => "base64",
            BinaryEncoding::Base32 => "base32",
            BinaryEncoding::Hex => "hex",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "base64" => Some(BinaryEncoding::Base64),
            "base32" => Some(BinaryEncoding::Base32),
            "hex" => Some(BinaryEncoding::Hex),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListConstraints {
    pub size: Option<SizeRange>,
    /// Every clause must hold independently.
    pub unique: Vec<Uniqueness>,
}

impl ListConstraints {
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.unique.is_empty()
    }

    /// The constraints implied by the `+` list suffix.
    pub fn at_least_one() -> Self {
        Self {
            size: Some(SizeRange::at_least(1)),
            unique: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Uniqueness {
    /// Items compared by structural equality.
    Simple,
    /// Items must be objects; compared by the named fields.
    ByFields(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeFormat {
    Iso8601,
    Iso8601Date,
    Iso8601Time,
    Rfc3339,
    /// A strftime-style template, e.g. `%d/%m/%Y`.
    Custom(String),
}

impl TimeFormat {
    /// The surface name of a named format, or the template of a custom
    /// one.
    pub fn label(&self) -> &str {
        match self {
            TimeFormat::Iso8601 => "iso8601",
            TimeFormat::Iso8601Date => "iso8601-date",
            TimeFormat::Iso8601Time => "iso8601-time",
            TimeFormat::Rfc3339 => "rfc3339",
            TimeFormat::Custom(pattern) => pattern,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "iso8601" => Some(TimeFormat::Iso8601),
            "iso8601-date" => Some(TimeFormat::Iso8601Date),
            "iso8601-time" => Some(TimeFormat::Iso8601Time),
            "rfc3339" => Some(TimeFormat::Rfc3339),
            _ => None,
        }
    }
}

pub(crate) fn strftime_pattern_is_valid(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}
