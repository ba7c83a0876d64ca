//! Constraint checks for the scalar schema variants.

use std::str::FromStr;

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use data_encoding::{BASE32, BASE64, HEXLOWER_PERMISSIVE};
use regex::Regex;
use rengbis_schema::{
    BinaryConstraints, BinaryEncoding, NumericConstraints, TextConstraints, TimeFormat,
};
use rust_decimal::Decimal;

use super::Walker;
use crate::values::Value;

pub(super) fn check_text(walker: &mut Walker, constraints: &TextConstraints, text: &str) {
    if let Some(size) = &constraints.size {
        let length = text.chars().count() as u64;
        if !size.contains(&length) {
            walker.error(format!(
                "length constraint ({}) not met: {length}",
                size.describe("length")
            ));
        }
    }
    if let Some(pattern) = &constraints.regex {
        // Full-match semantics; the model validated the pattern at
        // construction time.
        match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(regex) if regex.is_match(text) => {}
            _ => walker.error(format!("regex ({pattern}) not matching: '{text}'")),
        }
    }
    if let Some(glyphs) = &constraints.format {
        if !glyphs_match(glyphs, text) {
            walker.error(format!("format ({glyphs}) not matching: '{text}'"));
        }
    }
}

/// `#` digit, `X` letter, `@` alphanumeric, `*` any single character,
/// everything else must match literally. The whole string is consumed.
fn glyphs_match(pattern: &str, text: &str) -> bool {
    let mut characters = text.chars();
    for glyph in pattern.chars() {
        let Some(character) = characters.next() else {
            return false;
        };
        let matched = match glyph {
            '#' => character.is_ascii_digit(),
            'X' => character.is_alphabetic(),
            '@' => character.is_alphanumeric(),
            '*' => true,
            literal => character == literal,
        };
        if !matched {
            return false;
        }
    }
    characters.next().is_none()
}

/// Numbers, or decimal-looking text (trimmed) coerced to a number. The
/// `integer` and range constraints apply to coerced text as well.
pub(super) fn check_numeric(walker: &mut Walker, constraints: &NumericConstraints, value: &Value) {
    let number = match value {
        Value::Number(number) => *number,
        Value::Text(text) => match Decimal::from_str(text.trim()) {
            Ok(number) => number,
            Err(_) => {
                walker.type_error("number", value);
                return;
            }
        },
        other => {
            walker.type_error("number", other);
            return;
        }
    };
    if constraints.integer && !number.fract().is_zero() {
        walker.error(format!("integer constraint not met: {number}"));
    }
    if let Some(range) = &constraints.value {
        if !range.contains(&number) {
            walker.error(format!(
                "value constraint ({}) not met: {number}",
                range.describe("value")
            ));
        }
    }
}

pub(super) fn check_binary(walker: &mut Walker, constraints: &BinaryConstraints, text: &str) {
    let byte_count = match &constraints.encoding {
        Some(encoding) => match decoded_len(*encoding, text) {
            Some(count) => count,
            None => {
                walker.error(format!("encoding ({encoding}) not matching: '{text}'"));
                return;
            }
        },
        None => text.len() as u64,
    };
    if let Some(size) = &constraints.size {
        if !size.contains(&byte_count) {
            walker.error(format!(
                "bytes constraint ({}) not met: {byte_count}",
                size.describe("bytes")
            ));
        }
    }
}

fn decoded_len(encoding: BinaryEncoding, text: &str) -> Option<u64> {
    let decoded = match encoding {
        BinaryEncoding::Base64 => BASE64.decode(text.as_bytes()),
        BinaryEncoding::Base32 => BASE32.decode(text.as_bytes()),
        BinaryEncoding::Hex => HEXLOWER_PERMISSIVE.decode(text.as_bytes()),
    };
    decoded.ok().map(|bytes| bytes.len() as u64)
}

pub(super) fn check_time(walker: &mut Walker, format: &TimeFormat, text: &str) {
    if !time_matches(format, text) {
        walker.error(format!(
            "format ({}) not matching: '{text}'",
            format.label()
        ));
    }
}

fn time_matches(format: &TimeFormat, text: &str) -> bool {
    match format {
        TimeFormat::Rfc3339 => DateTime::parse_from_rfc3339(text).is_ok(),
        TimeFormat::Iso8601 => {
            DateTime::parse_from_rfc3339(text).is_ok()
                || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        }
        TimeFormat::Iso8601Date => NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok(),
        TimeFormat::Iso8601Time => NaiveTime::parse_from_str(text, "%H:%M:%S%.f").is_ok(),
        TimeFormat::Custom(pattern) => {
            // Matching the template is enough; the fields need not
            // assemble into a complete date or time.
            let mut parsed = Parsed::new();
            parse(&mut parsed, text, StrftimeItems::new(pattern)).is_ok()
        }
    }
}
