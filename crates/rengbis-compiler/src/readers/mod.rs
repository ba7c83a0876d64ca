//! Format readers: each parses one document format into the generic
//! [`Value`](crate::Value) tree.
//!
//! The shared contract: a scalar that is unambiguously a number maps to
//! `Number` (keeping its exact decimal value); everything else textual
//! maps to `Text`.

pub mod csv;
pub mod json;
pub mod text;
pub mod xml;
pub mod yaml;

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::values::Value;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("number `{0}` is not representable")]
    Number(String),
    #[error("YAML mapping keys must be scalars")]
    YamlKey,
}

/// Map a bare scalar: unambiguously numeric text becomes `Number`, the
/// rest stays `Text`.
pub(crate) fn scalar(raw: &str) -> Value {
    if looks_numeric(raw) {
        if let Ok(number) = Decimal::from_str(raw) {
            return Value::Number(number);
        }
    }
    Value::Text(raw.to_string())
}

fn looks_numeric(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() {
        return false;
    }
    let mut seen_dot = false;
    for (position, character) in digits.char_indices() {
        match character {
            '0'..='9' => {}
            '.' if !seen_dot && position > 0 && position < digits.len() - 1 => {
                seen_dot = true;
            }
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numeric_detection() {
        assert_eq!(scalar("30"), Value::Number(30.into()));
        assert_eq!(scalar("-0.5"), Value::Number("-0.5".parse().unwrap()));
        assert_eq!(scalar("1.2.3"), Value::Text("1.2.3".to_string()));
        assert_eq!(scalar("30 "), Value::Text("30 ".to_string()));
        assert_eq!(scalar(""), Value::Text(String::new()));
        assert_eq!(scalar("-"), Value::Text("-".to_string()));
        assert_eq!(scalar(".5"), Value::Text(".5".to_string()));
    }
}
