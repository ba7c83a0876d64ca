//! JSON reader. Numbers are parsed with arbitrary precision so their
//! exact decimal value is preserved for numeric validation.

use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;

use super::ReadError;
use crate::values::Value;

pub fn parse(input: &str) -> Result<Value, ReadError> {
    let parsed: serde_json::Value = serde_json::from_str(input)?;
    convert(&parsed)
}

fn convert(value: &serde_json::Value) -> Result<Value, ReadError> {
    Ok(match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(value) => Value::Bool(*value),
        serde_json::Value::Number(number) => Value::Number(decimal(number)?),
        serde_json::Value::String(text) => Value::Text(text.clone()),
        serde_json::Value::Array(items) => Value::Array(
            items
                .iter()
                .map(convert)
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| Ok((key.clone(), convert(value)?)))
                .collect::<Result<IndexMap<_, _>, ReadError>>()?,
        ),
    })
}

fn decimal(number: &serde_json::Number) -> Result<Decimal, ReadError> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ReadError::Number(text))
}
