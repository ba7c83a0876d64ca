//! YAML reader, on the YAML 1.2 core schema: only `true` and `false`
//! are booleans, so `yes` and `no` stay text.

use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_yaml::Value as Yaml;

use super::ReadError;
use crate::values::Value;

pub fn parse(input: &str) -> Result<Value, ReadError> {
    let parsed: Yaml = serde_yaml::from_str(input)?;
    convert(&parsed)
}

fn convert(value: &Yaml) -> Result<Value, ReadError> {
    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(value) => Value::Bool(*value),
        Yaml::Number(number) => {
            let text = number.to_string();
            let number = Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| ReadError::Number(text))?;
            Value::Number(number)
        }
        Yaml::String(text) => Value::Text(text.clone()),
        Yaml::Sequence(items) => Value::Array(
            items
                .iter()
                .map(convert)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| Ok((key_string(key)?, convert(value)?)))
                .collect::<Result<IndexMap<_, _>, ReadError>>()?,
        ),
        Yaml::Tagged(tagged) => convert(&tagged.value)?,
    })
}

fn key_string(key: &Yaml) -> Result<String, ReadError> {
    match key {
        Yaml::String(text) => Ok(text.clone()),
        Yaml::Number(number) => Ok(number.to_string()),
        Yaml::Bool(value) => Ok(value.to_string()),
        _ => Err(ReadError::YamlKey),
    }
}
