//! Raw text reader: the whole document as one `Text` scalar, minus a
//! single trailing newline.

use super::ReadError;
use crate::values::Value;

pub fn parse(input: &str) -> Result<Value, ReadError> {
    let content = input.strip_suffix('\n').unwrap_or(input);
    Ok(Value::Text(content.to_string()))
}
