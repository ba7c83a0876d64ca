//! CSV reader. The header row names the object fields; every record
//! becomes an object, the document an array of records.

use indexmap::IndexMap;

use super::{scalar, ReadError};
use crate::values::Value;

pub fn parse(input: &str) -> Result<Value, ReadError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut fields = IndexMap::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            fields.insert(header.clone(), scalar(field));
        }
        rows.push(Value::Object(fields));
    }
    Ok(Value::Array(rows))
}
