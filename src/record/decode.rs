//! JSON and JSONL decoding of records.

use crate::record::{Record, Value};
use anyhow::{bail, Context, Result};
use std::io::BufRead;

/// Convert a JSON object into a record.
///
/// `null` fields are dropped so they read as absent. Nested arrays and
/// objects are kept as their compact JSON text.
pub fn record_from_json(json: serde_json::Value) -> Result<Record> {
    let object = match json {
        serde_json::Value::Object(object) => object,
        other => bail!("Expected JSON object, found {}", json_kind(&other)),
    };

    let mut record = Record::new();
    for (field, value) in object {
        let value = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => match n.as_f64() {
                    Some(f) => Value::Float(f),
                    None => bail!("Number out of range in field '{}'", field),
                },
            },
            serde_json::Value::String(s) => Value::String(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::String(nested.to_string())
            }
        };
        record.insert(field, value);
    }

    Ok(record)
}

/// Convert a record back into a JSON object
pub fn record_to_json(record: &Record) -> serde_json::Value {
    let object = record
        .iter()
        .map(|(field, value)| {
            let json = match value {
                Value::Boolean(b) => serde_json::Value::Bool(*b),
                Value::Integer(i) => serde_json::Value::from(*i),
                Value::Float(f) => serde_json::Value::from(*f),
                Value::String(s) => serde_json::Value::String(s.clone()),
            };
            (field.clone(), json)
        })
        .collect();
    serde_json::Value::Object(object)
}

/// Read one record per line from a JSONL stream, skipping blank lines
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_number))?;
        if line.trim().is_empty() {
            continue;
        }

        let json: serde_json::Value = serde_json::from_str(&line)
            .with_context(|| format!("Invalid JSON on line {}", line_number))?;
        let record = record_from_json(json)
            .with_context(|| format!("Invalid record on line {}", line_number))?;
        records.push(record);
    }

    log::debug!("decoded {} records", records.len());
    Ok(records)
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
