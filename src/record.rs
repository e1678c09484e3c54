//! Record layer for filter evaluation.
//!
//! Records are schemaless rows produced upstream from session log files:
//!
//! - **Value**: a string, integer, float or boolean field value
//! - **Record**: a field-name to value map, never mutated by the engine
//! - **decode**: conversion of JSON objects and JSONL streams into records

pub mod decode;
pub mod value;

use std::collections::BTreeMap;

pub use decode::{read_records, record_from_json, record_to_json};
pub use value::{DataType, Value};

/// A single schemaless row keyed by field name
pub type Record = BTreeMap<String, Value>;
