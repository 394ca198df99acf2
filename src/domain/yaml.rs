//! YAML mapping parsing shared by override loading and output validation.

use serde_yaml::{Mapping, Value};

/// Parse a document whose top level must be a mapping.
///
/// Blank and comment-only documents are an empty mapping.
pub fn parse_mapping(text: &str) -> Result<Mapping, String> {
    if is_blank(text) {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string())? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map),
        other => Err(format!("expected a mapping at the top level, found {}", kind_of(&other))),
    }
}

/// Serialize a mapping, keeping insertion order.
pub fn to_string(mapping: &Mapping) -> Result<String, String> {
    serde_yaml::to_string(mapping).map_err(|e| e.to_string())
}

fn is_blank(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
