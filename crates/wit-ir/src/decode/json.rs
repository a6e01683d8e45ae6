use serde_json::Value;
use std::fmt;

use super::DecodeError;

/// A dotted path into the source JSON document, built up as the builder
/// descends, so every error can point at exactly where it went wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(String);

impl Path {
    pub fn root() -> Self {
        Path(String::from("$"))
    }

    pub fn field(&self, name: &str) -> Path {
        Path(format!("{}.{name}", self.0))
    }

    pub fn index(&self, i: usize) -> Path {
        Path(format!("{}[{i}]", self.0))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn unexpected(path: &Path, message: impl Into<String>) -> DecodeError {
    DecodeError::UnexpectedToken {
        path: path.clone(),
        message: message.into(),
    }
}

pub fn as_object<'a>(v: &'a Value, path: &Path) -> Result<&'a serde_json::Map<String, Value>, DecodeError> {
    v.as_object()
        .ok_or_else(|| unexpected(path, format!("expected a JSON object, found {}", kind(v))))
}

pub fn as_array<'a>(v: &'a Value, path: &Path) -> Result<&'a Vec<Value>, DecodeError> {
    v.as_array()
        .ok_or_else(|| unexpected(path, format!("expected a JSON array, found {}", kind(v))))
}

pub fn as_str<'a>(v: &'a Value, path: &Path) -> Result<&'a str, DecodeError> {
    v.as_str()
        .ok_or_else(|| unexpected(path, format!("expected a JSON string, found {}", kind(v))))
}

pub fn as_index(v: &Value, path: &Path) -> Result<usize, DecodeError> {
    v.as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| unexpected(path, format!("expected a non-negative integer index, found {}", kind(v))))
}

pub fn field<'a>(obj: &'a serde_json::Map<String, Value>, path: &Path, key: &str) -> Result<&'a Value, DecodeError> {
    obj.get(key)
        .ok_or_else(|| unexpected(path, format!("missing required field `{key}`")))
}

pub fn opt_field<'a>(obj: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
