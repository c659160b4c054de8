//! Fallible accessors over generic JSON documents.
//!
//! Every extraction failure becomes [`Error::SchemaValidation`] carrying the
//! dotted descriptor path, so a malformed document never panics. A key that is
//! present with a `null` value is treated the same as a missing key.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub type Object = Map<String, Value>;

pub fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Object> {
    value
        .as_object()
        .ok_or_else(|| Error::schema(path, format!("expected an object, found {}", kind_of(value))))
}

pub fn required_str<'a>(object: &'a Object, key: &str, path: &str) -> Result<&'a str> {
    optional_str(object, key, path)?
        .ok_or_else(|| Error::schema(path, format!("missing required string '{}'", key)))
}

pub fn optional_str<'a>(object: &'a Object, key: &str, path: &str) -> Result<Option<&'a str>> {
    match present(object, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(mismatch(path, key, "a string", other)),
    }
}

pub fn optional_bool(object: &Object, key: &str, path: &str) -> Result<Option<bool>> {
    match present(object, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(mismatch(path, key, "a boolean", other)),
    }
}

pub fn optional_object<'a>(
    object: &'a Object,
    key: &str,
    path: &str,
) -> Result<Option<&'a Object>> {
    match present(object, key) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(mismatch(path, key, "an object", other)),
    }
}

pub fn optional_array<'a>(
    object: &'a Object,
    key: &str,
    path: &str,
) -> Result<Option<&'a [Value]>> {
    match present(object, key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.as_slice())),
        Some(other) => Err(mismatch(path, key, "an array", other)),
    }
}

pub fn optional_value<'a>(object: &'a Object, key: &str) -> Option<&'a Value> {
    present(object, key)
}

/// Read an array of strings; a missing key yields `None`.
pub fn optional_string_list(object: &Object, key: &str, path: &str) -> Result<Option<Vec<String>>> {
    let Some(items) = optional_array(object, key, path)? else {
        return Ok(None);
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str().map(String::from).ok_or_else(|| {
                Error::schema(
                    format!("{}.{}[{}]", path, key, i),
                    format!("expected a string, found {}", kind_of(item)),
                )
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

pub fn required_string_list(object: &Object, key: &str, path: &str) -> Result<Vec<String>> {
    optional_string_list(object, key, path)?
        .ok_or_else(|| Error::schema(path, format!("missing required array '{}'", key)))
}

fn present<'a>(object: &'a Object, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn mismatch(path: &str, key: &str, expected: &str, found: &Value) -> Error {
    Error::schema(
        path,
        format!("'{}' must be {}, found {}", key, expected, kind_of(found)),
    )
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
