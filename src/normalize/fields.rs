//! Typed field extraction from loosely shaped JSON objects
//!
//! Missing keys and `null` map to `None`. Scalars are coerced where the
//! intent is unambiguous (GTFS-RT JSON writes 64-bit integers as strings);
//! structural mismatches fail the whole snapshot.

use crate::error::{Error, Result};
use crate::types::{FeedKind, JsonObject};
use serde_json::Value;

/// A JSON object (or an absent one) with a path for error messages
#[derive(Debug, Clone)]
pub(crate) struct Scope<'a> {
    obj: Option<&'a JsonObject>,
    kind: FeedKind,
    path: String,
}

impl<'a> Scope<'a> {
    /// Wrap a value that must be an object
    pub(crate) fn root(value: &'a Value, kind: FeedKind, path: &str) -> Result<Self> {
        match value {
            Value::Object(obj) => Ok(Self {
                obj: Some(obj),
                kind,
                path: path.to_string(),
            }),
            other => Err(Error::normalization(
                kind,
                format!("{path}: expected object, found {}", type_name(other)),
            )),
        }
    }

    /// Wrap a value that reads as an empty object unless it is one
    pub(crate) fn lenient(value: &'a Value, kind: FeedKind, path: &str) -> Self {
        Self {
            obj: value.as_object(),
            kind,
            path: path.to_string(),
        }
    }

    /// Whether the key holds a non-null value
    pub(crate) fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Nested object; absent or `null` gives an empty scope
    pub(crate) fn child(&self, key: &str) -> Result<Scope<'a>> {
        let path = self.path_of(key);
        match self.get(key) {
            None => Ok(Scope {
                obj: None,
                kind: self.kind,
                path,
            }),
            Some(Value::Object(obj)) => Ok(Scope {
                obj: Some(obj),
                kind: self.kind,
                path,
            }),
            Some(other) => Err(self.mismatch(&path, "object", other)),
        }
    }

    /// Nested object; anything that is not an object gives an empty scope
    pub(crate) fn child_or_empty(&self, key: &str) -> Scope<'a> {
        Scope {
            obj: self.get(key).and_then(Value::as_object),
            kind: self.kind,
            path: self.path_of(key),
        }
    }

    /// Text field; numbers and booleans are rendered
    pub(crate) fn text(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(self.mismatch(&self.path_of(key), "text", other)),
        }
    }

    /// Text field treating `""` as absent
    pub(crate) fn non_empty_text(&self, key: &str) -> Result<Option<String>> {
        Ok(self.text(key)?.filter(|s| !s.is_empty()))
    }

    /// Integer field; accepts integral floats and numeric strings
    pub(crate) fn int(&self, key: &str) -> Result<Option<i64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let path = self.path_of(key);
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Some(i));
                }
                match n.as_f64() {
                    #[allow(clippy::cast_precision_loss)]
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                    _ => Err(self.mismatch(&path, "integer", value)),
                }
            }
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| self.mismatch(&path, "integer", value)),
            other => Err(self.mismatch(&path, "integer", other)),
        }
    }

    /// Float field; accepts numeric strings
    pub(crate) fn float(&self, key: &str) -> Result<Option<f64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let path = self.path_of(key);
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.mismatch(&path, "number", value)),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.mismatch(&path, "number", value)),
            other => Err(self.mismatch(&path, "number", other)),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.obj?.get(key).filter(|v| !v.is_null())
    }

    fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn mismatch(&self, path: &str, expected: &str, found: &Value) -> Error {
        Error::normalization(
            self.kind,
            format!("{path}: expected {expected}, found {}", type_name(found)),
        )
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
