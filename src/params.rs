//! Per-item parameter resolution.
//!
//! The host's "value of parameter X for item i" capability is abstracted as
//! [`ParameterSource`]; [`Params`] is the typed view the dispatcher reads,
//! falling back to schema defaults for parameters an item did not supply.

use crate::error::{Error, Result};
use crate::schema;
use crate::types::Operation;
use serde::Deserialize;
use serde_json::{Map, Value};

pub trait ParameterSource {
    /// Raw value of `name` for the item at `index`, when one was supplied.
    fn parameter(&self, name: &str, index: usize) -> Option<Value>;
}

/// Node-level parameters plus per-item overrides, as carried by a run request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonParameters {
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub items: Vec<Value>,
}

impl JsonParameters {
    pub fn new(parameters: Map<String, Value>, items: Vec<Value>) -> Self {
        Self { parameters, items }
    }

    /// Number of input items; a run always has at least one.
    pub fn item_count(&self) -> usize {
        self.items.len().max(1)
    }
}

impl ParameterSource for JsonParameters {
    fn parameter(&self, name: &str, index: usize) -> Option<Value> {
        self.items
            .get(index)
            .and_then(|item| item.get(name))
            .or_else(|| self.parameters.get(name))
            .cloned()
    }
}

/// Typed accessor over one item's parameters for a fixed operation.
pub struct Params<'a> {
    source: &'a dyn ParameterSource,
    index: usize,
    operation: Operation,
}

impl<'a> Params<'a> {
    pub fn new(source: &'a dyn ParameterSource, index: usize, operation: Operation) -> Self {
        Self {
            source,
            index,
            operation,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn value(&self, name: &str) -> Result<Value> {
        self.source
            .parameter(name, self.index)
            .or_else(|| schema::default_for(name, &self.operation))
            .ok_or_else(|| {
                Error::Parameter(format!(
                    "Could not get parameter '{}' for {} (item {})",
                    name, self.operation, self.index
                ))
            })
    }

    fn mistyped(&self, name: &str, expected: &str, got: &Value) -> Error {
        Error::Parameter(format!(
            "Parameter '{}' must be {} (item {}), got {}",
            name, expected, self.index, got
        ))
    }

    pub fn string(&self, name: &str) -> Result<String> {
        match self.value(name)? {
            Value::String(s) => Ok(s),
            Value::Null => Ok(String::new()),
            v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
            other => Err(self.mistyped(name, "a string", &other)),
        }
    }

    /// Integer parameter; numeric strings are accepted.
    pub fn integer(&self, name: &str) -> Result<i64> {
        let v = self.value(name)?;
        let parsed = match &v {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.mistyped(name, "an integer", &v))
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.value(name)? {
            Value::Bool(b) => Ok(b),
            Value::String(s) if s == "true" => Ok(true),
            Value::String(s) if s == "false" => Ok(false),
            other => Err(self.mistyped(name, "a boolean", &other)),
        }
    }

    /// Collection parameter; a missing or null value is an empty object.
    pub fn object(&self, name: &str) -> Result<Map<String, Value>> {
        match self.value(name)? {
            Value::Object(m) => Ok(m),
            Value::Null => Ok(Map::new()),
            other => Err(self.mistyped(name, "an object", &other)),
        }
    }

    /// Multi-option parameter: an array of strings, or a comma-separated string.
    pub fn string_array(&self, name: &str) -> Result<Vec<Value>> {
        match self.value(name)? {
            Value::Array(items) => Ok(items),
            Value::String(s) if s.is_empty() => Ok(Vec::new()),
            Value::String(s) => Ok(split_list(&s).into_iter().map(Value::String).collect()),
            other => Err(self.mistyped(name, "a list", &other)),
        }
    }

    /// Comma-separated text parameter; `None` when the text is empty.
    pub fn comma_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        let s = self.string(name)?;
        Ok((!s.is_empty()).then(|| split_list(&s)))
    }
}

/// Split on `,` and trim each entry. Empty entries are kept.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(|part| part.trim().to_string()).collect()
}
