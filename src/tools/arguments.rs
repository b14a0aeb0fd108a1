//! Typed access to tool call arguments.

use crate::error::ConciergeError;

/// Wrapper around tool call arguments providing typed extraction.
///
/// Small local models often send arguments as a JSON-encoded string and
/// mix up numbers and numeric strings; the accessors tolerate both.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => parse_stringified(&raw),
            other => other,
        };
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, ConciergeError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| missing("string", key))
    }

    /// Get a scalar argument rendered as text (strings, numbers, booleans).
    pub fn get_text(&self, key: &str) -> Result<String, ConciergeError> {
        match self.value.get(key) {
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(v @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => {
                Ok(v.to_string())
            }
            _ => Err(missing("text", key)),
        }
    }
}

fn parse_stringified(raw: &str) -> serde_json::Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return serde_json::json!({});
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn missing(kind: &str, key: &str) -> ConciergeError {
    ConciergeError::InvalidArgument(format!("Missing {kind} argument: {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stringified_object_is_unwrapped() {
        let args = ToolArguments::new(json!(r#"{"query":"risotto"}"#));
        assert_eq!(args.get_str("query").unwrap(), "risotto");
    }

    #[test]
    fn empty_string_becomes_empty_object() {
        let args = ToolArguments::new(json!(""));
        assert!(args.raw().as_object().is_some_and(|o| o.is_empty()));
    }

    #[test]
    fn get_text_accepts_numbers_and_strings() {
        let args = ToolArguments::new(json!({"a": 100, "b": "100", "c": null}));
        assert_eq!(args.get_text("a").unwrap(), "100");
        assert_eq!(args.get_text("b").unwrap(), "100");
        assert!(args.get_text("c").is_err());
    }
}
