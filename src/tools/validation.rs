//! Validate tool call arguments against JSON Schema before execution.

/// Validate tool arguments against a JSON Schema.
///
/// Performs top-level validation: schema type check, required field presence,
/// and property type verification. All missing required fields are reported
/// together. Numeric strings satisfy `integer`/`number` since local models
/// routinely quote numbers.
pub fn validate_arguments(
    args: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), String> {
    if schema.get("type").and_then(|v| v.as_str()) == Some("object") && !args.is_object() {
        return Err(format!(
            "expected object arguments, got {}",
            json_type_name(args)
        ));
    }

    let Some(obj) = args.as_object() else {
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
        let missing: Vec<&str> = required
            .iter()
            .filter_map(|field| field.as_str())
            .filter(|name| obj.get(*name).map_or(true, |v| v.is_null()))
            .collect();
        if !missing.is_empty() {
            let names = missing
                .iter()
                .map(|name| format!("'{name}'"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(format!("missing required field(s) {names}"));
        }
    }

    if let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) {
        for (key, value) in obj {
            let Some(expected) = properties.get(key).and_then(|p| p.get("type")) else {
                continue;
            };
            let allowed: Vec<&str> = match expected {
                serde_json::Value::String(t) => vec![t.as_str()],
                serde_json::Value::Array(ts) => ts.iter().filter_map(|t| t.as_str()).collect(),
                _ => continue,
            };
            if !allowed.iter().any(|t| value_matches_type(value, t)) {
                return Err(format!(
                    "field '{}' expected type '{}', got {}",
                    key,
                    allowed.join("|"),
                    json_type_name(value)
                ));
            }
        }
    }

    Ok(())
}

fn value_matches_type(value: &serde_json::Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number() || numeric_string(value, |s| s.parse::<f64>().is_ok()),
        "integer" => {
            value.is_i64() || value.is_u64() || numeric_string(value, |s| s.parse::<i64>().is_ok())
        }
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn numeric_string(value: &serde_json::Value, parses: impl Fn(&str) -> bool) -> bool {
    value.as_str().is_some_and(|s| parses(s.trim()))
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "origin": { "type": "string" },
                "destination": { "type": "string" },
                "guest_count": { "type": ["string", "integer"] },
            },
            "required": ["origin", "destination", "guest_count"],
        })
    }

    #[test]
    fn rejects_non_object_args_when_schema_expects_object() {
        let err = validate_arguments(&json!("not an object"), &state_schema()).unwrap_err();
        assert!(err.contains("expected object"));
    }

    #[test]
    fn reports_every_missing_required_field() {
        let err = validate_arguments(&json!({ "origin": "Buenos Aires" }), &state_schema())
            .unwrap_err();
        assert_eq!(err, "missing required field(s) 'destination', 'guest_count'");
    }

    #[test]
    fn null_counts_as_missing() {
        let args = json!({ "origin": "A", "destination": null, "guest_count": 3 });
        let err = validate_arguments(&args, &state_schema()).unwrap_err();
        assert!(err.contains("'destination'"));
    }

    #[test]
    fn union_types_accept_either_member() {
        let schema = state_schema();
        let base = json!({ "origin": "A", "destination": "B" });
        for guests in [json!(100), json!("100")] {
            let mut args = base.clone();
            args["guest_count"] = guests;
            assert!(validate_arguments(&args, &schema).is_ok());
        }
    }

    #[test]
    fn rejects_field_with_wrong_type() {
        let schema = json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"],
        });
        let err = validate_arguments(&json!({ "query": 42 }), &schema).unwrap_err();
        assert!(err.contains("field 'query'"));
        assert!(err.contains("expected type 'string'"));
    }

    #[test]
    fn numeric_strings_satisfy_integer() {
        let schema = json!({
            "type": "object",
            "properties": { "passengers": { "type": "integer" } },
        });
        assert!(validate_arguments(&json!({ "passengers": "12" }), &schema).is_ok());
        assert!(validate_arguments(&json!({ "passengers": "twelve" }), &schema).is_err());
    }

    #[test]
    fn accepts_extra_fields_and_empty_schema() {
        assert!(validate_arguments(&json!({ "anything": 1 }), &json!({})).is_ok());
        assert!(validate_arguments(&serde_json::Value::Null, &json!({})).is_ok());
    }
}
