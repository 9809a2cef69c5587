//! Argument validation against tool input schemas.
//!
//! Every tool call is checked against the tool's declared JSON Schema before
//! its handler runs, so handlers can assume required arguments exist and have
//! the declared type. Only the subset of JSON Schema the tool schemas actually
//! use is supported: object root, property types, `required`, `enum`, and
//! integer bounds.

use serde_json::Value;

use crate::sources::SourceError;

/// Validate `args` against `schema`. Returns the first violation found.
pub fn validate_args(args: &Value, schema: &Value) -> Result<(), SourceError> {
    let properties = match schema.get("properties").and_then(|p| p.as_object()) {
        Some(p) => p,
        None => return Ok(()),
    };

    if !args.is_object() && !args.is_null() {
        return Err(SourceError::InvalidParameter(
            "arguments must be an object".to_string(),
        ));
    }

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for key in required.iter().filter_map(|k| k.as_str()) {
            if args.get(key).map(|v| !v.is_null()).unwrap_or(false) {
                continue;
            }
            return Err(SourceError::InvalidParameter(format!(
                "missing required argument '{}'",
                key
            )));
        }
    }

    let empty = serde_json::Map::new();
    for (key, value) in args.as_object().unwrap_or(&empty) {
        let spec = match properties.get(key) {
            Some(spec) => spec,
            None => {
                return Err(SourceError::InvalidParameter(format!(
                    "unknown argument '{}'",
                    key
                )))
            }
        };
        if value.is_null() {
            continue;
        }
        check_property(key, value, spec)?;
    }

    Ok(())
}

fn check_property(key: &str, value: &Value, spec: &Value) -> Result<(), SourceError> {
    if let Some(expected) = spec.get("type").and_then(|t| t.as_str()) {
        let matches = match expected {
            "string" => value.is_string(),
            "integer" => value.is_i64() || value.is_u64(),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            "array" => value.is_array(),
            _ => true,
        };
        if !matches {
            return Err(SourceError::InvalidParameter(format!(
                "argument '{}' must be of type {}",
                key, expected
            )));
        }
    }

    if let Some(allowed) = spec.get("enum").and_then(|e| e.as_array()) {
        if !allowed.contains(value) {
            let options: Vec<String> = allowed.iter().map(render_option).collect();
            return Err(SourceError::InvalidParameter(format!(
                "argument '{}' must be one of: {}",
                key,
                options.join(", ")
            )));
        }
    }

    if let Some(n) = value.as_i64() {
        if let Some(min) = spec.get("minimum").and_then(|m| m.as_i64()) {
            if n < min {
                return Err(SourceError::InvalidParameter(format!(
                    "argument '{}' must be at least {}",
                    key, min
                )));
            }
        }
        if let Some(max) = spec.get("maximum").and_then(|m| m.as_i64()) {
            if n > max {
                return Err(SourceError::InvalidParameter(format!(
                    "argument '{}' must be at most {}",
                    key, max
                )));
            }
        }
    }

    Ok(())
}

fn render_option(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "year": {"type": "integer", "minimum": 1950},
                "session": {"type": "string", "enum": ["qualifying", "sprint", "race"]},
                "round": {"type": "string"},
                "filters": {"type": "object"}
            },
            "required": ["year"]
        })
    }

    #[test]
    fn test_valid_args_pass() {
        let args = json!({"year": 2024, "session": "race", "round": "7"});
        assert!(validate_args(&args, &schema()).is_ok());
    }

    #[test]
    fn test_missing_required() {
        let err = validate_args(&json!({"round": "7"}), &schema()).unwrap_err();
        assert!(err.to_string().contains("year"));
    }

    #[test]
    fn test_wrong_type() {
        let err = validate_args(&json!({"year": "2024"}), &schema()).unwrap_err();
        assert!(matches!(err, SourceError::InvalidParameter(_)));
    }

    #[test]
    fn test_enum_violation() {
        let args = json!({"year": 2024, "session": "practice_1"});
        let err = validate_args(&args, &schema()).unwrap_err();
        assert!(err.to_string().contains("must be one of"));
    }

    #[test]
    fn test_minimum_bound() {
        let err = validate_args(&json!({"year": 1800}), &schema()).unwrap_err();
        assert!(err.to_string().contains("at least 1950"));
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let args = json!({"year": 2024, "bogus": true});
        let err = validate_args(&args, &schema()).unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_null_optional_is_ignored() {
        let args = json!({"year": 2024, "round": null});
        assert!(validate_args(&args, &schema()).is_ok());
    }
}
