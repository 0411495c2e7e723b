//! JSON formatting, minifying and validation.
//!
//! Object key order of the input is preserved unless sorting is requested.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use super::{ToolError, ToolResult};

pub const DEFAULT_INDENT: usize = 2;
const MAX_INDENT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Pretty-print `input` with `indent` spaces per level.
pub fn format(input: &str, indent: usize, sort_keys: bool) -> ToolResult<String> {
    if indent > MAX_INDENT {
        return Err(ToolError::InvalidOption(format!(
            "Indent must be between 0 and {MAX_INDENT}"
        )));
    }

    let mut value = parse(input)?;
    if sort_keys {
        value = sorted(value);
    }

    let padding = " ".repeat(indent);
    let mut output = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut output, PrettyFormatter::with_indent(padding.as_bytes()));
    value
        .serialize(&mut serializer)
        .map_err(|error| ToolError::Json(error.to_string()))?;
    String::from_utf8(output).map_err(|error| ToolError::Json(error.to_string()))
}

/// Remove all insignificant whitespace.
pub fn minify(input: &str) -> ToolResult<String> {
    let value = parse(input)?;
    serde_json::to_string(&value).map_err(|error| ToolError::Json(error.to_string()))
}

#[must_use]
pub fn validate(input: &str) -> Validation {
    match parse(input) {
        Ok(_) => Validation {
            valid: true,
            error: None,
        },
        Err(error) => Validation {
            valid: false,
            error: Some(error.to_string()),
        },
    }
}

fn parse(input: &str) -> ToolResult<Value> {
    serde_json::from_str(input).map_err(|error| ToolError::Json(error.to_string()))
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sorted(value)))
                    .collect::<Map<_, _>>(),
            )
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_keeps_key_order() {
        let formatted = format(r#"{"a":1,"b":[2,3]}"#, 2, false).unwrap();
        assert_eq!(formatted, "{\n  \"a\": 1,\n  \"b\": [\n    2,\n    3\n  ]\n}");
        assert_eq!(minify(&formatted).unwrap(), r#"{"a":1,"b":[2,3]}"#);
    }

    #[test]
    fn format_preserves_insertion_order_without_sorting() {
        let formatted = format(r#"{"z":1,"a":2}"#, 0, false).unwrap();
        assert!(formatted.find("\"z\"").unwrap() < formatted.find("\"a\"").unwrap());
    }

    #[test]
    fn sort_keys_is_recursive() {
        let minified = minify(&format(r#"{"b":{"d":1,"c":2},"a":[{"y":1,"x":2}]}"#, 4, true).unwrap())
            .unwrap();
        assert_eq!(minified, r#"{"a":[{"x":2,"y":1}],"b":{"c":2,"d":1}}"#);
    }

    #[test]
    fn format_minify_parse_is_lossless() {
        let inputs = [
            r#"{"name":"dev","tags":["a","b"],"nested":{"n":null,"t":true,"f":1.5}}"#,
            r#"[1,"two",{"three":3}]"#,
            r#""plain string""#,
            "42",
        ];
        for input in inputs {
            let original: Value = serde_json::from_str(input).unwrap();
            let roundtrip: Value =
                serde_json::from_str(&minify(&format(input, 2, false).unwrap()).unwrap()).unwrap();
            assert_eq!(original, roundtrip);
        }
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(format("{", 2, false), Err(ToolError::Json(_))));
        let validation = validate("{\"a\":}");
        assert!(!validation.valid);
        assert!(validation.error.unwrap().starts_with("Invalid JSON"));
        assert_eq!(
            validate("[]"),
            Validation {
                valid: true,
                error: None
            }
        );
    }

    #[test]
    fn oversized_indent_is_rejected() {
        assert!(matches!(
            format("{}", 20, false),
            Err(ToolError::InvalidOption(_))
        ));
    }
}
