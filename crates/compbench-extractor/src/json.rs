//! Recover structured data from model output

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid fenced block regex")
});

/// Parse a JSON value out of a model response
///
/// Tried in order: the whole text, the first fenced code block (optionally
/// tagged `json`), then the span from the first `{` to the last `}`.
/// Returns `None` and logs a warning when nothing parses.
pub fn parse_json_response(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    if let Some(block) = FENCED_BLOCK.captures(text).and_then(|c| c.get(1)) {
        if let Ok(value) = serde_json::from_str(block.as_str()) {
            return Some(value);
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&text[start..=end]) {
                return Some(value);
            }
        }
    }

    warn!("Could not parse JSON from response");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        assert_eq!(
            parse_json_response(r#"{"company": "Acme", "fiscal_year": 2024}"#),
            Some(json!({"company": "Acme", "fiscal_year": 2024}))
        );
    }

    #[test]
    fn test_fenced_block_matches_direct_parse() {
        let inner = "{\n  \"executives\": [{\"name\": \"Jane Doe\", \"salary\": 950000}]\n}";
        let response = format!("Here is the data:\n```json\n{}\n```\nLet me know.", inner);

        let expected: Value = serde_json::from_str(inner).unwrap();
        assert_eq!(parse_json_response(&response), Some(expected));
    }

    #[test]
    fn test_untagged_fence() {
        let response = "```\n[1, 2, 3]\n```";
        assert_eq!(parse_json_response(response), Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_single_line_fences() {
        assert_eq!(
            parse_json_response(r#"```json {"a": 1}```"#),
            Some(json!({"a": 1}))
        );
        assert_eq!(
            parse_json_response("Result: ```json [{\"name\": \"Jane Doe\"}]``` done"),
            Some(json!([{"name": "Jane Doe"}]))
        );
    }

    #[test]
    fn test_embedded_object() {
        let response = "Sure! The answer is {\"total\": {\"amount\": 5}} as requested.";
        assert_eq!(
            parse_json_response(response),
            Some(json!({"total": {"amount": 5}}))
        );
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_json_response("I could not find any compensation data."), None);
        assert_eq!(parse_json_response("} backwards {"), None);
        assert_eq!(parse_json_response(""), None);
    }

    #[test]
    fn test_top_level_scalar() {
        assert_eq!(parse_json_response("42"), Some(json!(42)));
    }
}
