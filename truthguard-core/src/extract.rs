//! Best-effort JSON extraction from free-text model answers
//!
//! Models asked to "answer in JSON" frequently wrap the answer in prose or a
//! code fence, or return something that isn't JSON at all. Extraction looks
//! for, in order:
//! 1. a fenced block labelled `json`
//! 2. the span from the first `{` to the last `}`
//! 3. the span from the first `[` to the last `]`
//!
//! and falls back to a caller-supplied value on any miss or parse failure.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```json[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```").unwrap()
});

static OBJECT_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());

static ARRAY_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[\s\S]*\]").unwrap());

/// Locate the candidate JSON span in a model answer
pub fn locate_json(text: &str) -> Option<&str> {
    if let Some(caps) = FENCED_JSON.captures(text) {
        return caps.get(1).map(|m| m.as_str());
    }

    OBJECT_SPAN
        .find(text)
        .or_else(|| ARRAY_SPAN.find(text))
        .map(|m| m.as_str())
}

/// Extract a typed value from a model answer, or return `fallback` unchanged
pub fn extract_json<T: DeserializeOwned>(text: &str, fallback: T) -> T {
    try_extract_json(text).unwrap_or(fallback)
}

/// Extract a typed value from a model answer, `None` when nothing usable is found
pub fn try_extract_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    let span = locate_json(text)?;
    serde_json::from_str(span.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Shape {
        name: String,
        score: i64,
    }

    fn fallback() -> Shape {
        Shape {
            name: "fallback".to_string(),
            score: 50,
        }
    }

    #[test]
    fn test_fenced_block() {
        let text = "Here you go:\n```json\n{\"name\": \"x\", \"score\": 7}\n```\nThanks.";
        assert_eq!(
            extract_json(text, fallback()),
            Shape {
                name: "x".to_string(),
                score: 7
            }
        );
    }

    #[test]
    fn test_fenced_block_wins_over_earlier_braces() {
        let text = "Scores {roughly}:\n```json\n{\"name\": \"fenced\", \"score\": 1}\n```";
        assert_eq!(extract_json(text, fallback()).name, "fenced");
    }

    #[test]
    fn test_bare_object_in_prose() {
        let text = "The result is {\"name\": \"bare\", \"score\": 90} as requested.";
        assert_eq!(extract_json(text, fallback()).name, "bare");
    }

    #[test]
    fn test_bare_array() {
        let value: Value = extract_json("Regions: [\"face\", \"background\"].", json!(null));
        assert_eq!(value, json!(["face", "background"]));
    }

    #[test]
    fn test_no_json_returns_fallback() {
        assert_eq!(extract_json("I cannot answer that.", fallback()), fallback());
        assert_eq!(extract_json("", fallback()), fallback());
    }

    #[test]
    fn test_malformed_fenced_block_returns_fallback() {
        let text = "```json\n{\"name\": \"x\", \"score\": }\n```\n{\"name\": \"later\", \"score\": 2}";
        assert_eq!(extract_json(text, fallback()), fallback());
    }

    #[test]
    fn test_wrong_shape_returns_fallback() {
        let text = "{\"title\": \"no name field\"}";
        assert_eq!(extract_json(text, fallback()), fallback());
    }

    #[test]
    fn test_two_objects_span_is_greedy() {
        // First `{` to last `}` covers both objects, which isn't valid JSON.
        let text = "{\"name\": \"a\", \"score\": 1} and {\"name\": \"b\", \"score\": 2}";
        assert_eq!(extract_json(text, fallback()), fallback());
    }

    #[test]
    fn test_locate_prefers_object_over_array() {
        let text = "[1, 2] then {\"a\": [3]}";
        assert_eq!(locate_json(text), Some("{\"a\": [3]}"));
    }
}
