//! JSON recovery from free-form model replies.
//!
//! Models are asked for a bare JSON object but often wrap it in prose or a
//! markdown fence. Strategies are tried in order and the first one that
//! yields a JSON object wins:
//!
//! 1. the whole trimmed reply
//! 2. the reply with its code fence removed
//! 3. the slice from the first `{` to the last `}`

use std::fmt;

use hairscan_core::defaults::EXCERPT_CHARS;
use hairscan_core::{Error, Result};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Strategy that recovered the JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    Direct,
    CodeFence,
    BraceSlice,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::CodeFence => write!(f, "code_fence"),
            Self::BraceSlice => write!(f, "brace_slice"),
        }
    }
}

/// Extract the JSON object embedded in `text`.
pub fn extract_json(text: &str) -> Result<Map<String, Value>> {
    extract_json_with_strategy(text).map(|(object, _)| object)
}

/// Like [`extract_json`], also reporting which strategy succeeded.
pub fn extract_json_with_strategy(text: &str) -> Result<(Map<String, Value>, ExtractionStrategy)> {
    trace!(reply = text, "Extracting JSON from model reply");
    let trimmed = text.trim();

    if let Some(object) = parse_object(trimmed) {
        return Ok((object, ExtractionStrategy::Direct));
    }

    if let Some(object) = strip_code_fence(trimmed).and_then(parse_object) {
        debug!(strategy = "code_fence", "Recovered JSON after removing fence");
        return Ok((object, ExtractionStrategy::CodeFence));
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Some(object) = parse_object(&trimmed[start..=end]) {
                debug!(strategy = "brace_slice", "Recovered JSON from brace slice");
                return Ok((object, ExtractionStrategy::BraceSlice));
            }
        }
    }

    Err(Error::Extraction {
        excerpt: excerpt(text, EXCERPT_CHARS),
    })
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Return the body of a fenced code block.
///
/// A reply that starts with a fence has its opening line (with optional
/// language tag) and closing fence removed. Otherwise the first fenced block
/// found inside the prose is used.
pub fn strip_code_fence(text: &str) -> Option<&str> {
    const FENCE: &str = "```";

    let body = if let Some(rest) = text.strip_prefix(FENCE) {
        // Drop the language tag line, if any.
        let rest = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
        rest.trim_end().strip_suffix(FENCE).unwrap_or(rest)
    } else {
        let start = text.find(FENCE)? + FENCE.len();
        let after = &text[start..];
        let after = match after.find('\n') {
            Some(newline) => &after[newline + 1..],
            None => after,
        };
        let end = after.find(FENCE)?;
        &after[..end]
    };

    Some(body.trim())
}

/// Truncate `text` to at most `max_chars` characters on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_parse() {
        let (object, strategy) = extract_json_with_strategy(r#"  {"a":1}  "#).unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
        assert_eq!(strategy, ExtractionStrategy::Direct);
    }

    #[test]
    fn test_fenced_block_after_prose() {
        let text = "Here you go:\n```json\n{\"a\":1}\n```";
        let object = extract_json(text).unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
    }

    #[test]
    fn test_fence_with_language_tag() {
        let text = "```json\n{\"stage\": 2}\n```";
        let (object, strategy) = extract_json_with_strategy(text).unwrap();
        assert_eq!(object["stage"], 2);
        assert_eq!(strategy, ExtractionStrategy::CodeFence);
    }

    #[test]
    fn test_fence_without_language_tag() {
        let text = "```\n{\"stage\": 3}\n```";
        let (object, strategy) = extract_json_with_strategy(text).unwrap();
        assert_eq!(object["stage"], 3);
        assert_eq!(strategy, ExtractionStrategy::CodeFence);
    }

    #[test]
    fn test_brace_slice() {
        let (object, strategy) = extract_json_with_strategy("prefix {\"a\":1} suffix").unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
        assert_eq!(strategy, ExtractionStrategy::BraceSlice);
    }

    #[test]
    fn test_no_braces_fails_with_excerpt() {
        let err = extract_json("no braces here").unwrap_err();
        match err {
            Error::Extraction { excerpt } => assert_eq!(excerpt, "no braces here"),
            other => panic!("Expected Extraction error, got {:?}", other),
        }
    }

    #[test]
    fn test_reversed_braces_fail() {
        assert!(extract_json("} nothing {").is_err());
    }

    #[test]
    fn test_invalid_slice_fails() {
        assert!(extract_json("look: {not json} ok").is_err());
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(extract_json("[1, 2, 3]").is_err());
        assert!(extract_json("42").is_err());
    }

    #[test]
    fn test_nested_object_survives_brace_slice() {
        let text = "Result: {\"outer\": {\"inner\": true}} -- end";
        let object = extract_json(text).unwrap();
        assert_eq!(object["outer"]["inner"], true);
    }

    #[test]
    fn test_excerpt_truncates_long_text() {
        let long = "x".repeat(500);
        let err = extract_json(&long).unwrap_err();
        match err {
            Error::Extraction { excerpt } => {
                assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
                assert!(excerpt.ends_with("..."));
            }
            other => panic!("Expected Extraction error, got {:?}", other),
        }
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let text = "头发".repeat(150);
        let cut = excerpt(&text, 5);
        assert_eq!(cut, "头发头发头...");
    }

    #[test]
    fn test_strip_code_fence_absent() {
        assert_eq!(strip_code_fence("plain text"), None);
    }
}
