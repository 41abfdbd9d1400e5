//! JSON object extraction from free-form model output
//!
//! Models often wrap the requested object in prose or code fences. Only
//! top-level balanced spans are candidates, with braces inside string
//! literals skipped. A span that fails to parse is skipped whole, so a
//! nested object is never mistaken for the reply. When no top-level span
//! parses, the greedy span from the first `{` to the last `}` is tried as a
//! last resort.

use crate::error::{DashError, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static GREEDY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

/// Extract the first JSON object embedded in `text`
///
/// `stage` names the calling step in the error, which carries the full
/// raw text.
pub fn extract_json_object(text: &str, stage: &'static str) -> Result<Map<String, Value>> {
    let mut from = 0;
    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        let Some(end) = balanced_end(text, start) else {
            break;
        };
        if let Some(object) = parse_object(&text[start..=end]) {
            return Ok(object);
        }
        from = end + 1;
    }

    greedy_span(text)
        .and_then(parse_object)
        .ok_or_else(|| DashError::UpstreamParse {
            stage,
            raw: text.to_string(),
        })
}

/// Byte index of the `}` closing the object opened at `start`
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

fn greedy_span(text: &str) -> Option<&str> {
    GREEDY.as_ref()?.find(text).map(|m| m.as_str())
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}
