//! Recovers a JSON payload from free-form model output.
//!
//! Models are asked for bare JSON but often wrap it in Markdown fences or
//! add a sentence around it. Recovery order: the whole text, then the first
//! fenced block (a `json`-tagged fence is preferred), then the first outermost
//! balanced object or array found by a bracket scan.

use serde_json::Value;

const FENCE: &str = "```";

#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct ExtractError {
    pub reason: String,
    /// The untouched model output, kept for diagnostics.
    pub raw: String,
}

pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let text = raw.trim();

    let mut reason = match serde_json::from_str::<Value>(text) {
        Ok(v) => return Ok(v),
        Err(e) => e.to_string(),
    };

    if let Some(body) = fenced_body(text) {
        match serde_json::from_str::<Value>(body) {
            Ok(v) => return Ok(v),
            Err(e) => reason = e.to_string(),
        }
    }

    if let Some(v) = first_balanced(text) {
        return Ok(v);
    }

    Err(ExtractError {
        reason,
        raw: raw.to_string(),
    })
}

/// Body of the first ```json fence, else of the first fence of any kind.
fn fenced_body(text: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets stable
    let lower = text.to_ascii_lowercase();
    let tagged = format!("{FENCE}json");

    let start = match lower.find(&tagged) {
        Some(i) => i + tagged.len(),
        None => lower.find(FENCE)? + FENCE.len(),
    };
    let rest = &text[start..];
    let body = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(strip_info_string(body).trim())
}

/// Drops a leading language tag such as `javascript` left on the fence line.
fn strip_info_string(body: &str) -> &str {
    match body.split_once('\n') {
        Some((first, rest))
            if !first.trim().is_empty()
                && first.trim().chars().all(|c| c.is_ascii_alphanumeric() || c == '-') =>
        {
            rest
        }
        _ => body,
    }
}

/// Only outermost spans are candidates; a span that fails to parse is
/// skipped whole, and an opener that never closes ends the scan.
fn first_balanced(text: &str) -> Option<Value> {
    let mut from = 0;
    while let Some(offset) = text[from..].find(['{', '[']) {
        let start = from + offset;
        let end = start + balanced_end(&text[start..])?;
        if let Ok(v) = serde_json::from_str(&text[start..end]) {
            return Some(v);
        }
        from = end;
    }
    None
}

/// Byte length of the bracketed span opening at `s[0]`, string- and escape-aware.
fn balanced_end(s: &str) -> Option<usize> {
    let mut closers = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
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
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                if closers.pop()? != c {
                    return None;
                }
                if closers.is_empty() {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_fence_is_stripped() {
        let v = extract_json("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(v, json!({"a": 1}));
    }

    #[test]
    fn plain_json_is_parsed_unchanged() {
        let v = extract_json(r#"{"dailyCalories": 2200, "days": []}"#).unwrap();
        assert_eq!(v, json!({"dailyCalories": 2200, "days": []}));
    }

    #[test]
    fn prose_without_json_is_a_parse_failure() {
        let raw = "Sorry, I can't help with that.";
        let err = extract_json(raw).unwrap_err();
        assert_eq!(err.raw, raw);
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn untagged_fence_is_stripped() {
        let v = extract_json("Here you go:\n```\n[1, 2, 3]\n```\nEnjoy!").unwrap();
        assert_eq!(v, json!([1, 2, 3]));
    }

    #[test]
    fn other_language_tag_is_dropped() {
        let v = extract_json("```javascript\n{\"title\": \"Omelette\"}\n```").unwrap();
        assert_eq!(v, json!({"title": "Omelette"}));
    }

    #[test]
    fn uppercase_json_tag() {
        let v = extract_json("```JSON\n{\"ok\": true}\n```").unwrap();
        assert_eq!(v, json!({"ok": true}));
    }

    #[test]
    fn json_fence_preferred_over_earlier_plain_fence() {
        let raw = "```\nnot json\n```\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_json(raw).unwrap(), json!({"b": 2}));
    }

    #[test]
    fn unterminated_fence_uses_rest_of_text() {
        let v = extract_json("```json\n{\"a\": [1, 2]}").unwrap();
        assert_eq!(v, json!({"a": [1, 2]}));
    }

    #[test]
    fn object_embedded_in_prose_is_recovered() {
        let raw = r#"Sure! Here is the analysis: {"foodItems": ["apple"], "calories": 95} Let me know."#;
        let v = extract_json(raw).unwrap();
        assert_eq!(v, json!({"foodItems": ["apple"], "calories": 95}));
    }

    #[test]
    fn brackets_inside_strings_do_not_confuse_scan() {
        let raw = r#"note {"title": "Curly {braces} and ] brackets", "n": 1} end"#;
        let v = extract_json(raw).unwrap();
        assert_eq!(v["title"], "Curly {braces} and ] brackets");
    }

    #[test]
    fn escaped_quotes_inside_strings() {
        let raw = r#"x {"q": "say \"hi\" {"} y"#;
        assert_eq!(extract_json(raw).unwrap(), json!({"q": "say \"hi\" {"}));
    }

    #[test]
    fn invalid_candidates_are_skipped() {
        let raw = "[draft] {\"final\": true}";
        assert_eq!(extract_json(raw).unwrap(), json!({"final": true}));
    }

    #[test]
    fn broken_fence_body_reports_failure() {
        let raw = "```json\n{\"a\": }\n```";
        let err = extract_json(raw).unwrap_err();
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn truncated_plan_is_not_replaced_by_inner_object() {
        let raw = "```json\n{\"dailyCalories\": 2000, \"macros\": {\"protein\":150,\"carbs\":200,\"fats\":70}, \"days\": [{\"day\": \"Monday\", \"breakfast\": \"Oats";
        let err = extract_json(raw).unwrap_err();
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn failed_outer_span_is_skipped_whole() {
        let raw = r#"draft {"a": {"b": 1}, oops} final {"ok": true}"#;
        assert_eq!(extract_json(raw).unwrap(), json!({"ok": true}));
    }
}
