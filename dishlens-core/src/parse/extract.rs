//! Isolate the JSON object in a model response.
//!
//! Models wrap their answer in code fences, prose, or both. The object is
//! found by brace depth so nested `vitamins`/`minerals` objects do not end it
//! early.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;

/// A leading markdown fence, optionally tagged `json`.
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*```(?:json)?\s*").expect("Invalid fence regex"));

/// Drop a leading ```` ``` ```` / ```` ```json ```` marker, if any.
pub fn strip_code_fence(text: &str) -> &str {
    match LEADING_FENCE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Return the first brace-balanced `{ ... }` span of `text`.
///
/// Braces are counted without regard to string literals.
pub fn extract_object(text: &str) -> Result<&str, ExtractError> {
    balanced_object(strip_code_fence(text))
}

fn balanced_object(text: &str) -> Result<&str, ExtractError> {
    let start = text.find('{').ok_or(ExtractError::NoObject)?;

    let mut depth = 0usize;
    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Unterminated { start })
}

/// Like [`extract_object`], but an unterminated object yields everything from
/// its opening brace on. Model output cut off by a token limit looks like this.
pub fn extract_object_or_tail(text: &str) -> Result<&str, ExtractError> {
    let stripped = strip_code_fence(text);
    match balanced_object(stripped) {
        Ok(object) => Ok(object),
        Err(ExtractError::Unterminated { start }) => {
            tracing::warn!(
                start,
                len = stripped.len(),
                "response object never closes, assuming truncated output"
            );
            Ok(&stripped[start..])
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object() {
        assert_eq!(extract_object(r#"{"a": 1}"#).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_nested_objects_do_not_end_early() {
        let text = r#"Here you go: {"nutrition": {"vitamins": {"A": 80}, "minerals": {"Iron": 1.8}}, "x": 1} hope this helps {"other": 2}"#;
        assert_eq!(
            extract_object(text).unwrap(),
            r#"{"nutrition": {"vitamins": {"A": 80}, "minerals": {"Iron": 1.8}}, "x": 1}"#
        );
    }

    #[test]
    fn test_fenced_response() {
        let text = "```json\n{\"foodName\": \"Dosa\"}\n```";
        assert_eq!(extract_object(text).unwrap(), "{\"foodName\": \"Dosa\"}");
    }

    #[test]
    fn test_fence_tag_is_case_insensitive() {
        assert_eq!(strip_code_fence("  ```JSON\n{}"), "{}");
        assert_eq!(strip_code_fence("```\n{}"), "{}");
        assert_eq!(strip_code_fence("no fence"), "no fence");
    }

    #[test]
    fn test_no_object() {
        assert_eq!(
            extract_object("I could not identify this dish."),
            Err(ExtractError::NoObject)
        );
        assert_eq!(extract_object(""), Err(ExtractError::NoObject));
    }

    #[test]
    fn test_unterminated_object() {
        let text = r#"{"foodName": "Samosa", "recipe": {"steps": ["Knead"#;
        assert_eq!(
            extract_object(text),
            Err(ExtractError::Unterminated { start: 0 })
        );
        assert_eq!(extract_object_or_tail(text).unwrap(), text);
    }

    #[test]
    fn test_tail_starts_at_first_brace() {
        let text = "```json\nsure! {\"foodName\": \"Vada\", \"x\": {";
        assert_eq!(
            extract_object_or_tail(text).unwrap(),
            "{\"foodName\": \"Vada\", \"x\": {"
        );
    }

    #[test]
    fn test_stray_closing_brace_before_object() {
        assert_eq!(extract_object("} {\"a\": {}}").unwrap(), "{\"a\": {}}");
    }

    #[test]
    fn test_balance_with_multibyte_noise() {
        let text = "समोसा ➜ {\"foodName\": \"समोसा\", \"n\": {\"A\": {}}} ಮುಗಿದಿದೆ }";
        assert_eq!(
            extract_object(text).unwrap(),
            "{\"foodName\": \"समोसा\", \"n\": {\"A\": {}}}"
        );
    }
}
