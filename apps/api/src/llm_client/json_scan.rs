//! Locates JSON values embedded in free-text LLM replies.
//!
//! Models wrap their JSON in prose, code fences, or trailing commentary. The
//! scanner walks the reply tracking nesting depth (ignoring delimiters inside
//! string literals) and yields every balanced top-level span, so a stray `}`
//! in the commentary cannot corrupt the candidate.

use serde::de::DeserializeOwned;
use tracing::warn;

/// Balanced top-level spans opened by `open` and closed by `close`, in order.
/// An unterminated opener is skipped and scanning resumes after it.
pub fn balanced_spans(text: &str, open: u8, close: u8) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == open) {
        let start = pos + offset;
        match matching_close(bytes, start, open, close) {
            Some(end) => {
                spans.push(&text[start..=end]);
                pos = end + 1;
            }
            None => pos = start + 1,
        }
        if pos >= bytes.len() {
            break;
        }
    }
    spans
}

fn matching_close(bytes: &[u8], start: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        if b == b'"' {
            in_string = true;
        } else if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Decodes the first balanced `{...}` span that deserializes as `T`.
pub fn parse_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    parse_first(text, b'{', b'}')
}

/// Decodes the first balanced `[...]` span that deserializes as `T`.
pub fn parse_array<T: DeserializeOwned>(text: &str) -> Option<T> {
    parse_first(text, b'[', b']')
}

fn parse_first<T: DeserializeOwned>(text: &str, open: u8, close: u8) -> Option<T> {
    let spans = balanced_spans(text, open, close);
    if spans.is_empty() {
        warn!("No JSON {} found in LLM output", open as char);
        return None;
    }
    for span in &spans {
        match serde_json::from_str::<T>(span) {
            Ok(value) => return Some(value),
            Err(e) => warn!("JSON parsing error: {e}"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_object_wrapped_in_prose() {
        let reply = "Berikut hasilnya:\n```json\n{\"jabatan\": \"Analis\"}\n```\nSemoga membantu.";
        let value: Value = parse_object(reply).unwrap();
        assert_eq!(value["jabatan"], "Analis");
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let reply = r#"{"catatan": "gunakan } dan { dengan hati-hati", "n": 1} lalu }"#;
        let value: Value = parse_object(reply).unwrap();
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn test_trailing_brace_in_commentary_does_not_corrupt() {
        // first-{ / last-} slicing would fail here
        let reply = r#"{"a": 1} catatan: {bukan json}"#;
        let value: Value = parse_object(reply).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_skips_invalid_candidate_and_uses_next() {
        let reply = r#"contoh {format} lalu {"a": 2}"#;
        let value: Value = parse_object(reply).unwrap();
        assert_eq!(value["a"], 2);
    }

    #[test]
    fn test_unterminated_opener_is_skipped() {
        let reply = r#"{ tidak ditutup ... {"a": 3}"#;
        // the outer opener never closes; the inner object is recovered
        let value: Value = parse_object(reply).unwrap();
        assert_eq!(value["a"], 3);
    }

    #[test]
    fn test_no_json_is_none() {
        assert!(parse_object::<Value>("Maaf, saya tidak bisa.").is_none());
        assert!(parse_object::<Value>("").is_none());
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let reply = r#"{"kutipan": "dia berkata \"}\" lalu pergi"}"#;
        let value: Value = parse_object(reply).unwrap();
        assert_eq!(value["kutipan"], "dia berkata \"}\" lalu pergi");
    }

    #[test]
    fn test_array_extraction() {
        let reply = "Soal:\n[{\"id_soal\": \"E1\"}, {\"id_soal\": \"E2\"}]\nselesai";
        let value: Vec<Value> = parse_array(reply).unwrap();
        assert_eq!(value.len(), 2);
    }
}
