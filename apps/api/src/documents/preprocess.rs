//! Text normalisation applied before LLM consumption and before embedding.

use std::sync::LazyLock;

use regex::Regex;

/// Page-number footers such as `- 12 -`.
static PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\s*\d+\s*-").expect("static regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("static regex"));

/// Removes page-number artifacts until none remain; a single pass can expose
/// a new one (`-1-2-` → `-2-`).
fn strip_page_numbers(text: &str) -> String {
    let mut out = text.to_string();
    while PAGE_NUMBER.is_match(&out) {
        out = PAGE_NUMBER.replace_all(&out, "").into_owned();
    }
    out
}

/// LLM-oriented cleanup: single spaces, no page numbers, trimmed.
/// Idempotent.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let stripped = strip_page_numbers(&collapsed);
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Embedding-oriented cleanup: keeps paragraph breaks (`\n\n`), joins the
/// lines inside a paragraph, collapses spaces and lowercases.
pub fn normalize_for_embedding(text: &str) -> String {
    let stripped = strip_page_numbers(text);
    BLANK_LINES
        .split(&stripped)
        .map(|paragraph| WHITESPACE.replace_all(paragraph, " ").trim().to_lowercase())
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Char-boundary-safe prefix of at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace_and_page_numbers() {
        let raw = "  STANDAR   KOMPETENSI\n\nJABATAN - 3 -\tAnalis  ";
        assert_eq!(clean_text(raw), "STANDAR KOMPETENSI JABATAN Analis");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let samples = [
            "",
            "   ",
            "a - 3 - b",
            "--5-5-",
            "x -1- 2 - y",
            "Level\n\n\n1 -  12  - akhir\t\t",
            "teks biasa tanpa nomor",
            "- 7 -- 8 -",
        ];
        for sample in samples {
            let once = clean_text(sample);
            assert_eq!(clean_text(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_clean_text_removes_exposed_page_numbers() {
        assert_eq!(clean_text("--5-5-"), "");
    }

    #[test]
    fn test_normalize_for_embedding_keeps_paragraphs() {
        let raw = "KOMPETENSI\nTEKNIS\n\n  \n- 4 -\nLevel 1:\n  Menyusun laporan";
        assert_eq!(
            normalize_for_embedding(raw),
            "kompetensi teknis\n\nlevel 1: menyusun laporan"
        );
    }

    #[test]
    fn test_normalize_for_embedding_is_idempotent() {
        let raw = "A\nB\n\n\nC  D\n\n- 2 -";
        let once = normalize_for_embedding(raw);
        assert_eq!(normalize_for_embedding(&once), once);
    }

    #[test]
    fn test_truncate_chars_respects_utf8() {
        assert_eq!(truncate_chars("kompetensi", 4), "komp");
        assert_eq!(truncate_chars("é—ü", 2), "é—");
        assert_eq!(truncate_chars("pendek", 100), "pendek");
    }
}
