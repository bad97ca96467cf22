//! Summary extraction.
//!
//! Strips the markdown markup a human wouldn't want read back to them, joins
//! paragraphs with a single space, and truncates to
//! [`crate::types::MAX_SUMMARY_CODEPOINTS`] code points — backing off to the
//! previous word boundary rather than splitting a word in half.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::MAX_SUMMARY_CODEPOINTS;

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]*)`").expect("valid regex"));
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"));
static HEADING_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#+\s*").expect("valid regex"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_]{1,3}").expect("valid regex"));

pub fn extract_summary(content: &str) -> String {
    let no_fences = FENCE.replace_all(content, " ");
    let no_inline_code = INLINE_CODE.replace_all(&no_fences, "$1");
    let no_links = LINK.replace_all(&no_inline_code, "$1");
    let no_headings = HEADING_MARKER.replace_all(&no_links, "");
    let no_emphasis = EMPHASIS.replace_all(&no_headings, "");

    let joined = no_emphasis
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    truncate_at_word_boundary(&joined, MAX_SUMMARY_CODEPOINTS)
}

fn truncate_at_word_boundary(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return chars.into_iter().collect();
    }

    let mut cut = max;
    while cut > 0 && !chars[cut - 1].is_whitespace() && !chars[cut].is_whitespace() {
        cut -= 1;
    }
    chars[..cut].iter().collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_heading_markers() {
        let content = "# ZKML\nJolt Atlas enables verifiable ML";
        assert!(extract_summary(content).starts_with("Jolt Atlas enables verifiable ML"));
    }

    #[test]
    fn strips_emphasis_and_links() {
        let content = "This is **bold** and [a link](https://example.com) and `code`.";
        let summary = extract_summary(content);
        assert!(!summary.contains('*'));
        assert!(!summary.contains('['));
        assert!(!summary.contains('`'));
        assert!(summary.contains("a link"));
    }

    #[test]
    fn truncates_at_word_boundary() {
        let long_word_sentence = format!("{} tail", "word ".repeat(60));
        let summary = extract_summary(&long_word_sentence);
        assert!(summary.chars().count() <= MAX_SUMMARY_CODEPOINTS);
        assert!(!summary.ends_with("wor"));
    }

    #[test]
    fn strips_fenced_code_blocks() {
        let content = "before\n```rust\nfn main() {}\n```\nafter";
        let summary = extract_summary(content);
        assert!(!summary.contains("fn main"));
        assert!(summary.contains("before"));
        assert!(summary.contains("after"));
    }
}
