//! Title extraction.
//!
//! The first markdown heading wins; otherwise the first non-empty line.
//! Either way the result is truncated to [`crate::types::MAX_TITLE_CODEPOINTS`]
//! code points, dropping trailing whitespace introduced by the cut.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::MAX_TITLE_CODEPOINTS;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s+(.+)$").expect("valid regex"));

pub fn extract_title(content: &str) -> String {
    let candidate = content
        .lines()
        .find_map(|line| HEADING.captures(line).map(|c| c[1].to_string()))
        .unwrap_or_else(|| {
            content
                .lines()
                .find(|line| !line.trim().is_empty())
                .unwrap_or_default()
                .to_string()
        });

    truncate_codepoints(candidate.trim(), MAX_TITLE_CODEPOINTS)
}

/// Truncate to at most `max` Unicode scalar values, trimming trailing
/// whitespace left dangling by the cut.
pub(crate) fn truncate_codepoints(s: &str, max: usize) -> String {
    let truncated: String = s.chars().take(max).collect();
    truncated.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_wins_over_first_line() {
        let content = "# ZKML\nJolt Atlas enables verifiable ML";
        assert_eq!(extract_title(content), "ZKML");
    }

    #[test]
    fn falls_back_to_first_nonempty_line() {
        let content = "\n\ncats are lovely\nmore text";
        assert_eq!(extract_title(content), "cats are lovely");
    }

    #[test]
    fn deep_heading_levels_match() {
        assert_eq!(extract_title("### Deep Dive\nbody"), "Deep Dive");
    }

    #[test]
    fn truncates_to_100_codepoints() {
        let heading = format!("# {}", "a".repeat(150));
        let title = extract_title(&heading);
        assert_eq!(title.chars().count(), 100);
    }
}
