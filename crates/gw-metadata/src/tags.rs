//! Tag extraction: auto-derived topic tags merged with caller-supplied tags.

use std::collections::HashMap;

use crate::types::MAX_TAGS_CODEPOINTS;

const MAX_AUTO_TAGS: usize = 5;
const MIN_TOKEN_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "a", "of", "and", "is", "in", "to", "for", "with", "on", "this", "that", "are", "be",
    "it", "as", "by", "an", "or", "at", "from", "we", "you", "they", "i",
];

/// Derive up to [`MAX_AUTO_TAGS`] topic tags from `content` by frequency, then
/// merge in `user_tags` (kept in the caller's order, deduplicated), joining
/// with commas and truncating to [`MAX_TAGS_CODEPOINTS`] at a tag boundary.
pub fn extract_tags(content: &str, user_tags: Option<&str>) -> String {
    let auto = auto_tags(content);

    let user = user_tags
        .unwrap_or_default()
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let mut seen = std::collections::HashSet::new();
    let mut merged = Vec::new();
    for tag in user.chain(auto) {
        if seen.insert(tag.clone()) {
            merged.push(tag);
        }
    }

    truncate_tag_list(&merged, MAX_TAGS_CODEPOINTS)
}

fn auto_tags(content: &str) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (position, token) in tokenize(content).enumerate() {
        if token.len() < MIN_TOKEN_LEN || STOPWORDS.contains(&token.as_str()) {
            continue;
        }
        *counts.entry(token.clone()).or_insert(0) += 1;
        first_seen.entry(token).or_insert(position);
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(token, count)| {
            let first = first_seen[&token];
            (token, count, first)
        })
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(MAX_AUTO_TAGS).map(|(t, _, _)| t).collect()
}

fn tokenize(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn truncate_tag_list(tags: &[String], max_codepoints: usize) -> String {
    let mut joined = String::new();
    for tag in tags {
        let candidate = if joined.is_empty() {
            tag.clone()
        } else {
            format!("{joined},{tag}")
        };
        if candidate.chars().count() > max_codepoints {
            break;
        }
        joined = candidate;
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_stopwords_and_short_tokens() {
        let content = "the cat and a dog sat on it";
        let tags = extract_tags(content, None);
        assert!(!tags.contains("the"));
        assert!(!tags.contains("and"));
    }

    #[test]
    fn ranks_by_frequency_then_first_occurrence() {
        let content = "rust rust rust wasm wasm zkml";
        let tags = extract_tags(content, None);
        let list: Vec<&str> = tags.split(',').collect();
        assert_eq!(list[0], "rust");
        assert_eq!(list[1], "wasm");
    }

    #[test]
    fn user_tags_take_priority_and_dedupe() {
        let content = "rust rust rust wasm wasm zkml zkml zkml zkml";
        let tags = extract_tags(content, Some("custom, rust"));
        let list: Vec<&str> = tags.split(',').collect();
        assert_eq!(list[0], "custom");
        assert_eq!(list.iter().filter(|t| **t == "rust").count(), 1);
    }

    #[test]
    fn truncates_at_tag_boundary() {
        let long_tags = (0..50).map(|i| format!("tagword{i}")).collect::<Vec<_>>().join(",");
        let tags = extract_tags("", Some(&long_tags));
        assert!(tags.chars().count() <= MAX_TAGS_CODEPOINTS);
        assert!(!tags.ends_with(','));
    }
}
