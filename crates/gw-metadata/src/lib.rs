//! Derives compact, chain-safe metadata from raw user content.
//!
//! Every insert goes through [`extract`] exactly once: the resulting
//! [`Metadata`] is what gets written to the vector store and mirrored,
//! through `gw-chain`, to the audit log. The raw content itself never leaves
//! this boundary.

mod error;
mod fingerprint;
mod summary;
mod tags;
mod title;
mod types;

pub use error::MetadataError;
pub use fingerprint::fingerprint;
pub use types::{Metadata, MAX_SUMMARY_CODEPOINTS, MAX_TAGS_CODEPOINTS, MAX_TITLE_CODEPOINTS};

/// Derive [`Metadata`] for `content`, merging in any caller-supplied
/// `user_tags` (comma-separated).
///
/// Returns [`MetadataError::EmptyContent`] if `content` is empty or
/// whitespace-only once trimmed.
pub fn extract(content: &str, user_tags: Option<&str>) -> Result<Metadata, MetadataError> {
    if content.trim().is_empty() {
        return Err(MetadataError::EmptyContent);
    }

    Ok(Metadata {
        title: title::extract_title(content),
        summary: summary::extract_summary(content),
        tags: tags::extract_tags(content, user_tags),
        fingerprint: fingerprint::fingerprint(content),
    })
}
