use serde::{Deserialize, Serialize};

/// Derived metadata for one piece of raw content.
///
/// This is the only form of the content that ever reaches the audit log
/// (see `gw-chain`): the raw text itself is never written on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Non-empty, at most 100 code points.
    pub title: String,
    /// At most 200 code points.
    pub summary: String,
    /// Comma-separated, at most 200 code points total; individual tokens are
    /// non-empty, trimmed, lowercased.
    pub tags: String,
    /// `0x` + 64 lowercase hex digits: SHA-256 of the exact input text.
    pub fingerprint: String,
}

/// Hard bounds enforced by the audit contract (see `gw-chain`); kept here so
/// extraction truncates to exactly what the chain will accept.
pub const MAX_TITLE_CODEPOINTS: usize = 100;
pub const MAX_SUMMARY_CODEPOINTS: usize = 200;
pub const MAX_TAGS_CODEPOINTS: usize = 200;
