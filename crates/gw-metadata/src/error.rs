//! Error types for the `gw-metadata` crate.
//!
//! [`MetadataError`] is the only error this crate can produce: extraction is
//! pure and total except for the single empty-input case.

use thiserror::Error;

/// Errors that can occur while deriving [`crate::Metadata`] from raw content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetadataError {
    /// The content was empty, or whitespace-only, after trimming.
    #[error("content is empty after whitespace strip")]
    EmptyContent,
}
