//! Content fingerprinting.
//!
//! A fingerprint is the SHA-256 digest of the exact input bytes, rendered as
//! `0x` followed by 64 lowercase hex digits. It is the primary link between
//! the off-chain payload (vector store) and the on-chain audit record.

use sha2::{Digest, Sha256};

/// Hash `text` and return it as `0x`-prefixed lowercase hex.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic() {
        assert_eq!(fingerprint("hello world"), fingerprint("hello world"));
    }

    #[test]
    fn differs_on_input_change() {
        assert_ne!(fingerprint("hello world"), fingerprint("hello world!"));
    }

    #[test]
    fn has_expected_shape() {
        let fp = fingerprint("cats are lovely");
        assert!(fp.starts_with("0x"));
        assert_eq!(fp.len(), 2 + 64);
        assert!(fp[2..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
