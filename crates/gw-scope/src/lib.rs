//! Per-principal namespacing and isolation.
//!
//! These are pure, non-suspending helpers: encoding a principal into the tag
//! strings written to the vector store and chain log, and filtering results
//! back out by ownership. No I/O, no allocately-heavy state — every call
//! site in `gw-server`'s pipeline treats this as free.

/// The byte that separates a principal from the tag list in a
/// [`scope_vector_tag`] output. Must not appear inside a principal or a tag.
pub const NAMESPACE_SEPARATOR: char = '|';

/// Prefix used for the principal marker embedded in chain-log tag strings.
pub const CHAIN_PRINCIPAL_PREFIX: &str = "principal:";

/// Fold `principal` into the tag string stored in the vector canister.
///
/// Returns `"{principal}|{tags}"` when a principal is present, otherwise
/// `tags` unchanged.
pub fn scope_vector_tag(principal: Option<&str>, tags: &str) -> String {
    match principal {
        Some(p) => format!("{p}{NAMESPACE_SEPARATOR}{tags}"),
        None => tags.to_string(),
    }
}

/// Fold `principal` into the tag string written to the chain audit log.
///
/// Returns `"{tags},principal:{principal}"` when a principal is present,
/// otherwise `tags` unchanged.
pub fn scope_chain_tags(principal: Option<&str>, tags: &str) -> String {
    match principal {
        Some(p) => format!("{tags},{CHAIN_PRINCIPAL_PREFIX}{p}"),
        None => tags.to_string(),
    }
}

/// Whether a vector-store `ScopedTag` belongs to `principal`.
///
/// Absent `principal` means no scoping is applied and every tag is owned.
pub fn is_owned_by(scoped_tag: &str, principal: Option<&str>) -> bool {
    match principal {
        None => true,
        Some(p) => scoped_tag
            .strip_prefix(p)
            .and_then(|rest| rest.strip_prefix(NAMESPACE_SEPARATOR))
            .is_some(),
    }
}

/// Whether `principal` is an acceptable identifier: non-empty, and free of
/// the namespace separator, the chain-tags delimiter, and whitespace.
///
/// Intentionally conservative: it does not attempt to parse the issuing
/// identity provider's own token grammar.
pub fn validate_principal(principal: &str) -> bool {
    !principal.is_empty()
        && !principal.contains(NAMESPACE_SEPARATOR)
        && !principal.contains(',')
        && !principal.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_tag_scoped_with_principal() {
        assert_eq!(scope_vector_tag(Some("alice"), "ml,ai"), "alice|ml,ai");
    }

    #[test]
    fn vector_tag_unscoped_without_principal() {
        assert_eq!(scope_vector_tag(None, "ml,ai"), "ml,ai");
    }

    #[test]
    fn chain_tags_scoped_with_principal() {
        assert_eq!(scope_chain_tags(Some("alice"), "ml,ai"), "ml,ai,principal:alice");
    }

    #[test]
    fn chain_tags_unscoped_without_principal() {
        assert_eq!(scope_chain_tags(None, "ml,ai"), "ml,ai");
    }

    #[test]
    fn ownership_holds_for_matching_prefix() {
        assert!(is_owned_by("alice|ml,ai", Some("alice")));
    }

    #[test]
    fn ownership_fails_for_mismatched_prefix() {
        assert!(!is_owned_by("bob|ml,ai", Some("alice")));
    }

    #[test]
    fn ownership_fails_for_prefix_collision_without_separator() {
        // "alicia" starts with "alice" as a byte sequence but isn't the same principal.
        assert!(!is_owned_by("aliciax|ml,ai", Some("alice")));
    }

    #[test]
    fn ownership_always_holds_without_principal() {
        assert!(is_owned_by("anything", None));
    }

    #[test]
    fn rejects_invalid_principals() {
        assert!(!validate_principal(""));
        assert!(!validate_principal("a|b"));
        assert!(!validate_principal("a,b"));
        assert!(!validate_principal("a b"));
    }

    #[test]
    fn accepts_valid_principal() {
        assert!(validate_principal("alice-123"));
    }
}
