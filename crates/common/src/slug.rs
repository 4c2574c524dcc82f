//! Slug derivation for URL identity.
//!
//! Categories, forums and topics carry human-readable slugs derived from
//! their names at creation time. Derivation is pure and deterministic so
//! a slug computed once never drifts; renaming an entity deliberately
//! does not regenerate its slug (stable URLs).

/// Derive a URL-safe slug from a human-readable name.
///
/// Lowercases the input, collapses every run of non-alphanumeric
/// characters into a single `-`, and trims leading/trailing separators.
///
/// ```
/// use agora_common::derive_slug;
///
/// assert_eq!(derive_slug("Hello, World!"), "hello-world");
/// ```
#[must_use]
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_separator = true;
        }
    }

    slug
}
