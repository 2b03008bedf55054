//! Slug derivation for URL-path segments
//!
//! This module provides the title-to-slug normalization used wherever a node
//! needs a URL segment but the caller supplied none.

/// Derive a URL-safe slug from a title
///
/// Lowercases the input, keeps ASCII alphanumerics, and joins the runs
/// between them with single dashes. Leading/trailing separators are
/// dropped, so the output never starts or ends with a dash.
///
/// # Arguments
///
/// * `title` - Human-readable text to normalize
///
/// # Examples
///
/// ```rust
/// use folio_core::utils::slugify;
///
/// assert_eq!(slugify("My First Project"), "my-first-project");
/// assert_eq!(slugify("  Rust & WASM!  "), "rust-wasm");
/// assert_eq!(slugify("already-a-slug"), "already-a-slug");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            // Any run of non-alphanumerics collapses to one dash
            pending_dash = true;
        }
    }

    slug
}
