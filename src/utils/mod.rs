//! Utility functions and helpers.

use url::Url;

/// Resolve a potentially relative href against a base URL, using
/// standard URL-reference resolution. Returns `None` when the href is
/// not resolvable at all.
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    base.join(href).ok().map(|u| u.to_string())
}
