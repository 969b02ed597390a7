//! Document address handling.
//!
//! Top-level addresses typed by a user get a default scheme; addresses
//! discovered in `<iframe src>` attributes are resolved against the
//! document they were found in.

use url::{ParseError, Url};

/// Scheme assumed for addresses given without one.
pub const DEFAULT_SCHEME: &str = "https://";

/// Schemes that never name a fetchable document.
const INERT_SCHEMES: &[&str] = &["about:", "javascript:", "data:"];

/// Prepend [`DEFAULT_SCHEME`] unless the address already starts with
/// `http://` or `https://`.
pub fn normalize_address(address: &str) -> String {
    let address = address.trim();
    if has_http_scheme(address) {
        address.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{address}")
    }
}

/// Resolve an iframe `src` value against the address of the document
/// that contains it.
///
/// Returns `None` when the value names nothing to fetch (empty, or an
/// `about:`, `javascript:` or `data:` reference).
pub fn resolve_frame_src(parent: &str, src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() || is_inert(src) {
        return None;
    }

    // Scheme-relative: reuse everything before the parent's own "//".
    if src.starts_with("//") {
        let scheme = parent.split("//").next().unwrap_or_default();
        return Some(format!("{scheme}{src}"));
    }

    // Anything that is not a relative reference is fetched as written,
    // and fails there if it cannot be.
    if !matches!(Url::parse(src), Err(ParseError::RelativeUrlWithoutBase)) {
        return Some(src.to_string());
    }

    match Url::parse(parent).and_then(|base| base.join(src)) {
        Ok(joined) => Some(joined.to_string()),
        Err(_) => Some(src.to_string()),
    }
}

/// Key under which two addresses count as the same document.
///
/// Parsed addresses compare in serialized form without their fragment, so
/// `https://example.com` and `https://example.com/#top` share a key.
/// Unparsable addresses are their own key.
pub fn document_key(address: &str) -> String {
    match Url::parse(address) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.into()
        }
        Err(_) => address.to_string(),
    }
}

fn has_http_scheme(address: &str) -> bool {
    let lower = address.get(..8).unwrap_or(address).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn is_inert(src: &str) -> bool {
    INERT_SCHEMES.iter().any(|scheme| {
        src.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
