//! Typed wrappers for the storefront REST endpoints, grouped by resource.

mod auth;
mod cart;
mod orders;
mod products;

/// Percent-encode an identifier for use as a path segment.
pub(crate) fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}
