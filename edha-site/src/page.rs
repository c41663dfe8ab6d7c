//! Page URL helpers.

use url::Url;

use crate::error::SiteError;

/// Query parameter naming the program on the detail page.
pub const SLUG_PARAM: &str = "slug";

/// Reads `?slug=` from a detail page URL.
///
/// A missing or empty slug is an error; it is never defaulted.
pub fn slug_from_page_url(page: &Url) -> Result<String, SiteError> {
    page.query_pairs()
        .find(|(key, _)| key == SLUG_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|slug| !slug.is_empty())
        .ok_or(SiteError::MissingSlug)
}

/// Builds a relative link to a page keyed by slug, e.g. `program.html?slug=tech`.
pub fn slug_link(page: &str, slug: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(slug.as_bytes()).collect();
    format!("{page}?{SLUG_PARAM}={encoded}")
}
