//! Article types.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::lenient::{non_empty, opt_string};

/// Fallback article title.
const DEFAULT_TITLE: &str = "Article";

/// Date format used on article cards.
const DATE_FORMAT: &str = "%d/%m/%Y";

/// An article as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Title.
    #[serde(default, deserialize_with = "opt_string")]
    pub title: Option<String>,

    /// Slug of the article detail page.
    #[serde(default, deserialize_with = "opt_string")]
    pub slug: Option<String>,

    /// Short summary.
    #[serde(default, deserialize_with = "opt_string")]
    pub excerpt: Option<String>,

    /// Cover image URL.
    #[serde(default, deserialize_with = "opt_string")]
    pub cover_image: Option<String>,

    /// Publication timestamp (RFC 3339 or `YYYY-MM-DD`).
    #[serde(default, deserialize_with = "opt_string")]
    pub published_at: Option<String>,
}

impl Article {
    /// Produces the display-ready view of this article.
    pub fn normalize(&self) -> ArticleView {
        ArticleView {
            title: non_empty(self.title.as_deref())
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
            slug: self.slug.clone().unwrap_or_default(),
            excerpt: self.excerpt.clone().unwrap_or_default(),
            cover_image: non_empty(self.cover_image.as_deref()).map(str::to_string),
            published_on: non_empty(self.published_at.as_deref()).and_then(format_date),
        }
    }
}

/// Formats a backend timestamp as a calendar date.
///
/// Timestamps are rendered in UTC. Unparseable input yields `None`.
fn format_date(raw: &str) -> Option<String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc().format(DATE_FORMAT).to_string());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.format(DATE_FORMAT).to_string())
}

/// Normalized article card data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    /// Title, `Article` when missing.
    pub title: String,
    /// Slug, empty when missing.
    pub slug: String,
    /// Excerpt, empty when missing.
    pub excerpt: String,
    /// Cover image URL, omitted when missing.
    pub cover_image: Option<String>,
    /// Formatted publication date, omitted when missing.
    pub published_on: Option<String>,
}
