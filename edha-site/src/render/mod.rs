//! HTML rendering.
//!
//! Renderers take normalized views and return fragments. Every piece of
//! text goes through [`escape_html`]; rendering the same state twice
//! yields the same fragment, so callers simply replace prior content.
//!
//! - [`programs`] - Program grid and program cards
//! - [`detail`] - Program page
//! - [`articles`] - Article cards
//! - [`form`] - Form status lines

pub mod articles;
pub mod detail;
pub mod form;
pub mod programs;

pub use articles::{render_article_card, render_articles};
pub use detail::{DetailFragments, DetailState, render_detail, render_detail_page};
pub use form::render_form_status;
pub use programs::{GridState, render_program_card, render_programs_grid};

use edha_core::{PLACEHOLDER, escape_html};

/// Renders `<li>` items, or a single placeholder item when empty.
pub fn list_items_or_placeholder(items: &[String]) -> String {
    if items.is_empty() {
        return format!("<li>{PLACEHOLDER}</li>");
    }
    list_items(items)
}

/// Renders `<li>` items; empty input renders nothing.
pub fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}
