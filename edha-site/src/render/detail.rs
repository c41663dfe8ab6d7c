//! Program page rendering.
//!
//! The page is all-or-nothing: it shows a loading line, an error, or the
//! complete program with its articles.

use edha_core::escape_html;
use serde::Serialize;

use super::{list_items_or_placeholder, render_articles};
use crate::client::ProgramDetail;
use crate::messages;

/// State of the program page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailState {
    /// Requests in flight.
    Loading,
    /// Missing slug or a failed request.
    Failed {
        /// Message for visitors (unescaped).
        message: String,
    },
    /// Program and articles loaded.
    Loaded {
        /// The loaded page.
        detail: Box<ProgramDetail>,
    },
}

/// Escaped fragments for each slot of the program page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailFragments {
    /// Category label.
    pub category: String,
    /// Program name.
    pub name: String,
    /// Description.
    pub description: String,
    /// `<li>` items for the bullets, placeholder row when empty.
    pub bullets: String,
    /// Target audience.
    pub audience: String,
    /// Location.
    pub location: String,
    /// Duration.
    pub duration: String,
    /// `<li>` items for the objectives, placeholder row when empty.
    pub objectives: String,
    /// Article cards; `None` shows the "no articles" note.
    pub articles: Option<String>,
}

/// Renders the slots of a loaded program page.
pub fn render_detail(detail: &ProgramDetail) -> DetailFragments {
    let program = &detail.program;
    DetailFragments {
        category: escape_html(program.category.label()),
        name: escape_html(&program.name),
        description: escape_html(&program.description),
        bullets: list_items_or_placeholder(&program.bullets),
        audience: escape_html(&program.target_audience),
        location: escape_html(&program.location),
        duration: escape_html(&program.duration),
        objectives: list_items_or_placeholder(&program.objectives),
        articles: render_articles(&detail.articles),
    }
}

/// Renders the whole program page section for a state.
pub fn render_detail_page(state: &DetailState) -> String {
    match state {
        DetailState::Loading => {
            format!(r#"<p id="programLoading" class="muted">{}</p>"#, messages::PROGRAM_LOADING)
        }
        DetailState::Failed { message } => format!(
            r#"<div id="programError"><p id="programErrorMsg">{}</p></div>"#,
            escape_html(message)
        ),
        DetailState::Loaded { detail } => {
            let f = render_detail(detail);
            let articles = f.articles.unwrap_or_else(|| {
                format!(r#"<p id="noArticles" class="muted">{}</p>"#, messages::NO_ARTICLES)
            });
            format!(
                concat!(
                    r#"<section id="programContent">"#,
                    r#"<p id="programCategory">{category}</p>"#,
                    r#"<h1 id="programName">{name}</h1>"#,
                    r#"<p id="programDescription">{description}</p>"#,
                    r#"<ul id="programBullets">{bullets}</ul>"#,
                    r#"<dl>"#,
                    r#"<dt>Public</dt><dd id="programAudience">{audience}</dd>"#,
                    r#"<dt>Lieu</dt><dd id="programLocation">{location}</dd>"#,
                    r#"<dt>Durée</dt><dd id="programDuration">{duration}</dd>"#,
                    r#"</dl>"#,
                    r#"<ul id="programObjectives">{objectives}</ul>"#,
                    r#"<div id="programArticles">{articles}</div>"#,
                    r#"</section>"#,
                ),
                category = f.category,
                name = f.name,
                description = f.description,
                bullets = f.bullets,
                audience = f.audience,
                location = f.location,
                duration = f.duration,
                objectives = f.objectives,
                articles = articles,
            )
        }
    }
}
