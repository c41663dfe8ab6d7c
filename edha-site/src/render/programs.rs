//! Program grid rendering.

use edha_core::{ProgramView, escape_html};
use serde::Serialize;

use super::list_items;
use crate::messages;
use crate::page::slug_link;

/// State of the program grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GridState {
    /// Request in flight.
    Loading,
    /// Backend returned no programs.
    Empty,
    /// Programs, already sorted.
    Loaded {
        /// Programs in display order.
        programs: Vec<ProgramView>,
    },
    /// Loading failed.
    Failed {
        /// Message for visitors (unescaped).
        message: String,
        /// API base the client tried.
        api_base: String,
    },
}

impl GridState {
    /// Builds the loaded or empty state from a program list.
    pub fn from_programs(programs: Vec<ProgramView>) -> Self {
        if programs.is_empty() {
            Self::Empty
        } else {
            Self::Loaded { programs }
        }
    }
}

/// Renders one program card.
///
/// Bullets are omitted when empty; the detail link only appears when the
/// program has a slug.
pub fn render_program_card(program: &ProgramView) -> String {
    let bullets = if program.bullets.is_empty() {
        String::new()
    } else {
        format!("<ul>{}</ul>", list_items(&program.bullets))
    };

    let link = program
        .slug
        .as_deref()
        .map(|slug| {
            format!(
                r#"<a class="detail-link" href="{}">{}</a>"#,
                escape_html(&slug_link("program.html", slug)),
                messages::PROGRAM_LINK
            )
        })
        .unwrap_or_default();

    format!(
        r#"<article class="programme-card"><h3>{}</h3><p class="programme-sub">{}</p>{bullets}{link}</article>"#,
        escape_html(&program.name),
        escape_html(&program.description),
    )
}

/// Renders the program grid content for a state.
pub fn render_programs_grid(state: &GridState) -> String {
    match state {
        GridState::Loading => format!(r#"<p class="muted">{}</p>"#, messages::PROGRAMS_LOADING),
        GridState::Empty => format!(r#"<p class="muted">{}</p>"#, messages::PROGRAMS_EMPTY),
        GridState::Loaded { programs } => programs.iter().map(render_program_card).collect(),
        GridState::Failed { message, api_base } => format!(
            r#"<p class="error">{} <strong>{}</strong><br/>Vérifiez que le backend répond sur <strong>{}</strong>.</p>"#,
            messages::PROGRAMS_ERROR,
            escape_html(message),
            escape_html(api_base),
        ),
    }
}
