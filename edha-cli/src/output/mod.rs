//! Output formatting for CLI.

mod json;

pub use json::JsonFormatter;

use anyhow::Result;
use edha_site::ViewUpdate;

use crate::OutputFormat;

/// Formats a view update as an HTML fragment or as its JSON view model.
pub fn format_update(update: &ViewUpdate, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(update.render_html()),
        OutputFormat::Json => JsonFormatter::new(pretty).format(update),
    }
}
