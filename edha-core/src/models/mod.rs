//! Domain models for the EDHA site client.
//!
//! Backend records are deserialized leniently: every field is optional and
//! list fields accept any JSON value. Each entity then goes through a single
//! normalization step that produces a display-ready view, so renderers never
//! re-implement fallback rules.
//!
//! ## Submodules
//!
//! - [`program`] - Programs, their details and categories
//! - [`article`] - Articles attached to a program
//! - [`submission`] - Contact form submissions

mod article;
mod lenient;
mod program;
mod submission;

pub use article::{Article, ArticleView};
pub use program::{Program, ProgramCategory, ProgramDetails, ProgramView, sort_by_order};
pub use submission::{
    FormSubmission, HONEYPOT_FIELD, LABEL_FIELD, PAGE_FIELD, SUBMITTED_AT_FIELD, SubmissionMeta,
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Placeholder shown for missing values.
pub const PLACEHOLDER: &str = "—";

static NULL: Value = Value::Null;

/// Returns the `data` member of a backend envelope (`{ success, data }`).
///
/// Anything else yields `Value::Null`, which collections treat as empty.
pub fn envelope_data(body: &Value) -> &Value {
    body.get("data").unwrap_or(&NULL)
}

/// Deserializes a collection of records from an arbitrary JSON value.
///
/// A value that is not an array is treated as an empty collection. Array
/// elements that cannot be read as `T` are skipped.
pub fn collection_from_value<T: DeserializeOwned>(value: &Value) -> Vec<T> {
    let Value::Array(items) = value else {
        if !value.is_null() {
            warn!(kind = json_kind(value), "Expected an array, treating as empty");
        }
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
