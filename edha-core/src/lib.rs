// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # EDHA Core
//!
//! Core types, models and helpers for the EDHA site client.
//!
//! This crate provides the foundational pieces used by the other EDHA
//! crates:
//!
//! - Domain models as returned by the backend (programs, articles)
//! - One normalization step per entity producing display-ready records
//! - Form submissions with injected metadata and honeypot detection
//! - HTML escaping for every piece of text that ends up in markup
//! - Error types
//!
//! ## Key Types
//!
//! ### Programs
//! - [`Program`] - Program record as sent by the backend
//! - [`ProgramView`] - Fully populated, display-ready program
//! - [`ProgramCategory`] - Known program categories and their labels
//!
//! ### Articles
//! - [`Article`] - Article record as sent by the backend
//! - [`ArticleView`] - Display-ready article card data
//!
//! ### Forms
//! - [`FormSubmission`] - Ordered field mapping collected from a form
//! - [`SubmissionMeta`] - Metadata injected before sending

pub mod error;
pub mod html;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export helpers
pub use html::escape_html;

// Re-export all model types
pub use models::{
    // Programs
    Program,
    ProgramCategory,
    ProgramDetails,
    ProgramView,
    // Articles
    Article,
    ArticleView,
    // Forms
    FormSubmission,
    SubmissionMeta,
    HONEYPOT_FIELD,
    LABEL_FIELD,
    PAGE_FIELD,
    SUBMITTED_AT_FIELD,
    // Collections
    collection_from_value,
    envelope_data,
    sort_by_order,
    PLACEHOLDER,
};
