// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # EDHA Fetch
//!
//! Network plumbing for the EDHA site client.
//!
//! ## Request
//!
//! - [`client::HttpClient`] - Single round trip bounded by a deadline
//!   (8 s by default). No retry: a failed or timed-out attempt is returned
//!   to the caller as is.
//! - [`client::Request`] - Endpoint, optional JSON or multipart body and an
//!   optional per-request timeout.
//!
//! ## Classification
//!
//! - [`classify::classify`] - Decodes a response as JSON or text based on
//!   its content type and turns failure statuses into a readable message.
//!
//! ## Configuration
//!
//! - [`config::SiteConfig`] - File/env backed settings
//! - [`config::ApiBase`] - API base URL, resolved once at startup
//!
//! ## Example
//!
//! ```ignore
//! use edha_fetch::{ApiBase, HttpClient, Request};
//!
//! let base = ApiBase::resolve(None, &site_url)?;
//! let client = HttpClient::new()?;
//! let payload = client.fetch(Request::get(base.endpoint(&["programs"]))).await?;
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod error;

// Errors
pub use error::{ConfigError, FetchError};

// Request & classification
pub use classify::{Payload, classify};
pub use client::{DEFAULT_TIMEOUT, HttpClient, RawResponse, Request, RequestBody};
pub use reqwest::StatusCode;

// Configuration
pub use config::{
    ApiBase, FormsConfig, FormsMode, PLACEHOLDER_MARKER, RelayConfig, SiteConfig,
    is_placeholder_target,
};
