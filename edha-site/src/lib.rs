// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # EDHA Site
//!
//! Everything the EDHA pages do with the network, independent of any UI
//! toolkit.
//!
//! - [`client::SiteClient`] - Program list and program detail loaders
//! - [`render`] - HTML fragments for the program grid, program page and
//!   article cards
//! - [`forms`] - Volunteer and partner forms (`Idle → Submitting →
//!   Success | Failed`)
//! - [`dispatch`] - [`UiCommand`] in, [`ViewUpdate`] out
//!
//! ## Usage
//!
//! ```ignore
//! use edha_site::{Dispatcher, UiCommand};
//!
//! let dispatcher = Dispatcher::from_config(&config)?;
//! let (commands, updates) = dispatcher.spawn();
//! commands.send(UiCommand::LoadPrograms).await?;
//! while let Some(update) = updates.recv().await {
//!     println!("{}", update.render_html());
//! }
//! ```

pub mod client;
pub mod dispatch;
pub mod error;
pub mod forms;
pub mod messages;
pub mod page;
pub mod render;
pub mod transport;

pub use client::{ProgramDetail, SiteClient};
pub use dispatch::{Dispatcher, UiCommand, ViewUpdate};
pub use error::SiteError;
pub use forms::{
    FormController, FormKind, FormState, FormStatus, FormTarget, PendingSubmit, SubmitError,
    SubmitOutcome, SubmitStart,
};
pub use page::slug_from_page_url;
pub use render::{DetailState, GridState};
pub use transport::Transport;
