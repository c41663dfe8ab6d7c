//! Contact forms.
//!
//! Two forms exist, volunteer and partner. Each one can be sent to the REST
//! backend as JSON or to a third-party relay as multipart data. Both share
//! the same flow:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──▶ Success
//!   │                    └──────▶ Failed
//!   ├─ unconfigured target ─────▶ Failed   (no request)
//!   └─ honeypot filled ─────────▶ Success  (no request)
//! ```
//!
//! A submission dropped while `Submitting` returns the form to `Idle`.
//!
//! Terminal states are transient: controls are re-enabled as soon as the
//! submission ends, and the next submit starts over.

mod error;
mod flow;
mod target;

pub use error::SubmitError;
pub use flow::{FormController, FormState, FormStatus, PendingSubmit, SubmitOutcome, SubmitStart};
pub use target::{FormKind, FormTarget};
