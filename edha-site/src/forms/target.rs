//! Form kinds and where they are sent.

use edha_core::FormSubmission;
use edha_fetch::{
    ApiBase, FetchError, FormsMode, RawResponse, Request, SiteConfig, classify::decode,
    classify::error_message, is_placeholder_target,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::error::SubmitError;
use crate::messages;

// ============================================================================
// Form Kind
// ============================================================================

/// The site's contact forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// "Devenir bénévole".
    Volunteer,
    /// "Devenir partenaire".
    Partner,
}

impl FormKind {
    /// Label injected into submissions.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Volunteer => "Bénévolat",
            Self::Partner => "Partenariat",
        }
    }

    /// Backend collection receiving this form.
    pub fn backend_path(&self) -> &'static str {
        match self {
            Self::Volunteer => "volunteers",
            Self::Partner => "partners",
        }
    }

    /// Confirmation shown after a successful submit.
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Volunteer => messages::VOLUNTEER_SENT,
            Self::Partner => messages::PARTNER_SENT,
        }
    }

    /// Relay action URL configured for this form.
    pub fn relay_action<'a>(&self, config: &'a SiteConfig) -> Option<&'a str> {
        match self {
            Self::Volunteer => config.relay.volunteer_action.as_deref(),
            Self::Partner => config.relay.partner_action.as_deref(),
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Volunteer => "volunteer",
            Self::Partner => "partner",
        })
    }
}

// ============================================================================
// Form Target
// ============================================================================

/// Where a form is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    /// JSON POST to `{api}/volunteers` or `{api}/partners`.
    Backend(Url),
    /// Multipart POST to a relay action URL.
    Relay(Url),
    /// Missing or placeholder target; submissions fail without a request.
    Unconfigured,
}

impl FormTarget {
    /// Backend endpoint for a form.
    pub fn backend(api: &ApiBase, kind: FormKind) -> Result<Self, FetchError> {
        Ok(Self::Backend(api.endpoint(&[kind.backend_path()])?))
    }

    /// Relay endpoint from a configured action URL.
    ///
    /// Placeholders and unparseable URLs yield [`FormTarget::Unconfigured`].
    pub fn relay(action: Option<&str>) -> Self {
        if is_placeholder_target(action) {
            return Self::Unconfigured;
        }
        action
            .and_then(|raw| Url::parse(raw.trim()).ok())
            .map_or(Self::Unconfigured, Self::Relay)
    }

    /// Target chosen by the configuration.
    pub fn from_config(
        config: &SiteConfig,
        api: &ApiBase,
        kind: FormKind,
    ) -> Result<Self, FetchError> {
        match config.forms.mode {
            FormsMode::Backend => Self::backend(api, kind),
            FormsMode::Relay => Ok(Self::relay(kind.relay_action(config))),
        }
    }

    /// Returns true if submissions can be sent.
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::Unconfigured)
    }

    /// Builds the request carrying a submission.
    pub(crate) fn request(&self, submission: &FormSubmission) -> Result<Request, SubmitError> {
        match self {
            Self::Backend(url) => Ok(Request::post_json(
                url.clone(),
                serde_json::to_value(submission)?,
            )),
            Self::Relay(url) => Ok(Request::post_multipart(url.clone(), submission.iter())),
            Self::Unconfigured => Err(SubmitError::NotConfigured),
        }
    }

    /// Interprets a non-success response.
    pub(crate) fn failure(&self, raw: &RawResponse) -> SubmitError {
        let payload = decode(raw);
        let reported = match self {
            Self::Relay(_) => relay_errors(payload.json()),
            _ => error_message(&payload).into_iter().collect(),
        };

        if reported.is_empty() {
            SubmitError::Http(raw.status.as_u16())
        } else {
            SubmitError::Validation(reported)
        }
    }
}

/// Collects `errors[].message` from a relay failure body.
fn relay_errors(body: &Value) -> Vec<String> {
    body.get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
