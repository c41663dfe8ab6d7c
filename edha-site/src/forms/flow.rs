//! Submission state machine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use edha_core::{FormSubmission, SubmissionMeta};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::error::SubmitError;
use super::target::{FormKind, FormTarget};
use crate::messages;
use crate::transport::Transport;

// ============================================================================
// State
// ============================================================================

/// Where a form is in its submission cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    /// Ready for input.
    #[default]
    Idle,
    /// A request is in flight.
    Submitting,
    /// The last submission was accepted.
    Success,
    /// The last submission failed.
    Failed,
}

impl FormState {
    /// Lowercase name, as used in markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// What the form shows: state, status line and whether controls accept input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStatus {
    /// Current state.
    pub state: FormState,
    /// Status line under the form, if any.
    pub message: Option<String>,
    /// False while a request is in flight.
    pub controls_enabled: bool,
}

impl Default for FormStatus {
    fn default() -> Self {
        Self {
            state: FormState::Idle,
            message: None,
            controls_enabled: true,
        }
    }
}

impl FormStatus {
    fn sending() -> Self {
        Self {
            state: FormState::Submitting,
            message: Some(messages::SENDING.to_string()),
            controls_enabled: false,
        }
    }

    fn finished(state: FormState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: Some(message.into()),
            controls_enabled: true,
        }
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The attempt ran to a terminal state.
    Completed(FormStatus),
    /// Another submission of the same form was in flight; nothing was sent.
    Busy,
}

/// What [`FormController::begin`] did.
#[derive(Debug)]
pub enum SubmitStart {
    /// The form is `Submitting`; the request still has to be sent.
    Pending(PendingSubmit),
    /// Settled without a request, or refused.
    Done(SubmitOutcome),
}

/// A submission whose request has not completed yet.
///
/// The form stays `Submitting` while this is alive. Dropping it before
/// [`send`](Self::send) returns puts the form back to `Idle` with the
/// fields kept and the controls enabled.
#[derive(Debug)]
pub struct PendingSubmit {
    form: Arc<FormController>,
    submission: FormSubmission,
    settled: bool,
}

impl PendingSubmit {
    /// The snapshot that will be sent, metadata included.
    pub fn submission(&self) -> &FormSubmission {
        &self.submission
    }

    /// Sends the request and settles the form.
    #[instrument(skip(self), fields(form = %self.form.kind))]
    pub async fn send(mut self) -> FormStatus {
        let result = self.form.deliver(&self.submission).await;
        let status = self.form.settle(result);
        self.settled = true;
        status
    }
}

impl Drop for PendingSubmit {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(form = %self.form.kind, "Submission abandoned before completion");
        let mut inner = self.form.lock();
        if inner.status.state == FormState::Submitting {
            self.form.publish(&mut inner, FormStatus::default());
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Debug, Default)]
struct FormInner {
    fields: FormSubmission,
    status: FormStatus,
}

/// One form instance.
///
/// Holds the fields typed so far and the submission state. Status changes
/// are published on a watch channel so a view can follow `Submitting`
/// before the final outcome.
pub struct FormController {
    kind: FormKind,
    target: FormTarget,
    transport: Arc<dyn Transport>,
    page_url: String,
    inner: Mutex<FormInner>,
    status_tx: watch::Sender<FormStatus>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("page_url", &self.page_url)
            .finish_non_exhaustive()
    }
}

impl FormController {
    /// Creates an idle form.
    ///
    /// `page_url` is the page hosting the form, injected into submissions.
    pub fn new(
        kind: FormKind,
        target: FormTarget,
        transport: Arc<dyn Transport>,
        page_url: impl Into<String>,
    ) -> Self {
        let (status_tx, _) = watch::channel(FormStatus::default());
        Self {
            kind,
            target,
            transport,
            page_url: page_url.into(),
            inner: Mutex::new(FormInner::default()),
            status_tx,
        }
    }

    /// Which form this is.
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Where submissions go.
    pub fn target(&self) -> &FormTarget {
        &self.target
    }

    /// Current status.
    pub fn status(&self) -> FormStatus {
        self.lock().status.clone()
    }

    /// Follows status changes.
    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status_tx.subscribe()
    }

    /// Snapshot of the fields typed so far.
    pub fn fields(&self) -> FormSubmission {
        self.lock().fields.clone()
    }

    /// Sets a field value.
    ///
    /// Returns false, leaving the field untouched, while controls are
    /// disabled.
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let mut inner = self.lock();
        if !inner.status.controls_enabled {
            return false;
        }
        inner.fields.set(name, value);
        true
    }

    /// Submits the form.
    ///
    /// At most one request per form is in flight; a submit issued meanwhile
    /// returns [`SubmitOutcome::Busy`] without touching the network.
    pub async fn submit(self: &Arc<Self>) -> SubmitOutcome {
        match self.begin() {
            SubmitStart::Pending(pending) => SubmitOutcome::Completed(pending.send().await),
            SubmitStart::Done(outcome) => outcome,
        }
    }

    /// Leaves `Idle` without waiting for the network.
    ///
    /// Checks, snapshots the fields and disables the controls under one
    /// lock, so edits made afterwards belong to the next submission. Only
    /// [`SubmitStart::Pending`] needs a request.
    #[instrument(skip(self), fields(form = %self.kind))]
    pub fn begin(self: &Arc<Self>) -> SubmitStart {
        let mut inner = self.lock();

        if inner.status.state == FormState::Submitting {
            debug!("Submission already in flight");
            return SubmitStart::Done(SubmitOutcome::Busy);
        }

        if !self.target.is_configured() {
            warn!("Form target not configured");
            let message = SubmitError::NotConfigured.user_message();
            let status = FormStatus::finished(FormState::Failed, message);
            let status = self.publish(&mut inner, status);
            return SubmitStart::Done(SubmitOutcome::Completed(status));
        }

        if inner.fields.honeypot_triggered() {
            info!("Honeypot filled, discarding submission");
            inner.fields.clear();
            let message = self.kind.success_message();
            let status = FormStatus::finished(FormState::Success, message);
            let status = self.publish(&mut inner, status);
            return SubmitStart::Done(SubmitOutcome::Completed(status));
        }

        let meta = SubmissionMeta::now(self.page_url.as_str(), self.kind.label());
        let submission = inner.fields.with_metadata(&meta);
        self.publish(&mut inner, FormStatus::sending());

        SubmitStart::Pending(PendingSubmit {
            form: Arc::clone(self),
            submission,
            settled: false,
        })
    }

    fn settle(&self, result: Result<(), SubmitError>) -> FormStatus {
        let mut inner = self.lock();
        let status = match result {
            Ok(()) => {
                info!(form = %self.kind, "Form submitted");
                inner.fields.clear();
                FormStatus::finished(FormState::Success, self.kind.success_message())
            }
            Err(e) => {
                warn!(form = %self.kind, error = %e, "Form submission failed");
                FormStatus::finished(FormState::Failed, e.user_message())
            }
        };
        self.publish(&mut inner, status)
    }

    async fn deliver(&self, submission: &FormSubmission) -> Result<(), SubmitError> {
        let request = self.target.request(submission)?;
        let raw = self.transport.send(request).await?;
        debug!(status = %raw.status, "Form endpoint answered");

        if raw.is_success() {
            Ok(())
        } else {
            Err(self.target.failure(&raw))
        }
    }

    fn publish(&self, inner: &mut FormInner, status: FormStatus) -> FormStatus {
        inner.status = status.clone();
        self.status_tx.send_replace(status.clone());
        status
    }

    fn lock(&self) -> MutexGuard<'_, FormInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use edha_core::{HONEYPOT_FIELD, LABEL_FIELD, PAGE_FIELD, SUBMITTED_AT_FIELD};
    use edha_fetch::{FetchError, RawResponse, Request, RequestBody, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use url::Url;

    struct ScriptedTransport {
        calls: AtomicUsize,
        delay: Duration,
        reply: Result<RawResponse, fn() -> FetchError>,
        sent: Mutex<Vec<Request>>,
    }

    impl ScriptedTransport {
        fn replying(status: u16, content_type: &str, body: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                reply: Ok(RawResponse::new(
                    StatusCode::from_u16(status).unwrap(),
                    content_type,
                    body,
                )),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
                reply: Ok(RawResponse::new(StatusCode::OK, "application/json", "{}")),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: fn() -> FetchError) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                reply: Err(err),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: Request) -> Result<RawResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(request);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.reply {
                Ok(raw) => Ok(raw.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn relay() -> FormTarget {
        FormTarget::Relay(Url::parse("https://relay.example/f/abc").unwrap())
    }

    fn backend() -> FormTarget {
        FormTarget::Backend(Url::parse("https://edha.org/api/volunteers").unwrap())
    }

    fn form(target: FormTarget, transport: Arc<ScriptedTransport>) -> Arc<FormController> {
        let form = Arc::new(FormController::new(
            FormKind::Volunteer,
            target,
            transport,
            "https://edha.org/index.html",
        ));
        form.set_field("name", "Awa");
        form.set_field("email", "awa@example.org");
        form
    }

    fn completed(outcome: SubmitOutcome) -> FormStatus {
        match outcome {
            SubmitOutcome::Completed(status) => status,
            SubmitOutcome::Busy => panic!("unexpected busy outcome"),
        }
    }

    #[tokio::test]
    async fn test_success_clears_fields() {
        let transport = ScriptedTransport::replying(200, "application/json", r#"{"ok":true}"#);
        let form = form(relay(), transport.clone());

        let status = completed(form.submit().await);

        assert_eq!(status.state, FormState::Success);
        assert_eq!(status.message.as_deref(), Some(messages::VOLUNTEER_SENT));
        assert!(status.controls_enabled);
        assert!(form.fields().is_empty());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_metadata_is_injected() {
        let transport = ScriptedTransport::replying(200, "application/json", "{}");
        let form = form(relay(), transport.clone());
        completed(form.submit().await);

        let sent = transport.sent.lock().unwrap();
        let RequestBody::Multipart(parts) = sent[0].body() else {
            panic!("relay submissions are multipart");
        };
        let get = |name: &str| parts.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());
        assert_eq!(get("name"), Some("Awa"));
        assert_eq!(get(PAGE_FIELD), Some("https://edha.org/index.html"));
        assert_eq!(get(LABEL_FIELD), Some("Bénévolat"));
        assert_eq!(get(HONEYPOT_FIELD), Some(""));
        assert!(get(SUBMITTED_AT_FIELD).is_some_and(|t| t.ends_with('Z')));
    }

    #[tokio::test]
    async fn test_backend_sends_json() {
        let transport = ScriptedTransport::replying(201, "application/json", "{}");
        let form = form(backend(), transport.clone());
        completed(form.submit().await);

        let sent = transport.sent.lock().unwrap();
        let RequestBody::Json(body) = sent[0].body() else {
            panic!("backend submissions are JSON");
        };
        assert_eq!(body["email"], "awa@example.org");
        assert_eq!(body[LABEL_FIELD], "Bénévolat");
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_rejected() {
        let transport = ScriptedTransport::slow(Duration::from_millis(50));
        let form = form(relay(), transport.clone());

        let (first, second) = tokio::join!(form.submit(), form.submit());

        assert_eq!(completed(first).state, FormState::Success);
        assert_eq!(second, SubmitOutcome::Busy);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_controls_disabled_while_submitting() {
        let transport = ScriptedTransport::slow(Duration::from_millis(100));
        let form = form(relay(), transport);
        let mut updates = form.subscribe();

        let task = tokio::spawn({
            let form = Arc::clone(&form);
            async move { form.submit().await }
        });

        updates.changed().await.unwrap();
        let sending = updates.borrow_and_update().clone();
        assert_eq!(sending.state, FormState::Submitting);
        assert_eq!(sending.message.as_deref(), Some(messages::SENDING));
        assert!(!sending.controls_enabled);
        assert!(!form.set_field("name", "Other"));

        completed(task.await.unwrap());
        assert!(form.status().controls_enabled);
        assert!(form.set_field("name", "Other"));
    }

    #[tokio::test]
    async fn test_aborted_submit_restores_controls() {
        let transport = ScriptedTransport::slow(Duration::from_secs(5));
        let form = form(relay(), transport.clone());
        let mut updates = form.subscribe();

        let task = tokio::spawn({
            let form = Arc::clone(&form);
            async move { form.submit().await }
        });
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().state, FormState::Submitting);

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let status = form.status();
        assert_eq!(status.state, FormState::Idle);
        assert!(status.controls_enabled);
        assert_eq!(form.fields().get("name"), Some("Awa"));
        assert!(form.set_field("name", "Awa Diop"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_submit_after_abort_is_not_busy() {
        let transport = ScriptedTransport::slow(Duration::from_millis(20));
        let form = form(relay(), transport.clone());

        let abandoned = tokio::time::timeout(Duration::from_millis(1), form.submit()).await;
        assert!(abandoned.is_err());

        assert_eq!(completed(form.submit().await).state, FormState::Success);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_pending_dropped_before_send() {
        let transport = ScriptedTransport::replying(200, "application/json", "{}");
        let form = form(backend(), transport.clone());

        let SubmitStart::Pending(pending) = form.begin() else {
            panic!("expected a pending submission");
        };
        assert_eq!(pending.submission().get("name"), Some("Awa"));
        assert_eq!(form.status().state, FormState::Submitting);
        assert!(!form.set_field("name", "Other"));

        drop(pending);

        assert_eq!(form.status(), FormStatus::default());
        assert_eq!(form.fields().get("name"), Some("Awa"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_edits_after_begin_wait_for_next_submission() {
        let transport = ScriptedTransport::replying(200, "application/json", "{}");
        let form = form(backend(), transport.clone());

        let SubmitStart::Pending(pending) = form.begin() else {
            panic!("expected a pending submission");
        };
        assert!(matches!(form.begin(), SubmitStart::Done(SubmitOutcome::Busy)));
        assert!(!form.set_field("email", "late@example.org"));

        let status = pending.send().await;
        assert_eq!(status.state, FormState::Success);

        let sent = transport.sent.lock().unwrap();
        let RequestBody::Json(body) = sent[0].body() else {
            panic!("backend submissions are JSON");
        };
        assert_eq!(body["email"], "awa@example.org");
    }

    #[tokio::test]
    async fn test_honeypot_claims_success_without_request() {
        let transport = ScriptedTransport::replying(200, "application/json", "{}");
        let form = form(relay(), transport.clone());
        form.set_field(HONEYPOT_FIELD, "http://spam.example");

        let status = completed(form.submit().await);

        assert_eq!(status.state, FormState::Success);
        assert!(form.fields().is_empty());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_target_fails_without_request() {
        let transport = ScriptedTransport::replying(200, "application/json", "{}");
        let form = form(
            FormTarget::relay(Some("https://formspree.io/f/YOUR_FORM_ID")),
            transport.clone(),
        );

        let status = completed(form.submit().await);

        assert_eq!(status.state, FormState::Failed);
        assert_eq!(status.message.as_deref(), Some(messages::FORM_NOT_CONFIGURED));
        assert!(status.controls_enabled);
        assert_eq!(form.fields().get("name"), Some("Awa"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_relay_validation_errors_are_joined() {
        let transport = ScriptedTransport::replying(
            422,
            "application/json",
            r#"{"errors":[{"message":"email should be an email"},{"message":"name is required"}]}"#,
        );
        let form = form(relay(), transport);

        let status = completed(form.submit().await);

        assert_eq!(status.state, FormState::Failed);
        assert_eq!(
            status.message.as_deref(),
            Some("email should be an email, name is required")
        );
        assert_eq!(form.fields().get("name"), Some("Awa"));
    }

    #[tokio::test]
    async fn test_backend_error_field_is_shown() {
        let transport =
            ScriptedTransport::replying(400, "application/json", r#"{"error":"Email invalide"}"#);
        let form = form(backend(), transport);

        let status = completed(form.submit().await);
        assert_eq!(status.message.as_deref(), Some("Email invalide"));
    }

    #[tokio::test]
    async fn test_unexplained_failure_asks_to_retry() {
        let transport = ScriptedTransport::replying(500, "text/html", "<h1>oops</h1>");
        let form = form(relay(), transport);

        let status = completed(form.submit().await);
        assert_eq!(status.state, FormState::Failed);
        assert_eq!(status.message.as_deref(), Some(messages::RETRY_LATER));
    }

    #[tokio::test]
    async fn test_timeout_message() {
        let transport =
            ScriptedTransport::failing(|| FetchError::Timeout(Duration::from_millis(8000)));
        let form = form(backend(), transport);

        let status = completed(form.submit().await);
        assert_eq!(status.state, FormState::Failed);
        assert_eq!(status.message.as_deref(), Some(messages::TOO_SLOW));
        assert!(status.controls_enabled);
    }

    #[tokio::test]
    async fn test_form_is_reusable_after_failure() {
        let transport = ScriptedTransport::failing(|| FetchError::Transport("refused".to_string()));
        let form = form(relay(), transport.clone());

        assert_eq!(completed(form.submit().await).state, FormState::Failed);
        assert_eq!(completed(form.submit().await).state, FormState::Failed);
        assert_eq!(transport.calls(), 2);
    }
}
