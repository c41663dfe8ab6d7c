//! Timeout-bounded HTTP client.
//!
//! Every call is a single round trip: send the request, read the whole
//! body, return. If that does not finish before the deadline, the in-flight
//! future is dropped, which aborts the connection, and the call fails with
//! [`FetchError::Timeout`]. There is no retry.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, StatusCode, header, multipart};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::classify::{Payload, classify};
use crate::error::FetchError;

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// User agent string for the site client.
const USER_AGENT: &str = concat!("edha-site/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Request
// ============================================================================

/// Body of an outgoing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// Multipart form with text parts, in order.
    Multipart(Vec<(String, String)>),
}

/// A single outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    url: Url,
    body: RequestBody,
    timeout: Option<Duration>,
}

impl Request {
    /// Creates a GET request.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    /// Creates a POST request with a JSON body.
    pub fn post_json(url: Url, body: Value) -> Self {
        Self {
            method: Method::POST,
            url,
            body: RequestBody::Json(body),
            timeout: None,
        }
    }

    /// Creates a POST request with a multipart body.
    pub fn post_multipart<I, K, V>(url: Url, parts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: Method::POST,
            url,
            body: RequestBody::Multipart(
                parts
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            timeout: None,
        }
    }

    /// Overrides the client's deadline for this request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request body.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }
}

// ============================================================================
// Raw Response
// ============================================================================

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Status code.
    pub status: StatusCode,
    /// Declared content type, empty when absent.
    pub content_type: String,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response from its parts.
    pub fn new(
        status: StatusCode,
        content_type: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Returns true if the content type declares JSON.
    pub fn is_json(&self) -> bool {
        self.content_type
            .to_ascii_lowercase()
            .contains("application/json")
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client with a per-request deadline.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a client with the default 8 s deadline.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom deadline.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let inner = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { inner, timeout })
    }

    /// Default deadline applied to requests without their own.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs one round trip and returns the raw response.
    ///
    /// Failure statuses are not errors at this level.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn send(&self, request: Request) -> Result<RawResponse, FetchError> {
        let deadline = request.timeout.unwrap_or(self.timeout);
        let started = Instant::now();

        let builder = self.build(request);
        let round_trip = async move {
            let response = builder.send().await?;
            let status = response.status();
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let body = response.bytes().await?;
            Ok::<_, FetchError>(RawResponse::new(status, content_type, body.to_vec()))
        };

        match tokio::time::timeout(deadline, round_trip).await {
            Ok(Ok(raw)) => {
                debug!(
                    status = %raw.status,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Response received"
                );
                Ok(raw)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Request failed");
                Err(e)
            }
            Err(_) => {
                warn!(timeout_ms = deadline.as_millis(), "Request aborted after deadline");
                Err(FetchError::Timeout(deadline))
            }
        }
    }

    /// Sends a request and classifies the response.
    pub async fn fetch(&self, request: Request) -> Result<Payload, FetchError> {
        let raw = self.send(request).await?;
        classify(&raw)
    }

    fn build(&self, request: Request) -> reqwest::RequestBuilder {
        let builder = self
            .inner
            .request(request.method, request.url)
            .header(header::ACCEPT, "application/json");

        match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => {
                let form = parts
                    .into_iter()
                    .fold(multipart::Form::new(), |form, (k, v)| form.text(k, v));
                builder.multipart(form)
            }
        }
    }
}

impl Default for HttpClient {
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built. This should only occur
    /// if the system's TLS configuration is fundamentally broken.
    fn default() -> Self {
        Self::new().unwrap_or_else(|e| {
            panic!(
                "Failed to create HTTP client: {e}. \
                This usually indicates a broken TLS/SSL configuration."
            )
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(HttpClient::new().unwrap().timeout(), Duration::from_secs(8));
        assert_eq!(
            HttpClient::with_timeout(Duration::from_millis(250))
                .unwrap()
                .timeout(),
            Duration::from_millis(250)
        );
        assert_eq!(HttpClient::default().timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_request_builders() {
        let get = Request::get(url("http://localhost:5000/api/programs"));
        assert_eq!(get.method(), &Method::GET);
        assert_eq!(get.body(), &RequestBody::Empty);

        let post = Request::post_multipart(url("https://relay.example/f/abc"), [("name", "Awa")])
            .timeout(Duration::from_secs(1));
        assert_eq!(post.method(), &Method::POST);
        assert_eq!(
            post.body(),
            &RequestBody::Multipart(vec![("name".to_string(), "Awa".to_string())])
        );
        assert_eq!(post.timeout, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_json_content_type_detection() {
        let json = RawResponse::new(StatusCode::OK, "application/json; charset=utf-8", "{}");
        assert!(json.is_json());
        let upper = RawResponse::new(StatusCode::OK, "Application/JSON", "{}");
        assert!(upper.is_json());
        let html = RawResponse::new(StatusCode::OK, "text/html", "<p>");
        assert!(!html.is_json());
        let none = RawResponse::new(StatusCode::OK, "", "");
        assert!(!none.is_json());
    }
}
