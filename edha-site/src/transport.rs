//! Transport seam between page logic and the network.
//!
//! Loaders and forms talk to a [`Transport`] rather than to the HTTP client
//! directly, so tests can count and script requests.

use async_trait::async_trait;
use edha_fetch::{FetchError, HttpClient, RawResponse, Request};

/// Something that can perform one request round trip.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the fully read response.
    async fn send(&self, request: Request) -> Result<RawResponse, FetchError>;
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: Request) -> Result<RawResponse, FetchError> {
        HttpClient::send(self, request).await
    }
}
