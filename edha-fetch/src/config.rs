//! Site configuration and API base resolution.
//!
//! Settings come from a JSON file, then environment overrides, then CLI
//! flags. The API base URL is resolved once into an [`ApiBase`] and handed
//! to whatever issues requests; nothing reads ambient state afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::client::DEFAULT_TIMEOUT;
use crate::error::{ConfigError, FetchError};

/// Environment variable holding an explicit API base.
pub const API_ENV: &str = "EDHA_API";

/// Environment variable holding the site URL.
pub const SITE_URL_ENV: &str = "EDHA_SITE_URL";

/// API base used when the site is served from a loopback host.
pub const LOCAL_API_BASE: &str = "http://localhost:5000/api";

/// Marker left in relay URLs that were never configured.
pub const PLACEHOLDER_MARKER: &str = "YOUR_FORM_ID";

// ============================================================================
// Site Config
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// URL of the page hosting the client; decides same-origin fallbacks.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Explicit API base, `/api` prefix included.
    #[serde(default)]
    pub api_base: Option<String>,
    /// Request deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Form relay settings.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Form settings.
    #[serde(default)]
    pub forms: FormsConfig,
}

/// Third-party form relay endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Action URL for the volunteer form.
    #[serde(default)]
    pub volunteer_action: Option<String>,
    /// Action URL for the partner form.
    #[serde(default)]
    pub partner_action: Option<String>,
}

/// Form settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormsConfig {
    /// Where forms are sent.
    #[serde(default)]
    pub mode: FormsMode,
}

/// Where contact forms are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormsMode {
    /// JSON POST to the REST backend.
    #[default]
    Backend,
    /// Multipart POST to the form relay.
    Relay,
}

fn default_site_url() -> String {
    "http://localhost:8080/".to_string()
}

fn default_timeout_ms() -> u64 {
    u64::try_from(DEFAULT_TIMEOUT.as_millis()).unwrap_or(8000)
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            api_base: None,
            timeout_ms: default_timeout_ms(),
            relay: RelayConfig::default(),
            forms: FormsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("edha")
            .join("config.json")
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: SiteConfig = serde_json::from_str(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Applies environment overrides through a lookup function.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api) = get(API_ENV) {
            debug!(api = %api, "API base from environment");
            self.api_base = Some(api);
        }
        if let Some(site) = get(SITE_URL_ENV) {
            self.site_url = site;
        }
    }

    /// Request deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parses the site URL.
    pub fn site_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.site_url).map_err(|e| ConfigError::InvalidUrl {
            field: "site_url",
            reason: e.to_string(),
        })
    }

    /// Resolves the API base.
    pub fn api_base(&self) -> Result<ApiBase, ConfigError> {
        ApiBase::resolve(self.api_base.as_deref(), &self.site_url()?)
    }
}

// ============================================================================
// API Base
// ============================================================================

/// Base URL of the backend API, `/api` prefix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    url: Url,
}

impl ApiBase {
    /// Resolves the API base once.
    ///
    /// 1. An explicit base wins (trailing `/` stripped).
    /// 2. A loopback site host uses the local development backend.
    /// 3. Otherwise the API is same-origin under `/api`.
    pub fn resolve(explicit: Option<&str>, site_url: &Url) -> Result<Self, ConfigError> {
        if let Some(raw) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
            return Self::parse(raw);
        }

        if matches!(site_url.host_str(), Some("localhost" | "127.0.0.1")) {
            return Self::parse(LOCAL_API_BASE);
        }

        let mut url = site_url.clone();
        url.set_path("/api");
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { url })
    }

    /// Parses an absolute base URL.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| ConfigError::InvalidUrl {
            field: "api_base",
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                field: "api_base",
                reason: format!("{raw} cannot be a base URL"),
            });
        }
        Ok(Self { url })
    }

    /// Builds an endpoint by appending path segments.
    ///
    /// Each segment is percent-encoded as a single path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| FetchError::InvalidUrl(self.url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    /// The base URL.
    pub fn as_url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Display for ApiBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str().trim_end_matches('/'))
    }
}

/// Returns true if a relay action URL was never configured.
pub fn is_placeholder_target(action: Option<&str>) -> bool {
    match action.map(str::trim) {
        None | Some("") => true,
        Some(url) => url.contains(PLACEHOLDER_MARKER),
    }
}

// ============================================================================
// Tests
// ============================================================================
