//! Configuration resolution for the CLI.
//!
//! Precedence: command-line flags, then environment, then the config file,
//! then built-in defaults.

use std::path::PathBuf;

use edha_fetch::{ConfigError, SiteConfig};
use tracing::debug;

use crate::Cli;

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub api_base: Option<String>,
    pub site_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            api_base: cli.api_base.clone(),
            site_url: cli.site_url.clone(),
            timeout_ms: cli.timeout_ms,
        }
    }
}

impl Overrides {
    /// Path of the config file that will be read.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(SiteConfig::default_path)
    }

    /// Applies the flags on top of a loaded configuration.
    pub fn apply(&self, config: &mut SiteConfig) {
        if let Some(api) = self.api_base.as_deref().filter(|s| !s.trim().is_empty()) {
            config.api_base = Some(api.to_string());
        }
        if let Some(site) = &self.site_url {
            config.site_url.clone_from(site);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
    }
}

/// Loads the file, then applies environment and flag overrides.
pub fn resolve(overrides: &Overrides) -> Result<SiteConfig, ConfigError> {
    resolve_with_env(overrides, |key| std::env::var(key).ok())
}

/// [`resolve`] with an explicit environment lookup.
pub fn resolve_with_env<F>(overrides: &Overrides, env: F) -> Result<SiteConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = overrides.config_path();
    let mut config = SiteConfig::load_from(&path)?;
    config.apply_env(env);
    overrides.apply(&mut config);

    // Fail early on unusable URLs.
    let api = config.api_base()?;
    debug!(api_base = %api, timeout_ms = config.timeout_ms, "Configuration resolved");
    Ok(config)
}
