//! Config command - inspect the resolved configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use edha_fetch::{FormsMode, SiteConfig};
use edha_site::{FormKind, FormTarget};
use serde::Serialize;

use crate::output::JsonFormatter;
use crate::settings::{self, Overrides};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the configuration after flags and environment are applied.
    Show,

    /// Show the configuration file path.
    Path,
}

/// Configuration as the client will use it.
#[derive(Debug, Serialize)]
struct ResolvedConfig {
    config_file: String,
    site_url: String,
    api_base: String,
    timeout_ms: u64,
    forms_mode: FormsMode,
    volunteer_target: String,
    partner_target: String,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<ExitCode> {
    let overrides = Overrides::from(cli);
    match &args.action {
        ConfigAction::Show => show_config(&overrides, cli),
        ConfigAction::Path => show_path(&overrides, cli),
    }
}

fn show_config(overrides: &Overrides, cli: &Cli) -> Result<ExitCode> {
    let config = settings::resolve(overrides)?;
    let resolved = resolve(&config, overrides)?;

    match cli.format {
        OutputFormat::Html => {
            println!("EDHA Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config file:      {}", resolved.config_file);
            println!("Site URL:         {}", resolved.site_url);
            println!("API base:         {}", resolved.api_base);
            println!("Timeout:          {} ms", resolved.timeout_ms);
            println!("Forms:            {:?}", resolved.forms_mode);
            println!("Volunteer form:   {}", resolved.volunteer_target);
            println!("Partner form:     {}", resolved.partner_target);
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&resolved)?);
        }
    }

    Ok(ExitCode::Success)
}

fn show_path(overrides: &Overrides, cli: &Cli) -> Result<ExitCode> {
    let path = overrides.config_path();

    match cli.format {
        OutputFormat::Html => println!("{}", path.display()),
        OutputFormat::Json => {
            let paths = serde_json::json!({ "config_file": path.display().to_string() });
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }

    Ok(ExitCode::Success)
}

fn resolve(config: &SiteConfig, overrides: &Overrides) -> Result<ResolvedConfig> {
    let api = config.api_base()?;
    let target = |kind: FormKind| -> Result<String> {
        Ok(describe(&FormTarget::from_config(config, &api, kind)?))
    };

    Ok(ResolvedConfig {
        config_file: overrides.config_path().display().to_string(),
        site_url: config.site_url()?.to_string(),
        api_base: api.to_string(),
        timeout_ms: config.timeout_ms,
        forms_mode: config.forms.mode,
        volunteer_target: target(FormKind::Volunteer)?,
        partner_target: target(FormKind::Partner)?,
    })
}

fn describe(target: &FormTarget) -> String {
    match target {
        FormTarget::Backend(url) => format!("backend {url}"),
        FormTarget::Relay(url) => format!("relay {url}"),
        FormTarget::Unconfigured => "not configured".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_targets() {
        let mut config = SiteConfig {
            site_url: "https://edha.org/".to_string(),
            ..SiteConfig::default()
        };
        let overrides = Overrides::default();

        let resolved = resolve(&config, &overrides).unwrap();
        assert_eq!(resolved.api_base, "https://edha.org/api");
        assert_eq!(resolved.volunteer_target, "backend https://edha.org/api/volunteers");

        config.forms.mode = FormsMode::Relay;
        config.relay.partner_action = Some("https://formspree.io/f/YOUR_FORM_ID".to_string());
        let resolved = resolve(&config, &overrides).unwrap();
        assert_eq!(resolved.partner_target, "not configured");
    }
}
