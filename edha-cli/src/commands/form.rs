//! Form commands - send the volunteer or partner form.

use anyhow::Result;
use clap::Args;
use edha_fetch::FormsMode;
use edha_site::{Dispatcher, FormKind, UiCommand};
use tracing::info;

use super::{drive, report};
use crate::settings::{self, Overrides};
use crate::{Cli, ExitCode};

/// Arguments for the volunteer and partner commands.
#[derive(Args, Debug)]
pub struct FormArgs {
    /// Form field as NAME=VALUE; repeat for each field.
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Send through the form relay instead of the backend.
    #[arg(long)]
    pub relay: bool,
}

/// Runs a form command.
pub async fn run(kind: FormKind, args: &FormArgs, cli: &Cli) -> Result<ExitCode> {
    let mut config = settings::resolve(&Overrides::from(cli))?;
    if args.relay {
        config.forms.mode = FormsMode::Relay;
    }
    let dispatcher = Dispatcher::from_config(&config)?;
    info!(form = %kind, fields = args.fields.len(), "Submitting form");

    let updates = drive(dispatcher, commands(kind, &args.fields)).await?;
    report(&updates, cli)
}

/// Field edits followed by the submit.
fn commands(kind: FormKind, fields: &[(String, String)]) -> Vec<UiCommand> {
    fields
        .iter()
        .map(|(name, value)| UiCommand::SetField {
            form: kind,
            name: name.clone(),
            value: value.clone(),
        })
        .chain(std::iter::once(UiCommand::SubmitForm { form: kind }))
        .collect()
}

/// Parses `NAME=VALUE`; the value may itself contain `=`.
fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((name.to_string(), value.to_string()))
}
