//! Programs command - render the program grid.

use anyhow::Result;
use edha_site::{Dispatcher, UiCommand};
use tracing::info;

use super::{drive, report};
use crate::settings::{self, Overrides};
use crate::{Cli, ExitCode};

/// Runs the programs command.
pub async fn run(cli: &Cli) -> Result<ExitCode> {
    let config = settings::resolve(&Overrides::from(cli))?;
    let dispatcher = Dispatcher::from_config(&config)?;
    info!(api_base = %dispatcher.site().api_base(), "Loading programs");

    let updates = drive(dispatcher, vec![UiCommand::LoadPrograms]).await?;
    report(&updates, cli)
}
