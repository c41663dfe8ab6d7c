//! CLI command implementations.

pub mod config;
pub mod form;
pub mod program;
pub mod programs;

use anyhow::{Result, anyhow};
use edha_site::{DetailState, Dispatcher, FormState, GridState, UiCommand, ViewUpdate, messages};
use tracing::debug;

use crate::output::format_update;
use crate::{Cli, ExitCode};

/// Runs commands through a dispatcher and collects every update, in order.
pub async fn drive(dispatcher: Dispatcher, commands: Vec<UiCommand>) -> Result<Vec<ViewUpdate>> {
    let (tx, mut rx) = dispatcher.spawn();
    for command in commands {
        debug!(command = ?command, "Dispatching");
        tx.send(command)
            .await
            .map_err(|_| anyhow!("dispatcher stopped early"))?;
    }
    drop(tx);

    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }
    Ok(updates)
}

/// Prints updates and derives the exit code from the last one.
///
/// Pending updates are progress and go to stderr; the final one is the
/// command's output.
pub fn report(updates: &[ViewUpdate], cli: &Cli) -> Result<ExitCode> {
    let Some((last, pending)) = updates.split_last() else {
        return Err(anyhow!("no view update produced"));
    };

    if !cli.quiet {
        for update in pending {
            eprintln!("{}", format_update(update, cli.format, false)?);
        }
    }
    println!("{}", format_update(last, cli.format, cli.pretty)?);

    Ok(exit_code(last))
}

/// Exit code matching a final view update.
pub fn exit_code(update: &ViewUpdate) -> ExitCode {
    let failure = match update {
        ViewUpdate::ProgramsGrid {
            grid: GridState::Failed { message, .. },
        }
        | ViewUpdate::ProgramDetail {
            page: DetailState::Failed { message },
        } => Some(message.as_str()),
        ViewUpdate::Form { status, .. } if status.state == FormState::Failed => {
            Some(status.message.as_deref().unwrap_or_default())
        }
        _ => None,
    };

    match failure {
        None => ExitCode::Success,
        Some(messages::TOO_SLOW) => ExitCode::Timeout,
        Some(_) => ExitCode::Error,
    }
}
