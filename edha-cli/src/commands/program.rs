//! Program command - render one program page.

use anyhow::Result;
use clap::{ArgGroup, Args};
use edha_site::{Dispatcher, UiCommand};
use url::Url;

use super::{drive, report};
use crate::settings::{self, Overrides};
use crate::{Cli, ExitCode};

/// Program page on the site.
const PROGRAM_PAGE: &str = "program.html";

/// Arguments for the program command.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["slug", "page_url"])))]
pub struct ProgramArgs {
    /// Program slug.
    #[arg(long)]
    pub slug: Option<String>,

    /// Full program page URL, as opened in a browser.
    #[arg(long)]
    pub page_url: Option<Url>,
}

/// Runs the program command.
pub async fn run(args: &ProgramArgs, cli: &Cli) -> Result<ExitCode> {
    let config = settings::resolve(&Overrides::from(cli))?;
    let page_url = page_url(args, &config.site_url()?)?;
    let dispatcher = Dispatcher::from_config(&config)?;

    let updates = drive(dispatcher, vec![UiCommand::LoadProgram { page_url }]).await?;
    report(&updates, cli)
}

/// The page URL to load: the given one, or the site's program page for a slug.
fn page_url(args: &ProgramArgs, site_url: &Url) -> Result<Url> {
    if let Some(url) = &args.page_url {
        return Ok(url.clone());
    }

    let mut url = site_url.join(PROGRAM_PAGE)?;
    if let Some(slug) = &args.slug {
        url.query_pairs_mut().append_pair("slug", slug);
    }
    Ok(url)
}
