//! Command dispatch.
//!
//! A view sends [`UiCommand`]s and renders the [`ViewUpdate`]s that come
//! back. Network commands run as independent tasks, so the program grid, the
//! program page and each form progress concurrently. Field edits are
//! applied in order, and a submit snapshots its fields before the next
//! command is read.

use std::sync::Arc;

use edha_fetch::{HttpClient, SiteConfig};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use crate::client::SiteClient;
use crate::error::SiteError;
use crate::forms::{FormController, FormKind, FormStatus, FormTarget, SubmitOutcome, SubmitStart};
use crate::page::slug_from_page_url;
use crate::render::{
    DetailState, GridState, render_detail_page, render_form_status, render_programs_grid,
};
use crate::transport::Transport;

/// Capacity of the command and update channels.
const CHANNEL_CAPACITY: usize = 32;

// ============================================================================
// Messages
// ============================================================================

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// The page with the program grid was opened.
    LoadPrograms,
    /// The program page was opened at this URL.
    LoadProgram {
        /// Full page URL, carrying `?slug=`.
        page_url: Url,
    },
    /// A form field was edited.
    SetField {
        /// Form being edited.
        form: FormKind,
        /// Field name.
        name: String,
        /// New value.
        value: String,
    },
    /// A form was submitted.
    SubmitForm {
        /// Form being submitted.
        form: FormKind,
    },
}

/// New content for one component. Each update replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewUpdate {
    /// Program grid.
    ProgramsGrid {
        /// Grid state.
        grid: GridState,
    },
    /// Program page.
    ProgramDetail {
        /// Page state.
        page: DetailState,
    },
    /// Form status line.
    Form {
        /// Which form.
        form: FormKind,
        /// Its status.
        status: FormStatus,
    },
}

impl ViewUpdate {
    /// Renders the update as an HTML fragment.
    pub fn render_html(&self) -> String {
        match self {
            Self::ProgramsGrid { grid } => render_programs_grid(grid),
            Self::ProgramDetail { page } => render_detail_page(page),
            Self::Form { form, status } => render_form_status(*form, status),
        }
    }

    /// Returns true for updates that still have a follow-up coming.
    pub fn is_pending(&self) -> bool {
        match self {
            Self::ProgramsGrid { grid } => matches!(grid, GridState::Loading),
            Self::ProgramDetail { page } => matches!(page, DetailState::Loading),
            Self::Form { status, .. } => !status.controls_enabled,
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Runs commands against the site client and the two forms.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    site: SiteClient,
    volunteer: Arc<FormController>,
    partner: Arc<FormController>,
}

impl Dispatcher {
    /// Assembles a dispatcher from its parts.
    pub fn new(site: SiteClient, volunteer: FormController, partner: FormController) -> Self {
        Self {
            site,
            volunteer: Arc::new(volunteer),
            partner: Arc::new(partner),
        }
    }

    /// Builds a dispatcher over HTTP from configuration.
    pub fn from_config(config: &SiteConfig) -> Result<Self, SiteError> {
        let http = HttpClient::with_timeout(config.timeout())?;
        Self::with_transport(config, Arc::new(http))
    }

    /// Builds a dispatcher over any transport from configuration.
    ///
    /// The API base and form targets are resolved here, once.
    pub fn with_transport(
        config: &SiteConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SiteError> {
        let api = config.api_base()?;
        let site_url = config.site_url()?;
        info!(api_base = %api, forms = ?config.forms.mode, "Dispatcher configured");

        let form = |kind: FormKind| -> Result<FormController, SiteError> {
            let target = FormTarget::from_config(config, &api, kind)?;
            debug!(form = %kind, configured = target.is_configured(), "Form target resolved");
            Ok(FormController::new(
                kind,
                target,
                Arc::clone(&transport),
                site_url.as_str(),
            ))
        };
        let volunteer = form(FormKind::Volunteer)?;
        let partner = form(FormKind::Partner)?;

        Ok(Self::new(
            SiteClient::new(Arc::clone(&transport), api),
            volunteer,
            partner,
        ))
    }

    /// The program loader.
    pub fn site(&self) -> &SiteClient {
        &self.site
    }

    /// A form controller.
    pub fn form(&self, kind: FormKind) -> &Arc<FormController> {
        match kind {
            FormKind::Volunteer => &self.volunteer,
            FormKind::Partner => &self.partner,
        }
    }

    /// Handles one command, emitting every update it produces.
    pub async fn handle(&self, command: UiCommand, updates: &mpsc::Sender<ViewUpdate>) {
        match command {
            UiCommand::LoadPrograms => self.load_programs(updates).await,
            UiCommand::LoadProgram { page_url } => self.load_program(&page_url, updates).await,
            UiCommand::SetField { form, name, value } => {
                if !self.form(form).set_field(name, value) {
                    debug!(form = %form, "Field edit ignored while submitting");
                }
            }
            UiCommand::SubmitForm { form } => {
                let start = self.form(form).begin();
                self.submit(form, start, updates).await;
            }
        }
    }

    /// Consumes commands until the sender is dropped, then waits for the
    /// commands still running.
    pub async fn run(
        self,
        mut commands: mpsc::Receiver<UiCommand>,
        updates: mpsc::Sender<ViewUpdate>,
    ) {
        let mut tasks = JoinSet::new();

        while let Some(command) = commands.recv().await {
            match command {
                UiCommand::SetField { .. } => self.handle(command, &updates).await,
                UiCommand::SubmitForm { form } => {
                    // Fields are captured here, ahead of any later edit.
                    let start = self.form(form).begin();
                    let (this, updates) = (self.clone(), updates.clone());
                    tasks.spawn(async move { this.submit(form, start, &updates).await });
                }
                UiCommand::LoadPrograms | UiCommand::LoadProgram { .. } => {
                    let (this, updates) = (self.clone(), updates.clone());
                    tasks.spawn(async move { this.handle(command, &updates).await });
                }
            }
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "Command task failed");
            }
        }
        debug!("Dispatcher stopped");
    }

    /// Starts [`run`](Self::run) on the current runtime.
    ///
    /// The update stream ends once the command sender is dropped and every
    /// running command has finished.
    pub fn spawn(self) -> (mpsc::Sender<UiCommand>, mpsc::Receiver<ViewUpdate>) {
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (update_tx, update_rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(self.run(command_rx, update_tx));
        (command_tx, update_rx)
    }

    async fn load_programs(&self, updates: &mpsc::Sender<ViewUpdate>) {
        emit(updates, ViewUpdate::ProgramsGrid { grid: GridState::Loading }).await;

        let grid = match self.site.programs().await {
            Ok(programs) => GridState::from_programs(programs),
            Err(e) => {
                warn!(error = %e, "Program list failed");
                GridState::Failed {
                    message: e.user_message(),
                    api_base: self.site.api_base().to_string(),
                }
            }
        };
        emit(updates, ViewUpdate::ProgramsGrid { grid }).await;
    }

    async fn load_program(&self, page_url: &Url, updates: &mpsc::Sender<ViewUpdate>) {
        emit(updates, ViewUpdate::ProgramDetail { page: DetailState::Loading }).await;

        let loaded = match slug_from_page_url(page_url) {
            Ok(slug) => self.site.program_detail(&slug).await,
            Err(e) => Err(e),
        };
        let page = match loaded {
            Ok(detail) => DetailState::Loaded {
                detail: Box::new(detail),
            },
            Err(e) => {
                warn!(error = %e, "Program page failed");
                DetailState::Failed {
                    message: e.user_message(),
                }
            }
        };
        emit(updates, ViewUpdate::ProgramDetail { page }).await;
    }

    async fn submit(
        &self,
        form: FormKind,
        start: SubmitStart,
        updates: &mpsc::Sender<ViewUpdate>,
    ) {
        match start {
            SubmitStart::Pending(pending) => {
                let status = self.form(form).status();
                emit(updates, ViewUpdate::Form { form, status }).await;
                let status = pending.send().await;
                emit(updates, ViewUpdate::Form { form, status }).await;
            }
            SubmitStart::Done(SubmitOutcome::Completed(status)) => {
                emit(updates, ViewUpdate::Form { form, status }).await;
            }
            SubmitStart::Done(SubmitOutcome::Busy) => {
                debug!(form = %form, "Submit ignored, already in flight");
            }
        }
    }
}

async fn emit(updates: &mpsc::Sender<ViewUpdate>, update: ViewUpdate) {
    if updates.send(update).await.is_err() {
        debug!("View closed, dropping update");
    }
}
