//! Program loaders.
//!
//! Reads go through the [`Transport`], are classified, then normalized into
//! display records. There is no caching and no retry.

use std::sync::Arc;

use edha_core::{
    Article, ArticleView, Program, ProgramView, collection_from_value, envelope_data, sort_by_order,
};
use edha_fetch::{ApiBase, HttpClient, Request, classify};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::SiteError;
use crate::transport::Transport;

/// A loaded program page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramDetail {
    /// The program.
    pub program: ProgramView,
    /// Its published articles, in backend order.
    pub articles: Vec<ArticleView>,
}

/// Client for the backend's program endpoints.
#[derive(Clone)]
pub struct SiteClient {
    transport: Arc<dyn Transport>,
    api: ApiBase,
}

impl std::fmt::Debug for SiteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteClient").field("api", &self.api).finish_non_exhaustive()
    }
}

impl SiteClient {
    /// Creates a client over any transport.
    pub fn new(transport: Arc<dyn Transport>, api: ApiBase) -> Self {
        Self { transport, api }
    }

    /// Creates a client over HTTP.
    pub fn over_http(http: HttpClient, api: ApiBase) -> Self {
        Self::new(Arc::new(http), api)
    }

    /// The resolved API base.
    pub fn api_base(&self) -> &ApiBase {
        &self.api
    }

    /// The shared transport.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    async fn get_json(&self, segments: &[&str]) -> Result<Value, SiteError> {
        let url = self.api.endpoint(segments)?;
        let raw = self.transport.send(Request::get(url)).await?;
        Ok(classify(&raw)?.into_json())
    }

    /// Loads all programs, sorted by `order`.
    #[instrument(skip(self))]
    pub async fn programs(&self) -> Result<Vec<ProgramView>, SiteError> {
        let body = self.get_json(&["programs"]).await?;
        let programs: Vec<Program> = collection_from_value(envelope_data(&body));

        let mut views: Vec<ProgramView> = programs.iter().map(Program::normalize).collect();
        sort_by_order(&mut views);

        info!(count = views.len(), "Programs loaded");
        Ok(views)
    }

    /// Resolves a program by slug.
    #[instrument(skip(self))]
    pub async fn program_by_slug(&self, slug: &str) -> Result<Program, SiteError> {
        let body = self.get_json(&["programs", "slug", slug]).await?;
        // An unreadable record normalizes to an empty program, which then
        // fails on its missing identifier.
        let program = Program::deserialize(envelope_data(&body)).unwrap_or_else(|e| {
            debug!(error = %e, "Program envelope unreadable");
            Program::default()
        });
        Ok(program)
    }

    /// Loads the articles of a program by internal identifier.
    #[instrument(skip(self))]
    pub async fn program_articles(&self, program_id: &str) -> Result<Vec<ArticleView>, SiteError> {
        let body = self.get_json(&["programs", program_id, "articles"]).await?;
        let articles: Vec<Article> = collection_from_value(envelope_data(&body));
        Ok(articles.iter().map(Article::normalize).collect())
    }

    /// Loads a program page: the program by slug, then its articles.
    ///
    /// Both requests must succeed; any failure aborts the whole page.
    pub async fn program_detail(&self, slug: &str) -> Result<ProgramDetail, SiteError> {
        let program = self.program_by_slug(slug).await?;
        let program_id = program.require_id()?.to_string();
        let articles = self.program_articles(&program_id).await?;

        info!(slug, articles = articles.len(), "Program page loaded");
        Ok(ProgramDetail {
            program: program.normalize(),
            articles,
        })
    }
}
