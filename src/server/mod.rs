//! HTTP API
//!
//! - `POST /api/match`: screenshot data URL in, ranked references out
//! - `POST /api/export-pack`: references in, ZIP attachment out
//!
//! Handlers are stateless; the index is read from disk on every request.

mod error;
mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;

use crate::core::error::{Error, Result};
use crate::core::paths::ProjectPaths;
use crate::library::GuideStore;
use crate::llm::gemini::http_client;
use crate::llm::image::{HttpImageSource, ImageSource};
use crate::llm::{GeminiClient, GenerativeModel};

pub use error::ApiError;
pub use handlers::MatchRequest;

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<ProjectPaths>,
    /// `None` when no API key is configured; match requests then fail
    pub model: Option<Arc<dyn GenerativeModel>>,
    pub images: Arc<dyn ImageSource>,
}

impl AppState {
    pub fn new(
        paths: ProjectPaths,
        model: Option<Arc<dyn GenerativeModel>>,
        images: Arc<dyn ImageSource>,
    ) -> Self {
        Self {
            paths: Arc::new(paths),
            model,
            images,
        }
    }

    /// Wire up the Gemini client and HTTP image downloads from config.
    pub fn from_paths(paths: ProjectPaths) -> Result<Self> {
        let client = http_client(&paths.config.model)?;
        let model_name = paths.config.model.tag_model.clone();
        let model = match GeminiClient::new(client.clone(), &paths.config.model, &model_name) {
            Ok(gemini) => Some(Arc::new(gemini) as Arc<dyn GenerativeModel>),
            Err(Error::ModelNotConfigured) => {
                tracing::warn!("GEMINI_API_KEY not set; /api/match will fail until it is");
                None
            }
            Err(e) => return Err(e),
        };
        let images: Arc<dyn ImageSource> = Arc::new(HttpImageSource::new(client));
        Ok(Self::new(paths, model, images))
    }

    pub fn model(&self) -> Result<&dyn GenerativeModel> {
        self.model.as_deref().ok_or(Error::ModelNotConfigured)
    }

    /// Guide store of the configured channel
    pub fn guides(&self) -> GuideStore {
        GuideStore::new(self.paths.guides_dir(self.paths.channel()))
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.paths.config.server.max_body_bytes;
    Router::new()
        .route("/api/match", post(handlers::match_reference))
        .route("/api/export-pack", post(handlers::export_pack))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub async fn serve(state: AppState, bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
