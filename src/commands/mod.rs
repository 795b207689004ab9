pub mod export;
pub mod extract;
pub mod guides;
pub mod index;
pub mod init;
pub mod list;
pub mod match_image;
pub mod preview;
#[cfg(feature = "server")]
pub mod serve;
pub mod stats;

use anyhow::{Context, Result};
use std::future::Future;

use refmatch::core::paths::ProjectPaths;
use refmatch::llm::gemini::http_client;
use refmatch::llm::image::HttpImageSource;
use refmatch::llm::{GeminiClient, GenerationConfig};

/// Run an async command body on a fresh runtime.
pub(crate) fn block_on<T, E>(future: impl Future<Output = std::result::Result<T, E>>) -> Result<T>
where
    E: Into<anyhow::Error>,
{
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(future).map_err(Into::into)
}

pub(crate) fn gemini(
    paths: &ProjectPaths,
    model: &str,
    generation: GenerationConfig,
) -> Result<GeminiClient> {
    let client = http_client(&paths.config.model)?;
    let gemini = GeminiClient::new(client, &paths.config.model, model)
        .context("Export GEMINI_API_KEY before running model commands")?;
    Ok(gemini.with_generation(generation))
}

pub(crate) fn image_source(paths: &ProjectPaths) -> Result<HttpImageSource> {
    Ok(HttpImageSource::new(http_client(&paths.config.model)?))
}
