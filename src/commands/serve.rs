//! Serve command - run the HTTP API

use anyhow::Result;
use colored::Colorize;

use refmatch::core::paths::ProjectPaths;
use refmatch::server::{serve, AppState};

use super::block_on;

pub fn run(bind: Option<String>) -> Result<()> {
    let paths = ProjectPaths::new();
    let bind_addr = bind.unwrap_or_else(|| paths.config.server.bind_addr.clone());

    tracing::info!("Project root: {}", paths.root.display());
    tracing::info!("Index: {}", paths.resolve_index_path().display());

    if !paths.resolve_index_path().exists() {
        eprintln!(
            "{} No index yet; /api/match will fail until one is built",
            "!".yellow().bold()
        );
    }

    let state = AppState::from_paths(paths)?;
    block_on(serve(state, &bind_addr))
}
