//! Preview command - write a standalone HTML page for one component

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use refmatch::core::paths::ProjectPaths;
use refmatch::library::ComponentStore;
use refmatch::preview::render_page;

pub fn run(id: &str, output: Option<PathBuf>) -> Result<()> {
    let paths = ProjectPaths::new();
    let store = ComponentStore::new(&paths.components);
    let component = store.load(id)?;

    let output = output.unwrap_or_else(|| store.dir().join(format!("{}.html", id)));
    fs::write(&output, render_page(&component))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} {} ({}) -> {}",
        "✓".green().bold(),
        component.name.cyan(),
        component.aesthetic_family,
        output.display()
    );
    Ok(())
}
