//! Index command - build or inspect the channel tag index

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::time::Duration;

use refmatch::core::paths::{index_remediation, ProjectPaths};
use refmatch::llm::GenerationConfig;
use refmatch::tags::indexer::{load_manifest, Indexer};
use refmatch::tags::ChannelIndex;

use super::{block_on, gemini, image_source};

pub struct BuildOptions<'a> {
    pub channel: Option<String>,
    pub title: Option<String>,
    pub manifest: &'a Path,
    pub limit: Option<usize>,
    pub delay_ms: Option<u64>,
}

pub fn run_build(options: BuildOptions<'_>, json: bool) -> Result<()> {
    let paths = ProjectPaths::new();
    let channel = options
        .channel
        .unwrap_or_else(|| paths.channel().to_string());
    let title = options.title.unwrap_or_else(|| channel.clone());

    let blocks = load_manifest(options.manifest)
        .with_context(|| format!("Failed to read manifest: {}", options.manifest.display()))?;
    let model = gemini(&paths, &paths.config.model.tag_model, GenerationConfig::default())?;
    let images = image_source(&paths)?;

    if !json {
        println!(
            "{} Tagging {} blocks from {}...",
            "→".dimmed(),
            options.limit.map_or(blocks.len(), |l| l.min(blocks.len())),
            channel.cyan()
        );
    }

    let mut indexer = Indexer::new(&model, &images);
    if let Some(ms) = options.delay_ms {
        indexer = indexer.with_delay(Duration::from_millis(ms));
    }
    let (index, stats) = block_on(async {
        let result = indexer.run(&channel, &title, &blocks, options.limit).await;
        Ok::<_, refmatch::Error>(result)
    })?;

    index.save(&paths.index)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "channel": channel,
                "indexed": stats.indexed,
                "skipped": stats.skipped,
                "failed": stats.failed,
                "duration_ms": stats.duration_ms,
                "path": paths.index,
            })
        );
    } else {
        println!();
        println!(
            "{} Indexed {} blocks in {:.2}s",
            "✓".green().bold(),
            stats.indexed.to_string().cyan(),
            stats.duration_ms as f64 / 1000.0
        );
        if stats.skipped > 0 {
            println!(
                "  {} {} blocks skipped (no usable image)",
                "→".dimmed(),
                stats.skipped
            );
        }
        if stats.failed > 0 {
            println!("  {} {} blocks failed", "✗".red(), stats.failed);
        }
        println!("  {} Index saved to: {}", "→".dimmed(), paths.index.display());
    }

    Ok(())
}

pub fn run_status(json: bool) -> Result<()> {
    let paths = ProjectPaths::new();
    let path = paths.resolve_index_path();

    if !path.exists() {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "exists": false,
                    "error": "Index not found",
                    "remediation": index_remediation(paths.channel()),
                })
            );
        } else {
            println!(
                "{} Index not found. Run {} first.",
                "!".yellow().bold(),
                index_remediation(paths.channel()).cyan()
            );
        }
        return Ok(());
    }

    let index = ChannelIndex::load(path)
        .with_context(|| format!("Failed to read index: {}", path.display()))?;
    let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let production = path == paths.index.as_path();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "exists": true,
                "channel": index.channel_slug,
                "title": index.channel_title,
                "block_count": index.len(),
                "indexed_at": index.indexed_at,
                "path": path,
                "production": production,
                "file_size_bytes": file_size,
            })
        );
    } else {
        println!("{}", "Index Status".bold());
        println!();
        println!(
            "  {} {} ({})",
            "→".dimmed(),
            index.channel_title.cyan(),
            index.channel_slug
        );
        println!(
            "  {} {} blocks indexed",
            "→".dimmed(),
            index.len().to_string().cyan()
        );
        println!(
            "  {} Last indexed: {}",
            "→".dimmed(),
            index.indexed_at.format("%Y-%m-%d %H:%M:%S")
        );
        println!(
            "  {} {}: {}",
            "→".dimmed(),
            if production { "Path" } else { "Path (dev)" },
            path.display()
        );
        println!(
            "  {} Size: {:.2} KB",
            "→".dimmed(),
            file_size as f64 / 1024.0
        );
    }

    Ok(())
}
