//! Match command - find references for a local screenshot

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use refmatch::core::paths::ProjectPaths;
use refmatch::export::{build_pack, ExportRequest};
use refmatch::library::GuideStore;
use refmatch::llm::{GenerationConfig, InlineImage};
use refmatch::matching::{match_image, MatchResponse};
use refmatch::tags::{Category, CategoryTags};

use super::{block_on, gemini, image_source};

pub fn run(image_path: &Path, export: Option<PathBuf>, primary: Option<i64>, json: bool) -> Result<()> {
    let paths = ProjectPaths::new();
    let index = paths.load_index()?;
    let model = gemini(&paths, &paths.config.model.tag_model, GenerationConfig::default())?;
    let image = InlineImage::from_path(image_path)
        .with_context(|| format!("Failed to read image: {}", image_path.display()))?;

    let response = block_on(match_image(&model, &index, image))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    if let Some(output) = export {
        let primary = primary.or_else(|| response.matches.first().map(|m| m.block.id));
        let request = ExportRequest::from_response(&response, primary);
        let images = image_source(&paths)?;
        let guide = primary.and_then(|id| GuideStore::new(paths.guides_dir(paths.channel())).read_body(id));

        let pack = block_on(build_pack(&images, &request, guide.as_deref()))?;
        fs::write(&output, &pack.bytes)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        if !json {
            println!(
                "{} Export pack with {} images saved to {}",
                "✓".green().bold(),
                pack.image_count,
                output.display()
            );
        }
    }

    Ok(())
}

fn print_tags(tags: &CategoryTags) {
    for category in Category::ALL {
        let values = tags.get(category);
        if !values.is_empty() {
            println!("   {:<10} {}", category.as_str().dimmed(), values.join(", "));
        }
    }
}

fn print_response(response: &MatchResponse) {
    println!("{}", "Extracted Tags".bold());
    println!("{}", "-".repeat(40));
    print_tags(&response.extracted_tags.tags);
    if let Some(one_liner) = &response.one_liner {
        println!("   {}", one_liner.italic());
    }
    println!();

    if response.matches.is_empty() {
        println!(
            "{} No references share a tag with this screenshot ({} indexed)",
            "→".dimmed(),
            response.total_indexed
        );
        return;
    }

    println!(
        "{} ({} of {} indexed)",
        "Top References".bold(),
        response.matches.len(),
        response.total_indexed
    );
    println!("{}", "-".repeat(40));
    for (i, m) in response.matches.iter().enumerate() {
        println!(
            "{:>2}. {} {}",
            i + 1,
            m.block.display_title().cyan(),
            format!("[{:.1}]", m.score).yellow()
        );
        println!("    {} {}", "matched:".dimmed(), m.matched_tags.flatten().join(", "));
        println!("    {} {}", "why:".dimmed(), m.explanation);
        println!("    {}", m.block.arena_url.dimmed());
    }
}
