//! Extract command - screenshot-to-code components for indexed blocks

use anyhow::Result;
use colored::Colorize;

use refmatch::core::paths::ProjectPaths;
use refmatch::library::prompt::{load_prompt, prompt_path, SCREENSHOT_TO_CODE};
use refmatch::library::{ComponentExtractor, ComponentStore, ExtractOptions, RunStats};
use refmatch::llm::GenerationConfig;

use super::{block_on, gemini, image_source};

pub fn run(channel: Option<String>, options: ExtractOptions, json: bool) -> Result<()> {
    let paths = ProjectPaths::new().for_channel(channel.as_deref());
    let index = paths.load_index()?;
    let prompt = load_prompt(&prompt_path(&paths.prompts, SCREENSHOT_TO_CODE))?;
    let model_name = paths.config.model.component_model.clone();
    let model = gemini(&paths, &model_name, GenerationConfig::precise())?;
    let images = image_source(&paths)?;
    let store = ComponentStore::new(&paths.components);

    if !json {
        println!(
            "{} Extracting {} components with {}{}",
            "→".dimmed(),
            paths.channel().cyan(),
            model_name.cyan(),
            if options.force { " (force)" } else { "" }
        );
    }

    let extractor = ComponentExtractor::new(&model, &images, &store, prompt);
    let stats = block_on(extractor.run(&index.blocks, &options))?;

    print_run(&stats, "components", store.dir().display(), json)
}

pub(crate) fn print_run(
    stats: &RunStats,
    what: &str,
    output: impl std::fmt::Display,
    json: bool,
) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "success": stats.success,
                "failed": stats.failed,
                "existing": stats.existing,
                "total": stats.total,
                "output": output.to_string(),
            })
        );
        return Ok(());
    }

    println!();
    if stats.success == 0 && stats.failed == 0 {
        println!("{} All blocks already have {}", "✓".green().bold(), what);
    } else {
        println!(
            "{} {} new {}",
            "✓".green().bold(),
            stats.success.to_string().cyan(),
            what
        );
    }
    if stats.existing > 0 {
        println!("  {} {} already extracted", "→".dimmed(), stats.existing);
    }
    if stats.failed > 0 {
        println!("  {} {} failed", "✗".red(), stats.failed);
    }
    println!("  {} {} total in {}", "→".dimmed(), stats.total, output);
    Ok(())
}
