//! Guides command - implementation guides for indexed blocks

use anyhow::Result;
use colored::Colorize;

use refmatch::core::paths::ProjectPaths;
use refmatch::library::prompt::{load_prompt, prompt_path};
use refmatch::library::{ExtractOptions, GuideExtractor, GuideStore, PromptType};
use refmatch::llm::GenerationConfig;

use super::extract::print_run;
use super::{block_on, gemini, image_source};

pub fn run(
    channel: Option<String>,
    prompt_type: Option<PromptType>,
    options: ExtractOptions,
    json: bool,
) -> Result<()> {
    let paths = ProjectPaths::new().for_channel(channel.as_deref());
    let channel = paths.channel().to_string();
    let prompt_type = prompt_type.unwrap_or_else(|| PromptType::detect(&channel));

    let index = paths.load_index()?;
    let prompt = load_prompt(&prompt_path(&paths.prompts, &prompt_type.prompt_file()))?;
    let model = gemini(&paths, &paths.config.model.guide_model, GenerationConfig::creative())?;
    let images = image_source(&paths)?;
    let store = GuideStore::new(paths.guides_dir(&channel));

    if !json {
        println!(
            "{} Writing {} guides for {}",
            "→".dimmed(),
            prompt_type.to_string().cyan(),
            channel.cyan()
        );
    }

    let extractor = GuideExtractor::new(&model, &images, &store, prompt);
    let stats = block_on(extractor.run(&index.blocks, &options))?;

    print_run(&stats, "guides", store.dir().display(), json)
}
