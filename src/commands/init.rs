//! Init command - write a refmatch.json with defaults

use anyhow::Result;
use colored::Colorize;

use refmatch::core::config::{Config, CONFIG_FILE};
use refmatch::core::paths::get_project_root;

pub fn run(channel: Option<String>) -> Result<()> {
    let root = get_project_root();
    let config_path = root.join(CONFIG_FILE);
    let existed = config_path.exists();

    let mut config = if existed {
        println!("{} Loading existing config...", "→".blue());
        Config::load(&root)
    } else {
        Config::default()
    };

    if let Some(channel) = channel {
        config.paths.channel = channel;
    }

    config.save(&root)?;

    if existed {
        println!("{} Updated {}", "✓".green(), config_path.display());
    } else {
        println!("{} Created {}", "✓".green(), config_path.display());
    }
    println!();
    println!("  channel:    {}", config.paths.channel.cyan());
    println!("  index:      {}", config.paths.index);
    println!("  prompts:    {}", config.paths.prompts);
    println!("  bind:       {}", config.server.bind_addr);
    println!();
    println!(
        "{} The API key is read from {} and never written to the file.",
        "→".dimmed(),
        "GEMINI_API_KEY".yellow()
    );
    Ok(())
}
