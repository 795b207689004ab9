//! List command - browse the component library by aesthetic, type or screen

use anyhow::Result;
use colored::Colorize;

use refmatch::core::paths::ProjectPaths;
use refmatch::library::{ComponentStore, ExtractedComponent};

/// At most one of these is set; clap enforces it.
pub struct ListFilter {
    pub aesthetic: Option<String>,
    pub component_type: Option<String>,
    pub screen: Option<String>,
}

pub fn run(filter: ListFilter, json: bool) -> Result<()> {
    let paths = ProjectPaths::new();
    let store = ComponentStore::new(&paths.components);

    let (label, components) = if let Some(aesthetic) = &filter.aesthetic {
        (format!("aesthetic {}", aesthetic), store.by_aesthetic(aesthetic)?)
    } else if let Some(component_type) = &filter.component_type {
        (format!("type {}", component_type), store.by_type(component_type)?)
    } else if let Some(screen) = &filter.screen {
        (format!("screen {}", screen), store.by_screen(screen)?)
    } else {
        return list_groups(&store, json);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&components)?);
        return Ok(());
    }

    if components.is_empty() {
        println!("{} No components with {}", "→".dimmed(), label);
        return Ok(());
    }

    println!(
        "{} ({} components)",
        label.bold(),
        components.len().to_string().cyan()
    );
    println!("{}", "-".repeat(40));
    for c in &components {
        print_component(c);
    }
    Ok(())
}

fn print_component(c: &ExtractedComponent) {
    println!(
        "  {:>10}  {}  {}",
        c.id.dimmed(),
        c.name.cyan(),
        format!("[{} / {}]", c.aesthetic_family, c.screen_type).dimmed()
    );
}

fn list_groups(store: &ComponentStore, json: bool) -> Result<()> {
    let index = store.load_index()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "aesthetics": index.aesthetic_families(),
                "types": index.component_types(),
                "screens": index.screen_types(),
            })
        );
        return Ok(());
    }

    for (title, names) in [
        ("Aesthetic families", index.aesthetic_families()),
        ("Component types", index.component_types()),
        ("Screen types", index.screen_types()),
    ] {
        println!("{}", title.cyan());
        if names.is_empty() {
            println!("   {}", "(none)".dimmed());
        } else {
            println!("   {}", names.join(", "));
        }
        println!();
    }
    Ok(())
}
