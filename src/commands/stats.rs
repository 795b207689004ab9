//! Stats command - component library summary

use anyhow::Result;
use colored::Colorize;

use refmatch::core::paths::ProjectPaths;
use refmatch::library::component::NameCount;
use refmatch::library::ComponentStore;

pub fn run(json: bool) -> Result<()> {
    let paths = ProjectPaths::new();
    let stats = ComponentStore::new(&paths.components).load_index()?.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Component Library".bold());
    println!("{}", "=".repeat(50));
    println!();
    println!("Total components: {}", stats.total_components);
    println!(
        "Generated: {}",
        stats.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!();
    print_counts("Aesthetics", &stats.aesthetics, stats.total_components);
    print_counts("Component Types", &stats.types, stats.total_components);
    println!("{}", "=".repeat(50));
    Ok(())
}

fn print_counts(title: &str, counts: &[NameCount], total: usize) {
    println!("{}", title.cyan());
    println!("{}", "-".repeat(30));
    for c in counts {
        let pct = if total > 0 {
            (c.count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("   {:<16} {:>4} ({:.0}%)", c.name, c.count, pct);
    }
    println!();
}
