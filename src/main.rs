mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use refmatch::library::{ExtractOptions, PromptType};

#[derive(Parser)]
#[command(name = "refmatch")]
#[command(about = "Match UI screenshots to tagged design references", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    // ===== HTTP API (also default) =====
    /// Serve the match and export API
    #[cfg(feature = "server")]
    Serve {
        #[arg(long, help = "Bind address (default: from config)")]
        bind: Option<String>,
    },

    /// Write refmatch.json with defaults
    Init {
        #[arg(long, help = "Channel slug to store in the config")]
        channel: Option<String>,
    },

    // ===== Matching =====
    /// Match a local screenshot against the index
    Match {
        image: PathBuf,
        #[arg(long, help = "Also write an export pack to this path")]
        export: Option<PathBuf>,
        #[arg(long, help = "Primary reference for the pack (default: best match)")]
        primary: Option<i64>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Build an export pack from saved match output or an export request
    Export {
        input: PathBuf,
        #[arg(short, long, default_value = "reference-pack.zip")]
        output: PathBuf,
        #[arg(long, help = "Primary reference id")]
        primary: Option<i64>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    // ===== Index =====
    /// Build or inspect the channel tag index
    Index {
        #[command(subcommand)]
        action: Option<IndexAction>,
    },

    // ===== Library =====
    /// Extract HTML/CSS components from indexed blocks
    Extract {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Write implementation guides for indexed blocks
    Guides {
        #[arg(long = "type", value_enum, help = "Prompt type (default: detected from channel)")]
        prompt_type: Option<PromptType>,
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Write an HTML preview page for one component
    Preview {
        id: String,
        #[arg(short, long, help = "Output file (default: <components>/<id>.html)")]
        output: Option<PathBuf>,
    },
    /// List components by aesthetic, type or screen (or the groups themselves)
    List {
        #[arg(long, conflicts_with_all = ["component_type", "screen"], help = "Aesthetic family")]
        aesthetic: Option<String>,
        #[arg(long = "type", conflicts_with = "screen", help = "Component type")]
        component_type: Option<String>,
        #[arg(long, help = "Screen type")]
        screen: Option<String>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show component library statistics
    Stats {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
}

#[derive(Subcommand)]
enum IndexAction {
    /// Show index location and size (default)
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Tag every block of a manifest and write the index
    Build {
        #[arg(long, help = "Channel slug (default: from config)")]
        channel: Option<String>,
        #[arg(long, help = "Channel title (default: slug)")]
        title: Option<String>,
        #[arg(long, help = "Block manifest JSON")]
        blocks: PathBuf,
        #[arg(long, help = "Process only the first N blocks")]
        limit: Option<usize>,
        #[arg(long, help = "Delay between model calls in ms (default: 1500)")]
        delay_ms: Option<u64>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
}

#[derive(clap::Args)]
struct BatchArgs {
    #[arg(long, help = "Channel slug (default: from config)")]
    channel: Option<String>,
    #[arg(long, help = "Single block id")]
    block: Option<i64>,
    #[arg(long, help = "Re-extract blocks that already have output")]
    force: bool,
    #[arg(long, help = "Process only the first N blocks")]
    limit: Option<usize>,
    #[arg(long, help = "JSON output")]
    json: bool,
}

impl BatchArgs {
    fn split(self) -> (ExtractOptions, Option<String>, bool) {
        let options = ExtractOptions {
            force: self.force,
            limit: self.limit,
            block: self.block,
        };
        (options, self.channel, self.json)
    }
}

/// Logs go to stderr so `--json` output stays clean.
fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "server")]
    let serving = matches!(cli.command, None | Some(Commands::Serve { .. }));
    #[cfg(not(feature = "server"))]
    let serving = false;
    init_tracing(if serving { "info" } else { "warn" });

    match cli.command {
        // Default: run the HTTP API
        None => {
            #[cfg(feature = "server")]
            {
                commands::serve::run(None)
            }
            #[cfg(not(feature = "server"))]
            {
                eprintln!("Server feature not enabled. Build with --features server");
                std::process::exit(1);
            }
        }

        #[cfg(feature = "server")]
        Some(Commands::Serve { bind }) => commands::serve::run(bind),

        Some(Commands::Init { channel }) => commands::init::run(channel),

        Some(Commands::Match {
            image,
            export,
            primary,
            json,
        }) => commands::match_image::run(&image, export, primary, json),
        Some(Commands::Export {
            input,
            output,
            primary,
            json,
        }) => commands::export::run(&input, &output, primary, json),

        Some(Commands::Index { action }) => match action {
            None => commands::index::run_status(false),
            Some(IndexAction::Status { json }) => commands::index::run_status(json),
            Some(IndexAction::Build {
                channel,
                title,
                blocks,
                limit,
                delay_ms,
                json,
            }) => commands::index::run_build(
                commands::index::BuildOptions {
                    channel,
                    title,
                    manifest: &blocks,
                    limit,
                    delay_ms,
                },
                json,
            ),
        },

        Some(Commands::Extract { batch }) => {
            let (options, channel, json) = batch.split();
            commands::extract::run(channel, options, json)
        }
        Some(Commands::Guides { prompt_type, batch }) => {
            let (options, channel, json) = batch.split();
            commands::guides::run(channel, prompt_type, options, json)
        }
        Some(Commands::Preview { id, output }) => commands::preview::run(&id, output),
        Some(Commands::List {
            aesthetic,
            component_type,
            screen,
            json,
        }) => commands::list::run(
            commands::list::ListFilter {
                aesthetic,
                component_type,
                screen,
            },
            json,
        ),
        Some(Commands::Stats { json }) => commands::stats::run(json),
    }
}
