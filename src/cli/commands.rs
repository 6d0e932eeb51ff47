//! CLI command definitions for arena-episode.
//!
//! The episode controller itself is a library surface; the binary covers
//! the bookkeeping around it: summarizing a results tree and checking the
//! settings file a run would load.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::episode::{EpisodeConfig, Settings};
use crate::results::{summarize_results, ResultsSummary};

/// Benchmark episode tooling.
#[derive(Parser)]
#[command(name = "arena-episode")]
#[command(about = "Inspect benchmark episode results and run settings")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Summarize every result.txt under a results directory.
    #[command(alias = "sum")]
    Summarize(SummarizeArgs),

    /// Load a settings file and print the episode configuration it yields.
    Settings(SettingsArgs),
}

/// Arguments for the summarize command.
#[derive(Parser, Debug)]
pub struct SummarizeArgs {
    /// Root of the results tree.
    pub root: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the settings command.
#[derive(Parser, Debug)]
pub struct SettingsArgs {
    /// Path to settings.json.
    #[arg(default_value = "./settings.json", env = "ARENA_SETTINGS")]
    pub path: PathBuf,
}

/// Parse CLI arguments and return the Cli struct.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Summarize(args) => run_summarize_command(args).await,
        Commands::Settings(args) => run_settings_command(args).await,
    }
}

async fn run_summarize_command(args: SummarizeArgs) -> anyhow::Result<()> {
    let root = args.root.clone();
    let summary = tokio::task::spawn_blocking(move || summarize_results(&root))
        .await?
        .map_err(|e| anyhow::anyhow!("Failed to summarize {}: {}", args.root.display(), e))?;
    info!(examples = summary.total, "Summarized results");

    if args.json {
        let json_output = serde_json::to_string_pretty(&summary)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
    } else {
        print_summary(&args.root, &summary);
    }
    Ok(())
}

fn print_summary(root: &std::path::Path, summary: &ResultsSummary) {
    println!("\nResults: {}", root.display());
    println!("==================");
    println!("Examples:     {}", summary.total);
    println!(
        "Successes:    {} ({:.1}%)",
        summary.successes,
        summary.success_rate()
    );
    println!("Mean score:   {:.4}", summary.mean_score);
    println!("Withheld:     {}", summary.suppressed);
    println!();

    if summary.domains.is_empty() {
        return;
    }
    println!("{:<24} {:>8} {:>10} {:>10}", "domain", "examples", "successes", "mean");
    for (name, domain) in &summary.domains {
        println!(
            "{:<24} {:>8} {:>10} {:>10.4}",
            name, domain.examples, domain.successes, domain.mean_score
        );
    }
}

async fn run_settings_command(args: SettingsArgs) -> anyhow::Result<()> {
    let settings = Settings::load(&args.path)?;
    let config = EpisodeConfig::new().with_settings(&settings);
    info!(path = %args.path.display(), "Loaded settings");

    if config.time_limit().is_some() {
        info!("time_limit is carried in the episode config but no execution mode enforces it");
    }

    let json_output = serde_json::to_string_pretty(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
    println!("{}", json_output);
    Ok(())
}
