mod commands;
mod settings;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::settings::RunSettings;

#[derive(Debug, Parser)]
#[command(name = "esbmap")]
#[command(about = "Compare ESB and Scraper store locations on a map")]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the configured sources and filter. Anything left unset
/// falls back to the `ESBMAP_*` environment configuration.
#[derive(Debug, Default, Args)]
struct SourceArgs {
    /// ESB locations CSV
    #[arg(long, global = true)]
    esb: Option<PathBuf>,
    /// Scraper locations CSV
    #[arg(long, global = true)]
    scraper: Option<PathBuf>,
    /// Precomputed ESB/Scraper matches CSV
    #[arg(long, global = true)]
    matches: Option<PathBuf>,
    /// Rows read per point source; matches are capped at half
    #[arg(long, global = true)]
    max_points: Option<NonZeroUsize>,
    /// Lowest match confidence kept (0..=1)
    #[arg(long, global = true)]
    min_confidence: Option<f32>,
    /// Largest match distance kept, in metres
    #[arg(long, global = true)]
    max_distance: Option<f32>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the map and write it to a file
    Render {
        /// Output file
        #[arg(long)]
        out: PathBuf,
        /// Standalone HTML page or the raw map document as JSON
        #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },
    /// Print dataset counts, match statistics and the best matches
    Summary {
        /// Number of match rows to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
    /// Write the filtered matches as CSV
    Export {
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = esbmap_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = RunSettings::resolve(&config, &cli.sources)?;

    match cli.command {
        Commands::Render { out, format } => commands::run_render(&settings, &out, format),
        Commands::Summary { top } => commands::run_summary(&settings, top),
        Commands::Export { out } => commands::run_export(&settings, &out),
    }
}
