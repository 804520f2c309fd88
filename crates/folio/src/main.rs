//! Folio CLI - portfolio content pipeline.
//!
//! Provides commands for:
//! - `list`: List documents with search, tag filter, and pagination
//! - `tags`: Print all tags across the corpus
//! - `show`: Render one document to HTML

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use folio_config::Config;
use folio_site::Site;

use commands::{ListArgs, ShowArgs};
use error::CliError;
use output::Output;

/// Folio - portfolio content pipeline.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Path to folio.toml (searched in parent directories when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable info-level logging.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List documents with search, tag filter, and pagination.
    List(ListArgs),
    /// Print all tags across the corpus.
    Tags,
    /// Render one document to HTML.
    Show(ShowArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(cli, &output) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli, output: &Output) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let site = Site::from_config(&config)?;

    match cli.command {
        Commands::List(args) => args.execute(site, output),
        Commands::Tags => commands::tags::execute(&site, output),
        Commands::Show(args) => args.execute(&site, output),
    }
}
