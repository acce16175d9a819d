//! mockprep CLI: adaptive mock-interview practice from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mockprep_core::model::Role;

mod commands;

use commands::practice::PracticeArgs;
use commands::question::QuestionArgs;

#[derive(Parser)]
#[command(name = "mockprep", version, about = "Adaptive mock-interview practice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive practice session
    Practice(PracticeArgs),

    /// Print one selected question
    Question(QuestionArgs),

    /// Show industry benchmark scores
    Benchmarks {
        /// Only this role
        #[arg(long)]
        role: Option<Role>,

        /// Catalog file overriding the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a catalog TOML file
    Validate {
        /// Path to the catalog file
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Create a starter config and catalog
    Init,
}

#[tokio::main]
async fn main() {
    // logs go to stderr so they never interleave with the transcript
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mockprep=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Practice(args) => commands::practice::execute(args).await,
        Commands::Question(args) => commands::question::execute(args),
        Commands::Benchmarks {
            role,
            catalog,
            config,
        } => commands::benchmarks::execute(role, catalog, config),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
