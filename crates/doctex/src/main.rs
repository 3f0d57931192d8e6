//! doctex CLI - handbook to LaTeX pipeline.
//!
//! Provides commands for:
//! - `build`: Render configured handbooks to `.tex` files
//! - `check`: Report markup and structure problems in handbook sources
//! - `tree`: Print the reconstructed section tree of a handbook

mod commands;
mod error;
mod output;
mod pipeline;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, TreeArgs};
use output::Output;

/// doctex - handbook to LaTeX pipeline.
#[derive(Parser)]
#[command(name = "doctex", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render handbooks to LaTeX.
    Build(BuildArgs),
    /// Lint handbook sources without writing output.
    Check(CheckArgs),
    /// Print the section tree of a handbook.
    Tree(TreeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Tree(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
