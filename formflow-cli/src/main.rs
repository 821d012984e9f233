//! Formflow — automation script generation CLI for form data collection.
//!
//! # Usage
//!
//! ```text
//! formflow config set-storage-dir <dir>
//! formflow config set-store-passwords <true|false>
//! formflow config show
//! formflow source set-pull|set-push aggregate --url <url> [--username <u> --password <p>]
//! formflow source set-pull|set-push central --url <url> --project-id <n> [--username <u> --password <p>]
//! formflow source set-pull|set-push collect-dir <path>
//! formflow source show
//! formflow forms list
//! formflow forms select <id>...
//! formflow forms deselect <id>...
//! formflow forms refresh
//! formflow generate --script-dir <dir> [--export-dir <dir>] [--runtime <cmd>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    config::ConfigCommand, forms::FormsCommand, generate::GenerateArgs, source::SourceCommand,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "formflow",
    version,
    about = "Generate pull/export/push automation scripts for form data collection",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage application-wide settings (storage directory, consent flag).
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Configure the pull and push sources.
    Source {
        #[command(subcommand)]
        command: SourceCommand,
    },

    /// List, select, and refresh the known forms.
    Forms {
        #[command(subcommand)]
        command: FormsCommand,
    },

    /// Compose and write the automation script.
    Generate(GenerateArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Source { command } => commands::source::run(command),
        Commands::Forms { command } => commands::forms::run(command),
        Commands::Generate(args) => args.run(),
    }
}
