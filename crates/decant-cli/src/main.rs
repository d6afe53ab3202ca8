//! decant CLI entry point.

mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::config::OutputFormat;

#[derive(Parser)]
#[command(name = "decant", version, about = "Declarative extract-load project tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the project file and report per-plugin setting status
    Validate {
        /// Path to the project file (default: discover from the working directory)
        #[arg(long)]
        project: Option<PathBuf>,

        /// Exit non-zero when a plugin's required settings cannot be
        /// resolved from this environment
        #[arg(long)]
        strict: bool,
    },
    /// List the plugins the project declares
    Plugins {
        /// Path to the project file (default: discover from the working directory)
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Show the configuration a plugin would receive
    Config {
        /// Plugin name, e.g. "tap-googleads"
        plugin: String,

        /// Path to the project file (default: discover from the working directory)
        #[arg(long)]
        project: Option<PathBuf>,

        /// Print secret values in plaintext
        #[arg(long)]
        reveal: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Create a fresh project file
    Init {
        /// Directory to create the project in (default: current directory)
        dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match cli.command {
        Commands::Validate { project, strict } => {
            commands::validate::run(project.as_deref(), strict)
        }
        Commands::Plugins { project } => commands::plugins::run(project.as_deref()),
        Commands::Config {
            plugin,
            project,
            reveal,
            format,
        } => commands::config::run(&plugin, project.as_deref(), reveal, format),
        Commands::Init { dir } => commands::init::run(dir.as_deref()),
    }
}
