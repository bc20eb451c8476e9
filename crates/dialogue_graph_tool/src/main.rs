// SPDX-License-Identifier: MIT OR Apache-2.0
//! `dgraph` - headless front end for dialogue graph projects.
//!
//! Loads containers from a project's resources directory and works with
//! them without an editor:
//! - CSV export for dialogue tables
//! - Text outlines of a graph
//! - Listing saved containers
//! - Writing a default settings file

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Inspect and export dialogue graph containers
#[derive(Parser, Debug)]
#[command(name = "dgraph", author, version, about, long_about = None)]
struct Cli {
    /// Project directory holding `dialogue_graph.ron`
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a saved graph as CSV
    Export {
        /// Container name (defaults to the settings' default file name)
        name: Option<String>,

        /// Output file (defaults to the settings' CSV path)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print an outline of a saved graph
    Inspect {
        /// Container name (defaults to the settings' default file name)
        name: Option<String>,
    },

    /// List saved graphs
    List,

    /// Write a default settings file to the project directory
    InitSettings {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = format!("dialogue_graph={level},dialogue_graph_tool={level}");
        tracing_subscriber::EnvFilter::new(directives)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> dialogue_graph::Result<()> {
    let project = cli.project;
    match cli.command {
        Command::Export { name, out } => {
            let (path, rows) = commands::export(&project, name.as_deref(), out)?;
            println!("Exported {rows} rows to {}", path.display());
        }
        Command::Inspect { name } => {
            print!("{}", commands::inspect(&project, name.as_deref())?);
        }
        Command::List => {
            for name in commands::list(&project)? {
                println!("{name}");
            }
        }
        Command::InitSettings { force } => {
            let path = commands::init_settings(&project, force)?;
            println!("Settings at {}", path.display());
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("dgraph v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
