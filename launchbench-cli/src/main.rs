// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Launchbench CLI
//!
//! Command-line interface driving single clean/publish/run cycles of the
//! publish-scenario harness.

use clap::{Parser, Subcommand};

mod commands;

/// Launchbench - publish-scenario startup benchmarking harness
#[derive(Parser)]
#[command(name = "launchbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Harness configuration file (built-in defaults when absent)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one clean/publish/run cycle for a project
    Run {
        /// Project name (directory under the workspace root)
        project: String,

        /// Target runtime identifier (defaults to the host triple)
        #[arg(short, long)]
        runtime: Option<String>,

        /// Publish scenario
        #[arg(short, long, default_value = "default")]
        scenario: String,

        /// Run identifier (random when omitted)
        #[arg(long)]
        run_id: Option<String>,

        /// Workspace root holding the sample projects
        #[arg(long, default_value = ".")]
        root: String,

        /// Kill the subject if it outlives this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Print the composed publish argument vector without building
    Compose {
        /// Project name
        project: String,

        /// Target runtime identifier (defaults to the host triple)
        #[arg(short, long)]
        runtime: Option<String>,

        /// Publish scenario
        #[arg(short, long, default_value = "default")]
        scenario: String,

        /// Workspace root holding the sample projects
        #[arg(long, default_value = ".")]
        root: String,
    },

    /// List the publish scenario matrix
    Scenarios,

    /// Validate a harness configuration file
    Validate {
        /// Path to the configuration file
        file: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Run {
            project,
            runtime,
            scenario,
            run_id,
            root,
            timeout_secs,
        } => commands::run::execute(
            cli.config.as_deref(),
            &project,
            runtime.as_deref(),
            &scenario,
            run_id.as_deref(),
            &root,
            timeout_secs,
        ),
        Commands::Compose {
            project,
            runtime,
            scenario,
            root,
        } => commands::compose::execute(
            cli.config.as_deref(),
            &project,
            runtime.as_deref(),
            &scenario,
            &root,
        ),
        Commands::Scenarios => commands::scenarios::execute(),
        Commands::Validate { file } => commands::validate::execute(&file),
    }
}
