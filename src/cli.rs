//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{build_all::BuildAllCommand, hooks::HooksCommand, run::RunCommand};
use crate::utils::terminal::disable_colors;

/// buildpipe - command-line build orchestration for CI
///
/// Drives player and content builds from editor-style launch arguments
/// (`-buildPlayer`, `-buildPath <path>`, `-batchmode`, ...) passed after `--`.
#[derive(Parser, Debug)]
#[command(name = "buildpipe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project directory containing Pipeline.toml
    ///
    /// Defaults to the nearest parent directory with a Pipeline.toml.
    #[arg(long, global = true, env = "BUILDPIPE_PROJECT")]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the build stages requested by the launch arguments
    Run(RunCommand),

    /// Build content, then the player if the content build succeeded
    BuildAll(BuildAllCommand),

    /// List registered build hooks
    Hooks(HooksCommand),
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub project: Option<PathBuf>,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // Set up terminal colors
        if self.no_color {
            disable_colors();
        }

        let global = GlobalOptions {
            verbose: self.verbose,
            project: self.project,
        };

        match self.command {
            Commands::Run(cmd) => cmd.execute(&global),
            Commands::BuildAll(cmd) => cmd.execute(&global),
            Commands::Hooks(cmd) => cmd.execute(&global),
        }
    }
}
