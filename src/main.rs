//! buildpipe - command-line build orchestration for CI
//!
//! Translates editor-style launch arguments into player and content builds,
//! runs pre/post-build hooks, and maps every outcome to a process exit code.
//!
//! ## Architecture
//!
//! ```text
//! Rust CLI → pipeline/ (orchestrator) → build/ engines → configured commands
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod pipeline;
mod utils;

use clap::Parser;

use cli::Cli;
use error::PipelineError;
use utils::terminal::print_error;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = cli.execute() {
        match err.downcast_ref::<PipelineError>() {
            Some(pipeline_err) => pipeline_err.display_with_hints(),
            None => print_error(&format!("{:#}", err)),
        }
        std::process::exit(1);
    }
}
