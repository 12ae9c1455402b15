//! Run command implementation
//!
//! Executes the build stages named by editor-style launch arguments, e.g.
//! `buildpipe run -- -buildPlayer -buildPath Builds/game -batchmode`.

use anyhow::Result;
use clap::Args;

use super::{print_report, Project};
use crate::cli::GlobalOptions;

/// Run the build stages requested by the launch arguments
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Launch arguments (`-buildPlayer`, `-addressablesReleaseBuild`, `-batchmode`, ...)
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl RunCommand {
    /// Execute the run command
    ///
    /// With `-batchmode` the process exits with the run's exit code and this
    /// never returns.
    pub fn execute(self, global: &GlobalOptions) -> Result<()> {
        let project = Project::open(global.project.as_deref())?;

        if global.verbose {
            eprintln!("Project: {}", project.root.display());
            eprintln!("Launch arguments: {}", self.args.join(" "));
        }

        let mut orchestrator = project.orchestrator(self.args, global.verbose)?;
        let report = orchestrator.run();
        print_report(&report);
        Ok(())
    }
}
