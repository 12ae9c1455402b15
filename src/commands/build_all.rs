//! Build-all command implementation

use anyhow::Result;
use clap::Args;

use super::{print_report, Project};
use crate::cli::GlobalOptions;

/// Build content, then the player if the content build succeeded
#[derive(Args, Debug)]
pub struct BuildAllCommand {
    /// Launch arguments applied to the player build (`-development`, `-buildPath <path>`, ...)
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl BuildAllCommand {
    /// Execute the build-all command
    pub fn execute(self, global: &GlobalOptions) -> Result<()> {
        let project = Project::open(global.project.as_deref())?;
        let mut orchestrator = project.orchestrator(self.args, global.verbose)?;
        let report = orchestrator.run_build_all();
        print_report(&report);
        Ok(())
    }
}
