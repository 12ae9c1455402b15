//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.

pub mod build_all;
pub mod hooks;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::build::hooks::register_command_hooks;
use crate::build::{CommandContentBuilder, CommandPlayerBuilder};
use crate::config::PipelineConfig;
use crate::pipeline::{HookRegistry, LaunchArguments, Orchestrator, ProcessHost, RunReport};
use crate::utils::paths::find_project_root;
use crate::utils::terminal::{print_info, print_success, print_warning};

/// A loaded project: its root directory and Pipeline.toml
pub(crate) struct Project {
    pub root: PathBuf,
    pub config: PipelineConfig,
}

impl Project {
    /// Open the project at `dir`, or the nearest one above the working directory
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        let root = match dir {
            Some(dir) => dir
                .canonicalize()
                .with_context(|| format!("Project directory not found: {}", dir.display()))?,
            None => find_project_root()?,
        };
        let config = PipelineConfig::load(&root)?;
        Ok(Self { root, config })
    }

    /// Hook registry holding every hook command of Pipeline.toml
    pub fn hook_registry(&self) -> Result<HookRegistry> {
        let mut registry = HookRegistry::new();
        register_command_hooks(&mut registry, &self.config, &self.root)?;
        Ok(registry)
    }

    /// Orchestrator wired to the project's commands, terminating this process
    pub fn orchestrator(&self, args: Vec<String>, verbose: bool) -> Result<Orchestrator> {
        let player = CommandPlayerBuilder::new(
            self.root.clone(),
            self.config.player.clone(),
            verbose,
        );
        let content = CommandContentBuilder::new(&self.root, &self.config, verbose)?;

        Ok(Orchestrator::new(
            LaunchArguments::new(args),
            self.config.project_settings(&self.root),
            Box::new(player),
            Box::new(content),
            Box::new(ProcessHost),
        )
        .with_hooks(self.hook_registry()?)
        .with_content_state_path(self.config.content_state_path(&self.root))
        .with_verbose(verbose))
    }
}

/// Summarize a run that returned without terminating the process
pub(crate) fn print_report(report: &RunReport) {
    if report.stages.is_empty() && report.scan_error.is_none() {
        return;
    }

    for stage in &report.stages {
        print_info(&format!("{}: {}", stage.stage, stage.code));
    }

    let code = report.final_code();
    if code.is_success() {
        print_success("all requested stages finished");
    } else {
        print_warning(&format!("run finished with {}", code));
    }
}
