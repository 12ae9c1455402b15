//! Hooks command implementation
//!
//! Lists the hook commands declared in Pipeline.toml, or shows which one a
//! `-executePreBuildMethod` style path resolves to.

use anyhow::Result;
use clap::Args;
use console::style;

use super::Project;
use crate::cli::GlobalOptions;
use crate::error::hints;

/// List registered build hooks
#[derive(Args, Debug)]
pub struct HooksCommand {
    /// Show the hook a dotted path resolves to instead of listing all hooks
    #[arg(long, value_name = "PATH")]
    pub resolve: Option<String>,
}

impl HooksCommand {
    /// Execute the hooks command
    pub fn execute(self, global: &GlobalOptions) -> Result<()> {
        let project = Project::open(global.project.as_deref())?;
        let registry = project.hook_registry()?;

        if let Some(path) = &self.resolve {
            let key = registry.resolve_key(path)?;
            println!("{} -> {}", path, style(key).green());
            return Ok(());
        }

        if registry.is_empty() {
            println!("No build hooks configured.");
            println!("{}", style(hints::hook_key()).dim());
            return Ok(());
        }

        println!("{}", style("Build hooks:").bold());
        for (key, hook) in &project.config.hooks {
            if global.verbose {
                println!("  {}  {} {}", style(key).cyan(), hook.command, hook.args.join(" "));
            } else {
                println!("  {}", style(key).cyan());
            }
        }
        Ok(())
    }
}
