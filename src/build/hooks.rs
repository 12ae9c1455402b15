//! Build hooks declared as commands in Pipeline.toml

use std::path::Path;

use anyhow::{bail, Result};

use super::env;
use crate::config::{CommandConfig, PipelineConfig};
use crate::exec::subprocess::{run_command, CommandSpec};
use crate::pipeline::hooks::HookRegistry;

/// Register every `[hooks."<key>"]` command, in key order
pub fn register_command_hooks(
    registry: &mut HookRegistry,
    config: &PipelineConfig,
    project_root: &Path,
) -> Result<()> {
    for (key, hook) in &config.hooks {
        let hook = hook.clone();
        let hook_key = key.clone();
        let root = project_root.to_path_buf();
        registry.register(key.clone(), move || run_hook_command(&hook_key, &hook, &root))?;
    }
    Ok(())
}

fn run_hook_command(key: &str, hook: &CommandConfig, project_root: &Path) -> Result<()> {
    let mut environment = hook.env.clone();
    environment.insert(env::HOOK.to_string(), key.to_string());

    let result = run_command(
        CommandSpec {
            program: &hook.command,
            args: &hook.args,
            env: &environment,
            cwd: project_root,
        },
        true,
    )?;

    if !result.success {
        bail!(result.failure_summary(&hook.command));
    }
    Ok(())
}
