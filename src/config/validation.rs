//! Configuration validation with helpful error messages
//!
//! Checks Pipeline.toml beyond what deserialization enforces, with actionable
//! hints for common mistakes.

use anyhow::{Context, Result};
use regex::Regex;

use super::{CommandConfig, ContentConfig, PipelineConfig, ProjectConfig};
use crate::error::{hints, PipelineError};

/// Validate the entire pipeline configuration
pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    validate_project(&config.project)?;

    for (index, scene) in config.scenes.iter().enumerate() {
        if scene.path.trim().is_empty() {
            return Err(PipelineError::config_error_with_hint(
                format!("Scene #{} has an empty path", index + 1),
                None,
                "Every [[scenes]] entry needs a path like 'Assets/Scenes/Main.unity'",
            )
            .into());
        }
    }

    if let Some(ref player) = config.player {
        validate_command(player).context("Invalid [player] section")?;
    }

    validate_content(&config.content)?;

    for (key, hook) in &config.hooks {
        validate_hook_key(key)?;
        validate_command(hook).with_context(|| format!("Invalid hook '{}'", key))?;
    }

    Ok(())
}

/// Validate project metadata
fn validate_project(project: &ProjectConfig) -> Result<()> {
    if project.name.trim().is_empty() {
        return Err(PipelineError::config_error_with_hint(
            "Project name cannot be empty",
            None,
            "Provide a project name like 'my-game'",
        )
        .into());
    }

    let platform = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();

    for (field, value) in [
        ("platform", &project.platform),
        ("platform_group", &project.platform_group),
    ] {
        if !platform.is_match(value) {
            return Err(PipelineError::config_error_with_hint(
                format!("Invalid {} '{}'", field, value),
                None,
                "Build targets are identifiers such as StandaloneLinux64, Android or WebGL",
            )
            .into());
        }
    }

    if project.build_root.trim().is_empty() {
        return Err(PipelineError::config_error("build_root cannot be empty").into());
    }

    Ok(())
}

/// Validate content settings
fn validate_content(content: &ContentConfig) -> Result<()> {
    if let Some(command) = content.command_config() {
        validate_command(&command).context("Invalid [content] section")?;
    }

    for pattern in &content.include {
        glob::Pattern::new(pattern).map_err(|e| {
            PipelineError::config_error_with_hint(
                format!("Invalid content include pattern '{}': {}", pattern, e),
                None,
                "Use glob patterns relative to the content root, e.g. '**/*.prefab'",
            )
        })?;
    }

    if content.state_path.trim().is_empty() {
        return Err(PipelineError::config_error("content state_path cannot be empty").into());
    }

    Ok(())
}

/// Validate a hook key (at least namespace, type and method)
pub fn validate_hook_key(key: &str) -> Result<()> {
    let hook_key =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*){2,}$").unwrap();

    if !hook_key.is_match(key) {
        return Err(PipelineError::config_error_with_hint(
            format!("Invalid hook key '{}'", key),
            None,
            hints::hook_key(),
        )
        .into());
    }

    Ok(())
}

fn validate_command(command: &CommandConfig) -> Result<()> {
    if command.command.trim().is_empty() {
        return Err(PipelineError::config_error("command cannot be empty").into());
    }
    Ok(())
}
