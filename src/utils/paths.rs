//! Path utilities for the buildpipe CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::CONFIG_FILE_NAME;
use crate::error::{hints, PipelineError};

/// Find the project root by looking for Pipeline.toml
pub fn find_project_root() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    find_project_root_from(&current_dir)
}

/// Find the project root starting from a specific directory
pub fn find_project_root_from(start: &Path) -> Result<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(CONFIG_FILE_NAME).exists() {
            return Ok(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => {
                return Err(PipelineError::project_structure_error(
                    format!("{} not found above {}", CONFIG_FILE_NAME, start.display()),
                    vec![format!("<project>/{}", CONFIG_FILE_NAME)],
                    hints::pipeline_toml_not_found(),
                )
                .into());
            }
        }
    }
}

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Turn a display name into a file-name friendly slug
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}
