//! Content builds through an external command
//!
//! A release build runs the `[content]` command and, when it succeeds,
//! records the content state: the SHA-256 of every entry under the content
//! root plus a version derived from those hashes. Update builds compare the
//! current entries against that state, write the changed ones to an update
//! group file and run the command again in update mode.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use super::env;
use crate::config::{CommandConfig, PipelineConfig};
use crate::error::{hints, PipelineError};
use crate::exec::subprocess::{command_exists, run_command, CommandSpec};
use crate::pipeline::engine::{ContentBuildResult, ContentBuilder, ContentEntry, ContentState};
use crate::utils::paths::{ensure_dir, slugify};
use crate::utils::terminal::create_spinner;

/// Update group written before an update build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGroup {
    pub name: String,
    /// Version of the content state the update builds on
    pub base_version: String,
    pub created_at: String,
    pub entries: Vec<ContentEntry>,
}

impl ContentState {
    /// State describing `entries`, stamped with the current time
    pub fn from_entries(entries: &[ContentEntry]) -> Self {
        Self {
            version: content_version(entries),
            built_at: chrono::Local::now().to_rfc3339(),
            entries: entries
                .iter()
                .map(|e| (e.path.clone(), e.hash.clone()))
                .collect(),
        }
    }

    /// Load a content state file, `None` if it does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read content state {}", path.display()))?;

        let state = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse content state {}", path.display()))?;

        Ok(Some(state))
    }

    /// Save the content state, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize content state")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write content state {}", path.display()))?;

        Ok(())
    }
}

/// Version identifier for a set of entries
pub fn content_version(entries: &[ContentEntry]) -> String {
    let mut sorted: Vec<&ContentEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut hasher = Sha256::new();
    for entry in sorted {
        hasher.update(entry.path.as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.hash.as_bytes());
        hasher.update([b'\n']);
    }

    let hash = format!("{:x}", hasher.finalize());
    hash[..16].to_string()
}

/// Calculate SHA256 hash of a file
fn hash_file(path: &Path) -> Result<String> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Content builder backed by the `[content]` section of Pipeline.toml
#[derive(Debug)]
pub struct CommandContentBuilder {
    project_root: PathBuf,
    command: Option<CommandConfig>,
    content_root: PathBuf,
    include: Vec<Pattern>,
    state_path: PathBuf,
    group_path: Option<PathBuf>,
    verbose: bool,
}

impl CommandContentBuilder {
    pub fn new(project_root: &Path, config: &PipelineConfig, verbose: bool) -> Result<Self> {
        let include = config
            .content
            .include
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid include pattern '{}'", p)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            project_root: project_root.to_path_buf(),
            command: config.content.command_config(),
            content_root: config.content_root(project_root),
            include,
            state_path: config.content_state_path(project_root),
            group_path: None,
            verbose,
        })
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Every included file under the content root, sorted by path
    pub fn scan_entries(&self) -> Result<Vec<ContentEntry>> {
        let mut entries = Vec::new();

        if !self.content_root.exists() {
            return Ok(entries);
        }

        for entry in WalkDir::new(&self.content_root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| {
                format!("Failed to scan content root {}", self.content_root.display())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.content_root)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if !self.include.iter().any(|p| p.matches(&relative)) {
                continue;
            }

            entries.push(ContentEntry {
                hash: hash_file(entry.path())?,
                path: relative,
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn run_content_command(&self, mode: &str, extra_env: BTreeMap<String, String>) -> ContentBuildResult {
        let Some(command) = &self.command else {
            PipelineError::config_error_with_hint(
                "No content build command configured",
                None,
                hints::content_command(),
            )
            .display_with_hints();
            return ContentBuildResult::failed("no content build command configured");
        };

        if !command_exists(&command.command, &self.project_root) {
            let err = PipelineError::missing_tool(&command.command, "content build", hints::content_command());
            err.display_with_hints();
            return ContentBuildResult::failed(err.to_string());
        }

        let mut environment = command.env.clone();
        environment.insert(env::CONTENT_MODE.to_string(), mode.to_string());
        environment.extend(extra_env);

        let spec = CommandSpec {
            program: &command.command,
            args: &command.args,
            env: &environment,
            cwd: &self.project_root,
        };

        let spinner = (!self.verbose).then(|| create_spinner(&format!("Building content ({})...", mode)));
        let result = run_command(spec, self.verbose);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match result {
            Ok(result) if result.success => ContentBuildResult::succeeded(result.duration),
            Ok(result) => ContentBuildResult::failed(result.failure_summary(&command.command)),
            Err(err) => ContentBuildResult::failed(format!("{:#}", err)),
        }
    }
}

impl ContentBuilder for CommandContentBuilder {
    fn build_content(&mut self) -> ContentBuildResult {
        let result = self.run_content_command("release", BTreeMap::new());
        if !result.is_success() {
            return result;
        }

        let recorded = self
            .scan_entries()
            .and_then(|entries| ContentState::from_entries(&entries).save(&self.state_path));

        match recorded {
            Ok(()) => result,
            Err(err) => ContentBuildResult::failed(format!("{:#}", err)),
        }
    }

    fn load_content_state(&self, path: &Path) -> Result<Option<ContentState>> {
        ContentState::load(path)
    }

    fn gather_modified_entries(&self, state: &ContentState) -> Result<Vec<ContentEntry>> {
        Ok(self
            .scan_entries()?
            .into_iter()
            .filter(|entry| state.entries.get(&entry.path) != Some(&entry.hash))
            .collect())
    }

    fn create_update_group(&mut self, name: &str, entries: &[ContentEntry]) -> Result<()> {
        let base_version = ContentState::load(&self.state_path)?
            .map(|state| state.version)
            .unwrap_or_default();

        let group = UpdateGroup {
            name: name.to_string(),
            base_version,
            created_at: chrono::Local::now().to_rfc3339(),
            entries: entries.to_vec(),
        };

        let dir = self
            .state_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.project_root.clone());
        ensure_dir(&dir)?;

        let path = dir.join(format!("{}.group.json", slugify(name)));
        let json = serde_json::to_string_pretty(&group).context("Failed to serialize update group")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write update group {}", path.display()))?;

        self.group_path = Some(path);
        Ok(())
    }

    fn build_content_update(&mut self, state: &ContentState) -> ContentBuildResult {
        let mut extra_env = BTreeMap::from([
            (env::CONTENT_STATE.to_string(), self.state_path.display().to_string()),
            (env::PREVIOUS_VERSION.to_string(), state.version.clone()),
        ]);
        if let Some(group) = &self.group_path {
            extra_env.insert(env::UPDATE_GROUP.to_string(), group.display().to_string());
        }

        self.run_content_command("update", extra_env)
    }
}
