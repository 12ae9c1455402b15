//! Pipeline.toml configuration parsing
//!
//! The project file describes the parts of the project the orchestrator
//! treats as external: the active build target, the scene list, the commands
//! that perform player and content builds, and command hooks.
//!
//! ```toml
//! [project]
//! name = "my-game"
//! platform = "StandaloneLinux64"
//! platform_group = "Standalone"
//!
//! [[scenes]]
//! path = "Assets/Scenes/Main.unity"
//!
//! [player]
//! command = "unity"
//! args = ["-quit", "-batchmode", "-executeMethod", "Build.Player"]
//!
//! [content]
//! command = "unity"
//! args = ["-quit", "-batchmode", "-executeMethod", "Build.Content"]
//! root = "Assets/Content"
//!
//! [hooks."Studio.Build.Hooks.StampVersion"]
//! command = "git"
//! args = ["describe", "--tags"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{hints, PipelineError};
use crate::pipeline::engine::{ProjectSettings, SceneEntry, DEFAULT_CONTENT_STATE_PATH};

/// File name searched for when locating the project root
pub const CONFIG_FILE_NAME: &str = "Pipeline.toml";

/// Root configuration from Pipeline.toml
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Project metadata and active build target
    pub project: ProjectConfig,

    /// Scene build list, in build order
    #[serde(default)]
    pub scenes: Vec<SceneConfig>,

    /// Player build command
    pub player: Option<CommandConfig>,

    /// Content build settings
    #[serde(default)]
    pub content: ContentConfig,

    /// Command hooks keyed by fully-qualified hook name
    #[serde(default)]
    pub hooks: BTreeMap<String, CommandConfig>,
}

/// [project] section
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: String,

    /// Active build target
    pub platform: String,

    /// Build target group
    #[serde(default = "default_platform_group")]
    pub platform_group: String,

    /// Root for timestamped default output paths
    #[serde(default = "default_build_root")]
    pub build_root: String,
}

fn default_platform_group() -> String {
    "Standalone".to_string()
}

fn default_build_root() -> String {
    "Builds".to_string()
}

/// One [[scenes]] entry
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    pub path: String,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// An external command with arguments and extra environment
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// [content] section
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Content build command
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Directory whose files are tracked as content entries
    #[serde(default = "default_content_root")]
    pub root: String,

    /// Glob patterns (relative to `root`) selecting content entries
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Content state artifact written by release builds
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

fn default_content_root() -> String {
    "Assets".to_string()
}

fn default_include() -> Vec<String> {
    vec!["**/*".to_string()]
}

fn default_state_path() -> String {
    DEFAULT_CONTENT_STATE_PATH.to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            env: BTreeMap::new(),
            root: default_content_root(),
            include: default_include(),
            state_path: default_state_path(),
        }
    }
}

impl ContentConfig {
    /// Content build command, if configured
    pub fn command_config(&self) -> Option<CommandConfig> {
        self.command.as_ref().map(|command| CommandConfig {
            command: command.clone(),
            args: self.args.clone(),
            env: self.env.clone(),
        })
    }
}

impl PipelineConfig {
    /// Load configuration from the given project root
    pub fn load(project_root: &Path) -> Result<Self> {
        Self::load_from_path(project_root.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            PipelineError::config_error_with_hint(
                format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e),
                None,
                hints::invalid_pipeline_toml(),
            )
        })?;

        super::validation::validate_config(&config)?;

        Ok(config)
    }

    /// Project settings the default build configuration derives from
    pub fn project_settings(&self, project_root: &Path) -> ProjectSettings {
        ProjectSettings {
            platform: self.project.platform.clone(),
            platform_group: self.project.platform_group.clone(),
            scenes: self
                .scenes
                .iter()
                .map(|scene| SceneEntry {
                    path: scene.path.clone(),
                    enabled: scene.enabled,
                })
                .collect(),
            build_root: project_root.join(&self.project.build_root),
        }
    }

    /// Absolute path of the content state artifact
    pub fn content_state_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.content.state_path)
    }

    /// Absolute path of the content root
    pub fn content_root(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.content.root)
    }
}
