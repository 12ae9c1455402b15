//! Collaborators the orchestrator drives
//!
//! The orchestrator never compiles a player or packs content itself. It calls
//! into a [`PlayerBuilder`] and a [`ContentBuilder`], and reports its final
//! verdict to a [`Host`]. The binary wires in the subprocess-backed engines
//! from `crate::build`; tests wire in recording stubs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::options::BuildConfiguration;

/// Default location of the content state written by a release content build
pub const DEFAULT_CONTENT_STATE_PATH: &str = "Artifacts/addressables_content_state.bin";

/// Name of the group that collects entries changed since the last release build
pub const CONTENT_UPDATE_GROUP: &str = "Update Group";

/// Native result of a player build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerBuildResult {
    Succeeded,
    Failed,
    Cancelled,
    Unknown,
}

/// Result of a content build; an empty error string means success
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBuildResult {
    pub error: String,
    pub duration: Duration,
}

impl ContentBuildResult {
    pub fn succeeded(duration: Duration) -> Self {
        Self {
            error: String::new(),
            duration,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            duration: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }
}

/// Content state recorded by the last release content build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentState {
    /// Version identifier of the content build that produced this state
    pub version: String,
    /// Build timestamp (RFC 3339)
    pub built_at: String,
    /// Entry path -> SHA-256 hash at build time
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

/// A content entry (project-relative path plus its current hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub path: String,
    pub hash: String,
}

/// A scene in the project's build list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEntry {
    pub path: String,
    pub enabled: bool,
}

/// Project-wide build settings the default configuration is derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    /// Active build target, e.g. `StandaloneLinux64`
    pub platform: String,
    /// Group of the active target, e.g. `Standalone`
    pub platform_group: String,
    pub scenes: Vec<SceneEntry>,
    /// Directory default output paths are created under
    pub build_root: PathBuf,
}

impl ProjectSettings {
    pub fn enabled_scenes(&self) -> Vec<String> {
        self.scenes
            .iter()
            .filter(|scene| scene.enabled)
            .map(|scene| scene.path.clone())
            .collect()
    }
}

/// Compiles and packages the player executable
pub trait PlayerBuilder {
    fn build_player(&mut self, config: &BuildConfiguration) -> PlayerBuildResult;
}

/// Builds addressable content
///
/// Every build call blocks until the content build has completed, so the
/// returned result is final by the time the orchestrator reads it.
pub trait ContentBuilder {
    /// Full content (re)build
    fn build_content(&mut self) -> ContentBuildResult;

    /// Load the state of the previous release build, `None` if there is none
    fn load_content_state(&self, path: &Path) -> Result<Option<ContentState>>;

    /// Entries added or modified since `state` was recorded
    fn gather_modified_entries(&self, state: &ContentState) -> Result<Vec<ContentEntry>>;

    /// Collect `entries` into a named group for the next update build
    fn create_update_group(&mut self, name: &str, entries: &[ContentEntry]) -> Result<()>;

    /// Incremental build against a previous release build
    fn build_content_update(&mut self, state: &ContentState) -> ContentBuildResult;
}

/// The process hosting the build
pub trait Host {
    /// Terminate with the given exit code
    fn exit(&mut self, code: i32);
}

/// Host that terminates the current process
#[derive(Debug, Default)]
pub struct ProcessHost;

impl Host for ProcessHost {
    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}
