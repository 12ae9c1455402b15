//! Subprocess-backed build engines
//!
//! The orchestrator in `crate::pipeline` only knows the `PlayerBuilder` and
//! `ContentBuilder` traits. This module implements both by running the
//! commands configured in Pipeline.toml.
//!
//! ## Modules
//!
//! - `player` - Player build command, configuration passed via environment
//! - `content` - Content build command plus content state / update groups
//! - `hooks` - Hook commands declared in Pipeline.toml

pub mod content;
pub mod hooks;
pub mod player;

pub use content::CommandContentBuilder;
pub use player::CommandPlayerBuilder;

/// Environment variables passed to build commands
pub mod env {
    pub const TARGET: &str = "BUILDPIPE_TARGET";
    pub const TARGET_GROUP: &str = "BUILDPIPE_TARGET_GROUP";
    pub const SCENES: &str = "BUILDPIPE_SCENES";
    pub const OUTPUT: &str = "BUILDPIPE_OUTPUT";
    pub const DEVELOPMENT: &str = "BUILDPIPE_DEVELOPMENT";
    pub const AUTO_RUN: &str = "BUILDPIPE_AUTO_RUN";
    pub const ALLOW_DEBUGGING: &str = "BUILDPIPE_ALLOW_DEBUGGING";

    pub const CONTENT_MODE: &str = "BUILDPIPE_CONTENT_MODE";
    pub const CONTENT_STATE: &str = "BUILDPIPE_CONTENT_STATE";
    pub const UPDATE_GROUP: &str = "BUILDPIPE_UPDATE_GROUP";
    pub const PREVIOUS_VERSION: &str = "BUILDPIPE_PREVIOUS_VERSION";

    /// Set for hook commands: the hook key being run
    pub const HOOK: &str = "BUILDPIPE_HOOK";
}
