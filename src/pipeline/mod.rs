//! Build orchestration driven by editor-style launch arguments
//!
//! ## Architecture
//!
//! ```text
//! LaunchArguments → options (BuildConfiguration) ─┐
//!                 → hooks (HookRegistry) ─────────┼→ Orchestrator → PlayerBuilder / ContentBuilder
//!                                                  └→ ExitCode → Host
//! ```
//!
//! ## Modules
//!
//! - `args` - Launch argument scanning and the recognized flag names
//! - `options` - Player build configuration from project defaults plus flags
//! - `hooks` - Registry of pre/post-build hooks addressed by dotted name
//! - `engine` - Player/content builder and host traits
//! - `exit_code` - Exit codes and native result mapping
//! - `orchestrator` - Stage sequencing and exit policy

pub mod args;
pub mod engine;
pub mod exit_code;
pub mod hooks;
pub mod options;
pub mod orchestrator;

pub use args::LaunchArguments;
pub use engine::{ContentBuilder, Host, PlayerBuilder, ProcessHost, ProjectSettings};
pub use exit_code::ExitCode;
pub use hooks::HookRegistry;
pub use orchestrator::{Orchestrator, RunReport};
