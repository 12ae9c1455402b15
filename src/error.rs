//! Error types and helpers for user-friendly error messages
//!
//! This module provides custom error types with actionable hints and suggestions
//! to help users quickly resolve common issues.

use thiserror::Error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        hint: Option<String>,
    },

    /// Tool/executable not found or misconfigured
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// Invalid project structure
    #[error("Invalid project structure: {message}")]
    ProjectStructure {
        message: String,
        expected: Vec<String>,
        hint: String,
    },
}

impl PipelineError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: None,
        }
    }

    /// Create a configuration error with source and hint
    pub fn config_error_with_hint(
        message: impl Into<String>,
        source: Option<anyhow::Error>,
        hint: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source,
            hint: Some(hint.into()),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Create a project structure error
    pub fn project_structure_error(
        message: impl Into<String>,
        expected: Vec<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::ProjectStructure {
            message: message.into(),
            expected,
            hint: hint.into(),
        }
    }

    /// Hint attached to this error, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            PipelineError::Config { hint, .. } => hint.as_deref(),
            PipelineError::MissingTool { hint, .. }
            | PipelineError::ProjectStructure { hint, .. } => Some(hint),
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        if let PipelineError::MissingTool { required_for, .. } = self {
            eprintln!("  required for {}", required_for);
        }

        if let Some(h) = self.hint() {
            eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
        }

        // Display expected structure for project errors
        if let PipelineError::ProjectStructure { expected, .. } = self {
            if !expected.is_empty() {
                eprintln!("\n{}", style("EXPECTED:").cyan().bold());
                for exp in expected {
                    eprintln!("  • {}", exp);
                }
            }
        }

        eprintln!();
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for Pipeline.toml not found
    pub fn pipeline_toml_not_found() -> &'static str {
        "Could not find Pipeline.toml in current directory or any parent directory.\n\
         \n\
         Create one at the project root with at least:\n\
         [project]\n\
         name = \"my-game\"\n\
         platform = \"StandaloneLinux64\"\n\
         platform_group = \"Standalone\"\n\
         \n\
         Or point at the project with --project <DIR>."
    }

    /// Get hint for invalid Pipeline.toml
    pub fn invalid_pipeline_toml() -> &'static str {
        "Pipeline.toml is invalid. Common issues:\n\
         • Missing [project] section\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • Hook keys must be quoted: [hooks.\"Studio.Build.Hooks.Stamp\"]"
    }

    /// Get hint for a hook key that cannot be resolved
    pub fn hook_key() -> &'static str {
        "Hook keys are dotted names with a namespace, a type and a method,\n\
         e.g. Studio.Build.Hooks.StampVersion. Each segment must start with a\n\
         letter or underscore and contain only letters, digits and underscores."
    }

    /// Get hint for a missing player build command
    pub fn player_command() -> &'static str {
        "Configure the command that builds the player in Pipeline.toml:\n\
         [player]\n\
         command = \"unity\"\n\
         args = [\"-quit\", \"-batchmode\", \"-executeMethod\", \"Build.Player\"]"
    }

    /// Get hint for a missing content build command
    pub fn content_command() -> &'static str {
        "Configure the command that builds content in Pipeline.toml:\n\
         [content]\n\
         command = \"unity\"\n\
         args = [\"-quit\", \"-batchmode\", \"-executeMethod\", \"Build.Content\"]\n\
         root = \"Assets/Content\""
    }
}
