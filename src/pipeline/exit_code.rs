//! Process exit codes reported by the build orchestrator

use std::fmt;

use super::engine::PlayerBuildResult;

/// Outcome of a build stage, reported to the host as a numeric exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    UnknownError = 1,
    PlayerBuildCanceled = 2,
    PlayerBuildUnknownError = 3,
    PlayerBuildFailed = 4,
    MethodNotFound = 5,
    AddressablesBuildFailed = 6,
    AddressablesContentFileNotFound = 7,
}

impl ExitCode {
    /// Numeric value handed to the host process
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Success
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitCode::Success => "success",
            ExitCode::UnknownError => "unknown error",
            ExitCode::PlayerBuildCanceled => "player build canceled",
            ExitCode::PlayerBuildUnknownError => "player build result unknown",
            ExitCode::PlayerBuildFailed => "player build failed",
            ExitCode::MethodNotFound => "build hook method not found",
            ExitCode::AddressablesBuildFailed => "content build failed",
            ExitCode::AddressablesContentFileNotFound => "content state file not found",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

impl From<PlayerBuildResult> for ExitCode {
    fn from(result: PlayerBuildResult) -> Self {
        match result {
            PlayerBuildResult::Cancelled => ExitCode::PlayerBuildCanceled,
            PlayerBuildResult::Failed => ExitCode::PlayerBuildFailed,
            PlayerBuildResult::Unknown => ExitCode::PlayerBuildUnknownError,
            PlayerBuildResult::Succeeded => ExitCode::Success,
        }
    }
}
