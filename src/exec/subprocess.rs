//! Subprocess execution for external build commands

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// Result of a subprocess execution
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code(),
            stdout,
            stderr,
            duration,
        }
    }

    /// True when the process did not exit on its own
    pub fn was_interrupted(&self) -> bool {
        self.exit_code.is_none()
    }

    /// Short description of a failed run, preferring the captured stderr
    pub fn failure_summary(&self, program: &str) -> String {
        let status = match self.exit_code {
            Some(code) => format!("{} exited with status {}", program, code),
            None => format!("{} was terminated by a signal", program),
        };

        match self.stderr.trim().lines().last() {
            Some(line) if !line.is_empty() => format!("{}: {}", status, line),
            _ => status,
        }
    }
}

/// What to run and how
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec<'a> {
    pub program: &'a str,
    pub args: &'a [String],
    pub env: &'a BTreeMap<String, String>,
    pub cwd: &'a Path,
}

/// Run a command, either streaming its output or capturing it
pub fn run_command(spec: CommandSpec<'_>, inherit_io: bool) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(spec.program);
    cmd.args(spec.args).envs(spec.env).current_dir(spec.cwd);

    if inherit_io {
        // Inherit stdin/stdout/stderr so the tool's own log streams through
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd
            .status()
            .with_context(|| format!("Failed to execute {}", spec.program))?;

        Ok(CommandResult::from_status(
            status,
            String::new(),
            String::new(),
            start.elapsed(),
        ))
    } else {
        let output = cmd
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute {}", spec.program))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        Ok(CommandResult::from_status(
            output.status,
            stdout,
            stderr,
            start.elapsed(),
        ))
    }
}

/// Check if a command exists in PATH (or as a path relative to `cwd`)
pub fn command_exists(program: &str, cwd: &Path) -> bool {
    which::which_in(program, std::env::var_os("PATH"), cwd).is_ok()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn spec<'a>(program: &'a str, args: &'a [String], env: &'a BTreeMap<String, String>, cwd: &'a Path) -> CommandSpec<'a> {
        CommandSpec { program, args, env, cwd }
    }

    #[test]
    fn test_run_captures_output_and_env() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = vec!["-c".to_string(), "echo $GREETING; echo oops >&2; exit 3".to_string()];
        let mut env = BTreeMap::new();
        env.insert("GREETING".to_string(), "hello".to_string());

        let result = run_command(spec("sh", &args, &env, temp_dir.path()), false).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stdout.trim(), "hello");
        assert_eq!(result.failure_summary("sh"), "sh exited with status 3: oops");
        assert!(!result.was_interrupted());
    }

    #[test]
    fn test_signal_is_interrupted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = vec!["-c".to_string(), "kill -9 $$".to_string()];
        let env = BTreeMap::new();

        let result = run_command(spec("sh", &args, &env, temp_dir.path()), false).unwrap();

        assert!(result.was_interrupted());
        assert!(result.failure_summary("sh").contains("signal"));
    }

    #[test]
    fn test_missing_program() {
        let temp_dir = tempfile::tempdir().unwrap();
        let env = BTreeMap::new();
        assert!(run_command(spec("definitely-not-a-real-tool-42", &[], &env, temp_dir.path()), false).is_err());
        assert!(!command_exists("definitely-not-a-real-tool-42", temp_dir.path()));
        assert!(command_exists("sh", temp_dir.path()));
    }
}
