//! Player builds through an external command
//!
//! The configured command receives the build configuration through
//! `BUILDPIPE_*` environment variables and reports its outcome through its
//! exit status: 0 is success, a signal is a cancellation, anything else is a
//! failure. A command that cannot be started leaves the result unknown.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::env;
use crate::config::CommandConfig;
use crate::error::{hints, PipelineError};
use crate::exec::subprocess::{command_exists, run_command, CommandSpec};
use crate::pipeline::engine::{PlayerBuildResult, PlayerBuilder};
use crate::pipeline::options::BuildConfiguration;
use crate::utils::paths::ensure_dir;
use crate::utils::terminal::{create_spinner, print_error};

/// Player builder backed by the `[player]` command of Pipeline.toml
#[derive(Debug)]
pub struct CommandPlayerBuilder {
    project_root: PathBuf,
    command: Option<CommandConfig>,
    verbose: bool,
}

impl CommandPlayerBuilder {
    pub fn new(project_root: PathBuf, command: Option<CommandConfig>, verbose: bool) -> Self {
        Self {
            project_root,
            command,
            verbose,
        }
    }
}

/// Environment describing `config` to the player build command
pub fn player_env(config: &BuildConfiguration) -> BTreeMap<String, String> {
    let flag = |on: bool| (if on { "1" } else { "0" }).to_string();

    BTreeMap::from([
        (env::TARGET.to_string(), config.target.clone()),
        (env::TARGET_GROUP.to_string(), config.target_group.clone()),
        (env::SCENES.to_string(), config.scenes.join(";")),
        (env::OUTPUT.to_string(), config.output_path.display().to_string()),
        (env::DEVELOPMENT.to_string(), flag(config.options.development)),
        (env::AUTO_RUN.to_string(), flag(config.options.auto_run_player)),
        (env::ALLOW_DEBUGGING.to_string(), flag(config.options.allow_debugging)),
    ])
}

impl PlayerBuilder for CommandPlayerBuilder {
    fn build_player(&mut self, config: &BuildConfiguration) -> PlayerBuildResult {
        let Some(command) = &self.command else {
            PipelineError::config_error_with_hint(
                "No player build command configured",
                None,
                hints::player_command(),
            )
            .display_with_hints();
            return PlayerBuildResult::Failed;
        };

        if !command_exists(&command.command, &self.project_root) {
            PipelineError::missing_tool(&command.command, "player build", hints::player_command())
                .display_with_hints();
            return PlayerBuildResult::Unknown;
        }

        let output_path = self.project_root.join(&config.output_path);
        if let Some(parent) = output_path.parent() {
            if let Err(err) = ensure_dir(parent) {
                print_error(&format!("{:#}", err));
                return PlayerBuildResult::Failed;
            }
        }

        let mut environment = command.env.clone();
        environment.extend(player_env(config));

        let spec = CommandSpec {
            program: &command.command,
            args: &command.args,
            env: &environment,
            cwd: &self.project_root,
        };

        let spinner = (!self.verbose).then(|| {
            create_spinner(&format!("Building player for {}...", config.target))
        });
        let result = run_command(spec, self.verbose);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match result {
            Ok(result) if result.success => PlayerBuildResult::Succeeded,
            Ok(result) if result.was_interrupted() => {
                print_error(&result.failure_summary(&command.command));
                PlayerBuildResult::Cancelled
            }
            Ok(result) => {
                if !self.verbose && !result.stdout.trim().is_empty() {
                    eprintln!("{}", result.stdout.trim_end());
                }
                print_error(&result.failure_summary(&command.command));
                PlayerBuildResult::Failed
            }
            Err(err) => {
                print_error(&format!("{:#}", err));
                PlayerBuildResult::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::options::BuildOptions;

    fn configuration(output: &str) -> BuildConfiguration {
        BuildConfiguration {
            target: "StandaloneLinux64".to_string(),
            target_group: "Standalone".to_string(),
            scenes: vec!["Assets/A.unity".to_string(), "Assets/B.unity".to_string()],
            output_path: PathBuf::from(output),
            options: BuildOptions {
                development: true,
                auto_run_player: false,
                allow_debugging: true,
            },
        }
    }

    fn shell(script: &str) -> Option<CommandConfig> {
        Some(CommandConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            env: BTreeMap::new(),
        })
    }

    #[test]
    fn test_player_env() {
        let vars = player_env(&configuration("Builds/linux/game"));
        assert_eq!(vars[env::TARGET], "StandaloneLinux64");
        assert_eq!(vars[env::TARGET_GROUP], "Standalone");
        assert_eq!(vars[env::SCENES], "Assets/A.unity;Assets/B.unity");
        assert_eq!(vars[env::OUTPUT], "Builds/linux/game");
        assert_eq!(vars[env::DEVELOPMENT], "1");
        assert_eq!(vars[env::AUTO_RUN], "0");
        assert_eq!(vars[env::ALLOW_DEBUGGING], "1");
    }

    #[test]
    fn test_unconfigured_player_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut builder = CommandPlayerBuilder::new(temp_dir.path().to_path_buf(), None, false);
        assert_eq!(builder.build_player(&configuration("out/game")), PlayerBuildResult::Failed);
    }

    #[test]
    fn test_missing_tool_is_unknown() {
        let temp_dir = tempfile::tempdir().unwrap();
        let command = CommandConfig {
            command: "definitely-not-a-real-tool-42".to_string(),
            args: Vec::new(),
            env: BTreeMap::new(),
        };
        let mut builder =
            CommandPlayerBuilder::new(temp_dir.path().to_path_buf(), Some(command), false);
        assert_eq!(builder.build_player(&configuration("out/game")), PlayerBuildResult::Unknown);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_outcomes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().to_path_buf();

        let mut ok = CommandPlayerBuilder::new(
            root.clone(),
            shell("test \"$BUILDPIPE_DEVELOPMENT\" = 1 && touch \"$BUILDPIPE_OUTPUT\""),
            false,
        );
        assert_eq!(ok.build_player(&configuration("out/game")), PlayerBuildResult::Succeeded);
        assert!(root.join("out/game").exists());

        let mut failed = CommandPlayerBuilder::new(root.clone(), shell("exit 2"), false);
        assert_eq!(failed.build_player(&configuration("out/game")), PlayerBuildResult::Failed);

        let mut killed = CommandPlayerBuilder::new(root, shell("kill -9 $$"), false);
        assert_eq!(killed.build_player(&configuration("out/game")), PlayerBuildResult::Cancelled);
    }
}
