//! Argument-driven build orchestration
//!
//! A run walks the launch arguments once and executes every build-mode flag
//! it meets, in order:
//!
//! ```text
//! Idle → ScanningArgs → [RunningPreBuildHooks] → RunningStage(..) → [RunningPostBuildHooks] → Terminating
//! ```
//!
//! Each stage resolves to an [`ExitCode`] before the next one starts. A
//! failing stage terminates the host only in batch mode (`-batchmode`);
//! interactive runs log the failure and carry on, and never terminate the
//! host at all.

use std::fmt;
use std::path::{Path, PathBuf};

use super::args::{flags, ArgToken, LaunchArguments, ScanError};
use super::engine::{
    ContentBuildResult, ContentBuilder, Host, PlayerBuilder, ProjectSettings,
    CONTENT_UPDATE_GROUP, DEFAULT_CONTENT_STATE_PATH,
};
use super::exit_code::ExitCode;
use super::hooks::{HookError, HookOutcome, HookRegistry};
use super::options::build_configuration_now;
use crate::utils::terminal::{print_error, print_info, print_success, print_warning};

/// A build stage requested by a build-mode flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Player,
    LegacyBundles,
    ContentRelease,
    ContentUpdate,
}

impl Stage {
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            flags::BUILD_PLAYER => Some(Stage::Player),
            flags::BUILD_ASSET_BUNDLES => Some(Stage::LegacyBundles),
            flags::ADDRESSABLES_RELEASE_BUILD => Some(Stage::ContentRelease),
            flags::ADDRESSABLES_UPDATE_BUILD => Some(Stage::ContentUpdate),
            _ => None,
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Stage::Player => flags::BUILD_PLAYER,
            Stage::LegacyBundles => flags::BUILD_ASSET_BUNDLES,
            Stage::ContentRelease => flags::ADDRESSABLES_RELEASE_BUILD,
            Stage::ContentUpdate => flags::ADDRESSABLES_UPDATE_BUILD,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Player => write!(f, "player build"),
            Stage::LegacyBundles => write!(f, "asset bundle build"),
            Stage::ContentRelease => write!(f, "content build"),
            Stage::ContentUpdate => write!(f, "content update build"),
        }
    }
}

/// Where the orchestrator is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    ScanningArgs,
    RunningPreBuildHooks,
    RunningStage(Stage),
    RunningPostBuildHooks,
    Terminating,
}

/// Exit code of one executed stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub code: ExitCode,
}

/// Summary of a run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Stages in execution order
    pub stages: Vec<StageReport>,
    /// Set when the launch arguments could not be scanned
    pub scan_error: Option<ScanError>,
    /// Exit code handed to the host, if the host was terminated
    pub exit_code: Option<i32>,
}

impl RunReport {
    /// First failure of the run, or `Success`
    pub fn final_code(&self) -> ExitCode {
        if self.scan_error.is_some() {
            return ExitCode::UnknownError;
        }
        self.stages
            .iter()
            .map(|s| s.code)
            .find(|code| !code.is_success())
            .unwrap_or(ExitCode::Success)
    }

    pub fn terminated(&self) -> bool {
        self.exit_code.is_some()
    }
}

/// Drives build stages from launch arguments
pub struct Orchestrator {
    args: LaunchArguments,
    settings: ProjectSettings,
    hooks: HookRegistry,
    player: Box<dyn PlayerBuilder>,
    content: Box<dyn ContentBuilder>,
    host: Box<dyn Host>,
    content_state_path: PathBuf,
    verbose: bool,
    state: RunState,
}

impl Orchestrator {
    pub fn new(
        args: LaunchArguments,
        settings: ProjectSettings,
        player: Box<dyn PlayerBuilder>,
        content: Box<dyn ContentBuilder>,
        host: Box<dyn Host>,
    ) -> Self {
        Self {
            args,
            settings,
            hooks: HookRegistry::new(),
            player,
            content,
            host,
            content_state_path: PathBuf::from(DEFAULT_CONTENT_STATE_PATH),
            verbose: false,
            state: RunState::Idle,
        }
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_content_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.content_state_path = path.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn content_state_path(&self) -> &Path {
        &self.content_state_path
    }

    /// Run every stage requested by the launch arguments, in argument order
    pub fn run(&mut self) -> RunReport {
        let mut report = RunReport::default();

        let stages = match self.scan_stages() {
            Ok(stages) => stages,
            Err(err) => {
                self.reject_arguments(err, &mut report);
                return report;
            }
        };

        if stages.is_empty() {
            print_warning("no build stage requested (expected one of -buildPlayer, -buildAssetBundles, -addressablesReleaseBuild, -addressablesUpdateBuild)");
        }

        for stage in stages {
            if self.execute(stage, &mut report) {
                return report;
            }
        }

        self.finish(&mut report);
        report
    }

    /// Content build followed by a player build
    ///
    /// The player build only starts when the content build succeeded.
    pub fn run_build_all(&mut self) -> RunReport {
        let mut report = RunReport::default();

        if let Err(err) = self.scan_stages() {
            self.reject_arguments(err, &mut report);
            return report;
        }

        let content_ok = {
            if self.execute(Stage::ContentRelease, &mut report) {
                return report;
            }
            report.final_code().is_success()
        };

        if content_ok {
            if self.execute(Stage::Player, &mut report) {
                return report;
            }
        } else {
            print_warning("skipping player build because the content build failed");
        }

        self.finish(&mut report);
        report
    }

    fn scan_stages(&mut self) -> Result<Vec<Stage>, ScanError> {
        self.transition(RunState::ScanningArgs);
        let tokens = self.args.scan()?;
        Ok(tokens
            .iter()
            .filter_map(|token| match token {
                ArgToken::Flag(flag) => Stage::from_flag(flag),
                ArgToken::Valued(..) => None,
            })
            .collect())
    }

    fn reject_arguments(&mut self, err: ScanError, report: &mut RunReport) {
        print_error(&format!("invalid launch arguments: {}", err));
        report.scan_error = Some(err);
        if !self.exit_on_error(ExitCode::UnknownError, report) {
            self.transition(RunState::Idle);
        }
    }

    /// Run one stage and apply the exit policy; true if the host was terminated
    fn execute(&mut self, stage: Stage, report: &mut RunReport) -> bool {
        if self.verbose {
            print_info(&format!("starting {} ({})", stage, stage.flag()));
        }

        let code = self.run_stage(stage);
        report.stages.push(StageReport { stage, code });

        if code.is_success() {
            print_success(&format!("{} finished", stage));
        }
        self.exit_on_error(code, report)
    }

    fn run_stage(&mut self, stage: Stage) -> ExitCode {
        match stage {
            Stage::Player => self.build_player(),
            Stage::LegacyBundles => {
                self.transition(RunState::RunningStage(stage));
                print_error("asset bundle builds are no longer supported, use -addressablesReleaseBuild");
                ExitCode::UnknownError
            }
            Stage::ContentRelease => self.build_content_release(),
            Stage::ContentUpdate => self.build_content_update(),
        }
    }

    fn build_player(&mut self) -> ExitCode {
        self.transition(RunState::RunningPreBuildHooks);
        if let Err(code) = self.run_hooks(flags::EXECUTE_PRE_BUILD_METHOD) {
            return code;
        }

        self.transition(RunState::RunningStage(Stage::Player));
        let config = match build_configuration_now(&self.settings, &self.args) {
            Ok(config) => config,
            Err(err) => {
                print_error(&err.to_string());
                return ExitCode::UnknownError;
            }
        };

        if self.verbose {
            print_info(&format!(
                "target {} ({}), {} scene(s), output {}",
                config.target,
                config.target_group,
                config.scenes.len(),
                config.output_path.display()
            ));
        }

        let result = self.player.build_player(&config);

        self.transition(RunState::RunningPostBuildHooks);
        if let Err(code) = self.run_hooks(flags::EXECUTE_POST_BUILD_METHOD) {
            return code;
        }

        ExitCode::from(result)
    }

    fn build_content_release(&mut self) -> ExitCode {
        self.transition(RunState::RunningStage(Stage::ContentRelease));
        let result = self.content.build_content();
        self.content_code(&result)
    }

    fn build_content_update(&mut self) -> ExitCode {
        self.transition(RunState::RunningStage(Stage::ContentUpdate));

        let state = match self.content.load_content_state(&self.content_state_path) {
            Ok(Some(state)) => state,
            Ok(None) => {
                print_error(&format!(
                    "content state file not found: {}",
                    self.content_state_path.display()
                ));
                return ExitCode::AddressablesContentFileNotFound;
            }
            Err(err) => {
                print_error(&format!("{:#}", err));
                return ExitCode::AddressablesBuildFailed;
            }
        };

        if self.verbose {
            print_info(&format!("updating content version {}", state.version));
        }

        let entries = match self.content.gather_modified_entries(&state) {
            Ok(entries) => entries,
            Err(err) => {
                print_error(&format!("{:#}", err));
                return ExitCode::AddressablesBuildFailed;
            }
        };

        if self.verbose {
            print_info(&format!("{} modified content entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" }));
        }

        if let Err(err) = self.content.create_update_group(CONTENT_UPDATE_GROUP, &entries) {
            print_error(&format!("{:#}", err));
            return ExitCode::AddressablesBuildFailed;
        }

        let result = self.content.build_content_update(&state);
        self.content_code(&result)
    }

    fn content_code(&self, result: &ContentBuildResult) -> ExitCode {
        if result.is_success() {
            if self.verbose {
                print_info(&format!("content build took {:.1}s", result.duration.as_secs_f64()));
            }
            ExitCode::Success
        } else {
            print_error(&result.error);
            ExitCode::AddressablesBuildFailed
        }
    }

    /// Run every hook named by `flag`, stopping at the first error
    fn run_hooks(&self, flag: &str) -> Result<(), ExitCode> {
        let suppress = self.args.has_flag(flags::NO_ERROR_ON_METHOD_NOT_FOUND);

        for path in self.args.values_of(flag) {
            match self.hooks.invoke(path, suppress) {
                Ok(HookOutcome::Invoked(key)) => {
                    if self.verbose {
                        print_info(&format!("ran build hook {}", key));
                    }
                }
                Ok(HookOutcome::Skipped) => {}
                Err(err) => {
                    print_error(&err.to_string());
                    if let HookError::Failed { source, .. } = &err {
                        print_error(&format!("{:#}", source));
                    }
                    return Err(if err.is_not_found() {
                        ExitCode::MethodNotFound
                    } else {
                        ExitCode::UnknownError
                    });
                }
            }
        }

        Ok(())
    }

    /// Terminate the host on failure in batch mode; true if terminated
    fn exit_on_error(&mut self, code: ExitCode, report: &mut RunReport) -> bool {
        if code.is_success() {
            return false;
        }

        if self.args.is_batch_mode() {
            self.terminate(code.code(), report);
            true
        } else {
            print_error(&format!("build error: {}", code));
            false
        }
    }

    fn finish(&mut self, report: &mut RunReport) {
        if self.args.is_batch_mode() {
            self.terminate(ExitCode::Success.code(), report);
        } else {
            self.transition(RunState::Idle);
        }
    }

    fn terminate(&mut self, code: i32, report: &mut RunReport) {
        self.transition(RunState::Terminating);
        report.exit_code = Some(code);
        self.host.exit(code);
    }

    fn transition(&mut self, state: RunState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::engine::{ContentEntry, ContentState, PlayerBuildResult, SceneEntry};
    use crate::pipeline::options::BuildConfiguration;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;
    use std::time::Duration;

    type Events = Rc<RefCell<Vec<String>>>;

    struct StubPlayer {
        result: PlayerBuildResult,
        configs: Rc<RefCell<Vec<BuildConfiguration>>>,
        events: Events,
    }

    impl PlayerBuilder for StubPlayer {
        fn build_player(&mut self, config: &BuildConfiguration) -> PlayerBuildResult {
            self.events.borrow_mut().push("player".to_string());
            self.configs.borrow_mut().push(config.clone());
            self.result
        }
    }

    struct StubContent {
        release_error: String,
        update_error: String,
        state: Option<ContentState>,
        modified: Vec<ContentEntry>,
        groups: Rc<RefCell<Vec<(String, usize)>>>,
        events: Events,
    }

    impl ContentBuilder for StubContent {
        fn build_content(&mut self) -> ContentBuildResult {
            self.events.borrow_mut().push("content".to_string());
            if self.release_error.is_empty() {
                ContentBuildResult::succeeded(Duration::from_millis(5))
            } else {
                ContentBuildResult::failed(self.release_error.clone())
            }
        }

        fn load_content_state(&self, _path: &Path) -> anyhow::Result<Option<ContentState>> {
            Ok(self.state.clone())
        }

        fn gather_modified_entries(&self, _state: &ContentState) -> anyhow::Result<Vec<ContentEntry>> {
            Ok(self.modified.clone())
        }

        fn create_update_group(&mut self, name: &str, entries: &[ContentEntry]) -> anyhow::Result<()> {
            self.groups.borrow_mut().push((name.to_string(), entries.len()));
            Ok(())
        }

        fn build_content_update(&mut self, state: &ContentState) -> ContentBuildResult {
            self.events.borrow_mut().push(format!("content-update:{}", state.version));
            if self.update_error.is_empty() {
                ContentBuildResult::succeeded(Duration::from_millis(5))
            } else {
                ContentBuildResult::failed(self.update_error.clone())
            }
        }
    }

    struct RecordingHost {
        exits: Rc<RefCell<Vec<i32>>>,
    }

    impl Host for RecordingHost {
        fn exit(&mut self, code: i32) {
            self.exits.borrow_mut().push(code);
        }
    }

    struct Harness {
        player_result: PlayerBuildResult,
        release_error: String,
        update_error: String,
        state: Option<ContentState>,
        hooks: Vec<&'static str>,
        failing_hooks: Vec<&'static str>,
        configs: Rc<RefCell<Vec<BuildConfiguration>>>,
        groups: Rc<RefCell<Vec<(String, usize)>>>,
        exits: Rc<RefCell<Vec<i32>>>,
        events: Events,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                player_result: PlayerBuildResult::Succeeded,
                release_error: String::new(),
                update_error: String::new(),
                state: None,
                hooks: Vec::new(),
                failing_hooks: Vec::new(),
                configs: Rc::default(),
                groups: Rc::default(),
                exits: Rc::default(),
                events: Rc::default(),
            }
        }

        fn orchestrator(&self, args: &[&str]) -> Orchestrator {
            let settings = ProjectSettings {
                platform: "StandaloneLinux64".to_string(),
                platform_group: "Standalone".to_string(),
                scenes: vec![SceneEntry {
                    path: "Assets/Scenes/Main.unity".to_string(),
                    enabled: true,
                }],
                build_root: PathBuf::from("Builds"),
            };

            let mut registry = HookRegistry::new();
            for key in &self.hooks {
                let events = Rc::clone(&self.events);
                let key = *key;
                registry
                    .register(key, move || {
                        events.borrow_mut().push(format!("hook:{}", key));
                        Ok(())
                    })
                    .unwrap();
            }
            for key in &self.failing_hooks {
                registry.register(*key, || anyhow::bail!("hook exploded")).unwrap();
            }

            Orchestrator::new(
                LaunchArguments::new(args.iter().copied()),
                settings,
                Box::new(StubPlayer {
                    result: self.player_result,
                    configs: Rc::clone(&self.configs),
                    events: Rc::clone(&self.events),
                }),
                Box::new(StubContent {
                    release_error: self.release_error.clone(),
                    update_error: self.update_error.clone(),
                    state: self.state.clone(),
                    modified: vec![ContentEntry {
                        path: "Assets/Content/hero.prefab".to_string(),
                        hash: "abc".to_string(),
                    }],
                    groups: Rc::clone(&self.groups),
                    events: Rc::clone(&self.events),
                }),
                Box::new(RecordingHost {
                    exits: Rc::clone(&self.exits),
                }),
            )
            .with_hooks(registry)
        }

        fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }

        fn exits(&self) -> Vec<i32> {
            self.exits.borrow().clone()
        }
    }

    fn prior_state() -> ContentState {
        ContentState {
            version: "v1".to_string(),
            built_at: "2024-01-01T00:00:00Z".to_string(),
            entries: BTreeMap::new(),
        }
    }

    #[test]
    fn test_player_build_interactive_success() {
        let harness = Harness::new();
        let mut orchestrator =
            harness.orchestrator(&["-buildPlayer", "-buildPath", "/tmp/out", "-development"]);

        let report = orchestrator.run();

        let configs = harness.configs.borrow();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].output_path, PathBuf::from("/tmp/out"));
        assert!(configs[0].options.development);
        assert_eq!(configs[0].scenes, vec!["Assets/Scenes/Main.unity"]);
        assert_eq!(report.final_code(), ExitCode::Success);
        assert!(!report.terminated());
        assert!(harness.exits().is_empty());
        assert_eq!(orchestrator.state(), RunState::Idle);
    }

    #[test]
    fn test_update_build_without_state_terminates_with_7() {
        let harness = Harness::new();
        let mut orchestrator = harness.orchestrator(&["-addressablesUpdateBuild", "-batchmode"]);

        let report = orchestrator.run();

        assert_eq!(report.final_code(), ExitCode::AddressablesContentFileNotFound);
        assert_eq!(report.exit_code, Some(7));
        assert_eq!(harness.exits(), vec![7]);
        assert_eq!(orchestrator.state(), RunState::Terminating);
    }

    #[test]
    fn test_batch_success_exits_zero() {
        let harness = Harness::new();
        let mut orchestrator = harness.orchestrator(&["-batchmode", "-buildPlayer"]);

        let report = orchestrator.run();

        assert_eq!(report.final_code(), ExitCode::Success);
        assert_eq!(harness.exits(), vec![0]);
    }

    #[test]
    fn test_player_results_map_to_exit_codes_in_batch_mode() {
        let cases = [
            (PlayerBuildResult::Cancelled, 2),
            (PlayerBuildResult::Failed, 4),
            (PlayerBuildResult::Unknown, 3),
        ];

        for (result, expected) in cases {
            let mut harness = Harness::new();
            harness.player_result = result;
            let report = harness.orchestrator(&["-buildPlayer", "-batchmode"]).run();

            assert_eq!(report.final_code().code(), expected);
            assert_eq!(harness.exits(), vec![expected]);
        }
    }

    #[test]
    fn test_interactive_failure_never_terminates() {
        let mut harness = Harness::new();
        harness.player_result = PlayerBuildResult::Failed;
        let report = harness
            .orchestrator(&["-buildPlayer", "-addressablesReleaseBuild"])
            .run();

        assert_eq!(report.stages.len(), 2);
        assert_eq!(report.stages[0].code, ExitCode::PlayerBuildFailed);
        assert_eq!(report.stages[1].code, ExitCode::Success);
        assert_eq!(report.final_code(), ExitCode::PlayerBuildFailed);
        assert!(harness.exits().is_empty());
    }

    #[test]
    fn test_batch_failure_stops_remaining_stages() {
        let mut harness = Harness::new();
        harness.release_error = "missing bundle".to_string();
        let report = harness
            .orchestrator(&["-batchmode", "-addressablesReleaseBuild", "-buildPlayer"])
            .run();

        assert_eq!(report.stages.len(), 1);
        assert_eq!(report.stages[0].code, ExitCode::AddressablesBuildFailed);
        assert_eq!(harness.exits(), vec![6]);
        assert_eq!(harness.events(), vec!["content"]);
    }

    #[test]
    fn test_stages_run_in_argument_order() {
        let mut harness = Harness::new();
        harness.state = Some(prior_state());
        harness
            .orchestrator(&[
                "-addressablesReleaseBuild",
                "-buildPlayer",
                "-addressablesUpdateBuild",
            ])
            .run();

        assert_eq!(harness.events(), vec!["content", "player", "content-update:v1"]);
    }

    #[test]
    fn test_value_tokens_are_not_stages() {
        let harness = Harness::new();
        let report = harness.orchestrator(&["-buildPath", "-buildPlayer"]).run();

        assert!(report.stages.is_empty());
        assert!(harness.events().is_empty());
    }

    #[test]
    fn test_legacy_bundles_always_fail() {
        let harness = Harness::new();
        let report = harness.orchestrator(&["-buildAssetBundles", "-batchmode"]).run();

        assert_eq!(report.stages[0].stage, Stage::LegacyBundles);
        assert_eq!(harness.exits(), vec![1]);
    }

    #[test]
    fn test_update_build_with_state() {
        let mut harness = Harness::new();
        harness.state = Some(prior_state());
        let report = harness.orchestrator(&["-addressablesUpdateBuild", "-batchmode"]).run();

        assert_eq!(report.final_code(), ExitCode::Success);
        assert_eq!(*harness.groups.borrow(), vec![("Update Group".to_string(), 1)]);
        assert_eq!(harness.events(), vec!["content-update:v1"]);
        assert_eq!(harness.exits(), vec![0]);
    }

    #[test]
    fn test_update_build_failure() {
        let mut harness = Harness::new();
        harness.state = Some(prior_state());
        harness.update_error = "incompatible catalog".to_string();
        let report = harness.orchestrator(&["-addressablesUpdateBuild"]).run();

        assert_eq!(report.final_code(), ExitCode::AddressablesBuildFailed);
        assert!(harness.exits().is_empty());
    }

    #[test]
    fn test_hooks_wrap_player_build_in_order() {
        let mut harness = Harness::new();
        harness.hooks = vec!["Ci.Hooks.Pre.One", "Ci.Hooks.Pre.Two", "Ci.Hooks.Post.Done"];
        harness
            .orchestrator(&[
                "-executePostBuildMethod",
                "Hooks.Post.Done",
                "-executePreBuildMethod",
                "Ci.Hooks.Pre.Two",
                "-buildPlayer",
                "-executePreBuildMethod",
                "Hooks.Pre.One",
            ])
            .run();

        assert_eq!(
            harness.events(),
            vec![
                "hook:Ci.Hooks.Pre.Two",
                "hook:Ci.Hooks.Pre.One",
                "player",
                "hook:Ci.Hooks.Post.Done",
            ]
        );
    }

    #[test]
    fn test_missing_hook_aborts_player_build() {
        let harness = Harness::new();
        let report = harness
            .orchestrator(&["-executePreBuildMethod", "Ci.Hooks.Missing", "-buildPlayer", "-batchmode"])
            .run();

        assert_eq!(report.final_code(), ExitCode::MethodNotFound);
        assert_eq!(harness.exits(), vec![5]);
        assert!(harness.configs.borrow().is_empty());
    }

    #[test]
    fn test_malformed_hook_path_is_not_found() {
        let harness = Harness::new();
        let report = harness
            .orchestrator(&["-executePreBuildMethod", "Missing", "-buildPlayer"])
            .run();

        assert_eq!(report.final_code(), ExitCode::MethodNotFound);
    }

    #[test]
    fn test_missing_hook_suppressed() {
        let harness = Harness::new();
        let report = harness
            .orchestrator(&[
                "-executePreBuildMethod",
                "Ci.Hooks.Missing",
                "-noErrorOnMethodNotFound",
                "-buildPlayer",
                "-batchmode",
            ])
            .run();

        assert_eq!(report.final_code(), ExitCode::Success);
        assert_eq!(harness.events(), vec!["player"]);
        assert_eq!(harness.exits(), vec![0]);
    }

    #[test]
    fn test_failing_post_hook_reports_unknown_error() {
        let mut harness = Harness::new();
        harness.failing_hooks = vec!["Ci.Hooks.Post.Upload"];
        let report = harness
            .orchestrator(&["-buildPlayer", "-executePostBuildMethod", "Ci.Hooks.Post.Upload"])
            .run();

        assert_eq!(report.final_code(), ExitCode::UnknownError);
        assert_eq!(harness.events(), vec!["player"]);
    }

    #[test]
    fn test_trailing_value_flag_rejected_before_stages() {
        let harness = Harness::new();
        let report = harness
            .orchestrator(&["-buildPlayer", "-batchmode", "-buildPath"])
            .run();

        assert!(report.scan_error.is_some());
        assert!(report.stages.is_empty());
        assert_eq!(report.final_code(), ExitCode::UnknownError);
        assert_eq!(harness.exits(), vec![1]);
        assert!(harness.events().is_empty());
    }

    #[test]
    fn test_trailing_value_flag_interactive() {
        let harness = Harness::new();
        let report = harness.orchestrator(&["-buildPlayer", "-buildPath"]).run();

        assert_eq!(report.final_code(), ExitCode::UnknownError);
        assert!(harness.exits().is_empty());
        assert!(harness.events().is_empty());
    }

    #[test]
    fn test_no_stage_interactive_is_noop() {
        let harness = Harness::new();
        let report = harness.orchestrator(&["-development"]).run();

        assert!(report.stages.is_empty());
        assert_eq!(report.final_code(), ExitCode::Success);
        assert!(harness.exits().is_empty());
    }

    #[test]
    fn test_build_all_runs_content_then_player() {
        let harness = Harness::new();
        let report = harness.orchestrator(&["-batchmode"]).run_build_all();

        assert_eq!(harness.events(), vec!["content", "player"]);
        assert_eq!(report.final_code(), ExitCode::Success);
        assert_eq!(harness.exits(), vec![0]);
    }

    #[test]
    fn test_build_all_skips_player_when_content_fails() {
        let mut harness = Harness::new();
        harness.release_error = "bad group".to_string();
        let report = harness.orchestrator(&[]).run_build_all();

        assert_eq!(harness.events(), vec!["content"]);
        assert_eq!(report.final_code(), ExitCode::AddressablesBuildFailed);
        assert!(harness.exits().is_empty());
    }

    #[test]
    fn test_stage_flags_round_trip() {
        for stage in [
            Stage::Player,
            Stage::LegacyBundles,
            Stage::ContentRelease,
            Stage::ContentUpdate,
        ] {
            assert_eq!(Stage::from_flag(stage.flag()), Some(stage));
        }
        assert_eq!(Stage::from_flag("-buildplayer"), None);
    }
}
