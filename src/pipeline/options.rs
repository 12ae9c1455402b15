//! Player build configuration derived from project defaults and launch flags

use std::path::PathBuf;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

use super::args::{flags, ArgToken, LaunchArguments, ScanError};
use super::engine::ProjectSettings;

/// Feature switches of a player build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub development: bool,
    pub auto_run_player: bool,
    pub allow_debugging: bool,
}

/// Everything the player builder needs for one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub target: String,
    pub target_group: String,
    /// Enabled scenes in build-list order
    pub scenes: Vec<String>,
    pub output_path: PathBuf,
    pub options: BuildOptions,
}

/// Default output path: `<build_root>/<platform>/<y>-<m>-<d>_<seconds of day>`
pub fn default_output_path<Tz: TimeZone>(settings: &ProjectSettings, now: &DateTime<Tz>) -> PathBuf {
    let stamp = format!(
        "{}-{}-{}_{}",
        now.year(),
        now.month(),
        now.day(),
        now.num_seconds_from_midnight()
    );
    settings.build_root.join(&settings.platform).join(stamp)
}

/// Configuration before any launch flags are applied
pub fn default_configuration<Tz: TimeZone>(
    settings: &ProjectSettings,
    now: &DateTime<Tz>,
) -> BuildConfiguration {
    BuildConfiguration {
        target: settings.platform.clone(),
        target_group: settings.platform_group.clone(),
        scenes: settings.enabled_scenes(),
        output_path: default_output_path(settings, now),
        options: BuildOptions::default(),
    }
}

/// Apply one scanned launch token; unrecognized tokens leave `config` untouched
pub fn apply_flag(config: &mut BuildConfiguration, token: &ArgToken<'_>) {
    match *token {
        ArgToken::Valued(flags::LOCATION_PATH_NAME | flags::BUILD_PATH, path) => {
            config.output_path = PathBuf::from(path);
        }
        ArgToken::Flag(flags::DEVELOPMENT) => config.options.development = true,
        ArgToken::Flag(flags::RELEASE) => config.options.development = false,
        ArgToken::Flag(flags::AUTO_RUN_PLAYER) => config.options.auto_run_player = true,
        ArgToken::Flag(flags::ALLOW_DEBUGGING) => config.options.allow_debugging = true,
        _ => {}
    }
}

/// Derive the player build configuration for this invocation
///
/// Flags are applied in argument order, so the last `-buildPath` wins.
pub fn build_configuration<Tz: TimeZone>(
    settings: &ProjectSettings,
    args: &LaunchArguments,
    now: &DateTime<Tz>,
) -> Result<BuildConfiguration, ScanError> {
    let mut config = default_configuration(settings, now);
    for token in args.scan()? {
        apply_flag(&mut config, &token);
    }
    Ok(config)
}

/// [`build_configuration`] stamped with the local wall clock
pub fn build_configuration_now(
    settings: &ProjectSettings,
    args: &LaunchArguments,
) -> Result<BuildConfiguration, ScanError> {
    build_configuration(settings, args, &Local::now())
}
