//! Launch argument scanning
//!
//! Launch arguments use the editor convention of single-dash camelCase flags
//! (`-buildPlayer`, `-buildPath <path>`). A handful of flags take exactly one
//! value, which is always the next token. Everything else is a bare switch;
//! unknown tokens are carried through so newer callers can pass flags this
//! version does not understand.

use thiserror::Error;

/// Recognized launch flags
pub mod flags {
    pub const BUILD_PLAYER: &str = "-buildPlayer";
    pub const BUILD_ASSET_BUNDLES: &str = "-buildAssetBundles";
    pub const ADDRESSABLES_RELEASE_BUILD: &str = "-addressablesReleaseBuild";
    pub const ADDRESSABLES_UPDATE_BUILD: &str = "-addressablesUpdateBuild";

    pub const LOCATION_PATH_NAME: &str = "-locationPathName";
    pub const BUILD_PATH: &str = "-buildPath";
    pub const DEVELOPMENT: &str = "-development";
    pub const RELEASE: &str = "-release";
    pub const AUTO_RUN_PLAYER: &str = "-autoRunPlayer";
    pub const ALLOW_DEBUGGING: &str = "-allowDebugging";

    pub const EXECUTE_PRE_BUILD_METHOD: &str = "-executePreBuildMethod";
    pub const EXECUTE_POST_BUILD_METHOD: &str = "-executePostBuildMethod";
    pub const NO_ERROR_ON_METHOD_NOT_FOUND: &str = "-noErrorOnMethodNotFound";

    pub const BATCH_MODE: &str = "-batchmode";

    /// Flags whose value is the following token
    pub const VALUE_FLAGS: &[&str] = &[
        LOCATION_PATH_NAME,
        BUILD_PATH,
        EXECUTE_PRE_BUILD_METHOD,
        EXECUTE_POST_BUILD_METHOD,
    ];

    pub fn takes_value(flag: &str) -> bool {
        VALUE_FLAGS.contains(&flag)
    }
}

/// Launch argument errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A value flag was the final token
    #[error("flag '{flag}' expects a value but was the last argument")]
    MissingValue { flag: String },
}

/// One token produced by a left-to-right scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgToken<'a> {
    /// A switch or unrecognized token
    Flag(&'a str),
    /// A value flag together with the token that followed it
    Valued(&'a str, &'a str),
}

impl<'a> ArgToken<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ArgToken::Flag(name) | ArgToken::Valued(name, _) => name,
        }
    }
}

/// Immutable launch arguments captured once per process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchArguments {
    tokens: Vec<String>,
}

impl LaunchArguments {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True iff `name` appears verbatim anywhere in the arguments
    pub fn has_flag(&self, name: &str) -> bool {
        self.tokens.iter().any(|t| t == name)
    }

    /// Token following the first occurrence of `name`
    ///
    /// Returns `None` when the flag is absent or is the final token.
    pub fn value_after(&self, name: &str) -> Option<&str> {
        let index = self.tokens.iter().position(|t| t == name)?;
        self.tokens.get(index + 1).map(String::as_str)
    }

    /// Values of every occurrence of a value flag, in argument order
    pub fn values_of(&self, name: &str) -> Vec<&str> {
        self.scan_lossy()
            .into_iter()
            .filter_map(|token| match token {
                ArgToken::Valued(flag, value) if flag == name => Some(value),
                _ => None,
            })
            .collect()
    }

    /// True when running unattended and the host must be terminated with a code
    pub fn is_batch_mode(&self) -> bool {
        self.has_flag(flags::BATCH_MODE)
    }

    /// Scan the arguments left to right
    ///
    /// Value flags consume the following token, so a value is never
    /// reinterpreted as a flag.
    pub fn scan(&self) -> Result<Vec<ArgToken<'_>>, ScanError> {
        let mut tokens = Vec::with_capacity(self.tokens.len());
        let mut iter = self.tokens.iter();

        while let Some(token) = iter.next() {
            if flags::takes_value(token) {
                let value = iter.next().ok_or_else(|| ScanError::MissingValue {
                    flag: token.clone(),
                })?;
                tokens.push(ArgToken::Valued(token, value));
            } else {
                tokens.push(ArgToken::Flag(token));
            }
        }

        Ok(tokens)
    }

    /// Scan that drops a trailing value flag instead of failing
    fn scan_lossy(&self) -> Vec<ArgToken<'_>> {
        let mut tokens = Vec::with_capacity(self.tokens.len());
        let mut iter = self.tokens.iter();

        while let Some(token) = iter.next() {
            if flags::takes_value(token) {
                if let Some(value) = iter.next() {
                    tokens.push(ArgToken::Valued(token, value));
                }
            } else {
                tokens.push(ArgToken::Flag(token));
            }
        }

        tokens
    }
}
