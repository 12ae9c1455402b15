//! Pre/post-build hook registry
//!
//! Hooks are zero-argument procedures registered under a dotted,
//! fully-qualified key such as `Studio.Build.Hooks.StampVersion`. The part
//! before the last dot is the hook's type path, the last segment is its
//! method name.
//!
//! A launch argument may name a hook by a shorter type path, e.g.
//! `Hooks.StampVersion`. Type paths match when the registered one equals the
//! requested one or ends with it on a `.` boundary. When several registered
//! types match, the first one registered that carries the requested method is
//! invoked; later matches are never run.

use std::fmt;

use anyhow::Result;
use thiserror::Error;

use crate::utils::terminal::print_warning;

/// Boxed hook procedure
pub type HookFn = Box<dyn Fn() -> Result<()>>;

/// Hook resolution or execution errors
#[derive(Error, Debug)]
pub enum HookError {
    /// Type path is too short to name a type
    #[error("could not find method [{path}], method path is too short")]
    Malformed { path: String },

    /// No registered type/method matched
    #[error("could not find method [{path}]: {reason}")]
    NotFound { path: String, reason: &'static str },

    /// The hook ran and reported an error
    #[error("build hook [{path}] failed")]
    Failed {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl HookError {
    /// True for errors `-noErrorOnMethodNotFound` suppresses
    pub fn is_not_found(&self) -> bool {
        matches!(self, HookError::Malformed { .. } | HookError::NotFound { .. })
    }
}

/// Outcome of a successful [`HookRegistry::invoke`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// The hook registered under this key was run
    Invoked(String),
    /// Resolution failed and the failure was suppressed
    Skipped,
}

/// A dotted hook path split into type path and method name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookReference<'a> {
    pub type_path: &'a str,
    pub method: &'a str,
}

impl<'a> HookReference<'a> {
    /// Split `path` at its last dot
    ///
    /// The type path must itself contain at least two segments.
    pub fn parse(path: &'a str) -> Result<Self, HookError> {
        let malformed = || HookError::Malformed {
            path: path.to_string(),
        };

        let (type_path, method) = path.rsplit_once('.').ok_or_else(malformed)?;
        if method.is_empty() || type_path.split('.').filter(|s| !s.is_empty()).count() < 2 {
            return Err(malformed());
        }

        Ok(Self { type_path, method })
    }

    fn type_matches(&self, registered_type: &str) -> bool {
        registered_type == self.type_path
            || registered_type
                .strip_suffix(self.type_path)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

impl fmt::Display for HookReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_path, self.method)
    }
}

struct RegisteredHook {
    key: String,
    type_path: String,
    method: String,
    run: HookFn,
}

/// Registry of build hooks keyed by fully-qualified dotted name
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<RegisteredHook>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` under a fully-qualified key
    ///
    /// Re-registering a key replaces the previous hook in place.
    pub fn register<F>(&mut self, key: impl Into<String>, hook: F) -> Result<(), HookError>
    where
        F: Fn() -> Result<()> + 'static,
    {
        let key = key.into();
        let reference = HookReference::parse(&key)?;
        let entry = RegisteredHook {
            type_path: reference.type_path.to_string(),
            method: reference.method.to_string(),
            key: key.clone(),
            run: Box::new(hook),
        };

        match self.hooks.iter_mut().find(|h| h.key == key) {
            Some(existing) => *existing = entry,
            None => self.hooks.push(entry),
        }
        Ok(())
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Resolve `path` and run the hook it names
    ///
    /// With `suppress_not_found`, a malformed or unresolvable path is logged
    /// and reported as [`HookOutcome::Skipped`] without running anything.
    pub fn invoke(&self, path: &str, suppress_not_found: bool) -> Result<HookOutcome, HookError> {
        match self.resolve(path) {
            Ok(hook) => {
                (hook.run)().map_err(|source| HookError::Failed {
                    path: path.to_string(),
                    source,
                })?;
                Ok(HookOutcome::Invoked(hook.key.clone()))
            }
            Err(err) if suppress_not_found && err.is_not_found() => {
                print_warning(&err.to_string());
                Ok(HookOutcome::Skipped)
            }
            Err(err) => Err(err),
        }
    }

    /// Key of the hook `path` resolves to, without running it
    pub fn resolve_key(&self, path: &str) -> Result<&str, HookError> {
        self.resolve(path).map(|hook| hook.key.as_str())
    }

    fn resolve(&self, path: &str) -> Result<&RegisteredHook, HookError> {
        let reference = HookReference::parse(path)?;

        let mut candidates = self
            .hooks
            .iter()
            .filter(|h| reference.type_matches(&h.type_path))
            .peekable();

        if candidates.peek().is_none() {
            return Err(HookError::NotFound {
                path: path.to_string(),
                reason: "no registered type matches",
            });
        }

        candidates
            .find(|h| h.method == reference.method)
            .ok_or_else(|| HookError::NotFound {
                path: path.to_string(),
                reason: "method not found in type",
            })
    }
}
