//! # Precedence Resolution
//!
//! Resolves a single setting from an ordered list of candidate sources.
//! Sources are evaluated left to right and the first non-empty value wins.

use std::collections::HashMap;

/// Lookup of environment variables
///
/// Abstracted so resolution can be exercised without touching the process
/// environment.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// A candidate source for a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// Value already present in the loaded config
    Config(&'a str),
    /// Named environment variable
    Env(&'a str),
    /// Fallback value
    Default(&'a str),
}

/// Which tier supplied a resolved value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Config,
    Environment,
    Default,
    /// No source produced a value
    Unset,
}

impl Tier {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Config => "config",
            Tier::Environment => "environment",
            Tier::Default => "default",
            Tier::Unset => "unset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub tier: Tier,
}

impl Resolved {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Resolve a setting from `sources`, first non-empty value wins
pub fn resolve(sources: &[Source<'_>], env: &dyn EnvSource) -> Resolved {
    for source in sources {
        let (value, tier) = match *source {
            Source::Config(v) => (Some(v.to_string()), Tier::Config),
            Source::Env(key) => (env.var(key), Tier::Environment),
            Source::Default(v) => (Some(v.to_string()), Tier::Default),
        };
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            return Resolved { value, tier };
        }
    }

    Resolved {
        value: String::new(),
        tier: Tier::Unset,
    }
}
