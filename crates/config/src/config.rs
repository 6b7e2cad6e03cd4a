//! Planner configuration
//!
//! `PlannerConfig` is immutable once loaded and cheap to clone. Every field has
//! a default, so a partial JSON document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stepdag_core::{
    constants::{
        DEFAULT_ID_PREFIX, DEFAULT_MAX_SLUG_LEN, MAX_SLUG_LEN_LIMIT, STEPDAG_ID_PREFIX_VAR,
        STEPDAG_MAX_SLUG_LEN_VAR, STEPDAG_PRUNE_SELF_LOOPS_VAR, STEPDAG_SORT_FALLBACK_VAR,
    },
    Error, Result,
};

/// What to do when the topological sort cannot complete on a validated graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortFallbackPolicy {
    /// Use declaration order and attach a warning to the plan
    #[default]
    Warn,
    /// Fail the planning call
    Error,
}

impl fmt::Display for SortFallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortFallbackPolicy::Warn => f.write_str("warn"),
            SortFallbackPolicy::Error => f.write_str("error"),
        }
    }
}

impl FromStr for SortFallbackPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(SortFallbackPolicy::Warn),
            "error" => Ok(SortFallbackPolicy::Error),
            other => Err(Error::configuration(format!(
                "invalid sort fallback policy '{other}', expected 'warn' or 'error'"
            ))),
        }
    }
}

/// Settings that shape identifier generation and graph handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Leading segment of every generated identifier
    pub id_prefix: String,
    /// Maximum length of the description slug inside an identifier
    pub max_slug_len: usize,
    /// Remove self-references instead of reporting them as cycles
    pub prune_self_loops: bool,
    pub sort_fallback: SortFallbackPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            max_slug_len: DEFAULT_MAX_SLUG_LEN,
            prune_self_loops: true,
            sort_fallback: SortFallbackPolicy::Warn,
        }
    }
}

impl PlannerConfig {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.max_slug_len == 0 || self.max_slug_len > MAX_SLUG_LEN_LIMIT {
            return Err(Error::configuration(format!(
                "max_slug_len must be between 1 and {MAX_SLUG_LEN_LIMIT}, got {}",
                self.max_slug_len
            )));
        }

        let prefix = self.id_prefix.as_str();
        if prefix.is_empty()
            || !prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(Error::configuration(format!(
                "id_prefix '{prefix}' must be non-empty and contain only lower-case letters, digits or '_'"
            )));
        }

        Ok(())
    }

    /// Apply `STEPDAG_*` overrides from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` as the variable source
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup(STEPDAG_ID_PREFIX_VAR) {
            tracing::debug!(id_prefix = %prefix, "id prefix overridden from environment");
            self.id_prefix = prefix;
        }

        if let Some(raw) = lookup(STEPDAG_MAX_SLUG_LEN_VAR) {
            self.max_slug_len = raw.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{STEPDAG_MAX_SLUG_LEN_VAR} must be a positive integer, got '{raw}'"
                ))
            })?;
        }

        if let Some(raw) = lookup(STEPDAG_PRUNE_SELF_LOOPS_VAR) {
            self.prune_self_loops = parse_bool(STEPDAG_PRUNE_SELF_LOOPS_VAR, &raw)?;
        }

        if let Some(raw) = lookup(STEPDAG_SORT_FALLBACK_VAR) {
            self.sort_fallback = raw.parse()?;
        }

        Ok(self)
    }
}

fn parse_bool(variable: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "{variable} must be a boolean, got '{raw}'"
        ))),
    }
}
