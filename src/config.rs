//! Configuration management for alias resolution
//!
//! This module provides configuration file support with TOML format,
//! environment variable overrides, and sensible defaults.
//!
//! # Example
//!
//! ```toml
//! [resolver]
//! kind = "configured"
//! metrics_enabled = true
//!
//! [[rules]]
//! tenant = "acme"
//! metric = "node_cpu_seconds_total"
//!
//! [[rules.windows]]
//! name = "node_cpu"
//! until = "2019-04-16T12:00:00Z"
//!
//! [[rules.windows]]
//! name = "node_cpu_seconds_total"
//! from = "2019-04-16T12:00:00Z"
//! ```
//!
//! A rule without `tenant` applies to every tenant that has no rule of its
//! own for the same metric.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use crate::error::{Error, Result};
use crate::timeline::validate_timeline;
use crate::types::{TimeBoundedAlias, Timestamp};

/// Environment variable selecting the resolver kind
pub const ENV_RESOLVER_KIND: &str = "KUBA_ALIAS_RESOLVER";

/// Environment variable toggling resolution metrics
pub const ENV_METRICS_ENABLED: &str = "KUBA_ALIAS_METRICS";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AliasConfig {
    /// Resolver selection
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Alias rules consulted by the configured resolver
    #[serde(default)]
    pub rules: Vec<AliasRule>,
}

/// Resolver selection
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Which resolver implementation to build
    #[serde(default)]
    pub kind: ResolverKind,

    /// Record Prometheus metrics for every resolution
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

/// Available resolver implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// No alias knowledge
    #[default]
    Null,
    /// Built-in reference timeline
    Static,
    /// Rules from this configuration
    Configured,
}

/// Alias history for one metric, optionally scoped to a tenant
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AliasRule {
    /// Tenant the rule applies to (absent = all tenants)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,

    /// Current metric name the rule is looked up by
    pub metric: String,

    /// Historical windows in ascending order
    pub windows: Vec<AliasWindow>,
}

/// One window of an alias rule
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AliasWindow {
    /// Metric name valid during the window
    pub name: String,

    /// Window start (defaults to earliest, so only the first window may omit it)
    #[serde(default = "default_from")]
    pub from: Timestamp,

    /// Window end (defaults to latest, so only the last window may omit it)
    #[serde(default = "default_until")]
    pub until: Timestamp,
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_from() -> Timestamp {
    Timestamp::EARLIEST
}
fn default_until() -> Timestamp {
    Timestamp::LATEST
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            kind: ResolverKind::default(),
            metrics_enabled: true,
        }
    }
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolverKind::Null => "null",
            ResolverKind::Static => "static",
            ResolverKind::Configured => "configured",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ResolverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" => Ok(ResolverKind::Null),
            "static" => Ok(ResolverKind::Static),
            "configured" => Ok(ResolverKind::Configured),
            other => Err(Error::Configuration(format!(
                "Unknown resolver kind '{}'",
                other
            ))),
        }
    }
}

impl AliasRule {
    /// Human-readable scope used in error messages and logs
    pub fn scope(&self) -> String {
        match &self.tenant {
            Some(tenant) => format!("{}/{}", tenant, self.metric),
            None => format!("*/{}", self.metric),
        }
    }

    /// Build and validate the timeline this rule describes
    pub fn timeline(&self) -> Result<Vec<TimeBoundedAlias>> {
        if self.metric.is_empty() {
            return Err(Error::Configuration(
                "Alias rule has an empty metric name".to_string(),
            ));
        }
        if self.windows.is_empty() {
            return Err(Error::Configuration(format!(
                "Alias rule {} has no windows",
                self.scope()
            )));
        }

        let timeline: Vec<TimeBoundedAlias> = self
            .windows
            .iter()
            .map(|w| TimeBoundedAlias::new_unchecked(w.from, w.until, w.name.clone()))
            .collect();

        validate_timeline(&timeline).map_err(|e| {
            Error::Configuration(format!("Alias rule {}: {}", self.scope(), e))
        })?;

        Ok(timeline)
    }
}

impl AliasConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            Error::Configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from environment variables only
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Apply environment variable overrides
    ///
    /// Unparsable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(kind) = std::env::var(ENV_RESOLVER_KIND) {
            match kind.parse() {
                Ok(k) => self.resolver.kind = k,
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_RESOLVER_KIND),
            }
        }
        if let Ok(enabled) = std::env::var(ENV_METRICS_ENABLED) {
            match enabled.parse() {
                Ok(b) => self.resolver.metrics_enabled = b,
                Err(_) => warn!(value = %enabled, "Ignoring {}", ENV_METRICS_ENABLED),
            }
        }
    }

    /// Validate configuration
    ///
    /// Every rule must describe a valid timeline and no two rules may share
    /// the same (tenant, metric) scope.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            rule.timeline()?;
            if !seen.insert((rule.tenant.as_deref(), rule.metric.as_str())) {
                return Err(Error::Configuration(format!(
                    "Duplicate alias rule for {}",
                    rule.scope()
                )));
            }
        }

        if self.resolver.kind != ResolverKind::Configured && !self.rules.is_empty() {
            warn!(
                kind = %self.resolver.kind,
                rules = self.rules.len(),
                "Alias rules are ignored by this resolver kind"
            );
        }

        Ok(())
    }

    /// Save configuration to TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
