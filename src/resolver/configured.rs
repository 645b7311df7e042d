//! Resolver backed by alias rules from configuration
//!
//! Rules are compiled into an immutable lookup table when the resolver is
//! built. [`ConfiguredResolver::reload`] compiles a replacement table off to
//! the side and swaps it in atomically, so a concurrent reader sees either
//! the old table or the new one, never a mix.
//!
//! # Example
//!
//! ```rust
//! use kuba_alias::config::AliasConfig;
//! use kuba_alias::resolver::{AliasResolver, ConfiguredResolver};
//!
//! let config = AliasConfig::from_toml_str(r#"
//!     [[rules]]
//!     metric = "http_requests_total"
//!     [[rules.windows]]
//!     name = "http_requests"
//!     until = "2023-01-01T00:00:00Z"
//!     [[rules.windows]]
//!     name = "http_requests_total"
//!     from = "2023-01-01T00:00:00Z"
//! "#).unwrap();
//!
//! let resolver = ConfiguredResolver::from_config(&config).unwrap();
//! let timeline = resolver.resolve_aliases("any-tenant", "http_requests_total").unwrap();
//! assert_eq!(timeline.len(), 2);
//! assert_eq!(timeline[0].name(), "http_requests");
//! ```

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::AliasResolver;
use crate::config::{AliasConfig, AliasRule};
use crate::error::{Error, Result};
use crate::metrics;
use crate::types::TimeBoundedAlias;

/// Timelines for one metric name
#[derive(Debug, Default)]
struct MetricRules {
    /// Tenant-specific timelines
    by_tenant: HashMap<String, Arc<[TimeBoundedAlias]>>,
    /// Timeline for tenants without their own rule
    fallback: Option<Arc<[TimeBoundedAlias]>>,
}

/// Compiled rule table keyed by current metric name
#[derive(Debug, Default)]
struct RuleTable {
    metrics: HashMap<String, MetricRules>,
    rule_count: usize,
}

impl RuleTable {
    fn compile(rules: &[AliasRule]) -> Result<Self> {
        let mut table = RuleTable::default();

        for rule in rules {
            let timeline: Arc<[TimeBoundedAlias]> = rule.timeline()?.into();
            let entry = table.metrics.entry(rule.metric.clone()).or_default();

            let previous = match &rule.tenant {
                Some(tenant) => entry.by_tenant.insert(tenant.clone(), timeline),
                None => entry.fallback.replace(timeline),
            };
            if previous.is_some() {
                return Err(Error::Configuration(format!(
                    "Duplicate alias rule for {}",
                    rule.scope()
                )));
            }
            table.rule_count += 1;
        }

        Ok(table)
    }

    fn lookup(&self, tenant_id: &str, metric_name: &str) -> Option<&[TimeBoundedAlias]> {
        let rules = self.metrics.get(metric_name)?;
        rules
            .by_tenant
            .get(tenant_id)
            .or(rules.fallback.as_ref())
            .map(|timeline| &timeline[..])
    }
}

/// Resolver that serves per-tenant alias rules
pub struct ConfiguredResolver {
    table: RwLock<Arc<RuleTable>>,
}

impl ConfiguredResolver {
    /// Compile the rules of `config`
    ///
    /// Fails if any rule describes an invalid timeline or two rules share a
    /// (tenant, metric) scope.
    pub fn from_config(config: &AliasConfig) -> Result<Self> {
        Self::from_rules(&config.rules)
    }

    /// Compile a list of rules
    pub fn from_rules(rules: &[AliasRule]) -> Result<Self> {
        let table = RuleTable::compile(rules)?;
        info!(rules = table.rule_count, "Compiled alias rule table");
        metrics::update_configured_rules(table.rule_count);

        Ok(Self {
            table: RwLock::new(Arc::new(table)),
        })
    }

    /// Replace the rule table with the rules of `config`
    ///
    /// On error the current table stays in place.
    pub fn reload(&self, config: &AliasConfig) -> Result<()> {
        let table = match RuleTable::compile(&config.rules) {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "Alias rule reload rejected, keeping current rules");
                metrics::record_reload(false);
                return Err(e);
            }
        };

        let count = table.rule_count;
        *self.table.write() = Arc::new(table);

        info!(rules = count, "Reloaded alias rule table");
        metrics::record_reload(true);
        metrics::update_configured_rules(count);
        Ok(())
    }

    /// Number of rules currently loaded
    pub fn rule_count(&self) -> usize {
        self.table.read().rule_count
    }
}

impl AliasResolver for ConfiguredResolver {
    fn resolver_id(&self) -> &str {
        "configured"
    }

    fn resolve_aliases(
        &self,
        tenant_id: &str,
        metric_name: &str,
    ) -> Result<Vec<TimeBoundedAlias>> {
        // Hold the lock only long enough to take a snapshot
        let table = self.table.read().clone();

        match table.lookup(tenant_id, metric_name) {
            Some(timeline) => {
                debug!(
                    tenant_id,
                    metric_name,
                    entries = timeline.len(),
                    "Resolved alias timeline"
                );
                Ok(timeline.to_vec())
            }
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AliasWindow;
    use crate::types::Timestamp;

    fn rule(tenant: Option<&str>, metric: &str, names: &[&str], splits: &[i64]) -> AliasRule {
        let mut windows = Vec::new();
        let mut from = Timestamp::EARLIEST;
        for (i, name) in names.iter().enumerate() {
            let until = splits
                .get(i)
                .map(|ms| Timestamp::from_millis(*ms))
                .unwrap_or(Timestamp::LATEST);
            windows.push(AliasWindow {
                name: name.to_string(),
                from,
                until,
            });
            from = until;
        }
        AliasRule {
            tenant: tenant.map(str::to_string),
            metric: metric.to_string(),
            windows,
        }
    }

    #[test]
    fn test_tenant_rule_takes_precedence() {
        let resolver = ConfiguredResolver::from_rules(&[
            rule(None, "cpu", &["cpu_v1", "cpu"], &[1000]),
            rule(Some("acme"), "cpu", &["acme_cpu", "cpu"], &[2000]),
        ])
        .unwrap();

        let acme = resolver.resolve_aliases("acme", "cpu").unwrap();
        assert_eq!(acme[0].name(), "acme_cpu");

        let other = resolver.resolve_aliases("globex", "cpu").unwrap();
        assert_eq!(other[0].name(), "cpu_v1");
        assert_eq!(resolver.rule_count(), 2);
    }

    #[test]
    fn test_tenant_scoped_rule_does_not_leak() {
        let resolver =
            ConfiguredResolver::from_rules(&[rule(Some("acme"), "cpu", &["old", "cpu"], &[1000])])
                .unwrap();
        assert!(resolver.resolve_aliases("globex", "cpu").unwrap().is_empty());
        assert!(resolver.resolve_aliases("", "cpu").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_metric_is_empty() {
        let resolver =
            ConfiguredResolver::from_rules(&[rule(None, "cpu", &["old", "cpu"], &[1000])]).unwrap();
        assert!(resolver.resolve_aliases("acme", "mem").unwrap().is_empty());
        assert!(resolver.resolve_aliases("acme", "old").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_rule_fails_construction() {
        let mut broken = rule(None, "cpu", &["old", "cpu"], &[1000]);
        broken.windows[1].from = Timestamp::from_millis(1500);

        let result = ConfiguredResolver::from_rules(&[broken]);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_duplicate_rule_fails_construction() {
        let r = rule(Some("acme"), "cpu", &["cpu"], &[]);
        assert!(ConfiguredResolver::from_rules(&[r.clone(), r]).is_err());
    }

    #[test]
    fn test_reload_swaps_table() {
        let resolver =
            ConfiguredResolver::from_rules(&[rule(None, "cpu", &["old", "cpu"], &[1000])]).unwrap();

        let config = AliasConfig {
            rules: vec![rule(None, "mem", &["memory", "mem"], &[5000])],
            ..AliasConfig::default()
        };
        resolver.reload(&config).unwrap();

        assert!(resolver.resolve_aliases("t", "cpu").unwrap().is_empty());
        assert_eq!(resolver.resolve_aliases("t", "mem").unwrap().len(), 2);
    }

    #[test]
    fn test_failed_reload_keeps_current_rules() {
        let resolver =
            ConfiguredResolver::from_rules(&[rule(None, "cpu", &["old", "cpu"], &[1000])]).unwrap();

        let mut broken = rule(None, "mem", &["memory", "mem"], &[5000]);
        broken.windows[0].name.clear();
        let config = AliasConfig {
            rules: vec![broken],
            ..AliasConfig::default()
        };

        assert!(resolver.reload(&config).is_err());
        assert_eq!(resolver.resolve_aliases("t", "cpu").unwrap().len(), 2);
        assert_eq!(resolver.rule_count(), 1);
    }
}
