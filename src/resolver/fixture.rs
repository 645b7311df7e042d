//! Built-in reference timeline
//!
//! Models a Prometheus node exporter upgrade rolled out on 2019-04-16 that
//! renamed `node_cpu` to `node_cpu_seconds_total`. Every node ran the old
//! exporter before 12:00:00 and the new one after 12:00:05; in between, scrapes
//! carried a mix of both names, so the two windows deliberately overlap.

use super::AliasResolver;
use crate::error::Result;
use crate::types::{TimeBoundedAlias, Timestamp};
use tracing::debug;

/// Metric name the fixture knows about
pub const RENAMED_METRIC: &str = "node_cpu_seconds_total";

/// Name the metric had before the rollout
pub const PREVIOUS_NAME: &str = "node_cpu";

/// Last instant at which the old name was still being written
pub const ROLLOUT_END: &str = "2019-04-16T12:00:05Z";

/// First instant at which the new name was being written
pub const ROLLOUT_START: &str = "2019-04-16T12:00:00Z";

/// Resolver holding a single hardcoded timeline
///
/// The only resolver whose windows overlap by more than a boundary instant.
/// Its timeline satisfies
/// [`BoundaryPolicy::AllowRolloutOverlap`](crate::timeline::BoundaryPolicy::AllowRolloutOverlap)
/// rather than the exact-touch default.
///
/// Ignores the tenant. Any metric other than [`RENAMED_METRIC`] has no
/// alias history.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    timeline: Vec<TimeBoundedAlias>,
}

impl StaticResolver {
    /// Build the fixture timeline
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded rollout instants fail to parse.
    pub fn new() -> Self {
        let timeline = vec![
            TimeBoundedAlias::new_unchecked(
                Timestamp::EARLIEST,
                Timestamp::must_parse(ROLLOUT_END),
                PREVIOUS_NAME,
            ),
            TimeBoundedAlias::new_unchecked(
                Timestamp::must_parse(ROLLOUT_START),
                Timestamp::LATEST,
                RENAMED_METRIC,
            ),
        ];
        Self { timeline }
    }
}

impl Default for StaticResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AliasResolver for StaticResolver {
    fn resolver_id(&self) -> &str {
        "static"
    }

    fn resolve_aliases(
        &self,
        tenant_id: &str,
        metric_name: &str,
    ) -> Result<Vec<TimeBoundedAlias>> {
        if metric_name != RENAMED_METRIC {
            return Ok(Vec::new());
        }
        debug!(tenant_id, metric_name, "Resolved fixture alias timeline");
        Ok(self.timeline.clone())
    }
}
