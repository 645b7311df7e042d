//! Metrics and logging wrapper for any resolver

use std::time::Instant;
use tracing::{debug, warn};

use super::AliasResolver;
use crate::error::Result;
use crate::metrics::{self, ResolutionOutcome};
use crate::types::TimeBoundedAlias;

/// Wraps a resolver and records every resolution
///
/// Results, including errors, are passed through untouched.
#[derive(Debug, Clone)]
pub struct InstrumentedResolver<R> {
    inner: R,
}

impl<R: AliasResolver> InstrumentedResolver<R> {
    /// Wrap `inner`
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The wrapped resolver
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Unwrap the resolver
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AliasResolver> AliasResolver for InstrumentedResolver<R> {
    fn resolver_id(&self) -> &str {
        self.inner.resolver_id()
    }

    fn resolve_aliases(
        &self,
        tenant_id: &str,
        metric_name: &str,
    ) -> Result<Vec<TimeBoundedAlias>> {
        let start = Instant::now();
        let result = self.inner.resolve_aliases(tenant_id, metric_name);
        let elapsed = start.elapsed().as_secs_f64();

        let outcome = match &result {
            Ok(timeline) if timeline.is_empty() => ResolutionOutcome::Empty,
            Ok(timeline) => {
                debug!(
                    resolver = self.resolver_id(),
                    tenant_id,
                    metric_name,
                    entries = timeline.len(),
                    "Metric has alias history"
                );
                ResolutionOutcome::Found
            }
            Err(e) => {
                warn!(
                    resolver = self.resolver_id(),
                    tenant_id,
                    metric_name,
                    error = %e,
                    "Alias resolution failed"
                );
                ResolutionOutcome::Error
            }
        };
        metrics::record_resolution(self.resolver_id(), outcome, elapsed);

        result
    }
}
