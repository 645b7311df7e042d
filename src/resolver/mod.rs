//! Alias resolvers
//!
//! An [`AliasResolver`] maps a (tenant, metric name) pair to the timeline of
//! historical names for that metric. Implementations are selected at
//! construction time (see [`crate::builder::ResolverBuilder`]):
//!
//! - [`NullResolver`]: no rename history for anything
//! - [`StaticResolver`]: a built-in reference timeline for `node_cpu_seconds_total`
//! - [`ConfiguredResolver`]: per-tenant rules loaded from configuration
//! - [`InstrumentedResolver`]: wraps any resolver with metrics and logging

pub mod configured;
pub mod fixture;
pub mod instrumented;
pub mod null;

pub use configured::ConfiguredResolver;
pub use fixture::StaticResolver;
pub use instrumented::InstrumentedResolver;
pub use null::NullResolver;

use crate::error::Result;
use crate::types::TimeBoundedAlias;
use std::sync::Arc;

/// Core trait for alias lookup backends
///
/// # Contract
///
/// A successful result is either empty ("no rename history, use the name as
/// given") or a timeline that passes [`crate::timeline::validate_timeline`].
/// A resolver whose data source fails returns `Err(Error::Backend)` and never
/// a partial timeline.
///
/// Calls have no observable side effects and may be made concurrently from
/// any number of threads.
pub trait AliasResolver: Send + Sync + 'static {
    /// Unique identifier for this resolver implementation
    fn resolver_id(&self) -> &str;

    /// Return the alias timeline for `metric_name` within `tenant_id`
    fn resolve_aliases(
        &self,
        tenant_id: &str,
        metric_name: &str,
    ) -> Result<Vec<TimeBoundedAlias>>;
}

impl<R: AliasResolver + ?Sized> AliasResolver for Arc<R> {
    fn resolver_id(&self) -> &str {
        (**self).resolver_id()
    }

    fn resolve_aliases(
        &self,
        tenant_id: &str,
        metric_name: &str,
    ) -> Result<Vec<TimeBoundedAlias>> {
        (**self).resolve_aliases(tenant_id, metric_name)
    }
}

impl<R: AliasResolver + ?Sized> AliasResolver for Box<R> {
    fn resolver_id(&self) -> &str {
        (**self).resolver_id()
    }

    fn resolve_aliases(
        &self,
        tenant_id: &str,
        metric_name: &str,
    ) -> Result<Vec<TimeBoundedAlias>> {
        (**self).resolve_aliases(tenant_id, metric_name)
    }
}
