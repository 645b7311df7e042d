//! Resolver with no alias knowledge

use super::AliasResolver;
use crate::error::Result;
use crate::types::TimeBoundedAlias;

/// Resolver that never knows of any rename
///
/// The safe default when no alias history is configured: every metric name
/// is used as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl NullResolver {
    /// Create a new null resolver
    pub fn new() -> Self {
        Self
    }
}

impl AliasResolver for NullResolver {
    fn resolver_id(&self) -> &str {
        "null"
    }

    fn resolve_aliases(
        &self,
        _tenant_id: &str,
        _metric_name: &str,
    ) -> Result<Vec<TimeBoundedAlias>> {
        Ok(Vec::new())
    }
}
