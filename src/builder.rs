//! Resolver construction
//!
//! Picks the resolver implementation named by the configuration, or a
//! caller-supplied one, and optionally wraps it with instrumentation.

use std::sync::Arc;
use tracing::info;

use crate::config::{AliasConfig, ResolverKind};
use crate::error::Result;
use crate::resolver::{
    AliasResolver, ConfiguredResolver, InstrumentedResolver, NullResolver, StaticResolver,
};

/// Builder for the resolver used by query planning
pub struct ResolverBuilder {
    config: AliasConfig,
    custom: Option<Arc<dyn AliasResolver>>,
}

impl ResolverBuilder {
    /// Create a new builder with the default (null) configuration
    pub fn new() -> Self {
        Self {
            config: AliasConfig::default(),
            custom: None,
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: AliasConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom resolver implementation instead of `resolver.kind`
    ///
    /// The instrumentation setting from the configuration still applies.
    pub fn with_resolver<R: AliasResolver>(mut self, resolver: R) -> Self {
        self.custom = Some(Arc::new(resolver));
        self
    }

    /// Build the resolver
    pub fn build(self) -> Result<Arc<dyn AliasResolver>> {
        let resolver: Arc<dyn AliasResolver> = match self.custom {
            Some(custom) => custom,
            None => {
                self.config.validate()?;
                match self.config.resolver.kind {
                    ResolverKind::Null => Arc::new(NullResolver::new()),
                    ResolverKind::Static => Arc::new(StaticResolver::new()),
                    ResolverKind::Configured => {
                        Arc::new(ConfiguredResolver::from_config(&self.config)?)
                    }
                }
            }
        };

        let metrics_enabled = self.config.resolver.metrics_enabled;
        info!(
            resolver = resolver.resolver_id(),
            metrics = metrics_enabled,
            "Alias resolver ready"
        );

        if metrics_enabled {
            Ok(Arc::new(InstrumentedResolver::new(resolver)))
        } else {
            Ok(resolver)
        }
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
