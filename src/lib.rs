//! Kuba Alias - Time-scoped metric name alias resolution
//!
//! A metric's name can change at a point in time (an exporter upgrade, a
//! naming convention cleanup) while stored data keeps the name that was
//! active when it was written. This library answers one question for the
//! query planner: given a tenant and the current name of a metric, which
//! names did it have, and when?
//!
//! The answer is a timeline of [`TimeBoundedAlias`] values that covers all
//! time from [`Timestamp::EARLIEST`] to [`Timestamp::LATEST`], or an empty
//! list when the metric was never renamed.
//!
//! # Example
//!
//! ```rust
//! use kuba_alias::{AliasResolver, ResolverBuilder};
//! use kuba_alias::config::{AliasConfig, ResolverKind};
//!
//! let mut config = AliasConfig::default();
//! config.resolver.kind = ResolverKind::Static;
//!
//! let resolver = ResolverBuilder::new().with_config(config).build().unwrap();
//! let timeline = resolver.resolve_aliases("acme", "node_cpu_seconds_total").unwrap();
//!
//! assert_eq!(timeline[0].name(), "node_cpu");
//! assert_eq!(timeline[1].name(), "node_cpu_seconds_total");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod error;
pub mod resolver;
pub mod timeline;
pub mod types;

/// Configuration management with TOML support
pub mod config;

/// Prometheus metrics and telemetry
pub mod metrics;

// Re-export main types
pub use builder::ResolverBuilder;
pub use error::{Error, Result, ValidationError};
pub use resolver::AliasResolver;
pub use types::{TimeBoundedAlias, Timestamp};
