//! Timeline invariants and lookups
//!
//! A timeline is the ordered list of aliases a resolver returns for one
//! (tenant, metric) pair. A valid, non-empty timeline:
//!
//! - starts at `Timestamp::EARLIEST` and ends at `Timestamp::LATEST`
//! - is strictly ascending by both `from` and `until`
//! - has no gaps: each window starts exactly where its predecessor ends
//!
//! [`BoundaryPolicy::AllowRolloutOverlap`] relaxes the exact touch so a
//! window may start before its predecessor ends. It models a rollout period
//! during which both the old and the new name are being written, and is only
//! used for the built-in reference timeline.

use crate::error::ValidationError;
use crate::types::{TimeBoundedAlias, Timestamp};

/// How adjacent windows are allowed to meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// `entry[i].until == entry[i + 1].from` for every adjacent pair
    #[default]
    ExactTouch,

    /// Adjacent windows may overlap; non-adjacent windows may not
    AllowRolloutOverlap,
}

/// Check a timeline against the ordering, coverage and exact-touch invariants
///
/// An empty timeline is valid and means "no rename history".
///
/// # Example
///
/// ```rust
/// use kuba_alias::timeline::validate_timeline;
/// use kuba_alias::types::{TimeBoundedAlias, Timestamp};
///
/// let split = Timestamp::from_millis(1_000);
/// let timeline = vec![
///     TimeBoundedAlias::new(Timestamp::EARLIEST, split, "old").unwrap(),
///     TimeBoundedAlias::new(split, Timestamp::LATEST, "new").unwrap(),
/// ];
/// assert!(validate_timeline(&timeline).is_ok());
/// assert!(validate_timeline(&timeline[..1]).is_err());
/// ```
pub fn validate_timeline(aliases: &[TimeBoundedAlias]) -> Result<(), ValidationError> {
    validate_timeline_with(aliases, BoundaryPolicy::ExactTouch)
}

/// Check a timeline under an explicit boundary policy
pub fn validate_timeline_with(
    aliases: &[TimeBoundedAlias],
    policy: BoundaryPolicy,
) -> Result<(), ValidationError> {
    let (first, last) = match (aliases.first(), aliases.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(()),
    };

    for (index, alias) in aliases.iter().enumerate() {
        if alias.name().is_empty() {
            return Err(ValidationError::EmptyName { index });
        }
        if alias.from() > alias.until() {
            return Err(ValidationError::InvertedWindow {
                index,
                from: alias.from().to_string(),
                until: alias.until().to_string(),
            });
        }
    }

    if !first.from().is_earliest() {
        return Err(ValidationError::NotStartingAtEarliest(
            first.from().to_string(),
        ));
    }
    if !last.until().is_latest() {
        return Err(ValidationError::NotEndingAtLatest(last.until().to_string()));
    }

    for (index, pair) in aliases.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.from() <= prev.from() || next.until() <= prev.until() {
            return Err(ValidationError::Unsorted { index: index + 1 });
        }
        if next.from() > prev.until() {
            return Err(ValidationError::Gap {
                index,
                until: prev.until().to_string(),
                next_from: next.from().to_string(),
            });
        }
        if policy == BoundaryPolicy::ExactTouch && next.from() < prev.until() {
            return Err(ValidationError::Overlap {
                index,
                until: prev.until().to_string(),
                next_from: next.from().to_string(),
            });
        }
    }

    for (index, triple) in aliases.windows(3).enumerate() {
        if triple[2].from() <= triple[0].until() {
            return Err(ValidationError::NonAdjacentOverlap {
                index,
                other: index + 2,
            });
        }
    }

    Ok(())
}

/// Names whose window contains `ts`, in timeline order
///
/// Returns one name for most instants and two at a shared boundary or inside
/// a rollout overlap. An empty timeline yields nothing; callers then use the
/// metric name as given.
pub fn active_at(aliases: &[TimeBoundedAlias], ts: Timestamp) -> Vec<&str> {
    aliases
        .iter()
        .filter(|alias| alias.contains(ts))
        .map(TimeBoundedAlias::name)
        .collect()
}
