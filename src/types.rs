//! Core data types for alias resolution
//!
//! # Key Types
//!
//! - **`Timestamp`**: Nanosecond point in time with `EARLIEST` / `LATEST` sentinels
//! - **`TimeBoundedAlias`**: A historical metric name valid over `[from, until]`
//!
//! # Example
//!
//! ```rust
//! use kuba_alias::types::{TimeBoundedAlias, Timestamp};
//!
//! let split = Timestamp::parse_rfc3339("2019-04-16T12:00:00Z").unwrap();
//! let old = TimeBoundedAlias::new(Timestamp::EARLIEST, split, "node_cpu").unwrap();
//!
//! assert!(old.contains(split));
//! assert!(old.contains(Timestamp::from_millis(0)));
//! assert!(!old.contains(Timestamp::LATEST));
//! ```

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{Error, Result, ValidationError};

/// A point in time, in nanoseconds since the Unix epoch
///
/// The two extreme values are reserved as sentinels for unbounded past
/// (`EARLIEST`) and unbounded future (`LATEST`). They order below and above
/// every real instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Unbounded past
    pub const EARLIEST: Timestamp = Timestamp(i64::MIN);

    /// Unbounded future
    pub const LATEST: Timestamp = Timestamp(i64::MAX);

    /// Create from nanoseconds since the epoch
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Create from microseconds since the epoch, saturating at the sentinels
    pub fn from_micros(micros: i64) -> Self {
        Self(micros.saturating_mul(1_000))
    }

    /// Create from milliseconds since the epoch, saturating at the sentinels
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    /// Create from a UTC datetime
    ///
    /// Datetimes outside the representable nanosecond range (roughly
    /// 1677..2262) collapse onto the nearest sentinel.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        match dt.timestamp_nanos_opt() {
            Some(nanos) => Self(nanos),
            None if dt.timestamp() < 0 => Self::EARLIEST,
            None => Self::LATEST,
        }
    }

    /// Parse an RFC 3339 timestamp
    ///
    /// The words `earliest` and `latest` parse to the sentinels, which lets
    /// configuration files spell out open-ended windows explicitly. The two
    /// real instants whose nanosecond values coincide with the sentinels are
    /// rejected.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kuba_alias::types::Timestamp;
    ///
    /// let t = Timestamp::parse_rfc3339("1970-01-01T00:00:01Z").unwrap();
    /// assert_eq!(t.as_nanos(), 1_000_000_000);
    /// assert_eq!(Timestamp::parse_rfc3339("latest").unwrap(), Timestamp::LATEST);
    /// assert!(Timestamp::parse_rfc3339("2019-04-16T12:00:05").is_err());
    /// ```
    pub fn parse_rfc3339(input: &str) -> Result<Self> {
        match input {
            "earliest" => return Ok(Self::EARLIEST),
            "latest" => return Ok(Self::LATEST),
            _ => {}
        }

        let dt = DateTime::parse_from_rfc3339(input).map_err(|e| Error::InvalidTimestamp {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        match dt.with_timezone(&Utc).timestamp_nanos_opt() {
            Some(i64::MIN) | Some(i64::MAX) => Err(Error::InvalidTimestamp {
                input: input.to_string(),
                reason: "collides with the earliest/latest sentinel".to_string(),
            }),
            Some(nanos) => Ok(Self(nanos)),
            None => Err(Error::InvalidTimestamp {
                input: input.to_string(),
                reason: "outside the nanosecond range".to_string(),
            }),
        }
    }

    /// Parse a hardcoded RFC 3339 literal, panicking if it is malformed
    ///
    /// Only for compile-time-known constants such as built-in fixtures, where
    /// a bad literal is a programming error that should abort startup. Use
    /// [`Timestamp::parse_rfc3339`] for anything read at runtime.
    pub fn must_parse(literal: &str) -> Self {
        match Self::parse_rfc3339(literal) {
            Ok(ts) => ts,
            Err(e) => panic!("{}", e),
        }
    }

    /// Nanoseconds since the epoch
    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    /// True for the unbounded-past sentinel
    pub fn is_earliest(&self) -> bool {
        *self == Self::EARLIEST
    }

    /// True for the unbounded-future sentinel
    pub fn is_latest(&self) -> bool {
        *self == Self::LATEST
    }

    /// Convert to a UTC datetime, `None` for the sentinels
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        if self.is_earliest() || self.is_latest() {
            return None;
        }
        Some(Utc.timestamp_nanos(self.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None if self.is_earliest() => write!(f, "earliest"),
            None => write!(f, "latest"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse_rfc3339(&raw).map_err(serde::de::Error::custom)
    }
}

/// A historical metric name valid over a time window
///
/// Both bounds are inclusive: a timestamp equal to `until` still belongs to
/// this window, and also to the next window when that one starts at the
/// same instant. Consumers splitting a query range treat windows as
/// half-open `[from, until)` except for the final `LATEST` window.
///
/// Records are immutable once built. Deserialization goes through
/// [`TimeBoundedAlias::new`], so it rejects the same records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAlias")]
pub struct TimeBoundedAlias {
    from: Timestamp,
    until: Timestamp,
    name: String,
}

/// Unvalidated wire form of [`TimeBoundedAlias`]
#[derive(Deserialize)]
struct RawAlias {
    from: Timestamp,
    until: Timestamp,
    name: String,
}

impl TryFrom<RawAlias> for TimeBoundedAlias {
    type Error = Error;

    fn try_from(raw: RawAlias) -> Result<Self> {
        TimeBoundedAlias::new(raw.from, raw.until, raw.name)
    }
}

impl TimeBoundedAlias {
    /// Create a new alias with validation
    ///
    /// # Returns
    ///
    /// - `Err(ValidationError::EmptyName)` if `name` is empty
    /// - `Err(ValidationError::InvertedWindow)` if `from > until`
    pub fn new(from: Timestamp, until: Timestamp, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName { index: 0 }.into());
        }
        if from > until {
            return Err(ValidationError::InvertedWindow {
                index: 0,
                from: from.to_string(),
                until: until.to_string(),
            }
            .into());
        }
        Ok(Self { from, until, name })
    }

    /// Create a new alias without validation (use with caution)
    ///
    /// Intended for built-in fixtures whose values are known to be valid, and
    /// for tests that need to construct deliberately broken timelines.
    pub fn new_unchecked(from: Timestamp, until: Timestamp, name: impl Into<String>) -> Self {
        Self {
            from,
            until,
            name: name.into(),
        }
    }

    /// Inclusive start of the window
    pub fn from(&self) -> Timestamp {
        self.from
    }

    /// Inclusive end of the window
    pub fn until(&self) -> Timestamp {
        self.until
    }

    /// Metric name valid during this window
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a timestamp falls within this window (inclusive)
    pub fn contains(&self, ts: Timestamp) -> bool {
        ts >= self.from && ts <= self.until
    }
}

impl fmt::Display for TimeBoundedAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {}]", self.name, self.from, self.until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_bound_everything() {
        let now = Timestamp::from_millis(1_700_000_000_000);
        assert!(Timestamp::EARLIEST < now);
        assert!(now < Timestamp::LATEST);
        assert!(Timestamp::EARLIEST.is_earliest());
        assert!(Timestamp::LATEST.is_latest());
        assert_eq!(Timestamp::EARLIEST.to_datetime(), None);
    }

    #[test]
    fn test_unit_constructors() {
        assert_eq!(Timestamp::from_millis(1).as_nanos(), 1_000_000);
        assert_eq!(Timestamp::from_micros(1).as_nanos(), 1_000);
        assert_eq!(Timestamp::from_millis(i64::MAX), Timestamp::LATEST);
        assert_eq!(Timestamp::from_millis(i64::MIN), Timestamp::EARLIEST);
    }

    #[test]
    fn test_datetime_conversion() {
        let dt = Utc.with_ymd_and_hms(2019, 4, 16, 12, 0, 0).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts, Timestamp::must_parse("2019-04-16T12:00:00Z"));
        assert_eq!(ts.to_datetime(), Some(dt));
    }

    #[test]
    fn test_parse_keeps_sub_second_precision() {
        let t = Timestamp::parse_rfc3339("1970-01-01T00:00:00.000001500Z").unwrap();
        assert_eq!(t.as_nanos(), 1_500);
    }

    #[test]
    fn test_parse_applies_offset() {
        let utc = Timestamp::parse_rfc3339("2019-04-16T12:00:00Z").unwrap();
        let offset = Timestamp::parse_rfc3339("2019-04-16T14:00:00+02:00").unwrap();
        assert_eq!(utc, offset);
    }

    #[test]
    fn test_parse_rejects_sentinel_instants() {
        for literal in [
            "2262-04-11T23:47:16.854775807Z",
            "1677-09-21T00:12:43.145224192Z",
        ] {
            let err = Timestamp::parse_rfc3339(literal).unwrap_err();
            assert!(matches!(err, Error::InvalidTimestamp { .. }));
        }

        // One nanosecond inside the range is still a real instant
        let t = Timestamp::parse_rfc3339("2262-04-11T23:47:16.854775806Z").unwrap();
        assert_eq!(t.as_nanos(), i64::MAX - 1);
        assert!(!t.is_latest());
    }

    #[test]
    fn test_alias_deserialize_validates() {
        let inverted: std::result::Result<TimeBoundedAlias, _> =
            toml::from_str("from = \"latest\"\nuntil = \"earliest\"\nname = \"m\"");
        assert!(inverted.is_err());

        let unnamed: std::result::Result<TimeBoundedAlias, _> =
            toml::from_str("from = \"earliest\"\nuntil = \"latest\"\nname = \"\"");
        assert!(unnamed.is_err());

        let valid: TimeBoundedAlias =
            toml::from_str("from = \"earliest\"\nuntil = \"latest\"\nname = \"m\"").unwrap();
        assert_eq!(valid.name(), "m");
        assert_eq!(valid.until(), Timestamp::LATEST);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Timestamp::parse_rfc3339("yesterday").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { .. }));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    #[should_panic(expected = "Invalid timestamp")]
    fn test_must_parse_panics_on_bad_literal() {
        Timestamp::must_parse("2019-04-16 12:00");
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for literal in ["2019-04-16T12:00:05Z", "earliest", "latest"] {
            let t = Timestamp::parse_rfc3339(literal).unwrap();
            assert_eq!(t.to_string(), literal);
        }
    }

    #[test]
    fn test_alias_rejects_empty_name() {
        let err = TimeBoundedAlias::new(Timestamp::EARLIEST, Timestamp::LATEST, "").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_alias_rejects_inverted_window() {
        let result = TimeBoundedAlias::new(Timestamp::LATEST, Timestamp::EARLIEST, "m");
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvertedWindow { .. }))
        ));
    }

    #[test]
    fn test_alias_contains_is_inclusive() {
        let from = Timestamp::from_millis(1000);
        let until = Timestamp::from_millis(2000);
        let alias = TimeBoundedAlias::new(from, until, "m").unwrap();

        assert!(alias.contains(from));
        assert!(alias.contains(until));
        assert!(!alias.contains(Timestamp::from_millis(999)));
        assert!(!alias.contains(Timestamp::from_nanos(until.as_nanos() + 1)));
    }
}
