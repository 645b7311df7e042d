//! Error types for alias resolution

use thiserror::Error;

/// Main error type for alias resolution
#[derive(Error, Debug)]
pub enum Error {
    /// A timestamp literal could not be parsed
    #[error("Invalid timestamp '{input}': {reason}")]
    InvalidTimestamp {
        /// The literal that failed to parse
        input: String,
        /// Parser message
        reason: String,
    },

    /// A timeline or alias record broke one of its invariants
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The data source behind a resolver failed
    ///
    /// Resolvers must return this instead of a partial timeline.
    #[error("Backend error: {0}")]
    Backend(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Timeline validation errors
///
/// Indices refer to positions in the offending timeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Alias name is the empty string
    #[error("Alias at index {index} has an empty name")]
    EmptyName {
        /// Position of the entry
        index: usize,
    },

    /// Window ends before it starts
    #[error("Alias at index {index} has from {from} after until {until}")]
    InvertedWindow {
        /// Position of the entry
        index: usize,
        /// Window start
        from: String,
        /// Window end
        until: String,
    },

    /// First entry does not start at the earliest sentinel
    #[error("Timeline must start at earliest, starts at {0}")]
    NotStartingAtEarliest(String),

    /// Last entry does not end at the latest sentinel
    #[error("Timeline must end at latest, ends at {0}")]
    NotEndingAtLatest(String),

    /// Entries do not strictly ascend by start and end time
    #[error("Alias at index {index} does not start and end after its predecessor")]
    Unsorted {
        /// Position of the out-of-order entry
        index: usize,
    },

    /// Adjacent windows leave uncovered time between them
    #[error("Gap between alias {index} (until {until}) and the next (from {next_from})")]
    Gap {
        /// Position of the earlier entry
        index: usize,
        /// End of the earlier window
        until: String,
        /// Start of the later window
        next_from: String,
    },

    /// Adjacent windows share more than their boundary instant
    #[error("Alias {index} (until {until}) overlaps the next (from {next_from})")]
    Overlap {
        /// Position of the earlier entry
        index: usize,
        /// End of the earlier window
        until: String,
        /// Start of the later window
        next_from: String,
    },

    /// A window reaches past its neighbour into a later window
    #[error("Alias at index {index} overlaps non-adjacent alias at index {other}")]
    NonAdjacentOverlap {
        /// Position of the earlier entry
        index: usize,
        /// Position of the overlapped entry
        other: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts() {
        let err: Error = ValidationError::EmptyName { index: 2 }.into();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("index 2"));
    }

    #[test]
    fn test_backend_error_display() {
        let err = Error::Backend("alias store unreachable".to_string());
        assert_eq!(err.to_string(), "Backend error: alias store unreachable");
    }
}
