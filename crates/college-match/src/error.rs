//! Error types for index construction and matcher configuration.

use thiserror::Error;

/// Errors raised while building a matcher.
///
/// Resolution itself never fails: a query that clears no pass is an
/// unmatched result, not an error.
#[derive(Debug, Error)]
pub enum MatchError {
    /// An index over zero records cannot answer any query.
    #[error("cannot build a matching index from an empty registry")]
    EmptyRegistry,

    /// A configuration value is out of range or inconsistent.
    #[error("invalid matcher configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

/// Result type for matcher construction.
pub type Result<T> = std::result::Result<T, MatchError>;
