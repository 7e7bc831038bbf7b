//! Error types for isolation-level management
//!
//! All three isolation errors are raised synchronously at the point of
//! detection, before any SQL reaches the database; none of them is a
//! transient condition worth retrying.

use crate::isolation::IsolationLevel;

/// Result type alias for isolation operations
pub type IsolationResult<T> = Result<T, IsolationError>;

/// Error types for isolation-level coordination
#[derive(Debug, thiserror::Error)]
pub enum IsolationError {
    /// A request named an isolation level outside the closed enumeration.
    /// A caller-side bug, surfaced before any statement is sent.
    #[error("{0:?} is not a known transaction isolation level")]
    InvalidIsolationLevel(String),

    /// A nested transaction requested an exact or minimum level incompatible
    /// with the level already active on the connection. The caller must
    /// restructure its transaction nesting.
    #[error("{}", incompatible_message(.requested, .active, .minimum))]
    IncompatibleIsolationLevel {
        /// The exact or minimum level the nested request asked for.
        requested: IsolationLevel,
        /// The level the transaction already began with.
        active: IsolationLevel,
        /// Whether the request was a minimum (floor) rather than exact.
        minimum: bool,
    },

    /// The database reported (or the configuration named) isolation-level
    /// text the codec cannot parse; indicates dialect or version drift.
    #[error("Unknown transaction isolation level: {0:?}")]
    UnrecognizedIsolationLevel(String),

    /// Failure from the underlying driver connection.
    #[error("Database error: {0}")]
    Database(String),
}

fn incompatible_message(requested: &IsolationLevel, active: &IsolationLevel, minimum: &bool) -> String {
    let qualifier = if *minimum { "at least " } else { "" };
    format!(
        "Asked to use transaction isolation level {qualifier}{requested}, \
         but the transaction has already begun with isolation level {active}"
    )
}

impl From<sqlx::Error> for IsolationError {
    fn from(err: sqlx::Error) -> Self {
        IsolationError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incompatible_message_cites_both_levels() {
        let err = IsolationError::IncompatibleIsolationLevel {
            requested: IsolationLevel::ReadCommitted,
            active: IsolationLevel::RepeatableRead,
            minimum: false,
        };
        assert_eq!(
            err.to_string(),
            "Asked to use transaction isolation level READ COMMITTED, \
             but the transaction has already begun with isolation level REPEATABLE READ"
        );
    }

    #[test]
    fn test_incompatible_minimum_message_uses_at_least() {
        let err = IsolationError::IncompatibleIsolationLevel {
            requested: IsolationLevel::Serializable,
            active: IsolationLevel::ReadCommitted,
            minimum: true,
        };
        assert_eq!(
            err.to_string(),
            "Asked to use transaction isolation level at least SERIALIZABLE, \
             but the transaction has already begun with isolation level READ COMMITTED"
        );
    }

    #[test]
    fn test_unrecognized_level_surfaces_offending_text() {
        let err = IsolationError::UnrecognizedIsolationLevel("snapshot".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown transaction isolation level: \"snapshot\""
        );
    }
}
