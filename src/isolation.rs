//! Transaction Isolation Levels
//!
//! The four standard SQL isolation levels with a total order matching
//! SQL strictness. Rendering a level into a dialect's wire syntax and
//! parsing a dialect's reported value live in the dialect module; the
//! ordering here is universal.

/// Transaction isolation levels defined by the SQL standard, ordered from
/// least to most strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IsolationLevel {
    /// Read Uncommitted - lowest isolation level, dirty reads allowed
    ReadUncommitted,
    /// Read Committed - default PostgreSQL isolation level
    ReadCommitted,
    /// Repeatable Read - stronger consistency guarantees
    RepeatableRead,
    /// Serializable - highest isolation level
    Serializable,
}

impl IsolationLevel {
    /// All levels, in order of increasing strictness.
    pub const ALL: [IsolationLevel; 4] = [
        IsolationLevel::ReadUncommitted,
        IsolationLevel::ReadCommitted,
        IsolationLevel::RepeatableRead,
        IsolationLevel::Serializable,
    ];

    /// Integer rank of this level, strictly increasing with strictness.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// The canonical upper-case SQL spelling of this level.
    pub fn as_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }

    /// Parse a level name, accepting space-, hyphen- and underscore-separated
    /// forms case-insensitively ("READ-UNCOMMITTED", "read uncommitted" and
    /// "read_uncommitted" all parse identically). Returns `None` for any
    /// other text; callers wrap the failure in the error appropriate to
    /// their boundary.
    pub fn from_name(name: &str) -> Option<IsolationLevel> {
        let normalized = name.trim().replace(['-', '_'], " ").to_uppercase();
        match normalized.as_str() {
            "READ UNCOMMITTED" => Some(IsolationLevel::ReadUncommitted),
            "READ COMMITTED" => Some(IsolationLevel::ReadCommitted),
            "REPEATABLE READ" => Some(IsolationLevel::RepeatableRead),
            "SERIALIZABLE" => Some(IsolationLevel::Serializable),
            _ => None,
        }
    }
}

impl std::fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}
