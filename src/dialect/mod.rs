//! SQL Dialect Codecs
//!
//! Each supported database contributes one codec translating between the
//! portable [`IsolationLevel`] enum and that engine's wire syntax. Dialects
//! are selected explicitly by configuration through [`DatabaseDialect`],
//! never detected from whatever driver happens to be loaded.

pub mod mysql;
pub mod postgres;

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;

use crate::error::{IsolationError, IsolationResult};
use crate::isolation::IsolationLevel;

/// Codec contract implemented once per supported database dialect.
///
/// Additional dialects plug in by implementing these operations and wiring
/// themselves into [`DatabaseDialect`].
pub trait IsolationDialect: Send + Sync {
    /// Fragment appended to the outermost BEGIN statement, or `None` when no
    /// level was requested (the connection's ambient default applies, emit
    /// nothing extra) or when the dialect does not take the level inline.
    fn begin_clause(&self, level: Option<IsolationLevel>) -> Option<String>;

    /// Statement to execute immediately before the outermost begin, for
    /// dialects that scope the isolation level to the next transaction only.
    fn prepare_begin(&self, level: Option<IsolationLevel>) -> Option<String>;

    /// Statement setting the connection's default isolation level at
    /// session-configuration time.
    fn session_statement(&self, level: IsolationLevel) -> String;

    /// Scalar query reporting the server's ambient default isolation level.
    fn ambient_default_query(&self) -> &'static str;

    /// Parse a database-reported isolation level string. Accepts space-,
    /// hyphen- and underscore-separated forms case-insensitively; anything
    /// else fails with [`IsolationError::UnrecognizedIsolationLevel`]
    /// carrying the literal offending text.
    fn decode(&self, text: &str) -> IsolationResult<IsolationLevel> {
        IsolationLevel::from_name(text)
            .ok_or_else(|| IsolationError::UnrecognizedIsolationLevel(text.to_string()))
    }
}

/// The `ISOLATION LEVEL <name>` fragment shared by both built-in dialects.
pub(crate) fn isolation_clause(level: IsolationLevel) -> String {
    format!("ISOLATION LEVEL {}", level.as_sql())
}

/// Database dialects with built-in codecs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDialect {
    #[default]
    PostgreSQL,
    MySQL,
}

impl DatabaseDialect {
    /// The codec for this dialect.
    pub fn codec(self) -> &'static dyn IsolationDialect {
        match self {
            DatabaseDialect::PostgreSQL => &PostgresDialect,
            DatabaseDialect::MySQL => &MySqlDialect,
        }
    }
}

impl std::fmt::Display for DatabaseDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseDialect::PostgreSQL => write!(f, "postgresql"),
            DatabaseDialect::MySQL => write!(f, "mysql"),
        }
    }
}

impl std::str::FromStr for DatabaseDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(DatabaseDialect::PostgreSQL),
            "mysql" => Ok(DatabaseDialect::MySQL),
            _ => Err(format!("Unsupported database dialect: {}", s)),
        }
    }
}
