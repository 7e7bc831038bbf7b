//! PostgreSQL Isolation Codec
//!
//! PostgreSQL takes the isolation level inline on each BEGIN statement and
//! resets it automatically when the transaction ends, so no pre-begin
//! statement is ever needed.

use super::{isolation_clause, IsolationDialect};
use crate::isolation::IsolationLevel;

/// Codec for PostgreSQL and engines sharing its syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl IsolationDialect for PostgresDialect {
    fn begin_clause(&self, level: Option<IsolationLevel>) -> Option<String> {
        level.map(isolation_clause)
    }

    fn prepare_begin(&self, _level: Option<IsolationLevel>) -> Option<String> {
        None
    }

    fn session_statement(&self, level: IsolationLevel) -> String {
        format!(
            "SET SESSION CHARACTERISTICS AS TRANSACTION {}",
            isolation_clause(level)
        )
    }

    fn ambient_default_query(&self) -> &'static str {
        "SELECT current_setting('default_transaction_isolation')"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_clause_is_inline_or_absent() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.begin_clause(Some(IsolationLevel::RepeatableRead)),
            Some("ISOLATION LEVEL REPEATABLE READ".to_string())
        );
        assert_eq!(dialect.begin_clause(None), None);
        assert_eq!(dialect.prepare_begin(Some(IsolationLevel::Serializable)), None);
    }

    #[test]
    fn test_session_statement_text() {
        assert_eq!(
            PostgresDialect.session_statement(IsolationLevel::Serializable),
            "SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL SERIALIZABLE"
        );
    }

    #[test]
    fn test_begin_clause_decodes_back_to_the_same_level() {
        let dialect = PostgresDialect;
        for level in IsolationLevel::ALL {
            let clause = dialect.begin_clause(Some(level)).unwrap();
            let reported = clause.strip_prefix("ISOLATION LEVEL ").unwrap();
            assert_eq!(dialect.decode(reported).unwrap(), level);
        }
    }
}
