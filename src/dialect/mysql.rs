//! MySQL Isolation Codec
//!
//! MySQL sets the isolation level with a separate `SET TRANSACTION`
//! statement that applies only to the *next* transaction, so it must be
//! issued immediately before that transaction's begin. The server can only
//! report the session default, not the level of an already-open
//! transaction; that limits observability for this dialect but not its
//! function.

use super::{isolation_clause, IsolationDialect};
use crate::isolation::IsolationLevel;

/// Codec for MySQL and engines sharing its syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl IsolationDialect for MySqlDialect {
    fn begin_clause(&self, _level: Option<IsolationLevel>) -> Option<String> {
        None
    }

    fn prepare_begin(&self, level: Option<IsolationLevel>) -> Option<String> {
        level.map(|level| format!("SET TRANSACTION {}", isolation_clause(level)))
    }

    fn session_statement(&self, level: IsolationLevel) -> String {
        format!("SET SESSION TRANSACTION {}", isolation_clause(level))
    }

    fn ambient_default_query(&self) -> &'static str {
        "SELECT @@session.tx_isolation"
    }
}
