//! sqlx PostgreSQL Driver Adapter
//!
//! Implements the driver primitives on a raw sqlx connection. PostgreSQL
//! takes the isolation clause inline on BEGIN, so `extra_clause` lands
//! directly in the begin statement; nested begins become savepoints.

use async_trait::async_trait;
use sqlx::PgConnection;

use super::ConnectionOps;
use crate::error::IsolationResult;

/// Maps begin/commit/rollback at each nesting depth onto the SQL to issue,
/// keeping savepoint numbering aligned with the wrapper's scope accounting.
#[derive(Debug, Default)]
struct SavepointStack {
    depth: u32,
}

impl SavepointStack {
    fn begin_sql(&self, extra_clause: Option<&str>) -> String {
        if self.depth == 0 {
            match extra_clause {
                Some(clause) => format!("BEGIN TRANSACTION {}", clause),
                None => "BEGIN TRANSACTION".to_string(),
            }
        } else {
            format!("SAVEPOINT sp_{}", self.depth)
        }
    }

    fn commit_sql(&self) -> String {
        if self.depth <= 1 {
            "COMMIT".to_string()
        } else {
            format!("RELEASE SAVEPOINT sp_{}", self.depth - 1)
        }
    }

    fn rollback_sql(&self) -> String {
        if self.depth <= 1 {
            "ROLLBACK".to_string()
        } else {
            format!("ROLLBACK TO SAVEPOINT sp_{}", self.depth - 1)
        }
    }

    fn opened(&mut self) {
        self.depth += 1;
    }

    fn closed(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// sqlx-backed PostgreSQL connection adapter.
///
/// Tracks its own begin depth so nested begins map to savepoints, the way
/// the wrapper expects its delegate to handle nesting.
pub struct PgDriverConnection {
    conn: PgConnection,
    stack: SavepointStack,
}

impl PgDriverConnection {
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn,
            stack: SavepointStack::default(),
        }
    }

    /// The raw sqlx connection, for running queries inside a transaction.
    pub fn as_inner(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    async fn run(&mut self, sql: &str) -> IsolationResult<()> {
        sqlx::query(sql).execute(&mut self.conn).await?;
        Ok(())
    }
}

#[async_trait]
impl ConnectionOps for PgDriverConnection {
    async fn begin_transaction(&mut self, extra_clause: Option<&str>) -> IsolationResult<()> {
        let sql = self.stack.begin_sql(extra_clause);
        self.run(&sql).await?;
        self.stack.opened();
        Ok(())
    }

    async fn commit_transaction(&mut self) -> IsolationResult<()> {
        // A failed commit leaves the scope open; the wrapper follows up with
        // a rollback of that same scope.
        let sql = self.stack.commit_sql();
        self.run(&sql).await?;
        self.stack.closed();
        Ok(())
    }

    async fn rollback_transaction(&mut self) -> IsolationResult<()> {
        // Rollback is the last terminator a scope sees: close the scope even
        // when the statement fails, so savepoint numbering stays aligned
        // with the wrapper's depth on the next transaction.
        let sql = self.stack.rollback_sql();
        let result = self.run(&sql).await;
        self.stack.closed();
        result
    }

    async fn execute_statement(&mut self, sql: &str) -> IsolationResult<()> {
        self.run(sql).await
    }

    async fn query_scalar(&mut self, sql: &str) -> IsolationResult<String> {
        let value: String = sqlx::query_scalar(sql).fetch_one(&mut self.conn).await?;
        Ok(value)
    }
}
