//! Isolation-Aware Connection Wrapper
//!
//! Pairs a driver connection with its per-connection isolation state and
//! dialect codec, applies the configured session default on connect, and
//! adds isolation semantics around the driver's begin/commit/rollback
//! primitives.

pub mod postgres;

pub use postgres::PgDriverConnection;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::dialect::{DatabaseDialect, IsolationDialect};
use crate::error::IsolationResult;
use crate::isolation::IsolationLevel;
use crate::state::{ConnectionIsolationState, TransactionRequest};

/// Driver primitives the wrapper builds on.
///
/// One implementor per driver; a sqlx PostgreSQL adapter ships in
/// [`postgres`]. The wrapper only adds isolation bookkeeping around these
/// calls and never swallows or alters their timeout or cancellation
/// behavior.
#[async_trait]
pub trait ConnectionOps: Send {
    /// Begin a transaction, appending `extra_clause` to the begin statement
    /// when present. Called at every nesting depth; drivers map nested
    /// begins to savepoints or no-ops as they see fit, and `extra_clause`
    /// is only ever passed for the outermost begin.
    async fn begin_transaction(&mut self, extra_clause: Option<&str>) -> IsolationResult<()>;

    /// Commit the innermost open transaction.
    async fn commit_transaction(&mut self) -> IsolationResult<()>;

    /// Roll back the innermost open transaction.
    async fn rollback_transaction(&mut self) -> IsolationResult<()>;

    /// Execute a statement, discarding any result.
    async fn execute_statement(&mut self, sql: &str) -> IsolationResult<()>;

    /// Run a query returning a single scalar text value.
    async fn query_scalar(&mut self, sql: &str) -> IsolationResult<String>;
}

/// Connection configuration recognized by the wrapper.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ConnectionConfig {
    /// Dialect the connection speaks; selects the isolation codec.
    #[serde(default)]
    pub dialect: DatabaseDialect,
    /// Optional session-default isolation level name. Case-insensitive;
    /// space-, hyphen- and underscore-separated forms are all accepted.
    #[serde(default)]
    pub transaction_isolation_level: Option<String>,
}

/// A driver connection paired with its isolation state and dialect codec.
///
/// Owned by exactly one logical caller at a time. Pools hand out whole
/// wrappers; each pooled connection carries its own independent state, and
/// the pool must not give one connection to two concurrent callers. That
/// single-owner access is a documented precondition, not internally
/// enforced.
pub struct IsolationConnection<C: ConnectionOps> {
    conn: C,
    dialect: &'static dyn IsolationDialect,
    state: ConnectionIsolationState,
}

impl<C: ConnectionOps> IsolationConnection<C> {
    /// Wrap `conn`, resolving the connection's default isolation level once.
    ///
    /// When the configuration names a level, the dialect's session statement
    /// is issued and that level recorded as the default; otherwise the
    /// server's ambient default is queried and decoded. Either way the
    /// resolved default is immutable for the connection's lifetime. A
    /// configured name the codec cannot parse fails with
    /// [`crate::IsolationError::UnrecognizedIsolationLevel`] before any
    /// statement is sent.
    pub async fn connect(mut conn: C, config: &ConnectionConfig) -> IsolationResult<Self> {
        let dialect = config.dialect.codec();
        let default_level = match &config.transaction_isolation_level {
            Some(name) => {
                let level = dialect.decode(name)?;
                conn.execute_statement(&dialect.session_statement(level)).await?;
                debug!(%level, "configured session default isolation level");
                level
            }
            None => {
                let reported = conn.query_scalar(dialect.ambient_default_query()).await?;
                let level = dialect.decode(&reported)?;
                debug!(%level, "using server ambient default isolation level");
                level
            }
        };
        Ok(Self {
            conn,
            dialect,
            state: ConnectionIsolationState::new(default_level),
        })
    }

    /// The connection's resolved default isolation level.
    pub fn default_isolation_level(&self) -> IsolationLevel {
        self.state.default_level()
    }

    /// The level in force for the currently-open transaction, if any.
    pub fn current_isolation_level(&self) -> Option<IsolationLevel> {
        self.state.current_level()
    }

    /// Nesting depth of currently-open transactions.
    pub fn open_transactions(&self) -> u32 {
        self.state.depth()
    }

    /// Access to the underlying driver connection, for running statements
    /// inside a transaction body.
    pub fn driver(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Consume the wrapper and return the driver connection.
    pub fn into_driver(self) -> C {
        self.conn
    }

    /// Run `body` inside a transaction honoring `request`.
    ///
    /// The request is validated against the transaction already open on this
    /// connection before any SQL is sent; an incompatible nested request
    /// propagates immediately without touching the connection or invoking
    /// `body`. On the outermost begin the resolved level is emitted in the
    /// dialect's syntax; nested begins delegate to the driver with no
    /// isolation SQL. Commits on success, rolls back on error from `body`
    /// or from commit (the original error is re-raised; a rollback failure
    /// is logged), and always resets the tracked depth and level when the
    /// scope closes, so no stale level corrupts the connection's next
    /// transaction.
    ///
    /// `body` receives the wrapper itself, so nested transactions go through
    /// the same validation.
    pub fn transaction<'a, R, F>(
        &'a mut self,
        request: TransactionRequest,
        body: F,
    ) -> BoxFuture<'a, IsolationResult<R>>
    where
        R: Send + 'a,
        C: 'a,
        F: for<'c> FnOnce(&'c mut IsolationConnection<C>) -> BoxFuture<'c, IsolationResult<R>>
            + Send
            + 'a,
    {
        Box::pin(async move {
            let resolved = self.state.reconcile(&request)?;
            if resolved.outermost {
                if let Some(statement) = self.dialect.prepare_begin(resolved.explicit) {
                    self.conn.execute_statement(&statement).await?;
                }
                let clause = self.dialect.begin_clause(resolved.explicit);
                debug!(level = %resolved.level, "beginning transaction");
                self.conn.begin_transaction(clause.as_deref()).await?;
            } else {
                debug!(depth = self.state.depth(), "beginning nested transaction");
                self.conn.begin_transaction(None).await?;
            }
            self.state.begin_scope(&resolved);

            let outcome = match body(&mut *self).await {
                Ok(value) => match self.conn.commit_transaction().await {
                    Ok(()) => Ok(value),
                    Err(commit_err) => {
                        if let Err(rollback_err) = self.conn.rollback_transaction().await {
                            warn!(error = %rollback_err, "rollback after failed commit also failed");
                        }
                        Err(commit_err)
                    }
                },
                Err(body_err) => {
                    if let Err(rollback_err) = self.conn.rollback_transaction().await {
                        warn!(error = %rollback_err, "rollback failed, propagating original error");
                    }
                    Err(body_err)
                }
            };
            self.state.end_scope();
            outcome
        })
    }
}
