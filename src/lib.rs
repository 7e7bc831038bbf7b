//! # tx-isolation: Isolation-Aware Transaction Management
//!
//! Adds per-transaction isolation level selection to a SQL client
//! connection: callers request an exact or minimum level, the outermost
//! begin emits the correct dialect syntax for it, and illegal nesting
//! requests are rejected before any SQL reaches the database.
//!
//! The crate tracks one [`ConnectionIsolationState`] per connection, owned
//! exclusively by that connection's wrapper. The underlying driver, pool
//! and generic begin/commit/rollback mechanics stay external collaborators
//! behind the [`ConnectionOps`] trait; a sqlx PostgreSQL adapter is
//! provided.

pub mod connection;
pub mod dialect;
pub mod error;
pub mod isolation;
pub mod state;


// Re-export core types
pub use connection::{ConnectionConfig, ConnectionOps, IsolationConnection, PgDriverConnection};
pub use dialect::{DatabaseDialect, IsolationDialect, MySqlDialect, PostgresDialect};
pub use error::{IsolationError, IsolationResult};
pub use isolation::IsolationLevel;
pub use state::{ConnectionIsolationState, ResolvedIsolation, TransactionRequest};
