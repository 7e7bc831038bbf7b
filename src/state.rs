//! Per-Connection Isolation State
//!
//! Tracks the isolation level in force for the (possibly nested)
//! transaction currently open on a connection, and reconciles new
//! transaction requests against it before any SQL is emitted.

use crate::error::{IsolationError, IsolationResult};
use crate::isolation::IsolationLevel;

/// Per-transaction isolation request: an exact level, a minimum floor,
/// or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Exact level the transaction must run at.
    pub isolation_level: Option<IsolationLevel>,
    /// Lowest level the transaction will accept.
    pub minimum_isolation_level: Option<IsolationLevel>,
}

impl TransactionRequest {
    /// A request with no isolation preference; the connection's default
    /// applies and no extra SQL is emitted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an exact isolation level.
    pub fn isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = Some(level);
        self
    }

    /// Request a minimum (floor) isolation level.
    pub fn minimum_isolation_level(mut self, level: IsolationLevel) -> Self {
        self.minimum_isolation_level = Some(level);
        self
    }

    /// Build a request from level names, validating both against the closed
    /// enumeration before any connection state is inspected or SQL emitted.
    /// An unknown name is a caller bug, reported as
    /// [`IsolationError::InvalidIsolationLevel`] citing the bad value.
    pub fn parse(
        isolation_level: Option<&str>,
        minimum_isolation_level: Option<&str>,
    ) -> IsolationResult<Self> {
        Ok(Self {
            isolation_level: isolation_level.map(parse_level).transpose()?,
            minimum_isolation_level: minimum_isolation_level.map(parse_level).transpose()?,
        })
    }
}

fn parse_level(name: &str) -> IsolationResult<IsolationLevel> {
    IsolationLevel::from_name(name)
        .ok_or_else(|| IsolationError::InvalidIsolationLevel(name.to_string()))
}

/// Outcome of reconciling a request against the connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIsolation {
    /// The level in force for the scope being opened.
    pub level: IsolationLevel,
    /// The level to emit as SQL on the outermost begin. `None` means the
    /// caller made no explicit request, the connection's ambient default
    /// applies and no extra clause is sent.
    pub explicit: Option<IsolationLevel>,
    /// Whether this request opens the outermost transaction (depth 0 -> 1).
    pub outermost: bool,
}

/// Mutable isolation state owned by exactly one connection.
///
/// The default level is resolved once at connection configuration time and
/// never changes; the current level is defined exactly while a transaction
/// is open and is immutable until nesting depth returns to zero.
#[derive(Debug)]
pub struct ConnectionIsolationState {
    default_level: IsolationLevel,
    current_level: Option<IsolationLevel>,
    depth: u32,
}

impl ConnectionIsolationState {
    pub fn new(default_level: IsolationLevel) -> Self {
        Self {
            default_level,
            current_level: None,
            depth: 0,
        }
    }

    /// The level new transactions acquire unless overridden.
    pub fn default_level(&self) -> IsolationLevel {
        self.default_level
    }

    /// The level in force for the currently-open transaction, if any.
    pub fn current_level(&self) -> Option<IsolationLevel> {
        self.current_level
    }

    /// Nesting depth of currently-open transactions.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Validate a request against the transaction currently open on this
    /// connection, without mutating any state.
    ///
    /// With no transaction open, the resolved level is the exact request,
    /// else the minimum request, else the connection default (implicit, no
    /// SQL override emitted); a minimum ranking above the resolved level is
    /// contradictory and rejected rather than silently weakened. With a
    /// transaction open, an exact request must match the active level and a
    /// minimum request must not rank above it; nested requests never change
    /// the active level.
    pub fn reconcile(&self, request: &TransactionRequest) -> IsolationResult<ResolvedIsolation> {
        if self.depth == 0 {
            let explicit = request.isolation_level.or(request.minimum_isolation_level);
            let level = explicit.unwrap_or(self.default_level);
            if let Some(minimum) = request.minimum_isolation_level {
                if minimum.rank() > level.rank() {
                    return Err(IsolationError::IncompatibleIsolationLevel {
                        requested: minimum,
                        active: level,
                        minimum: true,
                    });
                }
            }
            return Ok(ResolvedIsolation {
                level,
                explicit,
                outermost: true,
            });
        }

        let active = self.current_level.unwrap_or(self.default_level);
        if let Some(requested) = request.isolation_level {
            if requested != active {
                return Err(IsolationError::IncompatibleIsolationLevel {
                    requested,
                    active,
                    minimum: false,
                });
            }
        }
        if let Some(minimum) = request.minimum_isolation_level {
            if minimum.rank() > active.rank() {
                return Err(IsolationError::IncompatibleIsolationLevel {
                    requested: minimum,
                    active,
                    minimum: true,
                });
            }
        }
        Ok(ResolvedIsolation {
            level: active,
            explicit: None,
            outermost: false,
        })
    }

    /// Open a scope previously reconciled by [`Self::reconcile`]. Only the
    /// 0 -> 1 transition records the level.
    pub fn begin_scope(&mut self, resolved: &ResolvedIsolation) {
        if self.depth == 0 {
            self.current_level = Some(resolved.level);
        }
        self.depth += 1;
    }

    /// Close the innermost scope. Only the 1 -> 0 transition clears the
    /// level. Must run on every exit path, success or failure, so no stale
    /// level leaks into the connection's next transaction.
    pub fn end_scope(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.current_level = None;
        }
    }
}
