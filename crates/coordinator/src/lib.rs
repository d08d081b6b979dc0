//! Transaction coordination layer for txnest
//!
//! This crate implements the nested transaction coordinator:
//! - TransactionContext: one physical transaction bound to one connection
//! - TransactionHandle: one logical begin/commit-or-rollback scope
//! - ExecutionRegistry: per-thread tracking of the active physical context
//! - TransactionCoordinator: begin/commit/rollback with propagation policy
//! - Scope runner: closure-scoped transactions with per-scope rollback rules
//!
//! Many logical scopes map onto at most one physical transaction per
//! nesting chain. Participants that fail mark the shared context
//! rollback-only; the owning scope performs the single physical
//! commit-or-rollback and surfaces `UnexpectedRollback` when a
//! participant doomed the transaction it was asked to commit.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod coordinator;
pub mod handle;
pub mod metrics;
pub mod registry;
pub mod scope;

pub use context::TransactionContext;
pub use coordinator::TransactionCoordinator;
pub use handle::TransactionHandle;
pub use metrics::{CoordinatorMetrics, MetricsSnapshot};
pub use registry::ExecutionRegistry;
pub use scope::{FailureKind, RollbackRule, ScopeError, ScopeFailure, TransactionAttributes};
