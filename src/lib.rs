//! txnest - Nested transaction coordinator
//!
//! txnest coordinates logical transaction scopes over a physical
//! resource: nested scopes share one physical transaction, REQUIRES_NEW
//! scopes suspend it and run their own, failed participants mark the
//! shared transaction rollback-only, and exactly one physical
//! commit-or-rollback happens per physical transaction.
//!
//! # Quick Start
//!
//! ```
//! use txnest::{MemoryResource, PropagationMode, TransactionCoordinator};
//!
//! let resource = MemoryResource::new();
//! let coordinator = TransactionCoordinator::new(resource.clone());
//!
//! let outer = coordinator.begin(PropagationMode::Required)?;
//! coordinator.with_connection(|conn| conn.put("user:1", "alice"))?;
//!
//! // a nested scope joins the same physical transaction
//! let inner = coordinator.begin(PropagationMode::Required)?;
//! assert!(!inner.is_new_transaction());
//! coordinator.commit(inner)?;
//!
//! coordinator.commit(outer)?;
//! assert!(resource.contains("user:1"));
//! # Ok::<(), txnest::Error>(())
//! ```
//!
//! # Architecture
//!
//! The coordinator sits between business operations and an opaque
//! resource reached through the [`ResourceManager`] / Connection seam.
//! [`MemoryResource`] is a reference in-memory implementation of that
//! seam with observable physical outcomes.

pub use txnest_core::{
    Error, PropagationMode, ResourceConnection, ResourceManager, Result, TransactionId,
    TransactionStatus,
};

pub use txnest_coordinator::{
    CoordinatorMetrics, ExecutionRegistry, FailureKind, MetricsSnapshot, RollbackRule, ScopeError,
    ScopeFailure, TransactionAttributes, TransactionContext, TransactionCoordinator,
    TransactionHandle,
};

pub use txnest_resource::{MemoryConnection, MemoryResource, ResourceStats};
