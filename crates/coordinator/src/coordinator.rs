//! Transaction coordinator
//!
//! Entry point for transaction management: `begin` applies the
//! propagation policy and hands out logical handles, `commit` and
//! `rollback` consume them. At most one physical commit-or-rollback
//! happens per physical transaction, no matter how many logical scopes
//! participated.
//!
//! ## Completion sequence (owning handle)
//!
//! ```text
//! 1. complete the physical transaction (commit, or rollback if doomed)
//! 2. release the connection
//! 3. reinstate any suspended context on the execution registry
//! ```
//!
//! Participants never reach step 1: their rollback intent only marks the
//! shared context rollback-only, deferring the physical action to the
//! owner.

use crate::context::TransactionContext;
use crate::handle::TransactionHandle;
use crate::metrics::{CoordinatorMetrics, MetricsSnapshot};
use crate::registry::ExecutionRegistry;
use std::sync::Arc;
use tracing::{debug, warn};
use txnest_core::{Error, PropagationMode, ResourceManager, Result, TransactionStatus};

/// Decision produced by the propagation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropagationDecision {
    /// Participate in the active physical transaction
    Join,
    /// Start a new physical transaction, suspending any active one
    CreateAndSuspend,
}

/// Propagation policy: pure function of the requested mode and whether a
/// transaction is active on the current execution context.
fn propagation_decision(mode: PropagationMode, transaction_active: bool) -> PropagationDecision {
    match (mode, transaction_active) {
        (PropagationMode::Required, true) => PropagationDecision::Join,
        _ => PropagationDecision::CreateAndSuspend,
    }
}

/// Coordinates logical transaction scopes over a physical resource
///
/// Sits between business operations and the resource layer. Callers
/// `begin` a scope, do their work against the held connection (see
/// [`with_connection`]), and complete the scope with `commit` or
/// `rollback`. Nesting is coordinated per logical thread of control:
/// driving one transaction chain from multiple threads is not supported.
///
/// Each coordinator owns its own execution registry, so independent
/// coordinators never join each other's transactions.
///
/// [`with_connection`]: TransactionCoordinator::with_connection
pub struct TransactionCoordinator<R: ResourceManager> {
    resources: R,
    registry: ExecutionRegistry<R::Connection>,
    metrics: CoordinatorMetrics,
}

impl<R: ResourceManager> TransactionCoordinator<R> {
    /// Create a coordinator over the given resource manager
    pub fn new(resources: R) -> Self {
        Self {
            resources,
            registry: ExecutionRegistry::new(),
            metrics: CoordinatorMetrics::new(),
        }
    }

    /// Begin a logical transaction scope
    ///
    /// With `Required` (the default) the scope joins the active physical
    /// transaction if one exists; otherwise, and always with
    /// `RequiresNew`, a fresh connection is acquired and a new physical
    /// transaction started, suspending any active one until the returned
    /// handle completes. A REQUIRES_NEW scope therefore holds a second
    /// connection alongside the suspended one.
    ///
    /// # Errors
    ///
    /// `Resource` if acquisition fails; nothing is bound in that case.
    pub fn begin(&self, mode: PropagationMode) -> Result<TransactionHandle<R::Connection>> {
        let decision = propagation_decision(mode, self.registry.current().is_some());
        if decision == PropagationDecision::Join {
            if let Some(existing) = self.registry.current() {
                self.metrics.record_join();
                debug!(txn = %existing.id(), "participating in existing transaction");
                return Ok(TransactionHandle::joined(existing));
            }
        }

        let connection = self.resources.acquire()?;
        let context = Arc::new(TransactionContext::new(connection));
        let suspended = self.registry.bind(Arc::clone(&context));
        if let Some(outer) = &suspended {
            debug!(outer = %outer.id(), inner = %context.id(), "suspended transaction");
        }
        self.metrics.record_start();
        debug!(txn = %context.id(), ?mode, "started new physical transaction");
        Ok(TransactionHandle::owning(context, suspended))
    }

    /// Complete a logical scope with commit intent
    ///
    /// On a participating handle this is a physical no-op: the logical
    /// completion is recorded and control returns. On the owning handle
    /// the physical transaction commits, unless a participant marked it
    /// rollback-only, in which case it rolls back and `UnexpectedRollback`
    /// is returned. Any suspended context is reinstated either way.
    ///
    /// # Errors
    ///
    /// - `UnexpectedRollback` when a participant doomed the transaction
    /// - `AlreadyCompleted` if the physical transaction already finished
    /// - `Resource` if the physical completion failed
    pub fn commit(&self, handle: TransactionHandle<R::Connection>) -> Result<()> {
        let (context, is_new, suspended) = handle.into_parts();

        if !is_new {
            return match context.status() {
                TransactionStatus::Active => {
                    debug!(txn = %context.id(), "logical commit of participating scope");
                    Ok(())
                }
                status => Err(Error::AlreadyCompleted {
                    id: context.id(),
                    status,
                }),
            };
        }

        if !self.registry.is_bound(&context) {
            warn!(txn = %context.id(), "completing a transaction that is not the innermost bound context");
        }
        let result = context.complete_commit();
        self.registry.restore(suspended);
        match &result {
            Ok(()) => {
                self.metrics.record_commit();
                debug!(txn = %context.id(), "physical commit");
            }
            Err(Error::UnexpectedRollback { .. }) => {
                self.metrics.record_rollback();
                warn!(txn = %context.id(), "commit requested on rollback-only transaction, rolled back");
            }
            Err(Error::Resource(_)) => {
                self.metrics.record_rollback();
            }
            Err(_) => {}
        }
        result
    }

    /// Complete a logical scope with rollback intent
    ///
    /// A participating handle does not roll back physically; it marks the
    /// shared transaction rollback-only and returns, deferring the
    /// physical action to the owner. The owning handle rolls back
    /// immediately, releases the connection, and reinstates any suspended
    /// context.
    ///
    /// # Errors
    ///
    /// - `AlreadyCompleted` if the physical transaction already finished
    /// - `Resource` if the physical rollback failed
    pub fn rollback(&self, handle: TransactionHandle<R::Connection>) -> Result<()> {
        let (context, is_new, suspended) = handle.into_parts();

        if !is_new {
            return match context.status() {
                TransactionStatus::Active => {
                    if context.mark_rollback_only() {
                        self.metrics.record_rollback_only_mark();
                    }
                    warn!(txn = %context.id(), "participating scope failed, marking transaction rollback-only");
                    Ok(())
                }
                status => Err(Error::AlreadyCompleted {
                    id: context.id(),
                    status,
                }),
            };
        }

        if !self.registry.is_bound(&context) {
            warn!(txn = %context.id(), "completing a transaction that is not the innermost bound context");
        }
        let result = context.complete_rollback();
        self.registry.restore(suspended);
        if result.is_ok() {
            self.metrics.record_rollback();
            debug!(txn = %context.id(), "physical rollback");
        }
        result
    }

    /// Run a closure against the connection of the active transaction
    ///
    /// This is how collaborators issue work against the physical
    /// transaction the current scope participates in.
    ///
    /// # Errors
    ///
    /// `NoActiveTransaction` if no transaction is bound on this thread;
    /// `AlreadyCompleted` if the bound transaction already finished.
    pub fn with_connection<T>(&self, f: impl FnOnce(&mut R::Connection) -> T) -> Result<T> {
        match self.registry.current() {
            Some(context) => context.with_connection(f),
            None => Err(Error::NoActiveTransaction),
        }
    }

    /// Whether the active transaction has been marked rollback-only
    ///
    /// False when no transaction is active. Diagnostic counterpart of
    /// [`TransactionHandle::is_rollback_only`].
    pub fn is_rollback_only(&self) -> bool {
        self.registry
            .current()
            .map(|context| context.is_rollback_only())
            .unwrap_or(false)
    }

    /// Snapshot of the coordinator's activity counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
