//! Execution-context transaction registry
//!
//! Tracks which physical transaction is active for the current logical
//! thread of execution. Each coordinator owns its own registry, so two
//! coordinators on the same thread never join each other's transactions.
//!
//! The slot discipline is save/restore: binding a new context returns the
//! context it displaced (the suspended one, or None at top level), and
//! completion of the owning scope reinstates it. Joins read the slot
//! without writing it.

use crate::context::TransactionContext;
use dashmap::DashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use txnest_core::ResourceConnection;

/// Per-thread slot for the currently active physical transaction
///
/// Keyed by `ThreadId`, so independent call chains never contend beyond
/// the map shard they hash into. Usage within one chain is
/// single-threaded; the registry does not support driving one logical
/// transaction from multiple threads.
pub struct ExecutionRegistry<C> {
    active: DashMap<ThreadId, Arc<TransactionContext<C>>>,
}

impl<C: ResourceConnection> ExecutionRegistry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            active: DashMap::new(),
        }
    }

    /// The physical transaction bound to the current thread, if any
    pub fn current(&self) -> Option<Arc<TransactionContext<C>>> {
        self.active
            .get(&thread::current().id())
            .map(|entry| entry.value().clone())
    }

    /// Bind a context as the current one, returning the displaced context
    ///
    /// The returned context is the one being suspended (None when the
    /// thread had no active transaction); hand it back to [`restore`]
    /// when the bound scope completes.
    ///
    /// [`restore`]: ExecutionRegistry::restore
    pub fn bind(&self, context: Arc<TransactionContext<C>>) -> Option<Arc<TransactionContext<C>>> {
        self.active.insert(thread::current().id(), context)
    }

    /// Reinstate a previously displaced context (or clear the slot)
    pub fn restore(&self, previous: Option<Arc<TransactionContext<C>>>) {
        match previous {
            Some(context) => {
                self.active.insert(thread::current().id(), context);
            }
            None => {
                self.active.remove(&thread::current().id());
            }
        }
    }

    /// Whether the given context is the one currently bound on this thread
    pub fn is_bound(&self, context: &Arc<TransactionContext<C>>) -> bool {
        self.current()
            .map(|current| Arc::ptr_eq(&current, context))
            .unwrap_or(false)
    }
}

impl<C: ResourceConnection> Default for ExecutionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
