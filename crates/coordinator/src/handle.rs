//! Logical transaction handle
//!
//! A `TransactionHandle` is what a caller gets back from `begin`: one
//! logical scope that either owns the physical transaction (`is_new`) or
//! participates in an enclosing one. Handles are consumed by value by
//! `commit` and `rollback`, so a live handle cannot be completed twice.

use crate::context::TransactionContext;
use std::sync::Arc;
use txnest_core::{ResourceConnection, TransactionId};

/// One logical begin/commit-or-rollback scope
///
/// Many handles may reference one physical [`TransactionContext`] (nested
/// REQUIRED scopes); exactly one of them, the one that created the
/// context, owns the physical completion. A REQUIRES_NEW handle
/// additionally carries the context it suspended, which the coordinator
/// reinstates when the handle completes.
pub struct TransactionHandle<C> {
    context: Arc<TransactionContext<C>>,
    is_new: bool,
    suspended: Option<Arc<TransactionContext<C>>>,
}

impl<C: ResourceConnection> std::fmt::Debug for TransactionHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionHandle")
            .field("transaction_id", &self.context.id())
            .field("is_new", &self.is_new)
            .field("suspended", &self.suspended.is_some())
            .finish()
    }
}

impl<C: ResourceConnection> TransactionHandle<C> {
    /// Handle owning a freshly created physical transaction
    pub(crate) fn owning(
        context: Arc<TransactionContext<C>>,
        suspended: Option<Arc<TransactionContext<C>>>,
    ) -> Self {
        Self {
            context,
            is_new: true,
            suspended,
        }
    }

    /// Handle participating in an existing physical transaction
    pub(crate) fn joined(context: Arc<TransactionContext<C>>) -> Self {
        Self {
            context,
            is_new: false,
            suspended: None,
        }
    }

    /// Whether this handle started the physical transaction
    ///
    /// True for top-level and REQUIRES_NEW scopes; false for scopes that
    /// joined an enclosing transaction.
    pub fn is_new_transaction(&self) -> bool {
        self.is_new
    }

    /// Identifier of the physical transaction this scope is part of
    pub fn transaction_id(&self) -> TransactionId {
        self.context.id()
    }

    /// Whether the shared physical transaction has been doomed
    pub fn is_rollback_only(&self) -> bool {
        self.context.is_rollback_only()
    }

    /// Decompose for completion by the coordinator
    #[allow(clippy::type_complexity)]
    pub(crate) fn into_parts(
        self,
    ) -> (
        Arc<TransactionContext<C>>,
        bool,
        Option<Arc<TransactionContext<C>>>,
    ) {
        (self.context, self.is_new, self.suspended)
    }
}
