//! Physical transaction context
//!
//! A `TransactionContext` represents one physical transaction: one
//! resource connection, one eventual commit-or-rollback. All logical
//! scopes that join the transaction hold the same context through an
//! `Arc`, so the rollback-only flag is a single shared cell: any
//! participant can set it, and every participant observes the same value.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use txnest_core::{Error, ResourceConnection, Result, TransactionId, TransactionStatus};

/// Connection slot: holds the live connection while the transaction is
/// active, and the terminal status once it has completed. Completion
/// moves the connection out, releasing it when it drops.
enum ConnectionSlot<C> {
    Open(C),
    Completed(TransactionStatus),
}

/// One physical transaction bound to one resource connection
///
/// Created when a logical scope requests a transaction and none is
/// active on the execution context (or the scope demanded a new one).
/// The connection is released when the owning scope completes; joined
/// scopes never touch it directly.
///
/// The rollback-only flag is monotonic: once set it is never reset, and
/// a later commit request on the owning handle physically rolls back
/// instead.
pub struct TransactionContext<C> {
    id: TransactionId,
    connection: Mutex<ConnectionSlot<C>>,
    rollback_only: AtomicBool,
}

impl<C: ResourceConnection> TransactionContext<C> {
    /// Wrap a freshly acquired connection in a new active context
    pub(crate) fn new(connection: C) -> Self {
        Self {
            id: TransactionId::new(),
            connection: Mutex::new(ConnectionSlot::Open(connection)),
            rollback_only: AtomicBool::new(false),
        }
    }

    /// Identifier of this physical transaction
    ///
    /// Every handle joined to the transaction observes the same id.
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Current lifecycle status
    pub fn status(&self) -> TransactionStatus {
        match &*self.connection.lock() {
            ConnectionSlot::Open(_) => TransactionStatus::Active,
            ConnectionSlot::Completed(status) => *status,
        }
    }

    /// Whether a participant has doomed this transaction
    pub fn is_rollback_only(&self) -> bool {
        self.rollback_only.load(Ordering::Acquire)
    }

    /// Mark the transaction rollback-only
    ///
    /// Returns true if this call was the first to set the flag.
    pub(crate) fn mark_rollback_only(&self) -> bool {
        !self.rollback_only.swap(true, Ordering::AcqRel)
    }

    /// Run a closure against the live connection
    ///
    /// # Errors
    ///
    /// Returns `AlreadyCompleted` if the transaction has finished and the
    /// connection is gone.
    pub(crate) fn with_connection<T>(&self, f: impl FnOnce(&mut C) -> T) -> Result<T> {
        let mut slot = self.connection.lock();
        match &mut *slot {
            ConnectionSlot::Open(connection) => Ok(f(connection)),
            ConnectionSlot::Completed(status) => Err(Error::AlreadyCompleted {
                id: self.id,
                status: *status,
            }),
        }
    }

    /// Physically complete with commit intent
    ///
    /// If the transaction was marked rollback-only, the connection is
    /// rolled back instead and `UnexpectedRollback` is returned: the
    /// caller asked to commit, but a participant had already doomed the
    /// transaction. The connection is released on every path out of here.
    ///
    /// # Errors
    ///
    /// - `UnexpectedRollback` after a participant marked rollback-only
    /// - `AlreadyCompleted` if the transaction already finished
    /// - `Resource` if the physical commit or rollback itself failed; the
    ///   transaction then counts as rolled back (the outcome is not known
    ///   to be committed)
    pub(crate) fn complete_commit(&self) -> Result<()> {
        let mut slot = self.connection.lock();
        // Pessimistically park the slot in RolledBack; the success path
        // overwrites it below.
        let taken = std::mem::replace(
            &mut *slot,
            ConnectionSlot::Completed(TransactionStatus::RolledBack),
        );
        match taken {
            ConnectionSlot::Open(mut connection) => {
                if self.rollback_only.load(Ordering::Acquire) {
                    connection.rollback()?;
                    Err(Error::UnexpectedRollback { id: self.id })
                } else {
                    connection.commit()?;
                    *slot = ConnectionSlot::Completed(TransactionStatus::Committed);
                    Ok(())
                }
            }
            ConnectionSlot::Completed(status) => {
                *slot = ConnectionSlot::Completed(status);
                Err(Error::AlreadyCompleted {
                    id: self.id,
                    status,
                })
            }
        }
    }

    /// Physically complete with rollback intent
    ///
    /// # Errors
    ///
    /// - `AlreadyCompleted` if the transaction already finished
    /// - `Resource` if the physical rollback failed
    pub(crate) fn complete_rollback(&self) -> Result<()> {
        let mut slot = self.connection.lock();
        let taken = std::mem::replace(
            &mut *slot,
            ConnectionSlot::Completed(TransactionStatus::RolledBack),
        );
        match taken {
            ConnectionSlot::Open(mut connection) => connection.rollback(),
            ConnectionSlot::Completed(status) => {
                *slot = ConnectionSlot::Completed(status);
                Err(Error::AlreadyCompleted {
                    id: self.id,
                    status,
                })
            }
        }
    }
}
