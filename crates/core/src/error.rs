//! Error types for the transaction coordinator
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::types::{TransactionId, TransactionStatus};
use thiserror::Error;

/// Result type alias for coordinator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the transaction coordinator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Commit was requested on the owning handle, but a participant had
    /// already marked the transaction rollback-only. The physical
    /// transaction has been rolled back.
    #[error("transaction {id} was marked rollback-only by a participant and has been rolled back")]
    UnexpectedRollback {
        /// Identifier of the doomed physical transaction
        id: TransactionId,
    },

    /// An operation was attempted on a physical transaction that has
    /// already completed. This is client misuse (for example completing
    /// a joined handle after the owner already finished) and is never
    /// silently ignored.
    #[error("transaction {id} already completed ({status})")]
    AlreadyCompleted {
        /// Identifier of the completed physical transaction
        id: TransactionId,
        /// Terminal status the transaction completed with
        status: TransactionStatus,
    },

    /// A connection was requested but no physical transaction is active
    /// on the current execution context.
    #[error("no transaction is active on this execution context")]
    NoActiveTransaction,

    /// The underlying resource failed (acquisition, commit, or rollback).
    /// Fatal to the attempted operation; no partial coordinator state is
    /// retained.
    #[error("resource error: {0}")]
    Resource(String),
}
