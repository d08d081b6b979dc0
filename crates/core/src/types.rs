//! Core types for the transaction coordinator
//!
//! This module defines the foundational types:
//! - TransactionId: Unique identifier for a physical transaction
//! - TransactionStatus: Lifecycle state of a physical transaction
//! - PropagationMode: Policy deciding whether a nested scope joins or creates

use std::fmt;
use uuid::Uuid;

/// Unique identifier for a physical transaction
///
/// A TransactionId is a wrapper around a UUID v4, identifying one physical
/// transaction (one resource connection, one commit-or-rollback action).
/// Every logical scope that joins a physical transaction observes the same
/// identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Create a new random TransactionId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a TransactionId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse a TransactionId from a string representation
    ///
    /// Accepts standard UUID format (with or without hyphens).
    ///
    /// # Errors
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this TransactionId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a physical transaction
///
/// State transitions:
/// - `Active` → `Committed` (owner commit, not marked rollback-only)
/// - `Active` → `RolledBack` (owner rollback, or owner commit after a
///   participant marked the transaction rollback-only)
///
/// Terminal states (no transitions allowed):
/// - `Committed`
/// - `RolledBack`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction is live; the resource connection is held
    Active,
    /// Transaction committed; the resource connection has been released
    Committed,
    /// Transaction rolled back; the resource connection has been released
    RolledBack,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Active => write!(f, "active"),
            TransactionStatus::Committed => write!(f, "committed"),
            TransactionStatus::RolledBack => write!(f, "rolled back"),
        }
    }
}

/// Propagation policy for a logical transaction scope
///
/// Decides how `begin` behaves when a physical transaction is already
/// active on the current execution context:
/// - `Required`: join it; otherwise start a new physical transaction.
/// - `RequiresNew`: always start a new physical transaction, suspending
///   the currently active one for the duration of the new scope. Note
///   that two resource connections are held simultaneously in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagationMode {
    /// Join the active physical transaction, or create one if none is active
    #[default]
    Required,
    /// Always create a new physical transaction, suspending any active one
    RequiresNew,
}
