//! Core traits for the resource abstraction
//!
//! This module defines the ResourceManager and ResourceConnection traits
//! that keep the coordinator independent of any concrete resource: the
//! connection is opaque, handed to the coordinator at begin and driven to
//! exactly one physical commit-or-rollback at completion.

use crate::error::Result;

/// One physical resource transaction
///
/// A connection is acquired with a physical transaction already open on
/// it, is held exclusively by the owning transaction context for the full
/// duration of that context, and is consumed by exactly one `commit` or
/// `rollback` call. Dropping the connection releases it back to the
/// resource layer.
///
/// Connection pooling, timeouts, and wire details are resource-layer
/// concerns and invisible to the coordinator.
pub trait ResourceConnection: Send + 'static {
    /// Physically commit the transaction open on this connection
    ///
    /// # Errors
    ///
    /// Returns an error if the resource rejects or fails the commit. The
    /// coordinator treats the transaction as not committed in that case.
    fn commit(&mut self) -> Result<()>;

    /// Physically roll back the transaction open on this connection
    ///
    /// # Errors
    ///
    /// Returns an error if the resource fails the rollback.
    fn rollback(&mut self) -> Result<()>;
}

/// Source of physical resource connections
///
/// Each `acquire` call returns a fresh connection with a physical
/// transaction open on it, independent from every previously acquired
/// connection. The coordinator calls this once per physical transaction:
/// once for a top-level scope, and once more for every REQUIRES_NEW
/// scope (which therefore holds two connections simultaneously).
pub trait ResourceManager {
    /// Connection type handed out by this manager
    type Connection: ResourceConnection;

    /// Acquire a fresh connection with a transaction open on it
    ///
    /// # Errors
    ///
    /// Acquisition failure is fatal to the `begin` that requested it and
    /// is propagated immediately; the coordinator retains no partial
    /// state.
    fn acquire(&self) -> Result<Self::Connection>;
}
