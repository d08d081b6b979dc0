//! Reference resource layer for txnest
//!
//! This crate implements an in-memory resource behind the
//! `ResourceManager` / `ResourceConnection` seam:
//! - MemoryResource: connection factory over a shared committed store
//! - MemoryConnection: stages writes, publishes them on physical commit
//! - ResourceStats: connection/commit/rollback counters for assertions
//!
//! It exists so the coordinator can be exercised against something with
//! observable physical outcomes; it is not a database.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;

pub use memory::{MemoryConnection, MemoryResource, ResourceStats};
