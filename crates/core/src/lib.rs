//! Core types and traits for txnest
//!
//! This crate defines the foundational types used throughout the system:
//! - TransactionId: Unique identifier for physical transactions
//! - TransactionStatus: Lifecycle state of a physical transaction
//! - PropagationMode: Join-or-create policy for nested scopes
//! - Error: Error type hierarchy
//! - Traits: Resource seam definitions (ResourceManager, ResourceConnection)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use traits::{ResourceConnection, ResourceManager};
pub use types::{PropagationMode, TransactionId, TransactionStatus};
