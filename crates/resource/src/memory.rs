//! In-memory staged-write resource
//!
//! `MemoryResource` hands out connections whose writes are buffered until
//! the physical commit and discarded on physical rollback. The shared
//! committed store plus the connection/commit/rollback counters give
//! tests a direct view of physical outcomes: a value is present in the
//! store if and only if the connection that staged it committed.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use txnest_core::{Error, ResourceConnection, ResourceManager, Result};

/// Counters describing physical activity on a [`MemoryResource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceStats {
    /// Connections handed out by `acquire`
    pub connections_opened: u64,
    /// Physical commits performed
    pub commits: u64,
    /// Physical rollbacks performed
    pub rollbacks: u64,
}

/// Shared state behind all connections of one resource
struct StoreInner {
    committed: BTreeMap<String, String>,
    next_connection_id: u64,
    stats: ResourceStats,
    fail_acquire: bool,
}

impl StoreInner {
    fn new() -> Self {
        Self {
            committed: BTreeMap::new(),
            next_connection_id: 1,
            stats: ResourceStats::default(),
            fail_acquire: false,
        }
    }
}

/// In-memory connection factory over a shared committed store
///
/// Cloning the resource clones the handle, not the store: all clones
/// observe the same committed data and the same counters. Acquisition
/// failure can be injected with [`MemoryResource::set_fail_acquire`] to
/// exercise the fatal-begin path.
#[derive(Clone)]
pub struct MemoryResource {
    inner: Arc<Mutex<StoreInner>>,
}

impl MemoryResource {
    /// Create an empty resource
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner::new())),
        }
    }

    /// Make subsequent `acquire` calls fail (or succeed again)
    pub fn set_fail_acquire(&self, fail: bool) {
        self.inner.lock().fail_acquire = fail;
    }

    /// Look up a committed value
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().committed.get(key).cloned()
    }

    /// Check whether a committed value exists
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().committed.contains_key(key)
    }

    /// Number of committed entries
    pub fn committed_len(&self) -> usize {
        self.inner.lock().committed.len()
    }

    /// Snapshot of the physical activity counters
    pub fn stats(&self) -> ResourceStats {
        self.inner.lock().stats
    }
}

impl Default for MemoryResource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceManager for MemoryResource {
    type Connection = MemoryConnection;

    fn acquire(&self) -> Result<MemoryConnection> {
        let mut inner = self.inner.lock();
        if inner.fail_acquire {
            return Err(Error::Resource("acquisition refused".to_string()));
        }
        let id = inner.next_connection_id;
        inner.next_connection_id += 1;
        inner.stats.connections_opened += 1;
        debug!(connection = id, "acquired connection");
        Ok(MemoryConnection {
            id,
            staged: Vec::new(),
            store: Arc::clone(&self.inner),
        })
    }
}

/// One physical transaction against a [`MemoryResource`]
///
/// Writes staged with [`MemoryConnection::put`] become visible in the
/// shared store only when the connection commits.
pub struct MemoryConnection {
    id: u64,
    staged: Vec<(String, String)>,
    store: Arc<Mutex<StoreInner>>,
}

impl MemoryConnection {
    /// Identifier of this connection, unique per resource
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stage a write; published on commit, discarded on rollback
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.staged.push((key.into(), value.into()));
    }

    /// Number of staged, not yet committed writes
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }
}

impl ResourceConnection for MemoryConnection {
    fn commit(&mut self) -> Result<()> {
        let mut inner = self.store.lock();
        for (key, value) in self.staged.drain(..) {
            inner.committed.insert(key, value);
        }
        inner.stats.commits += 1;
        debug!(connection = self.id, "committed connection");
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let discarded = self.staged.len();
        self.staged.clear();
        let mut inner = self.store.lock();
        inner.stats.rollbacks += 1;
        debug!(
            connection = self.id,
            discarded, "rolled back connection"
        );
        Ok(())
    }
}
