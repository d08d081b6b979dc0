//! Shared helpers for the propagation suite

use txnest::{MemoryResource, TransactionCoordinator};

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Fresh coordinator over a fresh in-memory resource, plus a handle on
/// the resource for physical-outcome assertions.
pub fn coordinator() -> (TransactionCoordinator<MemoryResource>, MemoryResource) {
    init_tracing();
    let resource = MemoryResource::new();
    (TransactionCoordinator::new(resource.clone()), resource)
}
