//! Basic transaction lifecycle
//!
//! Single-scope commit and rollback, and sequential top-level
//! transactions on the same execution context staying fully decoupled.

use crate::common::coordinator;
use txnest::PropagationMode;

// ============================================================================
// Single transaction
// ============================================================================

#[test]
fn commit_publishes_work() {
    let (coordinator, resource) = coordinator();

    let tx = coordinator.begin(PropagationMode::Required).unwrap();
    assert!(tx.is_new_transaction());
    coordinator
        .with_connection(|conn| conn.put("user:1", "alice"))
        .unwrap();
    coordinator.commit(tx).unwrap();

    assert_eq!(resource.get("user:1").as_deref(), Some("alice"));
    assert_eq!(resource.stats().connections_opened, 1);
    assert_eq!(resource.stats().commits, 1);
    assert_eq!(resource.stats().rollbacks, 0);
}

#[test]
fn rollback_discards_work() {
    let (coordinator, resource) = coordinator();

    let tx = coordinator.begin(PropagationMode::Required).unwrap();
    coordinator
        .with_connection(|conn| conn.put("user:1", "alice"))
        .unwrap();
    coordinator.rollback(tx).unwrap();

    assert!(!resource.contains("user:1"));
    assert_eq!(resource.stats().rollbacks, 1);
    assert_eq!(resource.stats().commits, 0);
}

#[test]
fn connection_is_released_after_completion() {
    let (coordinator, _resource) = coordinator();

    let tx = coordinator.begin(PropagationMode::Required).unwrap();
    coordinator.commit(tx).unwrap();

    // nothing is bound anymore
    assert!(coordinator.with_connection(|_conn| ()).is_err());
    assert!(!coordinator.is_rollback_only());
}

// ============================================================================
// Sequential top-level transactions
// ============================================================================

#[test]
fn sequential_commits_use_independent_transactions() {
    let (coordinator, resource) = coordinator();

    let first = coordinator.begin(PropagationMode::Required).unwrap();
    let first_id = first.transaction_id();
    coordinator.commit(first).unwrap();

    let second = coordinator.begin(PropagationMode::Required).unwrap();
    assert!(
        second.is_new_transaction(),
        "a begin after completion starts a new physical transaction"
    );
    assert_ne!(second.transaction_id(), first_id);
    coordinator.commit(second).unwrap();

    assert_eq!(resource.stats().connections_opened, 2);
    assert_eq!(resource.stats().commits, 2);
}

#[test]
fn sequential_outcomes_are_decoupled() {
    let (coordinator, resource) = coordinator();

    let first = coordinator.begin(PropagationMode::Required).unwrap();
    coordinator
        .with_connection(|conn| conn.put("first", "kept"))
        .unwrap();
    coordinator.commit(first).unwrap();

    let second = coordinator.begin(PropagationMode::Required).unwrap();
    coordinator
        .with_connection(|conn| conn.put("second", "discarded"))
        .unwrap();
    coordinator.rollback(second).unwrap();

    // rolling back the second must not disturb the first's committed state
    assert_eq!(resource.get("first").as_deref(), Some("kept"));
    assert!(!resource.contains("second"));
    assert_eq!(resource.stats().commits, 1);
    assert_eq!(resource.stats().rollbacks, 1);
}

#[test]
fn begin_failure_leaves_no_state_behind() {
    let (coordinator, resource) = coordinator();

    resource.set_fail_acquire(true);
    assert!(coordinator.begin(PropagationMode::Required).is_err());
    assert!(coordinator.with_connection(|_conn| ()).is_err());

    resource.set_fail_acquire(false);
    let tx = coordinator.begin(PropagationMode::Required).unwrap();
    assert!(tx.is_new_transaction());
    coordinator.commit(tx).unwrap();
    assert_eq!(resource.stats().connections_opened, 1);
}
