//! Scope-runner outcome mapping
//!
//! An order/payment flow driven through `execute`: normal approval
//! commits, a system failure rolls back, and a short balance is an
//! expected business outcome that parks the order and still commits.
//! Nested variants exercise rollback-only aggregation and REQUIRES_NEW
//! recovery through the scope runner.

use crate::common::coordinator;
use thiserror::Error;
use txnest::{
    Error as TxError, FailureKind, ScopeError, ScopeFailure, TransactionAttributes,
};

#[derive(Debug, Error)]
enum OrderError {
    #[error("payment system failure")]
    SystemFailure,
    #[error("not enough balance")]
    NotEnoughBalance,
}

impl ScopeFailure for OrderError {
    fn kind(&self) -> FailureKind {
        match self {
            OrderError::SystemFailure => FailureKind::Fatal,
            OrderError::NotEnoughBalance => FailureKind::Recoverable,
        }
    }
}

// ============================================================================
// Single scope
// ============================================================================

#[test]
fn normal_approval_commits_the_order() {
    let (coordinator, resource) = coordinator();

    let result: Result<(), ScopeError<OrderError>> =
        coordinator.execute(&TransactionAttributes::new().label("order"), || {
            coordinator
                .with_connection(|conn| conn.put("order:1", "complete"))
                .unwrap();
            Ok(())
        });

    assert!(result.is_ok());
    assert_eq!(resource.get("order:1").as_deref(), Some("complete"));
}

#[test]
fn system_failure_rolls_the_order_back() {
    let (coordinator, resource) = coordinator();

    let result: Result<(), ScopeError<OrderError>> =
        coordinator.execute(&TransactionAttributes::new().label("order"), || {
            coordinator
                .with_connection(|conn| conn.put("order:1", "complete"))
                .unwrap();
            Err(OrderError::SystemFailure)
        });

    assert!(matches!(
        result,
        Err(ScopeError::Body(OrderError::SystemFailure))
    ));
    assert!(!resource.contains("order:1"));
    assert_eq!(resource.stats().rollbacks, 1);
}

#[test]
fn short_balance_parks_the_order_and_commits() {
    let (coordinator, resource) = coordinator();

    let result: Result<(), ScopeError<OrderError>> =
        coordinator.execute(&TransactionAttributes::new().label("order"), || {
            coordinator
                .with_connection(|conn| conn.put("order:1", "pending payment"))
                .unwrap();
            Err(OrderError::NotEnoughBalance)
        });

    assert!(matches!(
        result,
        Err(ScopeError::Body(OrderError::NotEnoughBalance))
    ));
    // the caller is expected to see the order waiting for payment
    assert_eq!(resource.get("order:1").as_deref(), Some("pending payment"));
    assert_eq!(resource.stats().commits, 1);
    assert_eq!(resource.stats().rollbacks, 0);
}

// ============================================================================
// Nested scopes
// ============================================================================

#[test]
fn swallowing_a_nested_failure_does_not_save_the_transaction() {
    let (coordinator, resource) = coordinator();

    // outer scope saves the member, inner scope fails writing the log;
    // catching the inner error cannot undo the rollback-only mark
    let outer: Result<(), ScopeError<OrderError>> =
        coordinator.execute(&TransactionAttributes::new().label("join"), || {
            coordinator
                .with_connection(|conn| conn.put("member:1", "joined"))
                .unwrap();

            let inner: Result<(), ScopeError<OrderError>> =
                coordinator.execute(&TransactionAttributes::new().label("log"), || {
                    Err(OrderError::SystemFailure)
                });
            assert!(inner.is_err());

            Ok(())
        });

    assert!(matches!(
        outer,
        Err(ScopeError::Coordinator(TxError::UnexpectedRollback { .. }))
    ));
    assert!(!resource.contains("member:1"));
    assert_eq!(resource.stats().rollbacks, 1);
    assert_eq!(resource.stats().commits, 0);
}

#[test]
fn unhandled_nested_failure_rolls_everything_back() {
    let (coordinator, resource) = coordinator();

    let outer: Result<(), ScopeError<OrderError>> =
        coordinator.execute(&TransactionAttributes::new().label("join"), || {
            coordinator
                .with_connection(|conn| conn.put("member:1", "joined"))
                .unwrap();

            // the inner failure propagates as the outer body's own failure
            coordinator
                .execute(&TransactionAttributes::new().label("log"), || {
                    Err::<(), _>(OrderError::SystemFailure)
                })
                .map_err(|_| OrderError::SystemFailure)?;
            Ok(())
        });

    // the outer scope rolled back by intent, so no UnexpectedRollback here
    assert!(matches!(
        outer,
        Err(ScopeError::Body(OrderError::SystemFailure))
    ));
    assert!(!resource.contains("member:1"));
    assert_eq!(resource.stats().commits, 0);
    assert_eq!(resource.stats().rollbacks, 1);
}

#[test]
fn requires_new_log_survives_outer_failure() {
    let (coordinator, resource) = coordinator();

    // member registration fails after the audit log was written in its
    // own transaction: the log must survive the member rollback
    let outer: Result<(), ScopeError<OrderError>> =
        coordinator.execute(&TransactionAttributes::new().label("join"), || {
            coordinator
                .with_connection(|conn| conn.put("member:1", "joined"))
                .unwrap();

            let audit: Result<(), ScopeError<OrderError>> = coordinator.execute(
                &TransactionAttributes::requires_new().label("audit"),
                || {
                    coordinator
                        .with_connection(|conn| conn.put("audit:1", "member joined"))
                        .unwrap();
                    Ok(())
                },
            );
            assert!(audit.is_ok());

            Err(OrderError::SystemFailure)
        });

    assert!(outer.is_err());
    assert!(!resource.contains("member:1"), "member scope rolled back");
    assert!(resource.contains("audit:1"), "audit scope committed on its own");
    assert_eq!(resource.stats().connections_opened, 2);
}
