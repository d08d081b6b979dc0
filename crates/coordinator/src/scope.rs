//! Closure-scoped transactions
//!
//! `execute` wraps a body closure in begin → commit/rollback, completing
//! the scope on every exit path, with the outcome decided by a per-scope
//! rollback rule. This is the caller-side policy layer: the coordinator
//! itself only ever executes the commit or rollback instruction it ends
//! up receiving.
//!
//! The failure classification mirrors the usual business split: a fatal
//! failure dooms the transaction, while a recoverable failure is an
//! expected business outcome: the scope commits and the data produced so
//! far is intentionally retained (an order parked as "pending payment"
//! when the balance is short, for example).

use crate::coordinator::TransactionCoordinator;
use thiserror::Error;
use tracing::debug;
use txnest_core::{Error as CoordinatorError, PropagationMode, ResourceManager};

/// How a scope body's failure should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Unrecoverable failure: the scope must roll back
    Fatal,
    /// Expected business outcome: the scope still commits
    Recoverable,
}

/// Classification hook for scope body errors
///
/// Implemented by the error types business bodies return from
/// [`TransactionCoordinator::execute`]. The default is `Fatal`: an error
/// rolls the scope back unless it declares itself recoverable.
pub trait ScopeFailure: std::error::Error {
    /// How this failure should drive the scope's completion
    fn kind(&self) -> FailureKind {
        FailureKind::Fatal
    }
}

/// Per-scope override of the failure-to-outcome mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollbackRule {
    /// Roll back on `Fatal` failures, commit on `Recoverable` ones
    #[default]
    OnFatal,
    /// Roll back on any failure
    Always,
    /// Commit on any failure
    Never,
}

impl RollbackRule {
    /// Whether a failure of the given kind rolls the scope back
    fn demands_rollback(self, kind: FailureKind) -> bool {
        match self {
            RollbackRule::OnFatal => kind == FailureKind::Fatal,
            RollbackRule::Always => true,
            RollbackRule::Never => false,
        }
    }
}

/// Declarative attributes of one transactional scope
///
/// Equivalent to the annotation metadata of declarative transaction
/// frameworks: the propagation mode, the rollback rule, and an optional
/// label for diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionAttributes {
    /// Propagation mode for the scope
    pub propagation: PropagationMode,
    /// Failure-to-outcome mapping for the scope
    pub rollback_rule: RollbackRule,
    /// Diagnostic label shown in trace output
    pub label: Option<&'static str>,
}

impl TransactionAttributes {
    /// Attributes with all defaults (REQUIRED, roll back on fatal)
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes for a scope that always starts its own transaction
    pub fn requires_new() -> Self {
        Self {
            propagation: PropagationMode::RequiresNew,
            ..Self::default()
        }
    }

    /// Replace the rollback rule
    pub fn rollback_rule(mut self, rule: RollbackRule) -> Self {
        self.rollback_rule = rule;
        self
    }

    /// Attach a diagnostic label
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}

/// Failure of a transactional scope
///
/// Distinguishes the body's own failure (the transaction was completed
/// according to the rollback rule) from coordinator failures, including
/// `UnexpectedRollback` surfaced by the owner's commit.
#[derive(Debug, Error)]
pub enum ScopeError<E: std::error::Error> {
    /// The scope body failed; the transaction was completed per the rule
    #[error("scope body failed: {0}")]
    Body(E),
    /// The coordinator failed to begin or complete the scope
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

impl<R: ResourceManager> TransactionCoordinator<R> {
    /// Run a body inside a transactional scope
    ///
    /// Begins a scope with the attributes' propagation mode, runs the
    /// body, and completes the scope on every exit path: commit on
    /// success, and on failure whatever the rollback rule dictates for
    /// the failure's kind. A participating scope whose failure demands
    /// rollback marks the shared transaction rollback-only, so the
    /// outermost scope's commit will surface `UnexpectedRollback`.
    ///
    /// # Errors
    ///
    /// - `ScopeError::Body` if the body failed (transaction completed per
    ///   the rule)
    /// - `ScopeError::Coordinator` if begin or completion failed,
    ///   including `UnexpectedRollback` on a doomed commit
    pub fn execute<T, E, F>(
        &self,
        attributes: &TransactionAttributes,
        body: F,
    ) -> std::result::Result<T, ScopeError<E>>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: ScopeFailure,
    {
        if let Some(label) = attributes.label {
            debug!(label, "entering transactional scope");
        }
        let handle = self.begin(attributes.propagation)?;
        match body() {
            Ok(value) => {
                self.commit(handle)?;
                Ok(value)
            }
            Err(failure) => {
                if attributes.rollback_rule.demands_rollback(failure.kind()) {
                    self.rollback(handle)?;
                } else {
                    self.commit(handle)?;
                }
                Err(ScopeError::Body(failure))
            }
        }
    }
}
