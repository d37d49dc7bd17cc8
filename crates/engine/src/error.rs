//! Engine-level error types.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Errors produced by the workflow engine.
///
/// Only genuinely fatal conditions surface here; disabled workflows, unmet
/// conditions and test-candidate suppression are recorded as `skipped`
/// executions and returned as [`crate::RunOutcome::Skipped`], and a
/// duplicate in-flight execution aborts silently.
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Not-found errors (fatal for the execution) ------

    /// No workflow with this id exists for the acting user.
    #[error("workflow {0} not found")]
    WorkflowNotFound(Uuid),

    /// No candidate with this id exists for the acting user.
    #[error("candidate {0} not found")]
    CandidateNotFound(Uuid),

    /// The workflow references a template that no longer exists.
    #[error("email template {0} not found")]
    TemplateNotFound(Uuid),

    // ------ Dispatch errors ------

    /// The remote send function rejected the email or was unreachable.
    #[error("email dispatch failed: {0}")]
    Send(#[from] mailer::SendError),

    /// The remote send function did not answer within the deadline.
    #[error("email dispatch timed out after {0:?}")]
    SendTimeout(Duration),

    // ------ Persistence ------

    /// Storage error from the injected store.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
