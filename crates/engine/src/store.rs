//! The `EngineStore` trait — the storage contract the orchestrator runs
//! against.
//!
//! The production implementation (`db::PgStore`) maps these calls onto
//! Postgres; tests and local development use [`crate::MemoryStore`].  Every
//! read is scoped by the owning user id, mirroring the row-level ownership
//! of the backing tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Candidate, EmailTemplate, ExecutionStatus, Job, NewEmailLog, Offer, Stage, Workflow,
    WorkflowExecution,
};

/// Errors returned by an [`EngineStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The in-flight uniqueness constraint on
    /// (workflow_id, candidate_id) rejected a `pending` insert: another
    /// execution for the pair is already running.
    #[error("an execution for this workflow and candidate is already in flight")]
    DuplicateExecution,

    /// Any other backend failure (connection, SQL, decode).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Storage operations required by the workflow engine.
#[async_trait]
pub trait EngineStore: Send + Sync {
    // ------ Reads (all scoped to the owning user) ------

    async fn workflow(&self, user_id: Uuid, id: Uuid) -> Result<Option<Workflow>, StoreError>;

    /// All enabled workflows whose trigger stage matches, in fetch order.
    async fn workflows_for_stage(
        &self,
        user_id: Uuid,
        stage: Stage,
    ) -> Result<Vec<Workflow>, StoreError>;

    async fn candidate(&self, user_id: Uuid, id: Uuid) -> Result<Option<Candidate>, StoreError>;

    async fn job(&self, user_id: Uuid, id: Uuid) -> Result<Option<Job>, StoreError>;

    async fn template(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<EmailTemplate>, StoreError>;

    /// The most recent offer for the candidate still in an open status
    /// (draft, sent, viewed, negotiating).
    async fn latest_open_offer(
        &self,
        user_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Offer>, StoreError>;

    /// Display name from the acting user's profile, if any.
    async fn profile_name(&self, user_id: Uuid) -> Result<Option<String>, StoreError>;

    // ------ Candidate token backfill ------

    /// Persist a freshly generated CV-upload token and its expiry on the
    /// candidate row.
    async fn save_upload_token(
        &self,
        candidate_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    // ------ Execution log ------

    /// Insert a `pending` execution row and return its id.
    ///
    /// Must fail with [`StoreError::DuplicateExecution`] when a `pending`
    /// row already exists for the (workflow_id, candidate_id) pair.
    async fn create_pending_execution(
        &self,
        workflow_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Uuid, StoreError>;

    /// Transition an execution to its terminal status.
    async fn finish_execution(
        &self,
        execution_id: Uuid,
        status: ExecutionStatus,
        email_log_id: Option<Uuid>,
        error_message: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Record an early-exit `skipped` execution with a human-readable reason.
    async fn record_skipped(
        &self,
        workflow_id: Uuid,
        candidate_id: Uuid,
        reason: &str,
    ) -> Result<Uuid, StoreError>;

    /// Whether any of the given workflows already has a `sent` execution
    /// for this candidate.
    async fn has_sent_execution(
        &self,
        workflow_ids: &[Uuid],
        candidate_id: Uuid,
    ) -> Result<bool, StoreError>;

    /// Execution history for a candidate, newest first.
    async fn executions_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<WorkflowExecution>, StoreError>;

    // ------ Email log ------

    /// Insert a sent-email record and return its id.
    async fn insert_email_log(&self, log: &NewEmailLog) -> Result<Uuid, StoreError>;

    /// Whether an offer-kind email was logged for this candidate at or
    /// after `since`.
    async fn offer_email_logged_since(
        &self,
        user_id: Uuid,
        candidate_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}
