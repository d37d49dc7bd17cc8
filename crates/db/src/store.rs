//! `PgStore` — the production `engine::EngineStore` over the sqlx
//! repositories.
//!
//! A thin delegation layer: row → domain conversion plus error mapping
//! (`DbError::Conflict` becomes `StoreError::DuplicateExecution`; all
//! other failures collapse into `StoreError::Backend`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use engine::models::{
    Candidate, EmailTemplate, ExecutionStatus, Job, NewEmailLog, Offer, Stage, Workflow,
    WorkflowExecution,
};
use engine::store::{EngineStore, StoreError};

use crate::{repository, DbError, DbPool};

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for callers that also need raw repository
    /// access (the API layer's CRUD handlers).
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn store_err(err: DbError) -> StoreError {
    match err {
        DbError::Conflict => StoreError::DuplicateExecution,
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl EngineStore for PgStore {
    async fn workflow(&self, user_id: Uuid, id: Uuid) -> Result<Option<Workflow>, StoreError> {
        repository::workflows::get_workflow(&self.pool, user_id, id)
            .await
            .map_err(store_err)?
            .map(TryInto::try_into)
            .transpose()
            .map_err(store_err)
    }

    async fn workflows_for_stage(
        &self,
        user_id: Uuid,
        stage: Stage,
    ) -> Result<Vec<Workflow>, StoreError> {
        repository::workflows::list_enabled_for_stage(&self.pool, user_id, &stage.to_string())
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|row| row.try_into().map_err(store_err))
            .collect()
    }

    async fn candidate(&self, user_id: Uuid, id: Uuid) -> Result<Option<Candidate>, StoreError> {
        repository::candidates::get_candidate(&self.pool, user_id, id)
            .await
            .map_err(store_err)?
            .map(TryInto::try_into)
            .transpose()
            .map_err(store_err)
    }

    async fn job(&self, user_id: Uuid, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(repository::jobs::get_job(&self.pool, user_id, id)
            .await
            .map_err(store_err)?
            .map(Into::into))
    }

    async fn template(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<EmailTemplate>, StoreError> {
        Ok(repository::templates::get_template(&self.pool, user_id, id)
            .await
            .map_err(store_err)?
            .map(Into::into))
    }

    async fn latest_open_offer(
        &self,
        user_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Offer>, StoreError> {
        repository::offers::latest_open_offer(&self.pool, user_id, candidate_id)
            .await
            .map_err(store_err)?
            .map(TryInto::try_into)
            .transpose()
            .map_err(store_err)
    }

    async fn profile_name(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        repository::profiles::profile_name(&self.pool, user_id)
            .await
            .map_err(store_err)
    }

    async fn save_upload_token(
        &self,
        candidate_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        repository::candidates::save_upload_token(&self.pool, candidate_id, token, expires_at)
            .await
            .map_err(store_err)
    }

    async fn create_pending_execution(
        &self,
        workflow_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Uuid, StoreError> {
        repository::executions::create_pending(&self.pool, workflow_id, candidate_id)
            .await
            .map_err(store_err)
    }

    async fn finish_execution(
        &self,
        execution_id: Uuid,
        status: ExecutionStatus,
        email_log_id: Option<Uuid>,
        error_message: Option<&str>,
    ) -> Result<(), StoreError> {
        repository::executions::finish(
            &self.pool,
            execution_id,
            &status.to_string(),
            email_log_id,
            error_message,
        )
        .await
        .map_err(store_err)
    }

    async fn record_skipped(
        &self,
        workflow_id: Uuid,
        candidate_id: Uuid,
        reason: &str,
    ) -> Result<Uuid, StoreError> {
        repository::executions::record_skipped(&self.pool, workflow_id, candidate_id, reason)
            .await
            .map_err(store_err)
    }

    async fn has_sent_execution(
        &self,
        workflow_ids: &[Uuid],
        candidate_id: Uuid,
    ) -> Result<bool, StoreError> {
        repository::executions::has_sent(&self.pool, workflow_ids, candidate_id)
            .await
            .map_err(store_err)
    }

    async fn executions_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<WorkflowExecution>, StoreError> {
        repository::executions::list_for_candidate(&self.pool, candidate_id)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|row| row.try_into().map_err(store_err))
            .collect()
    }

    async fn insert_email_log(&self, log: &NewEmailLog) -> Result<Uuid, StoreError> {
        repository::email_logs::insert(
            &self.pool,
            log.user_id,
            log.candidate_id,
            &log.recipient,
            &log.subject,
            &log.body,
            &log.kind.to_string(),
        )
        .await
        .map_err(store_err)
    }

    async fn offer_email_logged_since(
        &self,
        user_id: Uuid,
        candidate_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        repository::email_logs::offer_logged_since(&self.pool, user_id, candidate_id, since)
            .await
            .map_err(store_err)
    }
}
