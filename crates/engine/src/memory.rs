//! `MemoryStore` — an in-process [`EngineStore`] over plain vectors.
//!
//! Backs the engine's test suite and is handy for local development
//! without Postgres.  It enforces the same in-flight uniqueness semantics
//! as the production store: a second `pending` insert for the same
//! (workflow, candidate) pair fails with `DuplicateExecution`.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Candidate, EmailTemplate, ExecutionStatus, Job, NewEmailLog, Offer, Stage, Workflow,
    WorkflowExecution,
};
use crate::store::{EngineStore, StoreError};

/// A recorded email-log row.
#[derive(Debug, Clone)]
pub struct EmailLogRecord {
    pub id: Uuid,
    pub log: NewEmailLog,
    pub sent_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    workflows: Vec<Workflow>,
    candidates: Vec<Candidate>,
    jobs: Vec<Job>,
    templates: Vec<EmailTemplate>,
    offers: Vec<Offer>,
    profiles: Vec<(Uuid, String)>,
    executions: Vec<WorkflowExecution>,
    email_logs: Vec<EmailLogRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------ Seeding ------

    pub fn insert_workflow(&self, workflow: Workflow) {
        self.inner.lock().unwrap().workflows.push(workflow);
    }

    pub fn insert_candidate(&self, candidate: Candidate) {
        self.inner.lock().unwrap().candidates.push(candidate);
    }

    pub fn insert_job(&self, job: Job) {
        self.inner.lock().unwrap().jobs.push(job);
    }

    pub fn insert_template(&self, template: EmailTemplate) {
        self.inner.lock().unwrap().templates.push(template);
    }

    pub fn insert_offer(&self, offer: Offer) {
        self.inner.lock().unwrap().offers.push(offer);
    }

    pub fn insert_profile(&self, user_id: Uuid, name: impl Into<String>) {
        self.inner.lock().unwrap().profiles.push((user_id, name.into()));
    }

    // ------ Inspection ------

    pub fn executions(&self) -> Vec<WorkflowExecution> {
        self.inner.lock().unwrap().executions.clone()
    }

    pub fn email_logs(&self) -> Vec<EmailLogRecord> {
        self.inner.lock().unwrap().email_logs.clone()
    }

    pub fn candidate_by_id(&self, id: Uuid) -> Option<Candidate> {
        self.inner
            .lock()
            .unwrap()
            .candidates
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }
}

#[async_trait]
impl EngineStore for MemoryStore {
    async fn workflow(&self, user_id: Uuid, id: Uuid) -> Result<Option<Workflow>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .workflows
            .iter()
            .find(|w| w.id == id && w.user_id == user_id)
            .cloned())
    }

    async fn workflows_for_stage(
        &self,
        user_id: Uuid,
        stage: Stage,
    ) -> Result<Vec<Workflow>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .workflows
            .iter()
            .filter(|w| w.user_id == user_id && w.trigger_stage == stage && w.enabled)
            .cloned()
            .collect())
    }

    async fn candidate(&self, user_id: Uuid, id: Uuid) -> Result<Option<Candidate>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .candidates
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn job(&self, user_id: Uuid, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .jobs
            .iter()
            .find(|j| j.id == id && j.user_id == user_id)
            .cloned())
    }

    async fn template(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<EmailTemplate>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .templates
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn latest_open_offer(
        &self,
        user_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Offer>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .offers
            .iter()
            .filter(|o| {
                o.user_id == user_id && o.candidate_id == candidate_id && o.status.is_open()
            })
            .max_by_key(|o| o.created_at)
            .cloned())
    }

    async fn profile_name(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|(id, _)| *id == user_id)
            .map(|(_, name)| name.clone()))
    }

    async fn save_upload_token(
        &self,
        candidate_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let candidate = inner
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| StoreError::Backend("candidate not found".into()))?;
        candidate.cv_upload_token = Some(token.to_string());
        candidate.cv_token_expires_at = Some(expires_at);
        Ok(())
    }

    async fn create_pending_execution(
        &self,
        workflow_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        let in_flight = inner.executions.iter().any(|e| {
            e.workflow_id == workflow_id
                && e.candidate_id == candidate_id
                && e.status == ExecutionStatus::Pending
        });
        if in_flight {
            return Err(StoreError::DuplicateExecution);
        }

        let id = Uuid::new_v4();
        inner.executions.push(WorkflowExecution {
            id,
            workflow_id,
            candidate_id,
            status: ExecutionStatus::Pending,
            email_log_id: None,
            error_message: None,
            started_at: Utc::now(),
            finished_at: None,
        });
        Ok(id)
    }

    async fn finish_execution(
        &self,
        execution_id: Uuid,
        status: ExecutionStatus,
        email_log_id: Option<Uuid>,
        error_message: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let execution = inner
            .executions
            .iter_mut()
            .find(|e| e.id == execution_id)
            .ok_or_else(|| StoreError::Backend("execution not found".into()))?;
        execution.status = status;
        execution.email_log_id = email_log_id;
        execution.error_message = error_message.map(Into::into);
        execution.finished_at = Some(Utc::now());
        Ok(())
    }

    async fn record_skipped(
        &self,
        workflow_id: Uuid,
        candidate_id: Uuid,
        reason: &str,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.inner.lock().unwrap().executions.push(WorkflowExecution {
            id,
            workflow_id,
            candidate_id,
            status: ExecutionStatus::Skipped,
            email_log_id: None,
            error_message: Some(reason.to_string()),
            started_at: now,
            finished_at: Some(now),
        });
        Ok(id)
    }

    async fn has_sent_execution(
        &self,
        workflow_ids: &[Uuid],
        candidate_id: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().executions.iter().any(|e| {
            workflow_ids.contains(&e.workflow_id)
                && e.candidate_id == candidate_id
                && e.status == ExecutionStatus::Sent
        }))
    }

    async fn executions_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<WorkflowExecution>, StoreError> {
        let mut rows: Vec<WorkflowExecution> = self
            .inner
            .lock()
            .unwrap()
            .executions
            .iter()
            .filter(|e| e.candidate_id == candidate_id)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn insert_email_log(&self, log: &NewEmailLog) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().email_logs.push(EmailLogRecord {
            id,
            log: log.clone(),
            sent_at: Utc::now(),
        });
        Ok(id)
    }

    async fn offer_email_logged_since(
        &self,
        user_id: Uuid,
        candidate_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().email_logs.iter().any(|r| {
            r.log.user_id == user_id
                && r.log.candidate_id == candidate_id
                && r.log.kind == crate::models::EmailKind::Offer
                && r.sent_at >= since
        }))
    }
}
