//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models — they carry no domain behaviour.
//! Domain types live in the `engine` crate; the `TryFrom` impls below
//! perform the row → domain mapping (enum columns are stored as text).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use engine::models::{
    Candidate, EmailTemplate, ExecutionStatus, Job, Offer, OfferStatus, Stage, Workflow,
    WorkflowExecution,
};

use crate::DbError;

fn parse<T: std::str::FromStr<Err = String>>(raw: &str) -> Result<T, DbError> {
    raw.parse().map_err(DbError::Decode)
}

// ---------------------------------------------------------------------------
// workflows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct WorkflowRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub trigger_stage: String,
    pub enabled: bool,
    pub email_template_id: Uuid,
    pub min_match_score: Option<i32>,
    pub source_filter: Vec<String>,
    pub delay_minutes: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<WorkflowRow> for Workflow {
    type Error = DbError;

    fn try_from(row: WorkflowRow) -> Result<Self, Self::Error> {
        Ok(Workflow {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            trigger_stage: parse(&row.trigger_stage)?,
            enabled: row.enabled,
            email_template_id: row.email_template_id,
            min_match_score: row.min_match_score,
            source_filter: row.source_filter,
            delay_minutes: row.delay_minutes.max(0) as u32,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// email_templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct EmailTemplateRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<EmailTemplateRow> for EmailTemplate {
    fn from(row: EmailTemplateRow) -> Self {
        EmailTemplate {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            subject: row.subject,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// candidates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub stage: String,
    pub role: Option<String>,
    pub job_id: Option<Uuid>,
    pub ai_match_score: Option<i32>,
    pub source: Option<String>,
    pub is_test: bool,
    pub cv_upload_token: Option<String>,
    pub cv_token_expires_at: Option<DateTime<Utc>>,
    pub cv_file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = DbError;

    fn try_from(row: CandidateRow) -> Result<Self, Self::Error> {
        Ok(Candidate {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            stage: parse(&row.stage)?,
            role: row.role,
            job_id: row.job_id,
            ai_match_score: row.ai_match_score,
            source: row.source,
            is_test: row.is_test,
            cv_upload_token: row.cv_upload_token,
            cv_token_expires_at: row.cv_token_expires_at,
            cv_file_url: row.cv_file_url,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// jobs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            company: row.company,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// offers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct OfferRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub candidate_id: Uuid,
    pub status: String,
    pub position_title: Option<String>,
    pub salary_amount: Option<i64>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<String>,
    pub start_date: Option<String>,
    pub expires_at: Option<String>,
    pub benefits: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OfferRow> for Offer {
    type Error = DbError;

    fn try_from(row: OfferRow) -> Result<Self, Self::Error> {
        let status: OfferStatus = parse(&row.status)?;
        Ok(Offer {
            id: row.id,
            user_id: row.user_id,
            candidate_id: row.candidate_id,
            status,
            position_title: row.position_title,
            salary_amount: row.salary_amount,
            salary_currency: row.salary_currency,
            salary_period: row.salary_period,
            start_date: row.start_date,
            expires_at: row.expires_at,
            benefits: row.benefits,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// workflow_executions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct WorkflowExecutionRow {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub candidate_id: Uuid,
    pub status: String,
    pub email_log_id: Option<Uuid>,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TryFrom<WorkflowExecutionRow> for WorkflowExecution {
    type Error = DbError;

    fn try_from(row: WorkflowExecutionRow) -> Result<Self, Self::Error> {
        let status: ExecutionStatus = parse(&row.status)?;
        Ok(WorkflowExecution {
            id: row.id,
            workflow_id: row.workflow_id,
            candidate_id: row.candidate_id,
            status,
            email_log_id: row.email_log_id,
            error_message: row.error_message,
            started_at: row.started_at,
            finished_at: row.finished_at,
        })
    }
}
