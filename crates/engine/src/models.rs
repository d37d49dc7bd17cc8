//! Core domain models for the workflow engine.
//!
//! These types are the source of truth for what the engine reads and
//! writes.  Persistence rows live in the `db` crate and are converted into
//! these records at the storage boundary; every optional field documents
//! its default-value policy where one applies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// A named position in the candidate pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    New,
    Screening,
    Interview,
    Reschedule,
    Offer,
    Rejected,
    Hired,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New        => write!(f, "new"),
            Self::Screening  => write!(f, "screening"),
            Self::Interview  => write!(f, "interview"),
            Self::Reschedule => write!(f, "reschedule"),
            Self::Offer      => write!(f, "offer"),
            Self::Rejected   => write!(f, "rejected"),
            Self::Hired      => write!(f, "hired"),
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new"        => Ok(Self::New),
            "screening"  => Ok(Self::Screening),
            "interview"  => Ok(Self::Interview),
            "reschedule" => Ok(Self::Reschedule),
            "offer"      => Ok(Self::Offer),
            "rejected"   => Ok(Self::Rejected),
            "hired"      => Ok(Self::Hired),
            other        => Err(format!("unknown pipeline stage: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A user-owned automation rule: when a candidate enters `trigger_stage`,
/// render the linked template and send it, subject to the gating conditions.
///
/// Workflows are created and edited in settings; the engine only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub trigger_stage: Stage,
    /// Disabled workflows record a `skipped` execution instead of running,
    /// unless the caller explicitly bypasses the check (test sends).
    pub enabled: bool,
    /// Required template reference; a dangling reference is fatal for the
    /// execution that hits it.
    pub email_template_id: Uuid,
    /// Candidate's AI match score must be >= this when set (0–100).
    pub min_match_score: Option<i32>,
    /// Allow-list of acquisition sources; empty means no filtering.
    pub source_filter: Vec<String>,
    /// Minutes to pause before dispatch, within the same execution.
    pub delay_minutes: u32,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// EmailTemplate
// ---------------------------------------------------------------------------

/// Subject + body text carrying `{snake_case}` placeholder tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// Pipeline subject.  Mutated elsewhere (pipeline UI); the engine only
/// reads it, except for lazily backfilling the CV-upload token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub stage: Stage,
    /// Free-text role used as the job-title fallback when no job is linked.
    pub role: Option<String>,
    pub job_id: Option<Uuid>,
    /// Treated as 0 when absent during condition evaluation.
    pub ai_match_score: Option<i32>,
    /// Acquisition source, e.g. "sourced", "referral", "direct_application".
    pub source: Option<String>,
    /// Synthetic/AI-sourced candidates have most automated email suppressed.
    pub is_test: bool,
    pub cv_upload_token: Option<String>,
    pub cv_token_expires_at: Option<DateTime<Utc>>,
    pub cv_file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    /// A genuine application signal lifts the test-candidate suppression:
    /// the candidate either applied directly or has uploaded a CV.
    pub fn has_real_application(&self) -> bool {
        self.source.as_deref() == Some("direct_application") || self.cv_file_url.is_some()
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// Referenced by `Candidate::job_id`; supplies title/company for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Offer
// ---------------------------------------------------------------------------

/// Status of an offer letter.  The first four are "open": still relevant
/// for placeholder substitution when the candidate reaches the Offer stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Draft,
    Sent,
    Viewed,
    Negotiating,
    Accepted,
    Declined,
    Withdrawn,
}

impl OfferStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Draft | Self::Sent | Self::Viewed | Self::Negotiating)
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft       => write!(f, "draft"),
            Self::Sent        => write!(f, "sent"),
            Self::Viewed      => write!(f, "viewed"),
            Self::Negotiating => write!(f, "negotiating"),
            Self::Accepted    => write!(f, "accepted"),
            Self::Declined    => write!(f, "declined"),
            Self::Withdrawn   => write!(f, "withdrawn"),
        }
    }
}

impl std::str::FromStr for OfferStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft"       => Ok(Self::Draft),
            "sent"        => Ok(Self::Sent),
            "viewed"      => Ok(Self::Viewed),
            "negotiating" => Ok(Self::Negotiating),
            "accepted"    => Ok(Self::Accepted),
            "declined"    => Ok(Self::Declined),
            "withdrawn"   => Ok(Self::Withdrawn),
            other         => Err(format!("unknown offer status: {other}")),
        }
    }
}

/// An offer letter for a candidate.  Read-only to the engine; only the
/// most recent open offer participates in rendering.
///
/// `start_date` and `expires_at` are kept as the raw strings the user
/// entered — rendering parses them leniently and falls back to the raw
/// value when unparsable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub candidate_id: Uuid,
    pub status: OfferStatus,
    pub position_title: Option<String>,
    pub salary_amount: Option<i64>,
    /// ISO currency code, e.g. "USD".
    pub salary_currency: Option<String>,
    /// One of "yearly", "monthly", "hourly".
    pub salary_period: Option<String>,
    pub start_date: Option<String>,
    pub expires_at: Option<String>,
    pub benefits: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// WorkflowExecution
// ---------------------------------------------------------------------------

/// Terminal (or in-flight) status of one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Sent,
    Failed,
    Skipped,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Sent    => write!(f, "sent"),
            Self::Failed  => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::str::FromStr for ExecutionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent"    => Ok(Self::Sent),
            "failed"  => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            other     => Err(format!("unknown execution status: {other}")),
        }
    }
}

/// One attempt to run a workflow against one candidate.
///
/// Invariant: at most one `pending` row may exist per
/// (workflow_id, candidate_id) pair at any time; the storage layer
/// enforces this with a uniqueness constraint at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub candidate_id: Uuid,
    pub status: ExecutionStatus,
    pub email_log_id: Option<Uuid>,
    /// Dispatch error for `failed` rows, skip reason for `skipped` rows.
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Email logging
// ---------------------------------------------------------------------------

/// Category recorded with each outbound email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    /// Stage-triggered automation email.
    Workflow,
    /// Offer-stage email; participates in the 5-minute deduplication window.
    Offer,
    /// Settings "send test email" action.
    Test,
}

impl std::fmt::Display for EmailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Workflow => write!(f, "workflow"),
            Self::Offer    => write!(f, "offer"),
            Self::Test     => write!(f, "test"),
        }
    }
}

impl std::str::FromStr for EmailKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workflow" => Ok(Self::Workflow),
            "offer"    => Ok(Self::Offer),
            "test"     => Ok(Self::Test),
            other      => Err(format!("unknown email kind: {other}")),
        }
    }
}

/// Record of an actually-sent email, written best-effort after dispatch.
/// Informational only; never read back by the orchestrator except for the
/// Offer-stage deduplication window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmailLog {
    pub user_id: Uuid,
    pub candidate_id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub kind: EmailKind,
}
