//! Workflow execution orchestration.
//!
//! `WorkflowRunner` is the engine's public entry point:
//! 1. Loads the workflow and candidate (scoped to the acting user).
//! 2. Applies the early-exit guards (disabled, test-candidate
//!    suppression, gating conditions), recording `skipped` executions.
//! 3. Resolves the template, assembles the render context, renders.
//! 4. Claims the in-flight execution slot via the storage uniqueness
//!    constraint; a losing racer aborts silently.
//! 5. Applies the configured delay, dispatches the email under a
//!    timeout, and records the terminal outcome.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use mailer::{EmailSender, OutboundEmail};

use crate::conditions::conditions_met;
use crate::context::{self, OUTBOUND_SENDER_NAME};
use crate::error::EngineError;
use crate::models::{EmailKind, ExecutionStatus, NewEmailLog, Stage};
use crate::render;
use crate::store::{EngineStore, StoreError};

/// A direct offer-send action and the Offer stage-change workflow can fire
/// near-simultaneously; emails inside this window are treated as the same
/// send.
const OFFER_DEDUP_WINDOW_MINUTES: i64 = 5;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Origin used to build CV-upload links, e.g. `https://app.example.com`.
    pub base_url: String,
    /// Deadline for one remote email dispatch.
    pub send_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            send_timeout: Duration::from_secs(30),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why an execution was skipped.  `Display` yields the exact reason string
/// recorded on the execution row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    TestCandidate,
    ConditionsNotMet,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled         => write!(f, "Workflow is disabled"),
            Self::TestCandidate    => write!(f, "Test candidate - email not sent"),
            Self::ConditionsNotMet => write!(f, "Workflow conditions not met"),
        }
    }
}

/// The non-error result of one `execute_workflow` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The email was dispatched and the execution recorded as `sent`.
    Sent {
        execution_id: Uuid,
        /// Absent when the best-effort email-log write failed.
        email_log_id: Option<Uuid>,
    },
    /// An early-exit guard fired; a `skipped` execution was recorded.
    Skipped {
        execution_id: Uuid,
        reason: SkipReason,
    },
    /// Another execution for this (workflow, candidate) pair is already in
    /// flight; this attempt aborted silently without writing anything.
    AlreadyRunning,
}

// ---------------------------------------------------------------------------
// WorkflowRunner
// ---------------------------------------------------------------------------

/// Stateless orchestrator over an injected store and mailer.
pub struct WorkflowRunner {
    store: Arc<dyn EngineStore>,
    mailer: Arc<dyn EmailSender>,
    config: RunnerConfig,
}

impl WorkflowRunner {
    pub fn new(
        store: Arc<dyn EngineStore>,
        mailer: Arc<dyn EmailSender>,
        config: RunnerConfig,
    ) -> Self {
        Self { store, mailer, config }
    }

    /// Execute one workflow against one candidate.
    ///
    /// `bypass_enabled_check` is set by the settings "send test email"
    /// action so a disabled workflow can still be exercised end to end.
    ///
    /// # Errors
    /// Returns `EngineError` for missing workflow/candidate/template,
    /// dispatch failure or timeout, and storage failures.  Skips and the
    /// duplicate-execution race are not errors; see [`RunOutcome`].
    #[instrument(skip(self), fields(%workflow_id, %candidate_id))]
    pub async fn execute_workflow(
        &self,
        workflow_id: Uuid,
        candidate_id: Uuid,
        user_id: Uuid,
        bypass_enabled_check: bool,
    ) -> Result<RunOutcome, EngineError> {
        let workflow = self
            .store
            .workflow(user_id, workflow_id)
            .await?
            .ok_or(EngineError::WorkflowNotFound(workflow_id))?;

        if !workflow.enabled && !bypass_enabled_check {
            return self.skip(workflow_id, candidate_id, SkipReason::Disabled).await;
        }

        let candidate = self
            .store
            .candidate(user_id, candidate_id)
            .await?
            .ok_or(EngineError::CandidateNotFound(candidate_id))?;

        // Synthetic candidates get no stage email unless this is the
        // initial New-stage sourcing email or the candidate has shown a
        // genuine application signal.
        if candidate.is_test
            && workflow.trigger_stage != Stage::New
            && !candidate.has_real_application()
        {
            return self.skip(workflow_id, candidate_id, SkipReason::TestCandidate).await;
        }

        if !conditions_met(&workflow, &candidate) {
            return self.skip(workflow_id, candidate_id, SkipReason::ConditionsNotMet).await;
        }

        let template = self
            .store
            .template(user_id, workflow.email_template_id)
            .await?
            .ok_or(EngineError::TemplateNotFound(workflow.email_template_id))?;

        let ctx = context::assemble(
            self.store.as_ref(),
            &workflow,
            &candidate,
            user_id,
            &self.config.base_url,
        )
        .await;
        let rendered = render::render(&template, &ctx);

        // Claim the in-flight slot.  Losing the race is not an error.
        let execution_id = match self
            .store
            .create_pending_execution(workflow_id, candidate_id)
            .await
        {
            Ok(id) => id,
            Err(StoreError::DuplicateExecution) => {
                info!("execution already in flight, aborting");
                return Ok(RunOutcome::AlreadyRunning);
            }
            Err(err) => return Err(err.into()),
        };

        if workflow.delay_minutes > 0 {
            info!(delay_minutes = workflow.delay_minutes, "delaying dispatch");
            tokio::time::sleep(Duration::from_secs(u64::from(workflow.delay_minutes) * 60)).await;
        }

        let kind = if workflow.trigger_stage == Stage::Offer {
            EmailKind::Offer
        } else {
            EmailKind::Workflow
        };

        let email = OutboundEmail {
            to: candidate.email.clone(),
            subject: rendered.subject.clone(),
            content: rendered.body.clone(),
            from_name: OUTBOUND_SENDER_NAME.to_string(),
            candidate_id,
            email_type: kind.to_string(),
        };

        let dispatch_err = match tokio::time::timeout(
            self.config.send_timeout,
            self.mailer.send(&email),
        )
        .await
        {
            Ok(Ok(())) => None,
            Ok(Err(send_err)) => Some(EngineError::Send(send_err)),
            Err(_) => Some(EngineError::SendTimeout(self.config.send_timeout)),
        };

        if let Some(err) = dispatch_err {
            error!("email dispatch failed: {err}");
            if let Err(log_err) = self
                .store
                .finish_execution(
                    execution_id,
                    ExecutionStatus::Failed,
                    None,
                    Some(&err.to_string()),
                )
                .await
            {
                error!("failed to record failed execution: {log_err}");
            }
            return Err(err);
        }

        // The send already succeeded; a failed log write must not
        // downgrade the outcome.
        let log = NewEmailLog {
            user_id,
            candidate_id,
            recipient: candidate.email,
            subject: rendered.subject,
            body: rendered.body,
            kind,
        };
        let email_log_id = match self.store.insert_email_log(&log).await {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("email log write failed after successful send: {err}");
                None
            }
        };

        self.store
            .finish_execution(execution_id, ExecutionStatus::Sent, email_log_id, None)
            .await?;

        info!(%execution_id, "workflow email sent");
        Ok(RunOutcome::Sent { execution_id, email_log_id })
    }

    /// Run every enabled workflow matching the candidate's new stage.
    ///
    /// Failures are isolated per workflow: one broken workflow never
    /// prevents its siblings from attempting, and the caller's stage
    /// change must never fail because of email automation.  Each
    /// workflow's result is returned alongside its id; the outer error
    /// covers only the initial workflow fetch and the
    /// `skip_if_already_sent` checks.
    #[instrument(skip(self), fields(%candidate_id, stage = %new_stage))]
    pub async fn execute_workflows_for_stage(
        &self,
        candidate_id: Uuid,
        new_stage: Stage,
        user_id: Uuid,
        skip_if_already_sent: bool,
    ) -> Result<Vec<(Uuid, Result<RunOutcome, EngineError>)>, EngineError> {
        let workflows = self.store.workflows_for_stage(user_id, new_stage).await?;
        if workflows.is_empty() {
            return Ok(Vec::new());
        }

        if skip_if_already_sent {
            let ids: Vec<Uuid> = workflows.iter().map(|w| w.id).collect();
            if self.store.has_sent_execution(&ids, candidate_id).await? {
                info!("a matching workflow already sent for this candidate, skipping");
                return Ok(Vec::new());
            }

            if new_stage == Stage::Offer {
                let since = Utc::now() - chrono::Duration::minutes(OFFER_DEDUP_WINDOW_MINUTES);
                if self
                    .store
                    .offer_email_logged_since(user_id, candidate_id, since)
                    .await?
                {
                    info!("offer email logged within the dedup window, skipping");
                    return Ok(Vec::new());
                }
            }
        }

        let mut results = Vec::with_capacity(workflows.len());
        for workflow in &workflows {
            let outcome = self
                .execute_workflow(workflow.id, candidate_id, user_id, false)
                .await;
            if let Err(err) = &outcome {
                error!(workflow_id = %workflow.id, "stage-triggered workflow failed: {err}");
            }
            results.push((workflow.id, outcome));
        }

        Ok(results)
    }

    async fn skip(
        &self,
        workflow_id: Uuid,
        candidate_id: Uuid,
        reason: SkipReason,
    ) -> Result<RunOutcome, EngineError> {
        info!(%reason, "skipping workflow execution");
        let execution_id = self
            .store
            .record_skipped(workflow_id, candidate_id, &reason.to_string())
            .await?;
        Ok(RunOutcome::Skipped { execution_id, reason })
    }
}
