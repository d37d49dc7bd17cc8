//! Context assembly — gathers the candidate, job, offer and profile data
//! a template render needs.
//!
//! Lookup failures on the soft paths degrade to documented defaults
//! rather than aborting the execution; only workflow / candidate /
//! template resolution (handled by the orchestrator) is fatal.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::models::{Candidate, Stage, Workflow};
use crate::render::RenderContext;
use crate::store::EngineStore;
use crate::token;

/// Display name used on outbound email envelopes.
pub const OUTBOUND_SENDER_NAME: &str = "Recruiter";

/// Fallback company name when the candidate has no resolvable job.
const DEFAULT_COMPANY: &str = "Our Company";

/// Build the render context for one execution.
pub async fn assemble(
    store: &dyn EngineStore,
    workflow: &Workflow,
    candidate: &Candidate,
    user_id: Uuid,
    base_url: &str,
) -> RenderContext {
    let (job_title, company_name) = resolve_job(store, candidate, user_id).await;

    let your_name = match store.profile_name(user_id).await {
        Ok(Some(name)) if !name.is_empty() => name,
        Ok(_) => OUTBOUND_SENDER_NAME.to_string(),
        Err(err) => {
            warn!(%user_id, "profile lookup failed, using default sender name: {err}");
            OUTBOUND_SENDER_NAME.to_string()
        }
    };

    let offer = if workflow.trigger_stage == Stage::Offer {
        match store.latest_open_offer(user_id, candidate.id).await {
            Ok(offer) => offer,
            Err(err) => {
                warn!(candidate_id = %candidate.id, "offer lookup failed, rendering without offer context: {err}");
                None
            }
        }
    } else {
        None
    };

    let cv_upload_link = if workflow.trigger_stage == Stage::New && candidate.stage == Stage::New {
        cv_upload_link(store, candidate, base_url).await
    } else {
        None
    };

    RenderContext {
        candidate_name: candidate.name.clone(),
        job_title,
        company_name,
        your_name,
        offer,
        cv_upload_link,
    }
}

/// Resolve (job title, company name) with fail-soft fallbacks: a missing
/// or unreadable job degrades to the candidate's free-text role and the
/// default company name.
async fn resolve_job(
    store: &dyn EngineStore,
    candidate: &Candidate,
    user_id: Uuid,
) -> (String, String) {
    let fallback_title = candidate.role.clone().unwrap_or_default();

    let Some(job_id) = candidate.job_id else {
        return (fallback_title, DEFAULT_COMPANY.to_string());
    };

    match store.job(user_id, job_id).await {
        Ok(Some(job)) => {
            let company = job.company.unwrap_or_else(|| DEFAULT_COMPANY.to_string());
            (job.title, company)
        }
        Ok(None) => (fallback_title, DEFAULT_COMPANY.to_string()),
        Err(err) => {
            warn!(%job_id, "job lookup failed, using fallbacks: {err}");
            (fallback_title, DEFAULT_COMPANY.to_string())
        }
    }
}

/// Build the CV-upload link for a New-stage email, lazily generating and
/// persisting the candidate's token when absent.  Requires a linked job;
/// a failed token save drops the link rather than failing the execution.
async fn cv_upload_link(
    store: &dyn EngineStore,
    candidate: &Candidate,
    base_url: &str,
) -> Option<String> {
    let job_id = candidate.job_id?;

    let token = match &candidate.cv_upload_token {
        Some(existing) => existing.clone(),
        None => {
            let fresh = token::upload_token();
            let expires_at = token::token_expiry(Utc::now());
            if let Err(err) = store.save_upload_token(candidate.id, &fresh, expires_at).await {
                warn!(candidate_id = %candidate.id, "failed to persist upload token, omitting link: {err}");
                return None;
            }
            fresh
        }
    };

    Some(format!(
        "{}/jobs/apply/{job_id}?token={token}",
        base_url.trim_end_matches('/'),
    ))
}
