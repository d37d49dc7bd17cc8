//! Condition evaluation — pure predicates over workflow rules vs.
//! candidate attributes.  No side effects, no errors; absent inputs
//! default safely.

use crate::models::{Candidate, Workflow};

/// Returns true when the candidate passes every gating condition on the
/// workflow.
///
/// - `min_match_score`: the candidate's AI match score (0 when absent)
///   must be >= the threshold.
/// - `source_filter`: when non-empty, the candidate's source must be a
///   member of the allow-list.  A candidate with no source never matches
///   a non-empty filter.
pub fn conditions_met(workflow: &Workflow, candidate: &Candidate) -> bool {
    if let Some(min) = workflow.min_match_score {
        let score = candidate.ai_match_score.unwrap_or(0);
        if score < min {
            return false;
        }
    }

    if !workflow.source_filter.is_empty() {
        match candidate.source.as_deref() {
            Some(source) if workflow.source_filter.iter().any(|s| s == source) => {}
            _ => return false,
        }
    }

    true
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_workflow(min_match_score: Option<i32>, source_filter: Vec<String>) -> Workflow {
        Workflow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "test".into(),
            trigger_stage: Stage::Screening,
            enabled: true,
            email_template_id: Uuid::new_v4(),
            min_match_score,
            source_filter,
            delay_minutes: 0,
            created_at: Utc::now(),
        }
    }

    fn make_candidate(ai_match_score: Option<i32>, source: Option<&str>) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            stage: Stage::Screening,
            role: None,
            job_id: None,
            ai_match_score,
            source: source.map(Into::into),
            is_test: false,
            cv_upload_token: None,
            cv_token_expires_at: None,
            cv_file_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn no_conditions_always_passes() {
        let wf = make_workflow(None, vec![]);
        assert!(conditions_met(&wf, &make_candidate(None, None)));
    }

    #[test]
    fn score_below_threshold_fails() {
        let wf = make_workflow(Some(70), vec![]);
        assert!(!conditions_met(&wf, &make_candidate(Some(50), None)));
    }

    #[test]
    fn score_at_threshold_passes() {
        let wf = make_workflow(Some(70), vec![]);
        assert!(conditions_met(&wf, &make_candidate(Some(70), None)));
    }

    #[test]
    fn missing_score_defaults_to_zero() {
        let wf = make_workflow(Some(1), vec![]);
        assert!(!conditions_met(&wf, &make_candidate(None, None)));
    }

    #[test]
    fn source_filter_rejects_non_member() {
        let wf = make_workflow(None, vec!["referral".into()]);
        assert!(!conditions_met(&wf, &make_candidate(None, Some("sourced"))));
    }

    #[test]
    fn source_filter_accepts_member() {
        let wf = make_workflow(None, vec!["referral".into(), "sourced".into()]);
        assert!(conditions_met(&wf, &make_candidate(None, Some("sourced"))));
    }

    #[test]
    fn source_filter_rejects_candidate_without_source() {
        let wf = make_workflow(None, vec!["referral".into()]);
        assert!(!conditions_met(&wf, &make_candidate(None, None)));
    }

    #[test]
    fn empty_filter_is_no_filter() {
        let wf = make_workflow(None, vec![]);
        assert!(conditions_met(&wf, &make_candidate(None, Some("anything"))));
    }
}
