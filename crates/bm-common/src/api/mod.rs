pub mod match_request;
pub mod match_response;
pub mod pool;

use crate::{error::MatchError, matching::MatchingEngine, run_id};

use match_request::{MatchRequest, MatchSubject};
use match_response::MatchResponse;

/// Resolves a request against `engine` and ranks it in the requested direction.
pub fn execute(engine: &MatchingEngine, request: &MatchRequest) -> Result<MatchResponse, MatchError> {
    let overrides = request.weight_overrides()?;
    let weights = engine.resolve_weights(overrides.as_ref(), request.preset()?)?;
    let options = request.rank_options(engine.config())?;
    let match_run_id = run_id::match_run_id();

    let _span = tracing::info_span!(
        "match_request",
        match_run_id = match_run_id.as_str(),
        direction = request.subject.direction().as_ref()
    )
    .entered();

    let (mut outcome, skipped) = match &request.subject {
        MatchSubject::CandidatesForAssignment {
            assignment,
            candidates,
        } => {
            let pool = MatchSubject::candidate_pool(candidates);
            let outcome = engine.rank_candidates(assignment, &pool.members, &weights, &options)?;
            (outcome, pool.skipped)
        }
        MatchSubject::AssignmentsForCandidate {
            profile,
            assignments,
        } => {
            let pool = MatchSubject::assignment_pool(assignments);
            let outcome = engine.rank_assignments(profile, &pool.members, &weights, &options)?;
            (outcome, pool.skipped)
        }
    };
    outcome.summary.record_skipped(skipped.len());

    Ok(MatchResponse::from_outcome(
        match_run_id,
        request.subject.direction(),
        &weights,
        &options,
        outcome,
    )
    .with_skipped(skipped))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn executes_both_directions() {
        let engine = MatchingEngine::default();

        let forward: MatchRequest = serde_json::from_value(json!({
            "direction": "candidates_for_assignment",
            "assignment": {"id": "a-1", "must_have_skills": [{"id": "rust", "level": 2}]},
            "candidates": [
                {"id": "p-1", "skills": {"rust": {"level": 3, "months_experience": 30}}},
                {"id": "p-2", "skills": {"go": {"level": 5}}}
            ]
        }))
        .unwrap();
        let response = execute(&engine, &forward).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.meta.hard_filtered, 1);
        assert_eq!(response.meta.match_run_id.len(), 26);

        let reverse: MatchRequest = serde_json::from_value(json!({
            "direction": "assignments_for_candidate",
            "profile": {"id": "p-1", "skills": {"rust": {"level": 3}}},
            "assignments": [
                {"id": "a-1", "must_have_skills": [{"id": "rust", "level": 2}], "org_name": "Acme"},
                {"id": "a-2", "must_have_skills": [{"id": "rust", "level": 5}]}
            ]
        }))
        .unwrap();
        let response = execute(&engine, &reverse).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].counterparty_id, "a-1");
        assert!(response.items[0].projected_record.get("org_name").is_none());
    }

    #[test]
    fn bad_pool_members_do_not_fail_the_batch() {
        let request: MatchRequest = serde_json::from_value(json!({
            "direction": "candidates_for_assignment",
            "assignment": {
                "id": "a-1",
                "must_have_skills": [{"id": "rust", "level": 2}],
                "location_mode": "remote",
                "min_language": {"code": "en", "level": "B2"}
            },
            "candidates": [
                {"id": "p-1", "skills": {"rust": {"level": 3}}, "work_mode": "remote",
                 "languages": [{"code": "en", "level": "C1"}]},
                {"id": "p-2", "skills": {"rust": {"level": 3}}, "work_mode": "anywhere",
                 "languages": [{"code": "en", "level": "C1"}]},
                {"display_name": "no id", "skills": {"rust": {"level": 5}}},
                {"id": "p-4", "skills": {"rust": {"level": 3}}, "work_mode": "remote",
                 "languages": [{"code": "en", "level": "Z9"}]}
            ]
        }))
        .unwrap();

        let response = execute(&MatchingEngine::default(), &request).unwrap();
        assert_eq!(response.meta.pool_size, 4);
        assert_eq!(response.meta.skipped, 1);
        assert_eq!(response.meta.skipped_members[0].index, 2);
        assert_eq!(response.items.len(), 3);

        let find = |id: &str| {
            response
                .items
                .iter()
                .find(|item| item.counterparty_id == id)
                .unwrap()
        };
        assert!(!find("p-1").manual_review);
        assert_eq!(
            find("p-2").review_reasons,
            vec!["location: work_mode_unrecognised".to_string()]
        );
        assert_eq!(
            find("p-4").review_reasons,
            vec!["language: language_unrecognised".to_string()]
        );
    }

    #[test]
    fn threshold_needs_near_matches() {
        let request: MatchRequest = serde_json::from_value(json!({
            "direction": "candidates_for_assignment",
            "assignment": {"id": "a-1"},
            "threshold": 0.4
        }))
        .unwrap();

        assert_eq!(
            execute(&MatchingEngine::default(), &request).unwrap_err(),
            MatchError::ThresholdWithoutNearMatches(0.4)
        );
    }

    #[test]
    fn surfaces_validation_errors() {
        let request: MatchRequest = serde_json::from_value(json!({
            "direction": "candidates_for_assignment",
            "assignment": {"id": "a-1"},
            "weights": {"skills": 0, "values": 0, "causes": 0, "experience": 0,
                        "verifications": 0, "availability": 0, "location": 0,
                        "compensation": 0, "language": 0}
        }))
        .unwrap();

        assert!(matches!(
            execute(&MatchingEngine::default(), &request),
            Err(MatchError::NonPositiveWeightSum { .. })
        ));
    }
}
