use crate::{config::LocationCredits, WorkMode};

#[derive(Debug, Clone, PartialEq)]
pub struct LocationEvaluation {
    pub score: f64, // 0.0..=1.0
    pub details: String,
}

fn same_country(assignment: Option<&str>, candidate: Option<&str>) -> Option<bool> {
    match (assignment, candidate) {
        (Some(a), Some(c)) => Some(a.trim().eq_ignore_ascii_case(c.trim())),
        _ => None,
    }
}

/// Single entry point for work-mode and country compatibility.
pub fn evaluate_location(
    assignment_mode: WorkMode,
    candidate_mode: WorkMode,
    assignment_country: Option<&str>,
    candidate_country: Option<&str>,
    credits: &LocationCredits,
) -> LocationEvaluation {
    use WorkMode::{Hybrid, Onsite, Remote};

    let country = same_country(assignment_country, candidate_country);
    let needs_presence = |mode: WorkMode| matches!(mode, Onsite | Hybrid);

    // Physical presence in a different country rules the pair out.
    if needs_presence(assignment_mode) && needs_presence(candidate_mode) && country == Some(false)
    {
        return LocationEvaluation {
            score: 0.0,
            details: format!(
                "country mismatch for {}: {:?} vs {:?}",
                assignment_mode.as_ref(),
                assignment_country,
                candidate_country
            ),
        };
    }

    let (score, relation) = match (assignment_mode, candidate_mode) {
        (a, c) if a == c => (1.0, "same mode"),
        (Onsite, Hybrid) | (Hybrid, Onsite) => (credits.hybrid_onsite, "hybrid/onsite"),
        (Remote, Hybrid) | (Hybrid, Remote) => (credits.remote_partial, "remote/hybrid"),
        _ => (0.0, "remote/onsite"),
    };

    LocationEvaluation {
        score,
        details: format!(
            "{relation}: assignment={} candidate={}",
            assignment_mode.as_ref(),
            candidate_mode.as_ref()
        ),
    }
}

pub fn score_location(
    assignment_mode: WorkMode,
    candidate_mode: WorkMode,
    assignment_country: Option<&str>,
    candidate_country: Option<&str>,
    credits: &LocationCredits,
) -> f64 {
    evaluate_location(
        assignment_mode,
        candidate_mode,
        assignment_country,
        candidate_country,
        credits,
    )
    .score
}
