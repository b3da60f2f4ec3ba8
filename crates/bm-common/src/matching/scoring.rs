use std::collections::{BTreeMap, BTreeSet};

use super::{
    availability::score_availability,
    knockout::{run_knockout_checks, KnockoutResult},
    location::evaluate_location,
    skills::{average_months_experience, score_skills_with_share, SkillScore},
    weights::Dimension,
};
use crate::{
    config::{ExperienceCurve, MatchingConfig},
    corrections::normalize_tag_set,
    AssignmentRequirement, Bounds, CandidateProfile, GateId, LanguageSkill,
};

/// Per-dimension scores in `[0, 1]`. A dimension left out is unconstrained.
pub type Subscores = BTreeMap<Dimension, f64>;

fn overlap_ratio(candidate: &BTreeSet<String>, required: &BTreeSet<String>) -> f64 {
    let required = normalize_tag_set(required);
    if required.is_empty() {
        return 1.0;
    }

    let candidate = normalize_tag_set(candidate);
    let shared = required.intersection(&candidate).count();
    shared as f64 / required.len() as f64
}

/// Share of the required values the candidate holds.
pub fn score_values(candidate: &BTreeSet<String>, required: &BTreeSet<String>) -> f64 {
    overlap_ratio(candidate, required)
}

pub fn score_causes(candidate: &BTreeSet<String>, required: &BTreeSet<String>) -> f64 {
    overlap_ratio(candidate, required)
}

pub fn score_experience(average_months: f64, curve: &ExperienceCurve) -> f64 {
    curve.evaluate(average_months)
}

pub fn score_verifications(required: &BTreeSet<GateId>, verified: &BTreeMap<GateId, bool>) -> f64 {
    if required.is_empty() {
        return 1.0;
    }

    let passed = required
        .iter()
        .filter(|gate| verified.get(*gate).copied().unwrap_or(false))
        .count();
    passed as f64 / required.len() as f64
}

/// Overlap length over union length. Identical point ranges count as a full match.
pub fn score_compensation(assignment: &Bounds<f64>, candidate: &Bounds<f64>) -> f64 {
    let Some(overlap) = assignment.overlap(candidate) else {
        return 0.0;
    };

    let union = assignment.union_len(candidate);
    if union <= 0.0 {
        1.0
    } else {
        overlap / union
    }
}

/// CEFR comparison on the rank scale A1=1 .. C2=6.
pub fn score_language(min: &LanguageSkill, candidate_languages: &[LanguageSkill]) -> f64 {
    let best = candidate_languages
        .iter()
        .filter(|language| language.code.trim().eq_ignore_ascii_case(min.code.trim()))
        .map(|language| language.level)
        .max();

    match best {
        None => 0.0,
        Some(level) if level >= min.level => 1.0,
        Some(level) => f64::from(level.rank()) / f64::from(min.level.rank()),
    }
}

/// Everything the pipeline needs to know about one requirement/profile pair.
#[derive(Debug, Clone)]
pub struct PairEvaluation {
    pub skills: SkillScore,
    pub subscores: Subscores,
    pub knockout: KnockoutResult,
}

/// Skills outcome and knockout decisions for a pair, before the other scorers run.
#[derive(Debug, Clone)]
pub struct Screening {
    pub skills: SkillScore,
    pub knockout: KnockoutResult,
}

/// Runs the nine dimension scorers under one configuration.
#[derive(Debug, Clone, Default)]
pub struct DimensionScorer {
    config: MatchingConfig,
}

impl DimensionScorer {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Skills and the knockout checks. In strict rankings a hard knockout here means the
    /// other scorers never run for the pair.
    pub fn screen(
        &self,
        requirement: &AssignmentRequirement,
        profile: &CandidateProfile,
    ) -> Screening {
        let skills = score_skills_with_share(
            &requirement.must_have_skills,
            &requirement.nice_to_have_skills,
            &profile.skills,
            self.config.skill_must_have_share,
        );
        let knockout = run_knockout_checks(requirement, profile, &skills);
        Screening { skills, knockout }
    }

    /// Screening followed by the remaining scorers.
    pub fn evaluate(
        &self,
        requirement: &AssignmentRequirement,
        profile: &CandidateProfile,
    ) -> PairEvaluation {
        self.complete(requirement, profile, self.screen(requirement, profile))
    }

    /// Runs the remaining eight scorers for a screened pair. Dimensions with no data on
    /// either side, or degraded by a soft knockout, are left out of `subscores`.
    pub fn complete(
        &self,
        requirement: &AssignmentRequirement,
        profile: &CandidateProfile,
        screening: Screening,
    ) -> PairEvaluation {
        let Screening { skills, knockout } = screening;

        let mut subscores = Subscores::new();
        subscores.insert(
            Dimension::Values,
            score_values(&profile.values_tags, &requirement.values_required),
        );
        subscores.insert(
            Dimension::Causes,
            score_causes(&profile.cause_tags, &requirement.cause_tags),
        );
        subscores.insert(Dimension::Skills, skills.score);
        subscores.insert(
            Dimension::Experience,
            score_experience(
                average_months_experience(&profile.skills),
                &self.config.experience_curve,
            ),
        );
        subscores.insert(
            Dimension::Verifications,
            score_verifications(&requirement.verification_gates, &profile.verified),
        );

        if !knockout.is_degraded(Dimension::Availability) {
            let constrained = requirement.start_window.is_some() || requirement.hours.is_some();
            if let (true, Some(availability)) = (constrained, &profile.availability) {
                subscores.insert(
                    Dimension::Availability,
                    score_availability(
                        requirement.start_window.as_ref(),
                        Some(availability.earliest),
                        requirement.hours.as_ref(),
                        Some(&availability.hours),
                    ),
                );
            }
        }

        if !knockout.is_degraded(Dimension::Location) {
            if let (Some(assignment_mode), Some(candidate_mode)) =
                (requirement.location_mode, profile.work_mode)
            {
                let evaluation = evaluate_location(
                    assignment_mode,
                    candidate_mode,
                    requirement.country.as_deref(),
                    profile.country.as_deref(),
                    &self.config.location,
                );
                tracing::trace!(
                    assignment_id = %requirement.id,
                    candidate_id = %profile.id,
                    details = %evaluation.details,
                    "location evaluated"
                );
                subscores.insert(Dimension::Location, evaluation.score);
            }
        }

        if !knockout.is_degraded(Dimension::Compensation) {
            if let (Some(assignment), Some(candidate)) =
                (&requirement.compensation, &profile.compensation)
            {
                subscores.insert(
                    Dimension::Compensation,
                    score_compensation(assignment, candidate),
                );
            }
        }

        if let (false, Some(min)) = (
            knockout.is_degraded(Dimension::Language),
            &requirement.min_language,
        ) {
            subscores.insert(
                Dimension::Language,
                score_language(min, &profile.languages),
            );
        }

        PairEvaluation {
            skills,
            subscores,
            knockout,
        }
    }
}
