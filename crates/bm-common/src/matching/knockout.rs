use serde::{Deserialize, Serialize};

use super::{skills::SkillScore, weights::Dimension};
use crate::{AssignmentRequirement, CandidateProfile};

/// Outcome of a single knockout check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KoDecision {
    /// Excluded from strict rankings, no further scoring needed.
    HardKo { reason: String },
    /// Scored, but the dimension falls back to the unconstrained default and the record is
    /// flagged for manual review.
    SoftKo { reason: String },
    Pass,
}

impl KoDecision {
    pub fn is_hard_ko(&self) -> bool {
        matches!(self, KoDecision::HardKo { .. })
    }

    pub fn is_soft_ko(&self) -> bool {
        matches!(self, KoDecision::SoftKo { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            KoDecision::HardKo { reason } | KoDecision::SoftKo { reason } => Some(reason),
            KoDecision::Pass => None,
        }
    }
}

/// All knockout decisions for one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct KnockoutResult {
    pub is_hard_knockout: bool,
    pub needs_manual_review: bool,
    pub decisions: Vec<(Dimension, KoDecision)>,
}

impl KnockoutResult {
    pub fn new(decisions: Vec<(Dimension, KoDecision)>) -> Self {
        let is_hard_knockout = decisions.iter().any(|(_, d)| d.is_hard_ko());
        let needs_manual_review = decisions.iter().any(|(_, d)| d.is_soft_ko());

        Self {
            is_hard_knockout,
            needs_manual_review,
            decisions,
        }
    }

    /// Whether `dimension` must be scored as unconstrained.
    pub fn is_degraded(&self, dimension: Dimension) -> bool {
        self.decisions
            .iter()
            .any(|(d, decision)| *d == dimension && decision.is_soft_ko())
    }

    /// `"<dimension>: <reason>"` for each soft knockout, in check order.
    pub fn manual_review_reasons(&self) -> Vec<String> {
        self.decisions
            .iter()
            .filter_map(|(dimension, decision)| match decision {
                KoDecision::SoftKo { reason } => Some(format!("{dimension}: {reason}")),
                _ => None,
            })
            .collect()
    }
}

/// Runs every knockout check for a requirement/profile pair.
pub fn run_knockout_checks(
    requirement: &AssignmentRequirement,
    profile: &CandidateProfile,
    skills: &SkillScore,
) -> KnockoutResult {
    let check = |dimension: Dimension,
                 fallback: fn(&AssignmentRequirement, &CandidateProfile) -> KoDecision| {
        let decision = intake_ko(requirement, profile, dimension)
            .unwrap_or_else(|| fallback(requirement, profile));
        (dimension, decision)
    };

    KnockoutResult::new(vec![
        (Dimension::Skills, check_skills_ko(skills)),
        check(Dimension::Availability, check_availability_ko),
        check(Dimension::Location, check_location_ko),
        check(Dimension::Compensation, check_compensation_ko),
        check(Dimension::Language, |_, _| KoDecision::Pass),
    ])
}

/// Whether the assignment places any requirement on `dimension`.
fn constrains(requirement: &AssignmentRequirement, dimension: Dimension) -> bool {
    match dimension {
        Dimension::Availability => {
            requirement.start_window.is_some() || requirement.hours.is_some()
        }
        Dimension::Location => requirement.location_mode.is_some(),
        Dimension::Compensation => requirement.compensation.is_some(),
        Dimension::Language => requirement.min_language.is_some(),
        _ => true,
    }
}

/// An unreadable field on the assignment always counts; on the profile only when the
/// assignment constrains that dimension.
fn intake_ko(
    requirement: &AssignmentRequirement,
    profile: &CandidateProfile,
    dimension: Dimension,
) -> Option<KoDecision> {
    let reason = requirement.intake_issues.get(&dimension).or_else(|| {
        constrains(requirement, dimension)
            .then(|| profile.intake_issues.get(&dimension))
            .flatten()
    })?;

    Some(KoDecision::SoftKo {
        reason: reason.clone(),
    })
}

fn check_skills_ko(skills: &SkillScore) -> KoDecision {
    if !skills.hard_fail {
        return KoDecision::Pass;
    }

    let mut parts = Vec::new();
    if !skills.missing.is_empty() {
        parts.push(format!("missing {}", skills.missing.join(", ")));
    }
    if !skills.gaps.is_empty() {
        let gaps: Vec<_> = skills
            .gaps
            .iter()
            .map(|gap| format!("{} {}<{}", gap.id, gap.have, gap.required))
            .collect();
        parts.push(format!("below level {}", gaps.join(", ")));
    }

    KoDecision::HardKo {
        reason: format!("required_skills: {}", parts.join("; ")),
    }
}

fn check_availability_ko(requirement: &AssignmentRequirement, profile: &CandidateProfile) -> KoDecision {
    if let Some(window) = &requirement.start_window {
        if window.earliest > window.latest {
            return KoDecision::SoftKo {
                reason: "start_window_inverted".into(),
            };
        }
    }
    if let Some(hours) = &requirement.hours {
        if !hours.is_valid() {
            return KoDecision::SoftKo {
                reason: "assignment_hours_inverted".into(),
            };
        }
    }

    let constrained = requirement.start_window.is_some() || requirement.hours.is_some();
    match &profile.availability {
        Some(availability) if !availability.hours.is_valid() => KoDecision::SoftKo {
            reason: "candidate_hours_inverted".into(),
        },
        None if constrained => KoDecision::SoftKo {
            reason: "availability_unknown".into(),
        },
        _ => KoDecision::Pass,
    }
}

fn check_location_ko(requirement: &AssignmentRequirement, profile: &CandidateProfile) -> KoDecision {
    match (requirement.location_mode, profile.work_mode) {
        (Some(_), None) => KoDecision::SoftKo {
            reason: "work_mode_unknown".into(),
        },
        _ => KoDecision::Pass,
    }
}

fn check_compensation_ko(
    requirement: &AssignmentRequirement,
    profile: &CandidateProfile,
) -> KoDecision {
    match (&requirement.compensation, &profile.compensation) {
        (Some(range), _) if !range.is_valid() => KoDecision::SoftKo {
            reason: "assignment_range_invalid".into(),
        },
        (_, Some(range)) if !range.is_valid() => KoDecision::SoftKo {
            reason: "candidate_range_invalid".into(),
        },
        (Some(_), None) => KoDecision::SoftKo {
            reason: "compensation_unknown".into(),
        },
        _ => KoDecision::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        matching::skills::{SkillGap, SkillScore},
        Availability, Bounds, Cefr, LanguageSkill, WorkMode,
    };
    use chrono::NaiveDate;

    fn passing_skills() -> SkillScore {
        SkillScore {
            score: 1.0,
            hard_fail: false,
            gaps: vec![],
            missing: vec![],
        }
    }

    #[test]
    fn hard_fail_skills_are_hard_ko() {
        let skills = SkillScore {
            score: 0.0,
            hard_fail: true,
            gaps: vec![SkillGap {
                id: "rust".into(),
                required: 3,
                have: 2,
            }],
            missing: vec!["sql".into()],
        };

        let result = run_knockout_checks(
            &AssignmentRequirement::default(),
            &CandidateProfile::default(),
            &skills,
        );
        assert!(result.is_hard_knockout);
        let reason = result.decisions[0].1.reason().unwrap();
        assert!(reason.contains("missing sql"));
        assert!(reason.contains("rust 2<3"));
    }

    #[test]
    fn unconstrained_pairs_pass() {
        let result = run_knockout_checks(
            &AssignmentRequirement::default(),
            &CandidateProfile::default(),
            &passing_skills(),
        );
        assert!(!result.is_hard_knockout);
        assert!(!result.needs_manual_review);
        assert!(result.manual_review_reasons().is_empty());
    }

    #[test]
    fn missing_and_malformed_data_are_soft_ko() {
        let requirement = AssignmentRequirement {
            location_mode: Some(WorkMode::Onsite),
            compensation: Some(Bounds::new(100.0, 150.0)),
            ..AssignmentRequirement::default()
        };
        let profile = CandidateProfile {
            availability: Some(Availability {
                earliest: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                hours: Bounds::new(40, 10),
            }),
            ..CandidateProfile::default()
        };

        let result = run_knockout_checks(&requirement, &profile, &passing_skills());
        assert!(!result.is_hard_knockout);
        assert!(result.needs_manual_review);
        assert!(result.is_degraded(Dimension::Availability));
        assert!(result.is_degraded(Dimension::Location));
        assert!(result.is_degraded(Dimension::Compensation));
        assert!(!result.is_degraded(Dimension::Skills));
        assert_eq!(
            result.manual_review_reasons(),
            vec![
                "availability: candidate_hours_inverted".to_string(),
                "location: work_mode_unknown".to_string(),
                "compensation: compensation_unknown".to_string(),
            ]
        );
    }

    #[test]
    fn intake_issues_degrade_constrained_dimensions_only() {
        let requirement = AssignmentRequirement {
            location_mode: Some(WorkMode::Remote),
            ..AssignmentRequirement::default()
        };
        let mut profile = CandidateProfile::default();
        profile
            .intake_issues
            .insert(Dimension::Location, "work_mode_unrecognised".into());
        profile
            .intake_issues
            .insert(Dimension::Language, "language_unrecognised".into());

        let result = run_knockout_checks(&requirement, &profile, &passing_skills());
        assert!(result.is_degraded(Dimension::Location));
        assert!(!result.is_degraded(Dimension::Language));
        assert_eq!(
            result.manual_review_reasons(),
            vec!["location: work_mode_unrecognised".to_string()]
        );

        let requirement = AssignmentRequirement {
            min_language: Some(LanguageSkill {
                code: "en".into(),
                level: Cefr::B1,
            }),
            ..requirement
        };
        let result = run_knockout_checks(&requirement, &profile, &passing_skills());
        assert!(result.is_degraded(Dimension::Language));
    }

    #[test]
    fn unreadable_assignment_fields_always_count() {
        let mut requirement = AssignmentRequirement::default();
        requirement
            .intake_issues
            .insert(Dimension::Language, "min_language_unrecognised".into());

        let result = run_knockout_checks(
            &requirement,
            &CandidateProfile::default(),
            &passing_skills(),
        );
        assert!(result.needs_manual_review);
        assert!(result.is_degraded(Dimension::Language));
    }
}
