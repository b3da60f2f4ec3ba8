use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{SkillId, SkillProficiency, SkillRequirement};

/// Share of the skills score carried by must-have skills when no config is supplied.
pub const DEFAULT_MUST_HAVE_SHARE: f64 = 0.75;

/// A required skill the candidate holds below the required level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub id: SkillId,
    pub required: u8,
    pub have: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub score: f64,
    /// A must-have skill is absent or under-levelled.
    pub hard_fail: bool,
    pub gaps: Vec<SkillGap>,
    pub missing: Vec<SkillId>,
}

#[derive(Debug, Default)]
struct Tally {
    met: usize,
    total: usize,
}

impl Tally {
    fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.met as f64 / self.total as f64
        }
    }
}

fn tally(
    requirements: &[SkillRequirement],
    have: &BTreeMap<SkillId, SkillProficiency>,
    gaps: &mut Vec<SkillGap>,
    missing: &mut Vec<SkillId>,
) -> Tally {
    let mut result = Tally {
        met: 0,
        total: requirements.len(),
    };

    for requirement in requirements {
        match have.get(&requirement.id) {
            None => missing.push(requirement.id.clone()),
            Some(proficiency) if proficiency.level < requirement.level => gaps.push(SkillGap {
                id: requirement.id.clone(),
                required: requirement.level,
                have: proficiency.level,
            }),
            Some(_) => result.met += 1,
        }
    }

    result
}

/// Scores must-have and nice-to-have requirements with the default 75/25 blend.
pub fn score_skills(
    must: &[SkillRequirement],
    nice: &[SkillRequirement],
    have: &BTreeMap<SkillId, SkillProficiency>,
) -> SkillScore {
    score_skills_with_share(must, nice, have, DEFAULT_MUST_HAVE_SHARE)
}

/// Any unmet must-have sets `hard_fail` and forces the score to 0. Nice-to-have shortfalls
/// are reported the same way but only lower the score.
pub fn score_skills_with_share(
    must: &[SkillRequirement],
    nice: &[SkillRequirement],
    have: &BTreeMap<SkillId, SkillProficiency>,
    must_have_share: f64,
) -> SkillScore {
    let mut gaps = Vec::new();
    let mut missing = Vec::new();

    let must_tally = tally(must, have, &mut gaps, &mut missing);
    let hard_fail = must_tally.met < must_tally.total;
    let nice_tally = tally(nice, have, &mut gaps, &mut missing);

    let score = if hard_fail {
        0.0
    } else {
        let share = must_have_share.clamp(0.0, 1.0);
        share * must_tally.fraction() + (1.0 - share) * nice_tally.fraction()
    };

    SkillScore {
        score,
        hard_fail,
        gaps,
        missing,
    }
}

/// Mean `months_experience` over the candidate's skills, 0 for an empty map.
pub fn average_months_experience(have: &BTreeMap<SkillId, SkillProficiency>) -> f64 {
    if have.is_empty() {
        return 0.0;
    }

    let total: f64 = have
        .values()
        .map(|proficiency| f64::from(proficiency.months_experience))
        .sum();
    total / have.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: &str, level: u8) -> SkillRequirement {
        SkillRequirement {
            id: id.into(),
            level,
        }
    }

    fn have(entries: &[(&str, u8, u32)]) -> BTreeMap<SkillId, SkillProficiency> {
        entries
            .iter()
            .map(|(id, level, months)| {
                (
                    id.to_string(),
                    SkillProficiency {
                        level: *level,
                        months_experience: *months,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn all_met_scores_one() {
        let result = score_skills(
            &[req("rust", 3)],
            &[req("sql", 2)],
            &have(&[("rust", 4, 36), ("sql", 2, 12)]),
        );
        assert_eq!(result.score, 1.0);
        assert!(!result.hard_fail);
        assert!(result.gaps.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn missing_must_have_is_hard_fail() {
        let result = score_skills(&[req("rust", 3)], &[], &have(&[("go", 5, 60)]));
        assert!(result.hard_fail);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.missing, vec!["rust".to_string()]);
    }

    #[test]
    fn under_levelled_must_have_is_a_gap() {
        let result = score_skills(&[req("rust", 4)], &[], &have(&[("rust", 2, 10)]));
        assert!(result.hard_fail);
        assert_eq!(
            result.gaps,
            vec![SkillGap {
                id: "rust".into(),
                required: 4,
                have: 2
            }]
        );
        assert!(result.missing.is_empty());
    }

    #[test]
    fn nice_to_have_shortfall_lowers_score_only() {
        let result = score_skills(
            &[req("rust", 3)],
            &[req("k8s", 2), req("sql", 3)],
            &have(&[("rust", 3, 24), ("sql", 1, 6)]),
        );
        assert!(!result.hard_fail);
        assert!((result.score - 0.75).abs() < 1e-12);
        assert_eq!(result.missing, vec!["k8s".to_string()]);
        assert_eq!(result.gaps.len(), 1);
    }

    #[test]
    fn empty_requirements_are_fully_met() {
        let result = score_skills(&[], &[], &BTreeMap::new());
        assert_eq!(result.score, 1.0);
        assert!(!result.hard_fail);
    }

    #[test]
    fn share_shifts_the_blend() {
        let result = score_skills_with_share(
            &[],
            &[req("sql", 1)],
            &BTreeMap::new(),
            0.5,
        );
        assert!((result.score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn averages_months() {
        assert_eq!(average_months_experience(&BTreeMap::new()), 0.0);
        assert_eq!(
            average_months_experience(&have(&[("a", 1, 10), ("b", 1, 30)])),
            20.0
        );
    }
}
