use std::{collections::BTreeMap, time::Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    compose::compose,
    firewall,
    ordering::{compare_matches, tie_breaker, Rankable},
    scoring::{DimensionScorer, PairEvaluation},
    skills::SkillGap,
    weights::{resolve_weights, Dimension, Preset, WeightOverrides, WeightVector},
};
use crate::{
    config::MatchingConfig, error::MatchError, AssignmentRequirement, CandidateProfile, SkillId,
};

/// Below this a subscore is named as the reason for a near match.
const NEAR_MATCH_WEAK_SUBSCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchMode {
    /// Hard-failed pairs are excluded.
    #[default]
    Strict,
    /// Hard-failed pairs are kept with a zero skills score; anything under `threshold` is dropped.
    Near { threshold: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOptions {
    pub k: usize,
    #[serde(default)]
    pub mode: MatchMode,
    /// Strict mode only: drop results scoring below this.
    #[serde(default)]
    pub min_score: Option<f64>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            k: 20,
            mode: MatchMode::Strict,
            min_score: None,
        }
    }
}

impl RankOptions {
    pub fn top(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn near(k: usize, threshold: f64) -> Self {
        Self {
            k,
            mode: MatchMode::Near { threshold },
            min_score: None,
        }
    }

    fn score_floor(&self) -> Option<f64> {
        match self.mode {
            MatchMode::Strict => self.min_score,
            MatchMode::Near { threshold } => Some(threshold),
        }
    }
}

/// One ranked counterparty. `projected_record` has passed through the firewall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub counterparty_id: String,
    pub score: f64,
    pub subscores: BTreeMap<Dimension, f64>,
    pub contributions: BTreeMap<Dimension, f64>,
    pub gaps: Vec<SkillGap>,
    pub missing: Vec<SkillId>,
    pub manual_review: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub near_match_reason: Option<String>,
    pub projected_record: Value,
    /// Pair hash from [`tie_breaker`]; serialized so re-read records keep their order.
    pub(crate) tie_break: u32,
}

impl Rankable for MatchRecord {
    fn score(&self) -> f64 {
        self.score
    }

    fn tie_break(&self) -> u32 {
        self.tie_break
    }

    fn counterparty_id(&self) -> &str {
        &self.counterparty_id
    }
}

/// Counters reported alongside a ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankSummary {
    pub pool_size: usize,
    /// Pool entries that could not be read; counted in `pool_size`.
    #[serde(default)]
    pub skipped: usize,
    pub hard_filtered: usize,
    pub below_threshold: usize,
    pub returned: usize,
    pub scored_in_parallel: bool,
    pub duration_ms: u64,
}

impl RankSummary {
    pub fn record_skipped(&mut self, skipped: usize) {
        self.skipped += skipped;
        self.pool_size += skipped;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOutcome {
    pub matches: Vec<MatchRecord>,
    pub summary: RankSummary,
}

enum PairOutcome {
    HardFiltered,
    Scored(MatchRecord),
}

fn near_match_reason(evaluation: &PairEvaluation) -> String {
    let skills = &evaluation.skills;
    let weak = |dimension: Dimension| {
        evaluation
            .subscores
            .get(&dimension)
            .is_some_and(|score| *score < NEAR_MATCH_WEAK_SUBSCORE)
    };

    if skills.hard_fail && !skills.missing.is_empty() {
        format!("Missing {} required skill(s)", skills.missing.len())
    } else if !skills.gaps.is_empty() {
        format!("Skill gaps in {} area(s)", skills.gaps.len())
    } else if weak(Dimension::Location) {
        "Location preference mismatch".into()
    } else if weak(Dimension::Availability) {
        "Availability timing mismatch".into()
    } else if weak(Dimension::Compensation) {
        "Compensation range mismatch".into()
    } else if weak(Dimension::Values) {
        "Some values alignment differences".into()
    } else {
        "Good partial match".into()
    }
}

/// Ranks a pool against one subject in either direction.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    scorer: DimensionScorer,
}

impl MatchingEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            scorer: DimensionScorer::new(config),
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        self.scorer.config()
    }

    /// Resolves weights with the configured default preset as the fallback.
    pub fn resolve_weights(
        &self,
        overrides: Option<&WeightOverrides>,
        preset: Option<Preset>,
    ) -> Result<WeightVector, MatchError> {
        resolve_weights(overrides, preset, self.config().default_preset)
    }

    /// Candidates for one assignment.
    pub fn rank_candidates(
        &self,
        requirement: &AssignmentRequirement,
        pool: &[CandidateProfile],
        weights: &WeightVector,
        options: &RankOptions,
    ) -> Result<RankOutcome, MatchError> {
        requirement.validate()?;
        self.validate_options(weights, options)?;

        let outcome = self.rank_pool(pool, options, |profile| {
            self.score_pair(requirement, profile, &profile.id, profile, weights, options)
        });

        tracing::info!(
            event = "match.assignment.computed",
            assignment_id = %requirement.id,
            pool_size = outcome.summary.pool_size,
            hard_filtered = outcome.summary.hard_filtered,
            below_threshold = outcome.summary.below_threshold,
            returned = outcome.summary.returned,
            parallel = outcome.summary.scored_in_parallel,
            duration_ms = outcome.summary.duration_ms,
            "ranked candidates"
        );
        Ok(outcome)
    }

    /// Assignments for one profile.
    pub fn rank_assignments(
        &self,
        profile: &CandidateProfile,
        pool: &[AssignmentRequirement],
        weights: &WeightVector,
        options: &RankOptions,
    ) -> Result<RankOutcome, MatchError> {
        profile.validate()?;
        self.validate_options(weights, options)?;

        let outcome = self.rank_pool(pool, options, |requirement| {
            self.score_pair(requirement, profile, &requirement.id, requirement, weights, options)
        });

        tracing::info!(
            event = "match.profile.computed",
            profile_id = %profile.id,
            pool_size = outcome.summary.pool_size,
            hard_filtered = outcome.summary.hard_filtered,
            below_threshold = outcome.summary.below_threshold,
            returned = outcome.summary.returned,
            parallel = outcome.summary.scored_in_parallel,
            duration_ms = outcome.summary.duration_ms,
            "ranked assignments"
        );
        Ok(outcome)
    }

    fn validate_options(&self, weights: &WeightVector, options: &RankOptions) -> Result<(), MatchError> {
        let max = self.config().max_limit;
        if options.k == 0 || options.k > max {
            return Err(MatchError::InvalidLimit { k: options.k, max });
        }

        let unit = |value: f64| value.is_finite() && (0.0..=1.0).contains(&value);
        if let MatchMode::Near { threshold } = options.mode {
            if !unit(threshold) {
                return Err(MatchError::InvalidThreshold(threshold));
            }
        }
        if let Some(min_score) = options.min_score {
            if !unit(min_score) {
                return Err(MatchError::InvalidThreshold(min_score));
            }
        }

        let sum = weights.sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Err(MatchError::NonPositiveWeightSum { sum });
        }
        Ok(())
    }

    /// Scores every member, then filters, sorts once and truncates.
    fn rank_pool<T, F>(&self, pool: &[T], options: &RankOptions, score: F) -> RankOutcome
    where
        T: Sync,
        F: Fn(&T) -> PairOutcome + Sync,
    {
        let started = Instant::now();
        let scored_in_parallel = pool.len() >= self.config().parallel_threshold.max(1);

        let outcomes: Vec<PairOutcome> = if scored_in_parallel {
            pool.par_iter().map(&score).collect()
        } else {
            pool.iter().map(&score).collect()
        };

        let floor = options.score_floor();
        let mut summary = RankSummary {
            pool_size: pool.len(),
            scored_in_parallel,
            ..RankSummary::default()
        };
        let mut matches = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            match outcome {
                PairOutcome::HardFiltered => summary.hard_filtered += 1,
                PairOutcome::Scored(record) if floor.is_some_and(|f| record.score < f) => {
                    summary.below_threshold += 1
                }
                PairOutcome::Scored(record) => matches.push(record),
            }
        }

        matches.sort_by(compare_matches);
        matches.truncate(options.k);

        summary.returned = matches.len();
        summary.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        RankOutcome { matches, summary }
    }

    fn score_pair<C: Serialize>(
        &self,
        requirement: &AssignmentRequirement,
        profile: &CandidateProfile,
        counterparty_id: &str,
        counterparty: &C,
        weights: &WeightVector,
        options: &RankOptions,
    ) -> PairOutcome {
        let screening = self.scorer.screen(requirement, profile);

        if screening.knockout.is_hard_knockout && options.mode == MatchMode::Strict {
            tracing::debug!(
                assignment_id = %requirement.id,
                candidate_id = %profile.id,
                missing = screening.skills.missing.len(),
                gaps = screening.skills.gaps.len(),
                "hard knockout"
            );
            return PairOutcome::HardFiltered;
        }

        let evaluation = self.scorer.complete(requirement, profile, screening);

        let composed = compose(&evaluation.subscores, weights);
        let near_match_reason = match options.mode {
            MatchMode::Near { .. } => Some(near_match_reason(&evaluation)),
            MatchMode::Strict => None,
        };

        tracing::debug!(
            assignment_id = %requirement.id,
            candidate_id = %profile.id,
            score = composed.total,
            manual_review = evaluation.knockout.needs_manual_review,
            "pair scored"
        );

        PairOutcome::Scored(MatchRecord {
            counterparty_id: counterparty_id.to_string(),
            score: composed.total,
            subscores: composed.subscores,
            contributions: composed.contributions,
            manual_review: evaluation.knockout.needs_manual_review,
            review_reasons: evaluation.knockout.manual_review_reasons(),
            gaps: evaluation.skills.gaps,
            missing: evaluation.skills.missing,
            near_match_reason,
            projected_record: firewall::project(counterparty),
            tie_break: tie_breaker(&requirement.id, &profile.id),
        })
    }
}

/// One-call form: strict top-`k` candidates for an assignment under default config.
pub fn rank(
    requirement: &AssignmentRequirement,
    pool: &[CandidateProfile],
    overrides: Option<&WeightOverrides>,
    preset: Option<Preset>,
    k: usize,
) -> Result<Vec<MatchRecord>, MatchError> {
    let engine = MatchingEngine::default();
    let weights = engine.resolve_weights(overrides, preset)?;
    engine
        .rank_candidates(requirement, pool, &weights, &RankOptions::top(k))
        .map(|outcome| outcome.matches)
}
