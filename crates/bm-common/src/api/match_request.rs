use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::AsRefStr;

use crate::{
    config::MatchingConfig,
    error::MatchError,
    matching::{
        weights::{Dimension, Preset, WeightOverrides},
        MatchMode, RankOptions,
    },
    AssignmentRequirement, CandidateProfile,
};

use super::pool::{read_pool, PoolIntake};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    CandidatesForAssignment,
    AssignmentsForCandidate,
}

/// Subject and pool, tagged by `direction`. The subject is read strictly; pool members
/// stay raw JSON until [`MatchSubject::candidate_pool`] / [`MatchSubject::assignment_pool`]
/// read them one by one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum MatchSubject {
    CandidatesForAssignment {
        assignment: AssignmentRequirement,
        #[serde(default)]
        candidates: Vec<Value>,
    },
    AssignmentsForCandidate {
        profile: CandidateProfile,
        #[serde(default)]
        assignments: Vec<Value>,
    },
}

impl MatchSubject {
    pub fn direction(&self) -> Direction {
        match self {
            MatchSubject::CandidatesForAssignment { .. } => Direction::CandidatesForAssignment,
            MatchSubject::AssignmentsForCandidate { .. } => Direction::AssignmentsForCandidate,
        }
    }

    pub fn candidate_pool(candidates: &[Value]) -> PoolIntake<CandidateProfile> {
        read_pool(candidates)
    }

    pub fn assignment_pool(assignments: &[Value]) -> PoolIntake<AssignmentRequirement> {
        read_pool(assignments)
    }
}

/// JSON match request accepted by the CLI and any embedding service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(flatten)]
    pub subject: MatchSubject,
    /// Raw weights keyed by dimension name; any non-negative scale.
    #[serde(default)]
    pub weights: Option<BTreeMap<String, f64>>,
    /// Preset key: `mission-first`, `skills-first` or `balanced`.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default)]
    pub near_matches: bool,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

impl MatchRequest {
    pub fn weight_overrides(&self) -> Result<Option<WeightOverrides>, MatchError> {
        self.weights
            .as_ref()
            .map(|raw| {
                raw.iter()
                    .map(|(key, value)| Ok::<_, MatchError>((key.parse::<Dimension>()?, *value)))
                    .collect::<Result<WeightOverrides, MatchError>>()
            })
            .transpose()
    }

    pub fn preset(&self) -> Result<Option<Preset>, MatchError> {
        self.mode.as_deref().map(str::parse::<Preset>).transpose()
    }

    /// Fills unset fields from `config`. Range checks happen in the engine.
    pub fn rank_options(&self, config: &MatchingConfig) -> Result<RankOptions, MatchError> {
        let mode = match (self.near_matches, self.threshold) {
            (true, threshold) => MatchMode::Near {
                threshold: threshold.unwrap_or(config.near_match_threshold),
            },
            (false, Some(threshold)) => {
                return Err(MatchError::ThresholdWithoutNearMatches(threshold))
            }
            (false, None) => MatchMode::Strict,
        };

        Ok(RankOptions {
            k: self.k.unwrap_or(config.default_limit),
            mode,
            min_score: self.min_score,
        })
    }
}
