use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{match_request::Direction, pool::SkippedMember};
use crate::matching::{
    weights::{Dimension, WeightVector},
    MatchMode, MatchRecord, RankOptions, RankOutcome,
};

/// Ranked items plus the run metadata callers report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub items: Vec<MatchRecord>,
    pub meta: MatchMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMeta {
    pub match_run_id: String,
    pub direction: Direction,
    pub pool_size: usize,
    pub skipped: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_members: Vec<SkippedMember>,
    pub hard_filtered: usize,
    pub below_threshold: usize,
    pub returned: usize,
    /// Resolved weights, summing to 1.
    pub weights: BTreeMap<Dimension, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub duration_ms: u64,
    pub message: String,
}

fn message(mode: MatchMode, returned: usize) -> &'static str {
    match (mode, returned) {
        (MatchMode::Near { .. }, 0) => {
            "No near matches found. Try adjusting your matching profile or reducing requirements."
        }
        (MatchMode::Near { .. }, _) => {
            "Near matches found. These are not perfect fits but might be worth exploring."
        }
        (MatchMode::Strict, 0) => "No matches found.",
        (MatchMode::Strict, _) => "Matches found.",
    }
}

impl MatchResponse {
    pub fn from_outcome(
        match_run_id: impl Into<String>,
        direction: Direction,
        weights: &WeightVector,
        options: &RankOptions,
        outcome: RankOutcome,
    ) -> Self {
        let summary = outcome.summary;
        let threshold = match options.mode {
            MatchMode::Near { threshold } => Some(threshold),
            MatchMode::Strict => options.min_score,
        };

        Self {
            meta: MatchMeta {
                match_run_id: match_run_id.into(),
                direction,
                pool_size: summary.pool_size,
                skipped: summary.skipped,
                skipped_members: Vec::new(),
                hard_filtered: summary.hard_filtered,
                below_threshold: summary.below_threshold,
                returned: summary.returned,
                weights: weights.to_map(),
                threshold,
                duration_ms: summary.duration_ms,
                message: message(options.mode, summary.returned).to_string(),
            },
            items: outcome.matches,
        }
    }

    pub fn with_skipped(mut self, skipped: Vec<SkippedMember>) -> Self {
        self.meta.skipped_members = skipped;
        self
    }
}
