use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::{
    scoring::Subscores,
    weights::{Dimension, WeightVector},
};

/// Score used for a dimension with no data on either side.
pub const UNCONSTRAINED_SCORE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedScore {
    pub total: f64,
    /// All nine dimensions, unconstrained ones filled in.
    pub subscores: BTreeMap<Dimension, f64>,
    pub contributions: BTreeMap<Dimension, f64>,
}

fn sanitize(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Weighted sum over every dimension in canonical order.
pub fn compose(subscores: &Subscores, weights: &WeightVector) -> ComposedScore {
    let mut filled = BTreeMap::new();
    let mut contributions = BTreeMap::new();
    let mut total = 0.0;

    for dimension in Dimension::iter() {
        let score = subscores
            .get(&dimension)
            .copied()
            .map(sanitize)
            .unwrap_or(UNCONSTRAINED_SCORE);
        let contribution = weights.get(dimension) * score;

        total += contribution;
        filled.insert(dimension, score);
        contributions.insert(dimension, contribution);
    }

    ComposedScore {
        total,
        subscores: filled,
        contributions,
    }
}
