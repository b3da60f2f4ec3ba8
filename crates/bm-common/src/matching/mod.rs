pub mod availability;
pub mod compose;
pub mod firewall;
pub mod knockout;
pub mod location;
pub mod ordering;
pub mod pipeline;
pub mod scoring;
pub mod skills;
pub mod weights;

pub use compose::{compose, ComposedScore, UNCONSTRAINED_SCORE};
pub use firewall::{contains_disallowed_fields, scrub};
pub use ordering::{compare_matches, tie_breaker, Rankable};
pub use pipeline::{
    rank, MatchMode, MatchRecord, MatchingEngine, RankOptions, RankOutcome, RankSummary,
};
pub use scoring::{DimensionScorer, Screening, Subscores};
pub use skills::{score_skills, SkillGap, SkillScore};
pub use weights::{
    get_preset, normalize_weights, resolve_weights, Dimension, Preset, WeightOverrides,
    WeightVector,
};
