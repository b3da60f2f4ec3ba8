use std::{collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

use crate::error::MatchError;

/// Scoring dimensions in canonical order. Every per-dimension map is keyed by this
/// enum so iteration and serialization order never depend on insertion order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    Values,
    Causes,
    Skills,
    Experience,
    Verifications,
    Availability,
    Location,
    Compensation,
    Language,
}

impl FromStr for Dimension {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Dimension::iter()
            .find(|dimension| dimension.as_ref().eq_ignore_ascii_case(key))
            .ok_or_else(|| MatchError::UnknownDimension(s.to_string()))
    }
}

/// Caller-supplied raw weights, any non-negative scale.
pub type WeightOverrides = BTreeMap<Dimension, f64>;

/// Resolved weights. Produced by [`normalize_weights`] or a [`Preset`], always summing to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub values: f64,
    pub causes: f64,
    pub skills: f64,
    pub experience: f64,
    pub verifications: f64,
    pub availability: f64,
    pub location: f64,
    pub compensation: f64,
    pub language: f64,
}

/// Mission and values dominate; technical fit is secondary.
pub const MISSION_FIRST_WEIGHTS: WeightVector = WeightVector {
    values: 0.35,
    causes: 0.25,
    skills: 0.20,
    experience: 0.10,
    verifications: 0.03,
    availability: 0.02,
    location: 0.02,
    compensation: 0.02,
    language: 0.01,
};

/// Technical fit dominates: skills and depth of experience.
pub const SKILLS_FIRST_WEIGHTS: WeightVector = WeightVector {
    values: 0.10,
    causes: 0.05,
    skills: 0.40,
    experience: 0.25,
    verifications: 0.08,
    availability: 0.05,
    location: 0.03,
    compensation: 0.02,
    language: 0.02,
};

/// Default blend. Also the source of default shares for partial overrides.
pub const BALANCED_WEIGHTS: WeightVector = WeightVector {
    values: 0.20,
    causes: 0.15,
    skills: 0.25,
    experience: 0.15,
    verifications: 0.08,
    availability: 0.07,
    location: 0.05,
    compensation: 0.03,
    language: 0.02,
};

const SUM_TOLERANCE: f64 = 1e-9;

impl WeightVector {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Values => self.values,
            Dimension::Causes => self.causes,
            Dimension::Skills => self.skills,
            Dimension::Experience => self.experience,
            Dimension::Verifications => self.verifications,
            Dimension::Availability => self.availability,
            Dimension::Location => self.location,
            Dimension::Compensation => self.compensation,
            Dimension::Language => self.language,
        }
    }

    fn slot_mut(&mut self, dimension: Dimension) -> &mut f64 {
        match dimension {
            Dimension::Values => &mut self.values,
            Dimension::Causes => &mut self.causes,
            Dimension::Skills => &mut self.skills,
            Dimension::Experience => &mut self.experience,
            Dimension::Verifications => &mut self.verifications,
            Dimension::Availability => &mut self.availability,
            Dimension::Location => &mut self.location,
            Dimension::Compensation => &mut self.compensation,
            Dimension::Language => &mut self.language,
        }
    }

    pub fn sum(&self) -> f64 {
        Dimension::iter().map(|dimension| self.get(dimension)).sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < SUM_TOLERANCE
    }

    pub fn to_map(&self) -> BTreeMap<Dimension, f64> {
        Dimension::iter()
            .map(|dimension| (dimension, self.get(dimension)))
            .collect()
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        BALANCED_WEIGHTS
    }
}

/// Named weight presets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, AsRefStr, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Preset {
    MissionFirst,
    SkillsFirst,
    #[default]
    Balanced,
}

impl Preset {
    pub fn weights(self) -> WeightVector {
        match self {
            Preset::MissionFirst => MISSION_FIRST_WEIGHTS,
            Preset::SkillsFirst => SKILLS_FIRST_WEIGHTS,
            Preset::Balanced => BALANCED_WEIGHTS,
        }
    }
}

impl FromStr for Preset {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Preset::iter()
            .find(|preset| preset.as_ref().eq_ignore_ascii_case(key))
            .ok_or_else(|| MatchError::UnknownPreset(s.to_string()))
    }
}

/// Preset lookup by key (`mission-first`, `skills-first`, `balanced`).
pub fn get_preset(key: &str) -> Result<WeightVector, MatchError> {
    key.parse::<Preset>().map(Preset::weights)
}

/// Normalizes an override map so the nine weights sum to 1.
///
/// Dimensions missing from `overrides` take their balanced-preset share before the
/// division. Negative or non-finite weights are rejected, and so is a map whose total
/// is not positive; the caller falls back to a preset in that case.
pub fn normalize_weights(overrides: &WeightOverrides) -> Result<WeightVector, MatchError> {
    let mut raw = BALANCED_WEIGHTS;

    for (&dimension, &value) in overrides {
        if !value.is_finite() || value < 0.0 {
            return Err(MatchError::InvalidWeight { dimension, value });
        }
        *raw.slot_mut(dimension) = value;
    }

    let sum = raw.sum();
    if sum <= 0.0 {
        return Err(MatchError::NonPositiveWeightSum { sum });
    }

    let mut normalized = raw;
    for dimension in Dimension::iter() {
        *normalized.slot_mut(dimension) = raw.get(dimension) / sum;
    }

    Ok(normalized)
}

/// Explicit overrides win, then the named preset, then `fallback`.
pub fn resolve_weights(
    overrides: Option<&WeightOverrides>,
    preset: Option<Preset>,
    fallback: Preset,
) -> Result<WeightVector, MatchError> {
    match (overrides, preset) {
        (Some(overrides), _) if !overrides.is_empty() => normalize_weights(overrides),
        (_, Some(preset)) => Ok(preset.weights()),
        _ => Ok(fallback.weights()),
    }
}
