use serde::{Deserialize, Serialize};

use crate::matching::weights::Preset;

/// Saturating curve mapping months of experience onto `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExperienceCurve {
    /// `1 / (1 + e^(-steepness * (months - midpoint)))`
    Logistic { midpoint_months: f64, steepness: f64 },
    /// `months / (months + half_saturation)`
    Hyperbolic { half_saturation_months: f64 },
}

pub const DEFAULT_EXPERIENCE_MIDPOINT_MONTHS: f64 = 24.0;
pub const DEFAULT_EXPERIENCE_STEEPNESS: f64 = 0.08;
pub const DEFAULT_HALF_SATURATION_MONTHS: f64 = 24.0;

impl Default for ExperienceCurve {
    fn default() -> Self {
        ExperienceCurve::Logistic {
            midpoint_months: DEFAULT_EXPERIENCE_MIDPOINT_MONTHS,
            steepness: DEFAULT_EXPERIENCE_STEEPNESS,
        }
    }
}

impl ExperienceCurve {
    pub fn evaluate(&self, months: f64) -> f64 {
        if !months.is_finite() || months < 0.0 {
            return 0.0;
        }

        match *self {
            ExperienceCurve::Logistic {
                midpoint_months,
                steepness,
            } => 1.0 / (1.0 + (-steepness * (months - midpoint_months)).exp()),
            ExperienceCurve::Hyperbolic {
                half_saturation_months,
            } => {
                let denominator = months + half_saturation_months;
                if denominator <= 0.0 {
                    0.0
                } else {
                    months / denominator
                }
            }
        }
    }
}

/// Partial credit between non-identical work modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationCredits {
    /// onsite <-> hybrid
    pub hybrid_onsite: f64,
    /// remote <-> hybrid
    pub remote_partial: f64,
}

impl Default for LocationCredits {
    fn default() -> Self {
        Self {
            hybrid_onsite: 0.9,
            remote_partial: 0.5,
        }
    }
}

/// Engine tuning. Defaults are the production constants; `from_env` overlays `BM_*` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub experience_curve: ExperienceCurve,
    /// Share of the skills score carried by must-have skills; the rest goes to nice-to-have.
    pub skill_must_have_share: f64,
    pub location: LocationCredits,
    /// Pool size at which per-member scoring switches to the rayon pool.
    pub parallel_threshold: usize,
    pub near_match_threshold: f64,
    pub default_preset: Preset,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            experience_curve: ExperienceCurve::default(),
            skill_must_have_share: 0.75,
            location: LocationCredits::default(),
            parallel_threshold: 64,
            near_match_threshold: 0.3,
            default_preset: Preset::Balanced,
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl MatchingConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unparseable or out-of-range values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse_f64 = |key: &str| {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
        };
        let unit = |key: &str, fallback: f64| {
            parse_f64(key)
                .filter(|value| (0.0..=1.0).contains(value))
                .unwrap_or(fallback)
        };

        let experience_curve = match lookup("BM_EXPERIENCE_CURVE")
            .map(|raw| raw.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("hyperbolic") => ExperienceCurve::Hyperbolic {
                half_saturation_months: parse_f64("BM_EXPERIENCE_HALF_SATURATION_MONTHS")
                    .filter(|value| *value > 0.0)
                    .unwrap_or(DEFAULT_HALF_SATURATION_MONTHS),
            },
            _ => ExperienceCurve::Logistic {
                midpoint_months: parse_f64("BM_EXPERIENCE_MIDPOINT_MONTHS")
                    .filter(|value| *value >= 0.0)
                    .unwrap_or(DEFAULT_EXPERIENCE_MIDPOINT_MONTHS),
                steepness: parse_f64("BM_EXPERIENCE_STEEPNESS")
                    .filter(|value| *value > 0.0)
                    .unwrap_or(DEFAULT_EXPERIENCE_STEEPNESS),
            },
        };

        Self {
            experience_curve,
            skill_must_have_share: unit("BM_SKILL_MUST_HAVE_SHARE", defaults.skill_must_have_share),
            location: LocationCredits {
                hybrid_onsite: unit("BM_LOCATION_HYBRID_CREDIT", defaults.location.hybrid_onsite),
                remote_partial: unit(
                    "BM_LOCATION_REMOTE_PARTIAL_CREDIT",
                    defaults.location.remote_partial,
                ),
            },
            parallel_threshold: lookup("BM_PARALLEL_THRESHOLD")
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(defaults.parallel_threshold),
            near_match_threshold: unit("BM_NEAR_MATCH_THRESHOLD", defaults.near_match_threshold),
            default_preset: lookup("BM_DEFAULT_PRESET")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.default_preset),
            ..defaults
        }
    }
}
