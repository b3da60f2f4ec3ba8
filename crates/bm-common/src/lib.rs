pub mod api;
pub mod config;
pub mod corrections;
pub mod error;
pub mod logging;
pub mod matching;
pub mod run_id;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::AsRefStr;

pub use corrections::cefr::Cefr;
pub use error::MatchError;

use matching::weights::Dimension;

pub type SkillId = String;
pub type GateId = String;

/// Unreadable fields of a pool member, keyed by the dimension they would have fed.
pub type IntakeIssues = BTreeMap<Dimension, String>;

/// Highest skill level on the 0..=5 scale.
pub const MAX_SKILL_LEVEL: u8 = 5;

// Commonly used data models for matching functions.

/// Inclusive numeric interval (hours per week, compensation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T>
where
    T: Copy + PartialOrd + Into<f64>,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// `min <= max` and both ends are real numbers.
    pub fn is_valid(&self) -> bool {
        let (min, max): (f64, f64) = (self.min.into(), self.max.into());
        min.is_finite() && max.is_finite() && min <= max
    }

    /// Length of the intersection, `None` when the intervals are disjoint.
    pub fn overlap(&self, other: &Self) -> Option<f64> {
        let low = f64::max(self.min.into(), other.min.into());
        let high = f64::min(self.max.into(), other.max.into());
        (low <= high).then_some(high - low)
    }

    /// Length of the smallest interval covering both.
    pub fn union_len(&self, other: &Self) -> f64 {
        let low = f64::min(self.min.into(), other.min.into());
        let high = f64::max(self.max.into(), other.max.into());
        high - low
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case", try_from = "String")]
#[strum(serialize_all = "snake_case")]
pub enum WorkMode {
    Remote,
    Onsite,
    Hybrid,
}

impl TryFrom<String> for WorkMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        corrections::correct_work_mode(&value)
            .ok_or_else(|| format!("unrecognised work mode: {value:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProficiency {
    pub level: u8,
    #[serde(default)]
    pub months_experience: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub id: SkillId,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub code: String,
    pub level: Cefr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.earliest <= date && date <= self.latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub earliest: NaiveDate,
    pub hours: Bounds<u32>,
}

/// A person looking for assignments.
///
/// Scored fields are typed; everything else on the incoming record (display name,
/// headline, photo, ...) lands in `attributes` and only leaves the engine through the
/// firewall. `intake_issues` names fields dropped while reading a pool member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: String,
    #[serde(default)]
    pub skills: BTreeMap<SkillId, SkillProficiency>,
    #[serde(default)]
    pub values_tags: BTreeSet<String>,
    #[serde(default)]
    pub cause_tags: BTreeSet<String>,
    #[serde(default)]
    pub availability: Option<Availability>,
    #[serde(default)]
    pub work_mode: Option<WorkMode>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub compensation: Option<Bounds<f64>>,
    #[serde(default)]
    pub languages: Vec<LanguageSkill>,
    #[serde(default)]
    pub verified: BTreeMap<GateId, bool>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    #[serde(skip)]
    pub intake_issues: IntakeIssues,
}

/// A posted need, as seen by the matching engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRequirement {
    pub id: String,
    #[serde(default)]
    pub must_have_skills: Vec<SkillRequirement>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<SkillRequirement>,
    #[serde(default)]
    pub values_required: BTreeSet<String>,
    #[serde(default)]
    pub cause_tags: BTreeSet<String>,
    #[serde(default)]
    pub verification_gates: BTreeSet<GateId>,
    #[serde(default)]
    pub start_window: Option<DateWindow>,
    #[serde(default)]
    pub hours: Option<Bounds<u32>>,
    #[serde(default)]
    pub location_mode: Option<WorkMode>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub compensation: Option<Bounds<f64>>,
    #[serde(default)]
    pub min_language: Option<LanguageSkill>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    #[serde(skip)]
    pub intake_issues: IntakeIssues,
}

impl AssignmentRequirement {
    /// Strict shape check for an assignment the caller ranks a pool against.
    pub fn validate(&self) -> Result<(), MatchError> {
        let invalid = |field: &str, reason: String| MatchError::InvalidRequirement {
            field: field.to_string(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id", "must not be empty".into()));
        }

        for (field, skills) in [
            ("must_have_skills", &self.must_have_skills),
            ("nice_to_have_skills", &self.nice_to_have_skills),
        ] {
            for skill in skills {
                if skill.id.trim().is_empty() {
                    return Err(invalid(field, "skill id must not be empty".into()));
                }
                if skill.level > MAX_SKILL_LEVEL {
                    return Err(invalid(
                        field,
                        format!(
                            "level {} for {} exceeds {}",
                            skill.level, skill.id, MAX_SKILL_LEVEL
                        ),
                    ));
                }
            }
        }

        if let Some(window) = &self.start_window {
            if window.earliest > window.latest {
                return Err(invalid(
                    "start_window",
                    format!("earliest {} is after latest {}", window.earliest, window.latest),
                ));
            }
        }

        if let Some(hours) = &self.hours {
            if !hours.is_valid() {
                return Err(invalid(
                    "hours",
                    format!("min {} is greater than max {}", hours.min, hours.max),
                ));
            }
        }

        if let Some(compensation) = &self.compensation {
            if !compensation.is_valid() {
                return Err(invalid(
                    "compensation",
                    format!(
                        "expected finite min <= max, got {}..{}",
                        compensation.min, compensation.max
                    ),
                ));
            }
        }

        Ok(())
    }
}

impl CandidateProfile {
    /// Strict shape check for a profile the caller ranks assignments against.
    pub fn validate(&self) -> Result<(), MatchError> {
        let invalid = |field: &str, reason: String| MatchError::InvalidProfile {
            field: field.to_string(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id", "must not be empty".into()));
        }

        if let Some((id, skill)) = self
            .skills
            .iter()
            .find(|(_, skill)| skill.level > MAX_SKILL_LEVEL)
        {
            return Err(invalid(
                "skills",
                format!("level {} for {} exceeds {}", skill.level, id, MAX_SKILL_LEVEL),
            ));
        }

        if let Some(availability) = &self.availability {
            if !availability.hours.is_valid() {
                return Err(invalid(
                    "availability.hours",
                    format!(
                        "min {} is greater than max {}",
                        availability.hours.min, availability.hours.max
                    ),
                ));
            }
        }

        if let Some(compensation) = &self.compensation {
            if !compensation.is_valid() {
                return Err(invalid(
                    "compensation",
                    format!(
                        "expected finite min <= max, got {}..{}",
                        compensation.min, compensation.max
                    ),
                ));
            }
        }

        Ok(())
    }
}
