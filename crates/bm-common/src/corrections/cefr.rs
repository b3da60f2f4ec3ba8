use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// CEFR proficiency, ordered A1 < A2 < B1 < B2 < C1 < C2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cefr {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

pub const CEFR_LEVELS: [Cefr; 6] = [Cefr::A1, Cefr::A2, Cefr::B1, Cefr::B2, Cefr::C1, Cefr::C2];

impl Cefr {
    /// 1-based position on the scale (A1 = 1, C2 = 6).
    pub fn rank(self) -> u8 {
        match self {
            Cefr::A1 => 1,
            Cefr::A2 => 2,
            Cefr::B1 => 3,
            Cefr::B2 => 4,
            Cefr::C1 => 5,
            Cefr::C2 => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cefr::A1 => "A1",
            Cefr::A2 => "A2",
            Cefr::B1 => "B1",
            Cefr::B2 => "B2",
            Cefr::C1 => "C1",
            Cefr::C2 => "C2",
        }
    }
}

impl fmt::Display for Cefr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cefr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        correct_cefr(s).ok_or_else(|| format!("unrecognised CEFR level: {s:?}"))
    }
}

impl TryFrom<String> for Cefr {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cefr> for String {
    fn from(value: Cefr) -> Self {
        value.as_str().to_string()
    }
}

/// Maps free-form proficiency labels onto the CEFR scale.
///
/// Accepts the canonical codes in any case ("b2", " C1 ") as well as the usual
/// descriptive labels profiles are filled in with ("upper intermediate", "native").
pub fn correct_cefr(input: &str) -> Option<Cefr> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    if let Some(level) = CEFR_LEVELS
        .iter()
        .copied()
        .find(|level| upper.starts_with(level.as_str()))
    {
        return Some(level);
    }

    let lower = trimmed.to_lowercase();

    if lower.contains("native") || lower.contains("mother tongue") || lower.contains("mastery") {
        return Some(Cefr::C2);
    }
    if lower.contains("fluent") || lower.contains("advanced") || lower.contains("proficient") {
        return Some(Cefr::C1);
    }
    if lower.contains("upper intermediate") || lower.contains("upper-intermediate") {
        return Some(Cefr::B2);
    }
    if lower.contains("elementary") || lower.contains("pre-intermediate") {
        return Some(Cefr::A2);
    }
    if lower.contains("intermediate") || lower.contains("conversational") {
        return Some(Cefr::B1);
    }
    if lower.contains("beginner") || lower.contains("basic") {
        return Some(Cefr::A1);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_codes_and_labels() {
        assert_eq!(correct_cefr("b2"), Some(Cefr::B2));
        assert_eq!(correct_cefr(" C1 "), Some(Cefr::C1));
        assert_eq!(correct_cefr("Native speaker"), Some(Cefr::C2));
        assert_eq!(correct_cefr("Upper intermediate"), Some(Cefr::B2));
        assert_eq!(correct_cefr("intermediate"), Some(Cefr::B1));
        assert_eq!(correct_cefr("Elementary"), Some(Cefr::A2));
        assert_eq!(correct_cefr("pre-intermediate"), Some(Cefr::A2));
        assert_eq!(correct_cefr("  "), None);
        assert_eq!(correct_cefr("Z9"), None);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Cefr::A1 < Cefr::A2);
        assert!(Cefr::B2 < Cefr::C1);
        assert_eq!(Cefr::C2.rank(), 6);
        assert!(CEFR_LEVELS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn serde_uses_canonical_codes() {
        let parsed: Cefr = serde_json::from_str("\"fluent\"").unwrap();
        assert_eq!(parsed, Cefr::C1);
        assert_eq!(serde_json::to_string(&Cefr::B1).unwrap(), "\"B1\"");
        assert!(serde_json::from_str::<Cefr>("\"X1\"").is_err());
    }
}
