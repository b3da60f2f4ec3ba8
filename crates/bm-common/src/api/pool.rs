use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    corrections::{cefr::correct_cefr, correct_work_mode},
    matching::weights::Dimension,
    AssignmentRequirement, CandidateProfile, IntakeIssues,
};

/// A pool entry that could not be read and was left out of the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMember {
    /// Position in the request's pool array.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct PoolIntake<T> {
    pub members: Vec<T>,
    pub skipped: Vec<SkippedMember>,
}

/// Record types that can appear in a ranked pool.
pub trait PoolMember: DeserializeOwned {
    const KIND: &'static str;

    /// Drops fields whose labels cannot be read, noting each under the dimension it feeds.
    fn repair(object: &mut Map<String, Value>, issues: &mut IntakeIssues);

    fn set_intake_issues(&mut self, issues: IntakeIssues);
}

impl PoolMember for CandidateProfile {
    const KIND: &'static str = "candidate";

    fn repair(object: &mut Map<String, Value>, issues: &mut IntakeIssues) {
        drop_unrecognised_work_mode(object, "work_mode", issues);
        drop_unrecognised_languages(object, issues);
    }

    fn set_intake_issues(&mut self, issues: IntakeIssues) {
        self.intake_issues = issues;
    }
}

impl PoolMember for AssignmentRequirement {
    const KIND: &'static str = "assignment";

    fn repair(object: &mut Map<String, Value>, issues: &mut IntakeIssues) {
        drop_unrecognised_work_mode(object, "location_mode", issues);
        drop_unrecognised_min_language(object, issues);
    }

    fn set_intake_issues(&mut self, issues: IntakeIssues) {
        self.intake_issues = issues;
    }
}

fn drop_unrecognised_work_mode(object: &mut Map<String, Value>, key: &str, issues: &mut IntakeIssues) {
    let recognised = match object.get(key) {
        None | Some(Value::Null) => return,
        Some(Value::String(label)) => correct_work_mode(label).is_some(),
        Some(_) => false,
    };

    if !recognised {
        object.remove(key);
        issues.insert(Dimension::Location, format!("{key}_unrecognised"));
    }
}

fn language_readable(entry: &Value) -> bool {
    entry.get("code").is_some_and(Value::is_string)
        && entry
            .get("level")
            .and_then(Value::as_str)
            .is_some_and(|level| correct_cefr(level).is_some())
}

fn drop_unrecognised_languages(object: &mut Map<String, Value>, issues: &mut IntakeIssues) {
    let dropped = match object.get_mut("languages") {
        None | Some(Value::Null) => false,
        Some(Value::Array(entries)) => {
            let before = entries.len();
            entries.retain(language_readable);
            entries.len() < before
        }
        Some(other) => {
            *other = Value::Array(Vec::new());
            true
        }
    };

    if dropped {
        issues.insert(Dimension::Language, "language_unrecognised".into());
    }
}

fn drop_unrecognised_min_language(object: &mut Map<String, Value>, issues: &mut IntakeIssues) {
    let readable = match object.get("min_language") {
        None | Some(Value::Null) => return,
        Some(entry) => language_readable(entry),
    };

    if !readable {
        object.remove("min_language");
        issues.insert(Dimension::Language, "min_language_unrecognised".into());
    }
}

fn has_usable_id(object: &Map<String, Value>) -> bool {
    object
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.trim().is_empty())
}

fn read_member<T: PoolMember>(value: &Value) -> Result<T, String> {
    let Value::Object(object) = value else {
        return Err("not a JSON object".into());
    };
    if !has_usable_id(object) {
        return Err("missing id".into());
    }

    let mut object = object.clone();
    let mut issues = IntakeIssues::new();
    T::repair(&mut object, &mut issues);

    let mut member: T =
        serde_json::from_value(Value::Object(object)).map_err(|err| err.to_string())?;
    member.set_intake_issues(issues);
    Ok(member)
}

/// Reads pool members one at a time. An unreadable label becomes an intake issue on the
/// member; a member with no id or an unreadable shape is skipped, never the whole pool.
pub fn read_pool<T: PoolMember>(raw: &[Value]) -> PoolIntake<T> {
    let mut members = Vec::with_capacity(raw.len());
    let mut skipped = Vec::new();

    for (index, value) in raw.iter().enumerate() {
        match read_member::<T>(value) {
            Ok(member) => members.push(member),
            Err(reason) => {
                tracing::warn!(index, kind = T::KIND, reason = %reason, "pool member skipped");
                skipped.push(SkippedMember { index, reason });
            }
        }
    }

    PoolIntake { members, skipped }
}
