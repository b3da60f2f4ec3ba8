//! Attribute firewall.
//!
//! Strips identity-revealing keys from any JSON value before it leaves the engine. The
//! check is purely key based and applies at every depth, including objects nested in
//! arrays. Values are never inspected.

use serde::Serialize;
use serde_json::{Map, Value};

/// Keys removed at every depth. Each field is listed in camelCase and snake_case.
pub const DISALLOWED_FIELDS: &[&str] = &[
    // person identity
    "name",
    "displayName",
    "display_name",
    "photo",
    "avatarUrl",
    "avatar_url",
    "age",
    "gender",
    "school",
    "institution",
    "ethnicity",
    "religion",
    "maritalStatus",
    "marital_status",
    "exact_birthday",
    "exactBirthday",
    "birthdate",
    "email",
    "phone",
    "address",
    "handle",
    "linkedIn",
    "linked_in",
    "twitter",
    "socialMedia",
    "social_media",
    // organization identity
    "orgName",
    "org_name",
    "legalName",
    "legal_name",
    "employerName",
    "employer_name",
];

pub fn is_disallowed(key: &str) -> bool {
    DISALLOWED_FIELDS.contains(&key)
}

/// Returns a copy of `value` without any disallowed key. The input is left untouched.
pub fn scrub(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !is_disallowed(key))
                .map(|(key, nested)| (key.clone(), scrub(nested)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(scrub).collect()),
        primitive => primitive.clone(),
    }
}

/// `true` when a disallowed key appears anywhere in `value`.
pub fn contains_disallowed_fields(value: &Value) -> bool {
    match value {
        Value::Object(map) => map
            .iter()
            .any(|(key, nested)| is_disallowed(key) || contains_disallowed_fields(nested)),
        Value::Array(items) => items.iter().any(contains_disallowed_fields),
        _ => false,
    }
}

/// Serializes a typed record and scrubs it.
///
/// A record that cannot be represented as JSON projects to `null` rather than leaking a
/// partial value.
pub fn project<T: Serialize>(record: &T) -> Value {
    match serde_json::to_value(record) {
        Ok(value) => scrub(&value),
        Err(err) => {
            tracing::warn!(error = %err, "record projection failed; emitting null");
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn removes_nested_identity_fields() {
        let input = json!({
            "name": "X",
            "skills": {"rust": 4},
            "refs": [{"email": "a@b", "role": "lead"}]
        });

        let scrubbed = scrub(&input);
        assert_eq!(
            scrubbed,
            json!({"skills": {"rust": 4}, "refs": [{"role": "lead"}]})
        );
        assert!(contains_disallowed_fields(&input));
        assert!(!contains_disallowed_fields(&scrubbed));
        assert_eq!(input["name"], "X");
    }

    #[test]
    fn accepts_both_spellings() {
        let input = json!({
            "displayName": "a",
            "display_name": "b",
            "orgName": "c",
            "employer_name": "d",
            "headline": "kept"
        });
        assert_eq!(scrub(&input), json!({"headline": "kept"}));
    }

    #[test]
    fn primitives_pass_through() {
        for value in [json!(null), json!(3), json!("email"), json!(true)] {
            assert_eq!(scrub(&value), value);
            assert!(!contains_disallowed_fields(&value));
        }
    }

    #[test]
    fn scrub_is_idempotent() {
        let input = json!({"a": [{"photo": 1, "b": {"phone": 2, "c": 3}}]});
        let once = scrub(&input);
        assert_eq!(scrub(&once), once);
    }

    #[test]
    fn projects_typed_records() {
        #[derive(Serialize)]
        struct Card {
            id: &'static str,
            legal_name: &'static str,
            mission: &'static str,
        }

        let projected = project(&Card {
            id: "org-1",
            legal_name: "Acme",
            mission: "clean water",
        });
        assert_eq!(projected, json!({"id": "org-1", "mission": "clean water"}));
    }
}
