use bm_common::matching::{
    compose, contains_disallowed_fields, firewall::DISALLOWED_FIELDS, normalize_weights, scrub,
    Dimension, Subscores, WeightOverrides,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use strum::IntoEnumIterator;

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_]{1,12}",
        proptest::sample::select(DISALLOWED_FIELDS).prop_map(str::to_string),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(arb_key(), inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn arb_overrides() -> impl Strategy<Value = WeightOverrides> {
    prop::collection::vec(proptest::option::of(0.0f64..100.0), 9).prop_map(|values| {
        Dimension::iter()
            .zip(values)
            .filter_map(|(dimension, value)| value.map(|v| (dimension, v)))
            .collect()
    })
}

// ── Firewall: no disallowed key survives, scrub is idempotent and non-mutating ──

proptest! {
    #[test]
    fn scrubbed_output_has_no_disallowed_keys(value in arb_json()) {
        let scrubbed = scrub(&value);
        prop_assert!(!contains_disallowed_fields(&scrubbed));
    }

    #[test]
    fn scrub_is_idempotent(value in arb_json()) {
        let once = scrub(&value);
        prop_assert_eq!(scrub(&once), once);
    }

    #[test]
    fn scrub_leaves_input_untouched(value in arb_json()) {
        let before = value.clone();
        let _ = scrub(&value);
        prop_assert_eq!(value, before);
    }
}

// ── Weights: normalized vectors sum to one ──

proptest! {
    #[test]
    fn normalized_weights_sum_to_one(overrides in arb_overrides()) {
        match normalize_weights(&overrides) {
            Ok(weights) => prop_assert!((weights.sum() - 1.0).abs() < 1e-9),
            // Only an all-zero explicit map over all nine dimensions can fail.
            Err(_) => prop_assert!(
                overrides.len() == 9 && overrides.values().all(|v| *v == 0.0)
            ),
        }
    }

    #[test]
    fn composition_conserves_contributions(
        overrides in arb_overrides(),
        scores in prop::collection::vec(proptest::option::of(0.0f64..=1.0), 9),
    ) {
        let Ok(weights) = normalize_weights(&overrides) else {
            return Ok(());
        };
        let subscores: Subscores = Dimension::iter()
            .zip(scores)
            .filter_map(|(dimension, score)| score.map(|s| (dimension, s)))
            .collect();

        let composed = compose(&subscores, &weights);
        let sum: f64 = composed.contributions.values().sum();
        prop_assert!((composed.total - sum).abs() < 1e-9);
        prop_assert!(composed.total >= -1e-12 && composed.total <= 1.0 + 1e-9);
        prop_assert_eq!(composed.subscores.len(), 9);
    }
}
