//! Property tests for the similarity scorer and configuration parsing.

use college_match::{MatcherConfig, similarity, similarity_normalized};
use proptest::prelude::*;

proptest! {
    #[test]
    fn similarity_is_bounded(a in "[A-Z ]{0,40}", b in "[A-Z ]{0,40}") {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score), "score {score}");
    }

    #[test]
    fn similarity_is_symmetric(a in "[A-Z ]{0,40}", b in "[A-Z ]{0,40}") {
        prop_assert_eq!(similarity_normalized(&a, &b), similarity_normalized(&b, &a));
    }

    #[test]
    fn identical_names_score_one(a in "\\PC{0,40}") {
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }
}

#[test]
fn partial_toml_overrides_defaults() {
    let config: MatcherConfig = toml::from_str(
        r#"
        normalized_confidence = 0.97

        [thresholds]
        low = 0.65

        [fuzzy.weights]
        address = 0.0
        "#,
    )
    .expect("parse config");

    assert_eq!(config.thresholds.high, 0.90);
    assert_eq!(config.thresholds.low, 0.65);
    assert_eq!(config.normalized_confidence, 0.97);
    assert_eq!(config.fuzzy.weights.address, 0.0);
    assert_eq!(config.fuzzy.weights.searchable_names, 0.35);
    assert!(config.validate().is_ok());
}
