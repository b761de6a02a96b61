//! Property tests for name and state normalization.

use college_normalization::{normalize_name, normalize_state};
use proptest::prelude::*;

proptest! {
    #[test]
    fn name_output_uses_restricted_alphabet(raw in "\\PC{0,60}") {
        let normalized = normalize_name(&raw);
        prop_assert!(normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' '));
        prop_assert!(!normalized.contains("  "));
        prop_assert_eq!(normalized.trim(), normalized.as_str());
    }

    #[test]
    fn name_normalization_is_deterministic(raw in "[A-Za-z .,()'-]{0,60}") {
        prop_assert_eq!(normalize_name(&raw), normalize_name(&raw));
    }

    #[test]
    fn state_normalization_is_idempotent(raw in "[A-Za-z0-9 &()-]{0,40}") {
        let once = normalize_state(&raw);
        prop_assert_eq!(normalize_state(&once), once);
    }
}

#[test]
fn registry_and_counselling_spellings_agree() {
    assert_eq!(
        normalize_name("VARDHAMAN MAHAVIR MEDICAL COLLEGE"),
        normalize_name("Vardhman Mahavir Medical College")
    );
    assert_eq!(
        normalize_name("Govt Medical College"),
        normalize_name("GOVERNMENT MEDICAL COLLEGE")
    );
    assert_eq!(normalize_state("Delhi"), normalize_state("Delhi (NCT)"));
}
