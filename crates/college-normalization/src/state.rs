//! Indian state and union territory name canonicalization.

use std::sync::LazyLock;

use regex::Regex;

use crate::name::collapse_whitespace;

/// Six-digit PIN codes, optionally preceded by a hyphen or dash.
static PIN_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-–]?\s*\b\d{6}\b").expect("Invalid PIN code regex"));

/// Variant spellings and their canonical form.
///
/// Every ambiguous pair has exactly one canonical side, and no canonical
/// form appears as a variant, so normalization is idempotent.
const STATE_CORRECTIONS: &[(&str, &str)] = &[
    ("DELHI", "NEW DELHI"),
    ("DELHI (NCT)", "NEW DELHI"),
    ("NCT OF DELHI", "NEW DELHI"),
    ("NCT DELHI", "NEW DELHI"),
    ("JAMMU & KASHMIR", "JAMMU AND KASHMIR"),
    ("JAMMU&KASHMIR", "JAMMU AND KASHMIR"),
    ("J&K", "JAMMU AND KASHMIR"),
    ("J & K", "JAMMU AND KASHMIR"),
    ("ORISSA", "ODISHA"),
    ("CHATTISGARH", "CHHATTISGARH"),
    ("CHHATISGARH", "CHHATTISGARH"),
    ("PONDICHERRY", "PUDUCHERRY"),
    ("UTTARANCHAL", "UTTARAKHAND"),
];

/// Canonicalize a free-text state name.
///
/// Uppercases, trims, strips PIN codes, collapses whitespace and applies
/// the correction table. Empty input yields an empty string.
pub fn normalize_state(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    if upper.is_empty() {
        return String::new();
    }
    let without_pin = PIN_CODE_REGEX.replace_all(&upper, " ");
    let collapsed = collapse_whitespace(&without_pin);

    match STATE_CORRECTIONS
        .iter()
        .find(|(variant, _)| *variant == collapsed)
    {
        Some((_, canonical)) => (*canonical).to_string(),
        None => collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delhi_variants_collapse_to_new_delhi() {
        assert_eq!(normalize_state("Delhi"), "NEW DELHI");
        assert_eq!(normalize_state(" delhi (nct) "), "NEW DELHI");
        assert_eq!(normalize_state("NEW DELHI"), "NEW DELHI");
    }

    #[test]
    fn ambiguous_pairs_have_one_canonical_form() {
        assert_eq!(normalize_state("Orissa"), "ODISHA");
        assert_eq!(normalize_state("Odisha"), "ODISHA");
        assert_eq!(normalize_state("Chattisgarh"), "CHHATTISGARH");
        assert_eq!(normalize_state("Chhattisgarh"), "CHHATTISGARH");
        assert_eq!(normalize_state("Jammu & Kashmir"), "JAMMU AND KASHMIR");
    }

    #[test]
    fn strips_pin_codes() {
        assert_eq!(normalize_state("GUJARAT- 363641"), "GUJARAT");
        assert_eq!(normalize_state("Karnataka 560001"), "KARNATAKA");
    }

    #[test]
    fn unknown_states_pass_through_uppercased() {
        assert_eq!(normalize_state("  tamil   nadu "), "TAMIL NADU");
        assert_eq!(normalize_state(""), "");
    }
}
