//! College name canonicalization.
//!
//! Steps, in order:
//! 1. Uppercase and trim
//! 2. Whole-word abbreviation expansion (`GOVT` -> `GOVERNMENT`)
//! 3. Known misspelling correction (`VARDHAMAN` -> `VARDHMAN`)
//! 4. Punctuation to spaces, whitespace collapsed
//!
//! Rule order matters: a later rule sees the text already rewritten by the
//! earlier ones.

use std::sync::LazyLock;

use regex::Regex;

/// Institutional abbreviations, expanded on word boundaries only.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("ESIC", "EMPLOYEES STATE INSURANCE CORPORATION"),
    ("GOVT", "GOVERNMENT"),
    ("GOV", "GOVERNMENT"),
    ("UNIV", "UNIVERSITY"),
    ("INST", "INSTITUTE"),
    ("COLL", "COLLEGE"),
    ("HOSP", "HOSPITAL"),
    ("MED", "MEDICAL"),
    ("DENT", "DENTAL"),
    ("DR", "DOCTOR"),
    ("PT", "PANDIT"),
    ("AIIMS", "ALL INDIA INSTITUTE OF MEDICAL SCIENCES"),
    (
        "PGIMER",
        "POST GRADUATE INSTITUTE OF MEDICAL EDUCATION AND RESEARCH",
    ),
    ("MAMC", "MAULANA AZAD MEDICAL COLLEGE"),
    ("KGMU", "KING GEORGES MEDICAL UNIVERSITY"),
    ("UCMS", "UNIVERSITY COLLEGE OF MEDICAL SCIENCES"),
    ("SGSMC", "SETH GORDHANDAS SUNDERDAS MEDICAL COLLEGE"),
];

/// Misspellings seen in counselling spreadsheets, as regex patterns.
///
/// Most rules are plain substrings. `RESEARC` is a truncation of the
/// correct word, so it only fires at a word end; otherwise every
/// `RESEARCH` would become `RESEARCHH`. Multi-word rules accept any run
/// of whitespace between the words so the result does not depend on
/// spacing in the input.
const TYPOS: &[(&str, &str)] = &[
    ("VARDHAMAN", "VARDHMAN"),
    ("COLLGE", "COLLEGE"),
    ("UNIVERSTIY", "UNIVERSITY"),
    ("INSTITTUE", "INSTITUTE"),
    (r"RESEARC\b", "RESEARCH"),
    ("CENTRE", "CENTER"),
    (r"JAWAHAR\s+LAL", "JAWAHARLAL"),
    ("MEDICLA", "MEDICAL"),
    ("HOSPTIAL", "HOSPITAL"),
];

struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
}

impl Rewrite {
    fn apply(&self, text: String) -> String {
        if self.pattern.is_match(&text) {
            self.pattern.replace_all(&text, self.replacement).into_owned()
        } else {
            text
        }
    }
}

static ABBREVIATION_RULES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|(abbreviation, expansion)| Rewrite {
            pattern: Regex::new(&format!(r"\b{}\b", regex::escape(abbreviation)))
                .expect("Invalid abbreviation regex"),
            replacement: expansion,
        })
        .collect()
});

static TYPO_RULES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    TYPOS
        .iter()
        .map(|(pattern, replacement)| Rewrite {
            pattern: Regex::new(pattern).expect("Invalid typo regex"),
            replacement,
        })
        .collect()
});

/// Canonicalize a college name for lookup and comparison.
///
/// Pure and deterministic. Empty or whitespace-only input yields an empty
/// string. The output only contains `A-Z`, `0-9` and single spaces.
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut text = trimmed.to_uppercase();
    for rule in ABBREVIATION_RULES.iter() {
        text = rule.apply(text);
    }
    for rule in TYPO_RULES.iter() {
        text = rule.apply(text);
    }

    let cleaned: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    collapse_whitespace(&cleaned)
}

/// Collapse runs of whitespace to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_abbreviations_on_word_boundaries() {
        assert_eq!(
            normalize_name("Govt. Med. Coll., Kottayam"),
            "GOVERNMENT MEDICAL COLLEGE KOTTAYAM"
        );
        assert_eq!(
            normalize_name("ESIC Medical College"),
            "EMPLOYEES STATE INSURANCE CORPORATION MEDICAL COLLEGE"
        );
    }

    #[test]
    fn leaves_longer_words_alone() {
        // MED inside MEDICINE, DR inside DRAUPADI, PT inside PTOLEMY
        assert_eq!(
            normalize_name("DRAUPADI MEDICINE PTOLEMY"),
            "DRAUPADI MEDICINE PTOLEMY"
        );
    }

    #[test]
    fn expands_named_institutions() {
        assert_eq!(
            normalize_name("AIIMS, Jodhpur"),
            "ALL INDIA INSTITUTE OF MEDICAL SCIENCES JODHPUR"
        );
        assert_eq!(
            normalize_name("Dr. RML Hospital"),
            "DOCTOR RML HOSPITAL"
        );
    }

    #[test]
    fn corrects_known_typos() {
        assert_eq!(
            normalize_name("Vardhaman Mahavir Medical Collge"),
            "VARDHMAN MAHAVIR MEDICAL COLLEGE"
        );
        assert_eq!(
            normalize_name("Regional Cancer Centre"),
            "REGIONAL CANCER CENTER"
        );
        assert_eq!(
            normalize_name("Jawahar  Lal Nehru Medical College"),
            "JAWAHARLAL NEHRU MEDICAL COLLEGE"
        );
    }

    #[test]
    fn truncated_research_is_fixed_without_touching_full_word() {
        assert_eq!(
            normalize_name("INSTITUTE OF MEDICAL RESEARC"),
            "INSTITUTE OF MEDICAL RESEARCH"
        );
        assert_eq!(
            normalize_name("INSTITUTE OF MEDICAL RESEARCH"),
            "INSTITUTE OF MEDICAL RESEARCH"
        );
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("..."), "");
    }

    #[test]
    fn strips_punctuation_and_collapses_spaces() {
        assert_eq!(
            normalize_name("  St. John's   Medical-College (Bangalore) "),
            "ST JOHN S MEDICAL COLLEGE BANGALORE"
        );
    }
}
