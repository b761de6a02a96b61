//! Registry row validation and previous-name extraction.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use college_model::{CollegeDetails, CollegeRecord, CollegeType, RawCollege};
use college_normalization::normalize_name;

/// `<text-A> (<text-B>)` anchored at the end of the name.
static TRAILING_PAREN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*\(([^()]+)\)\s*$").expect("Invalid trailing parenthetical regex")
});

/// Tokens that make bracketed text look like an institution name.
const INSTITUTION_TOKENS: &[&str] = &["COLLEGE", "MEDICAL", "INSTITUTE", "UNIVERSITY"];

const MIN_PREVIOUS_NAME_LEN: usize = 5;

/// Why a registry row was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingName,
    MissingState,
    UnknownType(String),
    DuplicateId(String),
    /// The row could not be decoded at all.
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingName => write!(f, "missing name"),
            SkipReason::MissingState => write!(f, "missing state"),
            SkipReason::UnknownType(value) if value.trim().is_empty() => {
                write!(f, "missing type")
            }
            SkipReason::UnknownType(value) => write!(f, "unknown type {value:?}"),
            SkipReason::DuplicateId(id) => write!(f, "duplicate id {id}"),
            SkipReason::Malformed(message) => write!(f, "malformed row: {message}"),
        }
    }
}

/// A registry row that was skipped, with its 1-based position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub row: usize,
    pub reason: SkipReason,
}

/// Records produced by a load, plus the rows that were dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<CollegeRecord>,
    pub skipped: Vec<SkippedEntry>,
}

impl LoadOutcome {
    /// Number of records that carry a previous name.
    pub fn previous_name_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.previous_name().is_some())
            .count()
    }
}

/// Split a registry name into its current name and an optional previous name.
///
/// The trailing parenthetical is only treated as a previous name when it is
/// longer than five characters and mentions an institution token; otherwise
/// the trimmed name is returned unchanged.
///
/// ```
/// use college_registry::split_previous_name;
///
/// let (current, previous) = split_previous_name(
///     "MYSORE MEDICAL COLLEGE AND RESEARCH INSTITUTE (GOVERNMENT MEDICAL COLLEGE)",
/// );
/// assert_eq!(current, "MYSORE MEDICAL COLLEGE AND RESEARCH INSTITUTE");
/// assert_eq!(previous.as_deref(), Some("GOVERNMENT MEDICAL COLLEGE"));
///
/// let (current, previous) = split_previous_name("KASTURBA MEDICAL COLLEGE (KMC)");
/// assert_eq!(current, "KASTURBA MEDICAL COLLEGE (KMC)");
/// assert!(previous.is_none());
/// ```
pub fn split_previous_name(raw_name: &str) -> (String, Option<String>) {
    let name = raw_name.trim();
    let Some(captures) = TRAILING_PAREN_REGEX.captures(name) else {
        return (name.to_string(), None);
    };

    let current = captures[1].trim();
    let bracketed = captures[2].trim();
    if !current.is_empty() && looks_like_institution(bracketed) {
        (current.to_string(), Some(bracketed.to_string()))
    } else {
        (name.to_string(), None)
    }
}

fn looks_like_institution(text: &str) -> bool {
    if text.chars().count() <= MIN_PREVIOUS_NAME_LEN {
        return false;
    }
    let upper = text.to_uppercase();
    INSTITUTION_TOKENS.iter().any(|token| upper.contains(token))
}

/// Validate raw registry rows and build immutable records.
///
/// Rows with a missing name or state, an unrecognized type, or an id that
/// was already seen are skipped with a warning. Rows without an id get
/// `COL-<row>`.
pub fn load_colleges<I>(raw: I) -> LoadOutcome
where
    I: IntoIterator<Item = RawCollege>,
{
    load_rows(raw.into_iter().map(Ok))
}

/// Shared loader for decoded and undecodable rows.
pub(crate) fn load_rows<I>(rows: I) -> LoadOutcome
where
    I: IntoIterator<Item = std::result::Result<RawCollege, String>>,
{
    let mut outcome = LoadOutcome::default();
    let mut seen_ids = HashSet::new();

    for (index, row) in rows.into_iter().enumerate() {
        let row_number = index + 1;
        let parsed = row
            .map_err(SkipReason::Malformed)
            .and_then(|raw| build_record(raw, row_number));

        match parsed {
            Ok(record) if !seen_ids.insert(record.id().to_string()) => {
                skip(
                    &mut outcome,
                    row_number,
                    SkipReason::DuplicateId(record.id().to_string()),
                );
            }
            Ok(record) => {
                if let Some(previous) = record.previous_name() {
                    debug!(
                        id = record.id(),
                        previous_name = previous,
                        "extracted previous name"
                    );
                }
                outcome.records.push(record);
            }
            Err(reason) => skip(&mut outcome, row_number, reason),
        }
    }

    info!(
        records = outcome.records.len(),
        previous_names = outcome.previous_name_count(),
        skipped = outcome.skipped.len(),
        "loaded college registry"
    );
    outcome
}

fn skip(outcome: &mut LoadOutcome, row: usize, reason: SkipReason) {
    warn!(row, reason = %reason, "skipping registry row");
    outcome.skipped.push(SkippedEntry { row, reason });
}

fn build_record(
    raw: RawCollege,
    row_number: usize,
) -> std::result::Result<CollegeRecord, SkipReason> {
    if raw.name.trim().is_empty() {
        return Err(SkipReason::MissingName);
    }
    if raw.state.trim().is_empty() {
        return Err(SkipReason::MissingState);
    }
    let college_type: CollegeType = raw
        .college_type
        .parse()
        .map_err(|_| SkipReason::UnknownType(raw.college_type.clone()))?;

    let (canonical_name, previous_name) = split_previous_name(&raw.name);
    // Names with no Latin letters or digits would index under an empty key.
    if normalize_name(&canonical_name).is_empty() {
        return Err(SkipReason::MissingName);
    }
    let id = raw.id.unwrap_or_else(|| format!("COL-{row_number}"));

    Ok(CollegeRecord::new(
        id,
        canonical_name,
        previous_name,
        CollegeDetails {
            address: raw.address.trim().to_string(),
            state: raw.state.trim().to_string(),
            college_type,
            management: non_empty(raw.management),
            university_affiliation: non_empty(raw.university),
        },
    ))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: Option<&str>, name: &str, state: &str, college_type: &str) -> RawCollege {
        RawCollege {
            id: id.map(str::to_string),
            name: name.to_string(),
            address: "SOMEWHERE".to_string(),
            state: state.to_string(),
            college_type: college_type.to_string(),
            management: Some("  ".to_string()),
            university: None,
        }
    }

    #[test]
    fn splits_plausible_previous_name() {
        let (current, previous) =
            split_previous_name("ESIC MEDICAL COLLEGE (Govt. Medical College, Gulbarga) ");
        assert_eq!(current, "ESIC MEDICAL COLLEGE");
        assert_eq!(previous.as_deref(), Some("Govt. Medical College, Gulbarga"));
    }

    #[test]
    fn keeps_short_or_non_institution_brackets() {
        assert_eq!(
            split_previous_name("ST JOHNS MEDICAL COLLEGE (BANGALORE)").1,
            None
        );
        // "(MEDIC)" is too short even though it looks institutional.
        assert_eq!(split_previous_name("X COLLEGE (MEDIC)").1, None);
        assert_eq!(split_previous_name("NO BRACKETS HERE").1, None);
    }

    #[test]
    fn only_the_last_parenthetical_is_considered() {
        let (current, previous) =
            split_previous_name("A (B) COLLEGE (OLD MEDICAL COLLEGE)");
        assert_eq!(current, "A (B) COLLEGE");
        assert_eq!(previous.as_deref(), Some("OLD MEDICAL COLLEGE"));
    }

    #[test]
    fn skips_invalid_rows_and_keeps_the_rest() {
        let outcome = load_colleges(vec![
            raw(Some("1"), "GOOD MEDICAL COLLEGE", "GOA", "Medical"),
            raw(Some("2"), "  ", "GOA", "Medical"),
            raw(Some("3"), "NO STATE COLLEGE", "", "Dental"),
            raw(Some("4"), "NURSING COLLEGE", "GOA", "Nursing"),
            raw(Some("1"), "DUPLICATE ID COLLEGE", "GOA", "DNB"),
            raw(None, "GENERATED ID COLLEGE", "GOA", "dnb"),
        ]);

        let ids: Vec<&str> = outcome.records.iter().map(CollegeRecord::id).collect();
        assert_eq!(ids, ["1", "COL-6"]);
        assert_eq!(
            outcome.skipped,
            vec![
                SkippedEntry {
                    row: 2,
                    reason: SkipReason::MissingName
                },
                SkippedEntry {
                    row: 3,
                    reason: SkipReason::MissingState
                },
                SkippedEntry {
                    row: 4,
                    reason: SkipReason::UnknownType("Nursing".to_string())
                },
                SkippedEntry {
                    row: 5,
                    reason: SkipReason::DuplicateId("1".to_string())
                },
            ]
        );
        assert_eq!(outcome.records[0].details().management, None);
    }

    #[test]
    fn skips_names_without_latin_text() {
        let outcome = load_colleges(vec![
            raw(Some("KA-1"), "BANGALORE MEDICAL COLLEGE", "KARNATAKA", "Medical"),
            raw(Some("KA-2"), "-", "KARNATAKA", "Medical"),
            raw(Some("KA-3"), "मेडिकल कॉलेज", "KARNATAKA", "Medical"),
        ]);

        let ids: Vec<&str> = outcome.records.iter().map(CollegeRecord::id).collect();
        assert_eq!(ids, ["KA-1"]);
        assert_eq!(
            outcome.skipped,
            vec![
                SkippedEntry {
                    row: 2,
                    reason: SkipReason::MissingName
                },
                SkippedEntry {
                    row: 3,
                    reason: SkipReason::MissingName
                },
            ]
        );
    }

    #[test]
    fn counts_previous_names() {
        let outcome = load_colleges(vec![
            raw(None, "NEW MEDICAL COLLEGE (OLD MEDICAL COLLEGE)", "GOA", "Medical"),
            raw(None, "PLAIN DENTAL COLLEGE", "GOA", "Dental"),
        ]);
        assert_eq!(outcome.previous_name_count(), 1);
        assert_eq!(outcome.records[0].searchable_names().len(), 2);
    }
}
