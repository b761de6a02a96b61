//! Weighted multi-field approximate search.
//!
//! Every record exposes five fields (searchable names, canonical name,
//! previous name, normalized names and address). A query is compared against
//! each field value as an approximate substring: the per-value score is the
//! minimum number of edits needed to find the query inside the value, divided
//! by the query length, optionally plus a location penalty. Values scoring at
//! or below the threshold count as hits, and a record's overall score is the
//! weighted product of its hit scores, so lower is better and `1 - score` is
//! the confidence.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use college_model::CollegeRecord;

use crate::config::FuzzyIndexConfig;

/// Best possible per-value score for anything short of full equality.
const MIN_PARTIAL_SCORE: f64 = 0.001;

/// Longest pattern handled by the bit-parallel search.
const MAX_BIT_PATTERN: usize = u64::BITS as usize;

/// Searchable record field, in weight order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuzzyField {
    SearchableNames,
    CanonicalName,
    PreviousName,
    NormalizedNames,
    Address,
}

impl FuzzyField {
    pub const ALL: [FuzzyField; 5] = [
        FuzzyField::SearchableNames,
        FuzzyField::CanonicalName,
        FuzzyField::PreviousName,
        FuzzyField::NormalizedNames,
        FuzzyField::Address,
    ];

    /// Field values of `record`, in the same order as the record stores them.
    fn values(self, record: &CollegeRecord) -> Vec<&str> {
        match self {
            FuzzyField::SearchableNames => {
                record.searchable_names().iter().map(String::as_str).collect()
            }
            FuzzyField::CanonicalName => vec![record.canonical_name()],
            FuzzyField::PreviousName => record.previous_name().into_iter().collect(),
            FuzzyField::NormalizedNames => {
                record.normalized_names().iter().map(String::as_str).collect()
            }
            FuzzyField::Address => vec![record.address()],
        }
    }
}

/// One field value that matched the query.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    pub field: FuzzyField,
    /// Position of the value within the field (0 for single-valued fields).
    pub value_index: usize,
    pub score: f64,
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyHit {
    /// Position of the record in the slice the index was built from.
    pub record: usize,
    /// Combined distance score in `[0, 1]`; lower is better.
    pub score: f64,
    pub matches: Vec<FieldMatch>,
}

impl FuzzyHit {
    pub fn confidence(&self) -> f64 {
        1.0 - self.score
    }

    /// The record's searchable name that produced the strongest name-field
    /// hit, or `None` when only the address matched.
    pub fn matched_name<'a>(&self, record: &'a CollegeRecord) -> Option<&'a str> {
        self.matches
            .iter()
            .filter(|m| m.field != FuzzyField::Address)
            .min_by(|a, b| a.score.total_cmp(&b.score))
            .and_then(|m| match m.field {
                FuzzyField::SearchableNames | FuzzyField::NormalizedNames => record
                    .searchable_names()
                    .get(m.value_index)
                    .map(String::as_str),
                FuzzyField::CanonicalName => Some(record.canonical_name()),
                FuzzyField::PreviousName => record.previous_name(),
                FuzzyField::Address => None,
            })
    }
}

/// Ranked approximate search over the registry.
///
/// Implementations return hits best first; ties must be broken by record
/// position so that results are deterministic.
pub trait FuzzyIndex: Send + Sync {
    fn search(&self, query: &str) -> Vec<FuzzyHit>;
}

struct FieldValue {
    chars: Vec<char>,
    /// `1 / sqrt(token count)`, so long values weigh less per hit.
    norm: f64,
}

impl FieldValue {
    fn new(value: &str) -> Self {
        let lowered = value.trim().to_lowercase();
        let tokens = lowered.split_whitespace().count().max(1);
        let norm = (1000.0 / (tokens as f64).sqrt()).round() / 1000.0;
        Self {
            chars: lowered.chars().collect(),
            norm,
        }
    }
}

struct IndexedRecord {
    fields: Vec<(FuzzyField, Vec<FieldValue>)>,
}

/// Default [`FuzzyIndex`] implementation.
pub struct WeightedFuzzyIndex {
    config: FuzzyIndexConfig,
    /// Weights scaled to sum to one, in [`FuzzyField::ALL`] order.
    weights: [f64; 5],
    records: Vec<IndexedRecord>,
}

impl WeightedFuzzyIndex {
    pub fn new(records: &[Arc<CollegeRecord>], config: FuzzyIndexConfig) -> Self {
        let raw_weights = config.weights.as_array();
        let total: f64 = raw_weights.iter().sum();
        let weights = raw_weights.map(|w| if total > 0.0 { w / total } else { 0.0 });

        let records = records
            .iter()
            .map(|record| IndexedRecord {
                fields: FuzzyField::ALL
                    .iter()
                    .zip(weights)
                    .filter(|(_, weight)| *weight > 0.0)
                    .map(|(field, _)| {
                        let values = field
                            .values(record)
                            .into_iter()
                            .map(FieldValue::new)
                            .filter(|value| !value.chars.is_empty())
                            .collect();
                        (*field, values)
                    })
                    .collect(),
            })
            .collect();

        Self {
            config,
            weights,
            records,
        }
    }

    fn weight(&self, field: FuzzyField) -> f64 {
        FuzzyField::ALL
            .iter()
            .position(|f| *f == field)
            .map_or(0.0, |i| self.weights[i])
    }

    /// Distance score of `pattern` inside `value`, if it clears the threshold.
    fn score_value(&self, pattern: &Pattern, value: &FieldValue) -> Option<f64> {
        if pattern.chars == value.chars {
            return Some(0.0);
        }

        let (errors, end) = pattern.best_substring_match(&value.chars);
        let len = pattern.chars.len();
        let mut score = errors as f64 / len as f64;
        if !self.config.ignore_location {
            let start = (end + 1).saturating_sub(len);
            score += if self.config.distance == 0 {
                if start == 0 { 0.0 } else { 1.0 }
            } else {
                start as f64 / self.config.distance as f64
            };
        }

        (score <= self.config.threshold).then_some(score.max(MIN_PARTIAL_SCORE))
    }
}

impl FuzzyIndex for WeightedFuzzyIndex {
    fn search(&self, query: &str) -> Vec<FuzzyHit> {
        let lowered = query.trim().to_lowercase();
        let pattern = Pattern::new(lowered.chars().collect());
        if pattern.chars.len() < self.config.min_match_length {
            return Vec::new();
        }

        let mut hits: Vec<FuzzyHit> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let mut total = 1.0_f64;
                let mut matches = Vec::new();
                for (field, values) in &record.fields {
                    let weight = self.weight(*field);
                    for (value_index, value) in values.iter().enumerate() {
                        let Some(score) = self.score_value(&pattern, value) else {
                            continue;
                        };
                        let base = if score == 0.0 { f64::EPSILON } else { score };
                        total *= base.powf(weight * value.norm);
                        matches.push(FieldMatch {
                            field: *field,
                            value_index,
                            score,
                        });
                    }
                }
                (!matches.is_empty()).then_some(FuzzyHit {
                    record: index,
                    score: total,
                    matches,
                })
            })
            .collect();

        hits.sort_by(|a, b| match a.score.total_cmp(&b.score) {
            Ordering::Equal => a.record.cmp(&b.record),
            other => other,
        });
        hits
    }
}

/// A query prepared for approximate substring search.
struct Pattern {
    chars: Vec<char>,
    /// Per-character bit masks; only built for patterns that fit in a word.
    masks: Option<HashMap<char, u64>>,
}

impl Pattern {
    fn new(chars: Vec<char>) -> Self {
        let masks = (!chars.is_empty() && chars.len() <= MAX_BIT_PATTERN).then(|| {
            let mut masks: HashMap<char, u64> = HashMap::new();
            for (i, c) in chars.iter().enumerate() {
                *masks.entry(*c).or_default() |= 1 << i;
            }
            masks
        });
        Self { chars, masks }
    }

    /// Fewest edits needed to find the pattern anywhere in `text`, with the
    /// text position where that best alignment ends.
    fn best_substring_match(&self, text: &[char]) -> (usize, usize) {
        match &self.masks {
            Some(masks) => bit_parallel_search(masks, self.chars.len(), text),
            None => dynamic_search(&self.chars, text),
        }
    }
}

/// Myers' bit-vector approximate string matching (search variant).
fn bit_parallel_search(masks: &HashMap<char, u64>, len: usize, text: &[char]) -> (usize, usize) {
    let last = 1u64 << (len - 1);
    let mut pv = !0u64;
    let mut mv = 0u64;
    let mut score = len;
    let mut best = (len, 0);

    for (j, c) in text.iter().enumerate() {
        let eq = masks.get(c).copied().unwrap_or(0);
        let xv = eq | mv;
        let xh = ((eq & pv).wrapping_add(pv) ^ pv) | eq;
        let mut ph = mv | !(xh | pv);
        let mut mh = pv & xh;
        if ph & last != 0 {
            score += 1;
        } else if mh & last != 0 {
            score -= 1;
        }
        ph <<= 1;
        mh <<= 1;
        pv = mh | !(xv | ph);
        mv = ph & xv;
        if score < best.0 {
            best = (score, j);
        }
    }
    best
}

/// Column-wise edit distance with a free starting position in the text.
fn dynamic_search(pattern: &[char], text: &[char]) -> (usize, usize) {
    let mut column: Vec<usize> = (0..=pattern.len()).collect();
    let mut best = (pattern.len(), 0);

    for (j, t) in text.iter().enumerate() {
        let mut diagonal = column[0];
        column[0] = 0;
        for (i, p) in pattern.iter().enumerate() {
            let substitution = diagonal + usize::from(p != t);
            diagonal = column[i + 1];
            column[i + 1] = substitution.min(column[i + 1] + 1).min(column[i] + 1);
        }
        if column[pattern.len()] < best.0 {
            best = (column[pattern.len()], j);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use college_model::{CollegeDetails, CollegeType};
    use proptest::prelude::*;

    fn record(id: &str, name: &str, previous: Option<&str>, address: &str) -> Arc<CollegeRecord> {
        Arc::new(CollegeRecord::new(
            id,
            name,
            previous.map(str::to_string),
            CollegeDetails {
                address: address.to_string(),
                state: "KARNATAKA".to_string(),
                college_type: CollegeType::Medical,
                management: None,
                university_affiliation: None,
            },
        ))
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn substring_search_finds_best_alignment() {
        let pattern = Pattern::new(chars("medical"));
        assert_eq!(pattern.best_substring_match(&chars("mysore medical college")).0, 0);
        assert_eq!(pattern.best_substring_match(&chars("mysore medcal college")).0, 1);
        assert_eq!(pattern.best_substring_match(&chars("")).0, 7);
    }

    #[test]
    fn long_patterns_use_dynamic_search() {
        let long = "a".repeat(70);
        let pattern = Pattern::new(chars(&long));
        assert!(pattern.masks.is_none());
        let text = format!("xx{}b{}", "a".repeat(35), "a".repeat(35));
        assert_eq!(pattern.best_substring_match(&chars(&text)).0, 1);
    }

    #[test]
    fn exact_name_ranks_first() {
        let records = vec![
            record("1", "GOVERNMENT DENTAL COLLEGE", None, "BANGALORE"),
            record(
                "2",
                "MYSORE MEDICAL COLLEGE AND RESEARCH INSTITUTE",
                Some("GOVERNMENT MEDICAL COLLEGE"),
                "MYSURU",
            ),
            record("3", "GOVERNMENT MEDICAL COLLEGE", None, "MYSURU"),
        ];
        let index = WeightedFuzzyIndex::new(&records, FuzzyIndexConfig::default());

        let hits = index.search("Government Medical College");
        assert!(!hits.is_empty());
        assert_eq!(hits[0].record, 2);
        assert!(hits[0].confidence() > 0.99);
        assert_eq!(hits[0].matched_name(&records[2]), Some("GOVERNMENT MEDICAL COLLEGE"));
        for pair in hits.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn matched_name_points_at_previous_name() {
        let records = vec![record(
            "1",
            "MYSORE MEDICAL COLLEGE AND RESEARCH INSTITUTE",
            Some("GOVERNMENT MEDICAL COLLEGE"),
            "MYSURU",
        )];
        let index = WeightedFuzzyIndex::new(&records, FuzzyIndexConfig::default());
        let hits = index.search("GOVERNMENT MEDICAL COLLEGE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].matched_name(&records[0]), Some("GOVERNMENT MEDICAL COLLEGE"));
    }

    #[test]
    fn short_or_distant_queries_do_not_match() {
        let records = vec![record("1", "GOVERNMENT MEDICAL COLLEGE", None, "MYSURU")];
        let index = WeightedFuzzyIndex::new(&records, FuzzyIndexConfig::default());
        assert!(index.search("GM").is_empty());
        assert!(index.search("ZZZZZZZZZZZZ").is_empty());
    }

    #[test]
    fn location_penalty_applies_when_enabled() {
        let records = vec![record("1", "SRI SIDDHARTHA MEDICAL COLLEGE", None, "TUMKUR")];
        let config = FuzzyIndexConfig {
            ignore_location: false,
            distance: 10,
            ..FuzzyIndexConfig::default()
        };
        let index = WeightedFuzzyIndex::new(&records, config);
        // "college" starts 23 characters in, a penalty of 2.3.
        assert!(index.search("college").is_empty());
        assert_eq!(index.search("sri siddhartha").len(), 1);
    }

    proptest! {
        #[test]
        fn bit_parallel_agrees_with_dynamic(
            pattern in "[abc]{1,12}",
            text in "[abcd]{0,30}",
        ) {
            let pattern = chars(&pattern);
            let text = chars(&text);
            let prepared = Pattern::new(pattern.clone());
            let masks = prepared.masks.as_ref().unwrap();
            prop_assert_eq!(
                bit_parallel_search(masks, pattern.len(), &text).0,
                dynamic_search(&pattern, &text).0
            );
        }
    }
}
