//! Frequency tally of unmatched `(name, state)` pairs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use college_model::MatchResult;

/// One unmatched pair and how often it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedEntry {
    pub name: String,
    pub state: String,
    pub count: u64,
}

/// Counts unmatched pairs across a run.
#[derive(Debug, Clone, Default)]
pub struct UnmatchedTally {
    counts: HashMap<(String, String), u64>,
}

impl UnmatchedTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, state: &str) {
        *self
            .counts
            .entry((name.trim().to_string(), state.trim().to_string()))
            .or_default() += 1;
    }

    /// Record the query only when `result` is unmatched.
    pub fn observe(&mut self, result: &MatchResult, state: &str) {
        if !result.is_matched() {
            self.record(result.matched_name(), state);
        }
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent pairs; ties are ordered by name, then state.
    pub fn top_n(&self, n: usize) -> Vec<UnmatchedEntry> {
        let mut entries: Vec<UnmatchedEntry> = self
            .counts
            .iter()
            .map(|((name, state), count)| UnmatchedEntry {
                name: name.clone(),
                state: state.clone(),
                count: *count,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.state.cmp(&b.state))
        });
        entries.truncate(n);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_frequency_then_name_then_state() {
        let mut tally = UnmatchedTally::new();
        for _ in 0..3 {
            tally.record("ZETA COLLEGE", "GOA");
        }
        tally.record("ALPHA COLLEGE", "KERALA");
        tally.record("ALPHA COLLEGE", "GOA");
        tally.record(" BETA COLLEGE ", "GOA");
        tally.record("BETA COLLEGE", "GOA");

        let top = tally.top_n(3);
        let pairs: Vec<(&str, &str, u64)> = top
            .iter()
            .map(|e| (e.name.as_str(), e.state.as_str(), e.count))
            .collect();
        assert_eq!(
            pairs,
            [
                ("ZETA COLLEGE", "GOA", 3),
                ("BETA COLLEGE", "GOA", 2),
                ("ALPHA COLLEGE", "GOA", 1),
            ]
        );
        assert_eq!(tally.len(), 4);
    }

    #[test]
    fn observe_ignores_matches() {
        let mut tally = UnmatchedTally::new();
        tally.observe(&MatchResult::unmatched("UNKNOWN COLLEGE"), "GOA");
        assert_eq!(tally.top_n(10)[0].name, "UNKNOWN COLLEGE");
        assert!(tally.top_n(0).is_empty());
    }
}
