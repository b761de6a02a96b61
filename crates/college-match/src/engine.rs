//! Four-pass resolution of free-text college names.
//!
//! Passes run strictly in order and the first one that fires wins:
//!
//! 1. exact lookup of the name under the raw, then the normalized state
//! 2. normalized lookup, then the fuzzy index filtered by state
//! 3. best similarity among same-state candidates, at least `medium`
//! 4. the same candidate, at least `low`
//!
//! Anything else is unmatched (pass 5).

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use college_model::{CollegeRecord, MatchMethod, MatchResult, MatchType};
use college_normalization::normalize_name;
use college_registry::AliasTable;

use crate::config::MatcherConfig;
use crate::error::Result;
use crate::index::{CollegeIndex, NameHit, state_variants};
use crate::score::similarity_normalized;
use crate::stats::{MatchingStats, PassTrace, StatsSnapshot};

/// Gap kept below a band's upper bound when a score is clamped into it.
const CONFIDENCE_MARGIN: f64 = 0.001;

/// One free-text `(name, state)` pair to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub name: String,
    pub state: String,
}

impl MatchQuery {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
        }
    }
}

/// A query after comma trimming, alias rewriting and state normalization.
struct PreparedQuery {
    /// Name every pass compares against.
    clean_name: String,
    /// Trimmed input name when it differs from `clean_name`.
    full_name: Option<String>,
    raw_state: String,
    normalized_state: Option<String>,
}

impl PreparedQuery {
    fn states(&self) -> Vec<&str> {
        let mut states = vec![self.raw_state.as_str()];
        states.extend(self.normalized_state.as_deref());
        states
    }

    fn normalized_state(&self) -> &str {
        self.normalized_state.as_deref().unwrap_or(&self.raw_state)
    }

    fn state_matches(&self, record: &CollegeRecord) -> bool {
        self.states()
            .iter()
            .any(|state| *state == record.state() || *state == record.normalized_state())
    }
}

/// Best `(record, searchable name)` pair found among same-state candidates.
struct Candidate<'a> {
    record: &'a Arc<CollegeRecord>,
    name_index: usize,
    score: f64,
}

/// Resolves counselling names against an indexed registry.
///
/// The index is read-only once built, so `resolve` can be called from many
/// threads at once; only the statistics are shared mutable state.
#[derive(Debug)]
pub struct MatchingEngine {
    index: CollegeIndex,
    config: MatcherConfig,
    aliases: AliasTable,
    stats: MatchingStats,
}

impl MatchingEngine {
    /// Validate `config` and index `records`.
    pub fn new(records: Vec<CollegeRecord>, config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        let index = CollegeIndex::build(records, &config.fuzzy)?;
        Ok(Self::with_index(index, config))
    }

    /// Engine over a prebuilt index. `config` is assumed to be valid.
    pub fn with_index(index: CollegeIndex, config: MatcherConfig) -> Self {
        Self {
            index,
            config,
            aliases: AliasTable::new(),
            stats: MatchingStats::new(),
        }
    }

    /// Apply `aliases` to every query before the first pass.
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Rebuild the index from a fresh registry. Statistics are kept.
    pub fn reinitialize(&mut self, records: Vec<CollegeRecord>) -> Result<()> {
        self.index = CollegeIndex::build(records, &self.config.fuzzy)?;
        info!(records = self.index.len(), "reinitialized matching engine");
        Ok(())
    }

    pub fn index(&self) -> &CollegeIndex {
        &self.index
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Resolve one free-text name and state to a single result.
    pub fn resolve(&self, name: &str, state: &str) -> MatchResult {
        let started = Instant::now();
        let mut passes = PassTrace::default();

        let query = self.prepare(name, state);
        let result = self.run_passes(&query, &mut passes);

        self.stats.record(result.pass(), passes, started.elapsed());
        debug!(
            matched_id = result.college_id(),
            pass = result.pass(),
            method = %result.method(),
            confidence = result.confidence(),
            "match outcome"
        );
        result
    }

    /// Resolve every query in parallel. Output order follows input order.
    pub fn resolve_all(&self, queries: &[MatchQuery]) -> Vec<MatchResult> {
        queries
            .par_iter()
            .map(|query| self.resolve(&query.name, &query.state))
            .collect()
    }

    fn prepare(&self, name: &str, state: &str) -> PreparedQuery {
        let full_name = name.trim();
        let prefix = full_name
            .split_once(',')
            .map_or(full_name, |(head, _)| head)
            .trim();
        let raw_state = state.trim();

        let clean_name = match self.aliases.resolve(prefix, raw_state) {
            Some(target) => {
                trace!(alias_target = target, "applied curated alias");
                target.to_string()
            }
            None => prefix.to_string(),
        };
        let (raw_state, normalized_state) = state_variants(raw_state);

        PreparedQuery {
            full_name: (full_name != clean_name).then(|| full_name.to_string()),
            clean_name,
            raw_state,
            normalized_state,
        }
    }

    fn run_passes(&self, query: &PreparedQuery, passes: &mut PassTrace) -> MatchResult {
        passes.enter(1);
        if let Some(result) = self.exact_pass(query) {
            return result;
        }

        passes.enter(2);
        if let Some(result) = self.high_confidence_pass(query) {
            return result;
        }

        let thresholds = self.config.thresholds;
        passes.enter(3);
        let best = self.best_state_candidate(query);
        if let Some(candidate) = best.as_ref().filter(|c| c.score >= thresholds.medium) {
            let cap = (thresholds.high - CONFIDENCE_MARGIN).max(thresholds.medium);
            let confidence = candidate.score.min(cap);
            return similarity_result(candidate, MatchType::MediumConfidence, confidence);
        }

        passes.enter(4);
        if let Some(candidate) = best
            .as_ref()
            .filter(|c| c.score >= thresholds.low && c.score < thresholds.medium)
        {
            return similarity_result(candidate, MatchType::LowConfidence, candidate.score);
        }

        MatchResult::unmatched(query.clean_name.as_str())
    }

    /// Pass 1: stored name and state, raw state first.
    fn exact_pass(&self, query: &PreparedQuery) -> Option<MatchResult> {
        let names = std::iter::once(query.clean_name.as_str()).chain(query.full_name.as_deref());
        let states = query.states();

        names
            .flat_map(|name| states.iter().map(move |state| (name, *state)))
            .find_map(|(name, state)| self.index.lookup_exact(name, state))
            .map(|hit| {
                let method = if hit.name_index == 0 {
                    MatchMethod::Exact
                } else {
                    MatchMethod::ExactPrevious
                };
                lookup_result(hit, MatchType::Exact, 1.0, method)
            })
    }

    /// Pass 2: normalized lookup, then the fuzzy index.
    fn high_confidence_pass(&self, query: &PreparedQuery) -> Option<MatchResult> {
        let normalized_name = normalize_name(&query.clean_name);
        if normalized_name.is_empty() {
            return None;
        }
        if let Some(hit) = self
            .index
            .lookup_normalized(&normalized_name, query.normalized_state())
        {
            let method = if hit.name_index == 0 {
                MatchMethod::Normalized
            } else {
                MatchMethod::NormalizedPrevious
            };
            return Some(lookup_result(
                hit,
                MatchType::HighConfidence,
                self.config.normalized_confidence,
                method,
            ));
        }

        let high = self.config.thresholds.high;
        self.index
            .fuzzy_search(&query.clean_name)
            .into_iter()
            .filter_map(|hit| self.index.record(hit.record).map(|record| (hit, record)))
            .filter(|(_, record)| query.state_matches(record))
            .find(|(hit, _)| hit.confidence() >= high)
            .map(|(hit, record)| {
                let matched_name = hit
                    .matched_name(record)
                    .unwrap_or(record.canonical_name())
                    .to_string();
                MatchResult::matched(
                    record.clone(),
                    MatchType::HighConfidence,
                    hit.confidence().min(1.0 - CONFIDENCE_MARGIN),
                    MatchMethod::FuzzyIndex,
                    matched_name,
                )
            })
    }

    /// Highest-similarity searchable name among the query state's records.
    ///
    /// Ties keep the first candidate in registry order.
    fn best_state_candidate(&self, query: &PreparedQuery) -> Option<Candidate<'_>> {
        let normalized_name = normalize_name(&query.clean_name);
        if normalized_name.is_empty() {
            return None;
        }
        let mut best: Option<Candidate<'_>> = None;

        for record in self.index.state_candidates(&query.states()) {
            for (name_index, candidate_name) in record.normalized_names().iter().enumerate() {
                let score = similarity_normalized(&normalized_name, candidate_name);
                if best.as_ref().is_none_or(|b| score > b.score) {
                    best = Some(Candidate {
                        record,
                        name_index,
                        score,
                    });
                }
            }
        }
        best
    }
}

fn lookup_result(
    hit: NameHit<'_>,
    match_type: MatchType,
    confidence: f64,
    method: MatchMethod,
) -> MatchResult {
    MatchResult::matched(
        hit.record.clone(),
        match_type,
        confidence,
        method,
        hit.name(),
    )
}

fn similarity_result(
    candidate: &Candidate<'_>,
    match_type: MatchType,
    confidence: f64,
) -> MatchResult {
    let name = &candidate.record.searchable_names()[candidate.name_index];
    let method = if candidate.record.is_current_name(name) {
        MatchMethod::FuzzyCurrent
    } else {
        MatchMethod::FuzzyPrevious
    };
    MatchResult::matched(
        candidate.record.clone(),
        match_type,
        confidence,
        method,
        name.as_str(),
    )
}
