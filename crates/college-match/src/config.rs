//! Matcher configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Acceptance thresholds for the three fuzzy passes.
///
/// - At or above `high`: pass 2 (fuzzy index route)
/// - `medium` to `high`: pass 3
/// - `low` to `medium`: pass 4
/// - Below `low`: unmatched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassThresholds {
    /// Minimum fuzzy-index confidence for pass 2 (default: 0.90).
    pub high: f64,
    /// Minimum similarity for pass 3 (default: 0.80).
    pub medium: f64,
    /// Minimum similarity for pass 4 (default: 0.70).
    pub low: f64,
}

impl Default for PassThresholds {
    fn default() -> Self {
        Self {
            high: 0.90,
            medium: 0.80,
            low: 0.70,
        }
    }
}

/// Relative weight of each field in the fuzzy index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub searchable_names: f64,
    pub canonical_name: f64,
    pub previous_name: f64,
    pub normalized_names: f64,
    pub address: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            searchable_names: 0.35,
            canonical_name: 0.25,
            previous_name: 0.15,
            normalized_names: 0.15,
            address: 0.10,
        }
    }
}

impl FieldWeights {
    pub(crate) fn as_array(&self) -> [f64; 5] {
        [
            self.searchable_names,
            self.canonical_name,
            self.previous_name,
            self.normalized_names,
            self.address,
        ]
    }
}

/// Tuning of the weighted approximate-search index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyIndexConfig {
    /// Maximum per-field distance score for a field to count as a hit.
    pub threshold: f64,
    /// How far from the expected location a match may drift before it is
    /// fully penalized. Only used when `ignore_location` is false.
    pub distance: usize,
    /// Queries shorter than this (in characters) never match.
    pub min_match_length: usize,
    pub ignore_location: bool,
    pub weights: FieldWeights,
}

impl Default for FuzzyIndexConfig {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            distance: 100,
            min_match_length: 3,
            ignore_location: true,
            weights: FieldWeights::default(),
        }
    }
}

/// Complete matcher configuration. Every field has a default, so a partial
/// TOML file only needs to name what it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub thresholds: PassThresholds,
    /// Fixed confidence reported for a normalized-lookup hit in pass 2.
    pub normalized_confidence: f64,
    pub fuzzy: FuzzyIndexConfig,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            thresholds: PassThresholds::default(),
            normalized_confidence: 0.95,
            fuzzy: FuzzyIndexConfig::default(),
        }
    }
}

impl MatcherConfig {
    /// Check ranges and ordering of every tunable.
    pub fn validate(&self) -> Result<()> {
        let PassThresholds { high, medium, low } = self.thresholds;
        unit_interval("thresholds.high", high)?;
        unit_interval("thresholds.medium", medium)?;
        unit_interval("thresholds.low", low)?;
        if high <= medium || medium < low {
            return Err(invalid(
                "thresholds",
                format!("must satisfy high > medium >= low (got {high}, {medium}, {low})"),
            ));
        }

        unit_interval("normalized_confidence", self.normalized_confidence)?;
        if self.normalized_confidence < high {
            return Err(invalid(
                "normalized_confidence",
                format!("must be at least thresholds.high ({high})"),
            ));
        }

        let fuzzy = &self.fuzzy;
        if !(0.0..=1.0).contains(&fuzzy.threshold) {
            return Err(invalid(
                "fuzzy.threshold",
                format!("must be within [0, 1] (got {})", fuzzy.threshold),
            ));
        }
        if fuzzy.min_match_length == 0 {
            return Err(invalid("fuzzy.min_match_length", "must be at least 1".to_string()));
        }
        let weights = fuzzy.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid(
                "fuzzy.weights",
                "must be finite and non-negative".to_string(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(invalid("fuzzy.weights", "must not all be zero".to_string()));
        }
        Ok(())
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within (0, 1] (got {value})")))
    }
}

fn invalid(field: &'static str, reason: String) -> MatchError {
    MatchError::InvalidConfig { field, reason }
}
