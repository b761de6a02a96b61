//! Match outcome types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::college::CollegeRecord;

/// Certainty tier of a match, ordered from most to least certain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Exact,
    HighConfidence,
    MediumConfidence,
    LowConfidence,
    Unmatched,
}

impl MatchType {
    /// Every tier in pass order.
    pub const ALL: [MatchType; 5] = [
        MatchType::Exact,
        MatchType::HighConfidence,
        MatchType::MediumConfidence,
        MatchType::LowConfidence,
        MatchType::Unmatched,
    ];

    /// Resolution stage that produces this tier (1-4, or 5 for unmatched).
    pub fn pass(&self) -> u8 {
        match self {
            MatchType::Exact => 1,
            MatchType::HighConfidence => 2,
            MatchType::MediumConfidence => 3,
            MatchType::LowConfidence => 4,
            MatchType::Unmatched => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "EXACT",
            MatchType::HighConfidence => "HIGH_CONFIDENCE",
            MatchType::MediumConfidence => "MEDIUM_CONFIDENCE",
            MatchType::LowConfidence => "LOW_CONFIDENCE",
            MatchType::Unmatched => "UNMATCHED",
        }
    }

    /// Human-readable name for reports.
    pub fn label(&self) -> &'static str {
        match self {
            MatchType::Exact => "Exact",
            MatchType::HighConfidence => "High confidence",
            MatchType::MediumConfidence => "Medium confidence",
            MatchType::LowConfidence => "Low confidence",
            MatchType::Unmatched => "Unmatched",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance of a match: which comparison produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    ExactPrevious,
    Normalized,
    NormalizedPrevious,
    FuzzyCurrent,
    FuzzyPrevious,
    FuzzyIndex,
    Unmatched,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Exact => "exact",
            MatchMethod::ExactPrevious => "exact_previous",
            MatchMethod::Normalized => "normalized",
            MatchMethod::NormalizedPrevious => "normalized_previous",
            MatchMethod::FuzzyCurrent => "fuzzy_current",
            MatchMethod::FuzzyPrevious => "fuzzy_previous",
            MatchMethod::FuzzyIndex => "fuzzy_index",
            MatchMethod::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single outcome of resolving one free-text name against the registry.
///
/// A matched result (pass 1-4) always carries a college and a positive
/// confidence; an unmatched result (pass 5) carries no college and a
/// confidence of exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    college: Option<Arc<CollegeRecord>>,
    match_type: MatchType,
    confidence: f64,
    method: MatchMethod,
    matched_name: String,
}

impl MatchResult {
    /// Build a result for a registry hit.
    ///
    /// `matched_name` is the name variant (current or previous) the winning
    /// comparison was computed against.
    pub fn matched(
        college: Arc<CollegeRecord>,
        match_type: MatchType,
        confidence: f64,
        method: MatchMethod,
        matched_name: impl Into<String>,
    ) -> Self {
        debug_assert!(match_type != MatchType::Unmatched);
        debug_assert!(confidence > 0.0 && confidence <= 1.0);
        Self {
            college: Some(college),
            match_type,
            confidence,
            method,
            matched_name: matched_name.into(),
        }
    }

    /// The terminal result when no pass fires.
    pub fn unmatched(query_name: impl Into<String>) -> Self {
        Self {
            college: None,
            match_type: MatchType::Unmatched,
            confidence: 0.0,
            method: MatchMethod::Unmatched,
            matched_name: query_name.into(),
        }
    }

    pub fn college(&self) -> Option<&CollegeRecord> {
        self.college.as_deref()
    }

    pub fn college_id(&self) -> Option<&str> {
        self.college.as_deref().map(CollegeRecord::id)
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn method(&self) -> MatchMethod {
        self.method
    }

    pub fn matched_name(&self) -> &str {
        &self.matched_name
    }

    pub fn pass(&self) -> u8 {
        self.match_type.pass()
    }

    pub fn is_matched(&self) -> bool {
        self.college.is_some()
    }
}
