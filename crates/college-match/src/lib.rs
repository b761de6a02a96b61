//! Multi-pass resolution of free-text college names.
//!
//! Given the loaded registry, [`MatchingEngine`] builds a [`CollegeIndex`]
//! once and then resolves `(name, state)` pairs through four progressively
//! looser passes, tallying per-pass statistics as it goes.
//!
//! # Example
//!
//! ```ignore
//! use college_match::{MatcherConfig, MatchingEngine};
//! use college_registry::read_registry;
//!
//! let outcome = read_registry(Path::new("colleges.json"))?;
//! let engine = MatchingEngine::new(outcome.records, MatcherConfig::default())?;
//!
//! let result = engine.resolve("GOVERNMENT MEDICAL COLLEGE, MYSORE", "Karnataka");
//! println!("{:?} {}", result.match_type(), result.confidence());
//! ```

#![deny(unsafe_code)]

mod config;
mod engine;
mod error;
mod fuzzy;
mod index;
mod score;
mod stats;

// === Error Types ===
pub use error::{MatchError, Result};

// === Configuration ===
pub use config::{FieldWeights, FuzzyIndexConfig, MatcherConfig, PassThresholds};

// === Index ===
pub use fuzzy::{FieldMatch, FuzzyField, FuzzyHit, FuzzyIndex, WeightedFuzzyIndex};
pub use index::{CollegeIndex, NameHit, NameStateKey};

// === Scoring ===
pub use score::{similarity, similarity_normalized};

// === Engine ===
pub use engine::{MatchQuery, MatchingEngine};
pub use stats::{MatchingStats, PASS_COUNT, StatsSnapshot};
