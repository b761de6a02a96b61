//! Human-readable reporting over matcher statistics.
//!
//! - [`MatchSummary`]: per-pass counts, percentages, match rate and quality tier
//! - [`UnmatchedTally`]: most frequent unmatched `(name, state)` pairs, used to
//!   curate the registry and alias table

#![deny(unsafe_code)]

mod summary;
mod unmatched;

pub use summary::{MatchSummary, PassBreakdown, QualityTier};
pub use unmatched::{UnmatchedEntry, UnmatchedTally};
