//! Per-engine match statistics.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of matching passes (pass 5 is "unmatched").
pub const PASS_COUNT: usize = 4;

/// Point-in-time copy of [`MatchingStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_attempts: u64,
    /// Successful matches per pass, index 0 is pass 1.
    pub pass_matches: [u64; PASS_COUNT],
    pub unmatched: u64,
    /// How many times each pass was entered.
    pub pass_invocations: [u64; PASS_COUNT],
    pub total_processing_micros: u64,
}

impl StatsSnapshot {
    pub fn matched(&self) -> u64 {
        self.pass_matches.iter().sum()
    }

    /// Matches produced by `pass` (1-based); 5 or more yields the unmatched count.
    pub fn pass_count(&self, pass: u8) -> u64 {
        match pass {
            1..=4 => self.pass_matches[usize::from(pass) - 1],
            _ => self.unmatched,
        }
    }

    pub fn average_processing_micros(&self) -> f64 {
        if self.total_attempts == 0 {
            0.0
        } else {
            self.total_processing_micros as f64 / self.total_attempts as f64
        }
    }
}

/// Passes entered while resolving one query, committed with its outcome.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PassTrace {
    entered: [bool; PASS_COUNT],
}

impl PassTrace {
    pub(crate) fn enter(&mut self, pass: u8) {
        self.entered[usize::from(pass) - 1] = true;
    }
}

/// Aggregate counters shared by every caller of one engine.
///
/// Each resolution is committed under a single lock, so a snapshot always
/// satisfies `sum(pass_matches) + unmatched == total_attempts`.
#[derive(Debug, Default)]
pub struct MatchingStats {
    inner: Mutex<StatsSnapshot>,
}

impl MatchingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, pass: u8, trace: PassTrace, elapsed: Duration) {
        let mut stats = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        stats.total_attempts += 1;
        match pass {
            1..=4 => stats.pass_matches[usize::from(pass) - 1] += 1,
            _ => stats.unmatched += 1,
        }
        for (count, entered) in stats.pass_invocations.iter_mut().zip(trace.entered) {
            if entered {
                *count += 1;
            }
        }
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        stats.total_processing_micros = stats.total_processing_micros.saturating_add(micros);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
