//! End-of-run match summary.

use std::fmt;

use serde::{Deserialize, Serialize};

use college_match::StatsSnapshot;
use college_model::MatchType;

/// Qualitative label for the overall match rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    VeryGood,
    Excellent,
    Outstanding,
}

impl QualityTier {
    /// Tier for a match rate given in percent, if it reaches one.
    pub fn for_percentage(percentage: f64) -> Option<Self> {
        if percentage >= 95.0 {
            Some(QualityTier::Outstanding)
        } else if percentage >= 90.0 {
            Some(QualityTier::Excellent)
        } else if percentage >= 85.0 {
            Some(QualityTier::VeryGood)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Outstanding => "Outstanding",
            QualityTier::Excellent => "Excellent",
            QualityTier::VeryGood => "Very good",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Count and share of one pass (5 = unmatched).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassBreakdown {
    pub pass: u8,
    pub label: String,
    pub count: u64,
    /// Share of all attempts, 0-100.
    pub percentage: f64,
}

/// Summary of a matcher run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total: u64,
    pub matched: u64,
    pub unmatched: u64,
    /// Matched share of all attempts, 0-100.
    pub match_rate: f64,
    /// Passes 1-4 followed by unmatched.
    pub passes: Vec<PassBreakdown>,
    pub average_processing_micros: f64,
    pub tier: Option<QualityTier>,
}

impl MatchSummary {
    pub fn from_stats(stats: &StatsSnapshot) -> Self {
        let total = stats.total_attempts;
        let matched = stats.matched();
        let percent = |count: u64| {
            if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            }
        };

        let passes = MatchType::ALL
            .iter()
            .map(|match_type| {
                let pass = match_type.pass();
                let count = stats.pass_count(pass);
                PassBreakdown {
                    pass,
                    label: match_type.label().to_string(),
                    count,
                    percentage: percent(count),
                }
            })
            .collect();

        let match_rate = percent(matched);
        Self {
            total,
            matched,
            unmatched: stats.unmatched,
            match_rate,
            passes,
            average_processing_micros: stats.average_processing_micros(),
            tier: if total == 0 {
                None
            } else {
                QualityTier::for_percentage(match_rate)
            },
        }
    }

    /// Plain-text rendering, one fact per line.
    pub fn render_text(&self) -> String {
        let unmatched_rate = if self.total == 0 {
            0.0
        } else {
            100.0 - self.match_rate
        };
        let mut lines = vec![
            format!("Total attempts: {}", self.total),
            format!("Matched: {} ({:.2}%)", self.matched, self.match_rate),
            format!("Unmatched: {} ({:.2}%)", self.unmatched, unmatched_rate),
            format!("Average time: {:.1} us", self.average_processing_micros),
        ];
        if let Some(tier) = self.tier {
            lines.push(format!("Quality: {tier}"));
        }
        lines.push("Pass breakdown:".to_string());
        for pass in &self.passes {
            lines.push(format!(
                "  Pass {} ({}): {} ({:.2}%)",
                pass.pass, pass.label, pass.count, pass.percentage
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(pass_matches: [u64; 4], unmatched: u64) -> StatsSnapshot {
        StatsSnapshot {
            total_attempts: pass_matches.iter().sum::<u64>() + unmatched,
            pass_matches,
            unmatched,
            pass_invocations: [0; 4],
            total_processing_micros: 0,
        }
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(QualityTier::for_percentage(99.0), Some(QualityTier::Outstanding));
        assert_eq!(QualityTier::for_percentage(95.0), Some(QualityTier::Outstanding));
        assert_eq!(QualityTier::for_percentage(90.0), Some(QualityTier::Excellent));
        assert_eq!(QualityTier::for_percentage(85.0), Some(QualityTier::VeryGood));
        assert_eq!(QualityTier::for_percentage(84.99), None);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let summary = MatchSummary::from_stats(&stats([7, 5, 3, 2], 3));
        let total: f64 = summary.passes.iter().map(|p| p.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(summary.matched, 17);
        assert!((summary.match_rate - 85.0).abs() < 1e-9);
        assert_eq!(summary.tier, Some(QualityTier::VeryGood));
    }

    #[test]
    fn empty_run_has_no_tier() {
        let summary = MatchSummary::from_stats(&StatsSnapshot::default());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.match_rate, 0.0);
        assert!(summary.passes.iter().all(|p| p.percentage == 0.0));
        assert_eq!(summary.tier, None);
        assert_eq!(summary.passes.len(), 5);
    }
}
