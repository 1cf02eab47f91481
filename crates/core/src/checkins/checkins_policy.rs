//! Tunable product policy for check-in runs.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Distinct-day cutoffs used to classify a user's tracking maturity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStateThresholds {
    /// Days with entries needed to leave `insufficient_data` (default: 3)
    pub baseline_min_days: usize,

    /// Days with entries needed to reach `sufficient` (default: 7)
    pub sufficient_min_days: usize,
}

impl Default for DataStateThresholds {
    fn default() -> Self {
        Self {
            baseline_min_days: 3,
            sufficient_min_days: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPolicy {
    /// Half-over-half changes smaller than this magnitude are reported as stable (default: 5.0)
    pub stable_band_pct: f64,
}

impl Default for TrendPolicy {
    fn default() -> Self {
        Self {
            stable_band_pct: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPolicy {
    /// Shortest consecutive-day streak worth highlighting (default: 3)
    pub min_streak_days: u32,

    /// Smallest week-over-week change worth highlighting, in percent (default: 10.0)
    pub min_change_pct: f64,
}

impl Default for HighlightPolicy {
    fn default() -> Self {
        Self {
            min_streak_days: 3,
            min_change_pct: 10.0,
        }
    }
}

/// Caps that keep a compiled context small enough for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextLimits {
    pub max_activity_types: usize,
    pub max_goals_per_type: usize,
    pub max_highlights: usize,
    pub max_achievements: usize,
    pub max_voice_note_dates: usize,
    pub max_suggestions: usize,
    pub max_excerpts: usize,
    /// Characters kept from each transcription excerpt.
    pub excerpt_chars: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_activity_types: 20,
            max_goals_per_type: 5,
            max_highlights: 10,
            max_achievements: 10,
            max_voice_note_dates: 30,
            max_suggestions: 20,
            max_excerpts: 5,
            excerpt_chars: 280,
        }
    }
}

/// Policy shared by every stage of one check-in run.
///
/// The same value is handed to the assessor, the compiler and the rate limiter
/// so that thresholds are applied consistently within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInPolicy {
    /// Trailing window analysed by a check-in, in days (default: 30)
    pub window_days: u32,

    /// Minimum spacing between completed check-ins, in days (default: 7)
    pub cooldown_days: u32,

    pub thresholds: DataStateThresholds,
    pub trend: TrendPolicy,
    pub highlights: HighlightPolicy,
    pub limits: ContextLimits,
}

impl Default for CheckInPolicy {
    fn default() -> Self {
        Self {
            window_days: 30,
            cooldown_days: 7,
            thresholds: DataStateThresholds::default(),
            trend: TrendPolicy::default(),
            highlights: HighlightPolicy::default(),
            limits: ContextLimits::default(),
        }
    }
}

impl CheckInPolicy {
    pub fn cooldown(&self) -> Duration {
        Duration::days(i64::from(self.cooldown_days))
    }

    /// Rejects combinations that would make the data-state ladder or the window meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.window_days < 2 {
            return Err(Error::InvalidConfigValue(format!(
                "window_days must be at least 2, got {}",
                self.window_days
            )));
        }
        if self.thresholds.baseline_min_days == 0 {
            return Err(Error::InvalidConfigValue(
                "baseline_min_days must be at least 1".to_string(),
            ));
        }
        if self.thresholds.sufficient_min_days <= self.thresholds.baseline_min_days {
            return Err(Error::InvalidConfigValue(format!(
                "sufficient_min_days ({}) must be greater than baseline_min_days ({})",
                self.thresholds.sufficient_min_days, self.thresholds.baseline_min_days
            )));
        }
        if self.trend.stable_band_pct < 0.0 || self.highlights.min_change_pct < 0.0 {
            return Err(Error::InvalidConfigValue(
                "percentage thresholds must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
