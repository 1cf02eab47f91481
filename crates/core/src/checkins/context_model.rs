//! Compiled analytical context handed to the generation service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::activities::{ActivityEntry, ActivityType};
use crate::checkins::assessment::DataStateAssessment;
use crate::checkins::window::CheckInWindow;
use crate::goals::{Achievement, Goal, GoalDateType, TrackingType};
use crate::voice_notes::{ExtractedActivity, VoiceNote};

/// Raw records read for one run, one slot per data source.
#[derive(Debug, Clone, Default)]
pub struct CheckInSources {
    pub activity_types: Vec<ActivityType>,
    pub entries: Vec<ActivityEntry>,
    pub voice_notes: Vec<VoiceNote>,
    pub goals: Vec<Goal>,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

/// First-half versus second-half comparison for one activity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSignal {
    pub direction: TrendDirection,
    pub first_half_average: Option<f64>,
    pub second_half_average: Option<f64>,
    pub change_pct: Option<f64>,
    /// `Some(true)` when the movement is good for this type's polarity.
    pub is_improvement: Option<bool>,
    /// Ready-to-quote phrasing, e.g. "down 12.5% (an improvement)".
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub date_type: GoalDateType,
    pub tracking_type: TrackingType,
    pub target_value: f64,
    pub periods_evaluated: usize,
    pub periods_met: usize,
    /// `periods_met / periods_evaluated`, absent when nothing could be evaluated.
    pub completion_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAnalysis {
    pub activity_type_id: String,
    pub name: String,
    pub unit: Option<String>,
    pub is_negative: bool,
    pub entry_count: usize,
    pub total: f64,
    pub average: f64,
    pub trend: TrendSignal,
    pub longest_streak_days: u32,
    pub goals: Vec<GoalProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum Highlight {
    Achievement {
        goal_id: String,
        goal_name: Option<String>,
        icon: Option<String>,
        period_start: NaiveDate,
        period_end: NaiveDate,
        achieved_value: f64,
        target_value: f64,
        achieved_at: DateTime<Utc>,
    },
    Streak {
        activity_type_id: String,
        activity_name: String,
        days: u32,
        ended_on: NaiveDate,
    },
    Change {
        activity_type_id: String,
        activity_name: String,
        change_pct: f64,
        from_week_start: NaiveDate,
        to_week_start: NaiveDate,
        is_improvement: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNoteSuggestion {
    pub date: NaiveDate,
    pub activity: ExtractedActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNoteExcerpt {
    pub date: NaiveDate,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNoteSummary {
    pub count: usize,
    pub transcribed_count: usize,
    pub dates: Vec<NaiveDate>,
    pub themes: Vec<String>,
    pub suggestions: Vec<VoiceNoteSuggestion>,
    pub excerpts: Vec<VoiceNoteExcerpt>,
}

/// Bounded, deterministic summary of a user's window. Lives for one run only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInContext {
    pub window: CheckInWindow,
    pub assessment: DataStateAssessment,
    pub activities: Vec<ActivityAnalysis>,
    /// Active types left out by the activity cap.
    pub omitted_activity_count: usize,
    pub highlights: Vec<Highlight>,
    pub voice_notes: VoiceNoteSummary,
    pub goal_count: usize,
    pub achievement_count: usize,
}
