//! Check-in domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::checkins::assessment::DataState;

/// A supplementary reading or media link attached to a check-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResource {
    pub title: String,
    pub url: String,
    /// Free-form type tag such as `article`, `video`, `podcast`.
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub description: String,
}

/// The generated report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckInAnalysis {
    pub overall_summary: String,
    pub celebrations: Vec<String>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub resources: Vec<CheckInResource>,
    /// A single sentence.
    pub weekly_focus: String,
    /// A single quote.
    pub motivation: String,
}

/// In-progress snapshot of a [`CheckInAnalysis`] while it is being generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialCheckInAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebrations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<CheckInResource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_focus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
}

impl From<CheckInAnalysis> for PartialCheckInAnalysis {
    fn from(analysis: CheckInAnalysis) -> Self {
        Self {
            overall_summary: Some(analysis.overall_summary),
            celebrations: Some(analysis.celebrations),
            insights: Some(analysis.insights),
            recommendations: Some(analysis.recommendations),
            resources: Some(analysis.resources),
            weekly_focus: Some(analysis.weekly_focus),
            motivation: Some(analysis.motivation),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    #[default]
    Completed,
}

impl CheckInStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(CheckInStatus::Completed),
            _ => None,
        }
    }
}

/// Compact record of the inputs behind a check-in, kept for audit and debugging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInDataSummary {
    pub data_state: DataState,
    pub active_type_count: usize,
    pub days_with_entries: usize,
    pub total_entries: usize,
    pub voice_note_count: usize,
    pub goal_count: usize,
    pub achievement_count: usize,
    pub resource_count: usize,
}

/// Persisted check-in. Created once per successful run and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: String,
    pub user_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub analysis: CheckInAnalysis,
    pub data_summary: CheckInDataSummary,
    pub status: CheckInStatus,
    pub created_at: DateTime<Utc>,
}

/// Input model for persisting a check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckIn {
    pub id: Option<String>,
    pub user_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub analysis: CheckInAnalysis,
    pub data_summary: CheckInDataSummary,
    pub created_at: DateTime<Utc>,
}
