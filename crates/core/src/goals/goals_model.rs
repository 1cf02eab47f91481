//! Goals domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The date scope a goal target applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalDateType {
    Daily,
    Weekly,
    Monthly,
    ByDate,
    DateRange,
}

impl GoalDateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalDateType::Daily => "daily",
            GoalDateType::Weekly => "weekly",
            GoalDateType::Monthly => "monthly",
            GoalDateType::ByDate => "by_date",
            GoalDateType::DateRange => "date_range",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(GoalDateType::Daily),
            "weekly" => Some(GoalDateType::Weekly),
            "monthly" => Some(GoalDateType::Monthly),
            "by_date" => Some(GoalDateType::ByDate),
            "date_range" => Some(GoalDateType::DateRange),
            _ => None,
        }
    }
}

/// How entry values inside a goal period are combined before comparing to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingType {
    Average,
    Absolute,
}

impl TrackingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingType::Average => "average",
            TrackingType::Absolute => "absolute",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "average" => Some(TrackingType::Average),
            "absolute" => Some(TrackingType::Absolute),
            _ => None,
        }
    }
}

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub activity_type_id: String,
    pub name: String,
    pub target_value: f64,
    pub icon: Option<String>,
    pub date_type: GoalDateType,
    pub tracking_type: TrackingType,
    pub target_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable record of a goal's outcome for a closed period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub achieved_value: f64,
    pub target_value: f64,
    pub achieved_at: DateTime<Utc>,
}
