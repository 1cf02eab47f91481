//! Activity domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How an activity type is captured in the tracking UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiType {
    Increment,
    Slider,
    ButtonGroup,
    Toggle,
}

impl UiType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiType::Increment => "increment",
            UiType::Slider => "slider",
            UiType::ButtonGroup => "button_group",
            UiType::Toggle => "toggle",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "increment" => Some(UiType::Increment),
            "slider" => Some(UiType::Slider),
            "button_group" => Some(UiType::ButtonGroup),
            "toggle" => Some(UiType::Toggle),
            _ => None,
        }
    }
}

/// Whether goals on an activity type aim to reach or to stay under a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalPolarity {
    #[default]
    AtLeast,
    AtMost,
}

impl GoalPolarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPolarity::AtLeast => "at_least",
            GoalPolarity::AtMost => "at_most",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "at_least" => Some(GoalPolarity::AtLeast),
            "at_most" => Some(GoalPolarity::AtMost),
            _ => None,
        }
    }
}

/// Domain model representing a user-defined trackable metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityType {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub unit: Option<String>,
    pub ui_type: UiType,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub step: Option<f64>,
    /// Lower values are better (e.g. cigarettes, screen time).
    pub is_negative: bool,
    pub goal_polarity: GoalPolarity,
    pub is_deleted: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ActivityType {
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// One numeric observation of an activity type on one date.
///
/// At most one entry exists per (user, activity type, date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    pub user_id: String,
    pub activity_type_id: String,
    pub date: NaiveDate,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
