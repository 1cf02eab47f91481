//! Data-state assessment: how much tracking signal a user has in the window.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::activities::{ActivityEntry, ActivityType};
use crate::checkins::checkins_policy::DataStateThresholds;
use crate::checkins::window::CheckInWindow;

/// Coarse tracking maturity, declared from least to most mature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataState {
    NoActivityTypes,
    InsufficientData,
    BuildingBaseline,
    Sufficient,
}

impl DataState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataState::NoActivityTypes => "no_activity_types",
            DataState::InsufficientData => "insufficient_data",
            DataState::BuildingBaseline => "building_baseline",
            DataState::Sufficient => "sufficient",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStateAssessment {
    pub state: DataState,
    pub active_type_count: usize,
    pub days_with_entries: usize,
    pub total_entries: usize,
}

/// Maps counts onto a [`DataState`] using the precedence
/// `no_activity_types` > `insufficient_data` > `building_baseline` > `sufficient`.
pub fn classify_data_state(
    active_type_count: usize,
    days_with_entries: usize,
    thresholds: &DataStateThresholds,
) -> DataState {
    if active_type_count == 0 {
        DataState::NoActivityTypes
    } else if days_with_entries < thresholds.baseline_min_days {
        DataState::InsufficientData
    } else if days_with_entries < thresholds.sufficient_min_days {
        DataState::BuildingBaseline
    } else {
        DataState::Sufficient
    }
}

/// Classifies the window's data.
///
/// Only entries that fall inside `window` and belong to an active activity type
/// are counted; soft-deleted types contribute nothing.
pub fn assess_data_state(
    activity_types: &[ActivityType],
    entries: &[ActivityEntry],
    window: &CheckInWindow,
    thresholds: &DataStateThresholds,
) -> DataStateAssessment {
    let active_ids: HashSet<&str> = activity_types
        .iter()
        .filter(|t| t.is_active())
        .map(|t| t.id.as_str())
        .collect();

    let mut days = HashSet::new();
    let mut total_entries = 0;
    for entry in entries {
        if window.contains(entry.date) && active_ids.contains(entry.activity_type_id.as_str()) {
            days.insert(entry.date);
            total_entries += 1;
        }
    }

    DataStateAssessment {
        state: classify_data_state(active_ids.len(), days.len(), thresholds),
        active_type_count: active_ids.len(),
        days_with_entries: days.len(),
        total_entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::{GoalPolarity, UiType};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn activity_type(id: &str, is_deleted: bool) -> ActivityType {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        ActivityType {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            name: id.to_string(),
            unit: None,
            ui_type: UiType::Increment,
            min_value: None,
            max_value: None,
            step: None,
            is_negative: false,
            goal_polarity: GoalPolarity::AtLeast,
            is_deleted,
            display_order: 0,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn entry(type_id: &str, date: NaiveDate) -> ActivityEntry {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        ActivityEntry {
            id: format!("{}-{}", type_id, date),
            user_id: "user-1".to_string(),
            activity_type_id: type_id.to_string(),
            date,
            value: 1.0,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn window() -> CheckInWindow {
        CheckInWindow::ending_on(NaiveDate::from_ymd_opt(2026, 3, 30).unwrap(), 30)
    }

    fn entries_on_days(type_id: &str, days: i64) -> Vec<ActivityEntry> {
        (0..days)
            .map(|offset| entry(type_id, window().end - Duration::days(offset)))
            .collect()
    }

    #[test]
    fn no_active_types_wins_over_everything() {
        let types = vec![activity_type("steps", true)];
        let entries = entries_on_days("steps", 20);
        let result = assess_data_state(&types, &entries, &window(), &DataStateThresholds::default());
        assert_eq!(result.state, DataState::NoActivityTypes);
        assert_eq!(result.active_type_count, 0);
        assert_eq!(result.total_entries, 0);
    }

    #[test]
    fn ladder_follows_distinct_days() {
        let types = vec![activity_type("steps", false)];
        let thresholds = DataStateThresholds::default();
        let cases = [
            (0, DataState::InsufficientData),
            (2, DataState::InsufficientData),
            (3, DataState::BuildingBaseline),
            (6, DataState::BuildingBaseline),
            (7, DataState::Sufficient),
            (30, DataState::Sufficient),
        ];
        for (days, expected) in cases {
            let entries = entries_on_days("steps", days);
            let result = assess_data_state(&types, &entries, &window(), &thresholds);
            assert_eq!(result.state, expected, "{} days", days);
            assert_eq!(result.days_with_entries, days as usize);
        }
    }

    #[test]
    fn two_types_on_the_same_day_count_one_day() {
        let types = vec![activity_type("steps", false), activity_type("water", false)];
        let day = window().end;
        let entries = vec![entry("steps", day), entry("water", day)];
        let result = assess_data_state(&types, &entries, &window(), &DataStateThresholds::default());
        assert_eq!(result.days_with_entries, 1);
        assert_eq!(result.total_entries, 2);
    }

    #[test]
    fn ignores_entries_outside_window_and_on_deleted_types() {
        let types = vec![activity_type("steps", false), activity_type("old", true)];
        let mut entries = entries_on_days("old", 10);
        entries.push(entry("steps", window().start - Duration::days(1)));
        let result = assess_data_state(&types, &entries, &window(), &DataStateThresholds::default());
        assert_eq!(result.days_with_entries, 0);
        assert_eq!(result.state, DataState::InsufficientData);
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let thresholds = DataStateThresholds {
            baseline_min_days: 1,
            sufficient_min_days: 2,
        };
        assert_eq!(classify_data_state(1, 1, &thresholds), DataState::BuildingBaseline);
        assert_eq!(classify_data_state(1, 2, &thresholds), DataState::Sufficient);
    }
}
