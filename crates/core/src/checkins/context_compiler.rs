//! Context Compiler - turns raw window records into a bounded [`CheckInContext`].
//!
//! Contract:
//! - Deterministic: same inputs produce the same context (stable sorts, no clock reads)
//! - Bounded: every list is capped by [`ContextLimits`](crate::checkins::ContextLimits)
//! - Polarity-aware: a falling value on a negative type is phrased as an improvement

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};

use crate::activities::{ActivityType, GoalPolarity};
use crate::checkins::assessment::DataStateAssessment;
use crate::checkins::checkins_model::CheckInDataSummary;
use crate::checkins::checkins_policy::{CheckInPolicy, ContextLimits, TrendPolicy};
use crate::checkins::context_model::{
    ActivityAnalysis, CheckInContext, CheckInSources, GoalProgress, Highlight, TrendDirection,
    TrendSignal, VoiceNoteExcerpt, VoiceNoteSuggestion, VoiceNoteSummary,
};
use crate::checkins::window::CheckInWindow;
use crate::goals::{Achievement, Goal, GoalDateType, TrackingType};
use crate::voice_notes::VoiceNote;

/// Per-type daily values inside the window, keyed by date.
type DailyValues = BTreeMap<NaiveDate, f64>;

/// Builds the analytical context for one run.
pub fn compile_context(
    assessment: &DataStateAssessment,
    sources: &CheckInSources,
    window: &CheckInWindow,
    policy: &CheckInPolicy,
) -> CheckInContext {
    let limits = &policy.limits;

    let mut daily: HashMap<&str, DailyValues> = HashMap::new();
    let mut entry_counts: HashMap<&str, usize> = HashMap::new();
    for entry in sources.entries.iter().filter(|e| window.contains(e.date)) {
        let type_id = entry.activity_type_id.as_str();
        *daily
            .entry(type_id)
            .or_default()
            .entry(entry.date)
            .or_insert(0.0) += entry.value;
        *entry_counts.entry(type_id).or_insert(0) += 1;
    }

    // Types with data first, then the user's own ordering.
    let mut active_types: Vec<&ActivityType> = sources
        .activity_types
        .iter()
        .filter(|t| t.is_active())
        .collect();
    active_types.sort_by(|a, b| {
        let a_empty = !daily.contains_key(a.id.as_str());
        let b_empty = !daily.contains_key(b.id.as_str());
        a_empty
            .cmp(&b_empty)
            .then(a.display_order.cmp(&b.display_order))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    let omitted_activity_count = active_types.len().saturating_sub(limits.max_activity_types);
    active_types.truncate(limits.max_activity_types);

    let mut goals_by_type: HashMap<&str, Vec<&Goal>> = HashMap::new();
    for goal in &sources.goals {
        goals_by_type
            .entry(goal.activity_type_id.as_str())
            .or_default()
            .push(goal);
    }
    for goals in goals_by_type.values_mut() {
        goals.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    }

    let empty = DailyValues::new();
    let mut activities = Vec::with_capacity(active_types.len());
    let mut streaks = Vec::new();
    let mut changes = Vec::new();

    for activity_type in &active_types {
        let type_id = activity_type.id.as_str();
        let days = daily.get(type_id).unwrap_or(&empty);
        let goals = goals_by_type.get(type_id).map(Vec::as_slice).unwrap_or(&[]);

        let streak = longest_streak(days);
        if let Some((length, ended_on)) = streak {
            if length >= policy.highlights.min_streak_days {
                streaks.push(Highlight::Streak {
                    activity_type_id: activity_type.id.clone(),
                    activity_name: activity_type.name.clone(),
                    days: length,
                    ended_on,
                });
            }
        }

        if let Some(change) = largest_weekly_change(days, window) {
            if change.pct.abs() >= policy.highlights.min_change_pct {
                changes.push(Highlight::Change {
                    activity_type_id: activity_type.id.clone(),
                    activity_name: activity_type.name.clone(),
                    change_pct: round2(change.pct),
                    from_week_start: change.from_week_start,
                    to_week_start: change.to_week_start,
                    is_improvement: (change.pct < 0.0) == activity_type.is_negative,
                });
            }
        }

        let total: f64 = days.values().sum();
        let entry_count = entry_counts.get(type_id).copied().unwrap_or(0);
        let average = if entry_count > 0 {
            total / entry_count as f64
        } else {
            0.0
        };

        activities.push(ActivityAnalysis {
            activity_type_id: activity_type.id.clone(),
            name: activity_type.name.clone(),
            unit: activity_type.unit.clone(),
            is_negative: activity_type.is_negative,
            entry_count,
            total: round2(total),
            average: round2(average),
            trend: trend_signal(days, window, activity_type.is_negative, &policy.trend),
            longest_streak_days: streak.map_or(0, |(length, _)| length),
            goals: goals
                .iter()
                .take(limits.max_goals_per_type)
                .map(|goal| goal_progress(goal, days, window, activity_type.goal_polarity))
                .collect(),
        });
    }

    let (achievement_highlights, achievement_count) =
        achievement_highlights(&sources.achievements, &sources.goals, window, limits);

    streaks.sort_by(|a, b| match (a, b) {
        (
            Highlight::Streak {
                days: a_days,
                activity_name: a_name,
                ..
            },
            Highlight::Streak {
                days: b_days,
                activity_name: b_name,
                ..
            },
        ) => b_days.cmp(a_days).then_with(|| a_name.cmp(b_name)),
        _ => std::cmp::Ordering::Equal,
    });
    changes.sort_by(|a, b| match (a, b) {
        (
            Highlight::Change {
                change_pct: a_pct,
                activity_name: a_name,
                ..
            },
            Highlight::Change {
                change_pct: b_pct,
                activity_name: b_name,
                ..
            },
        ) => b_pct
            .abs()
            .total_cmp(&a_pct.abs())
            .then_with(|| a_name.cmp(b_name)),
        _ => std::cmp::Ordering::Equal,
    });

    let mut highlights = achievement_highlights;
    highlights.extend(streaks);
    highlights.extend(changes);
    highlights.truncate(limits.max_highlights);

    let active_ids: Vec<&str> = sources
        .activity_types
        .iter()
        .filter(|t| t.is_active())
        .map(|t| t.id.as_str())
        .collect();
    let goal_count = sources
        .goals
        .iter()
        .filter(|g| active_ids.contains(&g.activity_type_id.as_str()))
        .count();

    CheckInContext {
        window: *window,
        assessment: *assessment,
        activities,
        omitted_activity_count,
        highlights,
        voice_notes: summarize_voice_notes(&sources.voice_notes, window, limits),
        goal_count,
        achievement_count,
    }
}

impl CheckInContext {
    /// Compact audit record persisted alongside the analysis.
    pub fn data_summary(&self, resource_count: usize) -> CheckInDataSummary {
        CheckInDataSummary {
            data_state: self.assessment.state,
            active_type_count: self.assessment.active_type_count,
            days_with_entries: self.assessment.days_with_entries,
            total_entries: self.assessment.total_entries,
            voice_note_count: self.voice_notes.count,
            goal_count: self.goal_count,
            achievement_count: self.achievement_count,
            resource_count,
        }
    }
}

fn trend_signal(
    days: &DailyValues,
    window: &CheckInWindow,
    is_negative: bool,
    policy: &TrendPolicy,
) -> TrendSignal {
    let midpoint = window.midpoint();
    let first = mean(days.range(..midpoint).map(|(_, v)| *v));
    let second = mean(days.range(midpoint..).map(|(_, v)| *v));

    let (Some(first), Some(second)) = (first, second) else {
        return TrendSignal {
            direction: TrendDirection::InsufficientData,
            first_half_average: first.map(round2),
            second_half_average: second.map(round2),
            change_pct: None,
            is_improvement: None,
            summary: "not enough entries in both halves of the window to judge a trend"
                .to_string(),
        };
    };

    let change = percent_change(first, second);
    let direction = if change.abs() < policy.stable_band_pct {
        TrendDirection::Stable
    } else if change > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };
    let is_improvement = match direction {
        TrendDirection::Increasing => Some(!is_negative),
        TrendDirection::Decreasing => Some(is_negative),
        _ => None,
    };
    let verdict = match is_improvement {
        Some(true) => " (an improvement)",
        Some(false) => " (worth watching)",
        None => "",
    };
    let summary = match direction {
        TrendDirection::Increasing => format!(
            "up {:.1}% from the first half of the window{}",
            change.abs(),
            verdict
        ),
        TrendDirection::Decreasing => format!(
            "down {:.1}% from the first half of the window{}",
            change.abs(),
            verdict
        ),
        _ => format!(
            "steady, within {:.0}% between the two halves of the window",
            policy.stable_band_pct
        ),
    };

    TrendSignal {
        direction,
        first_half_average: Some(round2(first)),
        second_half_average: Some(round2(second)),
        change_pct: Some(round2(change)),
        is_improvement,
        summary,
    }
}

/// Longest run of consecutive dates, with the date it ended on.
///
/// On ties the most recent run wins.
fn longest_streak(days: &DailyValues) -> Option<(u32, NaiveDate)> {
    let mut best: Option<(u32, NaiveDate)> = None;
    let mut current = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for &date in days.keys() {
        current = match previous {
            Some(prev) if date - prev == Duration::days(1) => current + 1,
            _ => 1,
        };
        if best.map_or(true, |(length, _)| current >= length) {
            best = Some((current, date));
        }
        previous = Some(date);
    }
    best
}

struct WeeklyChange {
    pct: f64,
    from_week_start: NaiveDate,
    to_week_start: NaiveDate,
}

/// Largest-magnitude change between consecutive weekly totals.
///
/// Weeks whose predecessor totals zero are skipped.
fn largest_weekly_change(days: &DailyValues, window: &CheckInWindow) -> Option<WeeklyChange> {
    let buckets = window.weekly_buckets();
    let totals: Vec<f64> = buckets
        .iter()
        .map(|bucket| days.range(bucket.start..=bucket.end).map(|(_, v)| *v).sum())
        .collect();

    let mut best: Option<WeeklyChange> = None;
    for i in 1..buckets.len() {
        let previous = totals[i - 1];
        if previous <= 0.0 {
            continue;
        }
        let pct = (totals[i] - previous) / previous * 100.0;
        if best.as_ref().map_or(true, |b| pct.abs() >= b.pct.abs()) {
            best = Some(WeeklyChange {
                pct,
                from_week_start: buckets[i - 1].start,
                to_week_start: buckets[i].start,
            });
        }
    }
    best
}

fn goal_progress(
    goal: &Goal,
    days: &DailyValues,
    window: &CheckInWindow,
    polarity: GoalPolarity,
) -> GoalProgress {
    let periods: Vec<CheckInWindow> = match goal.date_type {
        GoalDateType::Daily => window
            .dates()
            .map(|date| CheckInWindow {
                start: date,
                end: date,
            })
            .collect(),
        GoalDateType::Weekly => window.weekly_buckets(),
        GoalDateType::Monthly => vec![*window],
        GoalDateType::ByDate => {
            let start = goal
                .start_date
                .unwrap_or_else(|| goal.created_at.date_naive());
            let end = goal.target_date.unwrap_or(window.end);
            window.clip(start, end).into_iter().collect()
        }
        GoalDateType::DateRange => {
            let start = goal.start_date.unwrap_or(window.start);
            let end = goal.end_date.unwrap_or(window.end);
            window.clip(start, end).into_iter().collect()
        }
    };

    let mut periods_evaluated = 0;
    let mut periods_met = 0;
    for period in &periods {
        let values: Vec<f64> = days
            .range(period.start..=period.end)
            .map(|(_, v)| *v)
            .collect();
        if values.is_empty() {
            continue;
        }
        let value = match goal.tracking_type {
            TrackingType::Absolute => values.iter().sum(),
            TrackingType::Average => values.iter().sum::<f64>() / values.len() as f64,
        };
        periods_evaluated += 1;
        let met = match polarity {
            GoalPolarity::AtLeast => value >= goal.target_value,
            GoalPolarity::AtMost => value <= goal.target_value,
        };
        if met {
            periods_met += 1;
        }
    }

    GoalProgress {
        goal_id: goal.id.clone(),
        name: goal.name.clone(),
        icon: goal.icon.clone(),
        date_type: goal.date_type,
        tracking_type: goal.tracking_type,
        target_value: goal.target_value,
        periods_evaluated,
        periods_met,
        completion_rate: (periods_evaluated > 0)
            .then(|| round2(periods_met as f64 / periods_evaluated as f64)),
    }
}

/// Achievements whose whole period lies in the window, most recent first.
///
/// Returns the capped highlights and the uncapped count.
fn achievement_highlights(
    achievements: &[Achievement],
    goals: &[Goal],
    window: &CheckInWindow,
    limits: &ContextLimits,
) -> (Vec<Highlight>, usize) {
    let goals_by_id: HashMap<&str, &Goal> = goals.iter().map(|g| (g.id.as_str(), g)).collect();

    let mut inside: Vec<&Achievement> = achievements
        .iter()
        .filter(|a| window.contains(a.period_start) && window.contains(a.period_end))
        .collect();
    inside.sort_by(|a, b| {
        b.achieved_at
            .cmp(&a.achieved_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    let count = inside.len();

    let highlights = inside
        .into_iter()
        .take(limits.max_achievements)
        .map(|achievement| {
            let goal = goals_by_id.get(achievement.goal_id.as_str());
            Highlight::Achievement {
                goal_id: achievement.goal_id.clone(),
                goal_name: goal.map(|g| g.name.clone()),
                icon: goal.and_then(|g| g.icon.clone()),
                period_start: achievement.period_start,
                period_end: achievement.period_end,
                achieved_value: achievement.achieved_value,
                target_value: achievement.target_value,
                achieved_at: achievement.achieved_at,
            }
        })
        .collect();

    (highlights, count)
}

fn summarize_voice_notes(
    voice_notes: &[VoiceNote],
    window: &CheckInWindow,
    limits: &ContextLimits,
) -> VoiceNoteSummary {
    let mut notes: Vec<&VoiceNote> = voice_notes
        .iter()
        .filter(|n| window.contains(n.date))
        .collect();
    notes.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let transcribed: Vec<&VoiceNote> = notes
        .iter()
        .copied()
        .filter(|n| n.transcription.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .collect();

    let dates = most_recent(notes.iter().map(|n| n.date), limits.max_voice_note_dates);

    let suggestions = most_recent(
        notes.iter().copied().flat_map(|note| {
            note.extracted_activities
                .iter()
                .flatten()
                .map(move |activity| VoiceNoteSuggestion {
                    date: note.date,
                    activity: activity.clone(),
                })
        }),
        limits.max_suggestions,
    );

    // Case-insensitive dedupe; the first spelling seen is kept.
    let mut themes: BTreeMap<String, String> = BTreeMap::new();
    for activity in notes
        .iter()
        .copied()
        .flat_map(|n| n.extracted_activities.iter().flatten())
    {
        let name = activity.activity_name.trim();
        if !name.is_empty() {
            themes
                .entry(name.to_lowercase())
                .or_insert_with(|| name.to_string());
        }
    }

    let excerpts = most_recent(
        transcribed.iter().map(|note| VoiceNoteExcerpt {
            date: note.date,
            text: truncate_chars(
                note.transcription.as_deref().unwrap_or_default(),
                limits.excerpt_chars,
            ),
        }),
        limits.max_excerpts,
    );

    VoiceNoteSummary {
        count: notes.len(),
        transcribed_count: transcribed.len(),
        dates,
        themes: themes.into_values().take(limits.max_suggestions).collect(),
        suggestions,
        excerpts,
    }
}

/// Keeps the last `max` items of a chronological sequence, still in chronological order.
fn most_recent<T>(items: impl Iterator<Item = T>, max: usize) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    if items.len() > max {
        items.drain(..items.len() - max);
    }
    items
}

fn truncate_chars(text: &str, max: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        if to > 0.0 {
            100.0
        } else if to < 0.0 {
            -100.0
        } else {
            0.0
        }
    } else {
        (to - from) / from.abs() * 100.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
