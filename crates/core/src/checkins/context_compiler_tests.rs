#[cfg(test)]
mod tests {
    use crate::activities::{ActivityEntry, ActivityType, GoalPolarity, UiType};
    use crate::checkins::{
        assess_data_state, compile_context, CheckInPolicy, CheckInSources, CheckInWindow,
        ContextLimits, DataState, Highlight, TrendDirection,
    };
    use crate::goals::{Achievement, Goal, GoalDateType, TrackingType};
    use crate::voice_notes::{ExtractedActivity, VoiceNote};
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    // --- Fixtures ---

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap()
    }

    fn window() -> CheckInWindow {
        CheckInWindow::ending_on(NaiveDate::from_ymd_opt(2026, 3, 30).unwrap(), 30)
    }

    /// Date `offset` days after the window start.
    fn day(offset: i64) -> NaiveDate {
        window().start + Duration::days(offset)
    }

    fn activity_type(id: &str, name: &str, is_negative: bool, order: i32) -> ActivityType {
        ActivityType {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            name: name.to_string(),
            unit: Some("units".to_string()),
            ui_type: UiType::Increment,
            min_value: None,
            max_value: None,
            step: None,
            is_negative,
            goal_polarity: if is_negative {
                GoalPolarity::AtMost
            } else {
                GoalPolarity::AtLeast
            },
            is_deleted: false,
            display_order: order,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn entry(type_id: &str, date: NaiveDate, value: f64) -> ActivityEntry {
        ActivityEntry {
            id: format!("{}-{}", type_id, date),
            user_id: "user-1".to_string(),
            activity_type_id: type_id.to_string(),
            date,
            value,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn goal(id: &str, type_id: &str, date_type: GoalDateType, target: f64) -> Goal {
        Goal {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            activity_type_id: type_id.to_string(),
            name: format!("Goal {}", id),
            target_value: target,
            icon: Some("🏃".to_string()),
            date_type,
            tracking_type: TrackingType::Absolute,
            target_date: None,
            start_date: None,
            end_date: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn voice_note(date: NaiveDate, transcription: Option<&str>, names: &[&str]) -> VoiceNote {
        VoiceNote {
            id: format!("note-{}", date),
            user_id: "user-1".to_string(),
            date,
            audio_url: format!("https://audio.example.com/{}.m4a", date),
            duration_seconds: 42.0,
            transcription: transcription.map(str::to_string),
            extracted_activities: if names.is_empty() {
                None
            } else {
                Some(
                    names
                        .iter()
                        .map(|name| ExtractedActivity {
                            activity_type_id: None,
                            activity_name: name.to_string(),
                            value: Some(1.0),
                            confidence: Some(0.8),
                        })
                        .collect(),
                )
            },
            created_at: ts(),
        }
    }

    fn compile(sources: &CheckInSources) -> crate::checkins::CheckInContext {
        let policy = CheckInPolicy::default();
        let assessment = assess_data_state(
            &sources.activity_types,
            &sources.entries,
            &window(),
            &policy.thresholds,
        );
        compile_context(&assessment, sources, &window(), &policy)
    }

    // --- Per-type statistics ---

    #[test]
    fn computes_count_sum_and_mean() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("steps", "Steps", false, 0)],
            entries: vec![
                entry("steps", day(0), 1000.0),
                entry("steps", day(1), 2000.0),
                entry("steps", day(20), 3000.0),
            ],
            ..Default::default()
        };

        let context = compile(&sources);
        let steps = &context.activities[0];
        assert_eq!(steps.entry_count, 3);
        assert_eq!(steps.total, 6000.0);
        assert_eq!(steps.average, 2000.0);
        assert_eq!(context.assessment.state, DataState::BuildingBaseline);
    }

    #[test]
    fn rising_positive_type_is_an_improvement() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("steps", "Steps", false, 0)],
            entries: vec![entry("steps", day(2), 100.0), entry("steps", day(25), 200.0)],
            ..Default::default()
        };

        let trend = &compile(&sources).activities[0].trend;
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.change_pct, Some(100.0));
        assert_eq!(trend.is_improvement, Some(true));
        assert!(trend.summary.starts_with("up 100.0%"));
    }

    #[test]
    fn falling_negative_type_is_phrased_as_improvement() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("smokes", "Cigarettes", true, 0)],
            entries: vec![entry("smokes", day(1), 10.0), entry("smokes", day(28), 5.0)],
            ..Default::default()
        };

        let trend = &compile(&sources).activities[0].trend;
        assert_eq!(trend.direction, TrendDirection::Decreasing);
        assert_eq!(trend.is_improvement, Some(true));
        assert!(trend.summary.contains("an improvement"));
    }

    #[test]
    fn small_changes_are_stable() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("water", "Water", false, 0)],
            entries: vec![entry("water", day(1), 100.0), entry("water", day(28), 102.0)],
            ..Default::default()
        };

        let trend = &compile(&sources).activities[0].trend;
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.is_improvement, None);
    }

    #[test]
    fn one_sided_data_has_no_trend() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("water", "Water", false, 0)],
            entries: vec![entry("water", day(20), 3.0), entry("water", day(21), 3.0)],
            ..Default::default()
        };

        let trend = &compile(&sources).activities[0].trend;
        assert_eq!(trend.direction, TrendDirection::InsufficientData);
        assert_eq!(trend.first_half_average, None);
        assert_eq!(trend.second_half_average, Some(3.0));
    }

    // --- Goals ---

    #[test]
    fn daily_goal_completion_counts_tracked_days() {
        let mut types = vec![activity_type("steps", "Steps", false, 0)];
        types[0].goal_polarity = GoalPolarity::AtLeast;
        let sources = CheckInSources {
            activity_types: types,
            entries: vec![
                entry("steps", day(0), 10000.0),
                entry("steps", day(1), 4000.0),
                entry("steps", day(2), 12000.0),
                entry("steps", day(3), 8000.0),
            ],
            goals: vec![goal("g1", "steps", GoalDateType::Daily, 8000.0)],
            ..Default::default()
        };

        let progress = &compile(&sources).activities[0].goals[0];
        assert_eq!(progress.periods_evaluated, 4);
        assert_eq!(progress.periods_met, 3);
        assert_eq!(progress.completion_rate, Some(0.75));
    }

    #[test]
    fn at_most_goal_is_met_by_staying_under_target() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("smokes", "Cigarettes", true, 0)],
            entries: vec![entry("smokes", day(29), 2.0), entry("smokes", day(28), 6.0)],
            goals: vec![goal("g1", "smokes", GoalDateType::Weekly, 10.0)],
            ..Default::default()
        };

        let progress = &compile(&sources).activities[0].goals[0];
        assert_eq!(progress.periods_evaluated, 1);
        assert_eq!(progress.periods_met, 1);
    }

    #[test]
    fn goal_direction_follows_polarity_not_negativity() {
        let mut types = vec![activity_type("cravings", "Cravings resisted", true, 0)];
        types[0].goal_polarity = GoalPolarity::AtLeast;
        let sources = CheckInSources {
            activity_types: types,
            entries: vec![entry("cravings", day(29), 2.0), entry("cravings", day(28), 6.0)],
            goals: vec![goal("g1", "cravings", GoalDateType::Weekly, 10.0)],
            ..Default::default()
        };

        let progress = &compile(&sources).activities[0].goals[0];
        assert_eq!(progress.periods_evaluated, 1);
        assert_eq!(progress.periods_met, 0);
        assert_eq!(progress.completion_rate, Some(0.0));
    }

    #[test]
    fn goal_without_entries_has_no_completion_rate() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("steps", "Steps", false, 0)],
            goals: vec![goal("g1", "steps", GoalDateType::Monthly, 100.0)],
            ..Default::default()
        };

        let progress = &compile(&sources).activities[0].goals[0];
        assert_eq!(progress.periods_evaluated, 0);
        assert_eq!(progress.completion_rate, None);
    }

    // --- Highlights ---

    #[test]
    fn longest_streak_is_highlighted() {
        let mut entries: Vec<ActivityEntry> =
            (5..10).map(|d| entry("steps", day(d), 1.0)).collect();
        entries.push(entry("steps", day(12), 1.0));
        let sources = CheckInSources {
            activity_types: vec![activity_type("steps", "Steps", false, 0)],
            entries,
            ..Default::default()
        };

        let context = compile(&sources);
        assert_eq!(context.activities[0].longest_streak_days, 5);
        assert!(context.highlights.iter().any(|h| matches!(
            h,
            Highlight::Streak { days: 5, ended_on, .. } if *ended_on == day(9)
        )));
    }

    #[test]
    fn week_over_week_change_is_highlighted() {
        let buckets = window().weekly_buckets();
        let sources = CheckInSources {
            activity_types: vec![activity_type("run", "Running", false, 0)],
            entries: vec![
                entry("run", buckets[2].start, 10.0),
                entry("run", buckets[3].start, 25.0),
            ],
            ..Default::default()
        };

        let context = compile(&sources);
        let change = context
            .highlights
            .iter()
            .find_map(|h| match h {
                Highlight::Change {
                    change_pct,
                    is_improvement,
                    to_week_start,
                    ..
                } => Some((*change_pct, *is_improvement, *to_week_start)),
                _ => None,
            })
            .expect("change highlight");
        assert_eq!(change, (150.0, true, buckets[3].start));
    }

    #[test]
    fn achievements_inside_window_are_enriched_and_first() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("steps", "Steps", false, 0)],
            entries: (0..5).map(|d| entry("steps", day(d), 1.0)).collect(),
            goals: vec![goal("g1", "steps", GoalDateType::Weekly, 5.0)],
            achievements: vec![
                Achievement {
                    id: "a-in".to_string(),
                    user_id: "user-1".to_string(),
                    goal_id: "g1".to_string(),
                    period_start: day(7),
                    period_end: day(13),
                    achieved_value: 6.0,
                    target_value: 5.0,
                    achieved_at: ts(),
                },
                Achievement {
                    id: "a-straddles".to_string(),
                    user_id: "user-1".to_string(),
                    goal_id: "g1".to_string(),
                    period_start: window().start - Duration::days(3),
                    period_end: day(3),
                    achieved_value: 6.0,
                    target_value: 5.0,
                    achieved_at: ts(),
                },
            ],
            ..Default::default()
        };

        let context = compile(&sources);
        assert_eq!(context.achievement_count, 1);
        match &context.highlights[0] {
            Highlight::Achievement {
                goal_name, icon, ..
            } => {
                assert_eq!(goal_name.as_deref(), Some("Goal g1"));
                assert_eq!(icon.as_deref(), Some("🏃"));
            }
            other => panic!("expected achievement first, got {:?}", other),
        }
    }

    // --- Voice notes ---

    #[test]
    fn voice_notes_pass_suggestions_through() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("steps", "Steps", false, 0)],
            voice_notes: vec![
                voice_note(day(3), Some("Walked to work"), &["Walking", "walking"]),
                voice_note(day(1), None, &["Meditation"]),
                voice_note(window().start - Duration::days(1), Some("old"), &["Old"]),
            ],
            ..Default::default()
        };

        let summary = compile(&sources).voice_notes;
        assert_eq!(summary.count, 2);
        assert_eq!(summary.transcribed_count, 1);
        assert_eq!(summary.dates, vec![day(1), day(3)]);
        assert_eq!(summary.suggestions.len(), 3);
        assert_eq!(summary.suggestions[0].activity.activity_name, "Meditation");
        assert_eq!(summary.themes, vec!["Meditation".to_string(), "Walking".to_string()]);
        assert_eq!(summary.excerpts[0].text, "Walked to work");
    }

    // --- Bounds & determinism ---

    #[test]
    fn lists_are_capped() {
        let types: Vec<ActivityType> = (0..30)
            .map(|i| activity_type(&format!("t{:02}", i), &format!("Type {:02}", i), false, i))
            .collect();
        let entries: Vec<ActivityEntry> = types
            .iter()
            .flat_map(|t| (0..30).map(move |d| entry(&t.id, day(d), 1.0)))
            .collect();
        let notes: Vec<VoiceNote> = (0..30)
            .map(|d| voice_note(day(d), Some("x".repeat(1000).as_str()), &["A", "B"]))
            .collect();
        let sources = CheckInSources {
            activity_types: types,
            entries,
            voice_notes: notes,
            ..Default::default()
        };

        let limits = ContextLimits::default();
        let context = compile(&sources);
        assert_eq!(context.activities.len(), limits.max_activity_types);
        assert_eq!(context.omitted_activity_count, 10);
        assert!(context.highlights.len() <= limits.max_highlights);
        assert_eq!(context.voice_notes.suggestions.len(), limits.max_suggestions);
        assert_eq!(context.voice_notes.excerpts.len(), limits.max_excerpts);
        assert!(context.voice_notes.excerpts[0].text.chars().count() <= limits.excerpt_chars + 3);
        // The most recent notes are kept.
        assert_eq!(context.voice_notes.suggestions.last().unwrap().date, day(29));
    }

    #[test]
    fn types_with_data_are_listed_before_empty_ones() {
        let sources = CheckInSources {
            activity_types: vec![
                activity_type("a", "Alpha", false, 0),
                activity_type("b", "Beta", false, 1),
            ],
            entries: vec![entry("b", day(4), 1.0)],
            ..Default::default()
        };

        let context = compile(&sources);
        assert_eq!(context.activities[0].activity_type_id, "b");
        assert_eq!(context.activities[1].entry_count, 0);
    }

    #[test]
    fn compiling_twice_is_identical() {
        let sources = CheckInSources {
            activity_types: vec![
                activity_type("steps", "Steps", false, 0),
                activity_type("smokes", "Cigarettes", true, 1),
            ],
            entries: (0..30)
                .flat_map(|d| {
                    vec![
                        entry("steps", day(d), (d * 100) as f64),
                        entry("smokes", day(d), (30 - d) as f64),
                    ]
                })
                .collect(),
            voice_notes: vec![voice_note(day(10), Some("Felt good"), &["Steps"])],
            goals: vec![goal("g1", "steps", GoalDateType::Weekly, 1000.0)],
            ..Default::default()
        };

        let first = compile(&sources);
        let second = compile(&sources);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn data_summary_mirrors_context() {
        let sources = CheckInSources {
            activity_types: vec![activity_type("steps", "Steps", false, 0)],
            entries: (0..10).map(|d| entry("steps", day(d), 1.0)).collect(),
            voice_notes: vec![voice_note(day(2), None, &[])],
            ..Default::default()
        };

        let summary = compile(&sources).data_summary(2);
        assert_eq!(summary.data_state, DataState::Sufficient);
        assert_eq!(summary.days_with_entries, 10);
        assert_eq!(summary.voice_note_count, 1);
        assert_eq!(summary.resource_count, 2);
    }
}
