//! Check-in orchestration.
//!
//! One run walks `checking_rate_limit → aggregating_data → analyzing →
//! searching → streaming_content → saving → complete`, or stops at the first
//! hard failure with a single `error` event. Every event goes onto the run's
//! status channel, which the caller consumes as a stream.

use futures::stream::BoxStream;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use cadence_core::checkins::{
    assess_data_state, check_rate_limit, compile_context, CheckIn, CheckInEligibility,
    CheckInSources, CheckInWindow, DataState, NewCheckIn, PartialCheckInAnalysis,
    RateLimitDecision,
};

use crate::channel::StatusChannel;
use crate::env::CheckInEnvironment;
use crate::error::CheckInError;
use crate::generator::GenerationRequest;
use crate::run_guard::RunGuards;
use crate::types::{CheckInStreamEvent, GenerationStatus};

/// Default page size for check-in history.
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Check-in service. Runs the generation pipeline and serves history.
pub struct CheckInService<E: CheckInEnvironment + 'static> {
    env: Arc<E>,
    run_guards: RunGuards,
}

impl<E: CheckInEnvironment + 'static> CheckInService<E> {
    pub fn new(env: Arc<E>) -> Self {
        Self {
            env,
            run_guards: RunGuards::new(),
        }
    }

    /// Starts a run and returns its status events.
    ///
    /// The stream always ends with exactly one `complete` or `error` event.
    /// The run keeps going if the stream is dropped early.
    pub fn generate(&self, user_id: Option<String>) -> BoxStream<'static, CheckInStreamEvent> {
        let (tx, rx) = mpsc::unbounded_channel::<CheckInStreamEvent>();
        let channel = StatusChannel::new(tx);
        let env = self.env.clone();
        let run_guards = self.run_guards.clone();

        tokio::spawn(async move {
            match run_pipeline(env, run_guards, user_id.as_deref(), &channel).await {
                Ok(check_in) => {
                    info!(
                        "Check-in {} completed for user {}",
                        check_in.id, check_in.user_id
                    );
                    channel.finish(CheckInStreamEvent::complete(check_in));
                }
                Err(e) => {
                    if e.status_code() < 500 {
                        warn!("Check-in rejected: {}", e);
                    } else {
                        error!("Check-in run failed: {}", e);
                    }
                    channel.finish(CheckInStreamEvent::error(&e));
                }
            }
        });

        Box::pin(UnboundedReceiverStream::new(rx))
    }

    /// Whether the user may start a run now.
    pub fn eligibility(&self, user_id: &str) -> Result<CheckInEligibility, CheckInError> {
        let last = self
            .env
            .check_in_repository()
            .get_latest_completed_at(user_id)?;
        let decision = check_rate_limit(last, self.env.now(), self.env.policy().cooldown());
        Ok(CheckInEligibility::from_decision(decision, last))
    }

    /// Most recent check-ins first.
    pub fn list_check_ins(&self, user_id: &str, limit: i64) -> Result<Vec<CheckIn>, CheckInError> {
        Ok(self
            .env
            .check_in_repository()
            .list_check_ins(user_id, limit)?)
    }

    pub fn get_check_in(
        &self,
        user_id: &str,
        check_in_id: &str,
    ) -> Result<Option<CheckIn>, CheckInError> {
        Ok(self
            .env
            .check_in_repository()
            .get_check_in(user_id, check_in_id)?)
    }

    pub fn is_running(&self, user_id: &str) -> bool {
        self.run_guards.is_running(user_id)
    }
}

async fn run_pipeline<E: CheckInEnvironment + 'static>(
    env: Arc<E>,
    run_guards: RunGuards,
    user_id: Option<&str>,
    channel: &StatusChannel,
) -> Result<CheckIn, CheckInError> {
    let user_id = match user_id {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => return Err(CheckInError::Unauthorized),
    };
    let policy = env.policy();
    policy.validate()?;

    // 1. Cooldown
    channel.status(
        GenerationStatus::CheckingRateLimit,
        "Checking when you last checked in",
    );
    let _guard = run_guards
        .try_acquire(&user_id)
        .ok_or(CheckInError::RunInProgress)?;

    let now = env.now();
    let check_ins = env.check_in_repository();
    let last = {
        let check_ins = check_ins.clone();
        let user_id = user_id.clone();
        fetch("check-in history", move || {
            check_ins.get_latest_completed_at(&user_id)
        })
        .await?
    };
    if let RateLimitDecision::CoolingDown {
        next_available_at, ..
    } = check_rate_limit(last, now, policy.cooldown())
    {
        return Err(CheckInError::RateLimited { next_available_at });
    }

    // 2. Sources
    channel.status(
        GenerationStatus::AggregatingData,
        &format!("Gathering your last {} days", policy.window_days),
    );
    let window = CheckInWindow::ending_on(now.date_naive(), policy.window_days);
    let sources = load_sources(env.as_ref(), &user_id, &window).await?;
    debug!(
        "Loaded {} types, {} entries, {} voice notes, {} goals, {} achievements",
        sources.activity_types.len(),
        sources.entries.len(),
        sources.voice_notes.len(),
        sources.goals.len(),
        sources.achievements.len()
    );

    let assessment = assess_data_state(
        &sources.activity_types,
        &sources.entries,
        &window,
        &policy.thresholds,
    );
    if assessment.state == DataState::NoActivityTypes {
        return Err(CheckInError::NoActivityTypes);
    }

    // 3. Context
    channel.status(GenerationStatus::Analyzing, "Looking for patterns");
    let context = compile_context(&assessment, &sources, &window, &policy);
    info!(
        "Check-in for user {} assessed as {}",
        user_id,
        assessment.state.as_str()
    );

    // 4. Resources (best effort)
    channel.status(GenerationStatus::Searching, "Finding helpful resources");
    let resources = match env.resource_searcher().search(&context).await {
        Ok(resources) => resources,
        Err(e) => {
            warn!("Resource search failed, continuing without resources: {}", e);
            Vec::new()
        }
    };

    // 5. Generation
    let mut relay = channel.relay();
    let mut analysis = env
        .generator()
        .generate(
            GenerationRequest {
                context: &context,
                resources: &resources,
            },
            &mut relay,
        )
        .await
        .map_err(CheckInError::into_generation_failure)?;
    if analysis.overall_summary.trim().is_empty() {
        return Err(CheckInError::generation("the analysis has no summary"));
    }
    analysis.resources = resources;
    relay.push(PartialCheckInAnalysis::from(analysis.clone()));
    drop(relay);

    // 6. Persist
    channel.status(GenerationStatus::Saving, "Saving your check-in");
    let new_check_in = NewCheckIn {
        id: None,
        user_id,
        period_start: window.start,
        period_end: window.end,
        data_summary: context.data_summary(analysis.resources.len()),
        analysis,
        created_at: env.now(),
    };
    check_ins
        .insert_check_in(new_check_in)
        .await
        .map_err(|e| CheckInError::Persistence(e.to_string()))
}

/// Reads the five sources concurrently. Any failure fails the whole load.
async fn load_sources<E: CheckInEnvironment>(
    env: &E,
    user_id: &str,
    window: &CheckInWindow,
) -> Result<CheckInSources, CheckInError> {
    let (start, end) = (window.start, window.end);

    let types_repo = env.activity_type_repository();
    let entries_repo = env.activity_entry_repository();
    let notes_repo = env.voice_note_repository();
    let goals_repo = env.goal_repository();
    let achievements_repo = env.achievement_repository();

    let (u1, u2, u3, u4, u5) = (
        user_id.to_string(),
        user_id.to_string(),
        user_id.to_string(),
        user_id.to_string(),
        user_id.to_string(),
    );

    let (activity_types, entries, voice_notes, goals, achievements) = tokio::try_join!(
        fetch("activity types", move || types_repo
            .load_active_activity_types(&u1)),
        fetch("activity entries", move || entries_repo
            .load_entries_in_range(&u2, start, end)),
        fetch("voice notes", move || notes_repo
            .load_voice_notes_in_range(&u3, start, end)),
        fetch("goals", move || goals_repo.load_goals(&u4)),
        fetch("achievements", move || achievements_repo
            .load_achievements_in_range(&u5, start, end)),
    )?;

    Ok(CheckInSources {
        activity_types,
        entries,
        voice_notes,
        goals,
        achievements,
    })
}

/// Runs a blocking repository read off the async runtime.
async fn fetch<T, F>(what: &'static str, load: F) -> Result<T, CheckInError>
where
    T: Send + 'static,
    F: FnOnce() -> cadence_core::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(load)
        .await
        .map_err(|e| CheckInError::internal(format!("loading {} panicked: {}", what, e)))?
        .map_err(|e| CheckInError::DataFetch {
            what,
            message: e.to_string(),
        })
}

