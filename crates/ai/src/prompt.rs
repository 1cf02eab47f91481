//! Prompt assembly for check-in generation.

use once_cell::sync::Lazy;
use serde::Serialize;

use cadence_core::checkins::{CheckInContext, CheckInResource, DataState};

use crate::error::CheckInError;

static SYSTEM_PROMPT: Lazy<&'static str> = Lazy::new(|| include_str!("checkin_prompt.txt").trim());

/// How confident the narrative may be for a given data state.
pub fn tone_guidance(state: DataState) -> &'static str {
    match state {
        DataState::NoActivityTypes => {
            "The person has not set up any activities yet. Keep it brief and encouraging."
        }
        DataState::InsufficientData => {
            "There are only a few days of data. Do not claim trends or patterns; focus on \
             getting started and on building a tracking habit."
        }
        DataState::BuildingBaseline => {
            "The person is building a baseline. Mention trends cautiously and frame them \
             as early signals, not conclusions."
        }
        DataState::Sufficient => {
            "There is enough data for confident observations. Be specific about trends, \
             streaks and goal progress."
        }
    }
}

/// System preamble: fixed instructions for the context's window, plus tone
/// for its data state.
pub fn system_preamble(context: &CheckInContext) -> String {
    let instructions = SYSTEM_PROMPT.replace("{window_days}", &context.window.days().to_string());
    format!(
        "{}\n\nTone: {}",
        instructions,
        tone_guidance(context.assessment.state)
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptPayload<'a> {
    context: &'a CheckInContext,
    resources: &'a [CheckInResource],
}

/// User message: the compiled context and the resources, as JSON.
pub fn user_prompt(
    context: &CheckInContext,
    resources: &[CheckInResource],
) -> Result<String, CheckInError> {
    let payload = serde_json::to_string_pretty(&PromptPayload { context, resources })
        .map_err(|e| CheckInError::internal(format!("failed to serialize context: {}", e)))?;
    Ok(format!(
        "Here is my data for {} to {}:\n\n{}\n\nWrite my check-in.",
        context.window.start, context.window.end, payload
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::env::test_env::empty_context;
    use cadence_core::checkins::CheckInWindow;

    #[test]
    fn preamble_includes_schema_and_tone() {
        let mut context = empty_context();
        context.assessment.state = DataState::BuildingBaseline;
        let preamble = system_preamble(&context);
        assert!(preamble.contains("\"weeklyFocus\""));
        assert!(preamble.contains("cautiously"));
        assert!(preamble.contains("last 30 days"));
    }

    #[test]
    fn preamble_names_the_configured_window() {
        let mut context = empty_context();
        context.window = CheckInWindow::ending_on(context.window.end, 14);
        let preamble = system_preamble(&context);
        assert!(preamble.contains("last 14 days"));
        assert!(!preamble.contains("{window_days}"));
    }

    #[test]
    fn every_state_has_distinct_tone() {
        let states = [
            DataState::NoActivityTypes,
            DataState::InsufficientData,
            DataState::BuildingBaseline,
            DataState::Sufficient,
        ];
        let tones: std::collections::HashSet<_> = states.iter().map(|s| tone_guidance(*s)).collect();
        assert_eq!(tones.len(), states.len());
    }
}
