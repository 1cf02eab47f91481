//! Status events streamed to the caller during a check-in run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::checkins::{CheckIn, PartialCheckInAnalysis};

use crate::error::CheckInError;

/// Pipeline stage, in the order a successful run passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    CheckingRateLimit,
    AggregatingData,
    Analyzing,
    Searching,
    StreamingContent,
    Saving,
    Complete,
    Error,
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Complete | GenerationStatus::Error)
    }
}

/// One `data: {json}` line on the status channel.
///
/// `error` events carry `statusCode` and `code`; `streaming_content` events
/// carry `partialAnalysis`; `complete` carries `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInStreamEvent {
    pub status: GenerationStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_available_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_analysis: Option<PartialCheckInAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CheckIn>,
}

impl CheckInStreamEvent {
    /// Create a stage transition event.
    pub fn progress(status: GenerationStatus, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            status_code: None,
            code: None,
            next_available_at: None,
            partial_analysis: None,
            data: None,
        }
    }

    /// Create a partial content event.
    pub fn partial(partial: PartialCheckInAnalysis) -> Self {
        Self {
            partial_analysis: Some(partial),
            ..Self::progress(GenerationStatus::StreamingContent, "Writing your check-in")
        }
    }

    /// Create the terminal success event.
    pub fn complete(check_in: CheckIn) -> Self {
        Self {
            data: Some(check_in),
            ..Self::progress(GenerationStatus::Complete, "Your check-in is ready")
        }
    }

    /// Create the terminal error event for `err`.
    pub fn error(err: &CheckInError) -> Self {
        Self {
            status_code: Some(err.status_code()),
            code: Some(err.code().to_string()),
            next_available_at: err.next_available_at(),
            ..Self::progress(GenerationStatus::Error, &err.to_string())
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn progress_event_has_only_status_and_message() {
        let event = CheckInStreamEvent::progress(GenerationStatus::AggregatingData, "Gathering");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "status": "aggregating_data", "message": "Gathering" })
        );
    }

    #[test]
    fn rate_limit_error_carries_classifier_and_date() {
        let next = Utc.with_ymd_and_hms(2026, 6, 12, 8, 0, 0).unwrap();
        let event = CheckInStreamEvent::error(&CheckInError::RateLimited {
            next_available_at: next,
        });
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["statusCode"], 429);
        assert_eq!(value["code"], "RATE_LIMITED");
        assert_eq!(value["nextAvailableAt"], "2026-06-12T08:00:00Z");
        assert!(event.is_terminal());
    }

    #[test]
    fn partial_event_uses_camel_case_fields() {
        let event = CheckInStreamEvent::partial(PartialCheckInAnalysis {
            overall_summary: Some("You".to_string()),
            ..Default::default()
        });
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["status"], "streaming_content");
        assert_eq!(value["partialAnalysis"], json!({ "overallSummary": "You" }));
        assert!(!event.is_terminal());
    }
}
