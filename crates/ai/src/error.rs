//! Check-in generation error types.

use chrono::{DateTime, Utc};
use thiserror::Error;
use cadence_core::Error as CoreError;

/// Errors a check-in run can end with.
///
/// Every variant except [`CheckInError::Search`] terminates the run and is
/// surfaced to the caller as a single `error` event.
#[derive(Debug, Error)]
pub enum CheckInError {
    /// No caller identity.
    #[error("You need to be signed in to generate a check-in")]
    Unauthorized,

    /// Cooldown is active.
    #[error("You can generate your next check-in on {}", format_available_date(.next_available_at))]
    RateLimited { next_available_at: DateTime<Utc> },

    /// Another run for the same user is still in flight.
    #[error("A check-in is already being generated")]
    RunInProgress,

    /// The user has nothing to analyze.
    #[error("Add at least one activity type before generating a check-in")]
    NoActivityTypes,

    /// A hard failure reading one of the sources.
    #[error("Failed to load {what}: {message}")]
    DataFetch {
        what: &'static str,
        message: String,
    },

    /// Missing API key for a provider.
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    /// Provider error (from rig-core or API).
    #[error("Provider error: {0}")]
    Provider(String),

    /// The generation call finished but its output is unusable.
    #[error("Check-in generation failed: {0}")]
    Generation(String),

    /// Resource search failed. Recovered locally.
    #[error("Resource search failed: {0}")]
    Search(String),

    /// Generation succeeded but the result could not be saved.
    #[error("Your check-in was generated but could not be saved: {0}")]
    Persistence(String),

    /// Core error from cadence-core.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Human-readable date used in the rate-limit message, e.g. "June 12, 2026".
pub fn format_available_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

impl CheckInError {
    /// Create a new provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new generation error.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Folds provider-level failures into [`CheckInError::Generation`].
    pub fn into_generation_failure(self) -> Self {
        match self {
            CheckInError::Generation(_) => self,
            other => CheckInError::Generation(other.to_string()),
        }
    }
}

/// Error code for programmatic handling in stream events.
impl CheckInError {
    pub fn code(&self) -> &'static str {
        match self {
            CheckInError::Unauthorized => "UNAUTHORIZED",
            CheckInError::RateLimited { .. } => "RATE_LIMITED",
            CheckInError::RunInProgress => "RUN_IN_PROGRESS",
            CheckInError::NoActivityTypes => "NO_ACTIVITY_TYPES",
            CheckInError::DataFetch { .. } => "DATA_FETCH_FAILED",
            CheckInError::MissingApiKey(_)
            | CheckInError::Provider(_)
            | CheckInError::Generation(_) => "GENERATION_FAILED",
            CheckInError::Search(_) => "SEARCH_FAILED",
            CheckInError::Persistence(_) => "PERSISTENCE_FAILED",
            CheckInError::Core(_) | CheckInError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Numeric classifier carried on `error` events.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckInError::Unauthorized => 401,
            CheckInError::RateLimited { .. } | CheckInError::RunInProgress => 429,
            CheckInError::NoActivityTypes => 400,
            _ => 500,
        }
    }

    pub fn next_available_at(&self) -> Option<DateTime<Utc>> {
        match self {
            CheckInError::RateLimited { next_available_at } => Some(*next_available_at),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rate_limited_message_names_the_date() {
        let err = CheckInError::RateLimited {
            next_available_at: Utc.with_ymd_and_hms(2026, 6, 5, 9, 30, 0).unwrap(),
        };
        assert_eq!(err.to_string(), "You can generate your next check-in on June 5, 2026");
        assert_eq!(err.status_code(), 429);
        assert_eq!(err.code(), "RATE_LIMITED");
    }

    #[test]
    fn provider_failures_classify_as_generation() {
        let err = CheckInError::MissingApiKey("anthropic".into()).into_generation_failure();
        assert!(matches!(err, CheckInError::Generation(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.code(), "GENERATION_FAILED");
    }

    #[test]
    fn taxonomy_status_codes() {
        assert_eq!(CheckInError::Unauthorized.status_code(), 401);
        assert_eq!(CheckInError::NoActivityTypes.status_code(), 400);
        assert_eq!(CheckInError::RunInProgress.status_code(), 429);
        assert_eq!(CheckInError::Persistence("disk full".into()).status_code(), 500);
        assert_eq!(
            CheckInError::DataFetch { what: "goals", message: "locked".into() }.code(),
            "DATA_FETCH_FAILED"
        );
    }
}
