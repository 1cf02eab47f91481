//! Cooldown between completed check-ins.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Eligible,
    CoolingDown {
        last_completed_at: DateTime<Utc>,
        next_available_at: DateTime<Utc>,
    },
}

impl RateLimitDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, RateLimitDecision::Eligible)
    }
}

/// Decides whether a new check-in may start at `now`.
///
/// A run is allowed when there is no completed check-in, or when
/// `now >= last_completed_at + cooldown`. The boundary instant itself is
/// eligible.
pub fn check_rate_limit(
    last_completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> RateLimitDecision {
    match last_completed_at {
        None => RateLimitDecision::Eligible,
        Some(last) => {
            let next_available_at = last + cooldown;
            if now >= next_available_at {
                RateLimitDecision::Eligible
            } else {
                RateLimitDecision::CoolingDown {
                    last_completed_at: last,
                    next_available_at,
                }
            }
        }
    }
}

/// Eligibility snapshot returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInEligibility {
    pub eligible: bool,
    pub last_check_in_at: Option<DateTime<Utc>>,
    pub next_available_at: Option<DateTime<Utc>>,
}

impl CheckInEligibility {
    pub fn from_decision(
        decision: RateLimitDecision,
        last_completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        match decision {
            RateLimitDecision::Eligible => Self {
                eligible: true,
                last_check_in_at: last_completed_at,
                next_available_at: None,
            },
            RateLimitDecision::CoolingDown {
                last_completed_at,
                next_available_at,
            } => Self {
                eligible: false,
                last_check_in_at: Some(last_completed_at),
                next_available_at: Some(next_available_at),
            },
        }
    }
}
