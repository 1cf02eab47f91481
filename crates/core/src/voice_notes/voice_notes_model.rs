//! Voice note domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An activity suggestion mined from a voice note transcription.
///
/// Produced upstream by transcription tooling; check-ins pass these through as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedActivity {
    #[serde(default)]
    pub activity_type_id: Option<String>,
    pub activity_name: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A recorded note for a date. At most one exists per (user, date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNote {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub audio_url: String,
    pub duration_seconds: f64,
    pub transcription: Option<String>,
    pub extracted_activities: Option<Vec<ExtractedActivity>>,
    pub created_at: DateTime<Utc>,
}
