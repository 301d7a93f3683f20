//! Stored case summaries as returned by the backend.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One entry in the stored-summaries list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// Backend document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Full summary text.
    #[serde(default)]
    pub summary_text: String,
    /// When the summary was generated, as serialized by the backend.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SummaryEntry {
    /// First line of the summary, truncated for list display.
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.summary_text.lines().next().unwrap_or_default();
        let mut preview: String = first_line.chars().take(max_chars).collect();
        if first_line.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }
}

/// A stored summary with its recorded conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDetail {
    /// Full summary text.
    #[serde(default)]
    pub summary_text: String,
    /// The conversation the summary was generated from.
    #[serde(default)]
    pub conversation: Vec<ConversationTurn>,
}

/// One turn of a recorded conversation.
///
/// The backend records roles as `doctor` and `patient`; anything else is
/// displayed under the patient label, matching the original client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub message: String,
}

impl ConversationTurn {
    /// Display label for the speaker.
    pub fn speaker(&self) -> &'static str {
        if self.role == "doctor" {
            "Doctor"
        } else {
            "Patient"
        }
    }
}

/// Render a backend timestamp for display.
///
/// The backend serializes naive UTC datetimes; RFC 3339 values are accepted
/// too. Unparseable input is shown as-is rather than dropped.
pub fn display_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}
