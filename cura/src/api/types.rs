//! Wire types for the Care Companion backend.
//!
//! The backend sends more fields than the client uses (structured symptom
//! extraction, triage display hints, persistence flags); unknown fields are
//! ignored everywhere.

use serde::{Deserialize, Serialize};

use crate::models::SummaryEntry;

/// Body for `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    /// Client-generated id correlating the turns of one session.
    pub session_id: &'a str,
    /// The user's message.
    pub message: &'a str,
}

/// Reply from `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Assistant reply text. Absent replies get a fixed fallback downstream.
    #[serde(default)]
    pub reply: Option<String>,
    /// Optional triage annotation for this turn.
    #[serde(default)]
    pub triage: Option<TriageWire>,
}

/// Triage annotation as sent by the backend.
///
/// `color`, `status` and `severity_flag` also arrive on the wire; the
/// client styles severities itself, so only `level` and `reason` are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct TriageWire {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Reply from `POST /api/generate_summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryReply {
    #[serde(default)]
    pub summary: String,
}

/// Reply from `POST /api/generate_diagnosis`.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosisReply {
    #[serde(default)]
    pub diagnosis: String,
}

/// Reply from `GET /api/summaries`.
#[derive(Debug, Clone, Deserialize)]
pub struct SummariesReply {
    #[serde(default)]
    pub history: Vec<SummaryEntry>,
}

/// Reply from `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginReply {
    /// Bearer token; absent when the backend rejected the credentials
    /// without a non-success status.
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Reply from `GET /api/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub email: Option<String>,
}
