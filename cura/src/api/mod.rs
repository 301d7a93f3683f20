//! HTTP client for the Care Companion backend.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{ChatReply, DiagnosisReply, LoginReply, Profile, SummaryReply, TriageWire};
