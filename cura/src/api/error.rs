//! Typed errors for backend requests.

use thiserror::Error;

use crate::models::FailureKind;

/// Failure taxonomy for one backend request.
///
/// Every variant is terminal for the request that produced it; callers turn
/// it into a transcript entry or a command error. Credential absence is
/// checked before a request is built and never surfaces here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("could not reach the server: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {code}: {detail}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Error detail extracted from the response body, or the canonical
        /// status reason when the body carries none.
        detail: String,
    },

    /// The response body could not be decoded.
    #[error("unexpected response from the server: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Collapse into the structured kind stored on transcript entries.
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Status { code, .. } => FailureKind::Status(*code),
            Self::Malformed(_) => FailureKind::Malformed,
        }
    }

    /// Whether this is a non-success status with the given code.
    pub fn is_status(&self, status: u16) -> bool {
        matches!(self, Self::Status { code, .. } if *code == status)
    }
}
