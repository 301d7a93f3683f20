//! HTTP client for the Care Companion backend.
//!
//! One method per endpoint, no retries, a bounded request timeout, and
//! structured errors. The client is a thin wrapper; all session state lives
//! with the caller.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::models::{SummaryDetail, SummaryEntry};

use super::error::ApiError;
use super::types::{
    ChatReply, ChatRequest, DiagnosisReply, LoginReply, Profile, SummariesReply, SummaryReply,
};

/// Upper bound on any single request; the original relied on transport
/// defaults, which left turns hanging indefinitely on a stalled backend.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the backend API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given base URL, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send one chat turn.
    pub async fn chat(
        &self,
        token: &str,
        session_id: &str,
        message: &str,
    ) -> Result<ChatReply, ApiError> {
        let body = ChatRequest {
            session_id,
            message,
        };
        let req = self
            .http
            .post(self.url("/api/chat"))
            .bearer_auth(token)
            .json(&body);
        decode(send(req, "/api/chat").await?).await
    }

    /// Ask the backend to generate a case summary for the conversation so far.
    pub async fn generate_summary(&self, token: &str) -> Result<SummaryReply, ApiError> {
        let req = self
            .http
            .post(self.url("/api/generate_summary"))
            .bearer_auth(token);
        decode(send(req, "/api/generate_summary").await?).await
    }

    /// Ask the backend to generate differential diagnoses.
    pub async fn generate_diagnosis(&self, token: &str) -> Result<DiagnosisReply, ApiError> {
        let req = self
            .http
            .post(self.url("/api/generate_diagnosis"))
            .bearer_auth(token);
        decode(send(req, "/api/generate_diagnosis").await?).await
    }

    /// List stored summaries, most recent first.
    pub async fn summaries(&self, token: &str) -> Result<Vec<SummaryEntry>, ApiError> {
        let req = self.http.get(self.url("/api/summaries")).bearer_auth(token);
        let reply: SummariesReply = decode(send(req, "/api/summaries").await?).await?;
        Ok(reply.history)
    }

    /// Fetch one stored summary with its recorded conversation.
    pub async fn summary(&self, token: &str, id: &str) -> Result<SummaryDetail, ApiError> {
        let path = format!("/api/summaries/{}", urlencoding::encode(id));
        let req = self.http.get(self.url(&path)).bearer_auth(token);
        decode(send(req, "/api/summaries/{id}").await?).await
    }

    /// Fetch the logged-in user's profile.
    pub async fn me(&self, token: &str) -> Result<Profile, ApiError> {
        let req = self.http.get(self.url("/api/me")).bearer_auth(token);
        decode(send(req, "/api/me").await?).await
    }

    /// Exchange credentials for a bearer token. Form-encoded per the
    /// backend's OAuth2 password flow.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginReply, ApiError> {
        let req = self
            .http
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)]);
        decode(send(req, "/login").await?).await
    }

    /// Create a new account.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let req = self.http.post(self.url("/register")).json(&body);
        send(req, "/register").await?;
        Ok(())
    }
}

/// Send a request and map transport and status failures.
async fn send(req: RequestBuilder, path: &str) -> Result<reqwest::Response, ApiError> {
    debug!(path, "sending request");
    let resp = req.send().await.map_err(ApiError::Transport)?;
    let status = resp.status();
    debug!(path, status = status.as_u16(), "received response");

    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let detail = extract_detail(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    Err(ApiError::Status {
        code: status.as_u16(),
        detail,
    })
}

/// Decode a success body, treating undecodable JSON as malformed.
async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    resp.json::<T>()
        .await
        .map_err(|err| ApiError::Malformed(err.to_string()))
}

/// Pull the `detail` field out of a FastAPI-style error body.
///
/// `detail` is usually a string but can be a validation structure; anything
/// non-string is flattened to its JSON text.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
