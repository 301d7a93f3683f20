//! Cura - terminal client for the Care Companion healthcare assistant.
//!
//! The backend owns all intelligence (chat replies, triage, summaries,
//! diagnoses); this client owns the chat transcript, the stored bearer
//! token, and safe terminal rendering of backend-sourced text.
//!
//! Architecture:
//! - CLI commands are thin shells over an HTTP client for the backend
//! - Chat runs as a readline loop over an explicit session state machine
//! - Backend text is sanitized and rendered through fixed per-kind templates

mod api;
mod auth;
mod chat;
mod cli;
mod models;
mod render;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    execute(cli).await
}
