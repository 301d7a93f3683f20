//! Interactive chat session against the backend.
//!
//! A readline loop over one `ChatSession`: plain input becomes a chat turn,
//! slash commands drive the generation workflows and local UI state. The
//! transcript is printed incrementally as entries are appended.

use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::auth::AuthContext;
use crate::models::display_timestamp;
use crate::render;
use crate::session::{ChatSession, Generation, TurnStart};

/// Run the interactive chat loop until the user quits.
pub async fn run(api: &ApiClient, auth: &AuthContext) -> Result<()> {
    let token = auth.bearer()?.to_string();
    let mut session = ChatSession::new();
    let mut rendered = 0usize;

    greet(api, &token).await;

    let mut rl = DefaultEditor::new()?;
    loop {
        let line = match rl.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Interrupted. Type /quit to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(&line);

        match input {
            "/quit" | "/exit" => break,
            "/theme" => {
                session.toggle_theme();
                println!("Theme set to {}.", session.theme().name());
            }
            "/summary" => {
                generate(Generation::Summary, api, &token, &mut session, &mut rendered).await;
            }
            "/diagnosis" => {
                generate(Generation::Diagnosis, api, &token, &mut session, &mut rendered).await;
            }
            "/history" => list_summaries(api, &token).await,
            "/help" => print_help(),
            _ if input.starts_with('/') => {
                println!("{}", "Unknown command. Type /help for commands.".dimmed());
            }
            _ => chat_turn(input, api, &token, &mut session, &mut rendered).await,
        }

        flush(&session, &mut rendered);
        if let Some(notice) = session.notice_at(Instant::now()) {
            println!("{}", render::notice_line(notice));
        }
    }

    Ok(())
}

/// Print the banner and the background page-load fetches.
///
/// Neither the stored-summaries list nor the profile is required for the
/// session; failures are logged and skipped.
async fn greet(api: &ApiClient, token: &str) {
    println!("{}", "Dr. Cura".bold());
    println!("Your trusted AI healthcare assistant. Describe your symptoms to begin.");
    println!(
        "{}",
        "Commands: /summary /diagnosis /history /theme /quit".dimmed()
    );
    println!();

    match api.me(token).await {
        Ok(profile) => {
            if let Some(email) = profile.email {
                println!("{}", format!("Logged in as {email}.").dimmed());
            }
        }
        Err(err) => debug!(error = %err, "profile fetch failed"),
    }

    match api.summaries(token).await {
        Ok(history) if history.is_empty() => {}
        Ok(history) => {
            println!(
                "{}",
                format!(
                    "{} stored summaries. Use /history to list them.",
                    history.len()
                )
                .dimmed()
            );
        }
        Err(err) => debug!(error = %err, "summaries fetch failed"),
    }
}

/// Print transcript entries appended since the last flush.
fn flush(session: &ChatSession, rendered: &mut usize) {
    for message in &session.transcript()[*rendered..] {
        for line in render::message_lines(message, session.theme()) {
            println!("{line}");
        }
    }
    *rendered = session.transcript().len();
}

/// One chat turn: optimistic append, request, append the outcome.
async fn chat_turn(
    input: &str,
    api: &ApiClient,
    token: &str,
    session: &mut ChatSession,
    rendered: &mut usize,
) {
    match session.begin_turn(input) {
        TurnStart::Empty => {}
        TurnStart::Busy => {
            println!("{}", "Still waiting for the previous reply.".yellow());
        }
        TurnStart::Send(text) => {
            flush(session, rendered);
            println!("{}", "Dr. Cura is typing...".dimmed());
            match api.chat(token, session.session_id(), &text).await {
                Ok(reply) => session.complete_turn(reply),
                Err(err) => {
                    warn!(error = %err, "chat request failed");
                    session.fail_turn(&err);
                }
            }
        }
    }
}

/// One generation workflow: announce, request, append the outcome.
async fn generate(
    kind: Generation,
    api: &ApiClient,
    token: &str,
    session: &mut ChatSession,
    rendered: &mut usize,
) {
    session.begin_generation(kind);
    flush(session, rendered);

    match kind {
        Generation::Summary => match api.generate_summary(token).await {
            Ok(reply) => session.complete_summary(reply.summary, Instant::now()),
            Err(err) => {
                warn!(error = %err, "summary generation failed");
                session.fail_generation(kind, &err);
            }
        },
        Generation::Diagnosis => match api.generate_diagnosis(token).await {
            Ok(reply) => session.complete_diagnosis(&reply.diagnosis, Instant::now()),
            Err(err) => {
                warn!(error = %err, "diagnosis generation failed");
                session.fail_generation(kind, &err);
            }
        },
    }
}

/// List stored summaries, most recent first.
async fn list_summaries(api: &ApiClient, token: &str) {
    match api.summaries(token).await {
        Ok(history) if history.is_empty() => println!("No summaries yet."),
        Ok(history) => {
            for entry in history {
                let date = entry
                    .timestamp
                    .as_deref()
                    .map(display_timestamp)
                    .unwrap_or_default();
                println!("{}  {}  {}", entry.id.dimmed(), date, entry.preview(60));
            }
        }
        Err(err) => println!("{}", format!("Failed to list summaries: {err}").red()),
    }
}

fn print_help() {
    println!("/summary    Generate a case summary of this conversation");
    println!("/diagnosis  Generate possible diagnoses");
    println!("/history    List stored summaries");
    println!("/theme      Toggle light/dark rendering");
    println!("/quit       Leave the chat");
}
