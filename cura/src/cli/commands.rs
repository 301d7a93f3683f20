//! CLI command execution.
//!
//! Commands are thin shells: resolve the auth capability, make one or two
//! client calls, print. All chat-session state lives in the `session` and
//! `chat` modules.

use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::api::{ApiClient, ApiError};
use crate::auth::{AuthContext, TokenStore};
use crate::chat;
use crate::models::display_timestamp;
use crate::render;

use super::args::{Cli, Commands};

pub async fn execute(cli: Cli) -> Result<()> {
    let api = ApiClient::new(&cli.server)?;
    let store = TokenStore::default_location()?;

    match cli.command {
        Commands::Login { email, password } => login(&api, &store, &email, password).await,
        Commands::Register { email, password } => register(&api, &email, password).await,
        Commands::Chat => {
            let auth = AuthContext::load(&store)?;
            chat::run(&api, &auth).await
        }
        Commands::Summaries => list_summaries(&api, &store).await,
        Commands::Summary { id } => show_summary(&api, &store, &id).await,
        Commands::Whoami => whoami(&api, &store).await,
        Commands::Logout => logout(&store),
    }
}

/// Read the password from the flag or, failing that, from a prompt.
fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    let mut rl = rustyline::DefaultEditor::new()?;
    let password = rl
        .readline("Password: ")
        .context("Failed to read password")?;
    let password = password.trim().to_string();
    if password.is_empty() {
        bail!("Password is required");
    }
    Ok(password)
}

async fn login(
    api: &ApiClient,
    store: &TokenStore,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let password = resolve_password(password)?;

    let reply = match api.login(email, &password).await {
        Ok(reply) => reply,
        Err(err) if err.is_status(401) => bail!("Invalid credentials."),
        Err(err) => return Err(err).context("Login request failed"),
    };

    let Some(token) = reply.access_token else {
        bail!("Login failed: the server sent no access token.");
    };

    store.save(&token)?;
    println!("Logged in as {email}.");
    Ok(())
}

async fn register(api: &ApiClient, email: &str, password: Option<String>) -> Result<()> {
    let password = resolve_password(password)?;

    match api.register(email, &password).await {
        Ok(()) => {
            println!("Registered successfully. Log in with `cura login {email}`.");
            Ok(())
        }
        Err(ApiError::Status { detail, .. }) => bail!("Registration failed: {detail}"),
        Err(err) => Err(err).context("Registration request failed"),
    }
}

async fn list_summaries(api: &ApiClient, store: &TokenStore) -> Result<()> {
    let auth = AuthContext::load(store)?;
    let history = api
        .summaries(auth.bearer()?)
        .await
        .context("Failed to fetch summaries")?;

    if history.is_empty() {
        println!("No summaries yet.");
        return Ok(());
    }

    for entry in history {
        let date = entry
            .timestamp
            .as_deref()
            .map(display_timestamp)
            .unwrap_or_default();
        println!("{}  {}  {}", entry.id.dimmed(), date, entry.preview(60));
    }
    Ok(())
}

async fn show_summary(api: &ApiClient, store: &TokenStore, id: &str) -> Result<()> {
    let auth = AuthContext::load(store)?;
    let detail = match api.summary(auth.bearer()?, id).await {
        Ok(detail) => detail,
        Err(err) if err.is_status(404) => bail!("Summary not found."),
        Err(err) => return Err(err).context("Failed to fetch summary"),
    };

    println!("{}", "Case Summary".bold());
    for line in render::sanitize(&detail.summary_text).lines() {
        println!("  {line}");
    }

    if !detail.conversation.is_empty() {
        println!();
        println!("{}", "Conversation".bold());
        for turn in &detail.conversation {
            println!(
                "  {} {}",
                format!("{}:", turn.speaker()).bold(),
                render::sanitize(&turn.message)
            );
        }
    }
    Ok(())
}

async fn whoami(api: &ApiClient, store: &TokenStore) -> Result<()> {
    let auth = AuthContext::load(store)?;
    let profile = match api.me(auth.bearer()?).await {
        Ok(profile) => profile,
        Err(err) if err.is_status(401) => bail!("Session expired. Run `cura login` again."),
        Err(err) => return Err(err).context("Failed to fetch profile"),
    };

    match profile.email {
        Some(email) => println!("{email}"),
        None => println!("Logged in, but the server sent no email."),
    }
    Ok(())
}

fn logout(store: &TokenStore) -> Result<()> {
    store.clear()?;
    println!("Logged out.");
    Ok(())
}
