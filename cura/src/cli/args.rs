//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Cura - terminal client for the Care Companion healthcare assistant
#[derive(Parser, Debug)]
#[command(name = "cura")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the Care Companion backend
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000")]
    pub server: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the access token
    Login {
        /// Account email
        email: String,

        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Register a new account
    Register {
        /// Account email
        email: String,

        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Start an interactive chat session
    Chat,

    /// List stored case summaries
    Summaries,

    /// Show one stored summary and its conversation
    Summary {
        /// Summary id from `cura summaries`
        id: String,
    },

    /// Show the logged-in profile
    Whoami,

    /// Remove the stored access token
    Logout,
}
