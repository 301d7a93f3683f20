//! Domain models for the chat client.

mod message;
mod summary;
mod triage;

pub use message::{FailureKind, FailureNotice, Message, MessageContent, MessageRole, Operation};
pub use summary::{display_timestamp, ConversationTurn, SummaryDetail, SummaryEntry};
pub use triage::{TriageBadge, TriageSeverity};
