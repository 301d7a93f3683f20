//! Message model representing one entry in the chat transcript.

use serde::{Deserialize, Serialize};

use super::triage::TriageBadge;

/// Role of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message produced by the assistant backend.
    Bot,
    /// Transient status line announcing a client-side action.
    Meta,
}

impl MessageRole {
    /// Convert role to its display string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::Meta => "meta",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which backend operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A chat turn against `/api/chat`.
    Chat,
    /// A summary generation request.
    Summary,
    /// A diagnosis generation request.
    Diagnosis,
}

impl Operation {
    /// Verb phrase used when rendering failure text.
    pub const fn action(self) -> &'static str {
        match self {
            Self::Chat => "send message",
            Self::Summary => "generate summary",
            Self::Diagnosis => "generate diagnosis",
        }
    }
}

/// Failure category recorded on a transcript entry.
///
/// Mirrors the API error taxonomy so tests and callers can match on the
/// kind instead of display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced an HTTP response.
    Transport,
    /// The server answered with a non-success status code.
    Status(u16),
    /// The response body could not be decoded.
    Malformed,
}

/// Structured record of a failed request, kept in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureNotice {
    /// The operation that failed.
    pub operation: Operation,
    /// What went wrong.
    pub kind: FailureKind,
}

/// Content kinds a transcript entry can carry.
///
/// This is a closed set: rendering selects a fixed template per kind, and
/// there is no path that interprets message text as markup. `Text` is the
/// only kind a user message can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Literal text.
    Text(String),
    /// Triage severity badge attached to a chat reply.
    Triage(TriageBadge),
    /// Generated case summary.
    SummaryBox(String),
    /// Generated differential diagnosis, one entry per non-empty line.
    DiagnosisList(Vec<String>),
    /// Transient status line.
    Status(String),
    /// A request that failed.
    Failure(FailureNotice),
}

/// One entry in the session transcript.
///
/// Entries are created through the role constructors and never edited after
/// insertion. Structured content is only reachable through the bot and meta
/// constructors, so user input cannot end up in a structured template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: MessageRole,
    content: MessageContent,
    sequence: u64,
}

impl Message {
    /// A user message. Always literal text.
    pub fn user(sequence: u64, text: String) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(text),
            sequence,
        }
    }

    /// A bot message carrying any content kind.
    pub fn bot(sequence: u64, content: MessageContent) -> Self {
        Self {
            role: MessageRole::Bot,
            content,
            sequence,
        }
    }

    /// A meta status line.
    pub fn meta(sequence: u64, status: String) -> Self {
        Self {
            role: MessageRole::Meta,
            content: MessageContent::Status(status),
            sequence,
        }
    }

    pub const fn role(&self) -> MessageRole {
        self.role
    }

    pub const fn content(&self) -> &MessageContent {
        &self.content
    }

    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_strings() {
        assert_eq!(MessageRole::User.to_string(), "user");
        assert_eq!(MessageRole::Bot.to_string(), "bot");
        assert_eq!(MessageRole::Meta.to_string(), "meta");
    }

    #[test]
    fn user_messages_are_always_literal_text() {
        let message = Message::user(0, "<b>hi</b>".to_string());
        assert_eq!(message.role(), MessageRole::User);
        assert_eq!(
            message.content(),
            &MessageContent::Text("<b>hi</b>".to_string())
        );
    }
}
