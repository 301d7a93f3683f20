//! Chat session state: the append-only transcript and the turn lifecycle.
//!
//! One `ChatSession` lives for one `cura chat` run. It owns the ordered
//! message log, the single-flight turn state, and the local UI bits (theme,
//! success notice). Network traffic is the caller's job: `begin_turn` hands
//! back the text to send and `complete_turn`/`fail_turn` record the result,
//! which keeps every transition testable without a backend.

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::api::{ApiError, ChatReply};
use crate::models::{FailureNotice, Message, MessageContent, Operation, TriageBadge};

/// How long a success notice stays visible.
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Fallback shown when the backend reply carries no `reply` field.
const NO_REPLY_FALLBACK: &str = "No response received.";

/// Turn-taking state for the single chat request in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// No chat request outstanding.
    #[default]
    Idle,
    /// A chat request is outstanding; new submissions are rejected.
    AwaitingReply,
}

/// Outcome of `begin_turn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStart {
    /// Input was empty after trimming; nothing happened.
    Empty,
    /// A previous turn is still awaiting its reply; nothing happened.
    Busy,
    /// The user message was appended; send this text to the backend.
    Send(String),
}

/// Display theme. Local UI state, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Generation workflows that run independently of chat turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Summary,
    Diagnosis,
}

impl Generation {
    /// Status line appended when the workflow starts.
    const fn announcement(self) -> &'static str {
        match self {
            Self::Summary => "Generating case summary...",
            Self::Diagnosis => "Analyzing conversation for possible diagnoses...",
        }
    }

    /// Notice raised when the workflow succeeds.
    const fn success_notice(self) -> &'static str {
        match self {
            Self::Summary => "Summary generated successfully!",
            Self::Diagnosis => "Diagnosis generated successfully!",
        }
    }

    const fn operation(self) -> Operation {
        match self {
            Self::Summary => Operation::Summary,
            Self::Diagnosis => Operation::Diagnosis,
        }
    }
}

#[derive(Debug, Clone)]
struct Notice {
    text: &'static str,
    raised_at: Instant,
}

/// State for one chat page visit.
///
/// The transcript is append-only: entries are never reordered or edited
/// after insertion, and sequence numbers are dense and ascending. Nothing
/// here is persisted; the backend-held summaries are the durable record.
#[derive(Debug)]
pub struct ChatSession {
    session_id: String,
    transcript: Vec<Message>,
    turn: TurnState,
    theme: Theme,
    notice: Option<Notice>,
}

impl ChatSession {
    /// New session with a fresh opaque id.
    pub fn new() -> Self {
        Self {
            session_id: format!("sess-{}", Uuid::now_v7().simple()),
            transcript: Vec::new(),
            turn: TurnState::Idle,
            theme: Theme::default(),
            notice: None,
        }
    }

    /// The opaque id sent with every chat request.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The ordered message log.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub const fn turn(&self) -> TurnState {
        self.turn
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip the display theme.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    fn push_bot(&mut self, content: MessageContent) {
        let sequence = self.transcript.len() as u64;
        self.transcript.push(Message::bot(sequence, content));
    }

    /// Start a chat turn with the user's raw input.
    ///
    /// Appends the user message optimistically, before any network call.
    /// Whitespace-only input is a no-op, and a turn already awaiting its
    /// reply rejects the submission without touching the transcript.
    pub fn begin_turn(&mut self, input: &str) -> TurnStart {
        let text = input.trim();
        if text.is_empty() {
            return TurnStart::Empty;
        }
        if self.turn == TurnState::AwaitingReply {
            return TurnStart::Busy;
        }

        let sequence = self.transcript.len() as u64;
        self.transcript.push(Message::user(sequence, text.to_string()));
        self.turn = TurnState::AwaitingReply;
        TurnStart::Send(text.to_string())
    }

    /// Record the reply for the outstanding turn.
    ///
    /// Appends the reply text (or the fixed fallback when the field is
    /// absent or empty) and, when the backend attached a triage annotation,
    /// a second entry carrying the badge.
    pub fn complete_turn(&mut self, reply: ChatReply) {
        self.turn = TurnState::Idle;

        let text = reply
            .reply
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_REPLY_FALLBACK.to_string());
        self.push_bot(MessageContent::Text(text));

        if let Some(triage) = reply.triage {
            let badge = TriageBadge::new(
                triage.level.unwrap_or_default(),
                triage.reason.unwrap_or_default(),
            );
            self.push_bot(MessageContent::Triage(badge));
        }
    }

    /// Record a failed turn. The failure is terminal for this turn only;
    /// the session keeps accepting submissions.
    pub fn fail_turn(&mut self, error: &ApiError) {
        self.turn = TurnState::Idle;
        self.push_bot(MessageContent::Failure(FailureNotice {
            operation: Operation::Chat,
            kind: error.failure_kind(),
        }));
    }

    /// Announce a generation workflow in the transcript.
    ///
    /// Generations are independent of chat turns and are not gated on the
    /// turn state.
    pub fn begin_generation(&mut self, generation: Generation) {
        let sequence = self.transcript.len() as u64;
        self.transcript
            .push(Message::meta(sequence, generation.announcement().to_string()));
    }

    /// Record a generated summary and raise the success notice.
    pub fn complete_summary(&mut self, summary: String, now: Instant) {
        self.push_bot(MessageContent::SummaryBox(summary));
        self.notice = Some(Notice {
            text: Generation::Summary.success_notice(),
            raised_at: now,
        });
    }

    /// Record a generated diagnosis and raise the success notice.
    ///
    /// The text is split on newlines with empty lines discarded; rendering
    /// shows a fixed fallback when nothing is left.
    pub fn complete_diagnosis(&mut self, diagnosis: &str, now: Instant) {
        let lines: Vec<String> = diagnosis
            .lines()
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect();
        self.push_bot(MessageContent::DiagnosisList(lines));
        self.notice = Some(Notice {
            text: Generation::Diagnosis.success_notice(),
            raised_at: now,
        });
    }

    /// Record a failed generation. No notice is raised.
    pub fn fail_generation(&mut self, generation: Generation, error: &ApiError) {
        self.push_bot(MessageContent::Failure(FailureNotice {
            operation: generation.operation(),
            kind: error.failure_kind(),
        }));
    }

    /// The success notice, if one is active at `now`.
    pub fn notice_at(&self, now: Instant) -> Option<&'static str> {
        self.notice
            .as_ref()
            .filter(|notice| now.duration_since(notice.raised_at) < NOTICE_TTL)
            .map(|notice| notice.text)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TriageWire;
    use crate::models::{FailureKind, MessageRole, TriageSeverity};

    fn reply(text: &str) -> ChatReply {
        ChatReply {
            reply: Some(text.to_string()),
            triage: None,
        }
    }

    fn decode_error() -> ApiError {
        ApiError::Malformed("test".to_string())
    }

    #[test]
    fn begin_turn_appends_exactly_one_user_message() {
        let mut session = ChatSession::new();
        let start = session.begin_turn("  I have a headache  ");
        assert_eq!(start, TurnStart::Send("I have a headache".to_string()));
        assert_eq!(session.transcript().len(), 1);

        let message = &session.transcript()[0];
        assert_eq!(message.role(), MessageRole::User);
        assert_eq!(
            message.content(),
            &MessageContent::Text("I have a headache".to_string())
        );
        assert_eq!(session.turn(), TurnState::AwaitingReply);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut session = ChatSession::new();
        assert_eq!(session.begin_turn(""), TurnStart::Empty);
        assert_eq!(session.begin_turn("   \t "), TurnStart::Empty);
        assert!(session.transcript().is_empty());
        assert_eq!(session.turn(), TurnState::Idle);
    }

    #[test]
    fn submission_while_awaiting_reply_is_rejected() {
        let mut session = ChatSession::new();
        session.begin_turn("first");
        assert_eq!(session.begin_turn("second"), TurnStart::Busy);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn missing_reply_field_gets_fallback_text() {
        let mut session = ChatSession::new();
        session.begin_turn("hello");
        session.complete_turn(ChatReply {
            reply: None,
            triage: None,
        });
        assert_eq!(
            session.transcript()[1].content(),
            &MessageContent::Text("No response received.".to_string())
        );
    }

    #[test]
    fn empty_reply_gets_fallback_text() {
        let mut session = ChatSession::new();
        session.begin_turn("hello");
        session.complete_turn(ChatReply {
            reply: Some(String::new()),
            triage: None,
        });
        assert_eq!(
            session.transcript()[1].content(),
            &MessageContent::Text("No response received.".to_string())
        );
    }

    #[test]
    fn triage_annotation_appends_a_second_bot_message() {
        let mut session = ChatSession::new();
        session.begin_turn("chest pain");
        session.complete_turn(ChatReply {
            reply: Some("Seek care now.".to_string()),
            triage: Some(TriageWire {
                level: Some("EMERGENCY".to_string()),
                reason: Some("Chest pain reported.".to_string()),
            }),
        });

        assert_eq!(session.transcript().len(), 3);
        match session.transcript()[2].content() {
            MessageContent::Triage(badge) => {
                assert_eq!(badge.severity, TriageSeverity::Emergency);
                assert_eq!(badge.label, "EMERGENCY");
            }
            other => panic!("expected triage badge, got {other:?}"),
        }
    }

    #[test]
    fn failed_turn_clears_pending_and_stays_usable() {
        let mut session = ChatSession::new();
        session.begin_turn("hello");
        session.fail_turn(&decode_error());

        assert_eq!(session.turn(), TurnState::Idle);
        assert_eq!(session.transcript().len(), 2);
        match session.transcript()[1].content() {
            MessageContent::Failure(notice) => {
                assert_eq!(notice.operation, Operation::Chat);
                assert_eq!(notice.kind, FailureKind::Malformed);
            }
            other => panic!("expected failure notice, got {other:?}"),
        }

        assert!(matches!(session.begin_turn("again"), TurnStart::Send(_)));
    }

    #[test]
    fn user_entries_keep_submission_order() {
        let mut session = ChatSession::new();
        let inputs = ["one", "two", "three"];
        for input in inputs {
            session.begin_turn(input);
            session.complete_turn(reply("ok"));
        }

        let user_contents: Vec<_> = session
            .transcript()
            .iter()
            .filter(|m| m.role() == MessageRole::User)
            .map(|m| m.content().clone())
            .collect();
        let expected: Vec<_> = inputs
            .iter()
            .map(|s| MessageContent::Text((*s).to_string()))
            .collect();
        assert_eq!(user_contents, expected);
    }

    #[test]
    fn sequences_are_dense_and_ascending() {
        let mut session = ChatSession::new();
        session.begin_turn("a");
        session.complete_turn(reply("b"));
        session.begin_generation(Generation::Summary);
        session.complete_summary("text".to_string(), Instant::now());

        for (index, message) in session.transcript().iter().enumerate() {
            assert_eq!(message.sequence(), index as u64);
        }
    }

    #[test]
    fn diagnosis_discards_empty_lines() {
        let mut session = ChatSession::new();
        session.complete_diagnosis("A\n\nB\n", Instant::now());
        match session.transcript()[0].content() {
            MessageContent::DiagnosisList(lines) => {
                assert_eq!(lines, &["A".to_string(), "B".to_string()]);
            }
            other => panic!("expected diagnosis list, got {other:?}"),
        }
    }

    #[test]
    fn generation_announces_then_records_result() {
        let mut session = ChatSession::new();
        session.begin_generation(Generation::Summary);
        assert_eq!(session.transcript()[0].role(), MessageRole::Meta);

        session.complete_summary("Patient reports headache.".to_string(), Instant::now());
        assert_eq!(
            session.transcript()[1].content(),
            &MessageContent::SummaryBox("Patient reports headache.".to_string())
        );
    }

    #[test]
    fn failed_generation_raises_no_notice() {
        let mut session = ChatSession::new();
        session.begin_generation(Generation::Diagnosis);
        session.fail_generation(Generation::Diagnosis, &decode_error());
        assert_eq!(session.notice_at(Instant::now()), None);
        match session.transcript()[1].content() {
            MessageContent::Failure(notice) => {
                assert_eq!(notice.operation, Operation::Diagnosis);
            }
            other => panic!("expected failure notice, got {other:?}"),
        }
    }

    #[test]
    fn notice_expires_after_four_seconds() {
        let mut session = ChatSession::new();
        let raised = Instant::now();
        session.complete_summary("text".to_string(), raised);

        assert_eq!(
            session.notice_at(raised),
            Some("Summary generated successfully!")
        );
        assert!(session
            .notice_at(raised + Duration::from_millis(3999))
            .is_some());
        assert!(session.notice_at(raised + Duration::from_secs(4)).is_none());
    }

    #[test]
    fn session_ids_are_unique_per_session() {
        let a = ChatSession::new();
        let b = ChatSession::new();
        assert!(a.session_id().starts_with("sess-"));
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn generations_are_not_gated_on_turn_state() {
        let mut session = ChatSession::new();
        session.begin_turn("hello");
        session.begin_generation(Generation::Summary);
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.turn(), TurnState::AwaitingReply);
    }
}
