//! Terminal rendering: one fixed template per content kind.
//!
//! The trust boundary lives here. Backend-sourced free text (replies,
//! summaries, diagnosis lines, triage labels and reasons) is sanitized and
//! printed literally inside an audited template; user text is printed
//! literally under every theme. No message text is ever interpreted as
//! markup or passed to the terminal with its own escape sequences intact.

use colored::{ColoredString, Colorize};
use regex::Regex;

use crate::models::{
    FailureKind, FailureNotice, Message, MessageContent, MessageRole, TriageBadge, TriageSeverity,
};
use crate::session::Theme;

/// Fallback shown when a diagnosis response had no non-empty lines.
const NO_DIAGNOSIS_FALLBACK: &str = "No diagnosis generated.";

/// Strip ANSI escape sequences and non-printable control characters.
///
/// Newlines and tabs survive; everything else that could restyle or corrupt
/// the terminal is removed. Applied to user input and backend text alike.
pub fn sanitize(text: &str) -> String {
    let escapes = Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b[@-Z\\-_]").unwrap();
    let stripped = escapes.replace_all(text, "");
    stripped
        .chars()
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .collect()
}

/// Render one transcript entry to output lines for the given theme.
pub fn message_lines(message: &Message, theme: Theme) -> Vec<String> {
    match message.content() {
        MessageContent::Text(text) => text_lines(message.role(), text, theme),
        MessageContent::Triage(badge) => vec![triage_line(badge)],
        MessageContent::SummaryBox(summary) => summary_lines(summary, theme),
        MessageContent::DiagnosisList(lines) => diagnosis_lines(lines, theme),
        MessageContent::Status(status) => vec![format!("{}", sanitize(status).dimmed())],
        MessageContent::Failure(notice) => vec![format!("{}", failure_text(*notice).red())],
    }
}

/// One-line rendering of the transient success notice.
pub fn notice_line(text: &str) -> String {
    format!("{}", text.green().bold())
}

/// Human-readable text for a structured failure.
pub fn failure_text(notice: FailureNotice) -> String {
    let action = notice.operation.action();
    match notice.kind {
        FailureKind::Transport => format!("Failed to {action}: could not reach the server."),
        FailureKind::Status(code) => format!("Failed to {action}: server returned {code}."),
        FailureKind::Malformed => {
            format!("Failed to {action}: unexpected response from the server.")
        }
    }
}

fn speaker_label(role: MessageRole, theme: Theme) -> ColoredString {
    match (role, theme) {
        (MessageRole::User, _) => "You:".green().bold(),
        (MessageRole::Bot, Theme::Light) => "Dr. Cura:".blue().bold(),
        (MessageRole::Bot, Theme::Dark) => "Dr. Cura:".bright_blue().bold(),
        (MessageRole::Meta, _) => "*".dimmed(),
    }
}

fn text_lines(role: MessageRole, text: &str, theme: Theme) -> Vec<String> {
    let label = speaker_label(role, theme);
    sanitize(text)
        .lines()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                format!("{label} {line}")
            } else {
                format!("  {line}")
            }
        })
        .collect()
}

fn triage_line(badge: &TriageBadge) -> String {
    let label = sanitize(&badge.label);
    let reason = sanitize(&badge.reason);

    let heading = match badge.severity {
        TriageSeverity::Emergency => format!("[{}]", label.to_uppercase()).red().bold(),
        TriageSeverity::Urgent => format!("[{}]", label.to_uppercase()).yellow().bold(),
        TriageSeverity::Routine => format!("[{}]", label.to_uppercase()).green(),
        TriageSeverity::Unrecognized => {
            format!("[UNRECOGNIZED SEVERITY \"{label}\"]").magenta().bold()
        }
    };

    if reason.is_empty() {
        heading.to_string()
    } else {
        format!("{heading} {reason}")
    }
}

fn summary_lines(summary: &str, theme: Theme) -> Vec<String> {
    let mut lines = vec![format!("{}", header("Case Summary:", theme))];
    lines.extend(sanitize(summary).lines().map(|line| format!("  {line}")));
    lines
}

fn diagnosis_lines(entries: &[String], theme: Theme) -> Vec<String> {
    let mut lines = vec![format!("{}", header("Diagnoses:", theme))];
    if entries.is_empty() {
        lines.push(format!("  {NO_DIAGNOSIS_FALLBACK}"));
        return lines;
    }
    for entry in entries {
        // Entries arrive pre-split on newlines, so each renders as one line.
        lines.push(format!("  - {}", sanitize(entry)));
    }
    lines
}

fn header(text: &str, theme: Theme) -> ColoredString {
    match theme {
        Theme::Light => text.cyan().bold(),
        Theme::Dark => text.bright_cyan().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;

    #[test]
    fn sanitize_strips_escape_sequences() {
        assert_eq!(sanitize("\x1b[31mred\x1b[0m text"), "red text");
        assert_eq!(sanitize("\x1b]0;title\x07"), "0;title");
        assert_eq!(sanitize("plain"), "plain");
    }

    #[test]
    fn sanitize_keeps_newlines_and_tabs() {
        assert_eq!(sanitize("a\nb\tc\rd\x07e"), "a\nb\tcde");
    }

    #[test]
    fn user_markup_renders_literally() {
        let message = Message::user(0, "<b>hi</b>".to_string());
        let lines = message_lines(&message, Theme::Light);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("<b>hi</b>"));
    }

    #[test]
    fn user_escape_bytes_are_removed() {
        let message = Message::user(0, "\x1b[2Jhi".to_string());
        let lines = message_lines(&message, Theme::Light);
        assert!(lines[0].contains("hi"));
        assert!(!lines[0].contains("\x1b[2J"));
    }

    #[test]
    fn bot_reply_text_is_sanitized_not_interpreted() {
        let message = Message::bot(
            0,
            MessageContent::Text("<div class=\"x\">\x1b[31mreply</div>".to_string()),
        );
        let lines = message_lines(&message, Theme::Light);
        assert!(lines[0].contains("<div class=\"x\">reply</div>"));
    }

    #[test]
    fn triage_severities_render_distinctly() {
        let emergency = triage_line(&TriageBadge::new("Emergency", "Chest pain."));
        let urgent = triage_line(&TriageBadge::new("Urgent", "High fever."));
        let routine = triage_line(&TriageBadge::new("Routine", "No red flags found."));
        assert!(emergency.contains("EMERGENCY"));
        assert!(urgent.contains("URGENT"));
        assert!(routine.contains("ROUTINE"));
    }

    #[test]
    fn unrecognized_severity_is_flagged_not_downgraded() {
        let line = triage_line(&TriageBadge::new("Normal", "Stable condition."));
        assert!(line.contains("UNRECOGNIZED SEVERITY"));
        assert!(line.contains("Normal"));
        assert!(!line.to_lowercase().contains("[routine]"));
    }

    #[test]
    fn empty_diagnosis_list_shows_fallback() {
        let message = Message::bot(0, MessageContent::DiagnosisList(Vec::new()));
        let lines = message_lines(&message, Theme::Light);
        assert!(lines[1].contains("No diagnosis generated."));
    }

    #[test]
    fn diagnosis_entries_render_one_line_each() {
        let message = Message::bot(
            0,
            MessageContent::DiagnosisList(vec!["A".to_string(), "B".to_string()]),
        );
        let lines = message_lines(&message, Theme::Light);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("A"));
        assert!(lines[2].contains("B"));
    }

    #[test]
    fn failure_text_per_kind() {
        let transport = FailureNotice {
            operation: Operation::Chat,
            kind: FailureKind::Transport,
        };
        let status = FailureNotice {
            operation: Operation::Summary,
            kind: FailureKind::Status(500),
        };
        assert_eq!(
            failure_text(transport),
            "Failed to send message: could not reach the server."
        );
        assert_eq!(
            failure_text(status),
            "Failed to generate summary: server returned 500."
        );
    }
}
