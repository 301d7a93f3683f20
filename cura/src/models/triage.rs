//! Triage severity attached to chat replies.

/// Parsed severity of a triage annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageSeverity {
    /// Immediate care required.
    Emergency,
    /// Needs prompt medical attention.
    Urgent,
    /// Non-urgent.
    Routine,
    /// The backend sent a level outside the known set.
    ///
    /// A garbled severity on a safety indicator must stay visible as
    /// garbled instead of being downgraded to the least severe class.
    Unrecognized,
}

impl TriageSeverity {
    /// Parse the wire-level string, case-insensitively.
    pub fn parse(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "emergency" => Self::Emergency,
            "urgent" => Self::Urgent,
            "routine" => Self::Routine,
            _ => Self::Unrecognized,
        }
    }

    /// Stable identifier used to pick a style. Exhaustive over all levels.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::Urgent => "urgent",
            Self::Routine => "routine",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for TriageSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.class())
    }
}

/// Triage badge shown as its own transcript entry after a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageBadge {
    /// Parsed severity.
    pub severity: TriageSeverity,
    /// Raw wire label, kept for display and for diagnosing `Unrecognized`.
    pub label: String,
    /// Free-text reason supplied by the backend.
    pub reason: String,
}

impl TriageBadge {
    /// Build a badge from the wire label and reason.
    pub fn new(label: impl Into<String>, reason: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            severity: TriageSeverity::parse(&label),
            label,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        for level in ["Emergency", "EMERGENCY", "emergency", " emergency "] {
            assert_eq!(TriageSeverity::parse(level), TriageSeverity::Emergency);
        }
        assert_eq!(TriageSeverity::parse("Urgent"), TriageSeverity::Urgent);
        assert_eq!(TriageSeverity::parse("routine"), TriageSeverity::Routine);
    }

    #[test]
    fn unknown_levels_stay_flagged() {
        for level in ["Normal", "critical", "", "ROUTINE!"] {
            assert_eq!(TriageSeverity::parse(level), TriageSeverity::Unrecognized);
        }
    }

    #[test]
    fn badge_keeps_raw_label() {
        let badge = TriageBadge::new("Normal", "Stable condition.");
        assert_eq!(badge.severity, TriageSeverity::Unrecognized);
        assert_eq!(badge.label, "Normal");
        assert_eq!(badge.reason, "Stable condition.");
    }

    #[test]
    fn class_mapping_is_distinct() {
        let classes = [
            TriageSeverity::Emergency.class(),
            TriageSeverity::Urgent.class(),
            TriageSeverity::Routine.class(),
            TriageSeverity::Unrecognized.class(),
        ];
        for (i, a) in classes.iter().enumerate() {
            for b in &classes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
