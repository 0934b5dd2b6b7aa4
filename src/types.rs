use chrono::{DateTime, Utc};
use std::fmt;

/// GitHub notification reason code, kept verbatim from the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reason(pub String);

impl Reason {
    pub fn new(code: impl Into<String>) -> Self {
        Reason(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label; unknown codes are shown as-is.
    pub fn label(&self) -> &str {
        match self.0.as_str() {
            "review_requested" => "Review requested",
            "mention" => "Mentioned",
            "assign" => "Assigned",
            "author" => "Author update",
            "comment" => "New comment",
            "ci_activity" => "CI activity",
            "push" => "New push",
            "team_mention" => "Team mentioned",
            "state_change" => "State changed",
            "subscribed" => "Subscribed",
            "manual" => "Manual",
            "security_alert" => "Security alert",
            "your_activity" => "Your activity",
            other => other,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single notification thread entry
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub thread_id: String,
    pub title: String,
    pub subject_type: String,
    pub repository: String,
    pub reason: Reason,
    pub unread: bool,
    pub updated_at: DateTime<Utc>,
    pub url: String,
}

/// Fields that make two notifications "the same" for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityKey<'a> {
    pub reason: &'a str,
    pub subject_type: &'a str,
    pub repository: &'a str,
    pub title: &'a str,
}

impl Notification {
    pub fn identity_key(&self) -> IdentityKey<'_> {
        IdentityKey {
            reason: self.reason.as_str(),
            subject_type: &self.subject_type,
            repository: &self.repository,
            title: &self.title,
        }
    }

    /// Short subject type for the table
    pub fn type_label(&self) -> &str {
        match self.subject_type.as_str() {
            "PullRequest" => "PR",
            other => other,
        }
    }
}

/// State change applied to a notification after a thread action succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadChange {
    Read,
    Done,
}

impl fmt::Display for ThreadChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadChange::Read => write!(f, "read"),
            ThreadChange::Done => write!(f, "done"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::notification;
    use super::*;

    #[test]
    fn reason_label_known_codes() {
        assert_eq!(Reason::new("review_requested").label(), "Review requested");
        assert_eq!(Reason::new("ci_activity").label(), "CI activity");
    }

    #[test]
    fn reason_label_unknown_code_passthrough() {
        assert_eq!(Reason::new("approval_requested").label(), "approval_requested");
    }

    #[test]
    fn identity_key_ignores_id_and_timestamp() {
        let a = notification("1", "o/r", "Same", 0);
        let b = notification("2", "o/r", "Same", 5);
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn identity_key_differs_by_reason() {
        let a = notification("1", "o/r", "Same", 0);
        let mut b = a.clone();
        b.reason = Reason::new("assign");
        assert_ne!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn pull_request_type_is_abbreviated() {
        let mut n = notification("1", "o/r", "t", 0);
        n.subject_type = "PullRequest".to_string();
        assert_eq!(n.type_label(), "PR");
    }
}
