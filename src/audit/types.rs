//! Types for the navguard audit log.
//!
//! Every navigation the shell sees gets logged with its verdict, together
//! with page messages that were discarded and handoffs the OS refused.

use crate::policy::types::{TriggerKind, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of event an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A navigation reported by the embedded view
    Navigation,
    /// A window.open request relayed from page script
    OpenRequest,
    /// A page message that could not be parsed or was not understood
    DiscardedMessage,
    /// The OS could not open a handed-off URL
    OpenFailed,
    /// The embedded view failed to load content
    LoadFailed,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Navigation => write!(f, "navigation"),
            EntryKind::OpenRequest => write!(f, "open_request"),
            EntryKind::DiscardedMessage => write!(f, "discarded_message"),
            EntryKind::OpenFailed => write!(f, "open_failed"),
            EntryKind::LoadFailed => write!(f, "load_failed"),
        }
    }
}

impl EntryKind {
    pub fn from_str_loose(s: &str) -> Option<EntryKind> {
        match s.to_lowercase().trim() {
            "navigation" | "nav" => Some(EntryKind::Navigation),
            "open_request" | "open" | "window_open" => Some(EntryKind::OpenRequest),
            "discarded_message" | "discarded" | "message" => Some(EntryKind::DiscardedMessage),
            "open_failed" | "failed_open" => Some(EntryKind::OpenFailed),
            "load_failed" | "load_error" => Some(EntryKind::LoadFailed),
            _ => None,
        }
    }
}

/// A single entry in the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,

    /// Session identifier (UUID, generated when the bridge starts)
    pub session_id: String,

    /// Which shell config was active
    pub shell: String,

    pub kind: EntryKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,

    /// Free-form context: parse error, OS error, load error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LogEntry {
    pub fn new(session_id: &str, shell: &str, kind: EntryKind) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: session_id.to_string(),
            shell: shell.to_string(),
            kind,
            url: None,
            trigger: None,
            verdict: None,
            detail: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerKind) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Summary statistics for a session's audit log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub shell: String,
    pub total_events: usize,
    pub in_view: usize,
    pub external: usize,
    pub passthrough: usize,
    pub rejected: usize,
    pub discarded: usize,
    pub open_failures: usize,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl SessionSummary {
    /// Format as a human-readable one-liner for terminal output.
    pub fn one_line(&self) -> String {
        format!(
            "{} events | {} in view | {} external | {} rejected | {} discarded",
            self.total_events, self.in_view, self.external, self.rejected, self.discarded
        )
    }
}

/// Filter criteria for querying audit logs.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub session_id: Option<String>,
    pub kind: Option<EntryKind>,
    pub verdict: Option<VerdictFilter>,
    pub limit: Option<usize>,
}

/// Filter for verdict types in log queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictFilter {
    InView,
    External,
    Passthrough,
    Rejected,
}

impl VerdictFilter {
    pub fn from_str_loose(s: &str) -> Option<VerdictFilter> {
        match s.to_lowercase().trim() {
            "in_view" | "inview" | "allowed" | "allow" => Some(VerdictFilter::InView),
            "external" | "delegated" | "handoff" => Some(VerdictFilter::External),
            "passthrough" | "pass" => Some(VerdictFilter::Passthrough),
            "rejected" | "reject" | "blocked" => Some(VerdictFilter::Rejected),
            _ => None,
        }
    }

    pub fn matches(&self, verdict: &Verdict) -> bool {
        match self {
            VerdictFilter::InView => matches!(verdict, Verdict::AllowedInView),
            VerdictFilter::External => matches!(verdict, Verdict::DelegatedExternal { .. }),
            VerdictFilter::Passthrough => matches!(verdict, Verdict::Passthrough),
            VerdictFilter::Rejected => matches!(verdict, Verdict::Rejected { .. }),
        }
    }
}
