//! Core types for the navguard navigation policy.
//!
//! These types describe what the host browser component reports (navigation
//! requests), what the classifier derives from a URL, and what the policy
//! decides to do about it.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// What caused the host browser component to attempt a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// The user tapped or clicked a link.
    Click,
    /// The user submitted a form.
    FormSubmit,
    /// History navigation (back/forward gesture or button).
    BackForward,
    /// The page was reloaded.
    Reload,
    /// A form was re-submitted (e.g. reload of a POST result).
    FormResubmit,
    /// Script-driven navigation or server redirect, not initiated by the user.
    Programmatic,
    /// Anything the platform reports that we don't recognise.
    Other,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerKind::Click => write!(f, "click"),
            TriggerKind::FormSubmit => write!(f, "form_submit"),
            TriggerKind::BackForward => write!(f, "back_forward"),
            TriggerKind::Reload => write!(f, "reload"),
            TriggerKind::FormResubmit => write!(f, "form_resubmit"),
            TriggerKind::Programmatic => write!(f, "programmatic"),
            TriggerKind::Other => write!(f, "other"),
        }
    }
}

impl TriggerKind {
    /// Parse a trigger from the spelling a platform webview reports.
    /// iOS WebKit says `formsubmit`/`backforward`, Android and our own
    /// config files tend to use separators, so all of them are accepted.
    pub fn from_str_loose(s: &str) -> Option<TriggerKind> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect();
        match normalized.as_str() {
            "click" | "linkactivated" | "tap" => Some(TriggerKind::Click),
            "formsubmit" | "formsubmitted" | "submit" => Some(TriggerKind::FormSubmit),
            "backforward" | "history" => Some(TriggerKind::BackForward),
            "reload" => Some(TriggerKind::Reload),
            "formresubmit" | "formresubmitted" => Some(TriggerKind::FormResubmit),
            "programmatic" | "redirect" | "script" => Some(TriggerKind::Programmatic),
            "other" => Some(TriggerKind::Other),
            _ => None,
        }
    }

    /// Like `from_str_loose`, but unknown spellings map to `Other`.
    pub fn from_platform(s: &str) -> TriggerKind {
        Self::from_str_loose(s).unwrap_or(TriggerKind::Other)
    }
}

/// A navigation the host browser component is about to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub url: String,
    pub trigger: TriggerKind,
}

impl NavigationRequest {
    pub fn new(url: impl Into<String>, trigger: TriggerKind) -> Self {
        Self {
            url: url.into(),
            trigger,
        }
    }

    pub fn click(url: impl Into<String>) -> Self {
        Self::new(url, TriggerKind::Click)
    }
}

/// Schemes never handed to the OS, whatever the trigger.
pub const SCRIPT_SCHEMES: &[&str] = &["javascript", "data", "vbscript"];

/// The scheme family of a classified URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum SchemeKind {
    Http,
    Https,
    /// One of the OS-handled prefixes (`tel:`, `mailto:`, a deep link, ...).
    Special(String),
    /// Parsed fine, but not a web scheme and not on the special list.
    Other(String),
    /// The string did not parse as an absolute URL.
    Invalid,
}

impl SchemeKind {
    pub fn is_standard(&self) -> bool {
        matches!(self, SchemeKind::Http | SchemeKind::Https)
    }

    pub fn is_special(&self) -> bool {
        matches!(self, SchemeKind::Special(_))
    }

    /// Schemes that run code in whatever opens them.
    pub fn is_script(&self) -> bool {
        matches!(self, SchemeKind::Other(name) if SCRIPT_SCHEMES.contains(&name.as_str()))
    }

    /// Whether the OS may be asked to open it: anything that parsed, except
    /// script schemes.
    pub fn is_openable(&self) -> bool {
        !matches!(self, SchemeKind::Invalid) && !self.is_script()
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeKind::Http => write!(f, "http"),
            SchemeKind::Https => write!(f, "https"),
            SchemeKind::Special(prefix) => write!(f, "special ({})", prefix),
            SchemeKind::Other(name) => write!(f, "other ({})", name),
            SchemeKind::Invalid => write!(f, "invalid"),
        }
    }
}

/// Everything the classifier can say about a URL. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlClassification {
    pub owned_domain: bool,
    pub hostname: Option<String>,
    pub scheme: SchemeKind,
}

/// Where the navigation policy is in its (tiny) lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationState {
    Idle,
    NavigationRequested,
    AllowedInView,
    DelegatedExternal,
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationState::Idle => write!(f, "idle"),
            NavigationState::NavigationRequested => write!(f, "navigation_requested"),
            NavigationState::AllowedInView => write!(f, "allowed_in_view"),
            NavigationState::DelegatedExternal => write!(f, "delegated_external"),
        }
    }
}

/// The outcome of evaluating one navigation (or open-window request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Owned domain. The embedded view proceeds unmodified.
    AllowedInView,
    /// Handed to the OS; the in-view navigation is vetoed.
    DelegatedExternal { url: String },
    /// Not owned, but not user-initiated either. Left alone so redirects
    /// during page construction can't bounce us into a handoff loop.
    Passthrough,
    /// Vetoed and never handed to the OS (e.g. `javascript:` URLs).
    Rejected { reason: String },
}

impl Verdict {
    /// Whether the host must suppress its default navigation.
    pub fn is_vetoed(&self) -> bool {
        matches!(self, Verdict::DelegatedExternal { .. } | Verdict::Rejected { .. })
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::AllowedInView)
    }

    pub fn is_delegated(&self) -> bool {
        matches!(self, Verdict::DelegatedExternal { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Verdict::Rejected { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::AllowedInView => write!(f, "allowed in view"),
            Verdict::DelegatedExternal { url } => write!(f, "delegated external: {}", url),
            Verdict::Passthrough => write!(f, "passthrough"),
            Verdict::Rejected { reason } => write!(f, "rejected: {}", reason),
        }
    }
}

/// Shell configuration: which site we wrap and which domain we own.
/// Built once (from YAML or in code) and handed to the policy at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Config name/identifier (e.g. "oliva-church")
    pub shell: String,

    /// Canonical site URL loaded on start (absolute, http or https).
    pub site_url: Url,

    /// Bare hostname the view may navigate within, subdomains included.
    pub owned_domain: String,

    /// Extra prefixes handed to the OS on top of `tel:`, `mailto:`, `sms:`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special_schemes: Vec<String>,

    /// Triggers that count as user-initiated for external handoff.
    pub handoff_triggers: Vec<TriggerKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ShellConfig {
    /// Minimal config for a site and domain, with default triggers and no
    /// vendor schemes. Inputs are not validated here; use the parser for that.
    pub fn new(site_url: Url, owned_domain: impl Into<String>) -> Self {
        let owned_domain = owned_domain.into().to_ascii_lowercase();
        Self {
            shell: owned_domain.clone(),
            site_url,
            owned_domain,
            special_schemes: Vec::new(),
            handoff_triggers: vec![TriggerKind::Click],
            user_agent: None,
        }
    }

    pub fn with_special_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.special_schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_handoff_triggers(mut self, triggers: impl Into<Vec<TriggerKind>>) -> Self {
        self.handoff_triggers = triggers.into();
        self
    }

    /// Absolute URL for a path on the site. Leading slashes are optional.
    pub fn site_path(&self, path: &str) -> String {
        let base = self.site_url.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
