//! Host bridge protocol types.
//!
//! Defines the JSON messages exchanged between the platform host (the app
//! that owns the embedded browser view) and navguard, one JSON object per line.
//!
//! The host sends `HostEvent`s as things happen in the view; navguard answers
//! each one with zero or more `ShellCommand`s before reading the next event.
//!
//! Page script talks to navguard only indirectly: it posts a string payload
//! on the view's message channel, the host forwards it verbatim inside a
//! `HostEvent::Message`, and `parse_page_message` decides what it means.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Something that happened in the embedded view, reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// The view is about to navigate (or just did, on platforms that only
    /// report after the fact).
    Navigation {
        url: String,
        /// Platform spelling: `click`, `formsubmit`, `backforward`, ...
        #[serde(default)]
        navigation_type: String,
    },

    /// Raw payload posted by page script on the message channel.
    Message { data: String },

    LoadStart {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },

    LoadEnd,

    LoadError {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// The user pressed "try again" on the error screen.
    Retry,

    /// The OS refused a URL we asked the host to open.
    OpenFailed {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

/// An instruction from navguard back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ShellCommand {
    /// Load the site. Sent once when a host connects.
    Load {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_agent: Option<String>,
    },

    /// Answer to a `navigation` event: `allow: false` means suppress the
    /// default navigation.
    Decision { allow: bool },

    /// Hand this URL to the OS link-opening facility.
    OpenExternal { url: String },

    /// Undo the pending navigation.
    GoBack,

    Reload,

    /// Show the recoverable load-error screen with a retry action.
    ShowError { message: String },

    ClearError,
}

/// What a page message asked for, once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// `window.open(url)` from page script.
    OpenLink { url: String },
}

/// Why a page message was discarded.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("payload is empty")]
    Empty,

    #[error("payload is not JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload has no string 'type' field")]
    MissingType,

    #[error("unknown message type '{0}'")]
    UnknownType(String),

    #[error("'{0}' message has no usable 'url'")]
    MissingUrl(String),
}

/// The message type the injected script posts for `window.open`.
pub const OPEN_LINK_TYPE: &str = "openLink";

/// Parse a page message. Never panics, whatever the payload.
///
/// Expected shape: `{"type": "openLink", "url": "https://..."}`.
pub fn parse_page_message(raw: &str) -> Result<PageRequest, MessageError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MessageError::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(raw)?;
    let object = value.as_object().ok_or(MessageError::NotAnObject)?;

    let kind = object
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(MessageError::MissingType)?;

    match kind {
        OPEN_LINK_TYPE => {
            let url = object
                .get("url")
                .and_then(|u| u.as_str())
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .ok_or_else(|| MessageError::MissingUrl(kind.to_string()))?;
            Ok(PageRequest::OpenLink {
                url: url.to_string(),
            })
        }
        other => Err(MessageError::UnknownType(other.to_string())),
    }
}
