//! Collaborator seams between the policy and the platform.
//!
//! The embedded browser view and the OS link-opening facility are owned by
//! the host platform. The policy only ever talks to them through these traits.

use thiserror::Error;

/// Failure to hand a URL to the OS.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpenError {
    #[error("no handler registered for {url}")]
    NoHandler { url: String },

    #[error("permission denied opening {url}")]
    PermissionDenied { url: String },

    #[error("failed to open {url}: {reason}")]
    Other { url: String, reason: String },
}

/// The OS "open externally" capability (browser, dialer, mail client, store...).
pub trait ExternalOpener {
    fn open_external(&mut self, url: &str) -> Result<(), OpenError>;
}

/// Commands the policy may issue to the embedded browser view.
pub trait BrowserView {
    /// Undo the pending navigation (one step back in view history).
    fn go_back(&mut self);

    /// Reload the current content.
    fn reload(&mut self);
}

/// Records every call instead of touching the OS. Used in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    pub opened: Vec<String>,
    pub back_count: usize,
    pub reload_count: usize,
    /// When set, every open fails with this error.
    pub fail_with: Option<OpenError>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: OpenError) -> Self {
        Self {
            fail_with: Some(error),
            ..Default::default()
        }
    }
}

impl ExternalOpener for RecordingHost {
    fn open_external(&mut self, url: &str) -> Result<(), OpenError> {
        if let Some(ref err) = self.fail_with {
            return Err(err.clone());
        }
        self.opened.push(url.to_string());
        Ok(())
    }
}

impl BrowserView for RecordingHost {
    fn go_back(&mut self) {
        self.back_count += 1;
    }

    fn reload(&mut self) {
        self.reload_count += 1;
    }
}
