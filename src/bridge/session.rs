//! Shell session — turns host events into shell commands.
//!
//! One session per embedded view. Events are handled strictly one at a time:
//! `handle_event` runs to completion (policy decision, audit entry, command
//! list) before the caller may submit the next event.

use crate::audit::{AuditLogger, EntryKind, LogEntry};
use crate::bridge::protocol::{parse_page_message, HostEvent, PageRequest, ShellCommand};
use crate::policy::{
    BrowserView, ExternalOpener, NavigationPolicy, NavigationRequest, OpenError, ShellConfig,
    TriggerKind,
};
use url::Url;
use uuid::Uuid;

/// Shown when the host reports a load error without a description.
const DEFAULT_LOAD_ERROR: &str = "Failed to load page";

/// Loading state of the embedded view, as far as the host has told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading { url: Option<String> },
    Loaded,
    Failed { description: String },
}

/// Collects commands while the policy drives the host traits.
/// The real open happens on the host side; failures come back as
/// `HostEvent::OpenFailed`.
#[derive(Debug, Default)]
struct CommandBuffer {
    commands: Vec<ShellCommand>,
}

impl ExternalOpener for CommandBuffer {
    fn open_external(&mut self, url: &str) -> Result<(), OpenError> {
        self.commands.push(ShellCommand::OpenExternal {
            url: url.to_string(),
        });
        Ok(())
    }
}

impl BrowserView for CommandBuffer {
    fn go_back(&mut self) {
        self.commands.push(ShellCommand::GoBack);
    }

    fn reload(&mut self) {
        self.commands.push(ShellCommand::Reload);
    }
}

/// A running shell: policy, load state and audit trail for one view.
pub struct ShellSession {
    session_id: String,
    site_url: Url,
    user_agent: Option<String>,
    policy: NavigationPolicy,
    load_state: LoadState,
    logger: Option<AuditLogger>,
}

impl ShellSession {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            site_url: config.site_url.clone(),
            user_agent: config.user_agent.clone(),
            policy: NavigationPolicy::new(config),
            load_state: LoadState::Idle,
            logger: None,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn with_logger(mut self, logger: AuditLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn policy(&self) -> &NavigationPolicy {
        &self.policy
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn logger(&self) -> Option<&AuditLogger> {
        self.logger.as_ref()
    }

    /// The command that starts a freshly connected host on the site.
    pub fn start_command(&self) -> ShellCommand {
        ShellCommand::Load {
            url: self.site_url.to_string(),
            user_agent: self.user_agent.clone(),
        }
    }

    /// Handle one host event and return the commands for the host, in order.
    pub fn handle_event(&mut self, event: HostEvent) -> Vec<ShellCommand> {
        match event {
            HostEvent::Navigation {
                url,
                navigation_type,
            } => self.on_navigation(url, &navigation_type),
            HostEvent::Message { data } => self.on_message(&data),
            HostEvent::LoadStart { url } => {
                let was_failed = matches!(self.load_state, LoadState::Failed { .. });
                self.load_state = LoadState::Loading { url };
                if was_failed {
                    vec![ShellCommand::ClearError]
                } else {
                    Vec::new()
                }
            }
            HostEvent::LoadEnd => {
                if !matches!(self.load_state, LoadState::Failed { .. }) {
                    self.load_state = LoadState::Loaded;
                }
                self.policy.settle();
                Vec::new()
            }
            HostEvent::LoadError { description } => {
                let message = description
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_LOAD_ERROR.to_string());
                tracing::warn!("Content failed to load: {}", message);
                self.record(LogEntry::new(&self.session_id, self.policy.shell_name(), EntryKind::LoadFailed)
                    .with_detail(message.clone()));
                self.load_state = LoadState::Failed {
                    description: message.clone(),
                };
                self.policy.settle();
                vec![ShellCommand::ShowError { message }]
            }
            HostEvent::Retry => {
                let mut buffer = CommandBuffer::default();
                buffer.reload();
                buffer.commands
            }
            HostEvent::OpenFailed { url, reason } => {
                let reason = reason.unwrap_or_else(|| "unknown error".to_string());
                tracing::warn!("Host could not open {} externally: {}", url, reason);
                self.record(
                    LogEntry::new(&self.session_id, self.policy.shell_name(), EntryKind::OpenFailed)
                        .with_url(url)
                        .with_detail(reason),
                );
                Vec::new()
            }
        }
    }

    fn on_navigation(&mut self, url: String, navigation_type: &str) -> Vec<ShellCommand> {
        let trigger = TriggerKind::from_platform(navigation_type);
        let request = NavigationRequest::new(url, trigger);

        let mut buffer = CommandBuffer::default();
        let handled = self.policy.handle_navigation(&request, &mut buffer);
        let vetoed = handled.verdict.is_vetoed();
        if vetoed {
            // A vetoed navigation is settled as soon as it is answered.
            self.policy.settle();
        }

        self.record(
            LogEntry::new(&self.session_id, self.policy.shell_name(), EntryKind::Navigation)
                .with_url(request.url)
                .with_trigger(trigger)
                .with_verdict(handled.verdict),
        );

        let mut commands = vec![ShellCommand::Decision { allow: !vetoed }];
        commands.extend(buffer.commands);
        commands
    }

    fn on_message(&mut self, data: &str) -> Vec<ShellCommand> {
        match parse_page_message(data) {
            Ok(PageRequest::OpenLink { url }) => {
                let url = self.resolve_target(url);
                let mut buffer = CommandBuffer::default();
                let handled = self.policy.handle_open_request(&url, &mut buffer);
                self.record(
                    LogEntry::new(&self.session_id, self.policy.shell_name(), EntryKind::OpenRequest)
                        .with_url(url)
                        .with_verdict(handled.verdict),
                );
                buffer.commands
            }
            Err(e) => {
                tracing::warn!("Discarding page message: {}", e);
                self.record(
                    LogEntry::new(&self.session_id, self.policy.shell_name(), EntryKind::DiscardedMessage)
                        .with_detail(e.to_string()),
                );
                Vec::new()
            }
        }
    }

    /// Page script normally sends absolute URLs, but a relative target that
    /// slipped through is taken relative to the site.
    fn resolve_target(&self, url: String) -> String {
        match Url::parse(&url) {
            Err(url::ParseError::RelativeUrlWithoutBase) => match self.site_url.join(&url) {
                Ok(joined) => joined.to_string(),
                Err(_) => url,
            },
            _ => url,
        }
    }

    fn record(&mut self, entry: LogEntry) {
        if let Some(logger) = self.logger.as_mut() {
            if let Err(e) = logger.log(&entry) {
                tracing::error!("Failed to write audit log: {}", e);
            }
        }
    }
}
