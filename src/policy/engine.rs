//! Navigation policy engine: the decision point for every navigation.
//!
//! The engine classifies the target URL and decides one of:
//! keep it in the embedded view, hand it to the OS, let it pass, or reject it.
//!
//! State machine (there is no terminal state):
//!
//! ```text
//! Idle --request--> NavigationRequested --owned--------------> AllowedInView
//!                                       --external + user----> DelegatedExternal
//!                                       --passthrough/reject-> Idle
//! any --settle--> Idle
//! ```
//!
//! Handlers take `&mut self`, so each request runs to completion before the
//! next one starts. A request that arrives before the previous one settled
//! settles it implicitly.

use crate::policy::classifier::DomainClassifier;
use crate::policy::host::{BrowserView, ExternalOpener, OpenError};
use crate::policy::types::*;

/// Result of handling one request against the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub verdict: Verdict,
    /// Set when the OS refused the handoff. Never fatal.
    pub open_error: Option<OpenError>,
}

impl Handled {
    fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            open_error: None,
        }
    }
}

/// Stateful navigation policy for one embedded view.
#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    shell: String,
    classifier: DomainClassifier,
    handoff_triggers: Vec<TriggerKind>,
    state: NavigationState,
}

impl NavigationPolicy {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            shell: config.shell.clone(),
            classifier: DomainClassifier::from_config(config),
            handoff_triggers: config.handoff_triggers.clone(),
            state: NavigationState::Idle,
        }
    }

    /// Decide what a request deserves, without touching the host or the state.
    pub fn evaluate(&self, request: &NavigationRequest) -> Verdict {
        let classification = self.classifier.classify(&request.url);

        if classification.owned_domain {
            return Verdict::AllowedInView;
        }

        // The view can't render these at all, so they leave whatever the trigger.
        if classification.scheme.is_special() {
            return Verdict::DelegatedExternal {
                url: request.url.clone(),
            };
        }

        if !self.is_user_initiated(request.trigger) {
            return Verdict::Passthrough;
        }

        // geo:, itms-apps:, ftp: and friends go to whatever app claims them.
        if classification.scheme.is_openable() {
            Verdict::DelegatedExternal {
                url: request.url.clone(),
            }
        } else {
            Verdict::Rejected {
                reason: format!("scheme {} can't be handed to the OS", classification.scheme),
            }
        }
    }

    /// Handle a navigation reported by the embedded view.
    ///
    /// On a delegated verdict the URL is opened externally and the view is told
    /// to go back; both always happen, even if the open fails. The order the
    /// platform carries them out in is not guaranteed.
    pub fn handle_navigation<H>(&mut self, request: &NavigationRequest, host: &mut H) -> Handled
    where
        H: ExternalOpener + BrowserView + ?Sized,
    {
        if self.state != NavigationState::Idle {
            tracing::debug!(
                "Navigation to {} arrived while {}; settling previous one",
                request.url,
                self.state
            );
            self.settle();
        }
        self.state = NavigationState::NavigationRequested;

        let verdict = self.evaluate(request);
        tracing::debug!(
            url = %request.url,
            trigger = %request.trigger,
            "Navigation {}",
            verdict
        );

        let mut handled = Handled::new(verdict.clone());
        match verdict {
            Verdict::AllowedInView => {
                self.state = NavigationState::AllowedInView;
            }
            Verdict::DelegatedExternal { url } => {
                self.state = NavigationState::DelegatedExternal;
                handled.open_error = open_logged(&mut *host, &url);
                host.go_back();
            }
            Verdict::Passthrough => {
                self.state = NavigationState::Idle;
            }
            Verdict::Rejected { ref reason } => {
                tracing::warn!("Rejected navigation to {}: {}", request.url, reason);
                host.go_back();
                self.state = NavigationState::Idle;
            }
        }
        handled
    }

    /// Handle an "open new window" request relayed from page script.
    ///
    /// Treated like a vetoed click, except there is no in-view navigation
    /// to revert. Script schemes and unparseable targets are rejected.
    ///
    /// Not a navigation, so the navigation state is left as it is.
    pub fn handle_open_request<H>(&mut self, url: &str, host: &mut H) -> Handled
    where
        H: ExternalOpener + ?Sized,
    {
        let classification = self.classifier.classify(url);
        if !classification.scheme.is_openable() {
            let reason = format!("window.open target has {} scheme", classification.scheme);
            tracing::warn!("Rejected open request for {}: {}", url, reason);
            return Handled::new(Verdict::Rejected { reason });
        }

        let mut handled = Handled::new(Verdict::DelegatedExternal {
            url: url.to_string(),
        });
        handled.open_error = open_logged(&mut *host, url);
        handled
    }

    /// The current navigation finished loading, failed, or was vetoed.
    pub fn settle(&mut self) {
        self.state = NavigationState::Idle;
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn classifier(&self) -> &DomainClassifier {
        &self.classifier
    }

    pub fn shell_name(&self) -> &str {
        &self.shell
    }

    pub fn is_user_initiated(&self, trigger: TriggerKind) -> bool {
        self.handoff_triggers.contains(&trigger)
    }
}

/// Open externally; failures are logged and handed back, never raised.
fn open_logged<H>(host: &mut H, url: &str) -> Option<OpenError>
where
    H: ExternalOpener + ?Sized,
{
    match host.open_external(url) {
        Ok(()) => {
            tracing::info!("Handing off externally: {}", url);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to open {} externally: {}", url, e);
            Some(e)
        }
    }
}
