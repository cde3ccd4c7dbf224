//! End-to-end navigation scenarios.
//!
//! Scenarios that go through the navigation-event layer drive the policy
//! directly against a `RecordingHost`. Scenarios that start as page-script
//! messages go through a `ShellSession`, the way a real host delivers them.

use navguard::audit::{AuditLogger, AuditReader, EntryKind};
use navguard::bridge::{HostEvent, ShellCommand, ShellSession};
use navguard::policy::{
    parser, NavigationPolicy, NavigationRequest, NavigationState, OpenError, RecordingHost,
    ShellConfig, TriggerKind, Verdict,
};
use tempfile::TempDir;

fn test_config() -> ShellConfig {
    parser::parse_config_str(include_str!("fixtures/test_config.yaml")).unwrap()
}

fn policy() -> NavigationPolicy {
    NavigationPolicy::new(&test_config())
}

#[test]
fn test_owned_click_stays_in_view() {
    let mut policy = policy();
    let mut host = RecordingHost::new();

    let handled = policy.handle_navigation(
        &NavigationRequest::click("https://oliva.church/giving"),
        &mut host,
    );

    assert_eq!(handled.verdict, Verdict::AllowedInView);
    assert_eq!(policy.state(), NavigationState::AllowedInView);
    assert!(host.opened.is_empty());
    assert_eq!(host.back_count, 0);
}

#[test]
fn test_external_click_is_handed_off_and_reverted() {
    let mut policy = policy();
    let mut host = RecordingHost::new();

    let handled = policy.handle_navigation(
        &NavigationRequest::click("https://youtube.com/watch?v=x"),
        &mut host,
    );

    assert!(handled.verdict.is_vetoed());
    assert_eq!(
        handled.verdict,
        Verdict::DelegatedExternal {
            url: "https://youtube.com/watch?v=x".to_string()
        }
    );
    assert_eq!(host.opened, vec!["https://youtube.com/watch?v=x".to_string()]);
    assert_eq!(host.back_count, 1);
    assert_eq!(policy.state(), NavigationState::DelegatedExternal);

    policy.settle();
    assert_eq!(policy.state(), NavigationState::Idle);
}

#[test]
fn test_page_open_request_is_handed_off_without_revert() {
    let mut session = ShellSession::new(&test_config()).with_session_id("scenario-3");

    let commands = session.handle_event(HostEvent::Message {
        data: r#"{"type":"openLink","url":"https://maps.google.com"}"#.to_string(),
    });

    assert_eq!(
        commands,
        vec![ShellCommand::OpenExternal {
            url: "https://maps.google.com".to_string()
        }]
    );
    assert!(!commands.contains(&ShellCommand::GoBack));
    assert_eq!(session.policy().state(), NavigationState::Idle);
}

#[test]
fn test_malformed_message_is_logged_once_and_dropped() {
    let log_dir = TempDir::new().unwrap();
    let log_path = log_dir.path().join("scenario-4.jsonl");
    let logger = AuditLogger::with_path(&log_path).unwrap();
    let mut session = ShellSession::new(&test_config())
        .with_session_id("scenario-4")
        .with_logger(logger);

    let commands = session.handle_event(HostEvent::Message {
        data: "not json".to_string(),
    });
    assert!(commands.is_empty());

    // The session keeps working afterwards
    let commands = session.handle_event(HostEvent::Navigation {
        url: "https://oliva.church/".to_string(),
        navigation_type: "click".to_string(),
    });
    assert_eq!(commands, vec![ShellCommand::Decision { allow: true }]);

    let entries = AuditReader::read_file(&log_path).unwrap();
    let discarded: Vec<_> = entries
        .iter()
        .filter(|e| e.kind == EntryKind::DiscardedMessage)
        .collect();
    assert_eq!(discarded.len(), 1);
    assert!(discarded[0].url.is_none());
    assert!(discarded[0].detail.as_deref().unwrap_or("").contains("JSON"));
}

#[test]
fn test_tel_link_goes_to_the_dialer() {
    let mut policy = policy();
    assert!(policy.classifier().is_special_scheme("tel:+15551234567"));
    assert!(!policy.classifier().is_owned_domain("tel:+15551234567"));

    let mut host = RecordingHost::new();
    let handled = policy.handle_navigation(&NavigationRequest::click("tel:+15551234567"), &mut host);
    assert!(handled.verdict.is_delegated());
    assert_eq!(host.opened, vec!["tel:+15551234567".to_string()]);
}

#[test]
fn test_special_scheme_leaves_on_any_trigger() {
    let mut policy = policy();
    for trigger in [TriggerKind::Programmatic, TriggerKind::Other, TriggerKind::FormSubmit] {
        let mut host = RecordingHost::new();
        let handled = policy.handle_navigation(
            &NavigationRequest::new("whatsapp://send?phone=5511999999999", trigger),
            &mut host,
        );
        assert!(handled.verdict.is_delegated(), "{} should delegate", trigger);
        assert_eq!(host.back_count, 1);
        policy.settle();
    }
}

#[test]
fn test_redirect_to_external_site_passes_through() {
    let mut policy = policy();
    let mut host = RecordingHost::new();

    let handled = policy.handle_navigation(
        &NavigationRequest::new("https://accounts.google.com/o/oauth2", TriggerKind::Other),
        &mut host,
    );

    assert_eq!(handled.verdict, Verdict::Passthrough);
    assert!(!handled.verdict.is_vetoed());
    assert!(host.opened.is_empty());
    assert_eq!(host.back_count, 0);
    assert_eq!(policy.state(), NavigationState::Idle);
}

#[test]
fn test_failed_handoff_still_reverts() {
    let mut policy = policy();
    let mut host = RecordingHost::failing(OpenError::NoHandler {
        url: "market://details?id=x".to_string(),
    });

    let handled = policy.handle_navigation(
        &NavigationRequest::click("market://details?id=x"),
        &mut host,
    );

    assert!(handled.verdict.is_delegated());
    assert!(matches!(handled.open_error, Some(OpenError::NoHandler { .. })));
    assert_eq!(host.back_count, 1);

    // Nothing sticks: the next navigation is handled normally.
    policy.settle();
    let mut host = RecordingHost::new();
    let handled = policy.handle_navigation(
        &NavigationRequest::click("https://oliva.church/"),
        &mut host,
    );
    assert_eq!(handled.verdict, Verdict::AllowedInView);
}

#[test]
fn test_new_request_settles_the_previous_one() {
    let mut policy = policy();
    let mut host = RecordingHost::new();

    policy.handle_navigation(&NavigationRequest::click("https://youtube.com/"), &mut host);
    assert_eq!(policy.state(), NavigationState::DelegatedExternal);

    // No settle in between
    let handled = policy.handle_navigation(
        &NavigationRequest::click("https://app.oliva.church/events"),
        &mut host,
    );
    assert_eq!(handled.verdict, Verdict::AllowedInView);
    assert_eq!(policy.state(), NavigationState::AllowedInView);
    assert_eq!(host.opened.len(), 1);
}

#[test]
fn test_session_writes_an_audit_trail() {
    let log_dir = TempDir::new().unwrap();
    let log_path = log_dir.path().join("trail.jsonl");
    let logger = AuditLogger::with_path(&log_path).unwrap();
    let mut session = ShellSession::new(&test_config())
        .with_session_id("trail")
        .with_logger(logger);

    let nav = |url: &str| HostEvent::Navigation {
        url: url.to_string(),
        navigation_type: "click".to_string(),
    };
    session.handle_event(nav("https://oliva.church/giving"));
    session.handle_event(HostEvent::LoadEnd);
    session.handle_event(nav("https://youtube.com/watch?v=x"));
    session.handle_event(nav("javascript:alert(1)"));
    session.handle_event(HostEvent::OpenFailed {
        url: "https://youtube.com/watch?v=x".to_string(),
        reason: Some("no browser".to_string()),
    });

    let entries = AuditReader::read_file(&log_path).unwrap();
    let summary = AuditReader::summarize(&entries);
    assert_eq!(summary.session_id, "trail");
    assert_eq!(summary.shell, "test-shell");
    assert_eq!(summary.in_view, 1);
    assert_eq!(summary.external, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.open_failures, 1);
}

#[test]
fn test_open_link_during_owned_load_keeps_state() {
    let mut session = ShellSession::new(&test_config()).with_session_id("open-while-loading");

    session.handle_event(HostEvent::Navigation {
        url: "https://oliva.church/giving".to_string(),
        navigation_type: "click".to_string(),
    });
    assert_eq!(session.policy().state(), NavigationState::AllowedInView);

    session.handle_event(HostEvent::Message {
        data: r#"{"type":"openLink","url":"https://maps.google.com"}"#.to_string(),
    });
    assert_eq!(session.policy().state(), NavigationState::AllowedInView);
}

#[test]
fn test_relative_window_open_is_resolved_against_site() {
    let mut session = ShellSession::new(&test_config()).with_session_id("relative-open");

    let commands = session.handle_event(HostEvent::Message {
        data: r#"{"type":"openLink","url":"/events/easter"}"#.to_string(),
    });

    assert_eq!(
        commands,
        vec![ShellCommand::OpenExternal {
            url: "https://oliva.church/events/easter".to_string()
        }]
    );
}
