//! Config linter — detects common shell misconfigurations.
//!
//! When a user runs `navguard check`, the linter scans the config for:
//! - A start page that the policy itself would consider external
//! - Owned domains broad enough to swallow unrelated sites
//! - Handoff triggers that either never fire or fire during redirects
//! - Special-scheme lists that are empty or repeat the built-ins
//!
//! This is the "will my shell actually behave?" check.

use crate::policy::classifier::{DomainClassifier, BUILTIN_SPECIAL_SCHEMES};
use crate::policy::types::*;
use colored::Colorize;

/// A lint warning — something the user should know about their config.
#[derive(Debug)]
pub struct LintWarning {
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug)]
pub enum Severity {
    /// Something that will misroute navigations
    Warning,
    /// A suggestion for improvement
    Info,
}

impl LintWarning {
    fn warn(msg: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: msg.into(),
            suggestion: None,
        }
    }

    fn warn_with_fix(msg: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: msg.into(),
            suggestion: Some(fix.into()),
        }
    }

    fn info(msg: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: msg.into(),
            suggestion: None,
        }
    }

    /// Format for terminal output.
    pub fn display(&self) -> String {
        let icon = match self.severity {
            Severity::Warning => "⚠".yellow().to_string(),
            Severity::Info => "ℹ".blue().to_string(),
        };
        let mut out = format!("  {} {}", icon, self.message);
        if let Some(ref suggestion) = self.suggestion {
            out.push_str(&format!("\n    {}: {}", "Fix".green(), suggestion));
        }
        out
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }
}

/// Lint a config and return warnings.
pub fn lint_config(config: &ShellConfig) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    check_site_is_owned(config, &mut warnings);
    check_secure_site(config, &mut warnings);
    check_domain_breadth(config, &mut warnings);
    check_handoff_triggers(config, &mut warnings);
    check_special_schemes(config, &mut warnings);

    warnings
}

/// Check: is the start page inside the owned domain?
fn check_site_is_owned(config: &ShellConfig, warnings: &mut Vec<LintWarning>) {
    let classifier = DomainClassifier::from_config(config);
    if !classifier.is_owned_domain(config.site_url.as_str()) {
        warnings.push(LintWarning::warn_with_fix(
            format!(
                "site_url {} is outside owned_domain {} — every link on the start page will leave the app",
                config.site_url, config.owned_domain
            ),
            format!(
                "Set owned_domain to {} (or a parent domain of it)",
                config.site_url.host_str().unwrap_or("the site's host")
            ),
        ));
    }
}

/// Check: is the site served over https?
fn check_secure_site(config: &ShellConfig, warnings: &mut Vec<LintWarning>) {
    if config.site_url.scheme() != "http" {
        return;
    }
    let is_local = matches!(
        config.site_url.host_str(),
        Some("localhost") | Some("127.0.0.1") | Some("[::1]")
    );
    if is_local {
        warnings.push(LintWarning::info(
            "site_url uses plain http on a local host — fine for development, not for a release build",
        ));
    } else {
        warnings.push(LintWarning::warn_with_fix(
            format!("site_url {} uses plain http", config.site_url),
            "Serve the site over https and update site_url",
        ));
    }
}

/// Check: is the owned domain a registrable name rather than a bare TLD?
fn check_domain_breadth(config: &ShellConfig, warnings: &mut Vec<LintWarning>) {
    let is_ip = config.owned_domain.parse::<std::net::IpAddr>().is_ok();
    if !is_ip && config.owned_domain != "localhost" && !config.owned_domain.contains('.') {
        warnings.push(LintWarning::warn(format!(
            "owned_domain '{}' has a single label — every *.{} site would stay in the app",
            config.owned_domain, config.owned_domain
        )));
    }
}

/// Check: do the handoff triggers make sense?
fn check_handoff_triggers(config: &ShellConfig, warnings: &mut Vec<LintWarning>) {
    if config.handoff_triggers.is_empty() {
        warnings.push(LintWarning::warn_with_fix(
            "handoff_triggers is empty — external web links will load inside the app",
            "Add: handoff_triggers: [click]",
        ));
        return;
    }

    if !config.handoff_triggers.contains(&TriggerKind::Click) {
        warnings.push(LintWarning::warn(
            "handoff_triggers does not include click — tapped external links will load inside the app",
        ));
    }

    for trigger in &config.handoff_triggers {
        if matches!(
            trigger,
            TriggerKind::Programmatic | TriggerKind::Reload | TriggerKind::BackForward
        ) {
            warnings.push(LintWarning::warn(format!(
                "handoff_triggers includes {} — redirects and history moves during page load can bounce between the app and the browser",
                trigger
            )));
        }
    }
}

/// Check: are the special schemes useful?
fn check_special_schemes(config: &ShellConfig, warnings: &mut Vec<LintWarning>) {
    if config.special_schemes.is_empty() {
        warnings.push(LintWarning::info(
            "No vendor deep links configured — only tel:, mailto: and sms: go straight to the OS. Add chat or store schemes the site links to (e.g. whatsapp, market).",
        ));
        return;
    }

    let mut seen: Vec<&str> = Vec::new();
    for scheme in &config.special_schemes {
        if BUILTIN_SPECIAL_SCHEMES.contains(&scheme.as_str()) {
            warnings.push(LintWarning::info(format!(
                "special_schemes lists {} which is always handed off — the entry can go",
                scheme
            )));
        } else if seen.contains(&scheme.as_str()) {
            warnings.push(LintWarning::info(format!(
                "special_schemes lists {} more than once",
                scheme
            )));
        }
        seen.push(scheme.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::parser;

    #[test]
    fn test_lint_oliva_has_no_warnings() {
        let config = parser::parse_config_str(crate::policy::defaults::OLIVA_YAML).unwrap();
        let warnings = lint_config(&config);
        let warning_count = warnings.iter().filter(|w| w.is_warning()).count();
        assert!(
            warning_count == 0,
            "oliva should have no warnings, got {}: {:?}",
            warning_count,
            warnings.iter().map(|w| &w.message).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_lint_site_outside_domain() {
        let yaml = r#"
site_url: https://www.example.org/
owned_domain: oliva.church
"#;
        let config = parser::parse_config_str(yaml).unwrap();
        let warnings = lint_config(&config);
        assert!(warnings
            .iter()
            .any(|w| w.is_warning() && w.message.contains("outside owned_domain")));
    }

    #[test]
    fn test_lint_catches_bad_triggers_and_http() {
        let yaml = r#"
site_url: http://oliva.church/
owned_domain: church
handoff_triggers: [programmatic]
special_schemes: [tel, whatsapp, whatsapp]
"#;
        let config = parser::parse_config_str(yaml).unwrap();
        let warnings = lint_config(&config);

        // plain http, single-label domain, no click, programmatic trigger
        let warning_count = warnings.iter().filter(|w| w.is_warning()).count();
        assert!(
            warning_count >= 4,
            "Expected at least 4 warnings, got {}",
            warning_count
        );
        // tel: duplicate of built-in, whatsapp: repeated
        assert!(warnings.iter().filter(|w| !w.is_warning()).count() >= 2);
    }

    #[test]
    fn test_lint_localhost_http_is_info() {
        let config = parser::parse_config_str("site_url: http://localhost:3000/").unwrap();
        let warnings = lint_config(&config);
        assert!(warnings
            .iter()
            .any(|w| !w.is_warning() && w.message.contains("local host")));
        assert!(!warnings.iter().any(|w| w.message.contains("single label")));
    }
}
