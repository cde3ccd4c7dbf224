//! `navguard classify` — show how the shell would treat a URL.

use crate::policy::{parser, NavigationPolicy, NavigationRequest, SchemeKind, TriggerKind, Verdict};
use crate::utils::paths;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// Run the `navguard classify` command for each URL.
pub fn run_classify(urls: &[String], config_path: Option<&Path>, trigger: Option<&str>) -> Result<()> {
    let path = paths::resolve_config(config_path)?;
    let config = parser::parse_config_file(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    let policy = NavigationPolicy::new(&config);

    let trigger = match trigger {
        Some(t) => TriggerKind::from_str_loose(t).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown trigger '{}'. Use: click, form_submit, back_forward, reload, form_resubmit, programmatic, other",
                t
            )
        })?,
        None => TriggerKind::Click,
    };

    println!();
    for url in urls {
        let classification = policy.classifier().classify(url);
        let verdict = policy.evaluate(&NavigationRequest::new(url.clone(), trigger));

        println!("  {}", url.bold());
        println!(
            "    Host:   {}",
            classification.hostname.as_deref().unwrap_or("—").dimmed()
        );
        println!("    Scheme: {}", describe_scheme(&classification.scheme));
        println!(
            "    Owned:  {}",
            if classification.owned_domain {
                "yes".green()
            } else {
                "no".yellow()
            }
        );
        println!("    On {}: {}", trigger, describe_verdict(&verdict));
        println!();
    }

    Ok(())
}

fn describe_scheme(scheme: &SchemeKind) -> String {
    match scheme {
        SchemeKind::Http | SchemeKind::Https => scheme.to_string(),
        SchemeKind::Special(prefix) => format!("{} (handled by the OS)", prefix).blue().to_string(),
        SchemeKind::Other(name) => format!("{}: (not a web scheme)", name).red().to_string(),
        SchemeKind::Invalid => "not a URL".red().to_string(),
    }
}

fn describe_verdict(verdict: &Verdict) -> String {
    match verdict {
        Verdict::AllowedInView => format!("{} stays in the app", "✓".green()),
        Verdict::DelegatedExternal { .. } => format!("{} opens outside the app", "↗".blue()),
        Verdict::Passthrough => format!("{} left to the view", "→".dimmed()),
        Verdict::Rejected { reason } => format!("{} rejected: {}", "✗".red(), reason),
    }
}
