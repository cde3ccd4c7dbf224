//! `navguard check` — validate a shell config and lint it.

use crate::policy::{linter, parser, NavigationPolicy};
use crate::utils::paths;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Run the `navguard check` command. Returns the number of lint warnings
/// (info-level suggestions don't count).
pub fn run_check(config_path: Option<&Path>) -> Result<usize> {
    let path = paths::resolve_config(config_path)?;
    let config = parser::parse_config_file(&path)?;
    let policy = NavigationPolicy::new(&config);

    println!();
    println!("  {} Config is valid!", "✓".green().bold());
    println!("  Shell:    {}", config.shell.cyan());
    println!("  Site:     {}", config.site_url.as_str().cyan());
    println!("  Domain:   {} (and subdomains)", config.owned_domain.bold());
    println!(
        "  Handoff:  {}",
        config
            .handoff_triggers
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Schemes:  {}",
        policy.classifier().special_prefixes().join(" ")
    );
    if let Some(ref ua) = config.user_agent {
        println!("  Agent:    {}", ua.dimmed());
    }

    let warnings = linter::lint_config(&config);
    if !warnings.is_empty() {
        println!();
        println!(
            "  {} {} {}:",
            "─".repeat(20).dimmed(),
            warnings.len(),
            if warnings.len() == 1 {
                "suggestion"
            } else {
                "suggestions"
            }
        );
        println!();
        for warning in &warnings {
            println!("{}", warning.display());
        }
    } else {
        println!();
        println!("  {} No issues found — config looks solid.", "✓".green());
    }

    println!();
    Ok(warnings.iter().filter(|w| w.is_warning()).count())
}
