//! Bare `navguard` — show which config is in effect and what happened last.

use crate::audit::AuditReader;
use crate::policy::parser;
use crate::utils::paths::{self, CONFIG_FILE_NAME};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// When the user just types `navguard` with no arguments.
pub fn run_status() -> Result<()> {
    let cwd = std::env::current_dir()?;
    match paths::find_config_walking_up(&cwd) {
        None => {
            println!();
            println!("  {} No {} found here.", "ℹ".blue(), CONFIG_FILE_NAME);
            println!(
                "  Create one: {}",
                "navguard init --domain example.org".dimmed()
            );
            println!();
            Ok(())
        }
        Some(path) => show_status(&path),
    }
}

fn show_status(config_path: &Path) -> Result<()> {
    let config = parser::parse_config_file(config_path)?;

    println!();
    println!(
        "  {}  {}",
        "navguard".bold(),
        format!("— {} stays in the app", config.owned_domain).green()
    );
    println!(
        "  {}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".dimmed()
    );
    println!();
    println!("  Shell: {}", config.shell.cyan());
    println!("  Site:  {}", config.site_url.as_str().cyan());
    println!("  File:  {}", config_path.display().to_string().dimmed());

    if let Ok(reader) = AuditReader::new() {
        if let Ok(entries) = reader.read_latest_session() {
            if !entries.is_empty() {
                let summary = AuditReader::summarize(&entries);
                println!();
                println!(
                    "  Last session: {} events ({} in view, {} external, {} rejected)",
                    summary.total_events.to_string().bold(),
                    summary.in_view.to_string().green(),
                    summary.external.to_string().blue(),
                    summary.rejected.to_string().red(),
                );
            }
        }
    }

    println!();
    println!("  {}", "Commands:".dimmed());
    println!("    {}        run the host bridge", "navguard serve".bold());
    println!("    {}     try a URL against the policy", "navguard classify".bold());
    println!("    {}        validate your config", "navguard check".bold());
    println!("    {}          see what the shell did", "navguard log".bold());
    println!();

    Ok(())
}
