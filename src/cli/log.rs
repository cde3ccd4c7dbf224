//! `navguard log` — browse and display audit logs.
//!
//! Shows what happened in a shell session: every navigation the view
//! attempted, which stayed in the app, which went to the system browser,
//! and which page messages were thrown away.

use crate::audit::{AuditReader, EntryKind, LogFilter, VerdictFilter};
use anyhow::{bail, Context, Result};
use colored::Colorize;

/// Run the `navguard log` command.
pub fn run_log(
    session_id: Option<&str>,
    kind_filter: Option<&str>,
    verdict_filter: Option<&str>,
    limit: Option<usize>,
    summary_only: bool,
) -> Result<()> {
    let reader = AuditReader::new().context("Failed to initialize log reader")?;

    let entries = if let Some(sid) = session_id {
        reader
            .read_session(sid)
            .with_context(|| format!("Failed to read session: {}", sid))?
    } else {
        let entries = reader.read_latest_session()?;
        if entries.is_empty() {
            println!();
            println!("  {} No audit logs found.", "ℹ".blue());
            println!("  Run a shell through navguard first:");
            println!("    {}", "navguard serve".dimmed());
            println!();
            return Ok(());
        }
        entries
    };

    let kind = match kind_filter {
        Some(k) => Some(EntryKind::from_str_loose(k).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown entry kind '{}'. Use: navigation, open_request, discarded_message, open_failed, load_failed",
                k
            )
        })?),
        None => None,
    };
    let verdict = match verdict_filter {
        Some(v) => match VerdictFilter::from_str_loose(v) {
            Some(f) => Some(f),
            None => bail!(
                "Unknown verdict '{}'. Use: in_view, external, passthrough, rejected",
                v
            ),
        },
        None => None,
    };

    let filter = LogFilter {
        session_id: session_id.map(|s| s.to_string()),
        kind,
        verdict,
        limit,
    };

    let filtered = AuditReader::filter_entries(&entries, &filter);

    if summary_only {
        let summary = AuditReader::summarize(&entries);
        println!();
        println!(
            "  {} Session: {}",
            "📋".to_string().bold(),
            summary.session_id.cyan()
        );
        println!("  Shell: {}", summary.shell);
        println!();
        println!(
            "  {} total | {} in view | {} external | {} passthrough | {} rejected",
            summary.total_events.to_string().bold(),
            summary.in_view.to_string().green().bold(),
            summary.external.to_string().blue().bold(),
            summary.passthrough.to_string().dimmed(),
            summary.rejected.to_string().red().bold(),
        );
        if summary.discarded > 0 || summary.open_failures > 0 {
            println!(
                "  {} discarded messages | {} failed handoffs",
                summary.discarded.to_string().yellow(),
                summary.open_failures.to_string().yellow(),
            );
        }

        if let (Some(start), Some(end)) = (summary.start_time, summary.end_time) {
            let duration = end - start;
            println!("  Duration: {}", format_duration(duration.num_seconds()));
        }
        println!();
    } else {
        println!();
        if let Some(first) = filtered.first() {
            println!(
                "  Session: {} | Shell: {}",
                first.session_id.cyan(),
                first.shell
            );
            println!();
        }

        for entry in &filtered {
            println!("  {}", AuditReader::format_entry(entry));
        }

        let summary = AuditReader::summarize(&entries);
        println!();
        println!(
            "  {} {}",
            "─".repeat(40).dimmed(),
            summary.one_line().dimmed()
        );
        println!();
    }

    Ok(())
}

/// List available sessions.
pub fn run_log_list() -> Result<()> {
    let reader = AuditReader::new()?;
    let sessions = reader.list_sessions()?;

    if sessions.is_empty() {
        println!();
        println!("  {} No sessions found.", "ℹ".blue());
        println!();
        return Ok(());
    }

    println!();
    println!("  {} Recorded sessions:", "📋".to_string().bold());
    println!();
    for session in &sessions {
        println!("  • {}", session);
    }
    println!();
    println!("  View a session: {}", "navguard log --session <id>".dimmed());
    println!();

    Ok(())
}

fn format_duration(seconds: i64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
