//! Audit log reader — filter and display session logs.
//!
//! Reads JSONL log files and provides filtering, summarization,
//! and pretty-printing for the `navguard log` command.

use crate::audit::types::*;
use crate::policy::types::Verdict;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and queries audit log files.
pub struct AuditReader {
    log_dir: PathBuf,
}

impl AuditReader {
    /// Create a reader using the default log directory.
    pub fn new() -> Result<Self> {
        let log_dir = crate::audit::logger::AuditLogger::log_directory()?;
        Ok(Self { log_dir })
    }

    /// Create a reader for a specific directory (for testing).
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            log_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Read all entries from a session log file.
    pub fn read_session(&self, session_id: &str) -> Result<Vec<LogEntry>> {
        let path = self.log_dir.join(format!("{}.jsonl", session_id));
        Self::read_file(&path)
    }

    /// Read entries from a specific log file.
    pub fn read_file(path: &Path) -> Result<Vec<LogEntry>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read log file: {}", path.display()))?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(i, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("Failed to parse log entry at line {}", i + 1))
            })
            .collect()
    }

    /// Read entries from the most recent session.
    pub fn read_latest_session(&self) -> Result<Vec<LogEntry>> {
        match self.find_latest_session()? {
            Some(path) => Self::read_file(&path),
            None => Ok(Vec::new()),
        }
    }

    /// Find the most recently modified session log file.
    fn find_latest_session(&self) -> Result<Option<PathBuf>> {
        if !self.log_dir.exists() {
            return Ok(None);
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&self.log_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |e| e == "jsonl"))
            .collect();

        entries.sort_by(|a, b| {
            let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
            let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time)
        });

        Ok(entries.into_iter().next())
    }

    /// List all available session IDs.
    pub fn list_sessions(&self) -> Result<Vec<String>> {
        if !self.log_dir.exists() {
            return Ok(Vec::new());
        }

        let mut sessions: Vec<String> = fs::read_dir(&self.log_dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "jsonl"))
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
            })
            .collect();

        sessions.sort();
        Ok(sessions)
    }

    /// Filter entries based on criteria.
    pub fn filter_entries(entries: &[LogEntry], filter: &LogFilter) -> Vec<LogEntry> {
        entries
            .iter()
            .filter(|e| {
                if let Some(ref session) = filter.session_id {
                    if e.session_id != *session {
                        return false;
                    }
                }
                if let Some(kind) = filter.kind {
                    if e.kind != kind {
                        return false;
                    }
                }
                if let Some(verdict_filter) = filter.verdict {
                    match e.verdict {
                        Some(ref verdict) if verdict_filter.matches(verdict) => {}
                        _ => return false,
                    }
                }
                true
            })
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Generate a summary for a set of log entries.
    pub fn summarize(entries: &[LogEntry]) -> SessionSummary {
        let mut summary = SessionSummary::default();

        if let Some(first) = entries.first() {
            summary.session_id = first.session_id.clone();
            summary.shell = first.shell.clone();
            summary.start_time = Some(first.timestamp);
        }
        if let Some(last) = entries.last() {
            summary.end_time = Some(last.timestamp);
        }

        summary.total_events = entries.len();
        for entry in entries {
            match entry.kind {
                EntryKind::DiscardedMessage => summary.discarded += 1,
                EntryKind::OpenFailed => summary.open_failures += 1,
                _ => {}
            }
            match entry.verdict {
                Some(Verdict::AllowedInView) => summary.in_view += 1,
                Some(Verdict::DelegatedExternal { .. }) => summary.external += 1,
                Some(Verdict::Passthrough) => summary.passthrough += 1,
                Some(Verdict::Rejected { .. }) => summary.rejected += 1,
                None => {}
            }
        }

        summary
    }

    /// Pretty-print a log entry for terminal display.
    pub fn format_entry(entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S").to_string();
        let verdict_str = match (&entry.kind, &entry.verdict) {
            (_, Some(Verdict::AllowedInView)) => "IN VIEW".green().to_string(),
            (_, Some(Verdict::DelegatedExternal { .. })) => "EXTERNAL".cyan().to_string(),
            (_, Some(Verdict::Passthrough)) => "PASS".dimmed().to_string(),
            (_, Some(Verdict::Rejected { .. })) => "REJECTED".red().to_string(),
            (EntryKind::DiscardedMessage, None) => "DISCARDED".yellow().to_string(),
            (EntryKind::OpenFailed, None) => "OPEN FAILED".red().to_string(),
            (EntryKind::LoadFailed, None) => "LOAD FAILED".red().to_string(),
            (_, None) => "-".dimmed().to_string(),
        };

        let kind = match entry.trigger {
            Some(trigger) => format!("{} ({})", entry.kind, trigger),
            None => entry.kind.to_string(),
        };
        let mut line = format!(
            "[{}] {} {} -> {}",
            timestamp.dimmed(),
            verdict_str,
            kind.bold(),
            entry.url.as_deref().unwrap_or("-")
        );

        if let Some(ref detail) = entry.detail {
            line.push_str(&format!(" ({})", detail.dimmed()));
        }

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::logger::AuditLogger;
    use crate::policy::types::TriggerKind;
    use tempfile::TempDir;

    fn sample_entries() -> Vec<LogEntry> {
        vec![
            LogEntry::new("s1", "oliva-church", EntryKind::Navigation)
                .with_url("https://oliva.church/giving")
                .with_trigger(TriggerKind::Click)
                .with_verdict(Verdict::AllowedInView),
            LogEntry::new("s1", "oliva-church", EntryKind::Navigation)
                .with_url("https://youtube.com/watch?v=x")
                .with_trigger(TriggerKind::Click)
                .with_verdict(Verdict::DelegatedExternal {
                    url: "https://youtube.com/watch?v=x".into(),
                }),
            LogEntry::new("s1", "oliva-church", EntryKind::DiscardedMessage)
                .with_detail("payload is not JSON"),
            LogEntry::new("s1", "oliva-church", EntryKind::OpenRequest)
                .with_url("javascript:void(0)")
                .with_verdict(Verdict::Rejected {
                    reason: "bad scheme".into(),
                }),
        ]
    }

    #[test]
    fn test_summarize() {
        let summary = AuditReader::summarize(&sample_entries());
        assert_eq!(summary.session_id, "s1");
        assert_eq!(summary.total_events, 4);
        assert_eq!(summary.in_view, 1);
        assert_eq!(summary.external, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.discarded, 1);
        assert!(summary.one_line().contains("4 events"));
    }

    #[test]
    fn test_filter_by_kind_and_verdict() {
        let entries = sample_entries();

        let filter = LogFilter {
            kind: Some(EntryKind::Navigation),
            ..Default::default()
        };
        assert_eq!(AuditReader::filter_entries(&entries, &filter).len(), 2);

        let filter = LogFilter {
            verdict: Some(VerdictFilter::External),
            ..Default::default()
        };
        let external = AuditReader::filter_entries(&entries, &filter);
        assert_eq!(external.len(), 1);
        assert_eq!(external[0].url.as_deref(), Some("https://youtube.com/watch?v=x"));

        let filter = LogFilter {
            limit: Some(3),
            ..Default::default()
        };
        assert_eq!(AuditReader::filter_entries(&entries, &filter).len(), 3);
    }

    #[test]
    fn test_read_and_list_sessions() {
        let tmp = TempDir::new().unwrap();
        let mut logger = AuditLogger::with_path(tmp.path().join("s1.jsonl")).unwrap();
        for entry in sample_entries() {
            logger.log(&entry).unwrap();
        }

        let reader = AuditReader::with_dir(tmp.path());
        assert_eq!(reader.list_sessions().unwrap(), vec!["s1".to_string()]);
        assert_eq!(reader.read_session("s1").unwrap().len(), 4);
        assert_eq!(reader.read_latest_session().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let reader = AuditReader::with_dir("/nonexistent/navguard/logs");
        assert!(reader.list_sessions().unwrap().is_empty());
        assert!(reader.read_latest_session().unwrap().is_empty());
    }
}
