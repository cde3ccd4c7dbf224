//! Audit log writer — append-only JSONL files.
//!
//! Writes to `~/.navguard/logs/{session_id}.jsonl`, one JSON object per line.
//! Flushes after every write so a killed app still leaves a readable log.

use crate::audit::types::LogEntry;
use crate::utils::paths;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only audit logger that writes JSONL files.
pub struct AuditLogger {
    log_path: PathBuf,
    /// Kept open for the session lifetime
    file: File,
    entry_count: usize,
}

impl AuditLogger {
    /// Create a new logger for a session under the default log directory.
    pub fn new(session_id: &str) -> Result<Self> {
        let log_dir = Self::log_directory()?;
        fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        Self::with_path(log_dir.join(format!("{}.jsonl", session_id)))
    }

    /// Create a logger writing to a specific path (for testing).
    pub fn with_path(path: impl AsRef<Path>) -> Result<Self> {
        let log_path = path.as_ref().to_path_buf();
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        Ok(Self {
            log_path,
            file,
            entry_count: 0,
        })
    }

    /// Serialize and append one entry, then flush.
    pub fn log(&mut self, entry: &LogEntry) -> Result<()> {
        let json = serde_json::to_string(entry).context("Failed to serialize log entry")?;
        writeln!(self.file, "{}", json).context("Failed to write log entry")?;
        self.file.flush().context("Failed to flush log file")?;
        self.entry_count += 1;
        Ok(())
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Number of entries written this session.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// The default log directory (~/.navguard/logs/).
    pub fn log_directory() -> Result<PathBuf> {
        Ok(paths::data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::types::{EntryKind, LogEntry};
    use crate::policy::types::{TriggerKind, Verdict};
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_log() {
        let tmp = TempDir::new().unwrap();
        let log_path = tmp.path().join("test.jsonl");
        let mut logger = AuditLogger::with_path(&log_path).unwrap();

        let entry = LogEntry::new("test-session", "oliva-church", EntryKind::Navigation)
            .with_url("https://youtube.com/watch?v=x")
            .with_trigger(TriggerKind::Click)
            .with_verdict(Verdict::DelegatedExternal {
                url: "https://youtube.com/watch?v=x".to_string(),
            });

        logger.log(&entry).unwrap();
        assert_eq!(logger.entry_count(), 1);

        let content = fs::read_to_string(&log_path).unwrap();
        let parsed: LogEntry = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed.session_id, "test-session");
        assert_eq!(parsed.kind, EntryKind::Navigation);
        assert_eq!(parsed.trigger, Some(TriggerKind::Click));
        assert!(parsed.verdict.unwrap().is_delegated());
    }

    #[test]
    fn test_append_only() {
        let tmp = TempDir::new().unwrap();
        let log_path = tmp.path().join("nested/dir/test.jsonl");
        let mut logger = AuditLogger::with_path(&log_path).unwrap();

        for i in 0..3 {
            let entry = LogEntry::new("test", "test", EntryKind::Navigation)
                .with_url(format!("https://oliva.church/page/{}", i))
                .with_verdict(Verdict::AllowedInView);
            logger.log(&entry).unwrap();
        }

        assert_eq!(logger.entry_count(), 3);

        let content = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 3);
    }
}
