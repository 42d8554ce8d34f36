//! EventLog - Timestamped Event Recording
//!
//! ## Responsibilities
//!
//! - Append `[YYYY-MM-DD HH:MM:SS] message` lines to a durable log file
//! - Mirror every line to the console sink via tracing
//! - Serve the raw accumulated text to the log-viewing endpoint
//!
//! Recording is best-effort: a file write failure must never crash the
//! caller, so it is traced and dropped.

use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// EventLog instance
pub struct EventLog {
    /// Append-only log file path
    log_file: PathBuf,
    /// Serializes appends so lines never interleave
    write_lock: Mutex<()>,
}

impl EventLog {
    /// Create new EventLog writing to `log_file`
    pub fn new(log_file: PathBuf) -> Self {
        Self {
            log_file,
            write_lock: Mutex::new(()),
        }
    }

    /// Append a timestamped line to the log file and mirror it to the console
    pub async fn record(&self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] {}\n", timestamp, message);

        tracing::info!("{}", line.trim_end());

        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.append(&line).await {
            tracing::warn!(
                error = %e,
                log_file = %self.log_file.display(),
                "Failed to append to event log, line dropped"
            );
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }

    /// Full accumulated log text, or None if the file has never been written
    pub async fn read_all(&self) -> Option<String> {
        tokio::fs::read_to_string(&self.log_file).await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn read_all_is_none_before_first_record() {
        let dir = tempdir().unwrap();
        let log = EventLog::new(dir.path().join("logs.txt"));
        assert!(log.read_all().await.is_none());
    }

    #[tokio::test]
    async fn record_appends_timestamped_lines_in_order() {
        let dir = tempdir().unwrap();
        let log = EventLog::new(dir.path().join("logs.txt"));

        log.record("Image received: x.png").await;
        log.record("Peer has not requested an image.").await;

        let text = log.read_all().await.unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] Image received: x.png"));
        assert!(lines[1].ends_with("] Peer has not requested an image."));
    }

    #[tokio::test]
    async fn record_survives_unwritable_sink() {
        // Directory path used as a file: every append fails, record must not panic
        let dir = tempdir().unwrap();
        let log = EventLog::new(dir.path().to_path_buf());
        log.record("dropped").await;
        assert!(log.read_all().await.is_none());
    }
}
