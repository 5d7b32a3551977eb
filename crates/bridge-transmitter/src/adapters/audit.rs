//! NDJSON fingerprint audit log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::errors::AuditError;
use crate::ports::AuditSink;

#[derive(Serialize)]
struct AuditEntry<'a> {
    fingerprint: &'a str,
    timestamp: f64,
}

/// Append-only newline-delimited JSON audit log of
/// `{fingerprint, timestamp}` records.
pub struct FileAuditSink {
    path: PathBuf,
}

impl FileAuditSink {
    /// Create a sink writing to `path`, creating parent directories lazily
    /// on first record.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, fingerprint: &str, at: SystemTime) -> Result<(), AuditError> {
        let timestamp = at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        let mut line = serde_json::to_vec(&AuditEntry {
            fingerprint,
            timestamp,
        })?;
        line.push(b'\n');

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/fingerprints.ndjson");
        let sink = FileAuditSink::new(&path);

        sink.record(&"ab".repeat(32), SystemTime::UNIX_EPOCH).unwrap();
        sink.record(&"cd".repeat(32), SystemTime::now()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["fingerprint"], serde_json::json!("ab".repeat(32)));
        assert_eq!(first["timestamp"], serde_json::json!(0.0));
    }
}
