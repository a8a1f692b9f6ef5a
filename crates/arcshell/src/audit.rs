//! Audit log
//!
//! One [`CommandRecord`] is written per non-blank command line, before the
//! command runs, whatever its outcome. Sinks are append-only.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use csv_async::AsyncWriterBuilder;

use crate::error::{Error, Result};

/// Timestamp layout used in the CSV log.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One journaled command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub timestamp: DateTime<Local>,
    pub username: String,
    /// Command name (first word of the line).
    pub command: String,
    /// Remaining words joined by single spaces.
    pub args: String,
}

impl CommandRecord {
    /// Record stamped with the current local time.
    pub fn new(username: &str, command: &str, args: &[String]) -> Self {
        Self {
            timestamp: Local::now(),
            username: username.to_string(),
            command: command.to_string(),
            args: args.join(" "),
        }
    }

    /// Fields of the CSV row: `timestamp,username,command,args`.
    pub fn csv_fields(&self) -> [String; 4] {
        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.username.clone(),
            self.command.clone(),
            self.args.clone(),
        ]
    }
}

/// Append-only destination for command records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one record.
    async fn record(&self, record: &CommandRecord) -> Result<()>;
}

/// CSV file sink.
#[derive(Debug, Clone)]
pub struct CsvAuditLog {
    path: PathBuf,
}

impl CsvAuditLog {
    /// Open the log at `path`, creating it empty if absent.
    ///
    /// Existing contents are kept; new records are appended.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| Error::Audit(format!("{}: {}", path.display(), e)))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for CsvAuditLog {
    async fn record(&self, record: &CommandRecord) -> Result<()> {
        let audit_err =
            |e: &dyn std::fmt::Display| Error::Audit(format!("{}: {}", self.path.display(), e));

        let file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| audit_err(&e))?;
        let mut writer = AsyncWriterBuilder::new()
            .has_headers(false)
            .create_writer(file);
        writer
            .write_record(&record.csv_fields())
            .await
            .map_err(|e| audit_err(&e))?;
        writer.flush().await.map_err(|e| audit_err(&e))?;
        Ok(())
    }
}

/// In-memory sink. Clones share the same record list.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    records: Arc<Mutex<Vec<CommandRecord>>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records written so far, in order.
    pub fn records(&self) -> Vec<CommandRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditLog {
    async fn record(&self, record: &CommandRecord) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.clone());
        Ok(())
    }
}
