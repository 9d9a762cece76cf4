//! Append-only audit log of domain events, one JSON object per line.

use std::{path::PathBuf, sync::Arc};

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{io::AsyncWriteExt, sync::Mutex};

use crate::utils;

pub const ADD_STUDENT: &str = "add_student";
pub const ADD_CONTENT: &str = "add_content";
pub const ADD_CONTENT_ERROR: &str = "add_content_error";
pub const CREATE_QUIZ: &str = "create_quiz";
pub const QUIZ_RESULT: &str = "quiz_result";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub event: String,
    pub details: Value,
}

#[derive(Clone)]
pub struct EventLog {
    path: PathBuf,
    // Serializes appends so concurrent lines never interleave.
    write_lock: Arc<Mutex<()>>,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn append(&self, event: &str, details: Value) -> Result<()> {
        let entry = LogEntry {
            timestamp: utils::timestamp(),
            event: event.to_string(),
            details,
        };
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    /// Record an event, logging instead of failing when the log cannot be written.
    pub async fn record(&self, event: &str, details: Value) {
        if let Err(e) = self.append(event, details).await {
            tracing::error!("could not append {event} to event log: {e}");
        }
    }

    /// All entries in write order. Unparsable lines are skipped.
    pub async fn entries(&self) -> Result<Vec<LogEntry>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("skipping corrupt event log line: {e}");
                    None
                }
            })
            .collect())
    }
}
