//! Append-only feedback log.
//!
//! Each submission is one CSV row `Timestamp,Feedback`. The header is
//! written when the file is first created. Timestamps are local time.
//!
//! Default location: `~/.docchat/feedback.csv`

use chrono::Local;
use docchat_core::error::FeedbackError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One stored piece of feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Feedback")]
    pub feedback: String,
}

/// A CSV file that feedback is appended to.
pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    /// The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `text`, stamped with the current local time.
    ///
    /// Blank text is rejected and nothing is written.
    pub fn record(&self, text: &str) -> Result<FeedbackRecord, FeedbackError> {
        let feedback = text.trim();
        if feedback.is_empty() {
            return Err(FeedbackError::Empty);
        }

        let record = FeedbackRecord {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            feedback: feedback.to_string(),
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                FeedbackError::Storage(format!("Failed to create feedback directory: {e}"))
            })?;
        }

        let is_new = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| FeedbackError::Storage(format!("Failed to open feedback log: {e}")))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer
            .serialize(&record)
            .map_err(|e| FeedbackError::Storage(format!("Failed to write feedback: {e}")))?;
        writer
            .flush()
            .map_err(|e| FeedbackError::Storage(format!("Failed to flush feedback log: {e}")))?;

        debug!(path = %self.path.display(), "Feedback recorded");
        Ok(record)
    }

    /// Every stored record, oldest first. A missing file has no entries.
    pub fn entries(&self) -> Result<Vec<FeedbackRecord>, FeedbackError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| FeedbackError::Storage(format!("Failed to open feedback log: {e}")))?;

        let records = reader
            .deserialize::<FeedbackRecord>()
            .filter_map(|row| match row {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupted feedback row");
                    None
                }
            })
            .collect();

        Ok(records)
    }
}
