//! Append-only feedback event log (JSON lines).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::intake::CustomerFeedback;

pub const FEEDBACK_SUBMITTED: &str = "customer_feedback_submitted";

/// One line of the feedback log.
///
/// Fields are declared in lexicographic order so serialized keys are sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub event: String,
    pub feedback: CustomerFeedback,
    pub timestamp: String,
}

impl FeedbackEvent {
    pub fn submitted(feedback: CustomerFeedback) -> Self {
        Self {
            event: FEEDBACK_SUBMITTED.to_string(),
            feedback,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}

/// Append a `customer_feedback_submitted` event to `path`.
pub fn log_feedback(path: &Path, feedback: &CustomerFeedback) -> Result<FeedbackEvent> {
    let event = FeedbackEvent::submitted(feedback.clone());
    append_event(path, &event)?;
    info!(path = %path.display(), rating = ?feedback.rating, "feedback event logged");
    Ok(event)
}

fn append_event(path: &Path, event: &FeedbackEvent) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let mut line = serde_json::to_string(event).context("serialize feedback event")?;
    line.push('\n');
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open feedback log {}", path.display()))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("append feedback log {}", path.display()))
}

/// Read every event from `path`; a missing file has no events.
pub fn read_feedback_log(path: &Path) -> Result<Vec<FeedbackEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("parse {} line {}", path.display(), index + 1))
        })
        .collect()
}
