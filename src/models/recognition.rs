use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine phase whose progress is shown to the user
pub const RECOGNIZING_TEXT: &str = "recognizing text";

/// Monotonically increasing identifier of a recognition job
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Terminal (or pending) outcome of a recognition job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobOutcome {
    Pending,
    SucceededWithText,
    SucceededEmpty,
    Failed,
}

/// One OCR attempt in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionJob {
    pub id: JobId,
    pub language: String,
    /// Fraction in [0, 1] as last reported for the recognizing phase
    pub progress: f32,
    pub outcome: JobOutcome,
    pub started_at: DateTime<Local>,
}

impl RecognitionJob {
    pub fn new(id: JobId, language: impl Into<String>) -> Self {
        Self {
            id,
            language: language.into(),
            progress: 0.0,
            outcome: JobOutcome::Pending,
            started_at: Local::now(),
        }
    }

    /// Milliseconds elapsed since the job started
    pub fn elapsed_ms(&self) -> i64 {
        (Local::now() - self.started_at).num_milliseconds()
    }
}

/// Progress notification emitted by a recognition engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Phase label, e.g. "loading language" or "recognizing text"
    pub status: String,
    /// Fraction of the phase completed
    pub progress: f32,
}

impl ProgressEvent {
    pub fn new(status: impl Into<String>, progress: f32) -> Self {
        Self {
            status: status.into(),
            progress,
        }
    }

    pub fn recognizing(progress: f32) -> Self {
        Self::new(RECOGNIZING_TEXT, progress)
    }

    pub fn is_recognizing_text(&self) -> bool {
        self.status == RECOGNIZING_TEXT
    }

    /// Whole percent for display, `round(progress * 100)` clamped to [0, 100]
    pub fn percent(&self) -> u8 {
        if self.progress.is_nan() {
            return 0;
        }
        (self.progress * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Successful engine result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionOutput {
    pub text: String,
}

impl RecognitionOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Text with surrounding whitespace removed, `None` when nothing usable remains
    pub fn usable_text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}
