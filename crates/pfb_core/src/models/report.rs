//! One-shot feedback report export.
//!
//! The report is a snapshot of the last inference result, serialized as
//! pretty-printed JSON so the user can download and keep it. Writes are
//! atomic (temp file, then rename).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{InferenceResult, Landmark, PostureMode, ResultStatus};

/// Fixed file name for the exported report.
pub const REPORT_FILE_NAME: &str = "posture_feedback_report.json";

/// Errors that can occur while exporting a report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Snapshot of one inference result, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Mode the frame was evaluated under.
    pub mode: PostureMode,
    /// When the report was generated (RFC 3339, local time).
    pub generated_at: String,
    /// Final status of the submission.
    pub status: ResultStatus,
    /// Rule-violation messages.
    pub feedback_messages: Vec<String>,
    /// Per-message confidences, aligned with `feedback_messages`.
    pub confidences: Vec<f64>,
    /// Detected body keypoints.
    pub landmarks: Vec<Landmark>,
}

impl FeedbackReport {
    /// Build a report from an inference result.
    pub fn from_result(mode: PostureMode, result: &InferenceResult) -> Self {
        Self {
            mode,
            generated_at: chrono::Local::now().to_rfc3339(),
            status: result.status,
            feedback_messages: result.feedback_messages.clone(),
            confidences: result.confidences.clone(),
            landmarks: result.landmarks.clone(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report into `dir` as `posture_feedback_report.json`,
    /// overwriting any previous export.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(dir)?;

        let path = dir.join(REPORT_FILE_NAME);
        let temp_path = path.with_extension("json.tmp");
        let content = self.to_json()?;

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;

        tracing::info!("[Report] Exported feedback report to {}", path.display());
        Ok(path)
    }
}
