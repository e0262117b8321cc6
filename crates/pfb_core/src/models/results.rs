//! Inference result types.

use serde::{Deserialize, Serialize};

use super::ResultStatus;

/// A normalized 2D body keypoint, both coordinates in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Outcome of one frame submission.
///
/// Immutable once produced; shared by reference between the correlator,
/// the feedback log, and the renderer. `confidences` may be shorter than
/// `feedback_messages` - a missing confidence is absent, never zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Rule-violation messages, in the order the service produced them.
    pub feedback_messages: Vec<String>,
    /// Per-message confidence in [0, 1], aligned index-for-index with
    /// `feedback_messages`.
    pub confidences: Vec<f64>,
    /// Detected body keypoints, or empty when none were produced.
    pub landmarks: Vec<Landmark>,
    /// Final status of the submission.
    pub status: ResultStatus,
    /// The raw response body, kept for diagnostics and the report.
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl InferenceResult {
    /// Build an error-status result. The cause is shown to the user as
    /// a single `Error: <cause>` feedback line; transport failures,
    /// capture failures, and encode failures all take this path.
    pub fn failure(cause: impl std::fmt::Display) -> Self {
        Self {
            feedback_messages: vec![format!("Error: {}", cause)],
            confidences: Vec::new(),
            landmarks: Vec::new(),
            status: ResultStatus::Error,
            raw: serde_json::Value::Null,
        }
    }

    /// Build the fixed result for an unrecognized response shape.
    pub fn unexpected_shape(raw: serde_json::Value) -> Self {
        Self {
            feedback_messages: vec!["Unexpected response from backend".to_string()],
            confidences: Vec::new(),
            landmarks: Vec::new(),
            status: ResultStatus::Error,
            raw,
        }
    }

    /// Build the fixed result for a no-subject outcome.
    pub fn no_pose(raw: serde_json::Value) -> Self {
        Self {
            feedback_messages: vec!["No pose detected".to_string()],
            confidences: Vec::new(),
            landmarks: Vec::new(),
            status: ResultStatus::NoPoseDetected,
            raw,
        }
    }

    /// Confidence for message `index`, if the service reported one.
    pub fn confidence_for(&self, index: usize) -> Option<f64> {
        self.confidences.get(index).copied()
    }

    /// Whether the submission produced a usable pose.
    pub fn has_landmarks(&self) -> bool {
        !self.landmarks.is_empty()
    }
}

/// Render a confidence value as a percentage string, e.g. `0.81` -> `81%`.
pub fn display_confidence(confidence: f64) -> String {
    format!("{}%", (confidence * 100.0).round() as i64)
}
