//! Error types for frame acquisition.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while acquiring or encoding frames.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Camera could not be acquired (no device, permission denied).
    #[error("Camera unavailable: {message}")]
    CameraUnavailable { message: String },

    /// Media file could not be opened.
    #[error("Failed to open {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// A frame could not be extracted at the given playback time.
    #[error("Failed to extract frame at {time_secs:.3}s: {message}")]
    ExtractionFailed { time_secs: f64, message: String },

    /// A captured frame could not be encoded for the wire.
    #[error("Failed to encode frame: {0}")]
    EncodeFailed(String),
}

impl CaptureError {
    /// Create a camera-unavailable error.
    pub fn camera_unavailable(message: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            message: message.into(),
        }
    }

    /// Create an open-failed error.
    pub fn open_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an extraction-failed error.
    pub fn extraction_failed(time_secs: f64, message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            time_secs,
            message: message.into(),
        }
    }
}
