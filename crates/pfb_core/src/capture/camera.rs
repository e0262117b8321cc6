//! Camera capture.
//!
//! The live session owns exactly one camera for its lifetime; the
//! handle is dropped when the session stops. The FFmpeg implementation
//! grabs one frame per call through the platform capture device, so a
//! "handle" here is just the validated device identity.

use std::io::Cursor;
use std::process::Command;

use image::DynamicImage;

use super::error::CaptureError;

/// A camera that can produce one still frame per grab.
pub trait CameraSource: Send + Sync {
    /// Capture one frame.
    fn grab(&self) -> Result<DynamicImage, CaptureError>;

    /// Human-readable device name for logging.
    fn name(&self) -> &str;
}

/// Callback that acquires a camera when a live session starts.
///
/// Acquisition failure keeps the session idle; the error is surfaced to
/// the caller of `start()`.
pub type CameraOpener =
    Box<dyn Fn() -> Result<std::sync::Arc<dyn CameraSource>, CaptureError> + Send + Sync>;

/// FFmpeg subprocess-based camera.
///
/// Uses the platform capture input (v4l2 / avfoundation / dshow) and
/// extracts a single PNG frame per grab. Slower than a native capture
/// stack but works everywhere FFmpeg is installed, and comfortably
/// fast enough for a grab every couple of seconds.
pub struct FfmpegCamera {
    device: String,
    input_format: &'static str,
}

impl FfmpegCamera {
    /// Open a camera device, verifying that a frame can be grabbed.
    ///
    /// # Arguments
    /// * `device` - Platform device identity (`/dev/video0`, `0`, ...)
    pub fn open(device: &str) -> Result<Self, CaptureError> {
        if !Self::is_available() {
            return Err(CaptureError::camera_unavailable(
                "ffmpeg not found on PATH",
            ));
        }

        let camera = Self {
            device: device.to_string(),
            input_format: platform_input_format(),
        };

        // Probe grab: permission problems and missing devices fail here,
        // before the session ever reaches Active.
        camera.grab().map_err(|e| {
            CaptureError::camera_unavailable(format!("{} ({})", e, camera.device))
        })?;

        tracing::info!("[Camera] Opened device {}", camera.device);
        Ok(camera)
    }

    /// Check if FFmpeg is available.
    pub fn is_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl CameraSource for FfmpegCamera {
    fn grab(&self) -> Result<DynamicImage, CaptureError> {
        tracing::trace!("[Camera] Grabbing frame from {}", self.device);

        let output = Command::new("ffmpeg")
            .args([
                "-f",
                self.input_format,
                "-i",
                &self.device,
                "-frames:v",
                "1",
                "-f",
                "image2pipe",
                "-vcodec",
                "png",
                "-",
            ])
            .output()
            .map_err(|e| {
                CaptureError::camera_unavailable(format!("FFmpeg execution failed: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::camera_unavailable(format!(
                "FFmpeg failed: {}",
                stderr.lines().last().unwrap_or("unknown error")
            )));
        }

        if output.stdout.is_empty() {
            return Err(CaptureError::camera_unavailable(
                "FFmpeg produced no frame data",
            ));
        }

        let cursor = Cursor::new(output.stdout);
        image::load(cursor, image::ImageFormat::Png)
            .map_err(|e| CaptureError::camera_unavailable(format!("Failed to decode PNG: {}", e)))
    }

    fn name(&self) -> &str {
        &self.device
    }
}

/// Platform FFmpeg input format for camera devices.
fn platform_input_format() -> &'static str {
    if cfg!(target_os = "linux") {
        "v4l2"
    } else if cfg!(target_os = "macos") {
        "avfoundation"
    } else {
        "dshow"
    }
}
