//! Video file access for the offline scanner.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;

use super::error::CaptureError;

/// Seekable access to a finite piece of media.
///
/// The walker only ever seeks forward, but implementations must accept
/// any time within `[0, duration_secs)`.
pub trait VideoSource: Send + Sync {
    /// Extract the frame rendered at the given playback time.
    fn frame_at_time(&self, time_secs: f64) -> Result<DynamicImage, CaptureError>;

    /// Media duration in seconds.
    fn duration_secs(&self) -> f64;

    /// Video width in pixels.
    fn width(&self) -> u32;

    /// Video height in pixels.
    fn height(&self) -> u32;
}

/// FFmpeg subprocess-based video source.
///
/// Probes duration and dimensions with ffprobe on open, then extracts
/// individual frames with `ffmpeg -ss`.
pub struct FfmpegVideo {
    path: PathBuf,
    duration_secs: f64,
    width: u32,
    height: u32,
}

impl FfmpegVideo {
    /// Open a video file.
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        if !path.exists() {
            return Err(CaptureError::open_failed(path, "File does not exist"));
        }

        let (duration_secs, width, height) = probe(path)?;

        tracing::debug!(
            "[Video] Opened {}: {}x{}, {:.2}s",
            path.display(),
            width,
            height,
            duration_secs
        );

        Ok(Self {
            path: path.to_path_buf(),
            duration_secs,
            width,
            height,
        })
    }

    /// Check if FFmpeg and ffprobe are available.
    pub fn is_available() -> bool {
        let probe_ok = Command::new("ffprobe")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        let ffmpeg_ok = Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        probe_ok && ffmpeg_ok
    }
}

impl VideoSource for FfmpegVideo {
    fn frame_at_time(&self, time_secs: f64) -> Result<DynamicImage, CaptureError> {
        // Format time as HH:MM:SS.mmm
        let hours = (time_secs / 3600.0) as u32;
        let minutes = ((time_secs % 3600.0) / 60.0) as u32;
        let seconds = time_secs % 60.0;
        let time_str = format!("{:02}:{:02}:{:06.3}", hours, minutes, seconds);

        tracing::trace!("[Video] Extracting frame at {}", time_str);

        let output = Command::new("ffmpeg")
            .args([
                "-ss",
                &time_str,
                "-i",
                self.path.to_str().unwrap_or(""),
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
                CaptureError::extraction_failed(time_secs, format!("FFmpeg execution failed: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::extraction_failed(
                time_secs,
                format!(
                    "FFmpeg failed: {}",
                    stderr.lines().last().unwrap_or("unknown error")
                ),
            ));
        }

        if output.stdout.is_empty() {
            return Err(CaptureError::extraction_failed(
                time_secs,
                "FFmpeg produced no output",
            ));
        }

        let cursor = Cursor::new(output.stdout);
        image::load(cursor, image::ImageFormat::Png).map_err(|e| {
            CaptureError::extraction_failed(time_secs, format!("Failed to decode PNG: {}", e))
        })
    }

    fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Probe duration and dimensions with ffprobe.
fn probe(path: &Path) -> Result<(f64, u32, u32), CaptureError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height:format=duration",
            "-of",
            "default=noprint_wrappers=1",
            path.to_str().unwrap_or(""),
        ])
        .output()
        .map_err(|e| CaptureError::open_failed(path, format!("ffprobe execution failed: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CaptureError::open_failed(
            path,
            format!(
                "ffprobe failed: {}",
                stderr.lines().last().unwrap_or("unknown error")
            ),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&stdout).ok_or_else(|| {
        CaptureError::open_failed(path, format!("Unparseable ffprobe output: {}", stdout.trim()))
    })
}

/// Parse `key=value` lines emitted by ffprobe.
fn parse_probe_output(stdout: &str) -> Option<(f64, u32, u32)> {
    let mut duration = None;
    let mut width = None;
    let mut height = None;

    for line in stdout.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "duration" => duration = value.trim().parse::<f64>().ok(),
            "width" => width = value.trim().parse::<u32>().ok(),
            "height" => height = value.trim().parse::<u32>().ok(),
            _ => {}
        }
    }

    Some((duration?, width?, height?))
}
