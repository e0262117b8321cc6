//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Remote inference endpoint settings.
    #[serde(default)]
    pub inference: InferenceSettings,

    /// Live camera sampling settings.
    #[serde(default)]
    pub live: LiveSettings,

    /// Offline video scan settings.
    #[serde(default)]
    pub scan: ScanSettings,

    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Remote inference endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceSettings {
    /// Full URL of the pose-feedback endpoint.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Request timeout in seconds. A timed-out submission surfaces as an
    /// error result, never as a fault.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// JPEG quality (1-100) for frames sent to the endpoint.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_endpoint_url() -> String {
    "http://127.0.0.1:5000/api/process_frame".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_jpeg_quality() -> u8 {
    80
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            request_timeout_secs: default_request_timeout(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

/// Live camera sampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveSettings {
    /// Sampling period in milliseconds. One frame is captured and
    /// submitted per period while a session is active.
    #[serde(default = "default_sample_period_ms")]
    pub sample_period_ms: u64,

    /// Camera device passed to the capture backend
    /// (e.g. `/dev/video0` on Linux, `0` on macOS).
    #[serde(default = "default_camera_device")]
    pub camera_device: String,
}

fn default_sample_period_ms() -> u64 {
    2000
}

fn default_camera_device() -> String {
    if cfg!(target_os = "linux") {
        "/dev/video0".to_string()
    } else {
        "0".to_string()
    }
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            sample_period_ms: default_sample_period_ms(),
            camera_device: default_camera_device(),
        }
    }
}

/// Offline video scan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Virtual sampling rate in frames per second. A video of duration D
    /// yields floor(D * rate) scanned frames.
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: f64,

    /// Maximum media length considered for a scan, in seconds. Longer
    /// media is truncated to this cap.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u32,
}

fn default_frames_per_second() -> f64 {
    5.0
}

fn default_max_duration_secs() -> u32 {
    600
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            frames_per_second: default_frames_per_second(),
            max_duration_secs: default_max_duration_secs(),
        }
    }
}

/// Path configuration for reports and remembered inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for exported feedback reports.
    #[serde(default = "default_report_folder")]
    pub report_folder: String,

    /// Last video file the user scanned.
    #[serde(default)]
    pub last_video_path: String,

    /// Last image file the user submitted.
    #[serde(default)]
    pub last_image_path: String,
}

fn default_report_folder() -> String {
    "reports".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            report_folder: default_report_folder(),
            last_video_path: String::new(),
            last_image_path: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log level (trace, debug, info, warn, error).
    /// `RUST_LOG` overrides this when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Identifies one settings section for section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Inference,
    Live,
    Scan,
    Paths,
    Logging,
}

impl ConfigSection {
    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Inference => "inference",
            Self::Live => "live",
            Self::Scan => "scan",
            Self::Paths => "paths",
            Self::Logging => "logging",
        }
    }

    /// All known sections, in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[
            Self::Inference,
            Self::Live,
            Self::Scan,
            Self::Paths,
            Self::Logging,
        ]
    }
}
