//! Frame acquisition.
//!
//! Two source kinds feed the pipeline:
//! - a camera, sampled on a cadence by the live session;
//! - a video file, walked deterministically by the offline scanner.
//!
//! Both are traits so the pipeline can be tested without devices or
//! media files; the production implementations shell out to FFmpeg,
//! which works everywhere FFmpeg is installed.

mod camera;
mod error;
mod jpeg;
mod video;

pub use camera::{CameraOpener, CameraSource, FfmpegCamera};
pub use error::CaptureError;
pub use jpeg::encode_jpeg;
pub use video::{FfmpegVideo, VideoSource};
