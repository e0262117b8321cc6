//! Frame: one still image sample submitted for inference.

use serde::{Deserialize, Serialize};

use super::PostureMode;

/// Where a frame came from.
///
/// The source context travels with the frame through submission so that
/// the correlator can route the result back to the right place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "frame_index")]
pub enum SourceContext {
    /// A tick of the live camera loop.
    Live,
    /// Frame N of an offline video scan.
    VideoFrame(u32),
    /// A one-shot uploaded image.
    SingleImage,
}

impl std::fmt::Display for SourceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceContext::Live => write!(f, "live"),
            SourceContext::VideoFrame(i) => write!(f, "video_frame:{}", i),
            SourceContext::SingleImage => write!(f, "single_image"),
        }
    }
}

/// One encoded image sample, tagged with its mode and origin.
///
/// Immutable once created; the JPEG payload is the exact bytes that get
/// base64-encoded onto the wire.
#[derive(Debug, Clone)]
pub struct Frame {
    jpeg: Vec<u8>,
    mode: PostureMode,
    source: SourceContext,
}

impl Frame {
    /// Create a frame from an encoded JPEG payload.
    pub fn new(jpeg: Vec<u8>, mode: PostureMode, source: SourceContext) -> Self {
        Self { jpeg, mode, source }
    }

    /// The encoded JPEG payload.
    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    /// The posture mode this frame should be evaluated under.
    pub fn mode(&self) -> PostureMode {
        self.mode
    }

    /// Where the frame came from.
    pub fn source(&self) -> SourceContext {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_keeps_tags() {
        let frame = Frame::new(vec![0xFF, 0xD8], PostureMode::Lunge, SourceContext::VideoFrame(7));
        assert_eq!(frame.jpeg(), &[0xFF, 0xD8]);
        assert_eq!(frame.mode(), PostureMode::Lunge);
        assert_eq!(frame.source(), SourceContext::VideoFrame(7));
    }

    #[test]
    fn source_context_displays() {
        assert_eq!(SourceContext::Live.to_string(), "live");
        assert_eq!(SourceContext::VideoFrame(3).to_string(), "video_frame:3");
        assert_eq!(SourceContext::SingleImage.to_string(), "single_image");
    }
}
