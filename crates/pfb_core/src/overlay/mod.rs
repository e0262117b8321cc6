//! Skeleton overlay rendering.
//!
//! The renderer does the pixel work; `OverlayTarget` binds a surface to
//! the content it currently shows, so landmarks computed for a
//! different mode or source can never be painted over it.

mod connections;
mod renderer;

pub use connections::{landmark, POSE_CONNECTIONS};
pub use renderer::OverlayRenderer;

use image::RgbaImage;

use crate::models::{InferenceResult, PostureMode, SourceContext};

/// A rendering surface bound to the content it currently displays.
pub struct OverlayTarget {
    surface: RgbaImage,
    content: Option<(PostureMode, SourceContext)>,
}

impl OverlayTarget {
    /// Create a transparent surface of the given pixel dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: RgbaImage::new(width, height),
            content: None,
        }
    }

    /// Declare what the surface currently shows. Clears any previous
    /// overlay, since it belonged to the old content.
    pub fn bind(&mut self, mode: PostureMode, source: SourceContext) {
        self.content = Some((mode, source));
        OverlayRenderer::clear(&mut self.surface);
    }

    /// Paint a result's landmarks, but only if they were computed for
    /// the surface's current content. Returns whether anything was
    /// painted.
    pub fn render(
        &mut self,
        renderer: &OverlayRenderer,
        result: &InferenceResult,
        mode: PostureMode,
        source: SourceContext,
    ) -> bool {
        if self.content != Some((mode, source)) {
            tracing::debug!(
                "[Overlay] Skipping paint for {} / {}: surface shows different content",
                mode.wire_name(),
                source
            );
            return false;
        }
        renderer.paint(&mut self.surface, &result.landmarks);
        true
    }

    /// The rendered surface.
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Landmark, ResultStatus};

    fn result_with_center_landmark() -> InferenceResult {
        InferenceResult {
            feedback_messages: vec!["Straighten your back".into()],
            confidences: vec![0.81],
            landmarks: vec![Landmark::new(0.5, 0.5)],
            status: ResultStatus::Ok,
            raw: serde_json::Value::Null,
        }
    }

    #[test]
    fn render_respects_content_binding() {
        let renderer = OverlayRenderer::new();
        let mut target = OverlayTarget::new(100, 100);
        target.bind(PostureMode::Squat, SourceContext::Live);

        // Landmarks computed for another source never reach the surface.
        let painted = target.render(
            &renderer,
            &result_with_center_landmark(),
            PostureMode::Squat,
            SourceContext::SingleImage,
        );
        assert!(!painted);
        assert_eq!(target.surface().get_pixel(50, 50).0[3], 0);

        // Matching content paints.
        let painted = target.render(
            &renderer,
            &result_with_center_landmark(),
            PostureMode::Squat,
            SourceContext::Live,
        );
        assert!(painted);
        assert_ne!(target.surface().get_pixel(50, 50).0[3], 0);
    }

    #[test]
    fn rebinding_clears_the_old_overlay() {
        let renderer = OverlayRenderer::new();
        let mut target = OverlayTarget::new(100, 100);
        target.bind(PostureMode::Squat, SourceContext::Live);
        target.render(
            &renderer,
            &result_with_center_landmark(),
            PostureMode::Squat,
            SourceContext::Live,
        );
        assert_ne!(target.surface().get_pixel(50, 50).0[3], 0);

        target.bind(PostureMode::Squat, SourceContext::SingleImage);
        assert_eq!(target.surface().get_pixel(50, 50).0[3], 0);
    }

    #[test]
    fn no_pose_result_clears_the_surface() {
        let renderer = OverlayRenderer::new();
        let mut target = OverlayTarget::new(64, 64);
        target.bind(PostureMode::Desk, SourceContext::Live);
        target.render(
            &renderer,
            &result_with_center_landmark(),
            PostureMode::Desk,
            SourceContext::Live,
        );

        let no_pose = InferenceResult::no_pose(serde_json::Value::Null);
        target.render(&renderer, &no_pose, PostureMode::Desk, SourceContext::Live);

        assert!(target.surface().pixels().all(|p| p.0[3] == 0));
        assert_eq!(no_pose.feedback_messages, vec!["No pose detected"]);
    }
}
