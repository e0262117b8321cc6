//! Skeleton drawing.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::models::Landmark;

use super::connections::POSE_CONNECTIONS;

/// Draws landmark points and skeletal connections onto an RGBA surface.
///
/// Painting is idempotent and touches nothing but the target surface:
/// every call starts from a cleared surface, then draws the given
/// landmarks scaled from normalized [0,1] space to pixel dimensions.
/// An empty landmark list therefore leaves the surface cleared, with
/// no stale skeleton behind.
pub struct OverlayRenderer {
    point_radius: i32,
    point_color: Rgba<u8>,
    bone_color: Rgba<u8>,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self {
            point_radius: 4,
            point_color: Rgba([255, 64, 64, 255]),
            bone_color: Rgba([64, 255, 64, 255]),
        }
    }
}

impl OverlayRenderer {
    /// Create a renderer with default colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint `landmarks` onto `surface`.
    ///
    /// A connection with an absent endpoint is skipped; all other
    /// connections and every present landmark still draw. Never panics
    /// on short landmark lists.
    pub fn paint(&self, surface: &mut RgbaImage, landmarks: &[Landmark]) {
        Self::clear(surface);
        if landmarks.is_empty() {
            return;
        }

        let width = surface.width() as f32;
        let height = surface.height() as f32;

        for &(from, to) in POSE_CONNECTIONS {
            let (Some(a), Some(b)) = (landmarks.get(from), landmarks.get(to)) else {
                continue;
            };
            draw_line_segment_mut(
                surface,
                (a.x as f32 * width, a.y as f32 * height),
                (b.x as f32 * width, b.y as f32 * height),
                self.bone_color,
            );
        }

        for lm in landmarks {
            let x = (lm.x as f32 * width) as i32;
            let y = (lm.y as f32 * height) as i32;
            draw_filled_circle_mut(surface, (x, y), self.point_radius, self.point_color);
        }
    }

    /// Clear a surface to fully transparent.
    pub fn clear(surface: &mut RgbaImage) {
        for pixel in surface.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([9, 9, 9, 255]))
    }

    fn drawn_pixels(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0[3] != 0).count()
    }

    #[test]
    fn empty_landmarks_clear_the_surface() {
        let renderer = OverlayRenderer::new();
        let mut img = surface(32, 32);

        renderer.paint(&mut img, &[]);

        assert_eq!(drawn_pixels(&img), 0);
    }

    #[test]
    fn single_center_landmark_draws_at_visual_center() {
        let renderer = OverlayRenderer::new();
        let mut img = surface(100, 100);

        renderer.paint(&mut img, &[Landmark::new(0.5, 0.5)]);

        // The point lands at the surface's visual center.
        assert_ne!(img.get_pixel(50, 50).0[3], 0);
        // And nowhere near the corners.
        assert_eq!(img.get_pixel(5, 5).0[3], 0);
        assert_eq!(img.get_pixel(95, 95).0[3], 0);
    }

    #[test]
    fn missing_endpoint_skips_only_that_connection() {
        let renderer = OverlayRenderer::new();
        let mut img = surface(200, 200);

        // Indices 0..=11 present: connection (11, 12) lacks its right
        // endpoint, while e.g. (0, 1) and (2, 3) are drawable.
        let landmarks: Vec<Landmark> = (0..12)
            .map(|i| Landmark::new(0.1 + 0.05 * i as f64, 0.2))
            .collect();

        renderer.paint(&mut img, &landmarks);
        let with_partial = drawn_pixels(&img);
        assert!(with_partial > 0);

        // Adding the missing endpoint draws strictly more.
        let mut full = landmarks.clone();
        full.push(Landmark::new(0.9, 0.9));
        renderer.paint(&mut img, &full);
        assert!(drawn_pixels(&img) > with_partial);
    }

    #[test]
    fn paint_is_idempotent() {
        let renderer = OverlayRenderer::new();
        let landmarks = vec![Landmark::new(0.25, 0.25), Landmark::new(0.75, 0.75)];

        let mut first = surface(64, 64);
        renderer.paint(&mut first, &landmarks);
        let mut second = first.clone();
        renderer.paint(&mut second, &landmarks);

        assert_eq!(first.as_raw(), second.as_raw());
    }
}
