//! Alpha accumulation: one radial blob per point on the hidden buffer.

use crate::bounds::Rect;
use crate::surface::Surface;

/// Center intensity used for points without a count.
pub const MIN_INTENSITY: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct AlphaCompositor {
    radius: u32,
}

impl AlphaCompositor {
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Center alpha for a point, normalized by the running maximum.
    pub fn intensity(count: f64, running_max: f64) -> f32 {
        if count > 0.0 && running_max > 0.0 {
            (count / running_max).clamp(0.0, 1.0) as f32
        } else {
            MIN_INTENSITY
        }
    }

    /// Paint the blob for (x, y) and return the square to colorize.
    pub fn paint_point<S: Surface>(
        &self,
        surface: &mut S,
        x: u32,
        y: u32,
        count: f64,
        running_max: f64,
    ) -> Rect {
        let alpha = Self::intensity(count, running_max);
        surface.fill_radial(x as f32, y as f32, self.radius as f32, alpha);
        self.point_bounds(x, y, surface.width(), surface.height())
    }

    /// Square of side 3R around (x, y), starting at `floor(x - 1.5R)`.
    ///
    /// Shifted back inside when it runs past the far edge, then clamped, so
    /// a canvas at least 3R wide always yields a full square.
    pub fn point_bounds(&self, x: u32, y: u32, width: u32, height: u32) -> Rect {
        let side = 3 * self.radius as i64;
        let half = 1.5 * self.radius as f64;

        let place = |center: u32, extent: u32| -> (i32, i32) {
            let extent = extent as i64;
            let mut start = (center as f64 - half).floor() as i64;
            if start + side > extent {
                start = extent - side;
            }
            let start = start.max(0);
            let end = (start + side).min(extent);
            (start as i32, end as i32)
        };

        let (left, right) = place(x, width);
        let (top, bottom) = place(y, height);
        Rect::new(left, top, right, bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixmapSurface;

    #[test]
    fn test_intensity() {
        assert_eq!(AlphaCompositor::intensity(3.0, 6.0), 0.5);
        assert_eq!(AlphaCompositor::intensity(12.0, 6.0), 1.0);
        assert_eq!(AlphaCompositor::intensity(0.0, 6.0), MIN_INTENSITY);
    }

    #[test]
    fn test_bounds_interior_point() {
        let compositor = AlphaCompositor::new(10);
        assert_eq!(compositor.point_bounds(50, 50, 100, 100), Rect::new(35, 35, 65, 65));
    }

    #[test]
    fn test_bounds_floor_on_half_radius() {
        let compositor = AlphaCompositor::new(5);
        // 50 - 7.5 floors to 42, side 15
        assert_eq!(compositor.point_bounds(50, 50, 100, 100), Rect::new(42, 42, 57, 57));
    }

    #[test]
    fn test_bounds_shift_at_far_edge() {
        let compositor = AlphaCompositor::new(10);
        assert_eq!(compositor.point_bounds(95, 98, 100, 100), Rect::new(70, 70, 100, 100));
    }

    #[test]
    fn test_bounds_clamp_at_near_edge() {
        let compositor = AlphaCompositor::new(10);
        assert_eq!(compositor.point_bounds(3, 0, 100, 100), Rect::new(0, 0, 30, 30));
    }

    #[test]
    fn test_bounds_small_canvas() {
        let compositor = AlphaCompositor::new(10);
        assert_eq!(compositor.point_bounds(5, 5, 20, 12), Rect::new(0, 0, 20, 12));
    }

    #[test]
    fn test_paint_point_marks_alpha() {
        let mut surface = PixmapSurface::create(60, 60).unwrap();
        let compositor = AlphaCompositor::new(8);
        let rect = compositor.paint_point(&mut surface, 30, 30, 1.0, 1.0);

        assert_eq!(rect, Rect::new(18, 18, 42, 42));
        let center = surface.read_region(Rect::new(30, 30, 31, 31));
        assert!(center[3] > 200);
        assert_eq!(&center[..3], &[0, 0, 0]);
    }
}
