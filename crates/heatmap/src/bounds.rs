//! Pixel rectangles and dirty-region tracking.
//!
//! Points painted without an immediate colorize pass grow a single union
//! rectangle; the next batched pass consumes it and starts over.

/// Rectangle in pixel space, `right` and `bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Inverted rectangle that any real rectangle expands correctly.
    pub const EMPTY: Rect = Rect {
        left: i32::MAX,
        top: i32::MAX,
        right: i32::MIN,
        bottom: i32::MIN,
    };

    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// The whole `width` x `height` canvas.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, saturate(width), saturate(height))
    }

    pub fn width(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (self.right as i64 - self.left as i64) as u32
        }
    }

    pub fn height(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (self.bottom as i64 - self.top as i64) as u32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Clamp to `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: u32, height: u32) -> Rect {
        Rect {
            left: self.left.max(0),
            top: self.top.max(0),
            right: self.right.min(saturate(width)),
            bottom: self.bottom.min(saturate(height)),
        }
    }
}

fn saturate(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Accumulates the union of squares painted since the last colorize pass.
#[derive(Debug, Clone)]
pub struct BoundsTracker {
    bounds: Rect,
}

impl Default for BoundsTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundsTracker {
    pub fn new() -> Self {
        Self { bounds: Rect::EMPTY }
    }

    pub fn expand(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        self.bounds = self.bounds.union(&rect);
    }

    /// Pending bounds, unclamped.
    pub fn current(&self) -> Rect {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Take the pending bounds clamped to the canvas and reset.
    ///
    /// Returns `None` when nothing on the canvas is dirty.
    pub fn consume(&mut self, width: u32, height: u32) -> Option<Rect> {
        let pending = std::mem::replace(&mut self.bounds, Rect::EMPTY);
        let clamped = pending.clamp_to(width, height);
        (!clamped.is_empty()).then_some(clamped)
    }

    pub fn reset(&mut self) {
        self.bounds = Rect::EMPTY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker_consumes_nothing() {
        let mut tracker = BoundsTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.consume(100, 100), None);
    }

    #[test]
    fn test_first_expand_replaces_sentinel() {
        let mut tracker = BoundsTracker::new();
        tracker.expand(Rect::new(10, 20, 40, 50));
        assert_eq!(tracker.current(), Rect::new(10, 20, 40, 50));
    }

    #[test]
    fn test_union_and_reset_on_consume() {
        let mut tracker = BoundsTracker::new();
        tracker.expand(Rect::new(10, 10, 20, 20));
        tracker.expand(Rect::new(5, 15, 12, 30));
        assert_eq!(tracker.consume(100, 100), Some(Rect::new(5, 10, 20, 30)));
        assert!(tracker.is_empty());
        assert_eq!(tracker.consume(100, 100), None);
    }

    #[test]
    fn test_consume_clamps_to_canvas() {
        let mut tracker = BoundsTracker::new();
        tracker.expand(Rect::new(-15, -15, 15, 15));
        tracker.expand(Rect::new(90, 90, 120, 130));
        assert_eq!(tracker.consume(100, 80), Some(Rect::new(0, 0, 100, 80)));
    }

    #[test]
    fn test_offscreen_bounds_are_dropped() {
        let mut tracker = BoundsTracker::new();
        tracker.expand(Rect::new(200, 200, 260, 260));
        assert_eq!(tracker.consume(100, 100), None);
    }

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect::new(-5, 2, 10, 12);
        assert_eq!(rect.width(), 15);
        assert_eq!(rect.height(), 10);
        assert!(rect.contains(-5, 2));
        assert!(!rect.contains(10, 2));
        assert_eq!(Rect::EMPTY.width(), 0);
        assert_eq!(Rect::full(30, 20), Rect::new(0, 0, 30, 20));
    }
}
