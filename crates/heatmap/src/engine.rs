//! The heatmap engine: owns the store, both surfaces and the palette, and
//! decides between incremental and full redraws.
//!
//! - A point that stays within the running maximum is painted and its square
//!   recolored straight away.
//! - A point that raises the maximum changes the normalization of every
//!   stored point, so both buffers are cleared, the whole grid is replayed
//!   and the canvas is recolored once.
//! - Bulk loads go through the same replay.

use std::time::Instant;

use heatmap_common::{DataSet, HeatmapConfig, HeatmapResult};
use tracing::{debug, info, trace, warn};

use crate::alpha::AlphaCompositor;
use crate::bounds::{BoundsTracker, Rect};
use crate::colorize::Colorizer;
use crate::export;
use crate::palette::{probe_premultiplied_alpha, Palette};
use crate::store::{OccurrenceGrid, OccurrenceStore, StoreUpdate};
use crate::surface::{PixmapSurface, Surface};

pub struct HeatmapEngine<S: Surface = PixmapSurface> {
    width: u32,
    height: u32,
    opacity: u8,
    visible: bool,
    debug: bool,
    store: OccurrenceStore,
    compositor: AlphaCompositor,
    palette: Palette,
    premultiply_alpha: bool,
    bounds: BoundsTracker,
    canvas: S,
    alpha: S,
}

impl HeatmapEngine<PixmapSurface> {
    /// Create an engine drawing on `tiny-skia` pixmaps.
    pub fn new(config: HeatmapConfig) -> HeatmapResult<Self> {
        Self::with_surface(config)
    }
}

impl<S: Surface> HeatmapEngine<S> {
    /// Create an engine drawing on surfaces of type `S`.
    pub fn with_surface(config: HeatmapConfig) -> HeatmapResult<Self> {
        config.validate()?;

        let palette = Palette::from_config(&config)?;
        let premultiply_alpha = probe_premultiplied_alpha::<S>()?;
        let canvas = S::create(config.width, config.height)?;
        let alpha = S::create(config.width, config.height)?;

        let engine = Self {
            width: config.width,
            height: config.height,
            opacity: config.opacity_ceiling(),
            visible: config.visible,
            debug: config.debug,
            store: OccurrenceStore::new(config.initial_max()),
            compositor: AlphaCompositor::new(config.radius),
            palette,
            premultiply_alpha,
            bounds: BoundsTracker::new(),
            canvas,
            alpha,
        };

        info!(
            width = engine.width,
            height = engine.height,
            radius = config.radius,
            opacity = engine.opacity,
            premultiply_alpha,
            "Heatmap engine initialized"
        );
        Ok(engine)
    }

    /// Add a single occurrence at (x, y). Negative coordinates are ignored.
    pub fn add_point(&mut self, x: i64, y: i64) {
        self.add_point_with_count(x, y, 1.0);
    }

    /// Add `count` occurrences at (x, y). Negative coordinates and
    /// non-positive counts are ignored.
    pub fn add_point_with_count(&mut self, x: i64, y: i64, count: f64) {
        match self.store.add_point(x, y, count) {
            StoreUpdate::Rejected => {
                trace!(x, y, count, "Dropped point");
            }
            StoreUpdate::Rescaled { x, y, count } => {
                debug!(x, y, max = count, "New maximum, redrawing all points");
                self.redraw();
            }
            StoreUpdate::Accumulated { x, y, count } => {
                let rect = self
                    .compositor
                    .paint_point(&mut self.alpha, x, y, count, self.store.max());
                if self.visible {
                    self.colorize(rect, "point");
                } else {
                    self.bounds.expand(rect);
                }
            }
        }
    }

    /// Replace all data with flat `[x, y, count]` triples.
    pub fn load_data_set(&mut self, data: &DataSet) {
        let skipped = self.store.replace_all(&data.data, data.max);
        if skipped > 0 {
            warn!(skipped, total = data.len(), "Skipped invalid data points");
        }
        self.redraw();
    }

    /// Replace all data with an already nested grid and its maximum.
    pub fn load_grid(&mut self, grid: OccurrenceGrid, max: f64) {
        self.store.replace_grid(grid, max);
        self.redraw();
    }

    /// Drop all data, blank both buffers and return to the initial maximum.
    pub fn clear(&mut self) {
        self.store.clear();
        self.canvas.clear();
        self.alpha.clear();
        self.bounds.reset();
    }

    /// Recreate both surfaces at the new size and redraw the stored data.
    ///
    /// On failure the engine keeps its previous surfaces.
    pub fn resize(&mut self, width: u32, height: u32) -> HeatmapResult<()> {
        let canvas = S::create(width, height)?;
        let alpha = S::create(width, height)?;

        self.canvas = canvas;
        self.alpha = alpha;
        self.width = width;
        self.height = height;
        debug!(width, height, "Resized heatmap surfaces");

        self.redraw();
        Ok(())
    }

    /// Show or hide the heatmap. While hidden, points still accumulate and
    /// grow the dirty bounds; showing it recolors only those bounds.
    pub fn set_visible(&mut self, visible: bool) {
        let was_visible = std::mem::replace(&mut self.visible, visible);
        if visible && !was_visible {
            if let Some(rect) = self.bounds.consume(self.width, self.height) {
                self.colorize(rect, "batch");
            }
        }
    }

    /// Encoded PNG of the visible buffer.
    pub fn export_buffer(&self) -> HeatmapResult<Vec<u8>> {
        export::encode_png(&self.canvas)
    }

    /// Visible buffer as a `data:image/png;base64,` URL.
    pub fn export_data_url(&self) -> HeatmapResult<String> {
        export::encode_data_url(&self.canvas)
    }

    /// Current data in wire format.
    pub fn export_data_set(&self) -> DataSet {
        self.store.to_data_set()
    }

    /// Clear both buffers, replay every stored point and recolor the canvas.
    fn redraw(&mut self) {
        self.canvas.clear();
        self.alpha.clear();
        self.bounds.reset();

        let max = self.store.max();
        for (x, y, count) in self.store.iter() {
            let rect = self.compositor.paint_point(&mut self.alpha, x, y, count, max);
            self.bounds.expand(rect);
        }

        if self.visible {
            self.colorize(Rect::full(self.width, self.height), "full");
            self.bounds.reset();
        }
    }

    fn colorize(&mut self, rect: Rect, pass: &'static str) {
        let started = Instant::now();
        let colorizer = Colorizer::new(&self.palette, self.opacity, self.premultiply_alpha);
        let painted = colorizer.colorize_region(&self.alpha, &mut self.canvas, rect);
        let elapsed_us = started.elapsed().as_micros() as u64;

        if self.debug {
            info!(
                pass,
                left = rect.left,
                top = rect.top,
                right = rect.right,
                bottom = rect.bottom,
                painted,
                elapsed_us,
                "Colorize pass"
            );
        } else {
            trace!(pass, painted, elapsed_us, "Colorize pass");
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn radius(&self) -> u32 {
        self.compositor.radius()
    }

    /// Opacity ceiling on the 0-255 scale.
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current running maximum.
    pub fn max(&self) -> f64 {
        self.store.max()
    }

    pub fn store(&self) -> &OccurrenceStore {
        &self.store
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn premultiply_alpha(&self) -> bool {
        self.premultiply_alpha
    }

    /// Dirty rectangle waiting for a colorize pass (only grows while hidden).
    pub fn pending_bounds(&self) -> Rect {
        self.bounds.current()
    }

    /// Straight RGBA copy of the whole visible buffer.
    pub fn visible_pixels(&self) -> Vec<u8> {
        self.canvas.read_region(Rect::full(self.width, self.height))
    }

    /// Straight RGBA of one visible pixel, transparent off the canvas.
    pub fn pixel_at(&self, x: u32, y: u32) -> [u8; 4] {
        match self.pixel_rect(x, y) {
            Some(rect) => {
                let px = self.canvas.read_region(rect);
                [px[0], px[1], px[2], px[3]]
            }
            None => [0; 4],
        }
    }

    /// Accumulated alpha of one pixel of the hidden buffer, 0 off the canvas.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixel_rect(x, y)
            .map_or(0, |rect| self.alpha.read_region(rect)[3])
    }

    fn pixel_rect(&self, x: u32, y: u32) -> Option<Rect> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let (x, y) = (i32::try_from(x).ok()?, i32::try_from(y).ok()?);
        Some(Rect::new(x, y, x + 1, y + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: u32, radius: u32) -> HeatmapEngine {
        let mut config = HeatmapConfig::with_size(size, size);
        config.radius = radius;
        HeatmapEngine::new(config).unwrap()
    }

    #[test]
    fn test_rejects_zero_sized_canvas() {
        assert!(HeatmapEngine::new(HeatmapConfig::default()).is_err());
    }

    #[test]
    fn test_hidden_engine_defers_colorize() {
        let mut config = HeatmapConfig::with_size(50, 50);
        config.radius = 5;
        config.visible = false;
        let mut heatmap = HeatmapEngine::new(config).unwrap();

        heatmap.add_point(25, 25);
        assert!(heatmap.alpha_at(25, 25) > 0);
        assert_eq!(heatmap.pixel_at(25, 25)[3], 0);
        assert!(!heatmap.pending_bounds().is_empty());

        heatmap.set_visible(true);
        assert!(heatmap.pixel_at(25, 25)[3] > 0);
        assert!(heatmap.pending_bounds().is_empty());
    }

    #[test]
    fn test_showing_recolors_only_dirty_bounds() {
        let mut config = HeatmapConfig::with_size(100, 100);
        config.radius = 5;
        config.visible = false;
        let mut heatmap = HeatmapEngine::new(config).unwrap();

        heatmap.add_point(10, 10);
        heatmap.add_point(12, 12);
        assert_eq!(heatmap.pending_bounds(), Rect::new(2, 2, 19, 19));

        // Pixels outside the dirty bounds must survive the show pass
        let marker = Rect::new(60, 60, 61, 61);
        heatmap.canvas.write_region(marker, &[255, 255, 255, 255]);

        heatmap.set_visible(true);
        assert!(heatmap.pending_bounds().is_empty());
        assert!(heatmap.pixel_at(10, 10)[3] > 0);
        assert!(heatmap.pixel_at(12, 12)[3] > 0);
        assert_eq!(heatmap.pixel_at(60, 60), [255, 255, 255, 255]);
    }

    #[test]
    fn test_showing_without_pending_points_is_a_no_op() {
        let mut heatmap = engine(50, 5);
        heatmap.set_visible(false);
        let marker = Rect::new(5, 5, 6, 6);
        heatmap.canvas.write_region(marker, &[1, 2, 3, 255]);

        heatmap.set_visible(true);
        assert_eq!(heatmap.pixel_at(5, 5), [1, 2, 3, 255]);
    }

    #[test]
    fn test_pixel_reads_off_canvas_are_transparent() {
        let mut heatmap = engine(40, 5);
        heatmap.add_point(20, 20);

        assert_eq!(heatmap.pixel_at(i32::MAX as u32, 0), [0; 4]);
        assert_eq!(heatmap.pixel_at(u32::MAX, u32::MAX), [0; 4]);
        assert_eq!(heatmap.pixel_at(40, 20), [0; 4]);
        assert_eq!(heatmap.alpha_at(i32::MAX as u32, 0), 0);
        assert_eq!(heatmap.alpha_at(20, u32::MAX), 0);
        assert!(heatmap.alpha_at(20, 20) > 0);
    }

    #[test]
    fn test_resize_redraws_stored_points() {
        let mut heatmap = engine(40, 5);
        heatmap.add_point(10, 10);
        heatmap.resize(80, 60).unwrap();

        assert_eq!((heatmap.width(), heatmap.height()), (80, 60));
        assert_eq!(heatmap.visible_pixels().len(), 80 * 60 * 4);
        assert!(heatmap.pixel_at(10, 10)[3] > 0);
    }

    #[test]
    fn test_failed_resize_keeps_surfaces() {
        let mut heatmap = engine(40, 5);
        heatmap.add_point(10, 10);
        assert!(heatmap.resize(0, 0).is_err());
        assert_eq!(heatmap.width(), 40);
        assert!(heatmap.pixel_at(10, 10)[3] > 0);
    }
}
