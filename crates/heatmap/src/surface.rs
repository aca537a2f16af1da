//! Drawing surfaces.
//!
//! The engine only needs a handful of raster operations, collected in the
//! [`Surface`] trait. [`PixmapSurface`] implements them on a `tiny-skia`
//! pixmap. Region reads and writes exchange straight (non-premultiplied)
//! RGBA bytes, four per pixel, row-major within the requested rectangle.

use heatmap_common::{HeatmapError, HeatmapResult};
use tiny_skia::{
    BlendMode, Color, ColorU8, GradientStop, Paint, Pixmap, Point, RadialGradient, SpreadMode,
    Transform,
};

use crate::bounds::Rect;

/// Raster operations the heatmap pipeline draws through.
pub trait Surface: Sized {
    /// Create a transparent `width` x `height` surface.
    fn create(width: u32, height: u32) -> HeatmapResult<Self>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Read a region as straight RGBA. Pixels outside the surface read as
    /// transparent black.
    fn read_region(&self, rect: Rect) -> Vec<u8>;

    /// Write straight RGBA into a region. Pixels outside the surface are
    /// ignored.
    fn write_region(&mut self, rect: Rect, pixels: &[u8]);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Source-over a black radial gradient centered at (`cx`, `cy`) whose
    /// alpha falls linearly from `center_alpha` to 0 at `radius`.
    fn fill_radial(&mut self, cx: f32, cy: f32, radius: f32, center_alpha: f32);
}

/// Part of a region row that lies on the surface.
struct RowSpan {
    /// Pixel index into the surface
    surface: usize,
    /// Pixel index into the region buffer
    region: usize,
    len: usize,
}

/// Visible spans of `rect` on a `width` x `height` surface, one per row.
fn visible_spans(rect: Rect, width: u32, height: u32) -> impl Iterator<Item = RowSpan> {
    let clipped = rect.clamp_to(width, height);
    let region_width = rect.width() as usize;
    let empty = clipped.is_empty();

    let (top, bottom) = if empty { (0, 0) } else { (clipped.top, clipped.bottom) };
    (top..bottom).map(move |y| RowSpan {
        surface: y as usize * width as usize + clipped.left as usize,
        region: (y - rect.top) as usize * region_width + (clipped.left - rect.left) as usize,
        len: clipped.width() as usize,
    })
}

/// Surface backed by a `tiny_skia::Pixmap` (premultiplied storage).
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

impl Surface for PixmapSurface {
    fn create(width: u32, height: u32) -> HeatmapResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            HeatmapError::SurfaceUnavailable(format!("cannot allocate a {}x{} pixmap", width, height))
        })?;
        Ok(Self { pixmap })
    }

    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn read_region(&self, rect: Rect) -> Vec<u8> {
        let mut out = vec![0u8; rect.width() as usize * rect.height() as usize * 4];
        let pixels = self.pixmap.pixels();

        for span in visible_spans(rect, self.width(), self.height()) {
            let src = &pixels[span.surface..span.surface + span.len];
            let dst = &mut out[span.region * 4..(span.region + span.len) * 4];
            for (px, chunk) in src.iter().zip(dst.chunks_exact_mut(4)) {
                let c = px.demultiply();
                chunk.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }

        out
    }

    fn write_region(&mut self, rect: Rect, data: &[u8]) {
        debug_assert_eq!(data.len(), rect.width() as usize * rect.height() as usize * 4);
        let (width, height) = (self.width(), self.height());
        let pixels = self.pixmap.pixels_mut();

        for span in visible_spans(rect, width, height) {
            let src = &data[span.region * 4..(span.region + span.len) * 4];
            let dst = &mut pixels[span.surface..span.surface + span.len];
            for (px, chunk) in dst.iter_mut().zip(src.chunks_exact(4)) {
                *px = ColorU8::from_rgba(chunk[0], chunk[1], chunk[2], chunk[3]).premultiply();
            }
        }
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn fill_radial(&mut self, cx: f32, cy: f32, radius: f32, center_alpha: f32) {
        let Some(inner) = Color::from_rgba(0.0, 0.0, 0.0, center_alpha.clamp(0.0, 1.0)) else {
            return;
        };
        let stops = vec![
            GradientStop::new(0.0, inner),
            GradientStop::new(1.0, Color::TRANSPARENT),
        ];
        let center = Point::from_xy(cx, cy);
        let Some(shader) = RadialGradient::new(
            center,
            center,
            radius,
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            tracing::warn!(cx, cy, radius, "Failed to build radial gradient");
            return;
        };

        let Some(area) = tiny_skia::Rect::from_xywh(cx - radius, cy - radius, radius * 2.0, radius * 2.0)
        else {
            return;
        };

        let mut paint = Paint::default();
        paint.shader = shader;
        paint.blend_mode = BlendMode::SourceOver;
        paint.anti_alias = false;

        self.pixmap.fill_rect(area, &paint, Transform::identity(), None);
    }
}
