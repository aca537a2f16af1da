//! Tests for palette construction and premultiplied-alpha compensation.
//!
//! Uses a software surface that keeps premultiplied channels on read-back,
//! the misbehaviour the premultiplication probe exists to detect.

use heatmap::palette::probe_premultiplied_alpha;
use heatmap::{HeatmapConfig, HeatmapEngine, HeatmapError, HeatmapResult, Palette, PixmapSurface, Rect, Surface};
use test_utils::{blue_red_gradient, square_config};

/// Surface that premultiplies on write and never demultiplies on read.
struct PremultiplyingSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PremultiplyingSurface {
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let inside = x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height;
        inside.then(|| (y as usize * self.width as usize + x as usize) * 4)
    }
}

impl Surface for PremultiplyingSurface {
    fn create(width: u32, height: u32) -> HeatmapResult<Self> {
        if width == 0 || height == 0 {
            return Err(HeatmapError::SurfaceUnavailable("empty surface".to_string()));
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        })
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn read_region(&self, rect: Rect) -> Vec<u8> {
        let mut out = Vec::with_capacity(rect.width() as usize * rect.height() as usize * 4);
        for y in rect.top..rect.bottom {
            for x in rect.left..rect.right {
                match self.index(x, y) {
                    Some(i) => out.extend_from_slice(&self.data[i..i + 4]),
                    None => out.extend_from_slice(&[0; 4]),
                }
            }
        }
        out
    }

    fn write_region(&mut self, rect: Rect, pixels: &[u8]) {
        let mut src = pixels.chunks_exact(4);
        for y in rect.top..rect.bottom {
            for x in rect.left..rect.right {
                let Some(px) = src.next() else { return };
                if let Some(i) = self.index(x, y) {
                    let a = px[3] as f32 / 255.0;
                    self.data[i] = (px[0] as f32 * a).round() as u8;
                    self.data[i + 1] = (px[1] as f32 * a).round() as u8;
                    self.data[i + 2] = (px[2] as f32 * a).round() as u8;
                    self.data[i + 3] = px[3];
                }
            }
        }
    }

    fn clear(&mut self) {
        self.data.fill(0);
    }

    fn fill_radial(&mut self, cx: f32, cy: f32, radius: f32, center_alpha: f32) {
        let (left, top) = ((cx - radius) as i32, (cy - radius) as i32);
        let (right, bottom) = ((cx + radius) as i32, (cy + radius) as i32);
        for y in top..bottom {
            for x in left..right {
                let Some(i) = self.index(x, y) else { continue };
                let d = ((x as f32 + 0.5 - cx).powi(2) + (y as f32 + 0.5 - cy).powi(2)).sqrt();
                let src = (center_alpha * (1.0 - d / radius)).clamp(0.0, 1.0);
                let dst = self.data[i + 3] as f32 / 255.0;
                self.data[i + 3] = ((src + dst * (1.0 - src)) * 255.0).round() as u8;
            }
        }
    }
}

// ============================================================================
// Palette construction
// ============================================================================

#[test]
fn test_default_palette_boundaries() {
    let palette = Palette::from_config(&HeatmapConfig::default()).unwrap();
    assert_eq!(palette.len(), 256);
    // Below the first stop (0.55) pads with blue, 1.0 is red
    assert_eq!(palette.color(0), [0, 0, 255, 255]);
    assert_eq!(palette.color(255), [255, 0, 0, 255]);
}

#[test]
fn test_default_palette_passes_through_stops() {
    let palette = Palette::from_config(&HeatmapConfig::default()).unwrap();
    // 0.95 * 255 = 242.25, close to the yellow stop
    let near_yellow = palette.color(242);
    assert!(near_yellow[0] > 240 && near_yellow[1] > 240 && near_yellow[2] == 0);
    // 0.75 * 255 = 191.25, close to the green stop
    let near_green = palette.color(191);
    assert!(near_green[0] < 5 && near_green[1] == 255 && near_green[2] < 5);
}

#[test]
fn test_custom_gradient_endpoints() {
    let mut config = HeatmapConfig::default();
    config.gradient = blue_red_gradient();
    let palette = Palette::from_config(&config).unwrap();

    assert_eq!(palette.color(0), [0, 0, 255, 255]);
    assert_eq!(palette.color(255), [255, 0, 0, 255]);
    for pair in palette.colors().windows(2) {
        assert!(pair[1][0] >= pair[0][0], "red must not decrease");
        assert!(pair[1][2] <= pair[0][2], "blue must not increase");
    }
}

#[test]
fn test_empty_gradient_fails_construction() {
    let mut config = square_config(10, 2);
    config.gradient.clear();
    assert!(matches!(HeatmapEngine::new(config), Err(HeatmapError::InvalidGradient(_))));
}

// ============================================================================
// Premultiplication probe
// ============================================================================

#[test]
fn test_probe_detects_premultiplying_surface() {
    assert!(probe_premultiplied_alpha::<PremultiplyingSurface>().unwrap());
    assert!(!probe_premultiplied_alpha::<PixmapSurface>().unwrap());
}

#[test]
fn test_engine_compensates_for_premultiplication() {
    let mut config = square_config(60, 10);
    config.gradient = blue_red_gradient();
    let mut heatmap = HeatmapEngine::<PremultiplyingSurface>::with_surface(config).unwrap();
    assert!(heatmap.premultiply_alpha());

    heatmap.add_point(30, 30);
    let level = heatmap.alpha_at(30, 30);
    let pixel = heatmap.pixel_at(30, 30);
    assert_eq!(pixel[3], heatmap.opacity());

    // Colorizer scales by 180/255 and the surface scales again on write
    let palette_red = heatmap.palette().color(level)[0] as f32;
    let factor = heatmap.opacity() as f32 / 255.0;
    let expected = palette_red * factor * factor;
    assert!((pixel[0] as f32 - expected).abs() <= 1.5, "red {} vs {}", pixel[0], expected);
}

#[test]
fn test_engine_on_pixmap_is_not_compensated() {
    let mut config = square_config(60, 10);
    config.gradient = blue_red_gradient();
    let mut heatmap = HeatmapEngine::new(config).unwrap();
    assert!(!heatmap.premultiply_alpha());

    heatmap.add_point(30, 30);
    let level = heatmap.alpha_at(30, 30);
    let expected = heatmap.palette().color(level);
    let pixel = heatmap.pixel_at(30, 30);
    assert!((pixel[0] as i16 - expected[0] as i16).abs() <= 1);
    assert!((pixel[2] as i16 - expected[2] as i16).abs() <= 1);
}
