//! Maps accumulated alpha through the palette into the visible buffer.

use crate::bounds::Rect;
use crate::palette::Palette;
use crate::surface::Surface;

/// Per-pass settings borrowed from the engine.
#[derive(Debug, Clone, Copy)]
pub struct Colorizer<'a> {
    palette: &'a Palette,
    opacity: u8,
    premultiply_alpha: bool,
}

impl<'a> Colorizer<'a> {
    pub fn new(palette: &'a Palette, opacity: u8, premultiply_alpha: bool) -> Self {
        Self {
            palette,
            opacity,
            premultiply_alpha,
        }
    }

    /// Map one alpha level to the straight RGBA written to the visible buffer.
    ///
    /// Returns `None` for alpha 0, which is left transparent.
    #[inline]
    pub fn shade(&self, alpha: u8) -> Option<[u8; 4]> {
        if alpha == 0 {
            return None;
        }

        let final_alpha = alpha.min(self.opacity);
        let [mut r, mut g, mut b, _] = self.palette.color(alpha);

        if self.premultiply_alpha {
            // Surface hands back premultiplied channels, scale up front to match
            let scale = |c: u8| (c as f32 * final_alpha as f32 / 255.0).round() as u8;
            r = scale(r);
            g = scale(g);
            b = scale(b);
        }

        Some([r, g, b, final_alpha])
    }

    /// Recolor `rect` of `visible` from the same region of `alpha`.
    ///
    /// Returns the number of pixels that carried any alpha.
    pub fn colorize_region<S: Surface>(&self, alpha: &S, visible: &mut S, rect: Rect) -> usize {
        if rect.is_empty() {
            return 0;
        }

        let mut image = alpha.read_region(rect);
        let mut painted = 0;

        for pixel in image.chunks_exact_mut(4) {
            match self.shade(pixel[3]) {
                Some(rgba) => {
                    pixel.copy_from_slice(&rgba);
                    painted += 1;
                }
                None => pixel.fill(0),
            }
        }

        visible.write_region(rect, &image);
        painted
    }
}
