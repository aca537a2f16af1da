//! Alpha-to-color lookup table.
//!
//! The palette is built once from the configured gradient stops: entry `i`
//! holds the gradient color at `t = i / 255`, so the accumulated alpha of a
//! pixel indexes its color directly.

use heatmap_common::{HeatmapConfig, HeatmapError, HeatmapResult};

use crate::bounds::Rect;
use crate::surface::Surface;

pub const PALETTE_SIZE: usize = 256;

/// Straight pixel written by the premultiplication probe: 25% red, 25% alpha.
const PROBE_PIXEL: [u8; 4] = [64, 0, 0, 64];

/// Red channel range accepted as a faithful read-back of the probe pixel.
const PROBE_TOLERANCE: std::ops::RangeInclusive<u8> = 60..=70;

/// 256-entry RGBA lookup table indexed by alpha level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
}

impl Palette {
    /// Build from stops already resolved to RGBA.
    pub fn from_stops(stops: &[(f64, [u8; 4])]) -> HeatmapResult<Self> {
        if stops.is_empty() {
            return Err(HeatmapError::InvalidGradient(
                "cannot build a palette without color stops".to_string(),
            ));
        }
        if let Some((pos, _)) = stops.iter().find(|(p, _)| !p.is_finite() || !(0.0..=1.0).contains(p)) {
            return Err(HeatmapError::InvalidGradient(format!(
                "stop position {} is outside [0, 1]",
                pos
            )));
        }

        let mut sorted = stops.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let colors = (0..PALETTE_SIZE)
            .map(|i| sample(&sorted, i as f64 / (PALETTE_SIZE - 1) as f64))
            .collect();

        Ok(Self { colors })
    }

    pub fn from_config(config: &HeatmapConfig) -> HeatmapResult<Self> {
        Self::from_stops(&config.resolved_gradient()?)
    }

    /// Color for an alpha level.
    #[inline]
    pub fn color(&self, level: u8) -> [u8; 4] {
        self.colors[level as usize]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }
}

/// Gradient color at `t`, padded with the end colors outside the stops.
fn sample(stops: &[(f64, [u8; 4])], t: f64) -> [u8; 4] {
    let (first_pos, first) = stops[0];
    let (last_pos, last) = stops[stops.len() - 1];

    if t <= first_pos {
        return first;
    }
    if t >= last_pos {
        return last;
    }

    for pair in stops.windows(2) {
        let (low_pos, low) = pair[0];
        let (high_pos, high) = pair[1];
        if t <= high_pos {
            let span = high_pos - low_pos;
            let f = if span <= f64::EPSILON { 1.0 } else { (t - low_pos) / span };
            return lerp(low, high, f);
        }
    }

    last
}

fn lerp(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| ((x as f64) * (1.0 - t) + (y as f64) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), mix(a[3], b[3])]
}

/// Detect a surface that hands back premultiplied channels from a straight
/// write, which the colorizer then has to compensate for.
pub fn probe_premultiplied_alpha<S: Surface>() -> HeatmapResult<bool> {
    let mut scratch = S::create(1, 1)?;
    let pixel = Rect::new(0, 0, 1, 1);
    scratch.write_region(pixel, &PROBE_PIXEL);

    let red = scratch.read_region(pixel)[0];
    let premultiplied = !PROBE_TOLERANCE.contains(&red);
    tracing::debug!(red, premultiplied, "Premultiplied alpha probe");
    Ok(premultiplied)
}
