//! Heatmap configuration.
//!
//! Mirrors the option set of the classic heatmap configuration object:
//! every key is optional and unknown keys are ignored.
//!
//! ```
//! use heatmap_common::HeatmapConfig;
//!
//! let config = HeatmapConfig::from_json(r#"{"width": 200, "height": 100, "opacity": 50}"#).unwrap();
//! assert_eq!(config.radius, 40);
//! assert_eq!(config.opacity_ceiling(), 128);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Color;
use crate::error::{HeatmapError, HeatmapResult};

pub const DEFAULT_RADIUS: u32 = 40;

/// Opacity ceiling used when no opacity is configured (out of 255).
pub const DEFAULT_OPACITY_CEILING: u8 = 180;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Radius of the radial blob painted per point, in pixels
    pub radius: u32,

    /// Whether colorize passes run as points arrive
    pub visible: bool,

    /// Initial running maximum. `None` (or 0) means auto
    pub max: Option<f64>,

    /// Gradient stops the palette is built from
    pub gradient: Vec<GradientStop>,

    /// Opacity ceiling as a percentage (0-100)
    pub opacity: Option<f64>,

    pub width: u32,
    pub height: u32,

    /// Log per-pass diagnostics at info level
    pub debug: bool,
}

/// A color stop in the palette gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, within [0, 1]
    pub position: f64,

    pub color: Color,
}

impl GradientStop {
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            visible: true,
            max: None,
            gradient: default_gradient(),
            opacity: None,
            width: 0,
            height: 0,
            debug: false,
        }
    }
}

/// The common blue to red gradient.
pub fn default_gradient() -> Vec<GradientStop> {
    vec![
        GradientStop::new(0.55, Color::css("rgb(0,0,255)")),
        GradientStop::new(0.65, Color::css("rgb(0,255,255)")),
        GradientStop::new(0.75, Color::css("rgb(0,255,0)")),
        GradientStop::new(0.95, Color::css("yellow")),
        GradientStop::new(1.0, Color::css("rgb(255,0,0)")),
    ]
}

impl HeatmapConfig {
    /// Config with the given canvas size and defaults elsewhere.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> HeatmapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Opacity ceiling on the 0-255 scale.
    pub fn opacity_ceiling(&self) -> u8 {
        match self.opacity {
            Some(percent) if percent.is_finite() => {
                (255.0 * percent.clamp(0.0, 100.0) / 100.0).round() as u8
            }
            _ => DEFAULT_OPACITY_CEILING,
        }
    }

    /// Running maximum the store starts from (and returns to on clear).
    pub fn initial_max(&self) -> f64 {
        match self.max {
            Some(max) if max.is_finite() && max > 0.0 => max,
            _ => 1.0,
        }
    }

    /// Gradient stops resolved to RGBA and sorted by position.
    pub fn resolved_gradient(&self) -> HeatmapResult<Vec<(f64, [u8; 4])>> {
        if self.gradient.is_empty() {
            return Err(HeatmapError::InvalidGradient(
                "gradient must have at least 1 color stop".to_string(),
            ));
        }

        let mut stops = Vec::with_capacity(self.gradient.len());
        for stop in &self.gradient {
            if !stop.position.is_finite() || !(0.0..=1.0).contains(&stop.position) {
                return Err(HeatmapError::InvalidGradient(format!(
                    "stop position {} is outside [0, 1]",
                    stop.position
                )));
            }
            stops.push((stop.position, stop.color.to_rgba()?));
        }

        // Stable sort keeps declaration order for stops sharing a position
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(stops)
    }

    /// Validate every option, failing fast on the first problem.
    pub fn validate(&self) -> HeatmapResult<()> {
        if self.radius == 0 {
            return Err(HeatmapError::invalid_config("radius", "must be greater than 0"));
        }

        if let Some(opacity) = self.opacity {
            if !opacity.is_finite() || !(0.0..=100.0).contains(&opacity) {
                return Err(HeatmapError::invalid_config(
                    "opacity",
                    format!("{} is outside 0..=100", opacity),
                ));
            }
        }

        if let Some(max) = self.max {
            if !max.is_finite() || max < 0.0 {
                return Err(HeatmapError::invalid_config(
                    "max",
                    format!("{} is not a non-negative number", max),
                ));
            }
        }

        self.resolved_gradient().map(|_| ())
    }
}
