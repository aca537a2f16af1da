//! Density heatmap rendering.
//!
//! Weighted point observations accumulate into a sparse occurrence grid.
//! Each point paints a radial alpha blob onto a hidden buffer, and a
//! colorize pass maps the accumulated alpha through a 256-entry palette into
//! the visible RGBA buffer.
//!
//! ```
//! use heatmap::{HeatmapConfig, HeatmapEngine};
//!
//! let mut config = HeatmapConfig::with_size(100, 100);
//! config.radius = 10;
//! let mut heatmap = HeatmapEngine::new(config).unwrap();
//!
//! heatmap.add_point(50, 50);
//! assert_eq!(heatmap.pixel_at(50, 50)[3], heatmap.opacity());
//! assert!(heatmap.export_data_url().unwrap().starts_with("data:image/png;base64,"));
//! ```

pub mod alpha;
pub mod bounds;
pub mod colorize;
pub mod engine;
pub mod export;
pub mod palette;
pub mod png;
pub mod store;
pub mod surface;

pub use bounds::{BoundsTracker, Rect};
pub use engine::HeatmapEngine;
pub use heatmap_common::{Color, DataPoint, DataSet, GradientStop, HeatmapConfig, HeatmapError, HeatmapResult};
pub use palette::Palette;
pub use store::{OccurrenceGrid, OccurrenceStore, StoreUpdate};
pub use surface::{PixmapSurface, Surface};
