//! Common types shared by the heatmap renderer, its tests and the CLI.

pub mod color;
pub mod config;
pub mod dataset;
pub mod error;

pub use color::Color;
pub use config::{GradientStop, HeatmapConfig};
pub use dataset::{DataPoint, DataSet};
pub use error::{HeatmapError, HeatmapResult};
