//! Common test fixtures for heatmap tests.

use std::path::PathBuf;

use heatmap_common::{Color, GradientStop, HeatmapConfig};
use tempfile::TempDir;

/// Square canvas with the given radius and defaults elsewhere.
pub fn square_config(size: u32, radius: u32) -> HeatmapConfig {
    HeatmapConfig {
        radius,
        ..HeatmapConfig::with_size(size, size)
    }
}

/// Two-stop blue to red gradient, so palette entries are easy to predict.
pub fn blue_red_gradient() -> Vec<GradientStop> {
    vec![
        GradientStop::new(0.0, Color::rgb(0, 0, 255)),
        GradientStop::new(1.0, Color::rgb(255, 0, 0)),
    ]
}

/// Config file contents exercising every recognized key.
pub const SAMPLE_CONFIG_JSON: &str = r##"{
    "radius": 12,
    "visible": true,
    "max": 0,
    "opacity": 80,
    "width": 120,
    "height": 90,
    "debug": false,
    "gradient": [
        {"position": 0.25, "color": "rgb(0,0,255)"},
        {"position": 0.6, "color": "#00ff00"},
        {"position": 1.0, "color": "red"}
    ]
}"##;

/// Data set in wire format.
pub const SAMPLE_DATA_SET_JSON: &str = r#"{
    "max": 6,
    "data": [[10, 10, 6], [40, 12, 2], [70, 60, 3], [-5, 4, 1]]
}"#;

/// Write `contents` to `name` inside a fresh temporary directory.
///
/// The directory is removed when the returned guard drops.
pub fn write_temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("failed to write temp file");
    (dir, path)
}
