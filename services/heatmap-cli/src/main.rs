//! Heatmap command line renderer.
//!
//! Reads a data set (and optionally an engine config) from JSON files and
//! writes the rendered heatmap as a PNG file or a PNG data URL.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use heatmap::HeatmapEngine;
use heatmap_common::{DataSet, HeatmapConfig};

#[derive(Parser, Debug)]
#[command(name = "heatmap-cli")]
#[command(about = "Render a density heatmap from weighted points")]
struct Args {
    /// Data set JSON: {"max": n, "data": [[x, y, count], ...]}
    #[arg(short, long, env = "HEATMAP_DATA")]
    data: PathBuf,

    /// Engine config JSON
    #[arg(short, long, env = "HEATMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Canvas width, overrides the config file
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height, overrides the config file
    #[arg(long)]
    height: Option<u32>,

    /// Point radius in pixels, overrides the config file
    #[arg(long)]
    radius: Option<u32>,

    /// Log level
    #[arg(long, default_value = "info", env = "HEATMAP_LOG_LEVEL")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Png,
    DataUrl,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr, stdout may carry the image
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&args)?;
    let data = DataSet::from_file(&args.data)
        .with_context(|| format!("failed to read data set {}", args.data.display()))?;

    info!(
        width = config.width,
        height = config.height,
        radius = config.radius,
        points = data.len(),
        "Rendering heatmap"
    );

    let output = render(config, &data, args.format)?;

    match &args.output {
        Some(path) => write_file(path, &output)?,
        None => std::io::stdout().lock().write_all(&output)?,
    }

    info!(bytes = output.len(), format = ?args.format, "Render complete");
    Ok(())
}

/// Config file (or defaults) with command line overrides applied.
fn load_config(args: &Args) -> Result<HeatmapConfig> {
    let mut config = match &args.config {
        Some(path) => HeatmapConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => HeatmapConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(radius) = args.radius {
        config.radius = radius;
    }

    if config.width == 0 || config.height == 0 {
        bail!(
            "canvas size {}x{} is empty, pass --width and --height or set them in the config",
            config.width,
            config.height
        );
    }

    config.validate()?;
    Ok(config)
}

/// Render `data` and encode the visible buffer.
fn render(config: HeatmapConfig, data: &DataSet, format: OutputFormat) -> Result<Vec<u8>> {
    let mut heatmap = HeatmapEngine::new(config)?;
    heatmap.load_data_set(data);

    let bytes = match format {
        OutputFormat::Png => heatmap.export_buffer()?,
        OutputFormat::DataUrl => heatmap.export_data_url()?.into_bytes(),
    };
    Ok(bytes)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{write_temp_file, SAMPLE_CONFIG_JSON, SAMPLE_DATA_SET_JSON};

    fn args(data: PathBuf, config: Option<PathBuf>) -> Args {
        Args {
            data,
            config,
            output: None,
            format: OutputFormat::Png,
            width: None,
            height: None,
            radius: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_overrides_win_over_config_file() {
        let (_dir, config_path) = write_temp_file("config.json", SAMPLE_CONFIG_JSON);
        let mut args = args(PathBuf::from("unused.json"), Some(config_path));
        args.width = Some(64);
        args.radius = Some(5);

        let config = load_config(&args).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 90);
        assert_eq!(config.radius, 5);
        assert_eq!(config.gradient.len(), 3);
    }

    #[test]
    fn test_missing_size_is_rejected() {
        let args = args(PathBuf::from("unused.json"), None);
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_render_png_and_data_url() {
        let data = DataSet::from_json(SAMPLE_DATA_SET_JSON).unwrap();
        let config = HeatmapConfig::with_size(80, 80);

        let png = render(config.clone(), &data, OutputFormat::Png).unwrap();
        assert_eq!(&png[0..8], &heatmap::png::SIGNATURE);

        let url = render(config, &data, OutputFormat::DataUrl).unwrap();
        assert!(url.starts_with(b"data:image/png;base64,"));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.png");
        write_file(&path, b"abc").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
    }

    #[test]
    fn test_cli_parses_format() {
        let args = Args::try_parse_from(["heatmap-cli", "--data", "d.json", "--format", "data-url"]).unwrap();
        assert_eq!(args.format, OutputFormat::DataUrl);
        assert!(args.config.is_none());
    }
}
