//! Error types for heatmap rendering.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for heatmap operations.
#[derive(Debug, Error)]
pub enum HeatmapError {
    // === Configuration Errors ===
    #[error("Invalid configuration value for '{param}': {message}")]
    InvalidConfig { param: String, message: String },

    #[error("Invalid gradient: {0}")]
    InvalidGradient(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    // === Data Errors ===
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    // === Surface Errors ===
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl HeatmapError {
    pub fn invalid_config(param: impl Into<String>, message: impl Into<String>) -> Self {
        HeatmapError::InvalidConfig {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether the error comes from user supplied configuration rather than
    /// from the drawing or encoding backend.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            HeatmapError::InvalidConfig { .. }
                | HeatmapError::InvalidGradient(_)
                | HeatmapError::InvalidColor(_)
        )
    }
}

impl From<std::io::Error> for HeatmapError {
    fn from(err: std::io::Error) -> Self {
        HeatmapError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        HeatmapError::ParseError(err.to_string())
    }
}
