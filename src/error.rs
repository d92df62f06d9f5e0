//! Error types for grid construction, map loading and configuration

use thiserror::Error;

/// Invalid grid dimensions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("node radius must be positive, got {0}")]
    InvalidRadius(f32),

    #[error("grid world size must be positive, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },

    #[error("grid of {width}x{height} world units holds no cells of diameter {diameter}")]
    EmptyGrid {
        width: f32,
        height: f32,
        diameter: f32,
    },

    #[error("grid of {size_x}x{size_y} cells is too large to index")]
    TooManyCells { size_x: i32, size_y: i32 },
}

/// Failure to load or parse a map description
#[derive(Error, Debug)]
pub enum MapError {
    #[error("failed to read map: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("layout line {line}: {message}")]
    Layout { line: usize, message: String },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Failure to load configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
