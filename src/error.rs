//! Error types for configuration, loading and the document seam

use thiserror::Error;

use crate::geometry::Canvas;

/// Rejected options or canvas, raised before any element is looked at
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A threshold or margin below zero
    #[error("option '{name}' must not be negative (got {value})")]
    Negative { name: &'static str, value: f64 },

    /// NaN or infinite option value
    #[error("option '{name}' must be a finite number (got {value})")]
    NonFinite { name: &'static str, value: f64 },

    /// Repair needs at least one iteration
    #[error("max_iterations must be at least 1")]
    ZeroIterations,

    /// Canvas without a positive, finite extent
    #[error("canvas must have positive size (got {width}x{height})")]
    InvalidCanvas { width: f64, height: f64 },

    /// Margin leaves no room for content on the canvas
    #[error("margin {margin} leaves no content area on a {width}x{height} canvas")]
    MarginTooLarge { margin: f64, width: f64, height: f64 },
}

impl ConfigError {
    /// Create a negative-value error
    pub fn negative(name: &'static str, value: f64) -> Self {
        Self::Negative { name, value }
    }

    /// Create a non-finite-value error
    pub fn non_finite(name: &'static str, value: f64) -> Self {
        Self::NonFinite { name, value }
    }

    /// Create an invalid canvas error
    pub fn invalid_canvas(width: f64, height: f64) -> Self {
        Self::InvalidCanvas { width, height }
    }

    /// Create a margin-too-large error for `canvas`
    pub fn margin_too_large(margin: f64, canvas: &Canvas) -> Self {
        Self::MarginTooLarge {
            margin,
            width: canvas.width,
            height: canvas.height,
        }
    }
}

/// Errors that can occur when loading options or snapshots from TOML
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Errors from operations that go through a [`crate::LayoutDocument`]
#[derive(Debug, Error)]
pub enum DocumentError<E: std::error::Error + 'static> {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The document layer failed to snapshot or commit
    #[error("document layer error: {0}")]
    Document(#[source] E),

    #[error("canvas {index} out of range (document has {count})")]
    CanvasOutOfRange { index: usize, count: usize },
}
