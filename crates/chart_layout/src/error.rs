//! Error types for the chart layout crate

use thiserror::Error;

/// Errors that can occur while configuring or querying a chart layout
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A pixel bound was negative
    #[error("Margin pixels must not be negative: {0}")]
    NegativePixels(f64),

    /// A percent bound was outside of 0..=100
    #[error("Margin percent must be between 0 and 100: {0}")]
    PercentOutOfRange(f64),

    /// The minimum bound was larger than the maximum bound
    #[error("Margin minimum {min} exceeds maximum {max}")]
    MinExceedsMax { min: f64, max: f64 },

    /// Bounds were read, or layout requested, without a `measure` for the
    /// current views, config and chart size
    #[error("Layout has not been measured for the current views and size")]
    NotMeasured,

    /// Layout configuration could not be parsed
    #[error("Invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
