//! Error types for image analysis and configuration

use thiserror::Error;

/// Failure inside the analysis core.
///
/// None of these reach the caller of [`crate::Pipeline::analyze`]; each one is turned into
/// the affected analyzer's sentinel value.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("image buffer is empty")]
    EmptyBuffer,

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to read image header: {0}")]
    Io(#[from] std::io::Error),

    #[error("pixel grid has no area ({width}x{height})")]
    EmptyGrid { width: u32, height: u32 },
}

/// Rejected [`crate::AnalyzerConfig`] values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a finite, non-negative number, got {value}")]
    Negative { key: &'static str, value: f64 },

    #[error("{key} must be greater than zero, got {value}")]
    NotPositive { key: &'static str, value: f64 },

    #[error("{key} must be within 0.0..=1.0, got {value}")]
    OutOfUnitRange { key: &'static str, value: f64 },

    #[error("content.canny_low ({low}) must not exceed content.canny_high ({high})")]
    InvertedCannyThresholds { low: f32, high: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_display() {
        let error = AnalysisError::EmptyGrid { width: 0, height: 12 };
        assert_eq!(error.to_string(), "pixel grid has no area (0x12)");
    }

    #[test]
    fn test_config_error_names_key() {
        let error = ConfigError::Negative { key: "brightness.dark_threshold", value: -1.0 };
        let display = error.to_string();
        assert!(display.contains("brightness.dark_threshold"));
        assert!(display.contains("-1"));
    }

    #[test]
    fn test_from_image_error() {
        let image_error = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        ));
        let error: AnalysisError = image_error.into();
        assert!(matches!(error, AnalysisError::Decode(_)));
    }
}
