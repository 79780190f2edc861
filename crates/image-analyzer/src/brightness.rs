//! Exposure estimation from mean luminance

use image::GrayImage;
use tracing::debug;

use crate::config::BrightnessConfig;
use crate::decode::DecodedImage;
use crate::error::AnalysisError;
use crate::signal::{Analyzer, QualitySignal};

/// Produces `is_dark` and `brightness_score` (mean gray level, 0-255, not rescaled).
#[derive(Debug, Clone, Default)]
pub struct BrightnessAnalyzer {
    config: BrightnessConfig,
}

impl BrightnessAnalyzer {
    pub fn new(config: BrightnessConfig) -> Self {
        Self { config }
    }

    pub fn signal_from_mean(&self, mean: f64) -> QualitySignal {
        QualitySignal::new(mean < self.config.dark_threshold, mean)
    }
}

impl Analyzer for BrightnessAnalyzer {
    type Output = QualitySignal;

    fn name(&self) -> &'static str {
        "brightness"
    }

    fn analyze(&self, image: &DecodedImage) -> Result<QualitySignal, AnalysisError> {
        image.ensure_area()?;
        let mean = mean_luminance(image.gray());
        debug!(mean, "mean luminance");
        Ok(self.signal_from_mean(mean))
    }
}

/// Arithmetic mean of all gray levels. Returns 0.0 for an empty grid.
pub fn mean_luminance(gray: &GrayImage) -> f64 {
    let raw = gray.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let sum: u64 = raw.iter().map(|&v| u64::from(v)).sum();
    sum as f64 / raw.len() as f64
}
