//! Analyzer thresholds
//!
//! Every constant the pipeline compares against lives here so a deployment can retune
//! the heuristics from a config file. `Default` reproduces the stock behavior.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Run the three analyzers concurrently on the rayon pool
    pub parallel: bool,
    pub sharpness: SharpnessConfig,
    pub brightness: BrightnessConfig,
    pub content: ContentConfig,
    pub suggestions: SuggestionConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            sharpness: SharpnessConfig::default(),
            brightness: BrightnessConfig::default(),
            content: ContentConfig::default(),
            suggestions: SuggestionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpnessConfig {
    /// Laplacian variance below this marks the image blurry
    pub blur_variance_threshold: f64,
    /// Variance is divided by this to land on the clarity display scale
    pub clarity_divisor: f64,
    /// Upper clamp of the clarity score
    pub clarity_max: f64,
}

impl Default for SharpnessConfig {
    fn default() -> Self {
        Self {
            blur_variance_threshold: 100.0,
            clarity_divisor: 2.0,
            clarity_max: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessConfig {
    /// Mean gray level (0-255) below which the image is dark
    pub dark_threshold: f64,
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self { dark_threshold: 70.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Canny hysteresis thresholds on gradient magnitude
    pub canny_low: f32,
    pub canny_high: f32,
    /// Edge density strictly above this classifies as interior
    pub interior_edge_density: f64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            canny_low: 100.0,
            canny_high: 200.0,
            interior_edge_density: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Raw clarity below this adds the focus advice
    pub low_clarity: f64,
    /// Raw brightness below this adds the exposure advice
    pub low_brightness: f64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            low_clarity: 50.0,
            low_brightness: 80.0,
        }
    }
}

impl AnalyzerConfig {
    /// Check every threshold for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("sharpness.blur_variance_threshold", self.sharpness.blur_variance_threshold)?;
        positive("sharpness.clarity_divisor", self.sharpness.clarity_divisor)?;
        positive("sharpness.clarity_max", self.sharpness.clarity_max)?;
        non_negative("brightness.dark_threshold", self.brightness.dark_threshold)?;
        non_negative("content.canny_low", f64::from(self.content.canny_low))?;
        non_negative("content.canny_high", f64::from(self.content.canny_high))?;
        if self.content.canny_low > self.content.canny_high {
            return Err(ConfigError::InvertedCannyThresholds {
                low: self.content.canny_low,
                high: self.content.canny_high,
            });
        }
        if !(0.0..=1.0).contains(&self.content.interior_edge_density) {
            return Err(ConfigError::OutOfUnitRange {
                key: "content.interior_edge_density",
                value: self.content.interior_edge_density,
            });
        }
        non_negative("suggestions.low_clarity", self.suggestions.low_clarity)?;
        non_negative("suggestions.low_brightness", self.suggestions.low_brightness)?;
        Ok(())
    }
}

fn non_negative(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { key, value })
    }
}

fn positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { key, value })
    }
}
