//! Aggregation of the three signals into the caller-facing report

use serde::{Deserialize, Serialize};

use crate::config::SuggestionConfig;
use crate::content::Category;
use crate::signal::QualitySignal;

/// Everything the pipeline measured for one image, before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub sharpness: QualitySignal,
    pub brightness: QualitySignal,
    pub category: Category,
}

/// Final result handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub filename: String,
    pub is_blurry: bool,
    pub is_dark: bool,
    /// Mean gray level, 0-255, two decimals
    pub brightness_score: f64,
    /// Focus score, 0-100, two decimals
    pub clarity_score: f64,
    /// Never empty; ordered by severity
    pub suggestions: Vec<String>,
    pub category: Category,
    /// Mean of clarity and brightness, two decimals
    pub quality_score: f64,
}

/// Advice attached to a report. Variant order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
    Blurry,
    Dark,
    LowClarity,
    LowBrightness,
    Excellent,
}

impl Suggestion {
    pub fn message(&self) -> &'static str {
        match self {
            Suggestion::Blurry => {
                "Image appears blurry. Try taking a sharper photo with better lighting."
            }
            Suggestion::Dark => "Image is too dark. Consider shooting in daylight or using flash.",
            Suggestion::LowClarity => {
                "Image clarity is low. Ensure camera focus is on the vehicle."
            }
            Suggestion::LowBrightness => {
                "Image brightness could be improved for better visibility."
            }
            Suggestion::Excellent => {
                "Image quality looks excellent! This will attract more buyers."
            }
        }
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: SuggestionConfig,
}

impl Aggregator {
    pub fn new(config: SuggestionConfig) -> Self {
        Self { config }
    }

    /// Suggestions for an assessment, most severe first.
    ///
    /// Each check is independent, so a blurry image usually collects both the blur and
    /// the low-clarity advice.
    pub fn suggestions(&self, assessment: &Assessment) -> Vec<Suggestion> {
        let checks = [
            (assessment.sharpness.flag, Suggestion::Blurry),
            (assessment.brightness.flag, Suggestion::Dark),
            (
                assessment.sharpness.score < self.config.low_clarity,
                Suggestion::LowClarity,
            ),
            (
                assessment.brightness.score < self.config.low_brightness,
                Suggestion::LowBrightness,
            ),
        ];

        let mut suggestions: Vec<Suggestion> = checks
            .into_iter()
            .filter_map(|(fired, suggestion)| fired.then_some(suggestion))
            .collect();

        if suggestions.is_empty() {
            suggestions.push(Suggestion::Excellent);
        }
        suggestions
    }

    /// Build the report. Thresholds are checked on raw scores; only the values written
    /// into the report are rounded.
    pub fn aggregate(&self, filename: &str, assessment: &Assessment) -> AnalysisReport {
        let quality = (assessment.sharpness.score + assessment.brightness.score) / 2.0;

        AnalysisReport {
            filename: filename.to_string(),
            is_blurry: assessment.sharpness.flag,
            is_dark: assessment.brightness.flag,
            brightness_score: round2(assessment.brightness.score),
            clarity_score: round2(assessment.sharpness.score),
            suggestions: self
                .suggestions(assessment)
                .iter()
                .map(ToString::to_string)
                .collect(),
            category: assessment.category,
            quality_score: round2(quality),
        }
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
