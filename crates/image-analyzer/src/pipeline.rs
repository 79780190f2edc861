//! The decode → analyze → aggregate pipeline
//!
//! A [`Pipeline`] holds only configuration. Each call owns its decoded image and
//! signals and drops them on return, so one pipeline can serve any number of threads.

use tracing::{debug, warn};

use crate::brightness::BrightnessAnalyzer;
use crate::config::AnalyzerConfig;
use crate::content::{ContentAnalyzer, ContentClassifier, EdgeDensityClassifier};
use crate::decode::{decode, DecodedImage, ImageBuffer};
use crate::error::ConfigError;
use crate::report::{Aggregator, AnalysisReport, Assessment};
use crate::sharpness::SharpnessAnalyzer;
use crate::signal::{Analyzer, Outcome};

pub struct Pipeline {
    sharpness: SharpnessAnalyzer,
    brightness: BrightnessAnalyzer,
    content: ContentAnalyzer,
    aggregator: Aggregator,
    parallel: bool,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sharpness: SharpnessAnalyzer::new(config.sharpness),
            brightness: BrightnessAnalyzer::new(config.brightness),
            content: ContentAnalyzer::new(Box::new(EdgeDensityClassifier::new(config.content))),
            aggregator: Aggregator::new(config.suggestions),
            parallel: config.parallel,
        })
    }

    /// Replace the content classifier, keeping every other stage.
    pub fn with_classifier(mut self, classifier: Box<dyn ContentClassifier>) -> Self {
        self.content = ContentAnalyzer::new(classifier);
        self
    }

    /// Decode and measure, without building the report.
    pub fn assess(&self, buffer: &ImageBuffer) -> Assessment {
        let decoded = match decode(buffer) {
            Ok(image) => Some(image),
            Err(error) => {
                warn!(bytes = buffer.len(), %error, "decode failed, reporting worst case");
                None
            }
        };
        self.assess_decoded(decoded.as_ref())
    }

    /// Measure an already decoded image; `None` stands for a failed decode.
    pub fn assess_decoded(&self, image: Option<&DecodedImage>) -> Assessment {
        let (sharpness, brightness, category) = if self.parallel {
            let (sharpness, (brightness, category)) = rayon::join(
                || self.sharpness.assess(image),
                || {
                    rayon::join(
                        || self.brightness.assess(image),
                        || self.content.assess(image),
                    )
                },
            );
            (sharpness, brightness, category)
        } else {
            (
                self.sharpness.assess(image),
                self.brightness.assess(image),
                self.content.assess(image),
            )
        };

        debug!(
            sharpness_measured = sharpness.is_measured(),
            brightness_measured = brightness.is_measured(),
            content_measured = category.is_measured(),
            classifier = self.content.classifier_name(),
            "analyzers finished"
        );

        Assessment {
            sharpness: resolve(sharpness, &self.sharpness),
            brightness: resolve(brightness, &self.brightness),
            category: resolve(category, &self.content),
        }
    }

    /// Produce the full report. Never fails: undecodable input yields the worst-case
    /// report with an `unknown` category.
    pub fn analyze(&self, buffer: &ImageBuffer, filename: &str) -> AnalysisReport {
        let assessment = self.assess(buffer);
        self.aggregator.aggregate(filename, &assessment)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            sharpness: SharpnessAnalyzer::default(),
            brightness: BrightnessAnalyzer::default(),
            content: ContentAnalyzer::default(),
            aggregator: Aggregator::default(),
            parallel: AnalyzerConfig::default().parallel,
        }
    }
}

fn resolve<A: Analyzer>(outcome: Outcome<A::Output>, analyzer: &A) -> A::Output {
    outcome.resolve(analyzer.name())
}

/// Analyze encoded image bytes with the default configuration.
pub fn analyze(bytes: impl Into<ImageBuffer>, filename: &str) -> AnalysisReport {
    Pipeline::default().analyze(&bytes.into(), filename)
}
