//! Interior/exterior classification
//!
//! The stock classifier is an edge-density heuristic: interior shots (dashboards, seats,
//! trim) tend to carry more fine detail than exteriors against open backgrounds. It has
//! no labelled-data validation behind it. Anything implementing [`ContentClassifier`]
//! can replace it without touching the rest of the pipeline.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ContentConfig;
use crate::decode::DecodedImage;
use crate::edges::{self, EDGE};
use crate::error::AnalysisError;
use crate::signal::{Analyzer, Sentinel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Interior,
    Exterior,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Interior => "interior",
            Category::Exterior => "exterior",
            Category::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Sentinel for Category {
    fn sentinel() -> Self {
        Category::Unknown
    }
}

/// Strategy that buckets a decoded image into a [`Category`].
pub trait ContentClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns an error when the image cannot be classified; the pipeline reports
    /// [`Category::Unknown`] in that case.
    fn classify(&self, image: &DecodedImage) -> Result<Category, AnalysisError>;
}

/// Canny edge density against a fixed cut-off.
#[derive(Debug, Clone, Default)]
pub struct EdgeDensityClassifier {
    config: ContentConfig,
}

impl EdgeDensityClassifier {
    pub fn new(config: ContentConfig) -> Self {
        Self { config }
    }

    /// Fraction of pixels the hysteresis edge detector marks as edges.
    pub fn edge_density(&self, image: &DecodedImage) -> Result<f64, AnalysisError> {
        image.ensure_area()?;
        let edges = edges::canny(image.gray(), self.config.canny_low, self.config.canny_high);
        let edge_pixels = edges.as_raw().iter().filter(|&&v| v == EDGE).count();
        Ok(edge_pixels as f64 / image.pixel_count() as f64)
    }

    pub fn category_for_density(&self, density: f64) -> Category {
        if density > self.config.interior_edge_density {
            Category::Interior
        } else {
            Category::Exterior
        }
    }
}

impl ContentClassifier for EdgeDensityClassifier {
    fn name(&self) -> &'static str {
        "edge-density"
    }

    fn classify(&self, image: &DecodedImage) -> Result<Category, AnalysisError> {
        let density = self.edge_density(image)?;
        let category = self.category_for_density(density);
        debug!(density, %category, "edge density");
        Ok(category)
    }
}

/// Adapts any [`ContentClassifier`] to the [`Analyzer`] contract.
pub struct ContentAnalyzer {
    classifier: Box<dyn ContentClassifier>,
}

impl ContentAnalyzer {
    pub fn new(classifier: Box<dyn ContentClassifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new(Box::new(EdgeDensityClassifier::default()))
    }
}

impl Analyzer for ContentAnalyzer {
    type Output = Category;

    fn name(&self) -> &'static str {
        "content"
    }

    fn analyze(&self, image: &DecodedImage) -> Result<Category, AnalysisError> {
        self.classifier.classify(image)
    }
}
