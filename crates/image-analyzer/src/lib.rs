//! Photo quality analysis for marketplace listings
//!
//! Given the encoded bytes of an uploaded photo, the pipeline decodes it once and runs
//! three independent analyzers over the pixels:
//!
//! - **Sharpness**: Laplacian variance, flags blurry shots
//! - **Brightness**: mean luminance, flags dark shots
//! - **Content**: Canny edge density over raw Sobel gradients, buckets the shot as interior or exterior
//!
//! The aggregator turns the signals into a headline quality score and ordered advice.
//! Analysis is total: corrupt or unsupported bytes produce a worst-case report rather
//! than an error.
//!
//! ```no_run
//! let bytes = std::fs::read("front.jpg").unwrap();
//! let report = image_analyzer::analyze(bytes, "front.jpg");
//! println!("{} -> {}", report.filename, report.quality_score);
//! ```

pub mod brightness;
pub mod config;
pub mod content;
pub mod decode;
pub mod edges;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sharpness;
pub mod signal;

pub use brightness::BrightnessAnalyzer;
pub use config::{AnalyzerConfig, BrightnessConfig, ContentConfig, SharpnessConfig, SuggestionConfig};
pub use content::{Category, ContentAnalyzer, ContentClassifier, EdgeDensityClassifier};
pub use decode::{decode, DecodedImage, ImageBuffer};
pub use error::{AnalysisError, ConfigError};
pub use pipeline::{analyze, Pipeline};
pub use report::{round2, Aggregator, AnalysisReport, Assessment, Suggestion};
pub use sharpness::SharpnessAnalyzer;
pub use signal::{Analyzer, Outcome, QualitySignal, Sentinel};
