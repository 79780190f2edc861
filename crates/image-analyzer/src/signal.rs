//! Analyzer contract and the sentinel-returning outcome type
//!
//! An analyzer never fails the request. Its result is an [`Outcome`]: a measured value,
//! a decode failure upstream, or a fault inside the analyzer itself. The two failure
//! branches resolve to the analyzer's worst-case [`Sentinel`].

use tracing::warn;

use crate::decode::DecodedImage;
use crate::error::AnalysisError;

/// Threshold verdict plus the continuous score it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySignal {
    /// `true` when the image fails the analyzer's threshold (blurry, dark)
    pub flag: bool,
    /// Unrounded score on the analyzer's display scale
    pub score: f64,
}

impl QualitySignal {
    pub fn new(flag: bool, score: f64) -> Self {
        Self { flag, score }
    }
}

/// Worst-case value substituted when an analyzer cannot measure.
pub trait Sentinel {
    fn sentinel() -> Self;
}

impl Sentinel for QualitySignal {
    fn sentinel() -> Self {
        Self::new(true, 0.0)
    }
}

#[derive(Debug)]
pub enum Outcome<T> {
    Measured(T),
    DecodeFailed,
    Faulted(AnalysisError),
}

impl<T: Sentinel> Outcome<T> {
    pub fn is_measured(&self) -> bool {
        matches!(self, Outcome::Measured(_))
    }

    /// Collapse to a value, substituting the sentinel on either failure branch.
    pub fn resolve(self, analyzer: &str) -> T {
        match self {
            Outcome::Measured(value) => value,
            Outcome::DecodeFailed => T::sentinel(),
            Outcome::Faulted(error) => {
                warn!(analyzer, %error, "analyzer fault, substituting sentinel");
                T::sentinel()
            }
        }
    }
}

/// A single, independent measurement over a decoded image.
pub trait Analyzer: Send + Sync {
    type Output: Sentinel + Send;

    fn name(&self) -> &'static str;

    /// Measure the image.
    ///
    /// # Errors
    ///
    /// Returns an error when the grid cannot be measured; the caller substitutes the
    /// sentinel instead of propagating it.
    fn analyze(&self, image: &DecodedImage) -> Result<Self::Output, AnalysisError>;

    /// Run against the decoder's result, tagging the failure branches.
    fn assess(&self, image: Option<&DecodedImage>) -> Outcome<Self::Output> {
        match image {
            None => Outcome::DecodeFailed,
            Some(image) => match self.analyze(image) {
                Ok(value) => Outcome::Measured(value),
                Err(error) => Outcome::Faulted(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    struct Failing;

    impl Analyzer for Failing {
        type Output = QualitySignal;

        fn name(&self) -> &'static str {
            "failing"
        }

        fn analyze(&self, image: &DecodedImage) -> Result<QualitySignal, AnalysisError> {
            Err(AnalysisError::EmptyGrid { width: image.width(), height: image.height() })
        }
    }

    #[test]
    fn test_sentinel_is_worst_case() {
        let sentinel = QualitySignal::sentinel();
        assert!(sentinel.flag);
        assert_eq!(sentinel.score, 0.0);
    }

    #[test]
    fn test_missing_image_is_decode_failure() {
        let outcome = Failing.assess(None);
        assert!(matches!(outcome, Outcome::DecodeFailed));
        assert_eq!(outcome.resolve("failing"), QualitySignal::sentinel());
    }

    #[test]
    fn test_fault_resolves_to_sentinel() {
        let image = DecodedImage::from_rgb(RgbImage::new(4, 4));
        let outcome = Failing.assess(Some(&image));
        assert!(matches!(outcome, Outcome::Faulted(_)));
        assert!(!outcome.is_measured());
        assert_eq!(outcome.resolve(Failing.name()), QualitySignal::sentinel());
    }

    #[test]
    fn test_measured_passes_through() {
        let signal = QualitySignal::new(false, 42.5);
        assert_eq!(Outcome::Measured(signal).resolve("test"), signal);
    }
}
