//! Focus estimation via Laplacian variance
//!
//! A sharp photo has many strong second-derivative responses; a defocused or shaken one
//! is flat. The variance of the 4-neighbour Laplacian over the whole grid is the
//! measure, with reflect-101 borders so edge pixels count like interior ones.

use image::GrayImage;
use tracing::debug;

use crate::config::SharpnessConfig;
use crate::decode::DecodedImage;
use crate::error::AnalysisError;
use crate::signal::{Analyzer, QualitySignal};

/// Produces `is_blurry` and `clarity_score` (0-100).
#[derive(Debug, Clone, Default)]
pub struct SharpnessAnalyzer {
    config: SharpnessConfig,
}

impl SharpnessAnalyzer {
    pub fn new(config: SharpnessConfig) -> Self {
        Self { config }
    }

    /// Map a raw variance onto the signal. Variance is unbounded, so the clarity
    /// score saturates at `clarity_max`.
    pub fn signal_from_variance(&self, variance: f64) -> QualitySignal {
        let is_blurry = variance < self.config.blur_variance_threshold;
        let clarity = (variance / self.config.clarity_divisor).min(self.config.clarity_max);
        QualitySignal::new(is_blurry, clarity)
    }
}

impl Analyzer for SharpnessAnalyzer {
    type Output = QualitySignal;

    fn name(&self) -> &'static str {
        "sharpness"
    }

    fn analyze(&self, image: &DecodedImage) -> Result<QualitySignal, AnalysisError> {
        image.ensure_area()?;
        let variance = laplacian_variance(image.gray());
        debug!(variance, "laplacian variance");
        Ok(self.signal_from_variance(variance))
    }
}

/// Population variance of the Laplacian `[0,1,0; 1,-4,1; 0,1,0]` over every pixel.
///
/// Returns 0.0 for an empty grid.
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    if width == 0 || height == 0 {
        return 0.0;
    }

    let raw = gray.as_raw();
    let at = |x: usize, y: usize| f64::from(raw[y * width + x]);

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for y in 0..height {
        let up = reflect_101(y as isize - 1, height);
        let down = reflect_101(y as isize + 1, height);
        for x in 0..width {
            let left = reflect_101(x as isize - 1, width);
            let right = reflect_101(x as isize + 1, width);

            let response =
                at(x, up) + at(x, down) + at(left, y) + at(right, y) - 4.0 * at(x, y);
            sum += response;
            sum_sq += response * response;
        }
    }

    let n = (width * height) as f64;
    let mean = sum / n;
    // Rounding can push a flat grid a hair below zero
    (sum_sq / n - mean * mean).max(0.0)
}

/// Mirror an out-of-range index without repeating the border pixel (`gfedcb|abcdefgh|gfedcba`).
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mirrored = if index < 0 {
        -index
    } else if index > last {
        2 * last - index
    } else {
        index
    };
    mirrored as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, RgbImage};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn noise(width: u32, height: u32, seed: u64) -> GrayImage {
        let mut rng = StdRng::seed_from_u64(seed);
        GrayImage::from_fn(width, height, |_, _| {
            Luma([if rng.random_bool(0.5) { 255 } else { 0 }])
        })
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(0, 5), 0);
        assert_eq!(reflect_101(4, 5), 4);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(-1, 2), 1);
        assert_eq!(reflect_101(2, 2), 0);
        assert_eq!(reflect_101(-1, 1), 0);
        assert_eq!(reflect_101(1, 1), 0);
    }

    #[test]
    fn test_flat_image_has_zero_variance() {
        let flat = GrayImage::from_pixel(32, 24, Luma([200]));
        assert_eq!(laplacian_variance(&flat), 0.0);
    }

    #[test]
    fn test_single_pixel_has_zero_variance() {
        assert_eq!(laplacian_variance(&GrayImage::from_pixel(1, 1, Luma([90]))), 0.0);
    }

    #[test]
    fn test_single_bright_dot() {
        // 3x3 with a centre of 4. The border mirror reflects the centre back onto each
        // edge neighbour, so those respond with 8; the centre gives -16, corners 0.
        let mut dot = GrayImage::new(3, 3);
        dot.put_pixel(1, 1, Luma([4]));
        let responses = [0.0, 8.0, 0.0, 8.0, -16.0, 8.0, 0.0, 8.0, 0.0];
        let mean = responses.iter().sum::<f64>() / 9.0;
        let expected = responses.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / 9.0;
        assert!((laplacian_variance(&dot) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_step_edge() {
        // Columns 0..4 dark, 4..8 bright; only columns 3 and 4 respond
        let step = GrayImage::from_fn(8, 4, |x, _| Luma([if x < 4 { 0 } else { 100 }]));
        let variance = laplacian_variance(&step);
        // Responses +100 and -100 on 2 of 8 columns: mean 0, variance 2 * 100^2 / 8
        assert!((variance - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_noise_is_sharp() {
        let variance = laplacian_variance(&noise(64, 64, 7));
        assert!(variance > 10_000.0, "variance {variance}");
    }

    #[test]
    fn test_signal_thresholds() {
        let analyzer = SharpnessAnalyzer::default();

        let blurry = analyzer.signal_from_variance(99.9);
        assert!(blurry.flag);
        assert!((blurry.score - 49.95).abs() < 1e-9);

        let boundary = analyzer.signal_from_variance(100.0);
        assert!(!boundary.flag);
        assert_eq!(boundary.score, 50.0);

        let saturated = analyzer.signal_from_variance(5_000.0);
        assert!(!saturated.flag);
        assert_eq!(saturated.score, 100.0);
    }

    #[test]
    fn test_analyze_uniform_image() {
        let image = DecodedImage::from_rgb(RgbImage::from_pixel(20, 20, image::Rgb([200, 200, 200])));
        let signal = SharpnessAnalyzer::default().analyze(&image).unwrap();
        assert!(signal.flag);
        assert_eq!(signal.score, 0.0);
    }

    #[test]
    fn test_analyze_empty_grid_faults() {
        let image = DecodedImage::from_rgb(RgbImage::new(0, 0));
        assert!(SharpnessAnalyzer::default().analyze(&image).is_err());
    }
}
