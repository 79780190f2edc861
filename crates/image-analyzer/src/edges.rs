//! Canny edge detection on unsmoothed Sobel gradients
//!
//! Gradients come straight from the 3x3 Sobel kernels over the grayscale image, with
//! replicated borders, and the magnitude is `|gx| + |gy|`. There is no Gaussian
//! pre-pass, so the hysteresis thresholds apply to that L1 magnitude directly and
//! one-pixel detail survives.

use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// Value written for edge pixels in the output map.
pub const EDGE: u8 = 255;

// Gradient direction is quantised with fixed-point tangents of 22.5 degrees.
const SHIFT: u32 = 15;
const TAN_22_5: i64 = 13573;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Weak,
    Strong,
}

/// Binary edge map: [`EDGE`] on edges, 0 elsewhere.
///
/// A pixel survives non-maximum suppression when its magnitude exceeds `low` and
/// beats its neighbours across the gradient direction. Survivors above `high` seed the
/// edges, which then grow through 8-connected survivors. Ties along a run of equal
/// magnitudes go to the first pixel of the run.
pub fn canny(image: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut edges = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return edges;
    }

    let gx = horizontal_sobel(image);
    let gy = vertical_sobel(image);
    let (gx, gy) = (gx.as_raw(), gy.as_raw());
    let magnitude: Vec<i32> = gx
        .iter()
        .zip(gy)
        .map(|(&dx, &dy)| i32::from(dx).abs() + i32::from(dy).abs())
        .collect();

    let (w, h) = (width as i64, height as i64);
    // Out-of-image neighbours count as zero magnitude.
    let at = |x: i64, y: i64| -> i32 {
        if x < 0 || y < 0 || x >= w || y >= h {
            0
        } else {
            magnitude[(y * w + x) as usize]
        }
    };

    let low = low.floor() as i32;
    let high = high.floor() as i32;
    let mut marks = vec![Mark::None; magnitude.len()];
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            let m = magnitude[idx];
            if m <= low {
                continue;
            }

            let dx = i64::from(gx[idx]);
            let dy = i64::from(gy[idx]);
            let ax = dx.abs();
            let ay = dy.abs() << SHIFT;
            let tan22 = ax * TAN_22_5;

            let local_max = if ay < tan22 {
                m > at(x - 1, y) && m >= at(x + 1, y)
            } else if ay > tan22 + (ax << (SHIFT + 1)) {
                m > at(x, y - 1) && m >= at(x, y + 1)
            } else {
                let s = if (dx ^ dy) < 0 { -1 } else { 1 };
                m > at(x - s, y - 1) && m > at(x + s, y + 1)
            };
            if !local_max {
                continue;
            }

            if m > high {
                marks[idx] = Mark::Strong;
                stack.push((x, y));
            } else {
                marks[idx] = Mark::Weak;
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        for ny in (y - 1)..=(y + 1) {
            for nx in (x - 1)..=(x + 1) {
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let idx = (ny * w + nx) as usize;
                if marks[idx] == Mark::Weak {
                    marks[idx] = Mark::Strong;
                    stack.push((nx, ny));
                }
            }
        }
    }

    let pixels: &mut [u8] = &mut edges;
    for (out, mark) in pixels.iter_mut().zip(&marks) {
        if *mark == Mark::Strong {
            *out = EDGE;
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn edge_count(edges: &GrayImage) -> usize {
        edges.as_raw().iter().filter(|&&v| v == EDGE).count()
    }

    fn columns(size: u32, level: impl Fn(u32) -> u8) -> GrayImage {
        GrayImage::from_fn(size, size, |x, _| Luma([level(x)]))
    }

    #[test]
    fn test_empty_image() {
        let edges = canny(&GrayImage::new(0, 0), 100.0, 200.0);
        assert_eq!(edges.dimensions(), (0, 0));
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let flat = GrayImage::from_pixel(16, 16, Luma([128]));
        assert_eq!(edge_count(&canny(&flat, 100.0, 200.0)), 0);
    }

    #[test]
    fn test_faint_step_stays_below_low_threshold() {
        // 0 -> 20 gives a Sobel magnitude of 4 * 20 = 80
        let faint = columns(32, |x| if x < 16 { 0 } else { 20 });
        assert_eq!(edge_count(&canny(&faint, 100.0, 200.0)), 0);
        assert_eq!(edge_count(&canny(&faint, 50.0, 70.0)), 32);
    }

    #[test]
    fn test_strong_step_is_one_pixel_wide() {
        let step = columns(32, |x| if x < 16 { 0 } else { 255 });
        let edges = canny(&step, 100.0, 200.0);
        assert_eq!(edge_count(&edges), 32);
        for y in 0..32 {
            assert_eq!(edges.get_pixel(15, y)[0], EDGE, "row {y}");
        }
    }

    #[test]
    fn test_thin_lines_keep_both_flanks() {
        // One-pixel white lines every 8 columns on black
        let lines = columns(64, |x| if x % 8 == 3 { 255 } else { 0 });
        let edges = canny(&lines, 100.0, 200.0);
        assert_eq!(edge_count(&edges), 16 * 64);
        assert_eq!(edges.get_pixel(2, 10)[0], EDGE);
        assert_eq!(edges.get_pixel(4, 10)[0], EDGE);
        assert_eq!(edges.get_pixel(3, 10)[0], 0);
    }

    #[test]
    fn test_magnitude_plateau_keeps_first_pixel() {
        // 2px stripes: every interior column has the same magnitude, so suppression
        // keeps only the leading column of the run
        let stripes = columns(64, |x| if (x / 2) % 2 == 0 { 0 } else { 255 });
        let edges = canny(&stripes, 100.0, 200.0);
        assert_eq!(edge_count(&edges), 64);
        assert_eq!(edges.get_pixel(1, 0)[0], EDGE);
    }

    #[test]
    fn test_weak_pixels_join_strong_neighbours() {
        // Step height grows down the image: magnitude 104 at the top, 226 at the bottom,
        // so only the lowest rows clear the high threshold
        let ramp = GrayImage::from_fn(32, 32, |x, y| {
            Luma([if x < 16 { 0 } else { 25 + y as u8 }])
        });
        let edges = canny(&ramp, 100.0, 200.0);
        assert_eq!(edge_count(&edges), 32);
        for y in 0..32 {
            assert_eq!(edges.get_pixel(16, y)[0], EDGE, "row {y}");
        }

        // Without a strong seed the whole run is dropped
        assert_eq!(edge_count(&canny(&ramp, 100.0, 250.0)), 0);
    }
}
