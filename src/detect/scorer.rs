//! Opaque window scoring.

use image::GrayImage;

use crate::geometry::Rect;

/// Pre-trained classifier boundary.
///
/// Scores one detection window of a pyramid level; higher means more
/// subject-like. The engine compares scores against its hit threshold and
/// treats implementations as opaque. The window is guaranteed to lie within
/// the level's bounds.
pub trait WindowScorer: Send {
    fn score(&self, level: &GrayImage, window: Rect) -> f32;
}

impl<F> WindowScorer for F
where
    F: Fn(&GrayImage, Rect) -> f32 + Send,
{
    fn score(&self, level: &GrayImage, window: Rect) -> f32 {
        self(level, window)
    }
}

/// Stand-in scorer: mean window luminance normalized to `0..=1`.
///
/// A bright subject against a dark background scores high, which makes the
/// synthetic source's drifting block detectable without a trained model.
#[derive(Debug, Default)]
pub struct BrightnessScorer;

impl WindowScorer for BrightnessScorer {
    fn score(&self, level: &GrayImage, window: Rect) -> f32 {
        let mut sum = 0u64;
        for y in window.y..window.bottom() {
            for x in window.x..window.right() {
                sum += level.get_pixel(x as u32, y as u32).0[0] as u64;
            }
        }
        let area = window.area().max(1) as u64;
        sum as f32 / (area * 255) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_scorer_is_normalized() {
        let scorer = BrightnessScorer;
        let white = GrayImage::from_pixel(8, 8, image::Luma([255]));
        let black = GrayImage::from_pixel(8, 8, image::Luma([0]));
        let window = Rect::new(0, 0, 8, 8);

        assert!((scorer.score(&white, window) - 1.0).abs() < 1e-6);
        assert_eq!(scorer.score(&black, window), 0.0);
    }

    #[test]
    fn scores_only_the_window() {
        let scorer = BrightnessScorer;
        let mut level = GrayImage::from_pixel(8, 8, image::Luma([0]));
        level.put_pixel(0, 0, image::Luma([255]));

        // Window away from the lit pixel sees nothing.
        assert_eq!(scorer.score(&level, Rect::new(4, 4, 4, 4)), 0.0);
        assert!(scorer.score(&level, Rect::new(0, 0, 4, 4)) > 0.0);
    }
}
