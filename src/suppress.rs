//! Candidate de-duplication and box tightening.
//!
//! Two ordered transforms over the raw candidate set:
//! 1. Containment filter — a candidate survives only if no *other* candidate
//!    fully contains it. Identical duplicates contain each other, so both
//!    are dropped.
//! 2. Shrink transform — fixed fractional inset/resize. The raw detector
//!    window is calibrated larger than the subject silhouette; shrinking
//!    tightens the displayed box without retraining the classifier.
//!
//! Survivors keep their order from the containment pass; no sorting by
//! position or confidence is implied.

use crate::detect::Candidate;
use crate::geometry::Rect;

const LEFT_INSET_FRAC: f64 = 0.1;
const WIDTH_FRAC: f64 = 0.8;
const TOP_INSET_FRAC: f64 = 0.06;
const HEIGHT_FRAC: f64 = 0.9;

/// A candidate that survived the containment filter, shrink applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuppressedBox {
    pub rect: Rect,
    pub confidence: f32,
}

/// Drop every candidate fully contained in some other candidate.
///
/// All pairs are compared; with the handful of rectangles the engine's
/// grouping leaves per frame, the quadratic cost is irrelevant.
pub fn containment_filter(candidates: &[Candidate]) -> Vec<Candidate> {
    candidates
        .iter()
        .enumerate()
        .filter(|(i, candidate)| {
            !candidates
                .iter()
                .enumerate()
                .any(|(j, other)| j != *i && other.rect.contains_rect(&candidate.rect))
        })
        .map(|(_, candidate)| *candidate)
        .collect()
}

/// Fixed-fraction inset and resize, round-to-nearest on pixel coordinates.
///
/// All four fractions read the *original* width/height. Applied exactly once
/// per surviving box; repeating it compounds the shrink.
pub fn shrink(rect: Rect) -> Rect {
    Rect::new(
        rect.x + (rect.width as f64 * LEFT_INSET_FRAC).round() as i32,
        rect.y + (rect.height as f64 * TOP_INSET_FRAC).round() as i32,
        (rect.width as f64 * WIDTH_FRAC).round() as i32,
        (rect.height as f64 * HEIGHT_FRAC).round() as i32,
    )
}

/// Containment filter followed by the shrink transform.
pub fn suppress(candidates: &[Candidate]) -> Vec<SuppressedBox> {
    containment_filter(candidates)
        .into_iter()
        .map(|candidate| SuppressedBox {
            rect: shrink(candidate.rect),
            confidence: candidate.confidence,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(x: i32, y: i32, w: i32, h: i32) -> Candidate {
        Candidate {
            rect: Rect::new(x, y, w, h),
            confidence: 1.0,
        }
    }

    #[test]
    fn nested_candidate_is_dropped() {
        let input = [candidate(0, 0, 100, 100), candidate(10, 10, 20, 20)];
        let kept = containment_filter(&input);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].rect, Rect::new(0, 0, 100, 100));
    }

    #[test]
    fn no_survivor_is_contained_in_any_input() {
        let input = [
            candidate(0, 0, 50, 50),
            candidate(5, 5, 10, 10),
            candidate(40, 40, 30, 30),
            candidate(45, 45, 10, 10),
        ];
        let kept = containment_filter(&input);
        for survivor in &kept {
            for (j, other) in input.iter().enumerate() {
                if input[j].rect == survivor.rect {
                    continue;
                }
                assert!(
                    !other.rect.contains_rect(&survivor.rect),
                    "{:?} contained in {:?}",
                    survivor.rect,
                    other.rect
                );
            }
        }
    }

    #[test]
    fn identical_duplicates_eliminate_each_other() {
        let input = [candidate(10, 10, 20, 20), candidate(10, 10, 20, 20)];
        assert!(containment_filter(&input).is_empty());
    }

    #[test]
    fn partial_overlap_keeps_both() {
        let input = [candidate(0, 0, 10, 10), candidate(5, 5, 10, 10)];
        assert_eq!(containment_filter(&input).len(), 2);
    }

    #[test]
    fn shrink_exact_values() {
        let out = shrink(Rect::new(100, 100, 200, 100));
        assert_eq!(out, Rect::new(120, 106, 160, 90));
    }

    #[test]
    fn shrink_is_not_idempotent() {
        let r = Rect::new(100, 100, 200, 100);
        assert_ne!(shrink(shrink(r)), shrink(r));
    }

    #[test]
    fn empty_input_passes_through() {
        assert!(suppress(&[]).is_empty());
    }

    #[test]
    fn survival_order_is_preserved() {
        let input = [
            candidate(100, 0, 10, 10),
            candidate(0, 0, 10, 10),
            candidate(50, 0, 10, 10),
        ];
        let boxes = suppress(&input);
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[0].rect.x, 101);
        assert_eq!(boxes[1].rect.x, 1);
        assert_eq!(boxes[2].rect.x, 51);
    }
}
