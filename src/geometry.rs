//! Axis-aligned rectangles in image pixel space.
//!
//! Detector output and everything downstream of it (grouping, containment
//! suppression, annotation) works in integer pixel coordinates of the
//! detection input image.

/// Axis-aligned rectangle: top-left corner plus dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: i32,
    /// Top-left y coordinate
    pub y: i32,
    /// Width of the rectangle
    pub width: i32,
    /// Height of the rectangle
    pub height: i32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions.
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// X coordinate one past the right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Y coordinate one past the bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// A rectangle with non-positive width or height covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Area in pixels.
    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Intersection of two rectangles; the zero rectangle when they do not
    /// overlap.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        if x2 <= x1 || y2 <= y1 {
            return Rect::default();
        }
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// True when `other` lies entirely within `self`. Shared edges count as
    /// inside, so a rectangle contains an identical copy of itself.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.intersect(other) == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Rect::new(5, 5, 5, 5));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        let i = a.intersect(&b);
        assert!(i.is_empty());
        assert_eq!(i, Rect::default());
    }

    #[test]
    fn test_contains_nested() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(10, 10, 20, 20);
        assert!(outer.contains_rect(&inner));
        assert!(!inner.contains_rect(&outer));
    }

    #[test]
    fn test_contains_shared_edge() {
        let outer = Rect::new(0, 0, 100, 100);
        let edge = Rect::new(0, 0, 100, 50);
        assert!(outer.contains_rect(&edge));
    }

    #[test]
    fn test_contains_self() {
        let r = Rect::new(3, 4, 5, 6);
        assert!(r.contains_rect(&r));
    }

    #[test]
    fn test_area() {
        assert_eq!(Rect::new(0, 0, 10, 20).area(), 200);
        assert_eq!(Rect::default().area(), 0);
    }
}
