//! Screen-space geometry (pixels, origin top-left)

use serde::{Deserialize, Serialize};

/// A 2D point or offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point with both coordinates set to `v`
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    #[inline]
    pub fn offset(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// Width and height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Uniform scale that makes `self` fit inside `target` (never negative)
    pub fn fit_scale(&self, target: Size) -> f64 {
        if self.is_empty() {
            return 1.0;
        }
        let target_height = if target.height > 0.0 { target.height } else { target.width };
        (target.width / self.width)
            .abs()
            .min((target_height / self.height).abs())
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Half-open containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Grow on every side by `margin`
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Per-side insets (nine-slice borders)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Insets {
    pub const fn uniform(v: f64) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(109.9, 59.9)));
        assert!(!r.contains(Point::new(110.0, 30.0)));
        assert!(!r.contains(Point::new(50.0, 60.0)));
    }

    #[test]
    fn test_inflate() {
        let r = Rect::new(0.0, 0.0, 900.0, 630.0).inflate(20.0);
        assert_eq!(r, Rect::new(-20.0, -20.0, 940.0, 670.0));
    }

    #[test]
    fn test_fit_scale_uses_smaller_axis() {
        let text = Size::new(200.0, 40.0);
        assert_relative_eq!(text.fit_scale(Size::new(75.0, 40.0)), 0.375);
        // zero target height falls back to width
        assert_relative_eq!(Size::new(10.0, 10.0).fit_scale(Size::new(5.0, 0.0)), 0.5);
    }
}
