//! Axis-aligned bounding boxes in content coordinates

use glam::Vec2;

/// Axis-aligned box; starts empty and grows as points are included
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    pub const fn empty() -> Self {
        Self {
            min: Vec2::new(f32::MAX, f32::MAX),
            max: Vec2::new(f32::MIN, f32::MIN),
        }
    }

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include(p);
        }
        bounds
    }

    pub fn include(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Include a box centred on `center` with the given half extents
    pub fn include_box(&mut self, center: Vec2, half_extent: Vec2) {
        self.include(center - half_extent);
        self.include(center + half_extent);
    }

    pub fn union(mut self, other: Bounds) -> Self {
        if !other.is_empty() {
            self.include(other.min);
            self.include(other.max);
        }
        self
    }

    /// True until at least one point has been included
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Zero width or height; nothing sensible to frame
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn width(&self) -> f32 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_until_included() {
        let mut bounds = Bounds::empty();
        assert!(bounds.is_empty());
        bounds.include(Vec2::new(1.0, 2.0));
        assert!(!bounds.is_empty());
        assert!(bounds.is_degenerate());
        bounds.include(Vec2::new(-1.0, 5.0));
        assert_eq!(bounds.width(), 2.0);
        assert_eq!(bounds.height(), 3.0);
        assert_eq!(bounds.center(), Vec2::new(0.0, 3.5));
    }

    #[test]
    fn test_include_box_and_union() {
        let mut a = Bounds::empty();
        a.include_box(Vec2::ZERO, Vec2::new(2.0, 1.0));
        let b = Bounds::from_points([Vec2::new(5.0, 5.0), Vec2::new(6.0, 6.0)]);
        let u = a.union(b);
        assert_eq!(u.min, Vec2::new(-2.0, -1.0));
        assert_eq!(u.max, Vec2::new(6.0, 6.0));
        assert_eq!(a.union(Bounds::empty()), a);
    }
}
