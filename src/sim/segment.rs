//! Segment geometry on the collision axis
//!
//! A block occupies the closed interval `[position, position + size]`. Distances
//! are measured center-to-center minus the half-lengths, so a negative value
//! means the two shapes overlap.

use serde::{Deserialize, Serialize};

/// A 1D interval between two points on the axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Segment starting at `position` and extending `size` along the axis
    #[inline]
    pub fn from_extent(position: f64, size: f64) -> Self {
        Self::new(position, position + size)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).abs()
    }

    #[inline]
    pub fn center(&self) -> f64 {
        (self.end + self.start) / 2.0
    }

    /// Half the length
    #[inline]
    pub fn radius(&self) -> f64 {
        self.length() / 2.0
    }

    /// Signed gap to another segment (negative on overlap)
    pub fn distance_to(&self, other: &Segment) -> f64 {
        Segment::new(other.center(), self.center()).length() - (self.radius() + other.radius())
    }

    /// Signed gap to a point (negative if the point lies inside)
    pub fn distance_to_point(&self, point: f64) -> f64 {
        Segment::new(self.center(), point).length() - self.length() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_center() {
        let seg = Segment::from_extent(2.0, 1.5);
        assert_eq!(seg.length(), 1.5);
        assert_eq!(seg.center(), 2.75);

        // Reversed endpoints still give a positive length
        let reversed = Segment::new(3.0, 1.0);
        assert_eq!(reversed.length(), 2.0);
        assert_eq!(reversed.center(), 2.0);
    }

    #[test]
    fn test_distance_between_segments() {
        let a = Segment::from_extent(2.0, 1.0);
        let b = Segment::from_extent(6.0, 1.5);
        assert_eq!(a.distance_to(&b), 3.0);
        assert_eq!(b.distance_to(&a), 3.0);

        // Touching
        let c = Segment::from_extent(3.0, 2.0);
        assert_eq!(a.distance_to(&c), 0.0);

        // Overlapping gives a negative gap
        let d = Segment::from_extent(2.5, 1.0);
        assert_eq!(a.distance_to(&d), -0.5);
    }

    #[test]
    fn test_distance_to_point() {
        let seg = Segment::from_extent(2.0, 1.0);
        assert_eq!(seg.distance_to_point(0.0), 2.0);
        assert_eq!(seg.distance_to_point(5.0), 2.0);
        assert_eq!(seg.distance_to_point(2.5), -0.5);
    }

    #[test]
    fn test_degenerate_segments() {
        let p = Segment::from_extent(4.0, 0.0);
        let q = Segment::from_extent(1.0, 0.0);
        assert_eq!(p.length(), 0.0);
        assert_eq!(p.center(), 4.0);
        assert_eq!(p.distance_to(&q), 3.0);
        assert_eq!(p.distance_to_point(4.0), 0.0);
        assert_eq!(p.distance_to_point(-1.0), 5.0);
    }
}
