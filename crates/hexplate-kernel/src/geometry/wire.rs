use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::KernelError;

/// A planar polyline wire: an ordered chain of vertices in the drawing
/// plane, either open (a profile chain with two endpoints) or closed.
///
/// Curved input is flattened to segments at import time, so arc length is
/// the sum of segment lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    points: Vec<Point2<f64>>,
    closed: bool,
}

impl Wire {
    /// An open chain through the given points, in order.
    pub fn open(points: Vec<Point2<f64>>) -> Result<Self, KernelError> {
        Self::validate(&points, 2)?;
        Ok(Self {
            points,
            closed: false,
        })
    }

    /// A closed loop through the given points (the closing segment from the
    /// last point back to the first is implicit).
    pub fn closed(points: Vec<Point2<f64>>) -> Result<Self, KernelError> {
        Self::validate(&points, 3)?;
        Ok(Self {
            points,
            closed: true,
        })
    }

    fn validate(points: &[Point2<f64>], needed: usize) -> Result<(), KernelError> {
        if points.len() < needed {
            return Err(KernelError::TooFewPoints {
                needed,
                got: points.len(),
            });
        }
        if points
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(KernelError::NonFiniteCoordinate);
        }
        Ok(())
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn start(&self) -> Point2<f64> {
        self.points[0]
    }

    pub fn end(&self) -> Point2<f64> {
        *self.points.last().expect("wire is never empty")
    }

    /// Total arc length (including the implicit closing segment for loops).
    pub fn length(&self) -> f64 {
        let open_len: f64 = self
            .points
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum();
        if self.closed {
            open_len + (self.start() - self.end()).norm()
        } else {
            open_len
        }
    }

    /// Vertex with minimum Y; X breaks ties, so the result is deterministic
    /// for flat bottoms.
    pub fn lowest_vertex(&self) -> Point2<f64> {
        extreme(&self.points, |a, b| (a.y, a.x) < (b.y, b.x))
    }

    /// Vertex with maximum Y; ties go to the smaller X, the same ordering
    /// the region query uses.
    pub fn highest_vertex(&self) -> Point2<f64> {
        extreme(&self.points, |a, b| a.y > b.y || (a.y == b.y && a.x < b.x))
    }

    /// Vertex with minimum X; Y breaks ties.
    pub fn leftmost_vertex(&self) -> Point2<f64> {
        extreme(&self.points, |a, b| (a.x, a.y) < (b.x, b.y))
    }

    pub fn translated(&self, by: Vector2<f64>) -> Self {
        self.map(|p| p + by)
    }

    /// Rigid rotation about `center` by `angle` radians.
    pub fn rotated_about(&self, center: Point2<f64>, angle: f64) -> Self {
        let rot = Rotation2::new(angle);
        self.map(|p| center + rot * (p - center))
    }

    /// Mirror across the vertical axis (x = 0).
    pub fn mirrored_x(&self) -> Self {
        self.map(|p| Point2::new(-p.x, p.y))
    }

    /// Mirror across the horizontal axis (y = 0).
    pub fn mirrored_y(&self) -> Self {
        self.map(|p| Point2::new(p.x, -p.y))
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self {
            points,
            closed: self.closed,
        }
    }

    fn map(&self, f: impl Fn(Point2<f64>) -> Point2<f64>) -> Self {
        Self {
            points: self.points.iter().map(|p| f(*p)).collect(),
            closed: self.closed,
        }
    }
}

fn extreme(
    points: &[Point2<f64>],
    better: impl Fn(&Point2<f64>, &Point2<f64>) -> bool,
) -> Point2<f64> {
    let mut best = points[0];
    for p in &points[1..] {
        if better(p, &best) {
            best = *p;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn chain() -> Wire {
        Wire::open(vec![
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 20.0),
            Point2::new(0.0, 20.0),
        ])
        .unwrap()
    }

    #[test]
    fn open_length_sums_segments() {
        assert_relative_eq!(chain().length(), 30.0);
    }

    #[test]
    fn closed_length_includes_closing_segment() {
        let w = Wire::closed(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 3.0),
        ])
        .unwrap();
        assert_relative_eq!(w.length(), 12.0);
    }

    #[test]
    fn extreme_vertex_queries() {
        let w = chain();
        assert_eq!(w.lowest_vertex(), Point2::new(10.0, 0.0));
        assert_eq!(w.leftmost_vertex(), Point2::new(0.0, 20.0));
        assert_eq!(w.highest_vertex(), Point2::new(0.0, 20.0));
    }

    #[test]
    fn lowest_vertex_tie_breaks_on_x() {
        let w = Wire::open(vec![
            Point2::new(5.0, 0.0),
            Point2::new(-5.0, 0.0),
            Point2::new(0.0, 9.0),
        ])
        .unwrap();
        assert_eq!(w.lowest_vertex(), Point2::new(-5.0, 0.0));
    }

    #[test]
    fn highest_vertex_tie_breaks_toward_smaller_x() {
        let w = Wire::open(vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 9.0),
            Point2::new(-5.0, 9.0),
        ])
        .unwrap();
        assert_eq!(w.highest_vertex(), Point2::new(-5.0, 9.0));
    }

    #[test]
    fn rotation_preserves_length() {
        let w = chain();
        let r = w.rotated_about(Point2::new(10.0, 0.0), 0.7);
        assert_relative_eq!(r.length(), w.length(), epsilon = 1e-12);
        // The rotation center stays put.
        assert_relative_eq!(r.start().x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(r.start().y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn mirror_roundtrip_is_identity() {
        let w = chain();
        assert_eq!(w.mirrored_x().mirrored_x(), w);
        assert_eq!(w.mirrored_y().mirrored_y(), w);
    }

    #[test]
    fn too_few_points_rejected() {
        let err = Wire::open(vec![Point2::new(0.0, 0.0)]);
        assert!(matches!(err, Err(KernelError::TooFewPoints { .. })));
    }

    #[test]
    fn non_finite_rejected() {
        let err = Wire::open(vec![Point2::new(0.0, 0.0), Point2::new(f64::NAN, 1.0)]);
        assert!(matches!(err, Err(KernelError::NonFiniteCoordinate)));
    }
}
