use geo::{
    coord, Area, BooleanOps, BoundingRect, Contains, Coord, LineString, MapCoords, MultiPolygon,
    Polygon, Rect,
};
use nalgebra::Point2;

use crate::error::KernelError;

/// A bounded, hole-aware planar area enclosed by one or more closed loops.
///
/// Backed by a `geo::MultiPolygon` with exteriors wound counter-clockwise
/// and holes clockwise. Boolean operations return possibly-empty regions;
/// callers decide whether an empty result is fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    shape: MultiPolygon<f64>,
}

impl Region {
    pub fn empty() -> Self {
        Self {
            shape: MultiPolygon::new(Vec::new()),
        }
    }

    /// Build a region from a single closed ring of vertices (implicitly
    /// closed from the last vertex back to the first).
    ///
    /// Fails if the ring has fewer than 3 distinct vertices, encloses no
    /// area, or intersects itself. Self-intersecting boundaries cannot be
    /// extruded into a manifold solid.
    pub fn from_ring(ring: &[Point2<f64>]) -> Result<Self, KernelError> {
        if ring.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(KernelError::NonFiniteCoordinate);
        }
        let pts = dedup_ring(ring);
        if pts.len() < 3 {
            return Err(KernelError::TooFewVertices { count: pts.len() });
        }
        if let Some(p) = first_self_intersection(&pts) {
            return Err(KernelError::SelfIntersectingRing { x: p.x, y: p.y });
        }
        if ring_signed_area(&pts).abs() < 1e-12 {
            return Err(KernelError::DegenerateRing {
                reason: "ring encloses no area".to_string(),
            });
        }

        let mut coords: Vec<Coord<f64>> =
            pts.iter().map(|p| coord! { x: p.x, y: p.y }).collect();
        if ring_signed_area(&pts) < 0.0 {
            coords.reverse();
        }
        coords.push(coords[0]);
        let polygon = Polygon::new(LineString::new(coords), Vec::new());
        Ok(Self {
            shape: MultiPolygon::new(vec![polygon]),
        })
    }

    pub fn from_multi_polygon(shape: MultiPolygon<f64>) -> Self {
        Self {
            shape: orient(shape),
        }
    }

    /// Regular polygon approximation of a circle.
    pub fn circle(center: Point2<f64>, radius: f64, segments: usize) -> Result<Self, KernelError> {
        if radius <= 0.0 {
            return Err(KernelError::DegenerateRing {
                reason: format!("circle radius must be positive, got {radius}"),
            });
        }
        let n = segments.max(8);
        let pts: Vec<Point2<f64>> = (0..n)
            .map(|i| {
                let a = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
            })
            .collect();
        Self::from_ring(&pts)
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    pub fn is_empty(&self) -> bool {
        self.shape.0.is_empty() || self.area() < 1e-12
    }

    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    pub fn union(&self, other: &Region) -> Region {
        Self::from_multi_polygon(self.shape.union(&other.shape))
    }

    pub fn difference(&self, other: &Region) -> Region {
        Self::from_multi_polygon(self.shape.difference(&other.shape))
    }

    pub fn intersection(&self, other: &Region) -> Region {
        Self::from_multi_polygon(self.shape.intersection(&other.shape))
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.shape.bounding_rect()
    }

    pub fn contains_point(&self, p: Point2<f64>) -> bool {
        self.shape.contains(&geo::Point::new(p.x, p.y))
    }

    /// True when `other` lies entirely inside this region (no part of it
    /// sticks out). Verified by areas, which is robust against the exact
    /// predicate set exposed by the backing library.
    pub fn contains_region(&self, other: &Region) -> bool {
        if other.is_empty() {
            return false;
        }
        other.difference(self).area() < 1e-9 * other.area().max(1.0)
    }

    /// True when `other` overlaps the boundary: partially inside, partially
    /// outside.
    pub fn straddles_boundary(&self, other: &Region) -> bool {
        let inside = other.intersection(self).area();
        let total = other.area();
        let eps = 1e-9 * total.max(1.0);
        inside > eps && inside < total - eps
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Region {
        Self::from_multi_polygon(
            self.shape.map_coords(|c| coord! { x: c.x + dx, y: c.y + dy }),
        )
    }

    /// Mirror across the vertical axis (x = 0).
    pub fn mirrored_x(&self) -> Region {
        Self::from_multi_polygon(self.shape.map_coords(|c| coord! { x: -c.x, y: c.y }))
    }

    /// Mirror across the horizontal axis (y = 0).
    pub fn mirrored_y(&self) -> Region {
        Self::from_multi_polygon(self.shape.map_coords(|c| coord! { x: c.x, y: -c.y }))
    }

    pub fn rotated_about(&self, center: Point2<f64>, angle: f64) -> Region {
        let (s, c) = angle.sin_cos();
        Self::from_multi_polygon(self.shape.map_coords(|p| {
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            coord! {
                x: center.x + c * dx - s * dy,
                y: center.y + s * dx + c * dy,
            }
        }))
    }

    /// Boundary vertex with minimum Y (ties broken by X).
    pub fn lowest_vertex(&self) -> Option<Point2<f64>> {
        self.boundary_vertices()
            .min_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
    }

    /// Boundary vertex with maximum Y (ties broken by X, smaller first).
    pub fn highest_vertex(&self) -> Option<Point2<f64>> {
        self.boundary_vertices()
            .max_by(|a, b| a.y.total_cmp(&b.y).then(b.x.total_cmp(&a.x)))
    }

    /// X coordinates where the boundary crosses the horizontal line at `y`,
    /// sorted ascending. Deterministic probe used to locate wall positions.
    pub fn horizontal_crossings(&self, y: f64) -> Vec<f64> {
        let mut xs = Vec::new();
        for poly in &self.shape.0 {
            ring_crossings(poly.exterior(), y, &mut xs);
            for hole in poly.interiors() {
                ring_crossings(hole, y, &mut xs);
            }
        }
        xs.sort_by(f64::total_cmp);
        xs
    }

    fn boundary_vertices(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.shape.0.iter().flat_map(|poly| {
            poly.exterior()
                .coords()
                .chain(poly.interiors().iter().flat_map(|h| h.coords()))
                .map(|c| Point2::new(c.x, c.y))
        })
    }
}

/// Re-wind every polygon: exterior counter-clockwise, holes clockwise.
fn orient(shape: MultiPolygon<f64>) -> MultiPolygon<f64> {
    let polys = shape
        .0
        .into_iter()
        .map(|poly| {
            let (ext, holes) = poly.into_inner();
            let ext = wind(ext, true);
            let holes = holes.into_iter().map(|h| wind(h, false)).collect();
            Polygon::new(ext, holes)
        })
        .collect();
    MultiPolygon::new(polys)
}

fn wind(mut ring: LineString<f64>, ccw: bool) -> LineString<f64> {
    let area: f64 = ring
        .0
        .windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum::<f64>()
        / 2.0;
    if (ccw && area < 0.0) || (!ccw && area > 0.0) {
        ring.0.reverse();
    }
    ring
}

fn ring_crossings(ring: &LineString<f64>, y: f64, xs: &mut Vec<f64>) {
    for seg in ring.0.windows(2) {
        let (a, b) = (seg[0], seg[1]);
        if (a.y - y) * (b.y - y) < 0.0 {
            let t = (y - a.y) / (b.y - a.y);
            xs.push(a.x + t * (b.x - a.x));
        } else if a.y == y && b.y != y {
            xs.push(a.x);
        }
    }
}

/// Drop consecutive duplicates (and a duplicated closing vertex).
fn dedup_ring(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut out: Vec<Point2<f64>> = Vec::with_capacity(ring.len());
    for p in ring {
        if out
            .last()
            .is_none_or(|q| (p - q).norm() > 1e-12)
        {
            out.push(*p);
        }
    }
    if out.len() > 1 && (out[0] - out[out.len() - 1]).norm() <= 1e-12 {
        out.pop();
    }
    out
}

fn ring_signed_area(pts: &[Point2<f64>]) -> f64 {
    let n = pts.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += pts[i].x * pts[j].y - pts[j].x * pts[i].y;
    }
    area / 2.0
}

/// Returns an intersection point if any two non-adjacent ring segments
/// cross or touch.
fn first_self_intersection(pts: &[Point2<f64>]) -> Option<Point2<f64>> {
    let n = pts.len();
    for i in 0..n {
        for j in (i + 1)..n {
            // Skip the segment itself and its two neighbours (they share a
            // vertex by construction, including the wrap-around pair).
            if j == i || j == (i + 1) % n || (j + 1) % n == i {
                continue;
            }
            let (a1, a2) = (pts[i], pts[(i + 1) % n]);
            let (b1, b2) = (pts[j], pts[(j + 1) % n]);
            if let Some(p) = segment_intersection(a1, a2, b1, b2) {
                return Some(p);
            }
        }
    }
    None
}

fn segment_intersection(
    a1: Point2<f64>,
    a2: Point2<f64>,
    b1: Point2<f64>,
    b2: Point2<f64>,
) -> Option<Point2<f64>> {
    let d1 = a2 - a1;
    let d2 = b2 - b1;
    let denom = d1.x * d2.y - d1.y * d2.x;
    let delta = b1 - a1;
    if denom.abs() < 1e-15 {
        // Parallel: overlapping collinear segments count as intersecting.
        let cross = delta.x * d1.y - delta.y * d1.x;
        if cross.abs() > 1e-12 {
            return None;
        }
        let len2 = d1.norm_squared();
        if len2 < 1e-24 {
            return None;
        }
        let t0 = delta.dot(&d1) / len2;
        let t1 = (b2 - a1).dot(&d1) / len2;
        let (lo, hi) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
        if hi < 1e-12 || lo > 1.0 - 1e-12 {
            return None;
        }
        return Some(a1 + d1 * lo.max(0.0));
    }
    let t = (delta.x * d2.y - delta.y * d2.x) / denom;
    let u = (delta.x * d1.y - delta.y * d1.x) / denom;
    let eps = 1e-12;
    if t > eps && t < 1.0 - eps && u > eps && u < 1.0 - eps {
        return Some(a1 + d1 * t);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Region {
        Region::from_ring(&[
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
        .unwrap()
    }

    #[test]
    fn rectangle_area_and_bbox() {
        let r = rect(-2.0, 0.0, 3.0, 4.0);
        assert_relative_eq!(r.area(), 20.0, epsilon = 1e-9);
        let bb = r.bounding_rect().unwrap();
        assert_relative_eq!(bb.min().x, -2.0);
        assert_relative_eq!(bb.max().y, 4.0);
    }

    #[test]
    fn clockwise_ring_is_reoriented() {
        let r = Region::from_ring(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(r.area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn self_intersecting_ring_rejected() {
        // Bowtie.
        let err = Region::from_ring(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ]);
        assert!(matches!(err, Err(KernelError::SelfIntersectingRing { .. })));
    }

    #[test]
    fn zero_area_ring_rejected() {
        let err = Region::from_ring(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        assert!(matches!(err, Err(KernelError::DegenerateRing { .. })));
    }

    #[test]
    fn union_of_touching_halves_doubles_area() {
        let lower = rect(-1.0, -2.0, 1.0, 0.0);
        let upper = lower.mirrored_y();
        let both = lower.union(&upper);
        assert_relative_eq!(both.area(), 2.0 * lower.area(), epsilon = 1e-9);
    }

    #[test]
    fn difference_can_be_empty() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(-1.0, -1.0, 2.0, 2.0);
        assert!(a.difference(&b).is_empty());
    }

    #[test]
    fn containment_and_straddling() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        let inner = rect(2.0, 2.0, 4.0, 4.0);
        let across = rect(8.0, 8.0, 12.0, 9.0);
        let outside = rect(20.0, 20.0, 21.0, 21.0);
        assert!(outer.contains_region(&inner));
        assert!(!outer.contains_region(&across));
        assert!(outer.straddles_boundary(&across));
        assert!(!outer.straddles_boundary(&outside));
        assert!(!outer.contains_region(&outside));
    }

    #[test]
    fn horizontal_crossings_sorted() {
        let r = rect(-3.0, 0.0, 5.0, 4.0);
        let xs = r.horizontal_crossings(2.0);
        assert_eq!(xs.len(), 2);
        assert_relative_eq!(xs[0], -3.0);
        assert_relative_eq!(xs[1], 5.0);
    }

    #[test]
    fn vertex_queries_tie_break() {
        let r = rect(-1.0, 0.0, 1.0, 2.0);
        assert_eq!(r.lowest_vertex().unwrap(), Point2::new(-1.0, 0.0));
        assert_eq!(r.highest_vertex().unwrap(), Point2::new(-1.0, 2.0));
    }

    #[test]
    fn circle_area_close_to_pi_r_squared() {
        let c = Region::circle(Point2::new(1.0, 1.0), 2.0, 64).unwrap();
        assert_relative_eq!(c.area(), std::f64::consts::PI * 4.0, epsilon = 0.05);
    }
}
