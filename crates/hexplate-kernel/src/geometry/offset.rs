//! Inward and outward offsets of planar regions.
//!
//! Ring offsetting is delegated to `cavalier_contours`, which handles
//! collapsing lobes and splitting rings. Its output may contain arc
//! segments (bulge vertices); those are flattened back to line segments
//! before re-entering the polygon world.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, Polyline};
use geo::LineString;
use nalgebra::Point2;

use super::region::Region;

/// Arc flattening resolution, radians per sample.
const ARC_STEP: f64 = std::f64::consts::PI / 16.0;

/// Offset the region inward by `distance`: exteriors contract, holes
/// expand. Thin necks collapse and the result may be empty or split into
/// several pieces. Non-positive distances leave the region untouched.
pub fn shrink(region: &Region, distance: f64) -> Region {
    if distance <= 0.0 {
        return region.clone();
    }
    offset_region(region, distance)
}

/// Offset the region outward by `distance`: exteriors expand, holes
/// contract (and may vanish). Non-positive distances leave the region
/// untouched.
pub fn grow(region: &Region, distance: f64) -> Region {
    if distance <= 0.0 {
        return region.clone();
    }
    offset_region(region, -distance)
}

/// Positive `distance` contracts material, negative expands it.
fn offset_region(region: &Region, distance: f64) -> Region {
    let mut acc = Region::empty();
    for polygon in &region.shape().0 {
        let mut kept = offset_rings(polygon.exterior(), distance);
        for hole in polygon.interiors() {
            // Holes are stored clockwise; offsetting their reversed ring by
            // the negated distance moves the cavity wall the opposite way.
            let cavity = offset_rings(&reversed(hole), -distance);
            kept = kept.difference(&cavity);
        }
        acc = acc.union(&kept);
    }
    acc
}

fn offset_rings(ring: &LineString<f64>, distance: f64) -> Region {
    let pl = ring_to_polyline(ring);
    if pl.vertex_count() < 3 {
        return Region::empty();
    }
    let mut out = Region::empty();
    for offset_pl in pl.parallel_offset(distance) {
        let pts = flatten_polyline(&offset_pl);
        // Slivers below the resolution of the ring validator are dropped.
        if let Ok(piece) = Region::from_ring(&pts) {
            out = out.union(&piece);
        }
    }
    out
}

fn reversed(ring: &LineString<f64>) -> LineString<f64> {
    let mut coords = ring.0.clone();
    coords.reverse();
    LineString::new(coords)
}

/// Convert a geo ring (closed, last coord repeats the first) into a closed
/// polyline with zero bulges.
fn ring_to_polyline(ring: &LineString<f64>) -> Polyline<f64> {
    let mut pl = Polyline::new_closed();
    let coords = &ring.0;
    let n = if coords.len() > 1 && coords[0] == coords[coords.len() - 1] {
        coords.len() - 1
    } else {
        coords.len()
    };
    for c in &coords[..n] {
        pl.add(c.x, c.y, 0.0);
    }
    pl
}

/// Sample a closed polyline into plain vertices, subdividing arc segments.
fn flatten_polyline(pl: &Polyline<f64>) -> Vec<Point2<f64>> {
    let n = pl.vertex_count();
    let mut pts = Vec::with_capacity(n * 2);
    for i in 0..n {
        let v1 = pl.at(i);
        let v2 = pl.at((i + 1) % n);
        pts.push(Point2::new(v1.x, v1.y));
        if v1.bulge.abs() > 1e-9 {
            sample_arc(
                Point2::new(v1.x, v1.y),
                Point2::new(v2.x, v2.y),
                v1.bulge,
                &mut pts,
            );
        }
    }
    pts
}

/// Push intermediate samples of the arc from `p1` to `p2` with the given
/// bulge (tan of a quarter of the included angle, positive for
/// counter-clockwise). Endpoints are not pushed.
fn sample_arc(p1: Point2<f64>, p2: Point2<f64>, bulge: f64, out: &mut Vec<Point2<f64>>) {
    let chord = p2 - p1;
    let d = chord.norm();
    if d < 1e-12 {
        return;
    }
    let theta = 4.0 * bulge.atan();
    let radius = d * (1.0 + bulge * bulge) / (4.0 * bulge.abs());
    // Center sits on the chord bisector, offset along the left normal.
    let h = d * (1.0 - bulge * bulge) / (4.0 * bulge);
    let mid = nalgebra::center(&p1, &p2);
    let left = nalgebra::Vector2::new(-chord.y, chord.x) / d;
    let center = mid + left * h;
    let a1 = (p1.y - center.y).atan2(p1.x - center.x);

    let steps = ((theta.abs() / ARC_STEP).ceil() as usize).max(1);
    for i in 1..steps {
        let a = a1 + theta * i as f64 / steps as f64;
        out.push(Point2::new(
            center.x + radius * a.cos(),
            center.y + radius * a.sin(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(half: f64) -> Region {
        Region::from_ring(&[
            Point2::new(-half, -half),
            Point2::new(half, -half),
            Point2::new(half, half),
            Point2::new(-half, half),
        ])
        .unwrap()
    }

    #[test]
    fn shrink_contracts_square() {
        let s = shrink(&square(5.0), 1.0);
        assert_relative_eq!(s.area(), 64.0, epsilon = 0.01);
        let bb = s.bounding_rect().unwrap();
        assert_relative_eq!(bb.min().x, -4.0, epsilon = 1e-6);
        assert_relative_eq!(bb.max().y, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn grow_expands_square_with_rounded_corners() {
        // Outward offset rounds corners: area = a^2 + perimeter*d + pi*d^2.
        let g = grow(&square(5.0), 1.0);
        let expected = 100.0 + 40.0 + std::f64::consts::PI;
        assert_relative_eq!(g.area(), expected, epsilon = 0.1);
    }

    #[test]
    fn shrink_past_half_width_is_empty() {
        let s = shrink(&square(5.0), 6.0);
        assert!(s.is_empty());
    }

    #[test]
    fn shrink_expands_holes() {
        let outer = square(10.0);
        let hole = square(2.0);
        let ring = outer.difference(&hole);
        let s = shrink(&ring, 1.0);
        // Outer wall moves in to 9 (corners stay sharp), hole wall moves
        // out to 3 with rounded corners, so the grown hole removes up to
        // pi less than the sharp 6x6 bound.
        let sharp = 18.0 * 18.0 - 6.0 * 6.0;
        assert!(s.area() > sharp - 0.1);
        assert!(s.area() < sharp + std::f64::consts::PI + 0.1);
        assert!(!s.contains_point(Point2::new(2.5, 0.0)));
        assert!(s.contains_point(Point2::new(5.0, 0.0)));
    }

    #[test]
    fn non_positive_distance_is_identity() {
        let s = square(3.0);
        assert_relative_eq!(shrink(&s, 0.0).area(), s.area());
        assert_relative_eq!(grow(&s, -1.0).area(), s.area());
    }

    #[test]
    fn arc_sampling_stays_on_circle() {
        // Semicircular bulge from (0,0) to (2,0), counter-clockwise.
        let mut pts = Vec::new();
        sample_arc(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0, &mut pts);
        assert!(!pts.is_empty());
        for p in &pts {
            let r = (p - Point2::new(1.0, 0.0)).norm();
            assert_relative_eq!(r, 1.0, epsilon = 1e-9);
        }
        // CCW from angle 180 sweeps below the chord.
        assert!(pts.iter().all(|p| p.y <= 1e-9));
    }
}
