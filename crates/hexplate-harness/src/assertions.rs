//! Geometry assertions shared by the test suites.

use nalgebra::Point2;

use hexplate_kernel::Region;

/// Area covered by exactly one of the two regions.
pub fn symmetric_difference_area(a: &Region, b: &Region) -> f64 {
    a.difference(b).area() + b.difference(a).area()
}

/// Panics unless the two regions cover the same area within `epsilon`.
pub fn assert_regions_coincide(a: &Region, b: &Region, epsilon: f64) {
    let diff = symmetric_difference_area(a, b);
    assert!(
        diff < epsilon,
        "regions differ by {diff} in area (allowed {epsilon})"
    );
}

/// Panics unless the region is invariant under mirroring across x = 0.
pub fn assert_symmetric_about_vertical_axis(region: &Region, epsilon: f64) {
    assert_regions_coincide(region, &region.mirrored_x(), epsilon);
}

/// Panics unless the region is invariant under mirroring across y = 0.
pub fn assert_symmetric_about_horizontal_axis(region: &Region, epsilon: f64) {
    assert_regions_coincide(region, &region.mirrored_y(), epsilon);
}

/// Panics unless the two points are within `epsilon` of each other.
pub fn assert_points_close(a: Point2<f64>, b: Point2<f64>, epsilon: f64) {
    let d = (a - b).norm();
    assert!(d <= epsilon, "points {a} and {b} are {d} apart (allowed {epsilon})");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Region {
        Region::from_ring(&[
            Point2::new(-2.0, -1.0),
            Point2::new(2.0, -1.0),
            Point2::new(2.0, 1.0),
            Point2::new(-2.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn rectangle_is_symmetric_both_ways() {
        assert_symmetric_about_vertical_axis(&rect(), 1e-9);
        assert_symmetric_about_horizontal_axis(&rect(), 1e-9);
    }

    #[test]
    #[should_panic(expected = "regions differ")]
    fn shifted_rectangle_is_not_symmetric() {
        assert_symmetric_about_vertical_axis(&rect().translated(1.0, 0.0), 1e-9);
    }
}
