//! Hexagon grid generation for the ventilation lattice.

use nalgebra::Point2;

use super::region::Region;
use crate::error::KernelError;

/// Centers of a `columns` x `rows` pointy-top hexagon packing with the
/// given cell apothem, centered on the origin.
///
/// Adjacent cells in a row sit `2 * apothem` apart, rows are spaced by
/// 1.5 circumradii, and every odd row is shifted half a cell so the
/// hexagons interlock.
pub fn grid_centers(apothem: f64, columns: usize, rows: usize) -> Vec<Point2<f64>> {
    if apothem <= 0.0 || columns == 0 || rows == 0 {
        return Vec::new();
    }
    let circumradius = 2.0 * apothem / 3.0_f64.sqrt();
    let dx = 2.0 * apothem;
    let dy = 1.5 * circumradius;

    let mut centers = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        let shift = if row % 2 == 1 { apothem } else { 0.0 };
        for col in 0..columns {
            centers.push(Point2::new(col as f64 * dx + shift, row as f64 * dy));
        }
    }

    // Recenter on the origin by the midpoint of the center extents.
    let (mut min, mut max) = (centers[0], centers[0]);
    for c in &centers {
        min = Point2::new(min.x.min(c.x), min.y.min(c.y));
        max = Point2::new(max.x.max(c.x), max.y.max(c.y));
    }
    let mid = nalgebra::center(&min, &max);
    for c in &mut centers {
        *c -= mid.coords;
    }
    centers
}

/// A pointy-top regular hexagon with the given apothem (inradius).
pub fn hexagon(center: Point2<f64>, apothem: f64) -> Result<Region, KernelError> {
    if apothem <= 0.0 {
        return Err(KernelError::DegenerateRing {
            reason: format!("hexagon apothem must be positive, got {apothem}"),
        });
    }
    let circumradius = 2.0 * apothem / 3.0_f64.sqrt();
    let pts: Vec<Point2<f64>> = (0..6)
        .map(|i| {
            let a = std::f64::consts::FRAC_PI_2 + std::f64::consts::FRAC_PI_3 * i as f64;
            Point2::new(
                center.x + circumradius * a.cos(),
                center.y + circumradius * a.sin(),
            )
        })
        .collect();
    Region::from_ring(&pts)
}
