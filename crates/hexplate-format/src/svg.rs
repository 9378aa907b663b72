//! SVG drawing import.
//!
//! Paths are parsed with `usvg`, which resolves transforms, `use`
//! references and units up front. Bezier segments are flattened to line
//! segments at a fixed subdivision, and the SVG y-down axis is flipped so
//! downstream geometry works y-up.

use nalgebra::Point2;
use tracing::{debug, warn};
use usvg::tiny_skia_path::PathSegment;

use hexplate_kernel::Wire;

use crate::error::FormatError;

/// Samples per bezier span when flattening curves.
const CURVE_SAMPLES: usize = 16;
/// Consecutive points closer than this collapse into one.
const MERGE_TOLERANCE: f64 = 1e-9;

/// Parse an SVG document and return one wire per path subpath, in
/// document order. Degenerate subpaths (a single point) are skipped.
pub fn import_wires(svg: &str) -> Result<Vec<Wire>, FormatError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options)?;
    let mut wires = Vec::new();
    collect_group(tree.root(), &mut wires)?;
    if wires.is_empty() {
        return Err(FormatError::NoCurves);
    }
    debug!(count = wires.len(), "imported wires from drawing");
    Ok(wires)
}

/// Read and parse an SVG file from disk.
pub fn import_wires_from_file(path: &std::path::Path) -> Result<Vec<Wire>, FormatError> {
    let text = std::fs::read_to_string(path)?;
    import_wires(&text)
}

fn collect_group(group: &usvg::Group, wires: &mut Vec<Wire>) -> Result<(), FormatError> {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_group(g, wires)?,
            usvg::Node::Path(p) => collect_path(p, wires)?,
            // Raster images and text runs carry no profile geometry.
            usvg::Node::Image(_) | usvg::Node::Text(_) => {}
        }
    }
    Ok(())
}

fn collect_path(path: &usvg::Path, wires: &mut Vec<Wire>) -> Result<(), FormatError> {
    let transform = path.abs_transform();
    let mut builder = SubpathBuilder::new(transform);
    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                builder.finish(false, wires)?;
                builder.push(p.x as f64, p.y as f64);
            }
            PathSegment::LineTo(p) => builder.push(p.x as f64, p.y as f64),
            PathSegment::QuadTo(c, p) => builder.quad_to(c, p),
            PathSegment::CubicTo(c1, c2, p) => builder.cubic_to(c1, c2, p),
            PathSegment::Close => builder.finish(true, wires)?,
        }
    }
    builder.finish(false, wires)
}

/// Accumulates one subpath in source (untransformed, y-down) coordinates;
/// the node transform and the y flip are applied when the subpath ends.
struct SubpathBuilder {
    transform: usvg::Transform,
    points: Vec<Point2<f64>>,
}

impl SubpathBuilder {
    fn new(transform: usvg::Transform) -> Self {
        Self {
            transform,
            points: Vec::new(),
        }
    }

    fn push(&mut self, x: f64, y: f64) {
        let p = Point2::new(x, y);
        if self
            .points
            .last()
            .is_none_or(|q| (p - q).norm() > MERGE_TOLERANCE)
        {
            self.points.push(p);
        }
    }

    fn quad_to(&mut self, c: usvg::tiny_skia_path::Point, p: usvg::tiny_skia_path::Point) {
        let Some(s) = self.points.last().copied() else {
            return;
        };
        for i in 1..=CURVE_SAMPLES {
            let t = i as f64 / CURVE_SAMPLES as f64;
            let u = 1.0 - t;
            self.push(
                u * u * s.x + 2.0 * u * t * c.x as f64 + t * t * p.x as f64,
                u * u * s.y + 2.0 * u * t * c.y as f64 + t * t * p.y as f64,
            );
        }
    }

    fn cubic_to(
        &mut self,
        c1: usvg::tiny_skia_path::Point,
        c2: usvg::tiny_skia_path::Point,
        p: usvg::tiny_skia_path::Point,
    ) {
        let Some(s) = self.points.last().copied() else {
            return;
        };
        for i in 1..=CURVE_SAMPLES {
            let t = i as f64 / CURVE_SAMPLES as f64;
            let u = 1.0 - t;
            self.push(
                u * u * u * s.x
                    + 3.0 * u * u * t * c1.x as f64
                    + 3.0 * u * t * t * c2.x as f64
                    + t * t * t * p.x as f64,
                u * u * u * s.y
                    + 3.0 * u * u * t * c1.y as f64
                    + 3.0 * u * t * t * c2.y as f64
                    + t * t * t * p.y as f64,
            );
        }
    }

    fn finish(&mut self, closed: bool, wires: &mut Vec<Wire>) -> Result<(), FormatError> {
        let raw = std::mem::take(&mut self.points);
        if raw.len() < 2 {
            if !raw.is_empty() {
                warn!("skipping single-point subpath");
            }
            return Ok(());
        }

        let t = self.transform;
        let (sx, kx, ky, sy, tx, ty) = (
            t.sx as f64,
            t.kx as f64,
            t.ky as f64,
            t.sy as f64,
            t.tx as f64,
            t.ty as f64,
        );
        let mut points: Vec<Point2<f64>> = raw
            .iter()
            .map(|p| Point2::new(sx * p.x + kx * p.y + tx, -(ky * p.x + sy * p.y + ty)))
            .collect();

        // An open subpath that returns to its start is a loop in disguise.
        let mut closed = closed;
        if !closed && points.len() > 3 {
            let gap = (points[0] - points[points.len() - 1]).norm();
            if gap <= MERGE_TOLERANCE {
                points.pop();
                closed = true;
            }
        }
        let wire = if closed {
            Wire::closed(points)?
        } else {
            Wire::open(points)?
        };
        wires.push(wire);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TWO_POLYLINES: &str = r##"
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
            <path d="M 10 0 L 10 20 L 0 20" fill="none" stroke="black"/>
            <path d="M 10 0 L 8 2 L 8 12 L 0 12" fill="none" stroke="black"/>
        </svg>
    "##;

    #[test]
    fn imports_open_polylines_in_document_order() {
        let wires = import_wires(TWO_POLYLINES).unwrap();
        assert_eq!(wires.len(), 2);
        assert!(!wires[0].is_closed());
        assert_eq!(wires[0].points().len(), 3);
        assert_eq!(wires[1].points().len(), 4);
    }

    #[test]
    fn y_axis_is_flipped() {
        let wires = import_wires(TWO_POLYLINES).unwrap();
        // "L 10 20" in SVG (y down) lands at y = -20 in model space.
        let p = wires[0].points()[1];
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, -20.0, epsilon = 1e-6);
    }

    #[test]
    fn translate_transform_is_applied() {
        let svg = r##"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <g transform="translate(5 7)">
                    <path d="M 0 0 L 10 0" fill="none" stroke="black"/>
                </g>
            </svg>
        "##;
        let wires = import_wires(svg).unwrap();
        let p = wires[0].points()[0];
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, -7.0, epsilon = 1e-6);
    }

    #[test]
    fn closed_subpath_becomes_closed_wire() {
        let svg = r##"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <path d="M 0 0 L 10 0 L 10 10 Z" fill="none" stroke="black"/>
            </svg>
        "##;
        let wires = import_wires(svg).unwrap();
        assert_eq!(wires.len(), 1);
        assert!(wires[0].is_closed());
    }

    #[test]
    fn curves_are_flattened() {
        let svg = r##"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <path d="M 0 0 C 0 10 10 10 10 0" fill="none" stroke="black"/>
            </svg>
        "##;
        let wires = import_wires(svg).unwrap();
        assert!(wires[0].points().len() > 10);
    }

    #[test]
    fn empty_drawing_is_an_error() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"></svg>"##;
        assert!(matches!(import_wires(svg), Err(FormatError::NoCurves)));
    }
}
