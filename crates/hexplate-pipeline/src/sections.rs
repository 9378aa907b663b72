//! Section builder: derive the three planar regions from the aligned
//! profile curves.
//!
//! Each profile chain is mirrored across the vertical axis and closed
//! with a straight segment between the two lowest vertices, forming one
//! loop. A wrong vertex pairing makes that loop self-intersect, which the
//! region constructor rejects rather than producing a degenerate solid.

use tracing::debug;

use hexplate_kernel::{Region, Wire};

use crate::align::AlignedProfiles;
use crate::error::PipelineError;

/// The three derived regions, ready for the feature pipeline.
#[derive(Debug, Clone)]
pub struct Sections {
    /// The big profile closed across the vertical axis, then reflected
    /// into the lower half-plane.
    pub part1: Region,
    /// The small profile closed the same way, merged with part1.
    pub part2: Region,
    /// part1 merged with its own horizontal mirror; twice the area.
    pub part3: Region,
}

pub fn build_sections(aligned: &AlignedProfiles) -> Result<Sections, PipelineError> {
    let part1 = half_region(&aligned.big)?.mirrored_y();
    if part1.is_empty() {
        return Err(PipelineError::EmptyResult { stage: "part1 region" });
    }

    let part3 = part1.union(&part1.mirrored_y());
    if part3.is_empty() {
        return Err(PipelineError::EmptyResult { stage: "part3 region" });
    }

    let part2 = half_region(&aligned.small)?.union(&part1);
    if part2.is_empty() {
        return Err(PipelineError::EmptyResult { stage: "part2 region" });
    }

    debug!(
        part1_area = part1.area(),
        part2_area = part2.area(),
        part3_area = part3.area(),
        "built sections"
    );
    Ok(Sections {
        part1,
        part2,
        part3,
    })
}

/// Close one profile chain against its vertical mirror image.
///
/// The ring runs along the original chain from its lowest endpoint, back
/// down the mirrored chain, and closes with the implicit segment between
/// the mirrored and original lowest vertices.
fn half_region(profile: &Wire) -> Result<Region, PipelineError> {
    // Orient the chain so its lowest endpoint comes first; the closing
    // segment then connects the two lowest vertices.
    let start = profile.start();
    let end = profile.end();
    let chain = if (end.y, end.x) < (start.y, start.x) {
        profile.reversed()
    } else {
        profile.clone()
    };

    let mirrored = chain.mirrored_x();
    let mut ring = chain.points().to_vec();
    ring.extend(mirrored.points().iter().rev().copied());
    Ok(Region::from_ring(&ring)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;
    use approx::assert_relative_eq;
    use hexplate_types::ParameterSet;
    use nalgebra::Point2;

    fn aligned() -> AlignedProfiles {
        let small = Wire::open(vec![
            Point2::new(50.0, 0.0),
            Point2::new(40.0, 10.0),
            Point2::new(40.0, 55.0),
            Point2::new(0.0, 60.0),
        ])
        .unwrap();
        let big = Wire::open(vec![
            Point2::new(50.0, 0.0),
            Point2::new(50.0, 100.0),
            Point2::new(0.0, 100.0),
        ])
        .unwrap();
        align(&small, &big, &ParameterSet::default()).unwrap()
    }

    fn symmetric_difference_area(a: &Region, b: &Region) -> f64 {
        a.difference(b).area() + b.difference(a).area()
    }

    #[test]
    fn part1_lies_in_the_lower_half_plane() {
        let s = build_sections(&aligned()).unwrap();
        let bb = s.part1.bounding_rect().unwrap();
        assert_relative_eq!(bb.max().y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bb.min().y, -100.0, epsilon = 1e-9);
        assert_relative_eq!(s.part1.area(), 10_000.0, epsilon = 1e-6);
    }

    #[test]
    fn part1_is_symmetric_across_the_vertical_axis() {
        let s = build_sections(&aligned()).unwrap();
        let mirrored = s.part1.mirrored_x();
        assert!(symmetric_difference_area(&s.part1, &mirrored) < 1e-6);
    }

    #[test]
    fn part3_doubles_part1() {
        let s = build_sections(&aligned()).unwrap();
        assert_relative_eq!(s.part3.area(), 2.0 * s.part1.area(), epsilon = 1e-6);
        let mirrored = s.part3.mirrored_y();
        assert!(symmetric_difference_area(&s.part3, &mirrored) < 1e-6);
    }

    #[test]
    fn part2_contains_both_halves() {
        let s = build_sections(&aligned()).unwrap();
        assert!(s.part2.contains_region(&s.part1));
        assert!(s.part2.area() > s.part1.area());
        // The small profile's apex survives the union.
        assert!(s.part2.contains_point(Point2::new(0.0, 30.0)));
    }

    #[test]
    fn chain_orientation_does_not_matter() {
        let a = aligned();
        let flipped = AlignedProfiles {
            small: a.small.reversed(),
            big: a.big.reversed(),
            ..a.clone()
        };
        let s1 = build_sections(&a).unwrap();
        let s2 = build_sections(&flipped).unwrap();
        assert!(symmetric_difference_area(&s1.part2, &s2.part2) < 1e-6);
    }

    #[test]
    fn interior_lowest_vertex_fails_loop_construction() {
        // The lowest vertex is mid-chain, so the closing segment pairs the
        // wrong vertices and the loop self-intersects.
        let small = aligned().small;
        let dipped = Wire::open(vec![
            Point2::new(50.0, 30.0),
            Point2::new(45.0, -5.0),
            Point2::new(40.0, 55.0),
            Point2::new(0.0, 60.0),
        ])
        .unwrap();
        let bad = AlignedProfiles {
            small,
            big: dipped,
            rotation: 0.0,
            residual: 0.0,
        };
        assert!(build_sections(&bad).is_err());
    }
}
