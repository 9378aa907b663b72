//! Feature pipeline: turn each section region into a finished solid with
//! mounting holes, an embossed index label, and a hex-lattice material
//! relief.
//!
//! Hole centers are computed once from reference vertices shared by all
//! three parts; each part then drills only the holes whose full footprint
//! lies inside it. A hole that straddles a part boundary indicates a
//! malformed drawing and aborts the run.

use nalgebra::{Point2, Vector2};
use tracing::{debug, info};

use hexplate_format::CIRCLE_SEGMENTS;
use hexplate_kernel::geometry::{hex, offset, text};
use hexplate_kernel::{Region, RimChamfer, Solid};
use hexplate_types::{ParameterSet, PartIndex};

use crate::error::PipelineError;
use crate::sections::Sections;

/// Reference vertices the hole positions derive from.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePoints {
    /// Lowest vertex of part1 (a bottom corner).
    pub ref1: Point2<f64>,
    /// Highest vertex of part2 (the small profile's apex).
    pub ref2: Point2<f64>,
    /// Leftmost crossing of part3's boundary with the horizontal line
    /// through ref2 (a side wall at apex height).
    pub ref3: Point2<f64>,
}

pub fn reference_points(sections: &Sections) -> Result<ReferencePoints, PipelineError> {
    let ref1 = sections
        .part1
        .lowest_vertex()
        .ok_or(PipelineError::EmptyResult { stage: "part1 region" })?;
    let ref2 = sections
        .part2
        .highest_vertex()
        .ok_or(PipelineError::EmptyResult { stage: "part2 region" })?;
    let crossings = sections.part3.horizontal_crossings(ref2.y);
    let x = *crossings
        .first()
        .ok_or(PipelineError::ProbeMissed { y: ref2.y })?;
    let ref3 = Point2::new(x, ref2.y);
    debug!(?ref1, ?ref2, ?ref3, "computed reference points");
    Ok(ReferencePoints { ref1, ref2, ref3 })
}

/// The four mounting hole centers: one pair on the vertical axis inset
/// from the top and bottom corners, one pair inset from the side walls at
/// apex height.
pub fn hole_centers(refs: &ReferencePoints, params: &ParameterSet) -> [Point2<f64>; 4] {
    let inset = params.hole_corner_to_center;
    [
        Point2::new(0.0, refs.ref1.y + inset),
        Point2::new(0.0, -refs.ref1.y - inset),
        Point2::new(refs.ref3.x + inset, refs.ref2.y),
        Point2::new(-refs.ref3.x - inset, refs.ref2.y),
    ]
}

/// Annular region where lattice apertures may be cut: inside the outer
/// wall margin, outside the grown hole-and-label margin.
pub fn face_filter(footprint: &Region, cut: &Region, params: &ParameterSet) -> Region {
    let outer = offset::shrink(footprint, params.decor_offset);
    let inner = offset::grow(cut, params.decor_offset);
    outer.difference(&inner)
}

/// Hexagonal apertures whose full outline fits inside the filter region.
/// Apertures that would breach a wall or hole rim are discarded whole.
pub fn surviving_apertures(
    filter: &Region,
    params: &ParameterSet,
) -> Result<Vec<Region>, PipelineError> {
    let centers = hex::grid_centers(params.hex_pitch(), params.hex_columns, params.hex_rows);
    let mut kept = Vec::new();
    for center in centers {
        let aperture = hex::hexagon(center, params.decor_hole / 2.0)?;
        if filter.contains_region(&aperture) {
            kept.push(aperture);
        }
    }
    Ok(kept)
}

/// Build one finished solid from its section region.
pub fn build_part(
    region: &Region,
    index: PartIndex,
    holes: &[Point2<f64>; 4],
    params: &ParameterSet,
) -> Result<Solid, PipelineError> {
    let mut solid = Solid::extrude(region.clone(), params.height)?;
    let radius = params.hole_diameter / 2.0;
    let chamfer_length = params.height / 4.0;
    let chamfer_widening = params.height / 2.0 - params.eps;

    // Mounting holes: drill the ones that fit, all in one subtraction.
    let mut drilled: Vec<Point2<f64>> = Vec::new();
    let mut cutter = Region::empty();
    for &center in holes {
        let disc = Region::circle(center, radius, CIRCLE_SEGMENTS)?;
        if region.contains_region(&disc) {
            cutter = cutter.union(&disc);
            drilled.push(center);
        } else if region.straddles_boundary(&disc) {
            return Err(PipelineError::HoleStraddlesBoundary {
                x: center.x,
                y: center.y,
            });
        }
    }
    if drilled.is_empty() {
        return Err(PipelineError::EmptyResult { stage: "mounting holes" });
    }
    solid = solid.subtract_through(&cutter)?;
    for &center in &drilled {
        solid.add_rim_chamfer(RimChamfer {
            center,
            radius,
            length: chamfer_length,
            length2: chamfer_widening,
        })?;
    }

    // Index label, engraved upside down relative to the part.
    let label = engraving(index, region, params)?;
    solid.add_recess(&label, params.decor)?;

    // Hex lattice, confined to the annulus between the outer wall margin
    // and the grown hole-rim/label margin.
    let mut cut = label.intersection(region);
    for &center in &drilled {
        let widened = Region::circle(center, radius + chamfer_widening, CIRCLE_SEGMENTS)?;
        cut = cut.union(&widened);
    }
    let filter = face_filter(region, &cut, params);
    if filter.is_empty() {
        return Err(PipelineError::EmptyResult { stage: "face filter" });
    }
    let apertures = surviving_apertures(&filter, params)?;
    if apertures.is_empty() {
        return Err(PipelineError::EmptyResult { stage: "hex lattice" });
    }
    let mut lattice = Region::empty();
    for aperture in &apertures {
        lattice = lattice.union(aperture);
    }
    solid = solid.subtract_through(&lattice)?;

    info!(
        part = %index,
        holes = drilled.len(),
        apertures = apertures.len(),
        "built part"
    );
    Ok(solid)
}

/// Render the part's index digit, centered on the footprint and rotated a
/// half turn from the face's natural orientation.
fn engraving(
    index: PartIndex,
    region: &Region,
    params: &ParameterSet,
) -> Result<Region, PipelineError> {
    let glyphs = text::render(index.label(), params.label_size)?;
    let bb = region
        .bounding_rect()
        .ok_or(PipelineError::EmptyResult { stage: "part footprint" })?;
    let face_center = Point2::new(
        (bb.min().x + bb.max().x) / 2.0,
        (bb.min().y + bb.max().y) / 2.0,
    );
    let gb = glyphs
        .bounding_rect()
        .ok_or(PipelineError::EmptyResult { stage: "label glyphs" })?;
    let glyph_center = Vector2::new(
        (gb.min().x + gb.max().x) / 2.0,
        (gb.min().y + gb.max().y) / 2.0,
    );
    let placed = glyphs
        .translated(face_center.x - glyph_center.x, face_center.y - glyph_center.y)
        .rotated_about(face_center, std::f64::consts::PI);
    Ok(placed)
}
