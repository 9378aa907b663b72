//! The alignment-and-derivation pipeline.
//!
//! A single run flows strictly downstream: import the drawing, select
//! the two profile curves by length, align them into a shared frame,
//! derive the three section regions, apply the feature pipeline to each,
//! and assemble the finished parts into one compound. Every stage hands
//! immutable values to the next; any failure aborts the whole run.

pub mod align;
pub mod assemble;
pub mod error;
pub mod extract;
pub mod features;
pub mod output;
pub mod sections;

pub use align::{align, AlignedProfiles};
pub use assemble::assemble;
pub use error::PipelineError;
pub use extract::{select_profiles, ProfileCurves};
pub use features::{build_part, hole_centers, reference_points, ReferencePoints};
pub use output::{present, Outcome, Viewer};
pub use sections::{build_sections, Sections};

use tracing::info;

use hexplate_kernel::Compound;
use hexplate_types::{ParameterSet, PartIndex};

/// Run the full pipeline on an SVG document.
pub fn run(svg: &str, params: &ParameterSet) -> Result<Compound, PipelineError> {
    let wires = hexplate_format::import_wires(svg)?;
    let profiles = select_profiles(&wires)?;
    let aligned = align(&profiles.small, &profiles.big, params)?;
    let sections = build_sections(&aligned)?;
    let refs = reference_points(&sections)?;
    let holes = hole_centers(&refs, params);

    let plan = [
        (&sections.part1, PartIndex::One),
        (&sections.part2, PartIndex::Two),
        (&sections.part3, PartIndex::Three),
    ];
    let mut parts = Vec::with_capacity(plan.len());
    for (region, index) in plan {
        parts.push(build_part(region, index, &holes, params)?);
    }

    let compound = assemble(parts, params.assembly_gap)?;
    info!(solids = compound.len(), "pipeline finished");
    Ok(compound)
}

/// Run the pipeline on a drawing file.
pub fn run_from_file(
    path: &std::path::Path,
    params: &ParameterSet,
) -> Result<Compound, PipelineError> {
    let svg = std::fs::read_to_string(path).map_err(hexplate_format::FormatError::from)?;
    run(&svg, params)
}
