//! Assembler: lay the finished parts out along the x axis.

use tracing::debug;

use hexplate_kernel::{Compound, Solid};

use crate::error::PipelineError;

/// Place the parts left to right in build order with exactly `gap`
/// between adjacent bounding boxes, the whole row centered on the origin.
pub fn assemble(parts: Vec<Solid>, gap: f64) -> Result<Compound, PipelineError> {
    if parts.is_empty() {
        return Err(PipelineError::EmptyResult { stage: "assembly" });
    }

    let mut extents = Vec::with_capacity(parts.len());
    for part in &parts {
        let (min, max) = part
            .bounding_box()
            .ok_or(PipelineError::EmptyResult { stage: "assembly" })?;
        extents.push((min.x, max.x - min.x));
    }

    let total: f64 =
        extents.iter().map(|(_, w)| w).sum::<f64>() + gap * (parts.len() - 1) as f64;
    let mut cursor = -total / 2.0;
    let mut placed = Vec::with_capacity(parts.len());
    for (part, (min_x, width)) in parts.into_iter().zip(extents) {
        placed.push(part.translated(cursor - min_x, 0.0));
        cursor += width + gap;
    }
    debug!(parts = placed.len(), row_width = total, "assembled compound");
    Ok(Compound::new(placed))
}
