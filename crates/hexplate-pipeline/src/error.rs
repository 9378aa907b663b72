use thiserror::Error;

use hexplate_format::FormatError;
use hexplate_kernel::KernelError;
use hexplate_solver::SolverError;
use hexplate_types::ParamError;

/// Fatal pipeline errors. Every failure aborts the whole run; there is no
/// partial-output mode.
#[derive(Debug, Error)]
pub enum PipelineError {
    // Input-shape errors: the drawing itself is unusable.
    #[error("drawing must contain at least two profile curves, found {count}")]
    TooFewCurves { count: usize },

    #[error("profile curves tie at length {length}; shortest/longest selection is ambiguous")]
    AmbiguousCurveLengths { length: f64 },

    #[error(
        "reference vertices are {distance} apart before alignment (limit {limit}); \
         the drawing pair is malformed"
    )]
    SharedVertexTooFar { distance: f64, limit: f64 },

    #[error("shared vertex drifted to {distance} after translation (limit {limit})")]
    SharedVertexDrifted { distance: f64, limit: f64 },

    #[error("leftmost vertices are offset {offset} horizontally before rotation (limit {limit})")]
    LeftmostOffsetTooLarge { offset: f64, limit: f64 },

    // Convergence errors: the curves cannot be related by a rotation.
    #[error("angular alignment failed: {0}")]
    Alignment(#[from] SolverError),

    #[error("aligned residual {residual} still exceeds tolerance {tolerance}")]
    ResidualTooLarge { residual: f64, tolerance: f64 },

    // Degenerate-geometry errors.
    #[error("geometry error: {0}")]
    Geometry(#[from] KernelError),

    #[error("{stage} produced no geometry")]
    EmptyResult { stage: &'static str },

    #[error("mounting hole at ({x:.3}, {y:.3}) straddles the part boundary")]
    HoleStraddlesBoundary { x: f64, y: f64 },

    #[error("horizontal probe at y = {y} does not intersect the part3 footprint")]
    ProbeMissed { y: f64 },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Params(#[from] ParamError),
}
