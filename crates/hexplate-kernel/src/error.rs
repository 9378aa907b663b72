use thiserror::Error;

/// Errors from kernel geometry construction.
///
/// Boolean operations themselves return possibly-empty regions rather than
/// errors; constructing geometry from invalid input is what fails here.
#[derive(Debug, Clone, Error)]
pub enum KernelError {
    #[error("ring has {count} distinct vertices, need at least 3")]
    TooFewVertices { count: usize },

    #[error("ring is self-intersecting near ({x:.4}, {y:.4})")]
    SelfIntersectingRing { x: f64, y: f64 },

    #[error("ring is degenerate: {reason}")]
    DegenerateRing { reason: String },

    #[error("cannot extrude an empty region")]
    EmptyExtrusion,

    #[error("extrusion height must be positive, got {height}")]
    InvalidHeight { height: f64 },

    #[error("feature is invalid: {reason}")]
    InvalidFeature { reason: String },

    #[error("wire needs at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("wire contains a non-finite coordinate")]
    NonFiniteCoordinate,
}
