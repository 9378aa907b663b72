use thiserror::Error;

use hexplate_kernel::KernelError;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to parse SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("drawing contains no usable curves")]
    NoCurves,

    #[error("geometry error: {0}")]
    Kernel(#[from] KernelError),

    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("solid has no geometry to export")]
    EmptySolid,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
