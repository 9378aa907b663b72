//! Drawing import and solid export formats.

pub mod error;
pub mod step;
pub mod svg;

pub use error::FormatError;
pub use step::{export_compound, output_paths, solid_to_step, tessellate};
pub use svg::{import_wires, import_wires_from_file};

/// Segment count used when polygonizing circles for holes and chamfer
/// rims. Shared with feature construction so hole rings and chamfer cones
/// line up vertex for vertex.
pub const CIRCLE_SEGMENTS: usize = 32;
