//! Planar geometry kernel: wires, regions with boolean operations and
//! offsets, and prismatic solids built from them.
//!
//! Everything here is 2.5D. Parts are flat plates, so solids are modelled
//! as extruded footprints with top-face pockets and hole-rim chamfers
//! rather than general B-reps.

pub mod error;
pub mod geometry;
pub mod solid;

pub use error::KernelError;
pub use geometry::{Region, Wire};
pub use solid::{Compound, Recess, RimChamfer, Solid};
