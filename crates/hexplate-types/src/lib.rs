//! Shared value types for the hexplate pipeline: the immutable
//! parameter set and part indexing.

pub mod params;
pub mod part;

pub use params::{ParamError, ParameterOverrides, ParameterSet};
pub use part::PartIndex;
