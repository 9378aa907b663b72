//! Terminal outcomes: interactive display or STEP export.
//!
//! Display and export are equally valid ends for a computed compound.
//! The caller decides the fallback policy through an explicit result
//! rather than exception-style control flow: if a viewer is wired up and
//! works, the run reports `Displayed`; otherwise the compound is written
//! to STEP files and the run reports `Exported`.

use std::path::{Path, PathBuf};

use tracing::warn;

use hexplate_format::export_compound;
use hexplate_kernel::Compound;

use crate::error::PipelineError;

pub type ViewerError = Box<dyn std::error::Error + Send + Sync>;

/// An interactive display backend. None is bundled; integrations provide
/// their own.
pub trait Viewer {
    fn show(&self, compound: &Compound) -> Result<(), ViewerError>;
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Displayed,
    Exported { files: Vec<PathBuf> },
}

/// Show the compound if a working viewer is available, otherwise export
/// it. A failing viewer downgrades to export instead of aborting.
pub fn present(
    compound: &Compound,
    viewer: Option<&dyn Viewer>,
    export_path: &Path,
) -> Result<Outcome, PipelineError> {
    if let Some(v) = viewer {
        match v.show(compound) {
            Ok(()) => return Ok(Outcome::Displayed),
            Err(e) => warn!(error = %e, "viewer unavailable, exporting instead"),
        }
    }
    let files = export_compound(compound, export_path)?;
    Ok(Outcome::Exported { files })
}
