//! Profile curve selection.

use tracing::debug;

use hexplate_kernel::Wire;

use crate::error::PipelineError;

/// The two profile curves, picked from the drawing by total arc length.
#[derive(Debug, Clone)]
pub struct ProfileCurves {
    pub small: Wire,
    pub big: Wire,
}

/// Select the shortest and longest curves from the imported wires.
///
/// The drawing may carry construction geometry besides the two profiles;
/// only the extremes matter. Exact length ties at either extreme make the
/// selection ambiguous and abort the run.
pub fn select_profiles(wires: &[Wire]) -> Result<ProfileCurves, PipelineError> {
    if wires.len() < 2 {
        return Err(PipelineError::TooFewCurves { count: wires.len() });
    }

    let lengths: Vec<f64> = wires.iter().map(Wire::length).collect();
    let (mut min_idx, mut max_idx) = (0, 0);
    for (i, &len) in lengths.iter().enumerate() {
        if len < lengths[min_idx] {
            min_idx = i;
        }
        if len > lengths[max_idx] {
            max_idx = i;
        }
    }

    let shortest = lengths[min_idx];
    let longest = lengths[max_idx];
    if lengths.iter().filter(|&&l| l == shortest).count() > 1 {
        return Err(PipelineError::AmbiguousCurveLengths { length: shortest });
    }
    if lengths.iter().filter(|&&l| l == longest).count() > 1 {
        return Err(PipelineError::AmbiguousCurveLengths { length: longest });
    }

    debug!(
        small_length = shortest,
        big_length = longest,
        total = wires.len(),
        "selected profile curves"
    );
    Ok(ProfileCurves {
        small: wires[min_idx].clone(),
        big: wires[max_idx].clone(),
    })
}
