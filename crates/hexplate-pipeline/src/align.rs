//! Frame alignment: bring the two profile curves into one coordinate
//! frame so the mirror constructions downstream are geometrically valid.
//!
//! Three steps, each verified against the tiered tolerances: share the
//! lowest vertex, solve the residual rotation about it, then shift both
//! curves so the mirror axes pass through the origin.

use nalgebra::Vector2;
use tracing::{debug, info};

use hexplate_kernel::Wire;
use hexplate_solver::{find_root, SolverConfig};
use hexplate_types::ParameterSet;

use crate::error::PipelineError;

/// Curves in the shared frame: the vertical mirror axis is x = 0 and the
/// shared vertex sits on y = 0.
#[derive(Debug, Clone)]
pub struct AlignedProfiles {
    pub small: Wire,
    pub big: Wire,
    /// Rotation applied to the big curve, radians.
    pub rotation: f64,
    /// Residual horizontal offset between leftmost vertices after the
    /// rotation was applied.
    pub residual: f64,
}

pub fn align(
    small: &Wire,
    big: &Wire,
    params: &ParameterSet,
) -> Result<AlignedProfiles, PipelineError> {
    let small = small.clone();

    // Step 1: translate the big curve so the lowest vertices coincide.
    let shared = small.lowest_vertex();
    let shared_big = big.lowest_vertex();
    let distance = (shared - shared_big).norm();
    let coarse = params.coarse_tol();
    if distance > coarse {
        return Err(PipelineError::SharedVertexTooFar {
            distance,
            limit: coarse,
        });
    }
    let big = big.translated(shared - shared_big);
    let drift = (shared - big.lowest_vertex()).norm();
    if drift > params.eps {
        return Err(PipelineError::SharedVertexDrifted {
            distance: drift,
            limit: params.eps,
        });
    }
    debug!(distance, "shared vertex aligned");

    // Step 2: rotate the big curve about the shared vertex until the
    // leftmost vertices line up horizontally. The residual is not
    // analytic in the angle (the leftmost vertex can switch), hence the
    // numeric solve.
    let left_small = small.leftmost_vertex();
    let offset = (left_small.x - big.leftmost_vertex().x).abs();
    if offset > coarse {
        return Err(PipelineError::LeftmostOffsetTooLarge {
            offset,
            limit: coarse,
        });
    }
    let residual = |angle: f64| {
        let trial = big.rotated_about(shared, angle);
        (left_small.x - trial.leftmost_vertex().x).abs()
    };
    let solved = find_root(residual, 0.0, &SolverConfig::default())?;
    let big = big.rotated_about(shared, solved.root);
    let final_residual = (left_small.x - big.leftmost_vertex().x).abs();
    if final_residual > params.tol {
        return Err(PipelineError::ResidualTooLarge {
            residual: final_residual,
            tolerance: params.tol,
        });
    }
    info!(
        angle = solved.root,
        residual = final_residual,
        iterations = solved.iterations,
        "angular alignment converged"
    );

    // Step 3: shift both curves so the leftmost-x of the small curve and
    // the shared vertex's y land on the axes.
    let shift = Vector2::new(-left_small.x, -shared.y);
    Ok(AlignedProfiles {
        small: small.translated(shift),
        big: big.translated(shift),
        rotation: solved.root,
        residual: final_residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn small_chain() -> Wire {
        Wire::open(vec![
            Point2::new(50.0, 0.0),
            Point2::new(40.0, 10.0),
            Point2::new(40.0, 55.0),
            Point2::new(0.0, 60.0),
        ])
        .unwrap()
    }

    fn big_chain() -> Wire {
        Wire::open(vec![
            Point2::new(50.0, 0.0),
            Point2::new(50.0, 100.0),
            Point2::new(0.0, 100.0),
        ])
        .unwrap()
    }

    fn params() -> ParameterSet {
        ParameterSet::default()
    }

    #[test]
    fn already_aligned_pair_is_left_in_place() {
        let a = align(&small_chain(), &big_chain(), &params()).unwrap();
        assert_relative_eq!(a.rotation, 0.0, epsilon = 1e-6);
        assert!(a.residual < params().tol);
        // Shared vertex lands on y = 0, leftmost small vertex on x = 0.
        assert_relative_eq!(a.small.lowest_vertex().y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(a.small.leftmost_vertex().x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn alignment_is_idempotent() {
        let first = align(&small_chain(), &big_chain(), &params()).unwrap();
        let second = align(&first.small, &first.big, &params()).unwrap();
        assert_relative_eq!(second.rotation, 0.0, epsilon = 1e-6);
        assert!(second.residual < 1e-6);
    }

    #[test]
    fn recovers_a_small_rotation() {
        // Small enough that the coarse pre-rotation gate still passes.
        let shared = Point2::new(50.0, 0.0);
        let skewed = big_chain().rotated_about(shared, 0.005);
        let a = align(&small_chain(), &skewed, &params()).unwrap();
        assert_relative_eq!(a.rotation, -0.005, epsilon = 1e-4);
        assert!(a.residual < params().tol);
    }

    #[test]
    fn distant_reference_vertices_abort() {
        let shifted = big_chain().translated(Vector2::new(20.0, 20.0));
        let err = align(&small_chain(), &shifted, &params());
        assert!(matches!(
            err,
            Err(PipelineError::SharedVertexTooFar { .. })
        ));
    }

    #[test]
    fn gross_leftmost_offset_aborts() {
        // Same lowest vertex but a completely different silhouette.
        let weird = Wire::open(vec![
            Point2::new(50.0, 0.0),
            Point2::new(55.0, 100.0),
            Point2::new(30.0, 100.0),
        ])
        .unwrap();
        let err = align(&small_chain(), &weird, &params());
        assert!(matches!(
            err,
            Err(PipelineError::LeftmostOffsetTooLarge { .. })
        ));
    }
}
