//! Scalar root-finding for the frame aligner.
//!
//! Secant iteration (Newton with a finite-difference derivative): the
//! residual functions we solve are cheap but not analytically
//! differentiable, so the derivative is estimated from the two most
//! recent evaluations.

use thiserror::Error;
use tracing::debug;

/// Result of a converged root-find.
#[derive(Debug, Clone, Copy)]
pub struct SolveResult {
    /// The solved root.
    pub root: f64,
    /// Residual value at the root.
    pub residual: f64,
    /// Iterations taken.
    pub iterations: usize,
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("root-find did not converge after {max_iterations} iterations (residual: {residual})")]
    DidNotConverge {
        max_iterations: usize,
        residual: f64,
    },

    #[error("residual function is flat near x = {x} (secant step degenerated)")]
    FlatResidual { x: f64 },

    #[error("residual function returned a non-finite value at x = {x}")]
    NonFinite { x: f64 },
}

/// Configuration for the secant root-finder.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    pub max_iterations: usize,
    /// Accept when |f(x)| drops below this.
    pub residual_tolerance: f64,
    /// Accept when the step size drops below this (and the residual is finite).
    pub step_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            residual_tolerance: 1e-10,
            step_tolerance: 1e-12,
        }
    }
}

/// Find a root of `f` near `x0` by secant iteration.
///
/// The second starting point is produced by a small relative perturbation
/// of `x0`, so the caller only supplies one initial guess.
pub fn find_root<F>(mut f: F, x0: f64, config: &SolverConfig) -> Result<SolveResult, SolverError>
where
    F: FnMut(f64) -> f64,
{
    let f0 = f(x0);
    if !f0.is_finite() {
        return Err(SolverError::NonFinite { x: x0 });
    }
    if f0.abs() < config.residual_tolerance {
        return Ok(SolveResult {
            root: x0,
            residual: f0,
            iterations: 0,
        });
    }

    // Perturb to get the second secant point.
    let delta = if x0 != 0.0 { x0.abs() * 1e-4 } else { 1e-4 };
    let mut x_prev = x0;
    let mut f_prev = f0;
    let mut x = x0 + delta;
    let mut fx = f(x);

    for iteration in 1..=config.max_iterations {
        if !fx.is_finite() {
            return Err(SolverError::NonFinite { x });
        }
        if fx.abs() < config.residual_tolerance {
            debug!(iteration, root = x, "root-find converged on residual");
            return Ok(SolveResult {
                root: x,
                residual: fx,
                iterations: iteration,
            });
        }

        let denom = fx - f_prev;
        if denom.abs() < f64::MIN_POSITIVE * 16.0 {
            return Err(SolverError::FlatResidual { x });
        }

        let step = fx * (x - x_prev) / denom;
        x_prev = x;
        f_prev = fx;
        x -= step;
        fx = f(x);

        if step.abs() < config.step_tolerance {
            debug!(iteration, root = x, "root-find converged on step size");
            return Ok(SolveResult {
                root: x,
                residual: fx,
                iterations: iteration,
            });
        }
    }

    Err(SolverError::DidNotConverge {
        max_iterations: config.max_iterations,
        residual: fx,
    })
}
