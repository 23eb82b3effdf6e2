//! Solver entry points used by the command-line shell and the sweep.
//!
//! Each function builds the grid from `(n, eta_max)`, validates the
//! configuration and runs one shooting variant. A returned solution may be
//! non-converged; check `converged()` before trusting the profiles.
use super::bl_config::{H0_SEPARATION, SolverConfig};
use super::bl_error::ShootingError;
use super::secant_blowoff::{BlowoffProblem, BlowoffSolution};
use super::shooting_bvp::{ShootingProblem, ShootingSolution};
use super::similarity_grid::SimilarityGrid;
use log::info;

/// Shoots on the wall curvature `h0` for fixed `beta` and wall value `f0`.
/// `h0_range` defaults to `[config.h0_min, config.h0_max]`.
pub fn solve_wall_curvature(
    beta: f64,
    f0: f64,
    n: usize,
    eta_max: f64,
    h0_range: Option<(f64, f64)>,
    config: &SolverConfig,
) -> Result<ShootingSolution, ShootingError> {
    config.validate()?;
    let grid = SimilarityGrid::new(n, eta_max)?;
    let range = h0_range.unwrap_or((config.h0_min, config.h0_max));
    info!(
        "wall curvature shooting: beta = {}, f0 = {}, n = {}, eta_max = {}, h0 in [{}, {}]",
        beta, f0, n, eta_max, range.0, range.1
    );
    ShootingProblem::wall_curvature(config.flow(beta), f0, grid, range).solve(config)
}

/// Shoots on `beta` with the wall curvature pinned at its separation value.
/// `beta_bounds` is used as a known bracket when given, otherwise the
/// configured `[beta_min, beta_max]` is searched.
pub fn solve_separation(
    f0: f64,
    n: usize,
    eta_max: f64,
    beta_bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> Result<ShootingSolution, ShootingError> {
    config.validate()?;
    let grid = SimilarityGrid::new(n, eta_max)?;
    info!(
        "separation shooting: f0 = {}, n = {}, eta_max = {}, h0 = {}",
        f0, n, eta_max, H0_SEPARATION
    );
    let problem = ShootingProblem::flow_parameter(
        config.flow(0.0),
        f0,
        H0_SEPARATION,
        grid,
        (config.beta_min, config.beta_max),
    );
    match beta_bounds {
        Some((lo, hi)) => problem.with_bracket(lo, hi).solve(config),
        None => problem.solve(config),
    }
}

/// Secant iteration on `f0` down to the blowoff limit `h0 = 0`.
pub fn solve_blowoff(
    beta: f64,
    n: usize,
    eta_max: f64,
    f0_1: f64,
    f0_2: f64,
    config: &SolverConfig,
) -> Result<BlowoffSolution, ShootingError> {
    config.validate()?;
    let grid = SimilarityGrid::new(n, eta_max)?;
    info!(
        "blowoff secant: beta = {}, n = {}, eta_max = {}, seeds {} and {}",
        beta, n, eta_max, f0_1, f0_2
    );
    BlowoffProblem::new(config.flow(beta), grid, f0_1, f0_2).solve(config)
}
