//! # Blowoff: secant iteration on the wall mass-transfer rate
//!
//! With strong blowing (`f0 < 0`) the boundary layer lifts off the wall and the
//! wall curvature `h0` drops to zero. The wall value `f0` at which that happens
//! is found by treating one full wall-curvature shooting solve as a black-box
//! function `f0 -> h0` and driving it to zero with the secant update
//!
//! ```text
//! f0_next = f0_1 - h0_1 * (f0_1 - f0_2) / (h0_1 - h0_2)
//! ```
//!
//! where index 1 is the latest and index 2 the one before. Each inner solve
//! after the two seeds searches `h0` in `[h0_min, h0_previous]`.
//!
//! On a truncated domain the loop does not stop at the blowoff point by itself:
//! `h0` keeps shrinking slowly past it, so with a tight `h0_tol` (the default
//! `1e-12`) the converged `f0` runs well beyond the blowoff value and depends on
//! `eta_max`. For `beta = 0`, `n = 1000`, `eta_max = 20` a tolerance of `1e-5`
//! stops near `f0 = -0.876`, while `1e-12` ends near `f0 = -1.41`.
//!
//! Non-convergence of an inner solve is only logged and reported through
//! [`BlowoffSolution::inner_converged`]; the outer loop keeps going because an
//! outer correction may still make progress from an imperfect inner result.
use super::bl_config::SolverConfig;
use super::bl_error::ShootingError;
use super::falkner_skan_ode::FlowParameters;
use super::shooting_bvp::{ShootingProblem, ShootingSolution, Termination};
use super::similarity_grid::SimilarityGrid;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantPoint {
    pub f0: f64,
    pub h0: f64,
}

/// The two trailing `(f0, h0)` pairs of the secant loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantHistory {
    pub previous: SecantPoint,
    pub current: SecantPoint,
}

impl SecantHistory {
    pub fn new(previous: SecantPoint, current: SecantPoint) -> Self {
        Self { previous, current }
    }

    /// Secant extrapolation to `h0 = 0`; `None` when the two residuals are equal.
    pub fn next_f0(&self) -> Option<f64> {
        let (p, c) = (self.previous, self.current);
        let dh = c.h0 - p.h0;
        if dh == 0.0 || !dh.is_finite() {
            return None;
        }
        let next = c.f0 - c.h0 * (c.f0 - p.f0) / dh;
        next.is_finite().then_some(next)
    }

    pub fn push(&mut self, point: SecantPoint) {
        self.previous = self.current;
        self.current = point;
    }

    pub fn converged(&self, h0_tol: f64) -> bool {
        self.current.h0 * self.current.h0 < h0_tol * h0_tol
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlowoffSolution {
    /// profiles of the last inner solve
    pub solution: ShootingSolution,
    pub f0: f64,
    pub h0: f64,
    pub termination: Termination,
    /// number of secant updates
    pub iterations: usize,
    /// whether the last inner shooting solve converged
    pub inner_converged: bool,
    /// every `(f0, h0)` pair, seeds first
    pub trace: Vec<SecantPoint>,
}

impl BlowoffSolution {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

#[derive(Debug, Clone)]
pub struct BlowoffProblem {
    pub flow: FlowParameters,
    pub grid: SimilarityGrid,
    /// seeds with `f0_1 > f0_2`
    pub f0_seeds: (f64, f64),
}

impl BlowoffProblem {
    pub fn new(flow: FlowParameters, grid: SimilarityGrid, f0_1: f64, f0_2: f64) -> Self {
        Self {
            flow,
            grid,
            f0_seeds: (f0_1, f0_2),
        }
    }

    fn inner_solve(
        &self,
        f0: f64,
        h0_max: f64,
        config: &SolverConfig,
    ) -> Result<ShootingSolution, ShootingError> {
        let problem =
            ShootingProblem::wall_curvature(self.flow, f0, self.grid.clone(), (config.h0_min, h0_max));
        let solution = problem.solve(config)?;
        if !solution.converged() {
            warn!(
                "inner shooting at f0 = {} ended with '{}', residual {:?}",
                f0, solution.termination, solution.residual
            );
        }
        Ok(solution)
    }

    pub fn solve(&self, config: &SolverConfig) -> Result<BlowoffSolution, ShootingError> {
        let (f0_1, f0_2) = self.f0_seeds;
        if !(f0_1 > f0_2) {
            return Err(ShootingError::DomainError(format!(
                "blowoff seeds must satisfy f0_1 > f0_2, got {} and {}",
                f0_1, f0_2
            )));
        }

        let first = self.inner_solve(f0_1, config.h0_max, config)?;
        let mut last = self.inner_solve(f0_2, config.h0_max, config)?;
        let mut history = SecantHistory::new(
            SecantPoint { f0: f0_1, h0: first.h0 },
            SecantPoint { f0: f0_2, h0: last.h0 },
        );
        let mut trace = vec![history.previous, history.current];
        info!(
            "blowoff seeds: h0({}) = {}, h0({}) = {}",
            f0_1, first.h0, f0_2, last.h0
        );

        let mut iterations = 0;
        let termination = loop {
            if history.converged(config.h0_tol) {
                break Termination::Converged;
            }
            if iterations >= config.n_outer_max {
                warn!(
                    "Maximum number of outer iterations (n_outer_max = {}) reached, h0 = {}",
                    config.n_outer_max, history.current.h0
                );
                break Termination::IterationBudgetExhausted;
            }
            let Some(f0_next) = history.next_f0() else {
                warn!(
                    "secant update undefined at f0 = {} (h0 = {})",
                    history.current.f0, history.current.h0
                );
                break Termination::Stalled;
            };

            last = self.inner_solve(f0_next, history.current.h0, config)?;
            iterations += 1;
            let point = SecantPoint {
                f0: f0_next,
                h0: last.h0,
            };
            info!("secant iteration {}: f0 = {}, h0 = {}", iterations, point.f0, point.h0);
            history.push(point);
            trace.push(point);
        };

        Ok(BlowoffSolution {
            f0: history.current.f0,
            h0: history.current.h0,
            inner_converged: last.converged(),
            solution: last,
            termination,
            iterations,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn blowoff_problem(n: usize, eta_max: f64) -> BlowoffProblem {
        let config = SolverConfig::default();
        let grid = SimilarityGrid::new(n, eta_max).unwrap();
        BlowoffProblem::new(config.flow(0.0), grid, -0.80, -0.85)
    }

    #[test]
    fn test_secant_update() {
        let history = SecantHistory::new(
            SecantPoint { f0: -0.80, h0: 0.1 },
            SecantPoint { f0: -0.85, h0: 0.05 },
        );
        assert_relative_eq!(history.next_f0().unwrap(), -0.90, epsilon = 1e-14);

        let flat = SecantHistory::new(
            SecantPoint { f0: -0.80, h0: 0.1 },
            SecantPoint { f0: -0.85, h0: 0.1 },
        );
        assert_eq!(flat.next_f0(), None);
    }

    #[test]
    fn test_history_push_keeps_two_points() {
        let mut history = SecantHistory::new(
            SecantPoint { f0: 1.0, h0: 1.0 },
            SecantPoint { f0: 2.0, h0: 0.5 },
        );
        history.push(SecantPoint { f0: 3.0, h0: 1e-13 });
        assert_eq!(history.previous.f0, 2.0);
        assert_eq!(history.current.f0, 3.0);
        assert!(history.converged(1e-12));
        assert!(!history.converged(1e-14));
    }

    #[test]
    fn test_seeds_must_be_ordered() {
        let mut problem = blowoff_problem(100, 10.0);
        problem.f0_seeds = (-0.85, -0.80);
        match problem.solve(&SolverConfig::default()) {
            Err(ShootingError::DomainError(msg)) => assert!(msg.contains("f0_1 > f0_2")),
            other => panic!("expected DomainError, got {:?}", other),
        }
    }

    #[test]
    fn test_blowoff_converges() {
        let mut config = SolverConfig::default();
        config.h0_tol = 1e-5;
        let result = blowoff_problem(1000, 20.0).solve(&config).unwrap();

        assert!(result.converged());
        assert!(result.inner_converged);
        assert!(result.h0.abs() < 1e-5);
        // blowoff of the flat plate, f'''+ff''=0 normalization
        assert_relative_eq!(result.f0, -0.8757, epsilon = 1e-3);
        assert_eq!(result.solution.profiles.f[0], result.f0);
        assert_eq!(result.solution.h0, result.h0);
        assert_eq!(result.trace.len(), result.iterations + 2);
        // wall curvature shrinks monotonically towards blowoff
        for pair in result.trace.windows(2) {
            assert!(pair[1].h0 < pair[0].h0);
            assert!(pair[1].f0 < pair[0].f0);
        }
    }

    #[test]
    fn test_tight_tolerance_runs_past_blowoff() {
        let result = blowoff_problem(1000, 20.0)
            .solve(&SolverConfig::default())
            .unwrap();
        assert!(result.converged());
        assert!(result.h0.abs() < 1e-12);
        // far beyond f0 = -0.876 on this truncated domain
        assert!(result.f0 < -1.3, "f0 = {}", result.f0);
    }

    #[test]
    fn test_outer_budget_returns_last_profiles() {
        let mut config = SolverConfig::default();
        config.n_outer_max = 1;
        let result = blowoff_problem(1000, 20.0).solve(&config).unwrap();

        assert_eq!(result.termination, Termination::IterationBudgetExhausted);
        assert!(!result.converged());
        assert_eq!(result.iterations, 1);
        assert_eq!(result.trace.len(), 3);
        assert!(result.h0 > 0.0 && result.h0 < 0.01);
        assert_eq!(result.solution.profiles.len(), 1000);
    }
}
