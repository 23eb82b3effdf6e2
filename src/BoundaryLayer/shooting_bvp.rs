//! # Shooting on the wall curvature or on the pressure-gradient parameter
//!
//! A [`ShootingProblem`] fixes everything except one scalar, either the wall
//! curvature `h0` (the usual case) or the flow parameter `beta` with `h0` held
//! at a known value (separation search). Each trial value is integrated over
//! the whole grid and judged by its far-field [`Residual`]
//! `g(eta_max) - g_inf`.
//!
//! ## Bracket Finder
//! [`find_bracket`] scans inward from both ends of a search range with an
//! initial step of `(max - min) / bracket_divisions`. During the initial scan a
//! diverged trial is stepped over at the current step size; the side is not
//! restarted with a halved step at that point, so a boundary that itself
//! diverges does not trap the scan at the boundary. Halving happens only when
//! a scan runs into the other side: that side restarts from its boundary with
//! half the step. Once both sides have finite residuals of equal sign, both
//! are moved inward by their step until the signs differ; a side that lands on
//! a diverged trial while shrinking restarts from its boundary with half the
//! step. The search is capped by a total trial budget and fails with
//! [`ShootingError::BracketNotFound`] instead of looping forever.
//!
//! ## Bisection Shooter
//! [`bisect`] keeps the invariant "the residual changes sign between `lo` and
//! `hi`" and halves the bracket until the midpoint residual is within
//! `g_inf_tol`, the bracket degenerates or `n_iter_max` midpoints were tried.
//! The last two outcomes still return the last midpoint profiles, tagged with a
//! non-converged [`Termination`]; callers must check [`ShootingSolution::converged`].
//!
//! A diverged residual counts as an overshoot wherever a side of the target is
//! needed (caller-supplied bracket ends, bisection midpoints).
use super::bl_config::SolverConfig;
use super::bl_error::ShootingError;
use super::falkner_skan_ode::{FlowParameters, Profiles};
use super::integrator::{Residual, Stepper, integrate};
use super::similarity_grid::SimilarityGrid;
use log::{debug, info, warn};
use nalgebra::Vector3;
use std::fmt;

/// Which scalar is the unknown of the shooting problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShootingParameter {
    /// `h0` is free, `beta` is fixed
    WallCurvature,
    /// `beta` is free, `h0` is fixed
    FlowParameter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lo: f64,
    pub hi: f64,
}

impl Bracket {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// How a root-finding loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Converged,
    /// bracket length reached zero; an upstream invariant was violated
    DegenerateInterval,
    IterationBudgetExhausted,
    /// secant update undefined (two equal residuals)
    Stalled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Converged => write!(f, "converged"),
            Termination::DegenerateInterval => write!(f, "interval has zero length"),
            Termination::IterationBudgetExhausted => write!(f, "maximum number of iterations"),
            Termination::Stalled => write!(f, "secant update stalled"),
        }
    }
}

/// One integrated trial value of the shooting parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub parameter: f64,
    pub profiles: Profiles,
    pub residual: Residual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BisectionOutcome {
    pub trial: Trial,
    pub termination: Termination,
    pub iterations: usize,
}

/// Converged (or best-effort) profiles of a shooting problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ShootingSolution {
    pub unknown: ShootingParameter,
    /// converged value of the unknown
    pub parameter: f64,
    pub flow: FlowParameters,
    pub f0: f64,
    pub h0: f64,
    pub grid: SimilarityGrid,
    pub profiles: Profiles,
    pub residual: Residual,
    pub termination: Termination,
    pub iterations: usize,
}

impl ShootingSolution {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    pub fn beta(&self) -> f64 {
        self.flow.beta
    }

    pub fn g_end(&self) -> f64 {
        self.profiles.g[self.profiles.len() - 1]
    }
}

#[derive(Debug, Clone)]
pub struct ShootingProblem {
    /// `beta` is ignored when it is the unknown
    pub flow: FlowParameters,
    pub f0: f64,
    /// fixed wall curvature, ignored when `h0` is the unknown
    pub h0: f64,
    pub grid: SimilarityGrid,
    pub unknown: ShootingParameter,
    pub search_range: (f64, f64),
    /// known sign-changing bracket; the bracket finder is skipped when set
    pub bracket: Option<Bracket>,
}

impl ShootingProblem {
    pub fn wall_curvature(
        flow: FlowParameters,
        f0: f64,
        grid: SimilarityGrid,
        h0_range: (f64, f64),
    ) -> Self {
        Self {
            flow,
            f0,
            h0: f64::NAN,
            grid,
            unknown: ShootingParameter::WallCurvature,
            search_range: h0_range,
            bracket: None,
        }
    }

    pub fn flow_parameter(
        flow: FlowParameters,
        f0: f64,
        h0: f64,
        grid: SimilarityGrid,
        beta_range: (f64, f64),
    ) -> Self {
        Self {
            flow,
            f0,
            h0,
            grid,
            unknown: ShootingParameter::FlowParameter,
            search_range: beta_range,
            bracket: None,
        }
    }

    pub fn with_bracket(mut self, lo: f64, hi: f64) -> Self {
        self.bracket = Some(Bracket::new(lo, hi));
        self
    }

    /// Flow parameters and wall curvature of a trial value of the unknown
    fn trial_setup(&self, parameter: f64) -> (FlowParameters, f64) {
        match self.unknown {
            ShootingParameter::WallCurvature => (self.flow, parameter),
            ShootingParameter::FlowParameter => (self.flow.with_beta(parameter), self.h0),
        }
    }

    pub fn trial(&self, parameter: f64, stepper: &Stepper) -> Trial {
        let (flow, h0) = self.trial_setup(parameter);
        let y0 = Vector3::new(self.f0, flow.g0, h0);
        let profiles = integrate(stepper, y0, &flow, &self.grid);
        let residual = Residual::of(&profiles, &flow);
        Trial {
            parameter,
            profiles,
            residual,
        }
    }

    pub fn solve(&self, config: &SolverConfig) -> Result<ShootingSolution, ShootingError> {
        let stepper = config.stepper();
        let bracket = match self.bracket {
            Some(bracket) => bracket,
            None => find_bracket(
                |p| self.trial(p, &stepper).residual,
                self.search_range.0,
                self.search_range.1,
                config,
            )?,
        };
        let outcome = bisect(|p| self.trial(p, &stepper), bracket, config)?;

        let (flow, h0) = self.trial_setup(outcome.trial.parameter);
        Ok(ShootingSolution {
            unknown: self.unknown,
            parameter: outcome.trial.parameter,
            flow,
            f0: self.f0,
            h0,
            grid: self.grid.clone(),
            profiles: outcome.trial.profiles,
            residual: outcome.trial.residual,
            termination: outcome.termination,
            iterations: outcome.iterations,
        })
    }
}

////////////////////////////////////BRACKET FINDER////////////////////////////////////////

struct ScanSide {
    boundary: f64,
    /// +1 scans up from the lower end, -1 down from the upper end
    direction: f64,
    step: f64,
    position: f64,
    refinements: usize,
}

impl ScanSide {
    fn new(boundary: f64, direction: f64, step: f64) -> Self {
        Self {
            boundary,
            direction,
            step,
            position: boundary,
            refinements: 0,
        }
    }

    fn advance(&mut self) {
        self.position += self.direction * self.step;
    }

    fn passed(&self, limit: f64) -> bool {
        (self.position - limit) * self.direction >= 0.0
    }

    fn restart(&mut self, max_refinements: usize) -> Result<(), String> {
        if self.refinements >= max_refinements {
            return Err(format!(
                "no finite trial found from boundary {} after {} step refinements",
                self.boundary, self.refinements
            ));
        }
        self.refinements += 1;
        self.step *= 0.5;
        self.position = self.boundary;
        Ok(())
    }
}

struct BracketSearch<'a, E> {
    evaluate: E,
    config: &'a SolverConfig,
    min: f64,
    max: f64,
    trials: usize,
}

impl<E> BracketSearch<'_, E>
where
    E: FnMut(f64) -> Residual,
{
    fn not_found(&self, reason: String) -> ShootingError {
        ShootingError::BracketNotFound {
            min: self.min,
            max: self.max,
            reason,
        }
    }

    fn trial(&mut self, parameter: f64) -> Result<Residual, ShootingError> {
        if self.trials >= self.config.max_bracket_trials {
            return Err(self.not_found(format!(
                "trial budget of {} exhausted",
                self.config.max_bracket_trials
            )));
        }
        self.trials += 1;
        Ok((self.evaluate)(parameter))
    }

    fn restart(&self, side: &mut ScanSide) -> Result<(), ShootingError> {
        side.restart(self.config.max_scan_refinements)
            .map_err(|reason| self.not_found(reason))
    }

    /// Walks inward from the current position to the first finite residual.
    /// Diverged trials are stepped over; the step halves only after passing `limit`.
    fn scan(&mut self, side: &mut ScanSide, limit: f64) -> Result<f64, ShootingError> {
        loop {
            if let Residual::Finite(r) = self.trial(side.position)? {
                return Ok(r);
            }
            side.advance();
            if side.passed(limit) {
                self.restart(side)?;
            }
        }
    }

    /// Moves one step inward; landing on a diverged trial restarts the side.
    fn shrink(&mut self, side: &mut ScanSide, limit: f64) -> Result<f64, ShootingError> {
        side.advance();
        match self.trial(side.position)? {
            Residual::Finite(r) => Ok(r),
            Residual::Diverged => {
                debug!(
                    "shrinking from {} hit a diverged trial at {}, restarting",
                    side.boundary, side.position
                );
                self.restart(side)?;
                self.scan(side, limit)
            }
        }
    }
}

/// Finds `lo < hi` inside `[min, max]` whose far-field residuals differ in sign.
pub fn find_bracket<E>(
    evaluate: E,
    min: f64,
    max: f64,
    config: &SolverConfig,
) -> Result<Bracket, ShootingError>
where
    E: FnMut(f64) -> Residual,
{
    let mut search = BracketSearch {
        evaluate,
        config,
        min,
        max,
        trials: 0,
    };
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return Err(search.not_found("degenerate search range".to_string()));
    }
    if config.bracket_divisions == 0 {
        return Err(search.not_found("bracket_divisions must be positive".to_string()));
    }

    let step = (max - min) / config.bracket_divisions as f64;
    let mut left = ScanSide::new(min, 1.0, step);
    let mut right = ScanSide::new(max, -1.0, step);
    let mut r_left = search.scan(&mut left, right.position)?;
    let mut r_right = search.scan(&mut right, left.position)?;

    loop {
        if left.position >= right.position {
            return Err(search.not_found(format!(
                "scans met at {} without a sign change",
                left.position
            )));
        }
        if (r_left > 0.0) != (r_right > 0.0) {
            info!(
                "bracket found: [{}, {}] after {} trials",
                left.position, right.position, search.trials
            );
            return Ok(Bracket::new(left.position, right.position));
        }
        debug!(
            "equal residual signs at {} ({}) and {} ({}), shrinking",
            left.position, r_left, right.position, r_right
        );
        r_left = search.shrink(&mut left, right.position)?;
        r_right = search.shrink(&mut right, left.position)?;
    }
}

///////////////////////////////////BISECTION SHOOTER///////////////////////////////////////

#[derive(Debug, Clone, Copy)]
enum Side {
    Lo,
    Hi,
}

struct RootFindState {
    lo: Trial,
    hi: Trial,
    lo_above: bool,
    iteration: usize,
    latest: Option<Side>,
}

/// Bisects a sign-changing bracket of the shooting parameter.
pub fn bisect<E>(
    mut evaluate: E,
    bracket: Bracket,
    config: &SolverConfig,
) -> Result<BisectionOutcome, ShootingError>
where
    E: FnMut(f64) -> Trial,
{
    let lo = evaluate(bracket.lo);
    let hi = evaluate(bracket.hi);
    if !(bracket.lo < bracket.hi) || lo.residual.is_above() == hi.residual.is_above() {
        return Err(ShootingError::InvalidBracket {
            lo: bracket.lo,
            hi: bracket.hi,
            residual_lo: lo.residual.value(),
            residual_hi: hi.residual.value(),
        });
    }
    info!("bisection on [{}, {}]", bracket.lo, bracket.hi);

    let mut state = RootFindState {
        lo_above: lo.residual.is_above(),
        lo,
        hi,
        iteration: 0,
        latest: None,
    };

    while state.iteration < config.n_iter_max {
        let mid = 0.5 * (state.lo.parameter + state.hi.parameter);
        let trial = evaluate(mid);

        if state.hi.parameter - state.lo.parameter <= 0.0 {
            warn!("Interval has zero length at {}", mid);
            return Ok(BisectionOutcome {
                trial,
                termination: Termination::DegenerateInterval,
                iterations: state.iteration,
            });
        }
        if trial.residual.within(config.g_inf_tol) {
            info!(
                "Solution within tolerance (g_inf_tol = {:e}) after {} iterations: {}",
                config.g_inf_tol, state.iteration, mid
            );
            return Ok(BisectionOutcome {
                trial,
                termination: Termination::Converged,
                iterations: state.iteration,
            });
        }
        debug!(
            "bisection iteration {}: parameter = {}, residual = {:?}",
            state.iteration, mid, trial.residual
        );

        if trial.residual.is_above() == state.lo_above {
            state.lo = trial;
            state.latest = Some(Side::Lo);
        } else {
            state.hi = trial;
            state.latest = Some(Side::Hi);
        }
        state.iteration += 1;
    }

    warn!(
        "Maximum number of iterations (n_iter_max = {}) reached without convergence",
        config.n_iter_max
    );
    let trial = match state.latest {
        Some(Side::Lo) => state.lo,
        Some(Side::Hi) => state.hi,
        None => evaluate(0.5 * (bracket.lo + bracket.hi)),
    };
    Ok(BisectionOutcome {
        trial,
        termination: Termination::IterationBudgetExhausted,
        iterations: state.iteration,
    })
}
