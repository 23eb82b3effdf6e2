//! # Fixed-step integrator
//!
//! Advances `(f, g, h)` across the whole [`SimilarityGrid`] with one of two
//! explicit schemes:
//! - [`ExplicitEuler`]: `y[i+1] = y[i] + deta * F(y[i])`, first order;
//! - [`RungeKutta4`]: classical four-stage scheme, `(k1 + 2k2 + 2k3 + k4)/6`.
//!
//! Both are dispatched through the [`Stepper`] enum so that the root finders
//! never care which one is in use.
//!
//! For some `(beta, h0)` the trajectory blows up. The sweep does not fail in
//! that case: from the first non-finite state on, the remaining entries are
//! filled with NaN and [`Profiles::diverged_at`] records the index. The far-field
//! [`Residual`] of such a trial is [`Residual::Diverged`].
use super::falkner_skan_ode::{FlowParameters, Profiles, first_derivatives};
use super::similarity_grid::SimilarityGrid;
use enum_dispatch::enum_dispatch;
use log::debug;
use nalgebra::{DVector, Vector3};

#[enum_dispatch]
pub trait StepScheme {
    /// One step of size `deta` from state `y`
    fn step(&self, y: &Vector3<f64>, deta: f64, flow: &FlowParameters) -> Vector3<f64>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExplicitEuler;

impl StepScheme for ExplicitEuler {
    fn step(&self, y: &Vector3<f64>, deta: f64, flow: &FlowParameters) -> Vector3<f64> {
        y + deta * first_derivatives(y, flow)
    }

    fn name(&self) -> &'static str {
        "explicit Euler"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RungeKutta4;

impl StepScheme for RungeKutta4 {
    fn step(&self, y: &Vector3<f64>, deta: f64, flow: &FlowParameters) -> Vector3<f64> {
        let half = 0.5 * deta;
        let k1 = first_derivatives(y, flow);
        let k2 = first_derivatives(&(y + half * k1), flow);
        let k3 = first_derivatives(&(y + half * k2), flow);
        let k4 = first_derivatives(&(y + deta * k3), flow);
        y + (deta / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
    }

    fn name(&self) -> &'static str {
        "Runge-Kutta 4"
    }
}

#[enum_dispatch(StepScheme)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stepper {
    ExplicitEuler,
    RungeKutta4,
}

impl Default for Stepper {
    fn default() -> Self {
        RungeKutta4.into()
    }
}

/// Integrates from the wall state `y0 = (f0, g0, h0)` over the whole grid.
pub fn integrate(
    stepper: &Stepper,
    y0: Vector3<f64>,
    flow: &FlowParameters,
    grid: &SimilarityGrid,
) -> Profiles {
    let n = grid.len();
    let deta = grid.deta();
    let mut f = DVector::from_element(n, f64::NAN);
    let mut g = DVector::from_element(n, f64::NAN);
    let mut h = DVector::from_element(n, f64::NAN);
    let mut diverged_at = None;

    let mut y = y0;
    for i in 0..n {
        if !y.iter().all(|v| v.is_finite()) {
            debug!(
                "{} trajectory diverged at eta = {} (beta = {}, wall state = {:?})",
                stepper.name(),
                grid.points()[i],
                flow.beta,
                y0.as_slice()
            );
            diverged_at = Some(i);
            break;
        }
        f[i] = y[0];
        g[i] = y[1];
        h[i] = y[2];
        if i + 1 < n {
            y = stepper.step(&y, deta, flow);
        }
    }

    Profiles {
        f,
        g,
        h,
        diverged_at,
    }
}

/// Far-field residual `g(eta_max) - g_inf` of one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Residual {
    Finite(f64),
    Diverged,
}

impl Residual {
    pub fn of(profiles: &Profiles, flow: &FlowParameters) -> Self {
        let g_end = profiles.g[profiles.len() - 1];
        if profiles.diverged() || !g_end.is_finite() {
            Residual::Diverged
        } else {
            Residual::Finite(g_end - flow.g_inf)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Residual::Finite(r) => Some(*r),
            Residual::Diverged => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Residual::Finite(_))
    }

    /// Side of the target. A blown-up trajectory counts as an overshoot.
    pub fn is_above(&self) -> bool {
        match self {
            Residual::Finite(r) => *r > 0.0,
            Residual::Diverged => true,
        }
    }

    pub fn within(&self, tol: f64) -> bool {
        match self {
            Residual::Finite(r) => r * r < tol * tol,
            Residual::Diverged => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn blasius_flow() -> FlowParameters {
        FlowParameters::default()
    }

    #[test]
    fn test_initial_condition_is_kept() {
        let grid = SimilarityGrid::new(50, 5.0).unwrap();
        let y0 = Vector3::new(-0.3, 0.0, 0.47);
        for stepper in [Stepper::from(ExplicitEuler), Stepper::from(RungeKutta4)] {
            let p = integrate(&stepper, y0, &blasius_flow(), &grid);
            assert_eq!(p.len(), 50);
            assert_eq!(p.wall(), y0);
            assert!(!p.diverged());
        }
    }

    #[test]
    fn test_euler_single_step() {
        let flow = FlowParameters::default().with_beta(1.0);
        let y = Vector3::new(1.0, 0.5, 2.0);
        let next = ExplicitEuler.step(&y, 0.1, &flow);
        assert_relative_eq!(next[0], 1.05);
        assert_relative_eq!(next[1], 0.7);
        // h' = -1*1*2 + (0.25 - 1) = -2.75
        assert_relative_eq!(next[2], 2.0 - 0.275);
    }

    #[test]
    fn test_quiescent_state_is_preserved() {
        // beta = 0, g0 = 0, h0 = 0: f stays at f0, g and h stay zero
        let grid = SimilarityGrid::new(21, 4.0).unwrap();
        let p = integrate(
            &Stepper::default(),
            Vector3::new(0.5, 0.0, 0.0),
            &blasius_flow(),
            &grid,
        );
        for i in 0..grid.len() {
            assert_eq!(p.f[i], 0.5);
            assert_eq!(p.g[i], 0.0);
            assert_eq!(p.h[i], 0.0);
        }
    }

    #[test]
    fn test_rk4_fourth_order_step() {
        // alpha = beta = 0: h' = 0, polynomial solution that RK4 reproduces exactly
        let flow = FlowParameters::new(0.0, 0.0, 0.0, 1.0);
        let y = Vector3::new(0.0, 0.0, 1.0);
        // exact: f = eta^2/2, g = eta, h = 1
        let next = RungeKutta4.step(&y, 0.2, &flow);
        assert_relative_eq!(next[0], 0.02, epsilon = 1e-15);
        assert_relative_eq!(next[1], 0.2, epsilon = 1e-15);
        assert_relative_eq!(next[2], 1.0, epsilon = 1e-15);
        // Euler misses the quadratic term of f
        let euler = ExplicitEuler.step(&y, 0.2, &flow);
        assert_relative_eq!(euler[0], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_divergence_is_tagged_not_raised() {
        // strong favourable pressure gradient with a large wall curvature blows up
        let grid = SimilarityGrid::new(257, 10.0).unwrap();
        let flow = FlowParameters::default().with_beta(1.0);
        let p = integrate(
            &Stepper::default(),
            Vector3::new(0.0, 0.0, 2.0),
            &flow,
            &grid,
        );
        let k = p.diverged_at.expect("trajectory should diverge");
        assert!(k > 0);
        for i in k..grid.len() {
            assert!(p.f[i].is_nan() && p.g[i].is_nan() && p.h[i].is_nan());
        }
        for i in 0..k {
            assert!(p.g[i].is_finite());
        }
        assert_eq!(Residual::of(&p, &flow), Residual::Diverged);
        assert!(Residual::Diverged.is_above());
        assert!(!Residual::Diverged.within(1.0));
    }

    #[test]
    fn test_residual_sign_and_tolerance() {
        assert!(Residual::Finite(1e-3).is_above());
        assert!(!Residual::Finite(-1e-3).is_above());
        assert!(Residual::Finite(-1e-13).within(1e-12));
        assert!(!Residual::Finite(2e-12).within(1e-12));
        assert_eq!(Residual::Finite(0.25).value(), Some(0.25));
        assert_eq!(Residual::Diverged.value(), None);
    }
}
