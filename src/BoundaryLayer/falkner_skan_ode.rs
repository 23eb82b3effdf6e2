//! # Falkner-Skan equation in first-order form
//!
//! The similarity reduction of the laminar boundary layer gives the
//! third-order equation
//!
//! ```text
//! f''' + alpha * f * f'' + beta * (1 - f'^2) = 0
//! ```
//!
//! which is integrated as the first-order system in `(f, g, h) = (f, f', f'')`:
//!
//! ```text
//! f' = g
//! g' = h
//! h' = -alpha * f * h + beta * (g^2 - 1)
//! ```
//!
//! with `f(0) = f0` (wall mass transfer), `g(0) = g0 = 0` (no slip) and
//! `g(inf) = g_inf = 1`. The wall curvature `h(0) = h0` is the shooting unknown.
//! [`first_derivatives`] is the only place where the equation is written down;
//! every integrator and shooting variant goes through it.
use nalgebra::{DVector, Vector3};

/// Physical constants of one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowParameters {
    /// coefficient of the convective term, 1 in practice
    pub alpha: f64,
    /// pressure-gradient (acceleration) parameter
    pub beta: f64,
    /// wall value of g
    pub g0: f64,
    /// far-field target of g
    pub g_inf: f64,
}

impl Default for FlowParameters {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 0.0,
            g0: 0.0,
            g_inf: 1.0,
        }
    }
}

impl FlowParameters {
    pub fn new(alpha: f64, beta: f64, g0: f64, g_inf: f64) -> Self {
        Self {
            alpha,
            beta,
            g0,
            g_inf,
        }
    }

    pub fn with_beta(&self, beta: f64) -> Self {
        Self { beta, ..*self }
    }
}

/// Derivative triple `(f', g', h')` of the state `(f, g, h)`.
pub fn first_derivatives(y: &Vector3<f64>, flow: &FlowParameters) -> Vector3<f64> {
    let (f, g, h) = (y[0], y[1], y[2]);
    Vector3::new(g, h, -flow.alpha * f * h + flow.beta * (g * g - 1.0))
}

/// Profiles `(f, g, h)` aligned index-for-index with the similarity grid.
/// Written once, left to right, by a single integrator sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Profiles {
    pub f: DVector<f64>,
    pub g: DVector<f64>,
    pub h: DVector<f64>,
    /// first grid index where the state stopped being finite
    pub diverged_at: Option<usize>,
}

impl Profiles {
    pub fn len(&self) -> usize {
        self.f.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f.is_empty()
    }

    /// State at grid index `i`
    pub fn state(&self, i: usize) -> Vector3<f64> {
        Vector3::new(self.f[i], self.g[i], self.h[i])
    }

    pub fn wall(&self) -> Vector3<f64> {
        self.state(0)
    }

    pub fn far_field(&self) -> Vector3<f64> {
        self.state(self.len() - 1)
    }

    pub fn diverged(&self) -> bool {
        self.diverged_at.is_some()
    }

    /// `h'` recomputed from the equation at every grid point
    pub fn curvature_derivative(&self, flow: &FlowParameters) -> DVector<f64> {
        DVector::from_fn(self.len(), |i, _| first_derivatives(&self.state(i), flow)[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_derivatives_values() {
        let flow = FlowParameters::new(1.0, 0.5, 0.0, 1.0);
        let d = first_derivatives(&Vector3::new(2.0, 3.0, 4.0), &flow);
        assert_eq!(d[0], 3.0);
        assert_eq!(d[1], 4.0);
        // -1*2*4 + 0.5*(9 - 1)
        assert_relative_eq!(d[2], -4.0);
    }

    #[test]
    fn test_far_field_is_equilibrium() {
        // g = 1, h = 0 is a fixed point of the (g, h) subsystem for any beta
        for beta in [-0.19, 0.0, 1.0] {
            let flow = FlowParameters::default().with_beta(beta);
            let d = first_derivatives(&Vector3::new(7.0, 1.0, 0.0), &flow);
            assert_eq!(d[1], 0.0);
            assert_eq!(d[2], 0.0);
        }
    }

    #[test]
    fn test_curvature_derivative_matches_evaluator() {
        let flow = FlowParameters::default().with_beta(0.3);
        let profiles = Profiles {
            f: DVector::from_vec(vec![0.0, 0.1]),
            g: DVector::from_vec(vec![0.0, 0.2]),
            h: DVector::from_vec(vec![0.7, 0.6]),
            diverged_at: None,
        };
        let hp = profiles.curvature_derivative(&flow);
        assert_relative_eq!(hp[0], -0.3);
        assert_relative_eq!(hp[1], -0.1 * 0.6 + 0.3 * (0.04 - 1.0));
    }
}
