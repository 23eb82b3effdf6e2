//! # Solver configuration
//!
//! All constants that steer a solve live in [`SolverConfig`] and are passed
//! explicitly to every component. A configuration is read-only for the
//! duration of a solve, so repeating a solve with the same inputs gives
//! bit-identical results.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "alpha": 1.0,
//!   "g0": 0.0,
//!   "g_inf": 1.0,
//!   "g_inf_tol": 1e-12,
//!   "n_iter_max": 128,
//!   "scheme": "RungeKutta4",
//!   "bracket_divisions": 128,
//!   "max_scan_refinements": 32,
//!   "max_bracket_trials": 4096,
//!   "h0_min": 0.0,
//!   "h0_max": 2.0,
//!   "beta_min": -0.2,
//!   "beta_max": -0.19,
//!   "h0_tol": 1e-12,
//!   "n_outer_max": 128
//! }
//! ```
//! Missing keys take their default values.
use super::bl_error::ShootingError;
use super::falkner_skan_ode::FlowParameters;
use super::integrator::{ExplicitEuler, RungeKutta4, Stepper};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Wall curvature at separation, lower end of the default `h0` search range
pub const H0_SEPARATION: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationScheme {
    Euler,
    RungeKutta4,
}

impl IntegrationScheme {
    pub fn stepper(&self) -> Stepper {
        match self {
            IntegrationScheme::Euler => ExplicitEuler.into(),
            IntegrationScheme::RungeKutta4 => RungeKutta4.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub alpha: f64,
    pub g0: f64,
    pub g_inf: f64,
    /// far-field convergence tolerance of the bisection shooter
    pub g_inf_tol: f64,
    /// iteration ceiling of the bisection shooter
    pub n_iter_max: usize,
    pub scheme: IntegrationScheme,
    /// initial bracket scan step is (max - min) / bracket_divisions
    pub bracket_divisions: usize,
    /// how many times a side scan may halve its step and restart
    pub max_scan_refinements: usize,
    /// total trial budget of the bracket finder, caps its shrink loop
    pub max_bracket_trials: usize,
    pub h0_min: f64,
    pub h0_max: f64,
    pub beta_min: f64,
    pub beta_max: f64,
    /// convergence tolerance of the secant loop on the wall curvature
    pub h0_tol: f64,
    /// iteration ceiling of the secant loop
    pub n_outer_max: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            g0: 0.0,
            g_inf: 1.0,
            g_inf_tol: 1e-12,
            n_iter_max: 128,
            scheme: IntegrationScheme::RungeKutta4,
            bracket_divisions: 128,
            max_scan_refinements: 32,
            max_bracket_trials: 4096,
            h0_min: H0_SEPARATION,
            h0_max: 2.0,
            beta_min: -0.20,
            beta_max: -0.19,
            h0_tol: 1e-12,
            n_outer_max: 128,
        }
    }
}

impl SolverConfig {
    pub fn with_tolerance(mut self, g_inf_tol: f64) -> Self {
        self.g_inf_tol = g_inf_tol;
        self
    }

    pub fn with_scheme(mut self, scheme: IntegrationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn stepper(&self) -> Stepper {
        self.scheme.stepper()
    }

    pub fn flow(&self, beta: f64) -> FlowParameters {
        FlowParameters::new(self.alpha, beta, self.g0, self.g_inf)
    }

    pub fn validate(&self) -> Result<(), ShootingError> {
        let finite = [
            ("alpha", self.alpha),
            ("g0", self.g0),
            ("g_inf", self.g_inf),
            ("h0_min", self.h0_min),
            ("h0_max", self.h0_max),
            ("beta_min", self.beta_min),
            ("beta_max", self.beta_max),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ShootingError::InvalidConfiguration(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [("g_inf_tol", self.g_inf_tol), ("h0_tol", self.h0_tol)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ShootingError::InvalidConfiguration(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("n_iter_max", self.n_iter_max),
            ("bracket_divisions", self.bracket_divisions),
            ("max_bracket_trials", self.max_bracket_trials),
            ("n_outer_max", self.n_outer_max),
        ] {
            if value == 0 {
                return Err(ShootingError::InvalidConfiguration(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }
        if self.h0_min >= self.h0_max {
            return Err(ShootingError::InvalidConfiguration(format!(
                "h0_min ({}) must be below h0_max ({})",
                self.h0_min, self.h0_max
            )));
        }
        if self.beta_min >= self.beta_max {
            return Err(ShootingError::InvalidConfiguration(format!(
                "beta_min ({}) must be below beta_max ({})",
                self.beta_min, self.beta_max
            )));
        }
        Ok(())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ShootingError> {
        let content = fs::read_to_string(path)?;
        let config: SolverConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ShootingError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
