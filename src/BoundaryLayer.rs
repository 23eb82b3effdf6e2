//! # Falkner-Skan Boundary Layer (FSBL) Module
//!
//! Shooting solvers for the similarity form of the laminar boundary-layer equations.
//!
//! ## Mathematical Model
//!
//! ### Nomenclature
//!
//! | Symbol | Description |
//! |--------|-------------|
//! | `eta` | similarity coordinate, `0 <= eta <= eta_max` |
//! | `f` | stream function |
//! | `g = f'` | velocity ratio `u/U_e` |
//! | `h = f''` | shear, `h0 = h(0)` is the wall curvature |
//! | `alpha` | scaling of the convective term (1 in practice) |
//! | `beta` | pressure-gradient parameter |
//! | `f0` | wall value of `f`, `f0 < 0` is blowing |
//!
//! ### Governing Equations
//!
//! ```text
//! f''' + alpha f f'' + beta (1 - f'^2) = 0
//! ```
//! written as the first-order system
//! ```text
//! f' = g
//! g' = h
//! h' = -alpha f h + beta (g^2 - 1)
//! ```
//!
//! ### Boundary Conditions
//!
//! - At `eta = 0`: `f = f0`, `g = 0`
//! - At `eta = eta_max`: `g = 1` (within `g_inf_tol`)
//!
//! ## Numerical Solution
//!
//! The missing wall value (`h0`, or `beta` when `h0` is pinned at zero for a
//! separation search) is found by shooting: the system is integrated across a
//! uniform grid with a fixed-step Runge-Kutta 4 (or explicit Euler) scheme, a
//! sign-changing bracket of the unknown is located, then bisected until the
//! far-field residual `g(eta_max) - 1` is within tolerance. The blowoff wall value
//! `f0` where `h0` vanishes is found by a secant iteration around the whole
//! shooting solve.
//!
//! ## Modules
//! - `similarity_grid`: uniform grid on `[0, eta_max]`
//! - `falkner_skan_ode`: flow parameters, right-hand side, profile arrays
//! - `integrator`: Euler and RK4 steppers, divergence tagging, far-field residual
//! - `shooting_bvp`: bracket finder, bisection shooter, shooting problems
//! - `secant_blowoff`: secant outer loop on `f0`
//! - `bl_config`: solver configuration (JSON)
//! - `bl_error`: error types
//! - `profile_export`: profile files and console summary
//! - `fsbl_api`: entry points used by the CLI

pub mod bl_config;
pub mod bl_error;
pub mod falkner_skan_ode;
pub mod fsbl_api;
pub mod integrator;
pub mod profile_export;
pub mod secant_blowoff;
pub mod shooting_bvp;
pub mod similarity_grid;
