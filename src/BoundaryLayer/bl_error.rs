//! Error types of the shooting solver.
//!
//! Divergent trajectories are not errors: the integrator encodes them as
//! [`Residual::Diverged`](super::integrator::Residual) and the root finders
//! steer around them. Iteration ceilings are not errors either: they end in a
//! non-converged [`Termination`](super::shooting_bvp::Termination) that the
//! caller must check.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShootingError {
    /// Invalid discretization request
    #[error("Domain error: {0}")]
    DomainError(String),
    /// Supplied bracket does not straddle the far-field target
    #[error(
        "Invalid bracket [{lo}, {hi}]: residuals {residual_lo:?} and {residual_hi:?} do not change sign"
    )]
    InvalidBracket {
        lo: f64,
        hi: f64,
        residual_lo: Option<f64>,
        residual_hi: Option<f64>,
    },
    /// Automatic bracket search gave up
    #[error("Bracket not found in [{min}, {max}]: {reason}")]
    BracketNotFound { min: f64, max: f64, reason: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
