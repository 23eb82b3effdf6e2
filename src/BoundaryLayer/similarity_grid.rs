//! Uniform discretization of the similarity coordinate `eta` on `[0, eta_max]`.
use super::bl_error::ShootingError;
use nalgebra::DVector;

/// Ordered, strictly increasing grid of `n >= 2` points with uniform spacing
/// `deta = eta_max / (n - 1)`. The first point is exactly 0 and the last one
/// exactly `eta_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityGrid {
    eta: DVector<f64>,
    deta: f64,
}

impl SimilarityGrid {
    pub fn new(n: usize, eta_max: f64) -> Result<Self, ShootingError> {
        if n < 2 {
            return Err(ShootingError::DomainError(format!(
                "similarity grid needs at least 2 points, got {}",
                n
            )));
        }
        if !eta_max.is_finite() || eta_max <= 0.0 {
            return Err(ShootingError::DomainError(format!(
                "eta_max must be positive and finite, got {}",
                eta_max
            )));
        }
        let deta = eta_max / (n - 1) as f64;
        let mut eta = DVector::from_fn(n, |i, _| i as f64 * deta);
        // i * deta may round away from eta_max at the last node
        eta[n - 1] = eta_max;
        Ok(Self { eta, deta })
    }

    pub fn len(&self) -> usize {
        self.eta.len()
    }

    /// Always false: a grid holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.eta.is_empty()
    }

    pub fn deta(&self) -> f64 {
        self.deta
    }

    pub fn eta_max(&self) -> f64 {
        self.eta[self.eta.len() - 1]
    }

    pub fn points(&self) -> &DVector<f64> {
        &self.eta
    }
}
