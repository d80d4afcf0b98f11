//! Tuning for the geometric refinement stage.

use nalgebra::RealField;
use serde::{Deserialize, Serialize};

use crate::real;

/// Damping and termination controls for [`refine`](crate::refine()).
///
/// The defaults are a proven tuning for pixel-scale data; every field can
/// be overridden independently.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GeometricParams<F> {
    /// Initial Levenberg-Marquardt damping factor.
    pub lambda: F,
    /// Multiplier applied to the damping after a rejected step.
    pub factor_up: F,
    /// Multiplier applied to the damping after an accepted step.
    pub factor_down: F,
    /// Divergence guard: a tentative center whose coordinate magnitude
    /// exceeds this aborts the refinement.
    pub center_limit: F,
    /// Relative step-size threshold that declares convergence.
    pub epsilon: F,
    /// Shared budget for outer iterations and rejected damping attempts.
    pub max_iterations: usize,
}

impl<F: RealField + Copy> Default for GeometricParams<F> {
    fn default() -> Self {
        Self {
            lambda: real(0.2),
            factor_up: real(10.0),
            factor_down: real(0.04),
            center_limit: real(1.0e6),
            epsilon: real(3.0e-8),
            max_iterations: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let params = GeometricParams::<f64>::default();
        assert_eq!(params.lambda, 0.2);
        assert_eq!(params.factor_up, 10.0);
        assert_eq!(params.factor_down, 0.04);
        assert_eq!(params.center_limit, 1.0e6);
        assert_eq!(params.epsilon, 3.0e-8);
        assert_eq!(params.max_iterations, 100);
    }

    #[test]
    fn json_round_trip_preserves_overrides() {
        let params = GeometricParams::<f64> {
            epsilon: 1.0e-5,
            max_iterations: 25,
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: GeometricParams<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.epsilon, 1.0e-5);
        assert_eq!(back.max_iterations, 25);
        assert_eq!(back.lambda, params.lambda);
    }
}
