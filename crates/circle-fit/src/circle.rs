//! Fitted-circle geometry and fit diagnostics.

use std::fmt;

use nalgebra::{Point2, RealField};
use serde::{Deserialize, Serialize};

use crate::real;

/// A circle in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle<F> {
    /// Center x coordinate.
    pub cx: F,
    /// Center y coordinate.
    pub cy: F,
    /// Radius.
    pub r: F,
}

impl<F: RealField + Copy> Circle<F> {
    pub fn new(cx: F, cy: F, r: F) -> Self {
        Self { cx, cy, r }
    }

    /// True when all three parameters are finite.
    ///
    /// Degenerate input (collinear points, too few distinct points)
    /// propagates through the fit as NaN or infinity; this is the
    /// caller-side guard.
    pub fn is_finite(&self) -> bool {
        self.cx.is_finite() && self.cy.is_finite() && self.r.is_finite()
    }

    /// `n` evenly spaced points on the circle, starting at angle zero.
    pub fn sample_points(&self, n: usize) -> Vec<Point2<F>> {
        let step = F::two_pi() / real::<F>(n as f64);
        (0..n)
            .map(|k| {
                let t = step * real::<F>(k as f64);
                Point2::new(self.cx + self.r * t.cos(), self.cy + self.r * t.sin())
            })
            .collect()
    }
}

impl<F: fmt::Display> fmt::Display for Circle<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{x: {}, y: {}, r: {}}}", self.cx, self.cy, self.r)
    }
}

/// Outcome of a fitting call.
///
/// [`CircleFit::ok`] keeps the legacy meaning (false only for
/// structurally invalid input); the status separates the refinement
/// outcomes that flag folds together.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStatus {
    /// Algebraic estimate only; no geometric refinement was run.
    Algebraic,
    /// Refinement stopped on the relative step-size test.
    Converged,
    /// A tentative center flew past the divergence limit.
    Diverged,
    /// The iteration budget ran out before convergence.
    Exhausted,
    /// Input was empty or mismatched; the result carries no geometry.
    Invalid,
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FitStatus::Algebraic => "algebraic",
            FitStatus::Converged => "converged",
            FitStatus::Diverged => "diverged",
            FitStatus::Exhausted => "exhausted",
            FitStatus::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// A fitted circle plus the diagnostics of the run that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircleFit<F> {
    /// The fitted circle.
    pub circle: Circle<F>,
    /// Residual variance of the fit, the merit the refinement minimizes.
    pub sigma: F,
    /// Norm of the geometric residual vector at the refinement's last
    /// linearization point. Zero for algebraic-only fits.
    pub grad_norm: F,
    /// Outer refinement iterations performed; zero for algebraic-only
    /// fits.
    pub outer_iters: usize,
    /// Newton steps of the algebraic stage, or rejected damping attempts
    /// of the refinement.
    pub inner_iters: usize,
    /// Legacy success flag: false only when the input was structurally
    /// invalid. Degenerate geometry keeps `ok = true` with non-finite
    /// values; see `status` for how the run ended.
    pub ok: bool,
    /// What terminated the computation.
    pub status: FitStatus,
}

impl<F: RealField + Copy> CircleFit<F> {
    /// The zeroed result returned for structurally invalid input.
    pub fn invalid() -> Self {
        Self {
            circle: Circle::new(F::zero(), F::zero(), F::zero()),
            sigma: F::zero(),
            grad_norm: F::zero(),
            outer_iters: 0,
            inner_iters: 0,
            ok: false,
            status: FitStatus::Invalid,
        }
    }
}

impl<F: fmt::Display> fmt::Display for CircleFit<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{x: {}, y: {}, r: {}, sigma: {}, ok: {}, status: {}, i: {}, j: {}}}",
            self.circle.cx,
            self.circle.cy,
            self.circle.r,
            self.sigma,
            self.ok,
            self.status,
            self.outer_iters,
            self.inner_iters
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sampled_points_lie_on_the_circle() {
        let circle = Circle::new(3.0, -2.0, 5.0);
        let points = circle.sample_points(12);
        assert_eq!(points.len(), 12);
        for p in points {
            let d = ((p.x - 3.0f64).powi(2) + (p.y + 2.0).powi(2)).sqrt();
            assert_relative_eq!(d, 5.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn non_finite_parameters_are_flagged() {
        assert!(Circle::new(0.0, 0.0, 1.0).is_finite());
        assert!(!Circle::new(f64::NAN, 0.0, 1.0).is_finite());
        assert!(!Circle::new(0.0, 0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn display_is_compact() {
        let circle = Circle::new(1.5, 2.5, 3.5);
        assert_eq!(circle.to_string(), "{x: 1.5, y: 2.5, r: 3.5}");

        let fit = CircleFit {
            circle,
            sigma: 0.25,
            grad_norm: 0.0,
            outer_iters: 4,
            inner_iters: 1,
            ok: true,
            status: FitStatus::Converged,
        };
        let text = fit.to_string();
        assert!(text.contains("r: 3.5"));
        assert!(text.contains("status: converged"));
        assert!(text.contains("i: 4"));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&FitStatus::Exhausted).unwrap();
        assert_eq!(json, "\"exhausted\"");
        let back: FitStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FitStatus::Exhausted);
    }

    #[test]
    fn invalid_result_is_zeroed() {
        let fit = CircleFit::<f64>::invalid();
        assert!(!fit.ok);
        assert_eq!(fit.status, FitStatus::Invalid);
        assert_eq!(fit.circle, Circle::new(0.0, 0.0, 0.0));
        assert_eq!(fit.sigma, 0.0);
        assert_eq!(fit.outer_iters, 0);
    }
}
