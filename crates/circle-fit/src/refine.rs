//! Geometric (Levenberg-Marquardt) refinement of a circle estimate.

use nalgebra::RealField;

use crate::circle::{Circle, CircleFit, FitStatus};
use crate::cloud::PointCloud;
use crate::params::GeometricParams;
use crate::real;
use crate::residual::residual_variance;

/// Minimize the geometric distance from `guess` by damped Gauss-Newton
/// over center and radius.
///
/// Each outer iteration linearizes at the last accepted estimate and
/// solves the damping-inflated 3x3 normal equations through a
/// specialized Cholesky factorization. A step is accepted only when it
/// strictly lowers the residual variance; a rejected attempt raises the
/// damping and retries. Outer iterations and rejected attempts share the
/// `max_iterations` budget.
///
/// Convergence returns the current estimate without applying the final
/// step, so feeding a converged result back in converges again in one
/// outer iteration. Divergence and budget exhaustion return the most
/// recent accepted estimate with the matching [`FitStatus`]; `ok` stays
/// true in all three cases.
pub fn refine<F: RealField + Copy>(
    cloud: &PointCloud<F>,
    guess: &Circle<F>,
    params: &GeometricParams<F>,
) -> CircleFit<F> {
    let n = real::<F>(cloud.len() as f64);
    let one = F::one();
    let centroid = cloud.centroid();

    let mut best = *guess;
    let mut best_sigma = residual_variance(cloud, &best);
    let mut grad_norm = F::zero();
    let mut lambda = params.lambda;
    let mut outer = 0;
    let mut inner = 0;

    'outer: for i in 1..=params.max_iterations {
        if inner >= params.max_iterations {
            break;
        }
        outer = i;

        // Moments of the unit vectors from the center to each point.
        let mut mu = F::zero();
        let mut mv = F::zero();
        let mut muu = F::zero();
        let mut mvv = F::zero();
        let mut muv = F::zero();
        let mut mr = F::zero();
        for (&px, &py) in cloud.xs().iter().zip(cloud.ys()) {
            let dx = px - best.cx;
            let dy = py - best.cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let u = dx / dist;
            let v = dy / dist;
            mu += u;
            mv += v;
            muu += u * u;
            mvv += v * v;
            muv += u * v;
            mr += dist;
        }
        mu /= n;
        mv /= n;
        muu /= n;
        mvv /= n;
        muv /= n;
        mr /= n;

        let f1 = best.cx + best.r * mu - centroid.x;
        let f2 = best.cy + best.r * mv - centroid.y;
        let f3 = best.r - mr;
        grad_norm = (f1 * f1 + f2 * f2 + f3 * f3).sqrt();

        loop {
            if inner >= params.max_iterations {
                break 'outer;
            }

            // Cholesky factor of the lambda-inflated normal matrix.
            let g11 = (muu + lambda).sqrt();
            let g12 = muv / g11;
            let g13 = mu / g11;
            let g22 = (mvv + lambda - g12 * g12).sqrt();
            let g23 = (mv - g12 * g13) / g22;
            let g33 = (one + lambda - g13 * g13 - g23 * g23).sqrt();

            let d1 = f1 / g11;
            let d2 = (f2 - g12 * d1) / g22;
            let d3 = (f3 - g13 * d1 - g23 * d2) / g33;

            let dr = d3 / g33;
            let dy = (d2 - g23 * dr) / g22;
            let dx = (d1 - g12 * dy - g13 * dr) / g11;

            if (dr.abs() + dx.abs() + dy.abs()) / (one + best.r) < params.epsilon {
                log::trace!("geometric refinement converged after {} outer iterations", i);
                return finish(best, best_sigma, grad_norm, i, inner, FitStatus::Converged);
            }

            let candidate = Circle::new(best.cx - dx, best.cy - dy, best.r - dr);
            if candidate.cx.abs() > params.center_limit || candidate.cy.abs() > params.center_limit
            {
                log::debug!("geometric refinement diverged at outer iteration {}", i);
                return finish(best, best_sigma, grad_norm, i, inner, FitStatus::Diverged);
            }

            if candidate.r <= F::zero() {
                lambda *= params.factor_up;
                inner += 1;
                continue;
            }

            let candidate_sigma = residual_variance(cloud, &candidate);
            if candidate_sigma < best_sigma {
                lambda *= params.factor_down;
                best = candidate;
                best_sigma = candidate_sigma;
                continue 'outer;
            }

            lambda *= params.factor_up;
            inner += 1;
        }
    }

    log::debug!(
        "geometric refinement stopped after {} outer iterations, {} rejected steps",
        outer,
        inner
    );
    finish(best, best_sigma, grad_norm, outer, inner, FitStatus::Exhausted)
}

fn finish<F: RealField + Copy>(
    circle: Circle<F>,
    sigma: F,
    grad_norm: F,
    outer: usize,
    inner: usize,
    status: FitStatus,
) -> CircleFit<F> {
    CircleFit {
        circle,
        sigma,
        grad_norm,
        outer_iters: outer,
        inner_iters: inner,
        ok: true,
        status,
    }
}
