//! Residual variance of a circle estimate over a cloud.

use nalgebra::RealField;

use crate::circle::Circle;
use crate::cloud::PointCloud;
use crate::real;

/// Centers within this box use the direct formulation; beyond it the
/// rotated-frame form takes over to avoid catastrophic cancellation.
const NEAR_CENTER: f64 = 10.0;

/// Mean squared deviation of the point distances from their own mean,
/// measured against the center of `circle`.
///
/// Only the center enters the computation; the effective radius is
/// re-estimated from the distances themselves. The refinement uses this
/// value as its acceptance merit, and it doubles as a standalone
/// goodness-of-fit diagnostic. Non-finite centers propagate to a
/// non-finite result.
pub fn residual_variance<F: RealField + Copy>(cloud: &PointCloud<F>, circle: &Circle<F>) -> F {
    let near = real::<F>(NEAR_CENTER);
    if circle.cx.abs() < near && circle.cy.abs() < near {
        variance_direct(cloud, circle)
    } else {
        variance_rotated(cloud, circle)
    }
}

/// Two-pass direct form: distances, their mean, squared deviations.
fn variance_direct<F: RealField + Copy>(cloud: &PointCloud<F>, circle: &Circle<F>) -> F {
    let n = real::<F>(cloud.len() as f64);

    let mut sum = F::zero();
    for (&x, &y) in cloud.xs().iter().zip(cloud.ys()) {
        let dx = x - circle.cx;
        let dy = y - circle.cy;
        sum += (dx * dx + dy * dy).sqrt();
    }
    let radius = sum / n;

    let mut sum = F::zero();
    for (&x, &y) in cloud.xs().iter().zip(cloud.ys()) {
        let dx = x - circle.cx;
        let dy = y - circle.cy;
        let dev = (dx * dx + dy * dy).sqrt() - radius;
        sum += dev * dev;
    }
    sum / n
}

/// Rotated-frame form for far-away centers.
///
/// Works in the frame centered on the cloud centroid with the first axis
/// pointing at the circle center. The `t / (1 + sqrt(1 + del * t))`
/// kernel evaluates the small difference between two large quantities
/// without cancellation; the result is algebraically identical to the
/// direct form.
fn variance_rotated<F: RealField + Copy>(cloud: &PointCloud<F>, circle: &Circle<F>) -> F {
    let n = real::<F>(cloud.len() as f64);
    let one = F::one();
    let two = real::<F>(2.0);
    let centroid = cloud.centroid();

    let a0 = circle.cx - centroid.x;
    let b0 = circle.cy - centroid.y;
    let del = one / (a0 * a0 + b0 * b0).sqrt();
    let sin_a = b0 * del;
    let cos_a = a0 * del;

    let mut w = F::zero();
    let mut z = F::zero();
    for (&px, &py) in cloud.xs().iter().zip(cloud.ys()) {
        let x = px - centroid.x;
        let y = py - centroid.y;
        let zi = x * x + y * y;
        let p = x * cos_a + y * sin_a;
        let t = del * zi - two * p;
        let g = t / (one + (one + del * t).sqrt());
        w += (zi + p * g) / (two + del * g);
        z += zi;
    }
    let w = w / n;
    let z = z / n;

    z - w * (two + del * del * w)
}
