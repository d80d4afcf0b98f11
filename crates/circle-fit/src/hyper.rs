//! Algebraic circle estimation ("Hyperfit", Al-Sharadqah and Chernov).

use nalgebra::RealField;

use crate::circle::{Circle, CircleFit, FitStatus};
use crate::cloud::PointCloud;
use crate::real;
use crate::residual::residual_variance;

/// Hard cap on the Newton search over the characteristic polynomial. The
/// root sits near zero and a handful of steps is typical; the cap only
/// bounds degenerate input.
const NEWTON_MAX_ITERS: usize = 100;

/// Algebraically consistent circle estimate from centered moments.
///
/// The estimator minimizes an algebraic distance whose leading bias term
/// vanishes, which makes it accurate on full circles and arcs alike and
/// a strong initial guess for [`refine`](crate::refine()). The work is one
/// pass of moment accumulation, a short Newton search on the quartic
/// characteristic polynomial and a closed-form back-substitution.
///
/// Degenerate clouds (collinear, or fewer than three distinct points)
/// yield non-finite circle parameters with `ok = true`; see
/// [`Circle::is_finite`].
pub fn hyper_fit<F: RealField + Copy>(cloud: &PointCloud<F>) -> CircleFit<F> {
    let n = real::<F>(cloud.len() as f64);
    let centroid = cloud.centroid();
    let two = real::<F>(2.0);
    let three = real::<F>(3.0);
    let four = real::<F>(4.0);
    let sixteen = real::<F>(16.0);

    let mut mxx = F::zero();
    let mut myy = F::zero();
    let mut mxy = F::zero();
    let mut mxz = F::zero();
    let mut myz = F::zero();
    let mut mzz = F::zero();
    for (&px, &py) in cloud.xs().iter().zip(cloud.ys()) {
        let x = px - centroid.x;
        let y = py - centroid.y;
        let z = x * x + y * y;
        mxy += x * y;
        mxx += x * x;
        myy += y * y;
        mxz += x * z;
        myz += y * z;
        mzz += z * z;
    }
    mxx /= n;
    myy /= n;
    mxy /= n;
    mxz /= n;
    myz /= n;
    mzz /= n;

    let mz = mxx + myy;
    let cov_xy = mxx * myy - mxy * mxy;
    let var_z = mzz - mz * mz;

    let a2 = four * cov_xy - three * mz * mz - mzz;
    let a1 = var_z * mz + four * cov_xy * mz - mxz * mxz - myz * myz;
    let a0 = mxz * (mxz * myy - myz * mxy) + myz * (myz * mxx - mxz * mxy) - var_z * cov_xy;
    let a22 = a2 + a2;

    // Newton search for the rightmost root near zero. Stops on a stalled
    // or non-finite step and whenever the polynomial value stops
    // shrinking.
    let mut x = F::zero();
    let mut y = a0;
    let mut iters = 0;
    while iters < NEWTON_MAX_ITERS {
        let dy = a1 + x * (a22 + sixteen * x * x);
        let x_new = x - y / dy;
        if x_new == x || !x_new.is_finite() {
            break;
        }
        let y_new = a0 + x_new * (a1 + x_new * (a2 + four * x_new * x_new));
        if y_new.abs() >= y.abs() {
            break;
        }
        x = x_new;
        y = y_new;
        iters += 1;
    }

    let det = x * x - x * mz + cov_xy;
    let xc = (mxz * (myy - x) - myz * mxy) / det / two;
    let yc = (myz * (mxx - x) - mxz * mxy) / det / two;
    let r = (xc * xc + yc * yc + mz - x - x).sqrt();

    let circle = Circle::new(xc + centroid.x, yc + centroid.y, r);
    let sigma = residual_variance(cloud, &circle);

    CircleFit {
        circle,
        sigma,
        grad_norm: F::zero(),
        outer_iters: 0,
        inner_iters: iters,
        ok: true,
        status: FitStatus::Algebraic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_exact_circle() {
        let truth = Circle::new(5.0, 5.0, 10.0);
        let cloud = PointCloud::from_points(&truth.sample_points(8)).unwrap();
        let fit = hyper_fit(&cloud);
        assert!(fit.ok);
        assert_eq!(fit.status, FitStatus::Algebraic);
        assert_relative_eq!(fit.circle.cx, 5.0, max_relative = 1e-6);
        assert_relative_eq!(fit.circle.cy, 5.0, max_relative = 1e-6);
        assert_relative_eq!(fit.circle.r, 10.0, max_relative = 1e-6);
        assert!(fit.sigma < 1e-20);
        assert_eq!(fit.outer_iters, 0);
    }

    #[test]
    fn recovers_from_quarter_arc() {
        let truth = Circle::new(-2.0, 7.0, 4.0);
        let points: Vec<_> = (0..12)
            .map(|k| {
                let t = k as f64 * std::f64::consts::FRAC_PI_2 / 11.0;
                nalgebra::Point2::new(truth.cx + truth.r * t.cos(), truth.cy + truth.r * t.sin())
            })
            .collect();
        let cloud = PointCloud::from_points(&points).unwrap();
        let fit = hyper_fit(&cloud);
        assert_relative_eq!(fit.circle.cx, truth.cx, max_relative = 1e-6);
        assert_relative_eq!(fit.circle.cy, truth.cy, max_relative = 1e-6);
        assert_relative_eq!(fit.circle.r, truth.r, max_relative = 1e-6);
    }

    #[test]
    fn offset_data_stays_conditioned() {
        // Centering on the centroid keeps the moments small even when
        // the data sits far from the origin.
        let truth = Circle::new(1000.0, -2000.0, 3.0);
        let cloud = PointCloud::from_points(&truth.sample_points(20)).unwrap();
        let fit = hyper_fit(&cloud);
        assert_relative_eq!(fit.circle.cx, truth.cx, max_relative = 1e-9);
        assert_relative_eq!(fit.circle.cy, truth.cy, max_relative = 1e-9);
        assert_relative_eq!(fit.circle.r, truth.r, max_relative = 1e-9);
    }

    #[test]
    fn collinear_points_go_non_finite() {
        let cloud = PointCloud::from_xy(&[0.0, 1.0, 2.0], &[0.0, 0.0, 0.0]).unwrap();
        let fit = hyper_fit(&cloud);
        assert!(fit.ok, "degeneracy is not an input error");
        assert!(!fit.circle.is_finite());
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        for (xs, ys) in [
            (vec![1.0], vec![1.0]),
            (vec![1.0, 1.0], vec![1.0, 1.0]),
            (vec![2.0, 2.0, 2.0, 2.0], vec![-1.0, -1.0, -1.0, -1.0]),
            (vec![0.0, 5.0], vec![0.0, 5.0]),
        ] {
            let cloud = PointCloud::from_xy(&xs, &ys).unwrap();
            let fit = hyper_fit(&cloud);
            assert!(fit.ok);
        }
    }

    #[test]
    fn single_precision_recovery() {
        let truth = Circle::<f32>::new(5.0, 5.0, 10.0);
        let cloud = PointCloud::from_points(&truth.sample_points(16)).unwrap();
        let fit = hyper_fit(&cloud);
        assert_relative_eq!(fit.circle.cx, 5.0f32, epsilon = 0.05);
        assert_relative_eq!(fit.circle.cy, 5.0f32, epsilon = 0.05);
        assert_relative_eq!(fit.circle.r, 10.0f32, epsilon = 0.05);
    }
}
