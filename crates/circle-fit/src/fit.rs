//! Entry points: validate input, run the algebraic fit, optionally
//! refine.

use nalgebra::{Point2, RealField};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::circle::CircleFit;
use crate::cloud::{CloudError, PointCloud};
use crate::hyper::hyper_fit;
use crate::params::GeometricParams;
use crate::refine::refine;

/// Algebraic (Hyperfit) circle fit of a point slice.
///
/// Empty input yields the zeroed `ok = false` result; any other input
/// produces `ok = true`, with geometric degeneracy surfacing as
/// non-finite values.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(n = points.len()))
)]
pub fn fit<F: RealField + Copy>(points: &[Point2<F>]) -> CircleFit<F> {
    match PointCloud::from_points(points) {
        Ok(cloud) => hyper_fit(&cloud),
        Err(err) => rejected(err),
    }
}

/// Algebraic (Hyperfit) circle fit of parallel coordinate slices.
///
/// Empty or length-mismatched slices yield the zeroed `ok = false`
/// result.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(n = xs.len()))
)]
pub fn fit_xy<F: RealField + Copy>(xs: &[F], ys: &[F]) -> CircleFit<F> {
    match PointCloud::from_xy(xs, ys) {
        Ok(cloud) => hyper_fit(&cloud),
        Err(err) => rejected(err),
    }
}

/// Algebraic fit followed by geometric (Levenberg-Marquardt) refinement
/// of a point slice.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(n = points.len()))
)]
pub fn fit_geometric<F: RealField + Copy>(
    points: &[Point2<F>],
    params: &GeometricParams<F>,
) -> CircleFit<F> {
    match PointCloud::from_points(points) {
        Ok(cloud) => {
            let guess = hyper_fit(&cloud);
            refine(&cloud, &guess.circle, params)
        }
        Err(err) => rejected(err),
    }
}

/// Algebraic fit followed by geometric refinement of parallel coordinate
/// slices.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(n = xs.len()))
)]
pub fn fit_geometric_xy<F: RealField + Copy>(
    xs: &[F],
    ys: &[F],
    params: &GeometricParams<F>,
) -> CircleFit<F> {
    match PointCloud::from_xy(xs, ys) {
        Ok(cloud) => {
            let guess = hyper_fit(&cloud);
            refine(&cloud, &guess.circle, params)
        }
        Err(err) => rejected(err),
    }
}

fn rejected<F: RealField + Copy>(err: CloudError) -> CircleFit<F> {
    log::debug!("circle fit rejected: {}", err);
    CircleFit::invalid()
}
