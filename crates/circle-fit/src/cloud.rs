//! Point cloud input for the fitting routines.

use nalgebra::{Point2, RealField};
use thiserror::Error;

use crate::real;

/// Errors raised while assembling a [`PointCloud`].
#[derive(Error, Debug)]
pub enum CloudError {
    /// No points were provided.
    #[error("point cloud is empty")]
    Empty,
    /// Parallel coordinate slices disagree in length.
    #[error("coordinate slices differ in length ({xs} x values, {ys} y values)")]
    LengthMismatch { xs: usize, ys: usize },
}

/// An immutable cloud of 2D points with a cached centroid.
///
/// Construction validates the input, so a `PointCloud` is never empty and
/// its centroid is always current. The fitting routines center their
/// moment sums on the centroid, which keeps them well-conditioned for
/// data far from the origin.
#[derive(Clone, Debug)]
pub struct PointCloud<F> {
    xs: Vec<F>,
    ys: Vec<F>,
    mean_x: F,
    mean_y: F,
}

impl<F: RealField + Copy> PointCloud<F> {
    /// Build a cloud from a point slice.
    pub fn from_points(points: &[Point2<F>]) -> Result<Self, CloudError> {
        let xs = points.iter().map(|p| p.x).collect();
        let ys = points.iter().map(|p| p.y).collect();
        Self::from_vecs(xs, ys)
    }

    /// Build a cloud from parallel coordinate slices.
    pub fn from_xy(xs: &[F], ys: &[F]) -> Result<Self, CloudError> {
        if xs.len() != ys.len() {
            return Err(CloudError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        Self::from_vecs(xs.to_vec(), ys.to_vec())
    }

    fn from_vecs(xs: Vec<F>, ys: Vec<F>) -> Result<Self, CloudError> {
        if xs.is_empty() {
            return Err(CloudError::Empty);
        }
        let n = real::<F>(xs.len() as f64);
        let mut sum_x = F::zero();
        let mut sum_y = F::zero();
        for (&x, &y) in xs.iter().zip(&ys) {
            sum_x += x;
            sum_y += y;
        }
        Ok(Self {
            xs,
            ys,
            mean_x: sum_x / n,
            mean_y: sum_y / n,
        })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false; empty input is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// X coordinates.
    pub fn xs(&self) -> &[F] {
        &self.xs
    }

    /// Y coordinates.
    pub fn ys(&self) -> &[F] {
        &self.ys
    }

    /// Centroid of the cloud.
    pub fn centroid(&self) -> Point2<F> {
        Point2::new(self.mean_x, self.mean_y)
    }
}
