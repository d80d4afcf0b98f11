//! Circle fitting for 2D point clouds.
//!
//! The pipeline has two stages. [`fit()`] runs the algebraic "Hyperfit"
//! estimator of Al-Sharadqah and Chernov: centered moments, a quartic
//! characteristic polynomial and a short Newton search for its root.
//! [`fit_geometric()`] follows it with a damped Gauss-Newton
//! (Levenberg-Marquardt) refinement of the true geometric distance.
//!
//! Both stages are pure functions over the input points and are generic
//! over the scalar (`f32` or `f64`). Structurally invalid input (empty or
//! mismatched slices) yields a zeroed result with `ok = false`; geometric
//! degeneracy (collinear points, too few distinct points) propagates as
//! non-finite values with `ok = true` and is left to the caller to detect
//! via [`Circle::is_finite`].
//!
//! ```
//! use circle_fit::{fit_geometric, GeometricParams};
//! use nalgebra::Point2;
//!
//! let points: Vec<Point2<f64>> = (0..16)
//!     .map(|k| {
//!         let t = k as f64 * std::f64::consts::TAU / 16.0;
//!         Point2::new(4.0 + 2.5 * t.cos(), -1.0 + 2.5 * t.sin())
//!     })
//!     .collect();
//!
//! let fit = fit_geometric(&points, &GeometricParams::default());
//! assert!(fit.ok);
//! assert!((fit.circle.r - 2.5).abs() < 1e-9);
//! ```

mod circle;
mod cloud;
mod fit;
mod hyper;
mod logger;
mod params;
mod refine;
mod residual;

pub use circle::{Circle, CircleFit, FitStatus};
pub use cloud::{CloudError, PointCloud};
pub use fit::{fit, fit_geometric, fit_geometric_xy, fit_xy};
pub use hyper::hyper_fit;
pub use params::GeometricParams;
pub use refine::refine;
pub use residual::residual_variance;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init, init_with_level};

use nalgebra::RealField;

/// Convert a literal constant into the working scalar type.
pub(crate) fn real<F: RealField>(v: f64) -> F {
    F::from_f64(v).unwrap()
}
