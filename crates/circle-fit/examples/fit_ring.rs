use circle_fit::{fit, fit_geometric, Circle, GeometricParams};
use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    circle_fit::init_with_level(log::LevelFilter::Debug).expect("logger");

    // A ring of points with half a unit of coordinate jitter.
    let truth = Circle::new(120.0, -45.0, 37.5);
    let mut rng = StdRng::seed_from_u64(1);
    let points: Vec<Point2<f64>> = truth
        .sample_points(48)
        .into_iter()
        .map(|p| {
            Point2::new(
                p.x + rng.gen_range(-0.5..0.5),
                p.y + rng.gen_range(-0.5..0.5),
            )
        })
        .collect();

    let algebraic = fit(&points);
    println!("algebraic: {algebraic}");

    let geometric = fit_geometric(&points, &GeometricParams::default());
    println!("geometric: {geometric}");

    println!(
        "truth: {truth}, center error: {:.4}",
        ((geometric.circle.cx - truth.cx).powi(2) + (geometric.circle.cy - truth.cy).powi(2))
            .sqrt()
    );
}
