//! Evenly spread points on the unit sphere.

use nalgebra::DMatrix;
use std::f64::consts::PI;

/// Generate `n` points on the unit sphere using a golden-section spiral.
///
/// Points are returned one per row (n × 3). Successive points step down
/// the `y` axis in equal increments while rotating by the golden angle,
/// which spreads them roughly uniformly over the surface.
pub fn sphere_points(n: usize) -> DMatrix<f64> {
    let mut points = DMatrix::zeros(n, 3);
    if n == 0 {
        return points;
    }

    let increment = PI * (3.0 - 5.0_f64.sqrt());
    let offset = 2.0 / n as f64;

    for k in 0..n {
        let y = k as f64 * offset - 1.0 + offset / 2.0;
        let r = (1.0 - y * y).max(0.0).sqrt();
        let phi = k as f64 * increment;
        points[(k, 0)] = phi.cos() * r;
        points[(k, 1)] = y;
        points[(k, 2)] = phi.sin() * r;
    }

    points
}
