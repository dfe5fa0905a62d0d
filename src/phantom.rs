//
// The Shepp-Logan phantom
//
// Ten overlapping ellipses making up a simplified head cross-section:
// skull, brain, two tilted ventricles and a handful of small
// features. Image values are the sum of the intensity steps of every
// ellipse containing a point, which means the projection of the whole
// phantom is the sum of each ellipse's closed-form projection.
//

use anyhow::{bail, Result};
use nalgebra::base::DMatrix;

use crate::ellipse::Ellipse;
use crate::grid;

pub const NUM_ELLIPSES: usize = 10;

// Tilt of the two ventricles, in degrees.
const VENTRICLE_TILT_DEG: f64 = 18.0;

// (x0, y0), (a, b), rotation in degrees, delta intensity.
const ELLIPSES: [((f64, f64), (f64, f64), f64, f64); NUM_ELLIPSES] = [
    ((0.0, 0.0), (0.69, 0.92), 0.0, 2.00),
    ((0.0, -0.0184), (0.6624, 0.874), 0.0, -0.98),
    ((0.22, 0.0), (0.11, 0.31), -VENTRICLE_TILT_DEG, -0.02),
    ((-0.22, 0.0), (0.16, 0.41), VENTRICLE_TILT_DEG, -0.02),
    ((0.0, 0.35), (0.21, 0.25), 0.0, 0.01),
    ((0.0, 0.1), (0.046, 0.046), 0.0, 0.01),
    ((0.0, -0.1), (0.046, 0.046), 0.0, 0.01),
    ((-0.08, -0.605), (0.023, 0.046), 0.0, 0.01),
    ((0.0, -0.605), (0.023, 0.023), 0.0, 0.01),
    ((0.06, -0.605), (0.023, 0.046), 0.0, 0.01),
];

#[derive(Clone, Debug)]
pub struct Phantom {
    ellipses: [Ellipse; NUM_ELLIPSES],
}

impl Default for Phantom {
    fn default() -> Self {
        Phantom::new()
    }
}

impl Phantom {
    pub fn new() -> Phantom {
        // Degrees are converted as deg * pi / 180, in that order, so the
        // ventricles' cos/sin are reproducible.
        let ellipses = ELLIPSES.map(|(centre, axes, rotation_deg, delta)| {
            Ellipse::new(centre, axes, rotation_deg * std::f64::consts::PI / 180.0, delta)
        });
        Phantom { ellipses }
    }

    pub fn ellipses(&self) -> &[Ellipse] {
        &self.ellipses
    }

    // Phantom intensity at (x, y).
    pub fn image_value(&self, x: f64, y: f64) -> f64 {
        self.ellipses
            .iter()
            .fold(0.0, |acc, e| acc + e.image_contribution(x, y))
    }

    // Exact line integral of image_value along the line with normal
    // angle phi at signed offset p from the origin.
    pub fn projection_value(&self, p: f64, phi: f64) -> f64 {
        self.ellipses
            .iter()
            .fold(0.0, |acc, e| acc + e.projection_contribution(p, phi))
    }

    pub fn image_values(&self, xs: &[f64], ys: &[f64]) -> Result<Vec<f64>> {
        broadcast(xs, ys, |x, y| self.image_value(x, y))
    }

    pub fn projection_values(&self, ps: &[f64], phis: &[f64]) -> Result<Vec<f64>> {
        broadcast(ps, phis, |p, phi| self.projection_value(p, phi))
    }

    pub fn image_grid(&self, xss: &DMatrix<f64>, yss: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        grid::zip_map(xss, yss, |x, y| self.image_value(x, y))
    }

    pub fn projection_grid(
        &self,
        pss: &DMatrix<f64>,
        phiss: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>> {
        grid::zip_map(pss, phiss, |p, phi| self.projection_value(p, phi))
    }
}

// One-dimensional broadcasting: equal lengths pair up, and a
// single-element side is repeated against the other.
fn broadcast<F: Fn(f64, f64) -> f64>(lhs: &[f64], rhs: &[f64], f: F) -> Result<Vec<f64>> {
    Ok(match (lhs.len(), rhs.len()) {
        (l, r) if l == r => lhs.iter().zip(rhs.iter()).map(|(&a, &b)| f(a, b)).collect(),
        (1, _) => rhs.iter().map(|&b| f(lhs[0], b)).collect(),
        (_, 1) => lhs.iter().map(|&a| f(a, rhs[0])).collect(),
        (l, r) => bail!("Cannot broadcast arrays of length {} and {}", l, r),
    })
}
