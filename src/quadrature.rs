//
// Numerical line integrals
//
// The brute-force counterpart to Phantom::projection_value: sample the
// image along each line and integrate with the trapezoid rule. Much
// slower and less accurate, but it only relies on image_value, so it's
// a good cross-check on the closed form.
//

use anyhow::{ensure, Result};
use itertools::Itertools;

use crate::grid::{linspace, meshgrid};
use crate::phantom::Phantom;

// Trapezoid-rule integral of values sampled at abscissae ts.
pub fn trapezoid(values: &[f64], ts: &[f64]) -> Result<f64> {
    ensure!(
        values.len() == ts.len(),
        "Sample count does not match abscissa count ({} vs. {})",
        values.len(),
        ts.len()
    );

    Ok(values
        .iter()
        .zip(ts.iter())
        .tuple_windows()
        .map(|((v0, t0), (v1, t1))| (t1 - t0) * (v0 + v1) / 2.0)
        .sum())
}

// Point on the line (p, phi) at parameter t along it.
pub fn line_point(p: f64, phi: f64, t: f64) -> (f64, f64) {
    let (c, s) = (phi.cos(), phi.sin());
    (c * p - s * t, s * p + c * t)
}

// Integrate the image along the line (p, phi), for t in -extent..extent.
pub fn numerical_projection(
    phantom: &Phantom,
    p: f64,
    phi: f64,
    extent: f64,
    samples: usize,
) -> Result<f64> {
    ensure!(samples >= 2, "Need at least 2 samples along a line, got {}", samples);

    let ts = linspace(-extent, extent, samples);
    let values = ts
        .iter()
        .map(|&t| {
            let (x, y) = line_point(p, phi, t);
            phantom.image_value(x, y)
        })
        .collect::<Vec<_>>();
    trapezoid(&values, &ts)
}

// As numerical_projection, for many offsets at one angle. Builds the
// whole (p, t) grid at once, one column per offset.
pub fn numerical_projections(
    phantom: &Phantom,
    ps: &[f64],
    phi: f64,
    extent: f64,
    samples: usize,
) -> Result<Vec<f64>> {
    ensure!(samples >= 2, "Need at least 2 samples along a line, got {}", samples);

    let ts = linspace(-extent, extent, samples);
    let (pss, tss) = meshgrid(ps, &ts);
    let (c, s) = (phi.cos(), phi.sin());
    let xss = pss.zip_map(&tss, |p, t| c * p - s * t);
    let yss = pss.zip_map(&tss, |p, t| s * p + c * t);
    let fss = phantom.image_grid(&xss, &yss)?;

    fss.column_iter()
        .map(|column| trapezoid(&column.iter().copied().collect::<Vec<_>>(), &ts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_trapezoid() {
        // Exact for straight lines.
        let ts = linspace(0.0, 2.0, 5);
        let values = ts.iter().map(|t| 3.0 * t + 1.0).collect::<Vec<_>>();
        assert!((trapezoid(&values, &ts).unwrap() - 8.0).abs() < 1e-12);

        // Close for a parabola.
        let ts = linspace(-1.0, 1.0, 1001);
        let values = ts.iter().map(|t| t * t).collect::<Vec<_>>();
        assert!((trapezoid(&values, &ts).unwrap() - 2.0 / 3.0).abs() < 1e-5);

        assert_eq!(trapezoid(&[1.0], &[0.0]).unwrap(), 0.0);
        assert!(trapezoid(&[1.0, 2.0], &[0.0]).is_err());
    }

    #[test]
    fn test_line_point() {
        // phi = 0 is the vertical line x = p.
        let (x, y) = line_point(0.3, 0.0, 0.5);
        assert!((x - 0.3).abs() < 1e-15);
        assert!((y - 0.5).abs() < 1e-15);

        // Every point on the line is at distance p along the normal.
        let (p, phi) = (0.4, 1.1f64);
        for &t in &[-1.0, 0.0, 0.7] {
            let (x, y) = line_point(p, phi, t);
            assert!((x * phi.cos() + y * phi.sin() - p).abs() < 1e-12);
        }
    }

    #[test]
    fn test_numerical_matches_analytic() {
        let ph = Phantom::new();
        for &phi in &[0.0, 0.6, PI / 2.0, 2.2] {
            for &p in &[-0.8, -0.3, 0.0, 0.25, 0.6] {
                let numerical = numerical_projection(&ph, p, phi, 1.0, 2001).unwrap();
                let analytic = ph.projection_value(p, phi);
                assert!((numerical - analytic).abs() < 0.01);
            }
        }
    }

    #[test]
    fn test_grid_matches_single_lines() {
        let ph = Phantom::new();
        let ps = linspace(-0.9, 0.9, 13);
        let phi = 0.8;
        let by_grid = numerical_projections(&ph, &ps, phi, 1.0, 101).unwrap();
        for (p, v) in ps.iter().zip(by_grid.iter()) {
            let single = numerical_projection(&ph, *p, phi, 1.0, 101).unwrap();
            assert!((single - v).abs() < 1e-12);
        }
    }

    #[test]
    fn test_too_few_samples() {
        let ph = Phantom::new();
        assert!(numerical_projection(&ph, 0.0, 0.0, 1.0, 1).is_err());
        assert!(numerical_projections(&ph, &[0.0], 0.0, 1.0, 0).is_err());
    }
}
