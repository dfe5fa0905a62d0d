//
// Coordinate grids
//
// Evenly-spaced samples and co-shaped coordinate matrices, following
// numpy's linspace/meshgrid conventions: in a meshgrid, rows follow
// the second axis and columns the first.
//

use anyhow::{ensure, Result};
use nalgebra::base::DMatrix;

// n evenly-spaced values from start to end inclusive. The end point is
// set exactly, rather than accumulated.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

// Returns (xss, yss), each of shape ys.len() x xs.len(), with
// xss[(r, c)] = xs[c] and yss[(r, c)] = ys[r].
pub fn meshgrid(xs: &[f64], ys: &[f64]) -> (DMatrix<f64>, DMatrix<f64>) {
    let (rows, cols) = (ys.len(), xs.len());
    let xss = DMatrix::from_fn(rows, cols, |_, c| xs[c]);
    let yss = DMatrix::from_fn(rows, cols, |r, _| ys[r]);
    (xss, yss)
}

// Apply a binary function elementwise over two co-shaped matrices.
pub fn zip_map<F: Fn(f64, f64) -> f64>(
    lhs: &DMatrix<f64>,
    rhs: &DMatrix<f64>,
    f: F,
) -> Result<DMatrix<f64>> {
    ensure!(
        lhs.shape() == rhs.shape(),
        "Grid shapes do not match ({:?} vs. {:?})",
        lhs.shape(),
        rhs.shape()
    );
    Ok(lhs.zip_map(rhs, f))
}
