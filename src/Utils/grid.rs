//! # Time grids and dense output
//!
//! Adaptive IVP solvers return the solution on their own (accepted step) mesh.
//! To compare two solvers point by point both results are brought onto the
//! same uniform grid with cubic Hermite interpolation. Node slopes are taken
//! from the right-hand side itself, so the interpolant has the same local
//! order as the dense output of a Runge-Kutta scheme and reproduces cubic
//! polynomials exactly.
use RustedSciThe::symbolic::utils::linspace as rst_linspace;
use nalgebra::{DMatrix, DVector};

/// `n` uniformly spaced points over `[start, end]`, both ends included.
/// The last point is set to `end` exactly.
pub fn linspace(start: f64, end: f64, n: usize) -> DVector<f64> {
    match n {
        0 => DVector::zeros(0),
        1 => DVector::from_element(1, start),
        _ => {
            let mut points = rst_linspace(start, end, n);
            points[n - 1] = end;
            DVector::from_vec(points)
        }
    }
}

/// Resamples a solution given on the mesh `t_raw` (rows of `y_raw` are time
/// points, columns are variables) onto `grid`.
///
/// `rhs(t, y)` must return dy/dt. Mesh points with zero spacing are skipped;
/// grid points outside the mesh are extrapolated from the nearest interval.
/// Returns `None` if the mesh has fewer than two distinct points.
pub fn hermite_resample<F>(
    t_raw: &DVector<f64>,
    y_raw: &DMatrix<f64>,
    rhs: F,
    grid: &DVector<f64>,
) -> Option<DMatrix<f64>>
where
    F: Fn(f64, &[f64]) -> Vec<f64>,
{
    let ncols = y_raw.ncols();
    // drop repeated abscissas (solvers sometimes store the last point twice)
    let mut nodes: Vec<(f64, Vec<f64>)> = Vec::with_capacity(t_raw.len());
    for (i, &t) in t_raw.iter().enumerate() {
        if let Some((t_prev, _)) = nodes.last() {
            if t <= *t_prev {
                continue;
            }
        }
        let y: Vec<f64> = y_raw.row(i).iter().cloned().collect();
        nodes.push((t, y));
    }
    if nodes.len() < 2 {
        return None;
    }
    let slopes: Vec<Vec<f64>> = nodes.iter().map(|(t, y)| rhs(*t, y)).collect();

    let mut result = DMatrix::zeros(grid.len(), ncols);
    let mut k = 0;
    for (row, &t) in grid.iter().enumerate() {
        // grid is sorted, so the interval index only moves forward
        while k + 2 < nodes.len() && t > nodes[k + 1].0 {
            k += 1;
        }
        let (t0, y0) = &nodes[k];
        let (t1, y1) = &nodes[k + 1];
        let h = t1 - t0;
        let s = (t - t0) / h;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        for j in 0..ncols {
            result[(row, j)] = h00 * y0[j]
                + h10 * h * slopes[k][j]
                + h01 * y1[j]
                + h11 * h * slopes[k + 1][j];
        }
    }
    Some(result)
}
