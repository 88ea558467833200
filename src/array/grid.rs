use ndarray::{Array1, Array2};
use num_traits::Float;

/// create an array holding `count` elements from the range `[first,last]` with linear
/// spacing (equivalent to matlab's or numpy's `linspace`). Both endpoints are included.
pub fn linspace<ScalarType: Float>(first: ScalarType, last: ScalarType, count: usize) -> Array1<ScalarType> {
    if count < 2 {
        return Array1::from_elem(count, first);
    }
    let Some(n_minus_one) = ScalarType::from(count - 1) else {
        return Array1::from_elem(count, first);
    };
    let step = (last - first) / n_minus_one;
    let mut lin: Array1<ScalarType> = (0..count)
        .map(|n| first + step * ScalarType::from(n).unwrap_or_else(ScalarType::zero))
        .collect();
    // make sure the last element is exact and not subject to rounding errors
    lin[count - 1] = last;
    lin
}

/// create an array holding `count` elements `$10^{e}$`, where the exponents `$e$` are linearly
/// spaced in `[start,stop]`.
pub fn logspace(start: f64, stop: f64, count: usize) -> Array1<f64> {
    linspace(start, stop, count).mapv(|exponent| 10f64.powf(exponent))
}

/// create the values `start, start+step, ...` which are strictly smaller than `stop`
pub fn arange(start: f64, stop: f64, step: f64) -> Array1<f64> {
    Array1::range(start, stop, step)
}

/// Coordinate matrices from two coordinate vectors.
///
/// Returns `(X, Y)`, both of shape `(y.len(), x.len())`, with `X[[i,j]] = x[j]` and
/// `Y[[i,j]] = y[i]`.
pub fn meshgrid(x: &Array1<f64>, y: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (y.len(), x.len());
    let xx = Array2::from_shape_fn(shape, |(_, j)| x[j]);
    let yy = Array2::from_shape_fn(shape, |(i, _)| y[i]);
    (xx, yy)
}

/// Dense integer index grids of the given shape.
///
/// Returns `(Y, X)` with `Y[[i,j]] = i` and `X[[i,j]] = j`, so the row index comes first.
pub fn mgrid(rows: usize, cols: usize) -> (Array2<f64>, Array2<f64>) {
    let yy = Array2::from_shape_fn((rows, cols), |(i, _)| i as f64);
    let xx = Array2::from_shape_fn((rows, cols), |(_, j)| j as f64);
    (yy, xx)
}
