use crate::model::builder::ParametricModelBuilder;
use crate::model::{ModelKind, ParametricModel};

/// Power series `Σ c_i x^i` of the given degree. All coefficients `c0 ... c{degree}` are zero.
pub fn polynomial1d(degree: usize) -> ParametricModel {
    let names: Vec<(String, f64)> = (0..=degree).map(|i| (format!("c{}", i), 0.)).collect();
    ParametricModelBuilder::new("Polynomial1D")
        .kind(ModelKind::Polynomial)
        .hyper_parameters(&[degree])
        .parameters(&names)
        .function_1d(|x, p| p.iter().rev().fold(0., |acc, c| acc * x + c))
        .fit_deriv_1d(|x, _, d| {
            let mut power = 1.;
            for deriv in d.iter_mut() {
                *deriv = power;
                power *= x;
            }
        })
        .build_known()
}

/// Two dimensional power series `Σ c_i_j x^i y^j` with `i + j <= degree`.
///
/// The coefficients are ordered as the pure `x` terms `c0_0 ... c{degree}_0`, then the
/// pure `y` terms `c0_1 ... c0_{degree}`, then the mixed terms. All coefficients are zero.
pub fn polynomial2d(degree: usize) -> ParametricModel {
    let exponents = polynomial2d_exponents(degree);
    let names: Vec<(String, f64)> = exponents
        .iter()
        .map(|(i, j)| (format!("c{}_{}", i, j), 0.))
        .collect();
    let derivative_exponents = exponents.clone();
    ParametricModelBuilder::new("Polynomial2D")
        .kind(ModelKind::Polynomial)
        .hyper_parameters(&[degree])
        .parameters(&names)
        .function_2d(move |x, y, p| {
            exponents
                .iter()
                .zip(p)
                .map(|(&(i, j), c)| c * x.powi(i as i32) * y.powi(j as i32))
                .sum()
        })
        .fit_deriv_2d(move |x, y, _, d| {
            for (deriv, &(i, j)) in d.iter_mut().zip(derivative_exponents.iter()) {
                *deriv = x.powi(i as i32) * y.powi(j as i32);
            }
        })
        .build_known()
}

fn polynomial2d_exponents(degree: usize) -> Vec<(usize, usize)> {
    let mut exponents: Vec<(usize, usize)> = (0..=degree).map(|i| (i, 0)).collect();
    exponents.extend((1..=degree).map(|j| (0, j)));
    for i in 1..degree {
        for j in 1..degree {
            if i + j <= degree {
                exponents.push((i, j));
            }
        }
    }
    exponents
}

/// Chebyshev series `Σ c_i T_i(x)` of the given degree. All coefficients are zero.
pub fn chebyshev1d(degree: usize) -> ParametricModel {
    let names: Vec<(String, f64)> = (0..=degree).map(|i| (format!("c{}", i), 0.)).collect();
    ParametricModelBuilder::new("Chebyshev1D")
        .kind(ModelKind::OrthogonalPolynomial)
        .hyper_parameters(&[degree])
        .parameters(&names)
        .function_1d(move |x, p| {
            let mut basis = vec![0.; degree + 1];
            chebyshev_basis(x, &mut basis);
            basis.iter().zip(p).map(|(t, c)| t * c).sum()
        })
        .fit_deriv_1d(|x, _, d| chebyshev_basis(x, d))
        .build_known()
}

/// Two dimensional Chebyshev series `Σ c_i_j T_i(x) T_j(y)`.
///
/// The coefficients `c{i}_{j}` are ordered with the `x` degree `i` running fastest.
pub fn chebyshev2d(x_degree: usize, y_degree: usize) -> ParametricModel {
    let names: Vec<(String, f64)> = (0..=y_degree)
        .flat_map(|j| (0..=x_degree).map(move |i| (format!("c{}_{}", i, j), 0.)))
        .collect();
    ParametricModelBuilder::new("Chebyshev2D")
        .kind(ModelKind::OrthogonalPolynomial)
        .hyper_parameters(&[x_degree, y_degree])
        .parameters(&names)
        .function_2d(move |x, y, p| {
            let mut tx = vec![0.; x_degree + 1];
            let mut ty = vec![0.; y_degree + 1];
            chebyshev_basis(x, &mut tx);
            chebyshev_basis(y, &mut ty);
            ty.iter()
                .flat_map(|ty| tx.iter().map(move |tx| tx * ty))
                .zip(p)
                .map(|(t, c)| t * c)
                .sum()
        })
        .fit_deriv_2d(move |x, y, _, d| {
            let mut tx = vec![0.; x_degree + 1];
            let mut ty = vec![0.; y_degree + 1];
            chebyshev_basis(x, &mut tx);
            chebyshev_basis(y, &mut ty);
            let products = ty.iter().flat_map(|ty| tx.iter().map(move |tx| tx * ty));
            for (deriv, t) in d.iter_mut().zip(products) {
                *deriv = t;
            }
        })
        .build_known()
}

/// Write the Chebyshev polynomials `T_0(x) ... T_{n-1}(x)` into the slice of length `n`.
fn chebyshev_basis(x: f64, basis: &mut [f64]) {
    for k in 0..basis.len() {
        basis[k] = match k {
            0 => 1.,
            1 => x,
            _ => 2. * x * basis[k - 1] - basis[k - 2],
        };
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chebyshev_basis_follows_the_recurrence() {
        let mut basis = [0.; 5];
        chebyshev_basis(0.5, &mut basis);
        // T_n(cos θ) = cos(nθ) with θ = π/3
        let expected = [1., 0.5, -0.5, -1., -0.5];
        for (value, expected) in basis.iter().zip(expected) {
            assert!((value - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn polynomial2d_exponents_are_ordered_like_the_coefficient_names() {
        assert_eq!(
            polynomial2d_exponents(2),
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (0, 2), (1, 1)]
        );
        assert_eq!(polynomial2d_exponents(3).len(), 10);
    }
}
