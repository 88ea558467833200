use approx::assert_relative_eq;

/// Numerical derivative `$\partial f/\partial p (p_0)$` of a scalar function using
/// central finite differences with accuracy O(h⁶).
pub fn central_difference<Func>(mut f: Func, p0: f64) -> f64
where
    Func: FnMut(f64) -> f64,
{
    let h = f64::EPSILON.sqrt() * (1. + p0.abs());
    (-f(p0 - 3. * h) + 9. * f(p0 - 2. * h) - 45. * f(p0 - h) + 45. * f(p0 + h)
        - 9. * f(p0 + 2. * h)
        + f(p0 + 3. * h))
        / (60. * h)
}

/// Numerical gradient of a function of several parameters at `p0`, calculated
/// one parameter at a time with [`central_difference`].
pub fn central_difference_gradient<Func>(mut f: Func, p0: &[f64]) -> Vec<f64>
where
    Func: FnMut(&[f64]) -> f64,
{
    (0..p0.len())
        .map(|idx| {
            let mut p = p0.to_vec();
            central_difference(
                |value| {
                    p[idx] = value;
                    f(&p)
                },
                p0[idx],
            )
        })
        .collect()
}

#[test]
fn central_differences_match_known_derivatives() {
    // x*sin(x)+x^2*cos(x)
    let f = |x: f64| x * x.sin() + x.powi(2) * x.cos();
    let df = |x: f64| -x.powi(2) * x.sin() + x.sin() + 3. * x * x.cos();
    for x in [1., 2., 3., 5., 10.] {
        assert_relative_eq!(central_difference(f, x), df(x), epsilon = 1e-5);
    }

    // x² y + exp(y)
    let g = |p: &[f64]| p[0] * p[0] * p[1] + p[1].exp();
    let gradient = central_difference_gradient(g, &[1.5, -0.5]);
    assert_relative_eq!(gradient[0], 2. * 1.5 * -0.5, epsilon = 1e-6);
    assert_relative_eq!(gradient[1], 1.5 * 1.5 + (-0.5f64).exp(), epsilon = 1e-6);
}
