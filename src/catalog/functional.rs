use crate::model::builder::ParametricModelBuilder;
use crate::model::errors::ModelError;
use crate::model::ParametricModel;
use std::f64::consts::PI;

/// One dimensional gaussian `A exp(-(x - mean)² / (2 stddev²))`.
pub fn gaussian1d(amplitude: f64, mean: f64, stddev: f64) -> ParametricModel {
    ParametricModelBuilder::new("Gaussian1D")
        .parameters(&[("amplitude", amplitude), ("mean", mean), ("stddev", stddev)])
        .function_1d(|x, p| {
            let (a, m, s) = (p[0], p[1], p[2]);
            a * (-(x - m).powi(2) / (2. * s * s)).exp()
        })
        .fit_deriv_1d(|x, p, d| {
            let (a, m, s) = (p[0], p[1], p[2]);
            let dx = x - m;
            let exp = (-dx * dx / (2. * s * s)).exp();
            d[0] = exp;
            d[1] = a * exp * dx / (s * s);
            d[2] = a * exp * dx * dx / (s * s * s);
        })
        .build_known()
}

/// One dimensional sine `A sin(2π f x)`.
pub fn sine1d(amplitude: f64, frequency: f64) -> ParametricModel {
    ParametricModelBuilder::new("Sine1D")
        .parameters(&[("amplitude", amplitude), ("frequency", frequency)])
        .function_1d(|x, p| p[0] * (2. * PI * p[1] * x).sin())
        .fit_deriv_1d(|x, p, d| {
            let phase = 2. * PI * p[1] * x;
            d[0] = phase.sin();
            d[1] = 2. * PI * x * p[0] * phase.cos();
        })
        .build_known()
}

/// Straight line `slope x + intercept`. The inverse exists for nonzero slopes.
pub fn linear1d(slope: f64, intercept: f64) -> ParametricModel {
    ParametricModelBuilder::new("Linear1D")
        .parameters(&[("slope", slope), ("intercept", intercept)])
        .function_1d(|x, p| p[0] * x + p[1])
        .fit_deriv_1d(|x, _, d| {
            d[0] = x;
            d[1] = 1.;
        })
        .inverse(|model| {
            let (slope, intercept) = (model.parameters[0].value(), model.parameters[1].value());
            if slope == 0. || model.n_models() != 1 {
                return Err(ModelError::NoInverse {
                    model: model.tag().to_string(),
                });
            }
            Ok(linear1d(1. / slope, -intercept / slope))
        })
        .build_known()
}

/// One dimensional Lorentz profile `A γ² / ((x - x_0)² + γ²)` with `γ = fwhm / 2`.
pub fn lorentz1d(amplitude: f64, x_0: f64, fwhm: f64) -> ParametricModel {
    ParametricModelBuilder::new("Lorentz1D")
        .parameters(&[("amplitude", amplitude), ("x_0", x_0), ("fwhm", fwhm)])
        .function_1d(|x, p| {
            let gamma = p[2] / 2.;
            p[0] * gamma * gamma / ((x - p[1]).powi(2) + gamma * gamma)
        })
        .fit_deriv_1d(|x, p, d| {
            let a = p[0];
            let gamma = p[2] / 2.;
            let dx = x - p[1];
            let denominator = dx * dx + gamma * gamma;
            d[0] = gamma * gamma / denominator;
            d[1] = 2. * a * gamma * gamma * dx / denominator.powi(2);
            d[2] = a * gamma * dx * dx / denominator.powi(2);
        })
        .build_known()
}

/// One dimensional constant
pub fn const1d(amplitude: f64) -> ParametricModel {
    ParametricModelBuilder::new("Const1D")
        .parameters(&[("amplitude", amplitude)])
        .function_1d(|_, p| p[0])
        .fit_deriv_1d(|_, _, d| d[0] = 1.)
        .build_known()
}

/// Two dimensional constant
pub fn const2d(amplitude: f64) -> ParametricModel {
    ParametricModelBuilder::new("Const2D")
        .parameters(&[("amplitude", amplitude)])
        .function_2d(|_, _, p| p[0])
        .fit_deriv_2d(|_, _, _, d| d[0] = 1.)
        .build_known()
}

/// Two dimensional gaussian with independent standard deviations along its principal
/// axes, which are rotated by `theta` (in radians) against the coordinate axes.
pub fn gaussian2d(
    amplitude: f64,
    x_mean: f64,
    y_mean: f64,
    x_stddev: f64,
    y_stddev: f64,
    theta: f64,
) -> ParametricModel {
    ParametricModelBuilder::new("Gaussian2D")
        .parameters(&[
            ("amplitude", amplitude),
            ("x_mean", x_mean),
            ("y_mean", y_mean),
            ("x_stddev", x_stddev),
            ("y_stddev", y_stddev),
            ("theta", theta),
        ])
        .function_2d(|x, y, p| {
            let coefficients = Gaussian2DCoefficients::new(p);
            p[0] * (-coefficients.exponent(x - p[1], y - p[2])).exp()
        })
        .fit_deriv_2d(|x, y, p, d| {
            let (sx, sy, theta) = (p[3], p[4], p[5]);
            let coefficients = Gaussian2DCoefficients::new(p);
            let (dx, dy) = (x - p[1], y - p[2]);
            let exp = (-coefficients.exponent(dx, dy)).exp();
            let value = p[0] * exp;

            let (sin, cos) = theta.sin_cos();
            let (sin2, cos2) = (2. * theta).sin_cos();
            let Gaussian2DCoefficients { a, b, c } = coefficients;

            d[0] = exp;
            d[1] = value * (2. * a * dx + b * dy);
            d[2] = value * (b * dx + 2. * c * dy);
            d[3] = value * (cos * cos * dx * dx + sin2 * dx * dy + sin * sin * dy * dy)
                / sx.powi(3);
            d[4] = value * (sin * sin * dx * dx - sin2 * dx * dy + cos * cos * dy * dy)
                / sy.powi(3);
            let da = sin2 * (1. / (2. * sy * sy) - 1. / (2. * sx * sx));
            let db = cos2 * (1. / (sx * sx) - 1. / (sy * sy));
            d[5] = -value * (da * dx * dx + db * dx * dy - da * dy * dy);
        })
        .build_known()
}

/// The quadratic form `a dx² + b dx dy + c dy²` in the exponent of a rotated gaussian.
struct Gaussian2DCoefficients {
    a: f64,
    b: f64,
    c: f64,
}

impl Gaussian2DCoefficients {
    fn new(p: &[f64]) -> Self {
        let (sx2, sy2, theta) = (p[3] * p[3], p[4] * p[4], p[5]);
        let (sin, cos) = theta.sin_cos();
        let sin2 = (2. * theta).sin();
        Self {
            a: cos * cos / (2. * sx2) + sin * sin / (2. * sy2),
            b: sin2 / (2. * sx2) - sin2 / (2. * sy2),
            c: sin * sin / (2. * sx2) + cos * cos / (2. * sy2),
        }
    }

    fn exponent(&self, dx: f64, dy: f64) -> f64 {
        self.a * dx * dx + self.b * dx * dy + self.c * dy * dy
    }
}
