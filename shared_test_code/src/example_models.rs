use modelfit::catalog::{
    chebyshev1d, chebyshev2d, const1d, const2d, gaussian1d, gaussian2d, linear1d, lorentz1d, polynomial1d,
    polynomial2d, sine1d,
};
use modelfit::model::ParametricModel;
use std::f64::consts::{PI, SQRT_2};

/// A catalog model together with known values and the settings to fit it.
#[derive(Debug, Clone)]
pub struct ExampleModel {
    /// tag of the model
    pub name: &'static str,
    /// create the model from its parameter values
    pub create: fn(&[f64]) -> ParametricModel,
    /// the parameter values of the reference model
    pub parameters: Vec<f64>,
    /// parameter values used instead of `parameters` when comparing analytical and
    /// numerical derivatives
    pub deriv_initial: Option<Vec<f64>>,
    /// parameters that are fixed when the constraints are used
    pub fixed: Vec<&'static str>,
    /// first input positions with known outputs
    pub x_values: Vec<f64>,
    /// second input positions of two dimensional models, otherwise the known outputs
    pub y_values: Vec<f64>,
    /// the known outputs of two dimensional models
    pub z_values: Vec<f64>,
    /// range of the first input used for fitting
    pub x_lim: (f64, f64),
    /// range of the second input used for fitting
    pub y_lim: (f64, f64),
    /// whether the ranges are decimal exponents rather than values
    pub log_fit: bool,
}

impl ExampleModel {
    /// The reference model. If `use_constraints` is true, the parameters in
    /// `fixed` are fixed.
    pub fn create_model(&self, use_constraints: bool) -> ParametricModel {
        let mut model = (self.create)(&self.parameters);
        if use_constraints {
            for name in &self.fixed {
                model
                    .set_fixed(name, true)
                    .expect("constrained parameter must exist");
            }
        }
        model
    }

    /// the unconstrained model used for comparing derivatives
    pub fn create_deriv_model(&self) -> ParametricModel {
        match &self.deriv_initial {
            Some(parameters) => (self.create)(parameters),
            None => self.create_model(false),
        }
    }
}

fn with_coefficients(mut model: ParametricModel, coefficients: &[f64]) -> ParametricModel {
    model
        .set_parameters(coefficients)
        .expect("coefficients must match the degree");
    model
}

/// the one dimensional models of the catalog that can be fitted
pub fn models_1d() -> Vec<ExampleModel> {
    vec![
        ExampleModel {
            name: "Gaussian1D",
            create: |p| gaussian1d(p[0], p[1], p[2]),
            parameters: vec![1., 0., 1.],
            deriv_initial: None,
            fixed: vec!["stddev"],
            x_values: vec![0., SQRT_2, -SQRT_2],
            y_values: vec![1.0, 0.367879, 0.367879],
            z_values: vec![],
            x_lim: (-10., 10.),
            y_lim: (-10., 10.),
            log_fit: false,
        },
        ExampleModel {
            name: "Sine1D",
            create: |p| sine1d(p[0], p[1]),
            parameters: vec![1., 0.1],
            deriv_initial: None,
            fixed: vec![],
            x_values: vec![0., 2.5],
            y_values: vec![0., 1.],
            z_values: vec![],
            x_lim: (-10., 10.),
            y_lim: (-10., 10.),
            log_fit: false,
        },
        ExampleModel {
            name: "Linear1D",
            create: |p| linear1d(p[0], p[1]),
            parameters: vec![1., 0.],
            deriv_initial: None,
            fixed: vec![],
            x_values: vec![0., PI, 42., -1.],
            y_values: vec![0., PI, 42., -1.],
            z_values: vec![],
            x_lim: (-10., 10.),
            y_lim: (-10., 10.),
            log_fit: false,
        },
        ExampleModel {
            name: "Lorentz1D",
            create: |p| lorentz1d(p[0], p[1], p[2]),
            parameters: vec![1., 0., 1.],
            deriv_initial: None,
            fixed: vec![],
            x_values: vec![0., -1., 1., 0.5, -0.5],
            y_values: vec![1., 0.2, 0.2, 0.5, 0.5],
            z_values: vec![],
            x_lim: (-10., 10.),
            y_lim: (-10., 10.),
            log_fit: false,
        },
        ExampleModel {
            name: "Const1D",
            create: |p| const1d(p[0]),
            parameters: vec![1.],
            deriv_initial: None,
            fixed: vec![],
            x_values: vec![-1., 1.],
            y_values: vec![1., 1.],
            z_values: vec![],
            x_lim: (-10., 10.),
            y_lim: (-10., 10.),
            log_fit: false,
        },
        ExampleModel {
            name: "Polynomial1D",
            create: |p| with_coefficients(polynomial1d(2), p),
            parameters: vec![1., 1., 1.],
            deriv_initial: None,
            fixed: vec![],
            x_values: vec![1., 10., 100.],
            y_values: vec![3., 111., 10101.],
            z_values: vec![],
            x_lim: (-3., 3.),
            y_lim: (-3., 3.),
            log_fit: false,
        },
        ExampleModel {
            name: "Chebyshev1D",
            create: |p| with_coefficients(chebyshev1d(2), p),
            parameters: vec![1., 1., 1.],
            deriv_initial: None,
            fixed: vec![],
            x_values: vec![1., 10., 100.],
            y_values: vec![3., 210., 20100.],
            z_values: vec![],
            x_lim: (-3., 3.),
            y_lim: (-3., 3.),
            log_fit: false,
        },
    ]
}

/// the two dimensional models of the catalog that can be fitted
pub fn models_2d() -> Vec<ExampleModel> {
    vec![
        ExampleModel {
            name: "Gaussian2D",
            create: |p| gaussian2d(p[0], p[1], p[2], p[3], p[4], p[5]),
            parameters: vec![1., 0., 0., 1., 1., 0.],
            deriv_initial: Some(vec![10., 5., 5., 4., 4., 0.5]),
            fixed: vec!["theta"],
            x_values: vec![0., SQRT_2, -SQRT_2],
            y_values: vec![0., SQRT_2, -SQRT_2],
            z_values: vec![1., (-2f64).exp(), (-2f64).exp()],
            x_lim: (-10., 10.),
            y_lim: (-10., 10.),
            log_fit: false,
        },
        ExampleModel {
            name: "Const2D",
            create: |p| const2d(p[0]),
            parameters: vec![1.],
            deriv_initial: None,
            fixed: vec![],
            x_values: vec![-1., 1.],
            y_values: vec![0., 2.],
            z_values: vec![1., 1.],
            x_lim: (-10., 10.),
            y_lim: (-10., 10.),
            log_fit: false,
        },
        ExampleModel {
            name: "Polynomial2D",
            create: |p| with_coefficients(polynomial2d(1), p),
            parameters: vec![1., 1., 1.],
            deriv_initial: None,
            fixed: vec![],
            x_values: vec![1., 2., 3.],
            y_values: vec![1., 3., 2.],
            z_values: vec![3., 6., 6.],
            x_lim: (1., 100.),
            y_lim: (1., 100.),
            log_fit: false,
        },
        ExampleModel {
            name: "Chebyshev2D",
            create: |p| with_coefficients(chebyshev2d(1, 1), p),
            parameters: vec![1., 1., 1., 1.],
            deriv_initial: None,
            fixed: vec![],
            x_values: vec![1., 2., 3.],
            y_values: vec![1., 3., 2.],
            z_values: vec![4., 12., 12.],
            x_lim: (-3., 3.),
            y_lim: (-3., 3.),
            log_fit: false,
        },
    ]
}
