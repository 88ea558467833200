//! helpers to check analytical model derivatives in unit tests

use crate::array::IntoArray;
use crate::model::{Evaluate, ParametricModel};

pub mod differentiation;

use differentiation::central_difference_gradient;

/// Numerically calculate the derivatives of the (single) model output with respect to
/// every parameter, at the scalar input position `position`.
pub fn numerical_parameter_gradient(model: &ParametricModel, position: &[f64]) -> Vec<f64> {
    let inputs: Vec<_> = position.iter().map(|x| x.into_array()).collect();
    let mut perturbed = model.clone();
    central_difference_gradient(
        |values| {
            perturbed
                .set_parameters(values)
                .expect("parameter count must match");
            perturbed
                .evaluate(&inputs)
                .expect("model evaluation must succeed")[0]
                .sum()
        },
        &model.parameters(),
    )
}

/// The analytical derivatives of the model output with respect to every parameter,
/// at the scalar input position `position`.
pub fn analytical_parameter_gradient(model: &ParametricModel, position: &[f64]) -> Vec<f64> {
    let inputs: Vec<_> = position.iter().map(|x| x.into_array()).collect();
    model
        .fit_deriv(&inputs)
        .expect("model must have analytical derivatives")
        .expect("derivative evaluation must succeed")
        .iter()
        .map(|deriv| deriv.sum())
        .collect()
}
