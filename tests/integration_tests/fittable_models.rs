//! Checks every fittable catalog model against known values and runs it through the fitter.
//! The reference values and fit settings live in the shared test code.

#[cfg(feature = "levmar")]
use approx::{abs_diff_eq, relative_eq};
use modelfit::array::grid::{arange, mgrid};
use modelfit::model::Evaluate;
use ndarray::Array1;
use shared_test_code::all_close;
use shared_test_code::example_models::{models_1d, models_2d};

#[cfg(feature = "levmar")]
use modelfit::{
    array::grid::{linspace, logspace, meshgrid},
    array::Array,
    fitting::LevMarFitter,
    model::ParametricModel,
};
#[cfg(feature = "levmar")]
use shared_test_code::{add_noise, example_models::ExampleModel, gaussian_noise, uniform_noise};

const N: usize = 100;
const EVAL_ERROR: f64 = 1e-4;
#[cfg(feature = "levmar")]
const FIT_ERROR: f64 = 0.1;

#[cfg(feature = "levmar")]
fn sample(lim: (f64, f64), count: usize, log_fit: bool) -> Array1<f64> {
    if log_fit {
        logspace(lim.0, lim.1, count)
    } else {
        linspace(lim.0, lim.1, count)
    }
}

#[cfg(feature = "levmar")]
/// the flat coordinate grids over the fit ranges of a two dimensional example
fn grid_2d(example: &ExampleModel) -> (Array, Array) {
    let x = sample(example.x_lim, N, example.log_fit);
    let y = sample(example.y_lim, N, example.log_fit);
    let (xv, yv) = meshgrid(&x, &y);
    (xv.into_dyn(), yv.into_dyn())
}

/// parameters that are free in the model must agree with the expected values within `atol`,
/// fixed parameters must not have changed at all
#[cfg(feature = "levmar")]
fn assert_free_parameters_close(
    name: &str,
    fitted: &ParametricModel,
    expected: &[f64],
    atol: f64,
) {
    for (parameter, expected) in fitted.parameter_list().iter().zip(expected) {
        if parameter.is_fixed() {
            assert_eq!(parameter.value(), *expected, "{}: fixed {} changed", name, parameter.name());
        } else {
            assert!(
                abs_diff_eq!(parameter.value(), *expected, epsilon = atol),
                "{}: {} = {} but expected {}",
                name,
                parameter.name(),
                parameter.value(),
                expected
            );
        }
    }
}

#[cfg(feature = "levmar")]
fn skips_derivative_comparison(model: &ParametricModel) -> bool {
    !model.has_fit_deriv()
}

#[test]
fn one_dimensional_models_accept_all_input_types() {
    let (_, x2) = mgrid(10, 8);
    for example in models_1d() {
        let model = example.create_model(true);
        assert_eq!(model.eval1(5.3).unwrap().ndim(), 0, "{}", example.name);
        let x1 = arange(1., 10., 0.1);
        assert_eq!(model.eval1(&x1).unwrap().shape(), x1.shape(), "{}", example.name);
        assert_eq!(model.eval1(&x2).unwrap().shape(), &[10, 8], "{}", example.name);
    }
}

#[test]
fn two_dimensional_models_accept_all_input_types() {
    let (y2, x2) = mgrid(10, 8);
    for example in models_2d() {
        let model = example.create_model(true);
        assert_eq!(model.eval2(5.3, 6.7).unwrap()[0].ndim(), 0, "{}", example.name);
        let x1 = arange(1., 10., 0.1);
        let y1 = arange(1., 10., 0.1);
        assert_eq!(model.eval2(&x1, &y1).unwrap()[0].shape(), x1.shape(), "{}", example.name);
        assert_eq!(model.eval2(&x2, &y2).unwrap()[0].shape(), &[10, 8], "{}", example.name);
    }
}

#[test]
fn one_dimensional_models_evaluate_to_known_values() {
    for example in models_1d() {
        let model = example.create_model(true);
        let result = model.eval1(example.x_values.clone()).unwrap();
        let expected = Array1::from(example.y_values.clone()).into_dyn();
        assert!(
            all_close(&result, &expected, EVAL_ERROR),
            "{}: got {} but expected {}",
            example.name,
            result,
            expected
        );
    }
}

#[test]
fn two_dimensional_models_evaluate_to_known_values() {
    for example in models_2d() {
        let model = example.create_model(true);
        let result = model
            .eval2(example.x_values.clone(), example.y_values.clone())
            .unwrap()
            .remove(0);
        let expected = Array1::from(example.z_values.clone()).into_dyn();
        assert!(
            all_close(&result, &expected, EVAL_ERROR),
            "{}: got {} but expected {}",
            example.name,
            result,
            expected
        );
    }
}

#[test]
#[cfg(feature = "levmar")]
fn one_dimensional_models_can_be_fitted() {
    for example in models_1d() {
        let model = example.create_model(true);
        let x = sample(example.x_lim, N, example.log_fit).into_dyn();
        // one percent relative noise
        let noise = gaussian_noise(N, 0);
        let mut data = model.eval1(x.clone()).unwrap();
        data.iter_mut()
            .zip(noise.iter())
            .for_each(|(d, n)| *d *= 1. + 0.01 * n);

        let fit = LevMarFitter::default().fit(&model, &[x], &data).unwrap();
        assert_free_parameters_close(example.name, &fit.model, &example.parameters, FIT_ERROR);
    }
}

#[test]
#[cfg(feature = "levmar")]
fn two_dimensional_models_can_be_fitted() {
    for example in models_2d() {
        let model = example.create_model(true);
        let (xv, yv) = grid_2d(&example);
        // noise of ten percent of the amplitude
        let noise: Vec<f64> = uniform_noise(N * N, 0)
            .into_iter()
            .map(|n| 0.1 * example.parameters[0] * n)
            .collect();
        let clean = model.eval2(xv.clone(), yv.clone()).unwrap().remove(0);
        let data = add_noise(&clean, &noise);

        let fit = LevMarFitter::default().fit(&model, &[xv, yv], &data).unwrap();
        assert_free_parameters_close(example.name, &fit.model, &example.parameters, FIT_ERROR);
    }
}

#[test]
#[cfg(feature = "levmar")]
fn one_dimensional_analytical_and_estimated_jacobians_give_the_same_fit() {
    for example in models_1d() {
        let model = example.create_deriv_model();
        if skips_derivative_comparison(&model) {
            continue;
        }
        let x = sample(example.x_lim, N, example.log_fit).into_dyn();
        let noise: Vec<f64> = uniform_noise(N, 1234567890)
            .into_iter()
            .map(|n| 0.1 * example.parameters[0] * n)
            .collect();
        let data = add_noise(&model.eval1(x.clone()).unwrap(), &noise);
        let inputs = [x];

        let with_deriv = LevMarFitter::default().fit(&model, &inputs, &data).unwrap();
        let no_deriv = LevMarFitter::default()
            .with_estimate_jacobian(true)
            .fit(&model, &inputs, &data)
            .unwrap();
        for (a, b) in with_deriv
            .model
            .parameters()
            .iter()
            .zip(no_deriv.model.parameters().iter())
        {
            assert!(
                abs_diff_eq!(a, b, epsilon = 0.1),
                "{}: analytical {} vs estimated {}",
                example.name,
                a,
                b
            );
        }
    }
}

#[test]
#[cfg(feature = "levmar")]
fn two_dimensional_analytical_and_estimated_jacobians_give_the_same_fit() {
    for example in models_2d() {
        let model = example.create_deriv_model();
        if skips_derivative_comparison(&model) {
            continue;
        }
        let (xv, yv) = grid_2d(&example);
        let noise: Vec<f64> = uniform_noise(N * N, 1234567890)
            .into_iter()
            .map(|n| 0.1 * example.parameters[0] * n)
            .collect();
        let clean = model.eval2(xv.clone(), yv.clone()).unwrap().remove(0);
        let data = add_noise(&clean, &noise);
        let inputs = [xv, yv];

        let with_deriv = LevMarFitter::default().fit(&model, &inputs, &data).unwrap();
        let no_deriv = LevMarFitter::default()
            .with_estimate_jacobian(true)
            .fit(&model, &inputs, &data)
            .unwrap();
        for (a, b) in with_deriv
            .model
            .parameters()
            .iter()
            .zip(no_deriv.model.parameters().iter())
        {
            assert!(
                relative_eq!(a, b, epsilon = 0., max_relative = 0.1),
                "{}: analytical {} vs estimated {}",
                example.name,
                a,
                b
            );
        }
    }
}
