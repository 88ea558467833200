use approx::assert_relative_eq;
use modelfit::array::grid::linspace;
use modelfit::fitting::{optimizer_available, FitError, LevMarFitter};
use modelfit::prelude::*;
use modelfit::serialization::{from_bytes, to_bytes};
use shared_test_code::{add_noise, uniform_noise};
use std::f64::consts::PI;

mod composite_models;
mod fit_result_tests;
mod fittable_models;

/// A sine with analytical derivatives, created the way a user would define their own model
fn sine_model() -> ParametricModel {
    ParametricModelBuilder::new("SineModel")
        .parameters(&[("amplitude", 4.), ("frequency", 1.)])
        .function_1d(|x, p| p[0] * (2. * PI * p[1] * x).sin())
        .fit_deriv_1d(|x, p, d| {
            d[0] = (2. * PI * p[1] * x).sin();
            d[1] = 2. * PI * x * p[0] * (2. * PI * p[1] * x).cos();
        })
        .build()
        .expect("sine model must be valid")
}

#[test]
fn custom_model_takes_its_defaults_from_the_declaration() {
    let model = sine_model();
    assert_eq!(model.param_names(), vec!["amplitude", "frequency"]);
    assert_eq!(model.parameter("amplitude").unwrap().default_value(), 4.);
    assert_eq!(*model.parameter("amplitude").unwrap(), 4.);
    assert_eq!(*model.parameter("frequency").unwrap(), 1.);

    let model = sine_model()
        .with_value("amplitude", 2.)
        .unwrap()
        .with_value("frequency", 0.5)
        .unwrap();
    assert_eq!(*model.parameter("amplitude").unwrap(), 2.);
    assert_eq!(*model.parameter("frequency").unwrap(), 0.5);
    assert_eq!(model.parameter("amplitude").unwrap().default_value(), 4.);
}

#[test]
fn custom_model_evaluates_at_given_parameters() {
    let x = linspace(0., 4., 50).into_dyn();
    let mut model = sine_model();
    model.set_parameters(&[5., 2.]).unwrap();
    let y = model.eval1(x.clone()).unwrap();
    for (x, y) in x.iter().zip(y.iter()) {
        assert_relative_eq!(*y, 5. * (4. * PI * x).sin(), epsilon = 1e-12);
    }
    let derivatives = model.fit_deriv(&[x.clone()]).unwrap().unwrap();
    assert_eq!(derivatives.len(), 2);
    assert_eq!(derivatives[0].shape(), x.shape());
}

#[test]
#[cfg(feature = "levmar")]
fn custom_model_can_be_fitted_to_noisy_data() {
    let x = linspace(0., 4., 50).into_dyn();
    let model = sine_model();
    let data = add_noise(&model.eval1(x.clone()).unwrap(), &uniform_noise(50, 0));

    let fit = LevMarFitter::default().fit(&model, &[x.clone()], &data).unwrap();
    assert!(fit.was_successful(), "fit failed with {:?}", fit.info);
    // the seeded data determine the least squares solution to within 0.001
    let estimated = LevMarFitter::default()
        .with_estimate_jacobian(true)
        .fit(&model, &[x], &data)
        .unwrap();
    for name in ["amplitude", "frequency"] {
        let value = fit.model.parameter(name).unwrap().value();
        let other = estimated.model.parameter(name).unwrap().value();
        assert!((value - other).abs() < 1e-3, "{}: {} vs {}", name, value, other);
    }
    // and the solution lies within the statistical uncertainty of the true values
    let statistics = fit.statistics().unwrap();
    for (name, truth) in [("amplitude", 4.), ("frequency", 1.)] {
        let value = fit.model.parameter(name).unwrap().value();
        let error = statistics.standard_error(name).unwrap();
        assert!(error < 0.1, "{}: standard error {}", name, error);
        assert!(
            (value - truth).abs() < 3. * error,
            "{} = {} is not within {} of {}",
            name,
            value,
            3. * error,
            truth
        );
    }
    // the initial model is left untouched
    assert_eq!(model.parameters(), vec![4., 1.]);
}

#[test]
#[cfg(feature = "levmar")]
fn custom_model_recovers_known_parameters_from_noiseless_data() {
    let x = linspace(0., 4., 50).into_dyn();
    let data = sine_model().eval1(x.clone()).unwrap();
    let guess = sine_model()
        .with_value("amplitude", 3.5)
        .unwrap()
        .with_value("frequency", 1.02)
        .unwrap();

    let fit = LevMarFitter::default().fit(&guess, &[x], &data).unwrap();
    assert!(fit.was_successful(), "fit failed with {:?}", fit.info);
    assert!((fit.model.parameter("amplitude").unwrap().value() - 4.).abs() < 1e-3);
    assert!((fit.model.parameter("frequency").unwrap().value() - 1.).abs() < 1e-3);
}

#[test]
fn fitting_reports_a_missing_backend() {
    let x = linspace(0., 1., 10).into_dyn();
    let model = sine_model();
    let y = model.eval1(x.clone()).unwrap();
    let result = LevMarFitter::default().fit(&model, &[x], &y);
    if optimizer_available() {
        assert!(result.is_ok());
    } else {
        assert!(matches!(result, Err(FitError::BackendUnavailable)));
    }
}

#[test]
fn nested_composite_model_survives_serialization() {
    let mut p1 = modelfit::catalog::polynomial1d(3);
    p1.set_parameters(&[1., -0.5, 0.25, 0.1]).unwrap();
    let p11 = modelfit::catalog::polynomial1d(4);
    let g1 = modelfit::catalog::gaussian1d(10.3, 5.4, 1.2);
    let serial = SerialCompositeModel::new(vec![p1.into(), g1.into()]).unwrap();
    let parallel = Model::from(SummedCompositeModel::new(vec![serial.into(), p11.into()]).unwrap());

    let restored = from_bytes(&to_bytes(&parallel).unwrap()).unwrap();
    assert_eq!(restored.eval1(3.).unwrap(), parallel.eval1(3.).unwrap());
    assert_eq!(
        restored.eval1(vec![0., 1.5, 3.]).unwrap(),
        parallel.eval1(vec![0., 1.5, 3.]).unwrap()
    );
}

#[test]
fn parametric_model_repr() {
    let model = modelfit::catalog::gaussian1d(1., 2., 3.);
    assert_eq!(
        model.to_string(),
        "<Gaussian1D(amplitude=1.0, mean=2.0, stddev=3.0)>"
    );
}
