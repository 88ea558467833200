//! Integration tests for the FitResult and its accessors.
//! These tests focus on the fitted model, the best fit values and the statistics,
//! as well as on the errors for problems that can not be fitted.

use modelfit::array::grid::linspace;
use modelfit::catalog::{gaussian1d, linear1d, rotation2d};
use modelfit::fitting::{FitError, FitProblemBuilderError, LevMarFitter};
use modelfit::prelude::*;

#[test]
#[cfg(feature = "levmar")]
fn fit_result_provides_fitted_model_best_fit_and_statistics() {
    use approx::assert_relative_eq;
    use shared_test_code::{add_noise, gaussian_noise};

    let x = linspace(-5., 5., 200).into_dyn();
    let truth = gaussian1d(3., 0.7, 1.3);
    let noise: Vec<f64> = gaussian_noise(200, 42).iter().map(|n| 0.01 * n).collect();
    let y = add_noise(&truth.eval1(x.clone()).unwrap(), &noise);

    let fit = LevMarFitter::default()
        .fit(&gaussian1d(2., 0., 1.), &[x.clone()], &y)
        .unwrap();
    assert!(fit.was_successful(), "fit failed with {:?}", fit.info);
    assert!(fit.info.evaluations > 0);

    let fitted = fit.free_parameters();
    assert_eq!(fitted, fit.model.parameters());
    for (fitted, expected) in fitted.iter().zip(truth.parameters().iter()) {
        assert_relative_eq!(fitted, expected, epsilon = 1e-2);
    }

    let best_fit = fit.best_fit().unwrap();
    assert_eq!(best_fit, fit.model.eval1(x).unwrap());

    let statistics = fit.statistics().unwrap();
    assert_eq!(statistics.degrees_of_freedom(), 197);
    assert_eq!(statistics.parameter_names(), &["amplitude", "mean", "stddev"]);
    // the noise has a standard deviation of 0.01
    assert_relative_eq!(statistics.regression_standard_error(), 0.01, max_relative = 0.2);
    let radius = statistics.confidence_radius(0.95).unwrap();
    for (fitted, expected, radius) in fitted
        .iter()
        .zip(truth.parameters().iter())
        .zip(radius.iter())
        .map(|((f, e), r)| (f, e, r))
    {
        // generous margin so the check is not sensitive to the realization of the noise
        assert!((fitted - expected).abs() < 3. * radius);
    }
}

#[test]
fn fitting_invalid_problems_gives_errors() {
    let x = linspace(0., 1., 10).into_dyn();
    let y = linear1d(1., 0.).eval1(x.clone()).unwrap();
    let fitter = LevMarFitter::default();

    let two_outputs = fitter.fit(&rotation2d(10.), &[x.clone(), x.clone()], &y);
    let wrong_inputs = fitter.fit(&linear1d(1., 0.), &[x.clone(), x.clone()], &y);
    let all_fixed = linear1d(1., 0.)
        .with_fixed("slope")
        .unwrap()
        .with_fixed("intercept")
        .unwrap();
    let nothing_to_fit = fitter.fit(&all_fixed, &[x.clone()], &y);
    let short_y = linear1d(1., 0.).eval1(vec![0., 1., 2.]).unwrap();
    let mismatched = fitter.fit(&linear1d(1., 0.), &[x], &short_y);

    if !modelfit::fitting::optimizer_available() {
        assert!(matches!(two_outputs, Err(FitError::BackendUnavailable)));
        return;
    }
    assert!(matches!(
        two_outputs,
        Err(FitError::Problem(FitProblemBuilderError::MultipleOutputs { .. }))
    ));
    assert!(matches!(
        wrong_inputs,
        Err(FitError::Problem(FitProblemBuilderError::InputCountMismatch { .. }))
    ));
    assert!(matches!(
        nothing_to_fit,
        Err(FitError::Problem(FitProblemBuilderError::NoFreeParameters { .. }))
    ));
    assert!(matches!(
        mismatched,
        Err(FitError::Problem(FitProblemBuilderError::ObservationShapeMismatch { .. }))
    ));
}
