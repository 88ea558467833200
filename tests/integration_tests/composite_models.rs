//! Serial and summed composite models compared against evaluating their members by hand.

use approx::assert_abs_diff_eq;
use modelfit::array::grid::{linspace, mgrid};
use modelfit::array::Array;
use modelfit::catalog::{chebyshev2d, polynomial1d, polynomial2d, rotation2d, scale, shift};
use modelfit::prelude::*;

fn assert_arrays_almost_equal(actual: &Array, expected: &Array) {
    assert_eq!(actual.shape(), expected.shape());
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(a, e, epsilon = 1e-7);
    }
}

fn cubic(coefficients: &[f64]) -> ParametricModel {
    let mut model = polynomial1d(3);
    model.set_parameters(coefficients).unwrap();
    model
}

#[test]
fn serial_composite_of_polynomials_on_a_grid() {
    let (_, x) = mgrid(5, 5);
    let x = x.into_dyn();
    let p1 = cubic(&[0.5, 1., -0.2, 0.01]);
    let p11 = cubic(&[1., 0., 0.3, 0.]);
    let model = SerialCompositeModel::new(vec![p1.clone().into(), p11.clone().into()]).unwrap();
    let result = model.eval1(x.clone()).unwrap();
    let expected = p11.eval1(p1.eval1(x).unwrap()).unwrap();
    assert_arrays_almost_equal(&result, &expected);
}

#[test]
fn serial_composite_routes_a_two_dimensional_polynomial_into_a_channel() {
    let (y, x) = mgrid(5, 5);
    let (x, y) = (x.into_dyn(), y.into_dyn());
    let mut p2 = polynomial2d(3);
    p2.set_value("c0_0", 1.).unwrap();
    p2.set_value("c1_1", 0.5).unwrap();
    let p1 = cubic(&[0., 1., 0.1, 0.]);
    let model = Model::from(
        SerialCompositeModel::with_maps(
            vec![p2.clone().into(), p1.clone().into()],
            &[&["x", "y"], &["z"]],
            &[&["z"], &["z"]],
        )
        .unwrap(),
    );
    let input = LabeledInput::new(vec![x.clone(), y.clone()], ["x", "y"]).unwrap();
    let result = model.evaluate_labeled(&input).unwrap();

    let z = p2.eval2(x.clone(), y.clone()).unwrap().remove(0);
    let expected = p1.eval1(z).unwrap();
    assert_arrays_almost_equal(result.get("z").unwrap(), &expected);
    // the input channels are passed through
    assert_eq!(result.get("x").unwrap(), &x);
    assert_eq!(result.get("y").unwrap(), &y);
}

fn rotate_and_shift() -> Model {
    Model::from(
        SerialCompositeModel::with_maps(
            vec![rotation2d(23.4).into(), shift(-2.).into(), shift(1.2).into()],
            &[&["x", "y"], &["x"], &["y"]],
            &[&["x", "y"], &["x"], &["y"]],
        )
        .unwrap(),
    )
}

#[test]
fn serial_composite_shifts_channels_after_a_rotation() {
    let (y, x) = mgrid(5, 5);
    let (x, y) = (x.into_dyn(), y.into_dyn());
    let input = LabeledInput::new(vec![x.clone(), y.clone()], ["x", "y"]).unwrap();
    let result = rotate_and_shift().evaluate_labeled(&input).unwrap();

    let rotated = rotation2d(23.4).eval2(x, y).unwrap();
    let expected_x = shift(-2.).eval1(rotated[0].clone()).unwrap();
    let expected_y = shift(1.2).eval1(rotated[1].clone()).unwrap();
    assert_arrays_almost_equal(result.get("x").unwrap(), &expected_x);
    assert_arrays_almost_equal(result.get("y").unwrap(), &expected_y);
}

#[test]
fn serial_composite_shifts_scalar_channels_after_a_rotation() {
    let input = LabeledInput::new(vec![2f64.into_array(), 4.5f64.into_array()], ["x", "y"]).unwrap();
    let result = rotate_and_shift().evaluate_labeled(&input).unwrap();

    let rotated = rotation2d(23.4).eval2(2., 4.5).unwrap();
    let expected_x = shift(-2.).eval1(rotated[0].clone()).unwrap();
    let expected_y = shift(1.2).eval1(rotated[1].clone()).unwrap();
    assert_arrays_almost_equal(result.get("x").unwrap(), &expected_x);
    assert_arrays_almost_equal(result.get("y").unwrap(), &expected_y);
}

#[test]
fn inverse_of_serial_composite_restores_the_inputs() {
    let (y, x) = mgrid(5, 5);
    let (x, y) = (x.into_dyn(), y.into_dyn());
    let rotation = Model::from(rotation2d(-60.));
    let model = Model::from(SerialCompositeModel::new(vec![rotation.clone(), rotation]).unwrap());
    let rotated = model.eval2(x.clone(), y.clone()).unwrap();
    let restored = model.inverse().unwrap().evaluate(&rotated).unwrap();
    assert_arrays_almost_equal(&restored[0], &x);
    assert_arrays_almost_equal(&restored[1], &y);
}

#[test]
fn summed_composite_adds_the_member_outputs() {
    let x = linspace(1., 10., 100).into_dyn();
    let p1 = cubic(&[1.4, 2.2, 3.1, 4.]);
    let p11 = polynomial1d(3);
    let model = SummedCompositeModel::new(vec![p1.clone().into(), p11.clone().into()]).unwrap();
    let result = model.eval1(x.clone()).unwrap();
    let expected = p1.eval1(x.clone()).unwrap() + p11.eval1(x).unwrap();
    assert_arrays_almost_equal(&result, &expected);
}

#[test]
fn summed_composite_reads_and_writes_channels() {
    let x = linspace(1., 10., 100).into_dyn();
    let y = linspace(1., 10., 100).into_dyn();
    let p1 = cubic(&[1.4, 2.2, 3.1, 4.]);
    let p11 = scale(2.);
    let model = Model::from(
        SummedCompositeModel::with_maps(vec![p1.clone().into(), p11.clone().into()], &["x"], &["x"])
            .unwrap(),
    );
    let input = LabeledInput::new(vec![x.clone(), y.clone()], ["x", "y"]).unwrap();
    let result = model.evaluate_labeled(&input).unwrap();
    let expected = p1.eval1(x.clone()).unwrap() + p11.eval1(x).unwrap();
    assert_arrays_almost_equal(result.get("x").unwrap(), &expected);
    assert_eq!(result.get("y").unwrap(), &y);
}

#[test]
fn summed_composite_rejects_models_with_different_arity() {
    // two inputs but only one output
    let members: Vec<Model> = vec![polynomial2d(1).into(), chebyshev2d(1, 1).into()];
    assert!(SummedCompositeModel::new(members).is_err());
}
