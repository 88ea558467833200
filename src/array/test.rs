use super::grid::*;
use super::*;
use approx::assert_relative_eq;
use assert_matches::assert_matches;
use ndarray::{array, Array2};

#[test]
fn broadcast_shape_follows_trailing_axis_rules() {
    assert_eq!(broadcast_shape(&[]).unwrap(), Vec::<usize>::new());
    assert_eq!(broadcast_shape(&[&[], &[3]]).unwrap(), vec![3]);
    assert_eq!(broadcast_shape(&[&[2, 1], &[3]]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shape(&[&[4, 1, 5], &[2, 1], &[1]]).unwrap(), vec![4, 2, 5]);
    assert_eq!(broadcast_shape(&[&[0], &[1]]).unwrap(), vec![0]);
}

#[test]
fn broadcast_shape_fails_for_incompatible_shapes() {
    assert_matches!(
        broadcast_shape(&[&[2], &[3]]),
        Err(ModelError::IncompatibleShapes { shapes }) if shapes == vec![vec![2], vec![3]]
    );
    assert_matches!(
        broadcast_shape(&[&[10, 8], &[90]]),
        Err(ModelError::IncompatibleShapes { .. })
    );
}

#[test]
fn conversions_produce_arrays_of_the_expected_dimension() {
    assert_eq!(2.5f64.into_array().ndim(), 0);
    assert_eq!(vec![1f64, 2.].into_array().shape(), &[2]);
    assert_eq!([1f64, 2., 3.].into_array().shape(), &[3]);
    assert_eq!((&[1f64, 2.][..]).into_array().shape(), &[2]);
    let grid = Array2::<f64>::zeros((3, 4));
    assert_eq!((&grid).into_array().shape(), &[3, 4]);
    assert_eq!(grid.into_array().shape(), &[3, 4]);
}

#[test]
fn elementwise_mapping_broadcasts_all_operands() {
    let x = array![1., 2., 3.].into_dyn();
    let y = array![[10.], [20.]].into_dyn();
    let scale = 2.0f64.into_array();
    let result = map_elementwise(&[&x, &y, &scale], 2, |args, out| {
        out[0] = args[2] * (args[0] + args[1]);
        out[1] = args[0] - args[1];
    })
    .unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(
        result[0],
        array![[22., 24., 26.], [42., 44., 46.]].into_dyn()
    );
    assert_eq!(
        result[1],
        array![[-9., -8., -7.], [-19., -18., -17.]].into_dyn()
    );
}

#[test]
fn elementwise_mapping_reports_shape_errors() {
    let x = array![1., 2., 3.].into_dyn();
    let y = array![1., 2.].into_dyn();
    assert_matches!(
        map_elementwise(&[&x, &y], 1, |_, _| unreachable!()),
        Err(ModelError::IncompatibleShapes { .. })
    );
}

#[test]
fn adding_arrays_broadcasts_them() {
    let lhs = array![1., 2.].into_dyn();
    let rhs = 1.5f64.into_array();
    assert_eq!(add_broadcast(&lhs, &rhs).unwrap(), array![2.5, 3.5].into_dyn());
    assert_matches!(
        add_broadcast(&lhs, &array![1., 2., 3.].into_dyn()),
        Err(ModelError::IncompatibleShapes { .. })
    );
}

#[test]
fn linspace_includes_both_endpoints() {
    let lin = linspace(1., 10., 100);
    assert_eq!(lin.len(), 100);
    assert_eq!(lin[0], 1.);
    assert_eq!(lin[99], 10.);
    assert_relative_eq!(lin[1] - lin[0], 9. / 99., epsilon = 1e-12);
    assert_eq!(linspace(2., 3., 1), array![2.]);
    assert_eq!(linspace(2., 3., 0).len(), 0);
}

#[test]
fn logspace_uses_base_ten_exponents() {
    let log = logspace(0., 2., 3);
    assert_relative_eq!(log[0], 1., epsilon = 1e-12);
    assert_relative_eq!(log[1], 10., epsilon = 1e-12);
    assert_relative_eq!(log[2], 100., epsilon = 1e-12);
}

#[test]
fn grids_have_the_expected_layout() {
    let (xx, yy) = meshgrid(&array![1., 2., 3.], &array![5., 6.]);
    assert_eq!(xx, array![[1., 2., 3.], [1., 2., 3.]]);
    assert_eq!(yy, array![[5., 5., 5.], [6., 6., 6.]]);

    let (yy, xx) = mgrid(2, 3);
    assert_eq!(yy, array![[0., 0., 0.], [1., 1., 1.]]);
    assert_eq!(xx, array![[0., 1., 2.], [0., 1., 2.]]);

    assert_eq!(arange(1., 2., 0.25), array![1., 1.25, 1.5, 1.75]);
}
