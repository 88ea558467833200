use nalgebra::{DMatrix, DVector};
use std::ops::Mul;

/// The weights that are applied to the residuals of a fitting problem.
/// Either unit weights (i.e. an unweighted problem) or one weight per data point,
/// which corresponds to a diagonal weight matrix.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Weights {
    /// unit weights, which means the problem is unweighted
    #[default]
    Unit,
    /// the diagonal elements of the weight matrix
    Diagonal(DVector<f64>),
}

impl Weights {
    /// create diagonal weights from the diagonal elements of the weight matrix
    pub fn diagonal(diagonal: DVector<f64>) -> Self {
        Self::Diagonal(diagonal)
    }

    /// check that the weights can be applied to data with the given number of elements.
    /// Unit weights fit any data.
    pub fn is_size_correct_for_data_length(&self, data_len: usize) -> bool {
        match self {
            Weights::Unit => true,
            Weights::Diagonal(diagonal) => diagonal.len() == data_len,
        }
    }
}

/// Apply the weights to a vector. This is a no-op for unit weights.
/// # Panics
/// If diagonal weights have a different length than the vector.
impl Mul<DVector<f64>> for &Weights {
    type Output = DVector<f64>;

    fn mul(self, mut rhs: DVector<f64>) -> Self::Output {
        match self {
            Weights::Unit => rhs,
            Weights::Diagonal(diagonal) => {
                rhs.component_mul_assign(diagonal);
                rhs
            }
        }
    }
}

/// Apply the weights to a matrix from the left, i.e. scale the rows.
/// This is a no-op for unit weights.
/// # Panics
/// If diagonal weights have a different length than the number of rows.
impl Mul<DMatrix<f64>> for &Weights {
    type Output = DMatrix<f64>;

    fn mul(self, mut rhs: DMatrix<f64>) -> Self::Output {
        match self {
            Weights::Unit => rhs,
            Weights::Diagonal(diagonal) => {
                assert_eq!(diagonal.len(), rhs.nrows(), "weights must match the rows");
                for (mut row, &weight) in rhs.row_iter_mut().zip(diagonal.iter()) {
                    row *= weight;
                }
                rhs
            }
        }
    }
}
