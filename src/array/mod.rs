use crate::model::errors::ModelError;
use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn};

/// generation of sample vectors and coordinate grids
pub mod grid;
#[cfg(test)]
mod test;

/// The array type that models consume and produce. Scalars are represented
/// as zero dimensional arrays, sample vectors as one dimensional arrays and
/// grids as arrays of higher dimension.
pub type Array = ArrayD<f64>;

/// Conversion of scalars, vectors and ndarray arrays into an [`Array`].
pub trait IntoArray {
    /// perform the conversion
    fn into_array(self) -> Array;
}

impl IntoArray for f64 {
    fn into_array(self) -> Array {
        ndarray::arr0(self).into_dyn()
    }
}

impl IntoArray for Vec<f64> {
    fn into_array(self) -> Array {
        ndarray::Array1::from_vec(self).into_dyn()
    }
}

impl IntoArray for &[f64] {
    fn into_array(self) -> Array {
        self.to_vec().into_array()
    }
}

impl<const N: usize> IntoArray for [f64; N] {
    fn into_array(self) -> Array {
        self.to_vec().into_array()
    }
}

impl<D: Dimension> IntoArray for ndarray::Array<f64, D> {
    fn into_array(self) -> Array {
        self.into_dyn()
    }
}

impl<S, D> IntoArray for &ArrayBase<S, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    fn into_array(self) -> Array {
        self.to_owned().into_dyn()
    }
}

/// Calculate the shape that the given shapes broadcast to.
///
/// Shapes are aligned at their trailing axes. Two axis lengths are compatible
/// if they are equal or if one of them is `1`. Missing leading axes count as
/// length `1`.
///
/// # Errors
/// Returns [`ModelError::IncompatibleShapes`] if the shapes can not be broadcast.
pub fn broadcast_shape(shapes: &[&[usize]]) -> Result<Vec<usize>, ModelError> {
    let ndim = shapes.iter().map(|shape| shape.len()).max().unwrap_or(0);
    let mut result = vec![1; ndim];
    for shape in shapes {
        let offset = ndim - shape.len();
        for (axis, &len) in shape.iter().enumerate() {
            let target = &mut result[offset + axis];
            if *target == len || len == 1 {
                continue;
            }
            if *target == 1 {
                *target = len;
                continue;
            }
            return Err(ModelError::IncompatibleShapes {
                shapes: shapes.iter().map(|shape| shape.to_vec()).collect(),
            });
        }
    }
    Ok(result)
}

/// Broadcast all operands to a common shape and apply the kernel to every element.
///
/// For each element position the kernel receives the values of all operands at this
/// position (in the order of the operands) and must write `n_outputs` values into the
/// output slice. The result contains one array per output, each with the broadcast shape.
pub(crate) fn map_elementwise<F>(
    operands: &[&Array],
    n_outputs: usize,
    kernel: F,
) -> Result<Vec<Array>, ModelError>
where
    F: Fn(&[f64], &mut [f64]),
{
    let shapes: Vec<&[usize]> = operands.iter().map(|op| op.shape()).collect();
    let shape = broadcast_shape(&shapes)?;
    let len: usize = shape.iter().product();

    let flattened = operands
        .iter()
        .map(|op| flatten_broadcast(op, &shape))
        .collect::<Result<Vec<_>, _>>()?;

    let mut outputs = vec![Vec::with_capacity(len); n_outputs];
    let mut args = vec![0.; operands.len()];
    let mut out = vec![0.; n_outputs];
    for idx in 0..len {
        for (arg, values) in args.iter_mut().zip(flattened.iter()) {
            *arg = values[idx];
        }
        kernel(&args, &mut out);
        for (output, value) in outputs.iter_mut().zip(out.iter()) {
            output.push(*value);
        }
    }

    outputs
        .into_iter()
        .map(|data| Ok(ArrayD::from_shape_vec(IxDyn(&shape), data)?))
        .collect()
}

/// Add two arrays element-wise, broadcasting them against each other.
pub(crate) fn add_broadcast(lhs: &Array, rhs: &Array) -> Result<Array, ModelError> {
    let shape = broadcast_shape(&[lhs.shape(), rhs.shape()])?;
    let (Some(lhs), Some(rhs)) = (lhs.broadcast(shape.as_slice()), rhs.broadcast(shape.as_slice()))
    else {
        return Err(ModelError::IncompatibleShapes {
            shapes: vec![lhs.shape().to_vec(), rhs.shape().to_vec()],
        });
    };
    Ok(&lhs + &rhs)
}

/// broadcast the array to the given shape and copy its elements in logical order
fn flatten_broadcast(array: &Array, shape: &[usize]) -> Result<Vec<f64>, ModelError> {
    array
        .broadcast(shape)
        .map(|view| view.iter().copied().collect())
        .ok_or_else(|| ModelError::IncompatibleShapes {
            shapes: vec![array.shape().to_vec(), shape.to_vec()],
        })
}
