use crate::model::builder::ParametricModelBuilder;
use crate::model::errors::ModelError;
use crate::model::ParametricModel;

/// Shift the input by a constant offset. The inverse shifts by the negative offset.
pub fn shift(offset: f64) -> ParametricModel {
    ParametricModelBuilder::new("Shift")
        .parameters(&[("offset", offset)])
        .function_1d(|x, p| x + p[0])
        .fit_deriv_1d(|_, _, d| d[0] = 1.)
        .inverse(|model| Ok(map_parameter_values(model, |offset| -offset)))
        .build_known()
}

/// Multiply the input by a constant factor. The inverse exists for nonzero factors.
pub fn scale(factor: f64) -> ParametricModel {
    ParametricModelBuilder::new("Scale")
        .parameters(&[("factor", factor)])
        .function_1d(|x, p| p[0] * x)
        .fit_deriv_1d(|x, _, d| d[0] = x)
        .inverse(|model| {
            if model.parameters[0].values().contains(&0.) {
                return Err(ModelError::NoInverse {
                    model: model.tag().to_string(),
                });
            }
            Ok(map_parameter_values(model, |factor| 1. / factor))
        })
        .build_known()
}

/// Rotate two dimensional coordinates counter clockwise by an angle given in degrees:
///
/// ```text
/// x' = x cos(angle) - y sin(angle)
/// y' = x sin(angle) + y cos(angle)
/// ```
///
/// The inverse rotates by the negative angle.
pub fn rotation2d(angle: f64) -> ParametricModel {
    ParametricModelBuilder::new("Rotation2D")
        .inputs(2)
        .outputs(2)
        .parameters(&[("angle", angle)])
        .function(|x, p, out| {
            let (sin, cos) = p[0].to_radians().sin_cos();
            out[0] = x[0] * cos - x[1] * sin;
            out[1] = x[0] * sin + x[1] * cos;
        })
        .inverse(|model| Ok(map_parameter_values(model, |angle| -angle)))
        .build_known()
}

/// copy of a single parameter model with all values of its parameter transformed
fn map_parameter_values(model: &ParametricModel, map: impl Fn(f64) -> f64) -> ParametricModel {
    let mut mapped = model.clone();
    for param in mapped.parameters.iter_mut() {
        param.values.iter_mut().for_each(|value| *value = map(*value));
        param.default = map(param.default);
    }
    mapped
}
