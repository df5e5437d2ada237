use crate::error::{LayoutError, Result};

/// Area-proportional radii for two sets.
///
/// The larger set gets radius `extent`; the other is scaled by the square root
/// of the value ratio. Ties go to the second branch, so equal values give
/// `r0 == r1 == extent`.
pub fn circle_radii(value0: f64, value1: f64, extent: f64) -> Result<(f64, f64)> {
    for (index, value) in [value0, value1].into_iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvalidValue { index, value });
        }
    }

    if value0 > value1 {
        let r0 = extent;
        let r1 = extent * (value1 / value0).sqrt();
        Ok((r0, r1))
    } else {
        if value1 == 0.0 {
            return Err(LayoutError::DivisionByZero {
                values: [value0, value1, 0.0],
                radii: (0.0, extent),
                distance: None,
                reason: "both set magnitudes are zero".to_string(),
            });
        }
        let r1 = extent;
        let r0 = extent * (value0 / value1).sqrt();
        Ok((r0, r1))
    }
}
