use super::{CircleParams, ParamsMap, SeriesParams};

/// Places both circles on the horizontal midline: circle 0 ends at the canvas
/// center, circle 1 sits `distance` to the right of it.
pub fn emit_params(r0: f64, r1: f64, distance: f64, center: (f64, f64)) -> ParamsMap {
    let (center_x, center_y) = center;
    let x0 = center_x - r0;
    let x1 = x0 + distance;
    vec![
        SeriesParams {
            location: CircleParams {
                x: x0,
                y: center_y,
                r: r0,
            },
        },
        SeriesParams {
            location: CircleParams {
                x: x1,
                y: center_y,
                r: r1,
            },
        },
    ]
}
