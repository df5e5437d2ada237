use std::f64::consts::PI;

use crate::config::{InfeasiblePolicy, VennConfig};
use crate::error::{LayoutError, Result};

// arccos arguments this far outside [-1, 1] are treated as rounding noise.
const ACOS_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub min_bracket_width: f64,
    pub infeasible: InfeasiblePolicy,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self::from(&VennConfig::default())
    }
}

impl From<&VennConfig> for SolverOptions {
    fn from(config: &VennConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            min_bracket_width: config.min_bracket_width,
            infeasible: config.infeasible,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Center-to-center distance.
    pub distance: f64,
    pub iterations: usize,
    /// Lens area over the area of circle 0 at `distance`.
    pub ratio: f64,
    /// Intersection magnitude over set A's magnitude.
    pub target_ratio: f64,
    /// Intersection magnitude actually solved for (after clamping).
    pub intersection: f64,
}

/// Area shared by two circles whose centers are `distance` apart.
pub fn lens_area(r0: f64, r1: f64, distance: f64) -> f64 {
    let d = distance.abs();
    if d >= r0 + r1 {
        return 0.0;
    }
    if d <= (r0 - r1).abs() {
        let small = r0.min(r1);
        return PI * small * small;
    }
    let x = (r0 * r0 - r1 * r1) / (2.0 * d) + d / 2.0;
    let y = d / 2.0 - (r0 * r0 - r1 * r1) / (2.0 * d);
    let alpha = (x / r0).clamp(-1.0, 1.0).acos();
    let beta = (y / r1).clamp(-1.0, 1.0).acos();
    alpha * r0 * r0 - x * r0 * alpha.sin() + beta * r1 * r1 - y * r1 * beta.sin()
}

/// Initial distance guess: the mean radius scaled by the square root of the
/// intersection relative to the mean set magnitude.
pub(crate) fn initial_anchor(values: [f64; 3], r0: f64, r1: f64) -> f64 {
    let [v0, v1, v2] = values;
    ((r0 + r1) / 2.0) * v2.sqrt() / ((v0 + v1) / 2.0).sqrt()
}

/// Finds the center distance whose lens area, as a fraction of circle 0,
/// matches `values[2] / values[0]` within `options.tolerance`.
pub fn solve_distance(
    values: [f64; 3],
    r0: f64,
    r1: f64,
    options: &SolverOptions,
) -> Result<Solution> {
    for (index, value) in values.into_iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvalidValue { index, value });
        }
    }
    let [v0, v1, requested] = values;
    if v0 == 0.0 {
        return Err(LayoutError::DivisionByZero {
            values,
            radii: (r0, r1),
            distance: None,
            reason: "set A magnitude is zero, so the target ratio is undefined".to_string(),
        });
    }

    let limit = v0.min(v1);
    let intersection = if requested > limit {
        match options.infeasible {
            InfeasiblePolicy::Reject => {
                return Err(LayoutError::DomainError {
                    values,
                    radii: (r0, r1),
                    distance: None,
                    reason: format!("intersection {requested} exceeds the smaller set {limit}"),
                });
            }
            InfeasiblePolicy::Clamp => {
                tracing::warn!(requested, limit, "clamping infeasible intersection");
                limit
            }
        }
    } else {
        requested
    };

    let d_min = (r0 - r1).abs();
    let d_max = r0 + r1;
    let target = intersection / v0;

    if intersection == 0.0 {
        tracing::debug!(distance = d_max, "empty intersection, circles tangent");
        return Ok(Solution {
            distance: d_max,
            iterations: 0,
            ratio: 0.0,
            target_ratio: 0.0,
            intersection,
        });
    }
    if intersection == limit {
        tracing::debug!(distance = d_min, "full intersection, smaller circle contained");
        return Ok(Solution {
            distance: d_min,
            iterations: 0,
            ratio: lens_area(r0, r1, d_min) / (PI * r0 * r0),
            target_ratio: target,
            intersection,
        });
    }

    let effective = [v0, v1, intersection];
    let mut lower = d_min;
    let mut upper = d_max;
    let mut distance = initial_anchor(effective, r0, r1);
    if !(distance > lower && distance < upper) {
        distance = (lower + upper) / 2.0;
    }
    let min_width = options.min_bracket_width * d_max;

    let mut iterations = 0;
    while iterations < options.max_iterations {
        iterations += 1;
        let area = chord_lens_area(effective, r0, r1, distance)?;
        let ratio = area / (PI * r0 * r0);
        let approximate = (ratio / target).abs();
        tracing::trace!(iterations, distance, approximate, "overlap bisection step");

        if approximate > 1.0 - options.tolerance && approximate < 1.0 + options.tolerance {
            tracing::debug!(distance, iterations, ratio, target, "overlap solved");
            return Ok(Solution {
                distance,
                iterations,
                ratio,
                target_ratio: target,
                intersection,
            });
        }

        if approximate <= 1.0 - options.tolerance {
            // Overlap too small: bring the circles closer.
            upper = distance;
            distance = (distance + lower) / 2.0;
        } else {
            lower = distance;
            distance = (distance + upper) / 2.0;
        }

        if upper - lower < min_width {
            break;
        }
    }

    Err(LayoutError::NonConvergence {
        values,
        radii: (r0, r1),
        iterations,
        bracket: (lower, upper),
    })
}

/// Lens area from the chord offsets, reporting degenerate arguments.
fn chord_lens_area(values: [f64; 3], r0: f64, r1: f64, d: f64) -> Result<f64> {
    if d == 0.0 || r0 == 0.0 || r1 == 0.0 {
        return Err(LayoutError::DivisionByZero {
            values,
            radii: (r0, r1),
            distance: Some(d),
            reason: "zero distance or radius in the chord formula".to_string(),
        });
    }
    let x = (r0 * r0 - r1 * r1) / (2.0 * d) + d / 2.0;
    let y = d / 2.0 - (r0 * r0 - r1 * r1) / (2.0 * d);
    let alpha = checked_acos(x / r0, values, (r0, r1), d)?;
    let beta = checked_acos(y / r1, values, (r0, r1), d)?;
    Ok(alpha * r0 * r0 - x * r0 * alpha.sin() + beta * r1 * r1 - y * r1 * beta.sin())
}

fn checked_acos(arg: f64, values: [f64; 3], radii: (f64, f64), d: f64) -> Result<f64> {
    if !arg.is_finite() || arg.abs() > 1.0 + ACOS_SLACK {
        return Err(LayoutError::DomainError {
            values,
            radii,
            distance: Some(d),
            reason: format!("arccos argument {arg} outside [-1, 1]"),
        });
    }
    Ok(arg.clamp(-1.0, 1.0).acos())
}
