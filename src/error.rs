use thiserror::Error;

/// Why a venn layout could not be produced. Each variant carries the inputs
/// that triggered it so a host can report or clamp them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("expected 3 data entries (A, B, A∩B), got {count}")]
    InvalidDataset { count: usize },

    #[error("value at index {index} must be finite and non-negative, got {value}")]
    InvalidValue { index: usize, value: f64 },

    #[error("domain error: {reason} (values {values:?}, radii {radii:?}, distance {distance:?})")]
    DomainError {
        values: [f64; 3],
        radii: (f64, f64),
        distance: Option<f64>,
        reason: String,
    },

    #[error("division by zero: {reason} (values {values:?}, radii {radii:?}, distance {distance:?})")]
    DivisionByZero {
        values: [f64; 3],
        radii: (f64, f64),
        distance: Option<f64>,
        reason: String,
    },

    #[error(
        "overlap solver did not converge after {iterations} iterations (values {values:?}, radii {radii:?}, bracket {bracket:?})"
    )]
    NonConvergence {
        values: [f64; 3],
        radii: (f64, f64),
        iterations: usize,
        bracket: (f64, f64),
    },
}

impl LayoutError {
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutError::InvalidDataset { .. } => "invalid-dataset",
            LayoutError::InvalidValue { .. } => "invalid-value",
            LayoutError::DomainError { .. } => "domain",
            LayoutError::DivisionByZero { .. } => "division-by-zero",
            LayoutError::NonConvergence { .. } => "non-convergence",
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
