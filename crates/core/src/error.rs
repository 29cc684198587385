//! Error types for field construction and fire-source configuration

/// Errors reported by field and fire-source constructors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Location outside the field shape
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Replacement array length does not match the field shape
    ShapeMismatch { expected: usize, got: usize },
    /// Phase timings that would divide by zero in the derived coefficients
    DegeneratePhaseTimes(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "location ({x}, {y}) outside {width}x{height} field"),
            ModelError::ShapeMismatch { expected, got } => {
                write!(f, "expected {expected} cells, got {got}")
            }
            ModelError::DegeneratePhaseTimes(msg) => write!(f, "degenerate phase times: {msg}"),
        }
    }
}

impl std::error::Error for ModelError {}
