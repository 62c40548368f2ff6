use thiserror::Error;

/// Errors reported by the linear-program solver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("Linear program is infeasible")]
    Infeasible,

    #[error("Linear program is unbounded")]
    Unbounded,

    #[error("Solver failed: {0}")]
    Numerical(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Centring needs at least one column")]
    NoCenteredColumns,
}

impl From<microlp::Error> for SolverError {
    fn from(err: microlp::Error) -> Self {
        match err {
            microlp::Error::Infeasible => SolverError::Infeasible,
            microlp::Error::Unbounded => SolverError::Unbounded,
            #[allow(unreachable_patterns)]
            other => SolverError::Numerical(other.to_string()),
        }
    }
}
