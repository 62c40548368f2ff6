use thiserror::Error;

use crate::solver::SolverError;

/// Errors that abort a training or evaluation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainingError {
    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),

    #[error("Equilibrium solve failed: {0}")]
    Solver(#[from] SolverError),

    #[error("Unknown agent kind: '{0}'")]
    UnknownAgent(String),
}
