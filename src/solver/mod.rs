//! Linear-programming equilibrium solvers.
//!
//! [`LinearProgram`] wraps a simplex solver behind the inequality form
//! `minimize cᵀx s.t. Gx ≤ h`. The [`minimax`] and [`correlated`] modules
//! build the two equilibrium programs used by the foe and correlated
//! learners from a state's payoff tables.

pub mod correlated;
pub mod error;
pub mod minimax;
pub mod program;

pub use correlated::{correlated_program, solve_correlated};
pub use error::SolverError;
pub use minimax::{guaranteed_value, minimax_program, solve_minimax, MinimaxSolution};
pub use program::{LinearProgram, Solution};
