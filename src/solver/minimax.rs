//! Minimax (foe) equilibrium of a two-player matrix game.
//!
//! The payoff matrix is passed row-major with the agent's own action on the
//! rows: `payoff[n * a + o]` is the agent's payoff when it plays `a` and the
//! opponent plays `o`.
//!
//! Variables are `pi(0) .. pi(n-1)` followed by the game value `V` at column
//! `n`. The program is
//!
//! ```text
//! maximize    V
//! subject to  Σ_a pi(a)·payoff[a, o] − V ≥ 0     for every opponent reply o
//!             pi(a) ≥ 0                          for every own action a
//!             Σ_a pi(a) ≥ 1,  Σ_a pi(a) ≤ 1
//! ```

use super::error::SolverError;
use super::program::LinearProgram;

/// Optimal mixed strategy and its guaranteed value.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxSolution {
    /// Probability of each own action.
    pub policy: Vec<f64>,
    /// Expected payoff guaranteed against any pure opponent reply.
    pub value: f64,
}

/// Builds the minimax program for an `n × n` payoff matrix.
pub fn minimax_program(payoff: &[f64], n: usize) -> Result<LinearProgram, SolverError> {
    if payoff.len() != n * n {
        return Err(SolverError::DimensionMismatch {
            expected: n * n,
            actual: payoff.len(),
        });
    }
    let value_col = n;
    let mut program = LinearProgram::new(n + 1);

    for o in 0..n {
        let mut row = vec![0.0; n + 1];
        for a in 0..n {
            row[a] = payoff[n * a + o];
        }
        row[value_col] = -1.0;
        program.at_least(row, 0.0)?;
    }

    for a in 0..n {
        let mut row = vec![0.0; n + 1];
        row[a] = 1.0;
        program.at_least(row, 0.0)?;
    }

    let mut total = vec![1.0; n + 1];
    total[value_col] = 0.0;
    program.at_least(total.clone(), 1.0)?;
    program.at_most(total, 1.0)?;

    let mut objective = vec![0.0; n + 1];
    objective[value_col] = 1.0;
    program.maximize(objective)?;

    Ok(program)
}

/// Expected payoff of `policy` against the opponent's best pure reply.
pub fn guaranteed_value(payoff: &[f64], n: usize, policy: &[f64]) -> f64 {
    (0..n)
        .map(|o| (0..n).map(|a| policy[a] * payoff[n * a + o]).sum::<f64>())
        .fold(f64::INFINITY, f64::min)
}

/// Solves for the minimax strategy of an `n × n` payoff matrix.
///
/// Ties between optimal strategies resolve to the most mixed one, and the
/// value is recomputed from the returned strategy.
pub fn solve_minimax(payoff: &[f64], n: usize) -> Result<MinimaxSolution, SolverError> {
    let program = minimax_program(payoff, n)?;
    let solution = program.solve_centered(0..n)?;
    let policy: Vec<f64> = solution.x[..n].iter().map(|p| p.max(0.0)).collect();
    let value = guaranteed_value(payoff, n, &policy);
    Ok(MinimaxSolution { policy, value })
}
