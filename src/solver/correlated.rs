//! Utilitarian correlated equilibrium of a two-player general-sum game.
//!
//! Both payoff matrices are row-major with the agent's own action on the rows
//! and the opponent's action on the columns. The variables are the joint
//! probabilities `pi(i, k)` laid out at column `n * i + k`, matching the
//! payoff layout, so the returned vector can be stored directly as the joint
//! policy.
//!
//! Constraint rows, in order:
//!
//! 1. Agent rationality, for every ordered pair `i != j` of own actions:
//!    `Σ_k pi(i, k)·(own[i, k] − own[j, k]) ≥ 0`.
//!    Only columns `n * i + k` are non-zero.
//! 2. Opponent rationality, deviating on the second index, for every ordered
//!    pair `i != j` of opponent actions:
//!    `Σ_k pi(k, i)·(opp[k, i] − opp[k, j]) ≥ 0`.
//!    Only columns `n * k + i` are non-zero.
//! 3. `pi(i, k) ≥ 0` for all `n²` pairs.
//! 4. `Σ pi ≥ 1` and `Σ pi ≤ 1`.
//!
//! The objective maximises `Σ pi(i, k)·(own[i, k] + opp[i, k])`.

use super::error::SolverError;
use super::program::LinearProgram;

/// Builds the correlated-equilibrium program for two `n × n` payoff matrices.
pub fn correlated_program(own: &[f64], opponent: &[f64], n: usize) -> Result<LinearProgram, SolverError> {
    let m = n * n;
    for table in [own, opponent] {
        if table.len() != m {
            return Err(SolverError::DimensionMismatch {
                expected: m,
                actual: table.len(),
            });
        }
    }
    let mut program = LinearProgram::new(m);

    for i in 0..n {
        for j in (0..n).filter(|&j| j != i) {
            let mut row = vec![0.0; m];
            for k in 0..n {
                row[n * i + k] = own[n * i + k] - own[n * j + k];
            }
            program.at_least(row, 0.0)?;
        }
    }

    for i in 0..n {
        for j in (0..n).filter(|&j| j != i) {
            let mut row = vec![0.0; m];
            for k in 0..n {
                row[n * k + i] = opponent[n * k + i] - opponent[n * k + j];
            }
            program.at_least(row, 0.0)?;
        }
    }

    for col in 0..m {
        let mut row = vec![0.0; m];
        row[col] = 1.0;
        program.at_least(row, 0.0)?;
    }

    program.at_least(vec![1.0; m], 1.0)?;
    program.at_most(vec![1.0; m], 1.0)?;

    let welfare = own.iter().zip(opponent).map(|(a, b)| a + b).collect();
    program.maximize(welfare)?;

    Ok(program)
}

/// Solves for the utilitarian correlated equilibrium.
///
/// Returns the `n²` joint probabilities in `n * own + opponent` order. Ties
/// between equally utilitarian equilibria resolve to the most mixed one.
pub fn solve_correlated(own: &[f64], opponent: &[f64], n: usize) -> Result<Vec<f64>, SolverError> {
    let program = correlated_program(own, opponent, n)?;
    let solution = program.solve_centered(0..n * n)?;
    Ok(solution.x.into_iter().map(|p| p.max(0.0)).collect())
}
