//! Inequality-form linear programs.
//!
//! A [`LinearProgram`] is stored in the standard form
//!
//! ```text
//! minimize    cᵀx
//! subject to  Gx ≤ h
//! ```
//!
//! over free variables. The `maximize` and `at_least` builders perform the
//! sign flips so constraint construction can be written the way the algebra
//! reads.

use std::ops::Range;

use log::{debug, trace};
use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};

use super::error::SolverError;

/// Relative slack allowed on the objective when re-solving for a centred
/// optimum.
const OPTIMALITY_TOLERANCE: f64 = 1e-6;

/// Scaled coefficients at or below this magnitude are dropped.
const COEFFICIENT_EPSILON: f64 = 1e-12;

/// Crossed variable bounds within this gap are treated as touching.
const BOUND_TOLERANCE: f64 = 1e-9;

/// A linear program in `minimize cᵀx s.t. Gx ≤ h` form.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    objective: Vec<f64>,
    rows: Vec<Vec<f64>>,
    bounds: Vec<f64>,
}

/// Optimal point of a [`LinearProgram`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Primal optimum `x*`.
    pub x: Vec<f64>,
    /// Objective value `cᵀx*` in the minimisation sense.
    pub objective: f64,
}

impl LinearProgram {
    /// Creates an empty program over `num_vars` variables with a zero objective.
    pub fn new(num_vars: usize) -> Self {
        Self {
            objective: vec![0.0; num_vars],
            rows: Vec::new(),
            bounds: Vec::new(),
        }
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Number of `≤` rows.
    pub fn num_constraints(&self) -> usize {
        self.rows.len()
    }

    /// Objective vector `c` (minimisation sense).
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Returns row `i` of `G` and its bound `h[i]`.
    pub fn constraint(&self, i: usize) -> Option<(&[f64], f64)> {
        self.rows
            .get(i)
            .map(|row| (row.as_slice(), self.bounds[i]))
    }

    /// Sets the objective to minimise `cᵀx`.
    pub fn minimize(&mut self, c: Vec<f64>) -> Result<(), SolverError> {
        self.check_width(c.len())?;
        self.objective = c;
        Ok(())
    }

    /// Sets the objective to maximise `cᵀx` (stored as minimising `-cᵀx`).
    pub fn maximize(&mut self, c: Vec<f64>) -> Result<(), SolverError> {
        self.minimize(c.into_iter().map(|v| -v).collect())
    }

    /// Adds `rowᵀx ≤ rhs`.
    pub fn at_most(&mut self, row: Vec<f64>, rhs: f64) -> Result<(), SolverError> {
        self.check_width(row.len())?;
        self.rows.push(row);
        self.bounds.push(rhs);
        Ok(())
    }

    /// Adds `rowᵀx ≥ rhs` (stored as `-rowᵀx ≤ -rhs`).
    pub fn at_least(&mut self, row: Vec<f64>, rhs: f64) -> Result<(), SolverError> {
        self.at_most(row.into_iter().map(|v| -v).collect(), -rhs)
    }

    fn check_width(&self, actual: usize) -> Result<(), SolverError> {
        if actual != self.num_vars() {
            return Err(SolverError::DimensionMismatch {
                expected: self.num_vars(),
                actual,
            });
        }
        Ok(())
    }

    /// Evaluates `cᵀx`.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Folds the rows into the shape handed to microlp.
    ///
    /// Each row is scaled by its largest coefficient. Rows with a single
    /// variable become bounds on that variable, repeated rows collapse to the
    /// tightest one, and a pair of rows that are exact negations of each
    /// other becomes one equality.
    fn reduce(&self) -> Result<Reduced, SolverError> {
        let n = self.num_vars();
        let mut lower = vec![f64::NEG_INFINITY; n];
        let mut upper = vec![f64::INFINITY; n];
        let mut scaled: Vec<(Vec<(usize, f64)>, f64)> = Vec::new();

        for (row, &rhs) in self.rows.iter().zip(&self.bounds) {
            let scale = row.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
            if scale == 0.0 {
                // 0 ≤ rhs holds or fails on its own.
                if rhs < 0.0 {
                    return Err(SolverError::Infeasible);
                }
                continue;
            }
            let terms: Vec<(usize, f64)> = row
                .iter()
                .enumerate()
                .map(|(col, &c)| (col, c / scale))
                .filter(|(_, c)| c.abs() > COEFFICIENT_EPSILON)
                .collect();
            let rhs = rhs / scale;
            match terms.as_slice() {
                [(col, c)] if *c > 0.0 => upper[*col] = upper[*col].min(rhs / c),
                [(col, c)] => lower[*col] = lower[*col].max(rhs / c),
                _ => match scaled.iter_mut().find(|(other, _)| *other == terms) {
                    // Same scaled row: keep the tighter bound.
                    Some((_, bound)) => *bound = bound.min(rhs),
                    None => scaled.push((terms, rhs)),
                },
            }
        }

        for col in 0..n {
            if lower[col] > upper[col] + BOUND_TOLERANCE {
                return Err(SolverError::Infeasible);
            }
            if lower[col] > upper[col] {
                upper[col] = lower[col];
            }
        }

        let mut rows = Vec::with_capacity(scaled.len());
        let mut merged = vec![false; scaled.len()];
        for i in 0..scaled.len() {
            if merged[i] {
                continue;
            }
            let (terms, rhs) = &scaled[i];
            let partner = (i + 1..scaled.len()).find(|&k| {
                let (other, other_rhs) = &scaled[k];
                !merged[k]
                    && *other_rhs == -rhs
                    && other.len() == terms.len()
                    && other
                        .iter()
                        .zip(terms)
                        .all(|(&(a, ca), &(b, cb))| a == b && ca == -cb)
            });
            if let Some(k) = partner {
                merged[k] = true;
            }
            rows.push(ReducedRow {
                terms: terms.clone(),
                equality: partner.is_some(),
                rhs: *rhs,
            });
        }

        Ok(Reduced { lower, upper, rows })
    }

    /// Solves the program, returning any optimal vertex.
    pub fn solve(&self) -> Result<Solution, SolverError> {
        let reduced = self.reduce()?;
        let mut problem = Problem::new(OptimizationDirection::Minimize);
        let vars: Vec<Variable> = self
            .objective
            .iter()
            .zip(reduced.lower.iter().zip(&reduced.upper))
            .map(|(&c, (&lo, &hi))| problem.add_var(c, (lo, hi)))
            .collect();

        for row in &reduced.rows {
            let terms: Vec<(Variable, f64)> = row.terms.iter().map(|&(col, c)| (vars[col], c)).collect();
            let op = if row.equality {
                ComparisonOp::Eq
            } else {
                ComparisonOp::Le
            };
            problem.add_constraint(terms.as_slice(), op, row.rhs);
        }

        trace!(
            "solving LP with {} variables and {} constraints ({} after reduction)",
            self.num_vars(),
            self.num_constraints(),
            reduced.rows.len()
        );
        let solution = problem.solve()?;
        let x: Vec<f64> = vars.iter().map(|&var| solution[var]).collect();
        let objective = self.evaluate(&x);
        Ok(Solution { x, objective })
    }

    /// Solves the program and, among optimal points, returns one that
    /// maximises the smallest of the variables in `columns`.
    ///
    /// For probability variables this picks the most mixed optimal
    /// distribution: an all-ties payoff yields the uniform distribution rather
    /// than an arbitrary pure vertex. If the centring pass fails the plain
    /// optimal vertex is returned.
    pub fn solve_centered(&self, columns: Range<usize>) -> Result<Solution, SolverError> {
        let n = self.num_vars();
        if columns.is_empty() {
            return Err(SolverError::NoCenteredColumns);
        }
        if columns.end > n {
            return Err(SolverError::DimensionMismatch {
                expected: n,
                actual: columns.end,
            });
        }

        let optimum = self.solve()?;
        match self.recenter(&optimum, columns) {
            Ok(solution) => Ok(solution),
            Err(err) => {
                debug!("centring pass failed ({}), keeping the optimal vertex", err);
                Ok(optimum)
            }
        }
    }

    fn recenter(&self, optimum: &Solution, columns: Range<usize>) -> Result<Solution, SolverError> {
        let n = self.num_vars();
        let slack = OPTIMALITY_TOLERANCE * optimum.objective.abs().max(1.0);

        // Extra variable t at column n, bounded by every centred column and
        // starting no lower than the vertex's smallest centred value.
        let mut centered = LinearProgram::new(n + 1);
        for (row, &rhs) in self.rows.iter().zip(&self.bounds) {
            let mut widened = row.clone();
            widened.push(0.0);
            centered.at_most(widened, rhs)?;
        }
        let mut keep_optimal = self.objective.clone();
        keep_optimal.push(0.0);
        centered.at_most(keep_optimal, optimum.objective + slack)?;

        let floor = columns
            .clone()
            .map(|col| optimum.x[col])
            .fold(f64::INFINITY, f64::min);
        let mut t_floor = vec![0.0; n + 1];
        t_floor[n] = 1.0;
        centered.at_least(t_floor, floor)?;

        for col in columns {
            let mut row = vec![0.0; n + 1];
            row[col] = -1.0;
            row[n] = 1.0;
            centered.at_most(row, 0.0)?;
        }
        let mut lift = vec![0.0; n + 1];
        lift[n] = 1.0;
        centered.maximize(lift)?;

        let mut x = centered.solve()?.x;
        x.truncate(n);
        let objective = self.evaluate(&x);
        if objective > optimum.objective + 2.0 * slack {
            return Err(SolverError::Numerical(format!(
                "centred objective {} drifted from optimum {}",
                objective, optimum.objective
            )));
        }
        Ok(Solution { x, objective })
    }
}

/// One row of a [`Reduced`] program: `Σ c·x (≤ | =) rhs`.
#[derive(Debug, Clone)]
struct ReducedRow {
    terms: Vec<(usize, f64)>,
    equality: bool,
    rhs: f64,
}

/// A program with single-variable rows folded into bounds.
#[derive(Debug, Clone)]
struct Reduced {
    lower: Vec<f64>,
    upper: Vec<f64>,
    rows: Vec<ReducedRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn solves_textbook_program() {
        // maximize x + 2y s.t. x + y ≤ 4, 2x + y ≥ 2, 0 ≤ x, 0 ≤ y ≤ 3
        let mut lp = LinearProgram::new(2);
        lp.maximize(vec![1.0, 2.0]).unwrap();
        lp.at_most(vec![1.0, 1.0], 4.0).unwrap();
        lp.at_least(vec![2.0, 1.0], 2.0).unwrap();
        lp.at_least(vec![1.0, 0.0], 0.0).unwrap();
        lp.at_least(vec![0.0, 1.0], 0.0).unwrap();
        lp.at_most(vec![0.0, 1.0], 3.0).unwrap();

        let solution = lp.solve().unwrap();
        assert!(approx(solution.x[0], 1.0));
        assert!(approx(solution.x[1], 3.0));
        // Minimisation sense: the maximum 7 is stored as -7.
        assert!(approx(solution.objective, -7.0));
    }

    #[test]
    fn at_least_flips_signs() {
        let mut lp = LinearProgram::new(2);
        lp.at_least(vec![1.0, -2.0], 3.0).unwrap();
        assert_eq!(lp.constraint(0), Some((&[-1.0, 2.0][..], -3.0)));
        assert_eq!(lp.constraint(1), None);
    }

    #[test]
    fn rejects_wrong_width() {
        let mut lp = LinearProgram::new(3);
        assert_eq!(
            lp.at_most(vec![1.0], 0.0),
            Err(SolverError::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        );
        assert!(lp.maximize(vec![0.0; 4]).is_err());
    }

    #[test]
    fn reports_infeasible() {
        let mut lp = LinearProgram::new(1);
        lp.at_least(vec![1.0], 1.0).unwrap();
        lp.at_most(vec![1.0], 0.0).unwrap();
        assert_eq!(lp.solve(), Err(SolverError::Infeasible));
    }

    #[test]
    fn empty_row_with_negative_bound_is_infeasible() {
        let mut lp = LinearProgram::new(2);
        lp.at_most(vec![0.0, 0.0], -1.0).unwrap();
        assert_eq!(lp.solve(), Err(SolverError::Infeasible));
    }

    #[test]
    fn reports_unbounded() {
        let mut lp = LinearProgram::new(1);
        lp.maximize(vec![1.0]).unwrap();
        lp.at_least(vec![1.0], 0.0).unwrap();
        assert_eq!(lp.solve(), Err(SolverError::Unbounded));
    }

    #[test]
    fn centered_solution_spreads_ties() {
        // Any point of the simplex is optimal for a zero objective.
        let mut lp = LinearProgram::new(3);
        for i in 0..3 {
            let mut row = vec![0.0; 3];
            row[i] = 1.0;
            lp.at_least(row, 0.0).unwrap();
        }
        lp.at_least(vec![1.0; 3], 1.0).unwrap();
        lp.at_most(vec![1.0; 3], 1.0).unwrap();

        let solution = lp.solve_centered(0..3).unwrap();
        for p in &solution.x {
            assert!(approx(*p, 1.0 / 3.0));
        }
    }

    #[test]
    fn centered_solution_keeps_optimum() {
        // maximize x0 on the simplex: the optimum is unique, centring must not move it.
        let mut lp = LinearProgram::new(2);
        lp.maximize(vec![1.0, 0.0]).unwrap();
        lp.at_least(vec![1.0, 0.0], 0.0).unwrap();
        lp.at_least(vec![0.0, 1.0], 0.0).unwrap();
        lp.at_least(vec![1.0, 1.0], 1.0).unwrap();
        lp.at_most(vec![1.0, 1.0], 1.0).unwrap();

        let solution = lp.solve_centered(0..2).unwrap();
        assert!(approx(solution.x[0], 1.0));
        assert!(approx(solution.x[1], 0.0));
    }

    #[test]
    fn centered_rejects_bad_columns() {
        let lp = LinearProgram::new(2);
        assert!(matches!(
            lp.solve_centered(0..3),
            Err(SolverError::DimensionMismatch { expected: 2, actual: 3 })
        ));
        assert_eq!(lp.solve_centered(1..1), Err(SolverError::NoCenteredColumns));
    }

    #[test]
    fn single_variable_rows_become_bounds() {
        let mut lp = LinearProgram::new(2);
        lp.at_least(vec![2.0, 0.0], 1.0).unwrap();
        lp.at_most(vec![0.0, 4.0], 2.0).unwrap();
        lp.at_most(vec![1.0, 1.0], 3.0).unwrap();
        let reduced = lp.reduce().unwrap();
        assert_eq!(reduced.lower, vec![0.5, f64::NEG_INFINITY]);
        assert_eq!(reduced.upper, vec![f64::INFINITY, 0.5]);
        assert_eq!(reduced.rows.len(), 1);
        assert!(!reduced.rows[0].equality);
    }

    #[test]
    fn opposite_rows_merge_into_equality() {
        let mut lp = LinearProgram::new(3);
        lp.at_least(vec![1.0; 3], 1.0).unwrap();
        lp.at_most(vec![1.0; 3], 1.0).unwrap();
        lp.at_most(vec![2.0, 0.0, -2.0], 4.0).unwrap();
        let reduced = lp.reduce().unwrap();
        assert_eq!(reduced.rows.len(), 2);
        assert!(reduced.rows[0].equality);
        // Scaled by its largest coefficient.
        assert_eq!(reduced.rows[1].terms, vec![(0, 1.0), (2, -1.0)]);
        assert_eq!(reduced.rows[1].rhs, 2.0);
    }

    #[test]
    fn repeated_rows_keep_tightest_bound() {
        let mut lp = LinearProgram::new(2);
        lp.at_most(vec![1.0, -1.0], 3.0).unwrap();
        lp.at_most(vec![2.0, -2.0], 2.0).unwrap();
        let reduced = lp.reduce().unwrap();
        assert_eq!(reduced.rows.len(), 1);
        assert_eq!(reduced.rows[0].rhs, 1.0);
    }

    #[test]
    fn crossed_bounds_are_infeasible() {
        let mut lp = LinearProgram::new(2);
        lp.at_least(vec![0.0, 1.0], 2.0).unwrap();
        lp.at_most(vec![0.0, 3.0], 3.0).unwrap();
        assert_eq!(lp.solve(), Err(SolverError::Infeasible));
    }

    #[test]
    fn degenerate_ties_keep_a_distribution() {
        // Many equal-payoff columns with one dominated action: the optimal
        // face is large and degenerate.
        let n = 6;
        let mut lp = LinearProgram::new(n);
        for col in 0..n {
            let mut row = vec![0.0; n];
            row[col] = 1.0;
            lp.at_least(row, 0.0).unwrap();
        }
        for k in 1..n {
            let mut row = vec![0.0; n];
            row[0] = 1.0;
            row[k] = -1.0;
            lp.at_least(row.clone(), 0.0).unwrap();
            lp.at_least(row, 0.0).unwrap();
        }
        lp.at_least(vec![1.0; n], 1.0).unwrap();
        lp.at_most(vec![1.0; n], 1.0).unwrap();
        lp.maximize(vec![1.0; n]).unwrap();

        let solution = lp.solve_centered(0..n).unwrap();
        let total: f64 = solution.x.iter().sum();
        assert!(approx(total, 1.0));
        assert!(solution.x.iter().all(|&p| p > -1e-9));
    }
}
