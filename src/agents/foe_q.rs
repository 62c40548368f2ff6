//! Foe-Q: the opponent is assumed to minimise our return.
//!
//! Each learning step solves the minimax program for the current state and
//! stores the resulting mixed policy and guaranteed value. Acting samples
//! from the stored policy.

use log::trace;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::select::{blend, sample_index, td_target};
use super::table::{joint_index, ValueTable};
use super::trait_::{Agent, Transition};
use super::INITIAL_Q;
use crate::environment::{Action, State, NUM_ACTIONS, NUM_JOINT_ACTIONS};
use crate::solver::{solve_minimax, SolverError};

#[derive(Debug, Clone)]
pub struct FoeQ {
    gamma: f64,
    q: ValueTable,
    values: ValueTable,
    policy: ValueTable,
    rng: StdRng,
}

impl FoeQ {
    /// Creates a Foe-Q learner with uniform policies in every state.
    ///
    /// # Arguments
    ///
    /// * `gamma` - Discount applied to the next state's minimax value.
    /// * `seed` - Seed for sampling actions from the mixed policy.
    pub fn new(gamma: f64, seed: u64) -> Self {
        Self {
            gamma,
            q: ValueTable::new(NUM_JOINT_ACTIONS, INITIAL_Q),
            values: ValueTable::new(1, INITIAL_Q),
            policy: ValueTable::new(NUM_ACTIONS, 1.0 / NUM_ACTIONS as f64),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stored mixed policy over own actions for `state`.
    pub fn policy(&self, state: State) -> &[f64] {
        self.policy.row(state)
    }

    /// Stored minimax value of `state`.
    pub fn value(&self, state: State) -> f64 {
        self.values.get(state, 0)
    }
}

impl Agent for FoeQ {
    fn act(&mut self, state: State) -> Action {
        Action::ALL[sample_index(self.policy.row(state), &mut self.rng)]
    }

    fn learn(&mut self, alpha: f64, t: &Transition) -> Result<(), SolverError> {
        let solution = solve_minimax(self.q.row(t.state), NUM_ACTIONS)?;
        trace!("foe-q state {} value {:.4}", t.state, solution.value);
        self.policy.set_row(t.state, &solution.policy);
        self.values.set(t.state, 0, solution.value);

        let next_value = self.values.get(t.next_state, 0);
        let target = td_target(t.reward, self.gamma, next_value, t.done);
        let column = joint_index(t.action, t.opponent_action);
        let updated = blend(self.q.get(t.state, column), target, alpha);
        self.q.set(t.state, column, updated);
        Ok(())
    }

    fn q_value(&self, state: State, action: Action, opponent_action: Action) -> f64 {
        self.q.get(state, joint_index(action, opponent_action))
    }

    fn name(&self) -> &str {
        "foe-q"
    }
}
