//! Independent Q-learning.
//!
//! The learner ignores the opponent entirely and treats it as part of the
//! environment: one value per `(state, own action)`.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::select::{argmax_random, blend, td_target};
use super::table::ValueTable;
use super::trait_::{Agent, Transition};
use super::INITIAL_Q;
use crate::environment::{Action, State, NUM_ACTIONS};
use crate::solver::SolverError;

/// Tabular Q-learner over own actions.
#[derive(Debug, Clone)]
pub struct QLearner {
    gamma: f64,
    q: ValueTable,
    rng: StdRng,
}

impl QLearner {
    /// Creates a learner with every Q entry at the initial value.
    ///
    /// # Arguments
    ///
    /// * `gamma` - Discount applied to the next state's value.
    /// * `seed` - Seed for exploration and tie-breaking.
    pub fn new(gamma: f64, seed: u64) -> Self {
        Self {
            gamma,
            q: ValueTable::new(NUM_ACTIONS, INITIAL_Q),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Action values for `state`.
    pub fn values(&self, state: State) -> &[f64] {
        self.q.row(state)
    }
}

impl Agent for QLearner {
    fn act(&mut self, state: State) -> Action {
        Action::ALL[argmax_random(self.q.row(state), &mut self.rng)]
    }

    fn learn(&mut self, alpha: f64, t: &Transition) -> Result<(), SolverError> {
        let next_value = self.q.row_max(t.next_state);
        let target = td_target(t.reward, self.gamma, next_value, t.done);
        let column = t.action.index();
        let updated = blend(self.q.get(t.state, column), target, alpha);
        self.q.set(t.state, column, updated);
        Ok(())
    }

    fn q_value(&self, state: State, action: Action, _opponent_action: Action) -> f64 {
        self.q.get(state, action.index())
    }

    fn name(&self) -> &str {
        "q-learning"
    }
}
