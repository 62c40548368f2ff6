//! Correlated-equilibrium Q-learning (utilitarian CE-Q).
//!
//! The learner keeps a joint-action table for itself and one for its
//! opponent, learned from the opponent's reward. Every learning step solves
//! for the welfare-maximising correlated equilibrium of the current state and
//! stores the joint distribution along with both expected values.

use log::trace;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::select::{blend, sample_index, td_target};
use super::table::{joint_index, ValueTable};
use super::trait_::{Agent, Transition};
use super::INITIAL_Q;
use crate::environment::{Action, State, NUM_ACTIONS, NUM_JOINT_ACTIONS};
use crate::solver::{solve_correlated, SolverError};

#[derive(Debug, Clone)]
pub struct CorrelatedQ {
    gamma: f64,
    q: ValueTable,
    opponent_q: ValueTable,
    values: ValueTable,
    opponent_values: ValueTable,
    policy: ValueTable,
    rng: StdRng,
}

impl CorrelatedQ {
    /// Creates a CE-Q learner with a uniform joint policy in every state.
    ///
    /// # Arguments
    ///
    /// * `gamma` - Discount applied to both players' next-state values.
    /// * `seed` - Seed for sampling actions from the marginal policy.
    pub fn new(gamma: f64, seed: u64) -> Self {
        Self {
            gamma,
            q: ValueTable::new(NUM_JOINT_ACTIONS, INITIAL_Q),
            opponent_q: ValueTable::new(NUM_JOINT_ACTIONS, INITIAL_Q),
            values: ValueTable::new(1, INITIAL_Q),
            opponent_values: ValueTable::new(1, INITIAL_Q),
            policy: ValueTable::new(NUM_JOINT_ACTIONS, 1.0 / NUM_JOINT_ACTIONS as f64),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stored joint distribution for `state`, indexed `5 * own + opponent`.
    pub fn joint_policy(&self, state: State) -> &[f64] {
        self.policy.row(state)
    }

    /// Probability of each own action under the stored joint distribution.
    pub fn marginal(&self, state: State) -> [f64; NUM_ACTIONS] {
        let row = self.policy.row(state);
        let mut marginal = [0.0; NUM_ACTIONS];
        for (a, slot) in marginal.iter_mut().enumerate() {
            *slot = row[a * NUM_ACTIONS..(a + 1) * NUM_ACTIONS].iter().sum();
        }
        marginal
    }

    /// Stored expected value of `state` for this agent.
    pub fn value(&self, state: State) -> f64 {
        self.values.get(state, 0)
    }

    /// Stored expected value of `state` for the opponent.
    pub fn opponent_value(&self, state: State) -> f64 {
        self.opponent_values.get(state, 0)
    }

    /// Opponent's joint-action value for the given cell.
    pub fn opponent_q_value(&self, state: State, action: Action, opponent_action: Action) -> f64 {
        self.opponent_q.get(state, joint_index(action, opponent_action))
    }
}

fn expectation(probabilities: &[f64], values: &[f64]) -> f64 {
    probabilities.iter().zip(values).map(|(p, v)| p * v).sum()
}

impl Agent for CorrelatedQ {
    fn act(&mut self, state: State) -> Action {
        let marginal = self.marginal(state);
        Action::ALL[sample_index(&marginal, &mut self.rng)]
    }

    fn learn(&mut self, alpha: f64, t: &Transition) -> Result<(), SolverError> {
        let s = t.state;
        let pi = solve_correlated(self.q.row(s), self.opponent_q.row(s), NUM_ACTIONS)?;
        let value = expectation(&pi, self.q.row(s));
        let opponent_value = expectation(&pi, self.opponent_q.row(s));
        trace!("ce-q state {} values {:.4} / {:.4}", s, value, opponent_value);
        self.policy.set_row(s, &pi);
        self.values.set(s, 0, value);
        self.opponent_values.set(s, 0, opponent_value);

        let column = joint_index(t.action, t.opponent_action);
        let target = td_target(t.reward, self.gamma, self.value(t.next_state), t.done);
        let updated = blend(self.q.get(s, column), target, alpha);
        self.q.set(s, column, updated);

        let opponent_target = td_target(
            t.opponent_reward,
            self.gamma,
            self.opponent_value(t.next_state),
            t.done,
        );
        let updated = blend(self.opponent_q.get(s, column), opponent_target, alpha);
        self.opponent_q.set(s, column, updated);
        Ok(())
    }

    fn q_value(&self, state: State, action: Action, opponent_action: Action) -> f64 {
        self.q.get(state, joint_index(action, opponent_action))
    }

    fn name(&self) -> &str {
        "ce-q"
    }
}
