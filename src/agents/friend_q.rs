//! Friend-Q: the opponent is assumed to cooperate.
//!
//! Values are kept per joint action, and the value of a state is the best
//! joint outcome, as if both players were maximising the same table.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::select::{argmax_random, blend, td_target};
use super::table::{joint_index, ValueTable};
use super::trait_::{Agent, Transition};
use super::INITIAL_Q;
use crate::environment::{Action, State, NUM_ACTIONS, NUM_JOINT_ACTIONS};
use crate::solver::SolverError;

#[derive(Debug, Clone)]
pub struct FriendQ {
    gamma: f64,
    q: ValueTable,
    rng: StdRng,
}

impl FriendQ {
    /// Creates a Friend-Q learner over the joint action table.
    ///
    /// # Arguments
    ///
    /// * `gamma` - Discount applied to the next state's joint maximum.
    /// * `seed` - Seed for tie-breaking between equal actions.
    pub fn new(gamma: f64, seed: u64) -> Self {
        Self {
            gamma,
            q: ValueTable::new(NUM_JOINT_ACTIONS, INITIAL_Q),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Best achievable joint value for each own action in `state`.
    fn best_per_action(&self, state: State) -> [f64; NUM_ACTIONS] {
        let row = self.q.row(state);
        let mut best = [f64::NEG_INFINITY; NUM_ACTIONS];
        for (a, slot) in best.iter_mut().enumerate() {
            *slot = row[a * NUM_ACTIONS..(a + 1) * NUM_ACTIONS]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
        }
        best
    }
}

impl Agent for FriendQ {
    fn act(&mut self, state: State) -> Action {
        let best = self.best_per_action(state);
        Action::ALL[argmax_random(&best, &mut self.rng)]
    }

    fn learn(&mut self, alpha: f64, t: &Transition) -> Result<(), SolverError> {
        let next_value = self.q.row_max(t.next_state);
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
        "friend-q"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> State {
        State::from_indices(2, 1, 0).unwrap()
    }

    #[test]
    fn updates_only_the_joint_cell() {
        let mut agent = FriendQ::new(0.9, 0);
        let s = sample_state();
        let t = Transition {
            state: s,
            action: Action::South,
            opponent_action: Action::Stick,
            next_state: s,
            reward: 100.0,
            opponent_reward: -100.0,
            done: true,
        };
        agent.learn(0.5, &t).unwrap();
        assert!((agent.q_value(s, Action::South, Action::Stick) - 5.5).abs() < 1e-12);
        assert_eq!(agent.q_value(s, Action::South, Action::North), INITIAL_Q);
    }

    #[test]
    fn bootstraps_from_best_joint_value() {
        let mut agent = FriendQ::new(0.5, 0);
        let s = sample_state();
        let next = State::from_indices(5, 6, 1).unwrap();
        agent.q.set(next, joint_index(Action::East, Action::West), 40.0);
        let t = Transition {
            state: s,
            action: Action::North,
            opponent_action: Action::North,
            next_state: next,
            reward: 0.0,
            opponent_reward: 0.0,
            done: false,
        };
        agent.learn(1.0, &t).unwrap();
        assert!((agent.q_value(s, Action::North, Action::North) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn acts_toward_best_joint_outcome() {
        let mut agent = FriendQ::new(0.9, 0);
        let s = sample_state();
        // The best cell is reached with own action East, whatever the opponent's
        // column is.
        agent.q.set(s, joint_index(Action::East, Action::West), 9.0);
        agent.q.set(s, joint_index(Action::North, Action::North), 5.0);
        for _ in 0..20 {
            assert_eq!(agent.act(s), Action::East);
        }
    }
}
