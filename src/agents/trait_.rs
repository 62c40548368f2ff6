//! Agent trait shared by every learner.

use crate::environment::{Action, State};
use crate::solver::SolverError;

/// One observed step, seen from the learning agent's side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// State the joint action was taken in.
    pub state: State,
    /// The learning agent's own action.
    pub action: Action,
    /// The other player's action.
    pub opponent_action: Action,
    /// State after both moves resolved.
    pub next_state: State,
    /// Reward for the learning agent.
    pub reward: f64,
    /// Reward for the other player.
    pub opponent_reward: f64,
    /// Whether the step ended the episode.
    pub done: bool,
}

impl Transition {
    /// The same step from the other player's side: actions swapped and
    /// rewards exchanged.
    pub fn mirrored(&self) -> Transition {
        Transition {
            state: self.state,
            action: self.opponent_action,
            opponent_action: self.action,
            next_state: self.next_state,
            reward: self.opponent_reward,
            opponent_reward: self.reward,
            done: self.done,
        }
    }
}

/// A tabular learner playing one side of the soccer game.
///
/// States are always the global state; an agent playing B simply receives
/// rewards negated relative to A.
pub trait Agent: Send {
    /// Chooses an action for `state` from the agent's current policy.
    fn act(&mut self, state: State) -> Action;

    /// Applies one learning update with step size `alpha`.
    fn learn(&mut self, alpha: f64, transition: &Transition) -> Result<(), SolverError>;

    /// Current value estimate for the `(state, action, opponent_action)` cell.
    ///
    /// Learners that ignore the opponent return the value of `action` alone.
    fn q_value(&self, state: State, action: Action, opponent_action: Action) -> f64;

    /// Returns a short name for this agent.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_swaps_sides() {
        let s = State::from_indices(2, 1, 0).unwrap();
        let t = Transition {
            state: s,
            action: Action::South,
            opponent_action: Action::Stick,
            next_state: s,
            reward: 100.0,
            opponent_reward: -100.0,
            done: true,
        };
        let m = t.mirrored();
        assert_eq!(m.action, Action::Stick);
        assert_eq!(m.opponent_action, Action::South);
        assert_eq!(m.reward, -100.0);
        assert_eq!(m.opponent_reward, 100.0);
        assert_eq!(m.mirrored(), t);
    }
}
