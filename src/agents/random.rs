//! Uniformly random baseline.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::{Agent, Transition};
use super::INITIAL_Q;
use crate::environment::{Action, State, NUM_ACTIONS};
use crate::solver::SolverError;

/// Picks every action uniformly at random and never learns.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    /// Creates a new random agent.
    ///
    /// # Arguments
    ///
    /// * `seed` - Seed for the action stream.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _state: State) -> Action {
        Action::ALL[self.rng.gen_range(0..NUM_ACTIONS)]
    }

    fn learn(&mut self, _alpha: f64, _transition: &Transition) -> Result<(), SolverError> {
        Ok(())
    }

    fn q_value(&self, _state: State, _action: Action, _opponent_action: Action) -> f64 {
        INITIAL_Q
    }

    fn name(&self) -> &str {
        "random"
    }
}
