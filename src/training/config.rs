//! Configuration for training runs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::TrainingError;
use crate::environment::{Action, Possession, State};

/// The `(state, action, opponent action)` cell whose value is tracked
/// across episodes as a convergence diagnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleCell {
    pub state: State,
    pub action: Action,
    pub opponent_action: Action,
}

impl SampleCell {
    /// Whether a step taken from `state` with the given joint action hits
    /// this cell exactly.
    pub fn matches(&self, state: State, action: Action, opponent_action: Action) -> bool {
        self.state == state && self.action == action && self.opponent_action == opponent_action
    }
}

impl Default for SampleCell {
    /// A on cell 2, B on cell 1 holding the ball; A plays South while B sticks.
    fn default() -> Self {
        Self {
            state: State::from_valid(2, 1, Possession::BHasBall),
            action: Action::South,
            opponent_action: Action::Stick,
        }
    }
}

/// Hyperparameters shared by both players of a training run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainingConfig {
    // --- Schedule ---
    /// Number of training episodes.
    pub num_episodes: usize,
    /// Initial learning rate.
    pub alpha_start: f64,
    /// Per-episode multiplicative decay of the learning rate.
    pub alpha_decay: f64,
    /// Learning rate below which decay stops.
    pub alpha_min: f64,
    /// Initial exploration rate.
    pub epsilon_start: f64,
    /// Per-episode multiplicative decay of the exploration rate.
    pub epsilon_decay: f64,
    /// Exploration rate below which decay stops.
    pub epsilon_min: f64,

    // --- Learning ---
    /// Discount factor.
    pub gamma: f64,

    // --- Episodes ---
    /// Step cap guarding against endless non-terminal play.
    pub max_steps: usize,
    /// Number of greedy episodes played by `evaluate`.
    pub eval_episodes: usize,

    // --- Diagnostics ---
    /// Episodes between progress log lines.
    pub log_interval: usize,
    /// Number of recent episodes the rolling win rate covers.
    pub win_window: usize,
    /// Cell whose value change is recorded after each episode.
    pub sample: SampleCell,

    /// Seed for the environment and the exploration coins.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 100_000,
            alpha_start: 1.0,
            alpha_decay: 0.99993,
            alpha_min: 0.001,
            epsilon_start: 1.0,
            epsilon_decay: 0.99993,
            epsilon_min: 0.01,
            gamma: 0.99,
            max_steps: 500,
            eval_episodes: 10_000,
            log_interval: 1000,
            win_window: 100,
            sample: SampleCell::default(),
            seed: 42,
        }
    }
}

fn check_unit(name: &str, value: f64) -> Result<(), TrainingError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TrainingError::InvalidConfig(format!(
            "{} must lie in [0, 1], got {}",
            name, value
        )))
    }
}

fn check_decay(name: &str, value: f64) -> Result<(), TrainingError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(TrainingError::InvalidConfig(format!(
            "{} must lie in (0, 1], got {}",
            name, value
        )))
    }
}

impl TrainingConfig {
    /// Rejects parameter combinations the training loop cannot honour.
    pub fn validate(&self) -> Result<(), TrainingError> {
        check_unit("gamma", self.gamma)?;
        check_unit("alpha_start", self.alpha_start)?;
        check_unit("epsilon_start", self.epsilon_start)?;
        check_decay("alpha_decay", self.alpha_decay)?;
        check_decay("epsilon_decay", self.epsilon_decay)?;
        let negative = |floor: f64| floor.is_nan() || floor < 0.0;
        if negative(self.alpha_min) || negative(self.epsilon_min) {
            return Err(TrainingError::InvalidConfig(
                "alpha_min and epsilon_min must be non-negative".into(),
            ));
        }
        if self.log_interval == 0 {
            return Err(TrainingError::InvalidConfig("log_interval must be positive".into()));
        }
        if self.win_window == 0 {
            return Err(TrainingError::InvalidConfig("win_window must be positive".into()));
        }
        let s = self.sample.state;
        State::new(s.pos_a(), s.pos_b(), s.possession())
            .map_err(|err| TrainingError::InvalidConfig(format!("sample state: {}", err)))?;
        Ok(())
    }
}
