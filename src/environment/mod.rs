//! The 2×4 grid soccer game.

pub mod error;
pub mod soccer;
pub mod types;

pub use error::EnvironmentError;
pub use soccer::{SoccerEnvironment, StepResult, GOAL_REWARD};
pub use types::{
    Action, Player, Possession, State, NUM_ACTIONS, NUM_CELLS, NUM_JOINT_ACTIONS, NUM_STATES,
};
