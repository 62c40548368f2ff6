//! markov_soccer - multi-agent reinforcement learning on grid soccer
//!
//! A two-player zero-sum soccer game on a 2×4 field together with four
//! tabular learners (independent Q-learning, Friend-Q, Foe-Q and
//! utilitarian correlated-equilibrium Q), a random baseline, and the
//! training loop and evaluator that pit them against each other.

pub mod agents;
pub mod environment;
pub mod solver;
pub mod training;

pub use agents::{Agent, AgentKind, CorrelatedQ, FoeQ, FriendQ, QLearner, RandomAgent, Transition};
pub use environment::{Action, Possession, SoccerEnvironment, State, StepResult};
pub use training::{EvaluationMetrics, Experiment, SoccerGame, TrainingConfig, TrainingError, TrainingReport};
