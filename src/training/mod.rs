//! Training loop, evaluation and experiment orchestration.

pub mod config;
pub mod error;
pub mod experiment;
pub mod game;
pub mod metrics;
pub mod schedule;

pub use config::{SampleCell, TrainingConfig};
pub use error::TrainingError;
pub use experiment::{Experiment, ExperimentReport, MatchResult, TrainedRun};
pub use game::SoccerGame;
pub use metrics::{EvaluationMetrics, TrainingReport, WinWindow};
pub use schedule::DecaySchedule;
