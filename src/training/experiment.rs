//! Self-play suite with cross-evaluation.
//!
//! Every requested learner first trains against a copy of itself. The runs
//! share nothing, so they execute in parallel. Afterwards each trained
//! player-A agent is evaluated against every other kind's trained player-B
//! agent and against a fresh random agent.

use std::fmt;

use log::debug;
use rayon::prelude::*;

use super::config::TrainingConfig;
use super::error::TrainingError;
use super::game::SoccerGame;
use super::metrics::{EvaluationMetrics, TrainingReport};
use crate::agents::{Agent, AgentKind, RandomAgent};

/// Seed spacing between runs so their streams do not overlap.
const RUN_SEED_STRIDE: u64 = 1_000;

/// Both trained players of one self-play run.
pub struct TrainedRun {
    pub kind: AgentKind,
    /// Learner that played A.
    pub agent: Box<dyn Agent>,
    /// Learner that played B.
    pub opponent: Box<dyn Agent>,
    pub report: TrainingReport,
}

/// Greedy evaluation of one pairing, from the first kind's side.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub agent: AgentKind,
    pub opponent: AgentKind,
    pub metrics: EvaluationMetrics,
}

/// Everything an experiment produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentReport {
    pub training: Vec<TrainingReport>,
    pub matches: Vec<MatchResult>,
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.training {
            writeln!(f, "{}", report)?;
        }
        writeln!(f, "=== Cross evaluation ===")?;
        for m in &self.matches {
            writeln!(
                f,
                "  {:<12} vs {:<12} win rate {:.4}",
                m.agent.name(),
                m.opponent.name(),
                m.metrics.win_rate()
            )?;
        }
        Ok(())
    }
}

/// Mutable access to two distinct elements of a slice.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    assert_ne!(i, j, "pair_mut needs two distinct indices");
    if i < j {
        let (left, right) = items.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

/// A suite of self-play runs sharing one configuration.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: TrainingConfig,
    kinds: Vec<AgentKind>,
}

impl Experiment {
    /// Creates an experiment after validating the shared configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Settings used for every self-play run and evaluation.
    /// * `kinds` - Agent kinds to train, one self-play run each.
    pub fn new(config: TrainingConfig, kinds: Vec<AgentKind>) -> Result<Self, TrainingError> {
        config.validate()?;
        Ok(Self { config, kinds })
    }

    pub fn kinds(&self) -> &[AgentKind] {
        &self.kinds
    }

    fn run_seed(&self, index: usize) -> u64 {
        self.config
            .seed
            .wrapping_add(RUN_SEED_STRIDE.wrapping_mul(index as u64))
    }

    fn game(&self, seed: u64) -> Result<SoccerGame, TrainingError> {
        SoccerGame::new(TrainingConfig {
            seed,
            ..self.config.clone()
        })
    }

    fn train_one(&self, index: usize, kind: AgentKind) -> Result<TrainedRun, TrainingError> {
        let seed = self.run_seed(index);
        debug!("training {} self-play with seed {}", kind, seed);
        let mut agent = kind.build(self.config.gamma, seed.wrapping_add(1));
        let mut opponent = kind.build(self.config.gamma, seed.wrapping_add(2));
        let report = self.game(seed)?.train(agent.as_mut(), opponent.as_mut())?;
        debug!("finished {} self-play, recent win rate {:.2}", kind, report.win_rate);
        Ok(TrainedRun {
            kind,
            agent,
            opponent,
            report,
        })
    }

    /// Trains every kind against itself, in parallel.
    pub fn train_all(&self) -> Result<Vec<TrainedRun>, TrainingError> {
        self.kinds
            .par_iter()
            .enumerate()
            .map(|(index, &kind)| self.train_one(index, kind))
            .collect()
    }

    /// Evaluates every ordered pair of distinct runs, then every run against
    /// a fresh random agent.
    pub fn cross_evaluate(&self, runs: &mut [TrainedRun]) -> Result<Vec<MatchResult>, TrainingError> {
        let episodes = self.config.eval_episodes;
        let mut matches = Vec::new();
        let mut match_seed = self.run_seed(runs.len());

        for i in 0..runs.len() {
            for j in (0..runs.len()).filter(|&j| j != i) {
                let (first, second) = pair_mut(runs, i, j);
                let metrics = self
                    .game(match_seed)?
                    .evaluate(first.agent.as_mut(), second.opponent.as_mut(), episodes);
                matches.push(MatchResult {
                    agent: first.kind,
                    opponent: second.kind,
                    metrics,
                });
                match_seed = match_seed.wrapping_add(1);
            }
        }

        for run in runs.iter_mut() {
            let mut random = RandomAgent::new(match_seed);
            let metrics = self
                .game(match_seed)?
                .evaluate(run.agent.as_mut(), &mut random, episodes);
            matches.push(MatchResult {
                agent: run.kind,
                opponent: AgentKind::Random,
                metrics,
            });
            match_seed = match_seed.wrapping_add(1);
        }
        Ok(matches)
    }

    /// Trains all runs and cross-evaluates them.
    pub fn run(&self) -> Result<ExperimentReport, TrainingError> {
        let mut runs = self.train_all()?;
        let matches = self.cross_evaluate(&mut runs)?;
        Ok(ExperimentReport {
            training: runs.into_iter().map(|run| run.report).collect(),
            matches,
        })
    }
}
