//! Training diagnostics and evaluation results.

use std::collections::VecDeque;
use std::fmt;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::environment::GOAL_REWARD;

/// Rolling record of the most recent episode outcomes.
#[derive(Debug, Clone)]
pub struct WinWindow {
    outcomes: VecDeque<bool>,
    capacity: usize,
}

impl WinWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records one finished episode, evicting the oldest when full.
    pub fn push(&mut self, won: bool) {
        if self.outcomes.len() == self.capacity {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(won);
    }

    /// Fraction of recorded episodes that were won; `0.0` before any.
    pub fn rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.outcomes.iter().filter(|&&won| won).count() as f64 / self.outcomes.len() as f64
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Outcome of one training run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainingReport {
    /// Name of the player-A learner.
    pub agent: String,
    /// Name of the player-B learner.
    pub opponent: String,
    /// Absolute change of the sampled Q cell, one entry per episode.
    pub deltas: Vec<f64>,
    /// Times the sampled `(state, action, opponent action)` was played.
    pub sample_visits: usize,
    /// Learning rate after the last episode.
    pub final_alpha: f64,
    /// Exploration rate after the last episode.
    pub final_epsilon: f64,
    /// Player A's win rate over the last recorded episodes.
    pub win_rate: f64,
}

impl TrainingReport {
    /// Number of episodes trained.
    pub fn episodes(&self) -> usize {
        self.deltas.len()
    }

    /// Sliding mean of the delta sequence over `window` consecutive episodes.
    ///
    /// Returns an empty vector when the window is zero or longer than the run.
    pub fn moving_average(&self, window: usize) -> Vec<f64> {
        if window == 0 || window > self.deltas.len() {
            return Vec::new();
        }
        self.deltas
            .windows(window)
            .map(|w| w.iter().sum::<f64>() / window as f64)
            .collect()
    }

    /// Mean delta over the given episode range, if it is non-empty and in bounds.
    pub fn mean_delta(&self, range: Range<usize>) -> Option<f64> {
        let slice = self.deltas.get(range)?;
        if slice.is_empty() {
            return None;
        }
        Some(slice.iter().sum::<f64>() / slice.len() as f64)
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Training {} vs {} ({} episodes) ===",
            self.agent,
            self.opponent,
            self.episodes()
        )?;
        writeln!(f, "  Sample visits:    {}", self.sample_visits)?;
        writeln!(f, "  Final alpha:      {:.4}", self.final_alpha)?;
        writeln!(f, "  Final epsilon:    {:.4}", self.final_epsilon)?;
        write!(f, "  Recent win rate:  {:.2}", self.win_rate)
    }
}

/// Results of greedy evaluation episodes from player A's side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvaluationMetrics {
    /// Episodes ending with +100 for player A.
    pub wins: usize,
    /// Episodes ending with -100 for player A.
    pub losses: usize,
    /// Episodes stopped by the step cap.
    pub draws: usize,
}

impl EvaluationMetrics {
    /// Classifies one episode by its final reward.
    pub fn record(&mut self, reward: f64) {
        if reward == GOAL_REWARD {
            self.wins += 1;
        } else if reward == -GOAL_REWARD {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
    }

    pub fn episodes(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    /// Fraction of episodes won; `0.0` when nothing was played.
    pub fn win_rate(&self) -> f64 {
        match self.episodes() {
            0 => 0.0,
            n => self.wins as f64 / n as f64,
        }
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Evaluation ({} episodes) ===", self.episodes())?;
        writeln!(f, "  Wins:      {}", self.wins)?;
        writeln!(f, "  Losses:    {}", self.losses)?;
        writeln!(f, "  Draws:     {}", self.draws)?;
        write!(f, "  Win rate:  {:.4}", self.win_rate())
    }
}
