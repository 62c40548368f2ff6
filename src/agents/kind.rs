//! Agent variants selectable by name.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ce_q::CorrelatedQ;
use super::foe_q::FoeQ;
use super::friend_q::FriendQ;
use super::q_learning::QLearner;
use super::random::RandomAgent;
use super::trait_::Agent;
use crate::training::TrainingError;

/// The closed set of learners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AgentKind {
    QLearning,
    FriendQ,
    FoeQ,
    CeQ,
    Random,
}

impl AgentKind {
    /// Every variant, learners first.
    pub const ALL: [AgentKind; 5] = [
        AgentKind::QLearning,
        AgentKind::FriendQ,
        AgentKind::FoeQ,
        AgentKind::CeQ,
        AgentKind::Random,
    ];

    /// Name used on the command line and in reports.
    pub fn name(self) -> &'static str {
        match self {
            AgentKind::QLearning => "q-learning",
            AgentKind::FriendQ => "friend-q",
            AgentKind::FoeQ => "foe-q",
            AgentKind::CeQ => "ce-q",
            AgentKind::Random => "random",
        }
    }

    /// Builds a fresh agent of this kind.
    pub fn build(self, gamma: f64, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::QLearning => Box::new(QLearner::new(gamma, seed)),
            AgentKind::FriendQ => Box::new(FriendQ::new(gamma, seed)),
            AgentKind::FoeQ => Box::new(FoeQ::new(gamma, seed)),
            AgentKind::CeQ => Box::new(CorrelatedQ::new(gamma, seed)),
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for AgentKind {
    type Err = TrainingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| TrainingError::UnknownAgent(s.to_string()))
    }
}
