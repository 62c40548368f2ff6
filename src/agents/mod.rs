//! Tabular learners for two-player soccer.

pub mod ce_q;
pub mod foe_q;
pub mod friend_q;
pub mod kind;
pub mod q_learning;
pub mod random;
pub mod select;
pub mod table;
pub mod trait_;

pub use ce_q::CorrelatedQ;
pub use foe_q::FoeQ;
pub use friend_q::FriendQ;
pub use kind::AgentKind;
pub use q_learning::QLearner;
pub use random::RandomAgent;
pub use table::{joint_index, ValueTable};
pub use trait_::{Agent, Transition};

/// Initial value of every Q and V cell.
pub const INITIAL_Q: f64 = 1.0;
