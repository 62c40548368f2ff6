//! Core types for the grid soccer game.
//!
//! The field is a 2×4 grid numbered row-major:
//!
//! ```text
//! +---+---+---+---+
//! | 0 | 1 | 2 | 3 |
//! +---+---+---+---+
//! | 4 | 5 | 6 | 7 |
//! +---+---+---+---+
//! ```
//!
//! Player A scores in the left column `{0, 4}`, player B in the right
//! column `{3, 7}`.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::EnvironmentError;

/// Number of cells on the field.
pub const NUM_CELLS: usize = 8;

/// Number of discrete moves available to each player.
pub const NUM_ACTIONS: usize = 5;

/// Number of joint `(own, opponent)` action pairs.
pub const NUM_JOINT_ACTIONS: usize = NUM_ACTIONS * NUM_ACTIONS;

/// Size of the dense state index space (`posA × posB × possession`).
///
/// Slots with `posA == posB` are never reached but keep the offset formula
/// a plain mixed-radix product.
pub const NUM_STATES: usize = NUM_CELLS * NUM_CELLS * 2;

/// Cells that count as a goal for player A.
pub const GOAL_CELLS_A: [usize; 2] = [0, 4];

/// Cells that count as a goal for player B.
pub const GOAL_CELLS_B: [usize; 2] = [3, 7];

/// Cells players may be placed on at the start of an episode.
pub const START_CELLS: [usize; 4] = [1, 2, 5, 6];

/// One of the five moves a player may choose each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    North,
    South,
    East,
    West,
    Stick,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; NUM_ACTIONS] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Stick,
    ];

    /// Returns the index of this action (`North = 0 ... Stick = 4`).
    pub fn index(self) -> usize {
        match self {
            Action::North => 0,
            Action::South => 1,
            Action::East => 2,
            Action::West => 3,
            Action::Stick => 4,
        }
    }

    /// Cell offset applied by this move on the row-major grid.
    pub fn offset(self) -> isize {
        match self {
            Action::North => -4,
            Action::South => 4,
            Action::East => 1,
            Action::West => -1,
            Action::Stick => 0,
        }
    }

    /// Returns the cell reached from `position`, or `position` itself when the
    /// move would leave the field.
    ///
    /// Only the `0..8` bound is checked, so `East` from cell 3 lands on cell 4.
    pub fn apply(self, position: usize) -> usize {
        let target = position as isize + self.offset();
        if (0..NUM_CELLS as isize).contains(&target) {
            target as usize
        } else {
            position
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = EnvironmentError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(EnvironmentError::InvalidAction(index))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::North => write!(f, "N"),
            Action::South => write!(f, "S"),
            Action::East => write!(f, "E"),
            Action::West => write!(f, "W"),
            Action::Stick => write!(f, "stick"),
        }
    }
}

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Player {
    A,
    B,
}

impl Player {
    /// Returns the other player.
    pub fn other(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }
}

/// Which player currently holds the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Possession {
    BHasBall,
    AHasBall,
}

impl Possession {
    /// Index used in the state space (`B = 0`, `A = 1`).
    pub fn index(self) -> usize {
        match self {
            Possession::BHasBall => 0,
            Possession::AHasBall => 1,
        }
    }

    /// Returns the player holding the ball.
    pub fn holder(self) -> Player {
        match self {
            Possession::AHasBall => Player::A,
            Possession::BHasBall => Player::B,
        }
    }

    /// Possession with `player` holding the ball.
    pub fn held_by(player: Player) -> Self {
        match player {
            Player::A => Possession::AHasBall,
            Player::B => Possession::BHasBall,
        }
    }
}

impl TryFrom<usize> for Possession {
    type Error = EnvironmentError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Possession::BHasBall),
            1 => Ok(Possession::AHasBall),
            other => Err(EnvironmentError::InvalidPossession(other)),
        }
    }
}

/// Observable game state: both positions and ball possession.
///
/// Invariant: `pos_a != pos_b` and both positions lie in `0..8`.
/// Deserialization goes through [`State::new`], so the invariant holds for
/// decoded states too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawState"))]
pub struct State {
    pos_a: usize,
    pos_b: usize,
    possession: Possession,
}

impl State {
    /// Creates a state, rejecting off-field or overlapping positions.
    pub fn new(pos_a: usize, pos_b: usize, possession: Possession) -> Result<Self, EnvironmentError> {
        for pos in [pos_a, pos_b] {
            if pos >= NUM_CELLS {
                return Err(EnvironmentError::PositionOutOfRange(pos));
            }
        }
        if pos_a == pos_b {
            return Err(EnvironmentError::Collision(pos_a));
        }
        Ok(Self {
            pos_a,
            pos_b,
            possession,
        })
    }

    /// Builds a state from positions already known to be valid.
    pub(crate) fn from_valid(pos_a: usize, pos_b: usize, possession: Possession) -> Self {
        debug_assert!(pos_a < NUM_CELLS && pos_b < NUM_CELLS && pos_a != pos_b);
        Self {
            pos_a,
            pos_b,
            possession,
        }
    }

    /// Creates a state from the raw `(posA, posB, possession)` triple.
    pub fn from_indices(pos_a: usize, pos_b: usize, possession: usize) -> Result<Self, EnvironmentError> {
        Self::new(pos_a, pos_b, Possession::try_from(possession)?)
    }

    /// Position of player A.
    pub fn pos_a(&self) -> usize {
        self.pos_a
    }

    /// Position of player B.
    pub fn pos_b(&self) -> usize {
        self.pos_b
    }

    /// Current ball possession.
    pub fn possession(&self) -> Possession {
        self.possession
    }

    /// Position of the given player.
    pub fn position_of(&self, player: Player) -> usize {
        match player {
            Player::A => self.pos_a,
            Player::B => self.pos_b,
        }
    }

    /// Returns the raw `(posA, posB, possession)` triple.
    pub fn indices(&self) -> (usize, usize, usize) {
        (self.pos_a, self.pos_b, self.possession.index())
    }

    /// Every valid state, in index order.
    pub fn all() -> impl Iterator<Item = State> {
        (0..NUM_CELLS).flat_map(|pos_a| {
            (0..NUM_CELLS).filter(move |&pos_b| pos_b != pos_a).flat_map(move |pos_b| {
                [Possession::BHasBall, Possession::AHasBall]
                    .into_iter()
                    .map(move |possession| State::from_valid(pos_a, pos_b, possession))
            })
        })
    }

    /// Dense index of this state in `0..NUM_STATES`.
    pub fn index(&self) -> usize {
        (self.pos_a * NUM_CELLS + self.pos_b) * 2 + self.possession.index()
    }

    pub(crate) fn set_position(&mut self, player: Player, position: usize) {
        match player {
            Player::A => self.pos_a = position,
            Player::B => self.pos_b = position,
        }
    }

    pub(crate) fn set_possession(&mut self, possession: Possession) {
        self.possession = possession;
    }
}

/// Unchecked wire form of [`State`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawState {
    pos_a: usize,
    pos_b: usize,
    possession: Possession,
}

#[cfg(feature = "serde")]
impl TryFrom<RawState> for State {
    type Error = EnvironmentError;

    fn try_from(raw: RawState) -> Result<Self, Self::Error> {
        State::new(raw.pos_a, raw.pos_b, raw.possession)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let holder = match self.possession {
            Possession::AHasBall => "A",
            Possession::BHasBall => "B",
        };
        write!(f, "(A@{}, B@{}, ball={})", self.pos_a, self.pos_b, holder)
    }
}
