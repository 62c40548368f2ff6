//! Grid soccer environment.
//!
//! Two players share a 2×4 field. Each step both pick a move; the order in
//! which the moves resolve is drawn fresh every step, and a player that tries
//! to step onto the other's cell stays put and, if it held the ball, hands it
//! over.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::types::{Action, Player, Possession, State, GOAL_CELLS_A, GOAL_CELLS_B, NUM_CELLS, START_CELLS};

/// Reward magnitude for a goal.
pub const GOAL_REWARD: f64 = 100.0;

/// Result of a single environment step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// State after both moves resolved.
    pub state: State,
    /// Reward for player A. Player B receives `-reward`.
    pub reward: f64,
    /// Whether a goal was scored.
    pub done: bool,
}

/// The two-player soccer environment.
///
/// # Lifecycle
///
/// 1. Call [`SoccerEnvironment::new`] with an RNG seed.
/// 2. Call [`SoccerEnvironment::reset`] to start an episode.
/// 3. Call [`SoccerEnvironment::step`] with both players' actions until `done`.
#[derive(Debug, Clone)]
pub struct SoccerEnvironment {
    state: State,
    rng: StdRng,
}

impl SoccerEnvironment {
    /// Creates an environment with a freshly reset state.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = Self::kickoff(&mut rng);
        Self { state, rng }
    }

    /// Creates an environment positioned at `state`.
    pub fn with_state(state: State, seed: u64) -> Self {
        Self {
            state,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Overrides the current state.
    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }

    /// Starts a new episode.
    ///
    /// Both players are placed on distinct start cells `{1, 2, 5, 6}` and the
    /// ball goes to either player with equal probability.
    pub fn reset(&mut self) -> State {
        self.state = Self::kickoff(&mut self.rng);
        self.state
    }

    fn kickoff(rng: &mut StdRng) -> State {
        let mut cells = START_CELLS;
        cells.shuffle(rng);
        let possession = if rng.gen::<bool>() {
            Possession::AHasBall
        } else {
            Possession::BHasBall
        };
        State::from_valid(cells[0], cells[1], possession)
    }

    /// Resolves both actions, drawing which player moves first.
    pub fn step(&mut self, action_a: Action, action_b: Action) -> StepResult {
        let first = if self.rng.gen::<f64>() > 0.5 {
            Player::A
        } else {
            Player::B
        };
        self.step_in_order(action_a, action_b, first)
    }

    /// Resolves both actions with `first` moving before the other player.
    pub fn step_in_order(&mut self, action_a: Action, action_b: Action, first: Player) -> StepResult {
        let (first_action, second_action) = match first {
            Player::A => (action_a, action_b),
            Player::B => (action_b, action_a),
        };
        self.move_player(first, first_action);
        self.move_player(first.other(), second_action);

        let reward = self.reward();
        StepResult {
            state: self.state,
            reward,
            done: reward != 0.0,
        }
    }

    fn move_player(&mut self, player: Player, action: Action) {
        let target = action.apply(self.state.position_of(player));
        if target != self.state.position_of(player.other()) {
            self.state.set_position(player, target);
        } else if self.state.possession().holder() == player {
            // Bumping into the opponent while carrying the ball loses it.
            self.state
                .set_possession(Possession::held_by(player.other()));
        }
    }

    /// Reward for player A in the current state.
    ///
    /// Whoever holds the ball scores for A on `{0, 4}` and for B on `{3, 7}`,
    /// so carrying the ball into your own goal scores for the opponent.
    pub fn reward(&self) -> f64 {
        let holder = self.state.possession().holder();
        let position = self.state.position_of(holder);
        if GOAL_CELLS_A.contains(&position) {
            GOAL_REWARD
        } else if GOAL_CELLS_B.contains(&position) {
            -GOAL_REWARD
        } else {
            0.0
        }
    }

    /// Prints the board to stdout.
    pub fn render(&self) {
        println!("{}", self);
    }
}

impl fmt::Display for SoccerEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "---------------------";
        writeln!(f, "{}", separator)?;
        for row in 0..2 {
            for col in 0..NUM_CELLS / 2 {
                let cell = row * 4 + col;
                let holder = self.state.possession().holder();
                let label = if cell == self.state.pos_a() {
                    if holder == Player::A { "A*" } else { "A " }
                } else if cell == self.state.pos_b() {
                    if holder == Player::B { "B*" } else { "B " }
                } else {
                    "  "
                };
                write!(f, "| {} ", label)?;
            }
            writeln!(f, "|")?;
            writeln!(f, "{}", separator)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(a: usize, b: usize, possession: usize) -> State {
        State::from_indices(a, b, possession).unwrap()
    }

    #[test]
    fn both_stick_keeps_state() {
        let start = state(1, 6, 0);
        for first in [Player::A, Player::B] {
            let mut env = SoccerEnvironment::with_state(start, 0);
            let result = env.step_in_order(Action::Stick, Action::Stick, first);
            assert_eq!(result.state, start);
            assert_eq!(result.reward, 0.0);
            assert!(!result.done);
        }
    }

    #[test]
    fn goal_for_a_regardless_of_b() {
        // A holding the ball on cell 1 moves West into goal cell 0.
        for action_b in Action::ALL {
            let mut env = SoccerEnvironment::with_state(state(1, 6, 1), 3);
            let result = env.step(Action::West, action_b);
            assert_eq!(result.state.pos_a(), 0);
            assert_eq!(result.reward, GOAL_REWARD);
            assert!(result.done);
        }
    }

    #[test]
    fn a_with_ball_in_b_goal_is_negative() {
        let mut env = SoccerEnvironment::with_state(state(2, 5, 1), 0);
        let result = env.step_in_order(Action::East, Action::Stick, Player::A);
        assert_eq!(result.state.pos_a(), 3);
        assert_eq!(result.reward, -GOAL_REWARD);
        assert!(result.done);
    }

    #[test]
    fn b_with_ball_in_left_goal_scores_for_a() {
        let mut env = SoccerEnvironment::with_state(state(6, 1, 0), 0);
        let result = env.step_in_order(Action::Stick, Action::West, Player::B);
        assert_eq!(result.state.pos_b(), 0);
        assert_eq!(result.reward, GOAL_REWARD);
    }

    #[test]
    fn bumping_with_ball_hands_it_over() {
        // A (with ball) on 1 moves East into B on 2 while B sticks.
        let mut env = SoccerEnvironment::with_state(state(1, 2, 1), 0);
        let result = env.step_in_order(Action::East, Action::Stick, Player::A);
        assert_eq!(result.state.pos_a(), 1);
        assert_eq!(result.state.pos_b(), 2);
        assert_eq!(result.state.possession(), Possession::BHasBall);
        assert!(!result.done);
    }

    #[test]
    fn bumping_without_ball_keeps_possession() {
        let mut env = SoccerEnvironment::with_state(state(1, 2, 0), 0);
        let result = env.step_in_order(Action::East, Action::Stick, Player::A);
        assert_eq!(result.state.pos_a(), 1);
        assert_eq!(result.state.possession(), Possession::BHasBall);
    }

    #[test]
    fn move_order_decides_swaps() {
        // A on 1, B on 2, A moves East and B moves West.
        // A first: A bumps B and loses the ball, then B bumps A and loses it back.
        let mut env = SoccerEnvironment::with_state(state(1, 2, 1), 0);
        let a_first = env.step_in_order(Action::East, Action::West, Player::A);
        assert_eq!((a_first.state.pos_a(), a_first.state.pos_b()), (1, 2));
        assert_eq!(a_first.state.possession(), Possession::AHasBall);

        // A moves South first into the free cell, B then follows into 1.
        env.set_state(state(1, 2, 1));
        let a_first = env.step_in_order(Action::South, Action::West, Player::A);
        assert_eq!((a_first.state.pos_a(), a_first.state.pos_b()), (5, 1));

        // B first: B is blocked by A on 1; B holds no ball so nothing changes.
        env.set_state(state(1, 2, 1));
        let b_first = env.step_in_order(Action::South, Action::West, Player::B);
        assert_eq!((b_first.state.pos_a(), b_first.state.pos_b()), (5, 2));
        assert_eq!(b_first.state.possession(), Possession::AHasBall);
    }

    #[test]
    fn reset_places_players_on_start_cells() {
        let mut env = SoccerEnvironment::new(11);
        let mut a_had_ball = 0;
        for _ in 0..400 {
            let s = env.reset();
            assert!(START_CELLS.contains(&s.pos_a()));
            assert!(START_CELLS.contains(&s.pos_b()));
            assert_ne!(s.pos_a(), s.pos_b());
            if s.possession() == Possession::AHasBall {
                a_had_ball += 1;
            }
        }
        assert!((120..280).contains(&a_had_ball));
    }

    #[test]
    fn positions_never_coincide() {
        let mut env = SoccerEnvironment::new(5);
        let mut rng = StdRng::seed_from_u64(6);
        env.reset();
        for _ in 0..2000 {
            let a = Action::ALL[rng.gen_range(0..5)];
            let b = Action::ALL[rng.gen_range(0..5)];
            let result = env.step(a, b);
            assert_ne!(result.state.pos_a(), result.state.pos_b());
            if result.done {
                env.reset();
            }
        }
    }

    #[test]
    fn render_marks_ball_holder() {
        let env = SoccerEnvironment::with_state(state(1, 6, 0), 0);
        let board = env.to_string();
        assert!(board.contains("| A  "));
        assert!(board.contains("| B* "));
        assert_eq!(board.lines().count(), 5);
    }
}
