//! Training loop and greedy evaluation for a pair of agents.
//!
//! # Episode lifecycle
//!
//! 1. The environment is reset to a random kickoff.
//! 2. Each step both agents choose from the same pre-step state; during
//!    training each one independently explores with probability epsilon.
//! 3. The environment resolves the joint action and both agents learn from
//!    the same transition, the opponent with actions swapped and rewards
//!    negated.
//! 4. The episode ends on a goal or once the step cap is exceeded.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::TrainingConfig;
use super::error::TrainingError;
use super::metrics::{EvaluationMetrics, TrainingReport, WinWindow};
use super::schedule::DecaySchedule;
use crate::agents::{Agent, Transition};
use crate::environment::{Action, SoccerEnvironment, State, GOAL_REWARD, NUM_ACTIONS};

/// Offset separating the exploration stream from the environment stream.
const EXPLORATION_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Plays, trains and evaluates two agents against each other.
///
/// The agent passed first always plays A, the second plays B.
#[derive(Debug, Clone)]
pub struct SoccerGame {
    config: TrainingConfig,
    env: SoccerEnvironment,
    rng: StdRng,
}

impl SoccerGame {
    /// Creates a game after validating `config`.
    pub fn new(config: TrainingConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        let env = SoccerEnvironment::new(config.seed);
        let rng = StdRng::seed_from_u64(config.seed ^ EXPLORATION_STREAM);
        Ok(Self { config, env, rng })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Epsilon-greedy choice: a uniformly random action with probability
    /// `epsilon`, otherwise the agent's own choice.
    fn explore(&mut self, agent: &mut dyn Agent, state: State, epsilon: f64) -> Action {
        if self.rng.gen::<f64>() < epsilon {
            Action::ALL[self.rng.gen_range(0..NUM_ACTIONS)]
        } else {
            agent.act(state)
        }
    }

    /// Whether the episode stops after the step numbered `step` (from 0).
    fn episode_over(&self, done: bool, step: usize) -> bool {
        done || step > self.config.max_steps
    }

    /// Trains both agents for `num_episodes` episodes.
    ///
    /// Any equilibrium solve failure aborts the run.
    pub fn train(&mut self, agent: &mut dyn Agent, opponent: &mut dyn Agent) -> Result<TrainingReport, TrainingError> {
        let cfg = self.config.clone();
        let sample = cfg.sample;
        let mut alpha = DecaySchedule::new(cfg.alpha_start, cfg.alpha_decay, cfg.alpha_min);
        let mut epsilon = DecaySchedule::new(cfg.epsilon_start, cfg.epsilon_decay, cfg.epsilon_min);
        let mut wins = WinWindow::new(cfg.win_window);
        let mut deltas = Vec::with_capacity(cfg.num_episodes);
        let mut sample_visits = 0;
        let mut tracked = agent.q_value(sample.state, sample.action, sample.opponent_action);

        for episode in 0..cfg.num_episodes {
            if episode % cfg.log_interval == cfg.log_interval - 1 {
                info!(
                    "episode {} / {}, win rate={:.2}, alpha={:.4}, epsilon={:.4}",
                    episode,
                    cfg.num_episodes,
                    wins.rate(),
                    alpha.value(),
                    epsilon.value()
                );
            }

            let mut state = self.env.reset();
            let mut step = 0;
            loop {
                let action = self.explore(agent, state, epsilon.value());
                let opponent_action = self.explore(opponent, state, epsilon.value());
                if sample.matches(state, action, opponent_action) {
                    sample_visits += 1;
                }

                let result = self.env.step(action, opponent_action);
                let transition = Transition {
                    state,
                    action,
                    opponent_action,
                    next_state: result.state,
                    reward: result.reward,
                    opponent_reward: -result.reward,
                    done: result.done,
                };
                agent.learn(alpha.value(), &transition)?;
                opponent.learn(alpha.value(), &transition.mirrored())?;

                if self.episode_over(result.done, step) {
                    if !result.done {
                        warn!("episode {} hit the step cap of {}", episode, cfg.max_steps);
                    }
                    wins.push(result.reward == GOAL_REWARD);
                    break;
                }
                state = result.state;
                step += 1;
            }

            alpha.step();
            epsilon.step();
            let current = agent.q_value(sample.state, sample.action, sample.opponent_action);
            deltas.push((current - tracked).abs());
            tracked = current;
        }

        debug!(
            "sample cell {} {}/{} visited {} times",
            sample.state, sample.action, sample.opponent_action, sample_visits
        );
        Ok(TrainingReport {
            agent: agent.name().to_string(),
            opponent: opponent.name().to_string(),
            deltas,
            sample_visits,
            final_alpha: alpha.value(),
            final_epsilon: epsilon.value(),
            win_rate: wins.rate(),
        })
    }

    /// Plays one greedy episode and returns A's final reward.
    ///
    /// With `render` set the board is printed at kickoff and after every
    /// step, preceded by both actions.
    pub fn play(&mut self, agent: &mut dyn Agent, opponent: &mut dyn Agent, render: bool) -> f64 {
        let mut state = self.env.reset();
        if render {
            self.env.render();
        }
        let mut step = 0;
        loop {
            let action = agent.act(state);
            let opponent_action = opponent.act(state);
            let result = self.env.step(action, opponent_action);
            if render {
                println!("\n{} {}", action, opponent_action);
                self.env.render();
            }
            if self.episode_over(result.done, step) {
                return result.reward;
            }
            state = result.state;
            step += 1;
        }
    }

    /// Plays `episodes` greedy episodes and tallies A's results.
    pub fn evaluate(&mut self, agent: &mut dyn Agent, opponent: &mut dyn Agent, episodes: usize) -> EvaluationMetrics {
        let mut metrics = EvaluationMetrics::default();
        for _ in 0..episodes {
            metrics.record(self.play(agent, opponent, false));
        }
        debug!(
            "{} vs {}: win rate {:.4} over {} episodes",
            agent.name(),
            opponent.name(),
            metrics.win_rate(),
            episodes
        );
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{CorrelatedQ, FoeQ, FriendQ, QLearner, RandomAgent};
    use crate::solver::SolverError;

    /// Always sticks and counts how often it was asked to act.
    struct Sticky {
        acts: usize,
    }

    impl Agent for Sticky {
        fn act(&mut self, _state: State) -> Action {
            self.acts += 1;
            Action::Stick
        }

        fn learn(&mut self, _alpha: f64, _transition: &Transition) -> Result<(), SolverError> {
            Ok(())
        }

        fn q_value(&self, _state: State, _action: Action, _opponent_action: Action) -> f64 {
            0.0
        }

        fn name(&self) -> &str {
            "sticky"
        }
    }

    /// Fails every learning update.
    struct Broken;

    impl Agent for Broken {
        fn act(&mut self, _state: State) -> Action {
            Action::North
        }

        fn learn(&mut self, _alpha: f64, _transition: &Transition) -> Result<(), SolverError> {
            Err(SolverError::Infeasible)
        }

        fn q_value(&self, _state: State, _action: Action, _opponent_action: Action) -> f64 {
            0.0
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            num_episodes: 50,
            max_steps: 100,
            log_interval: 10,
            seed: 17,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = TrainingConfig {
            log_interval: 0,
            ..TrainingConfig::default()
        };
        assert!(matches!(SoccerGame::new(cfg), Err(TrainingError::InvalidConfig(_))));
    }

    #[test]
    fn train_records_one_delta_per_episode() {
        let mut game = SoccerGame::new(small_config()).unwrap();
        let mut a = QLearner::new(0.9, 1);
        let mut b = QLearner::new(0.9, 2);
        let report = game.train(&mut a, &mut b).unwrap();
        assert_eq!(report.episodes(), 50);
        assert!(report.deltas.iter().all(|d| *d >= 0.0));
        assert_eq!(report.agent, "q-learning");
        assert!(report.final_alpha < 1.0);
        assert!(report.final_epsilon < 1.0);
    }

    #[test]
    fn step_cap_ends_stuck_episodes() {
        let cfg = TrainingConfig {
            max_steps: 10,
            ..small_config()
        };
        let mut game = SoccerGame::new(cfg).unwrap();
        let mut a = Sticky { acts: 0 };
        let mut b = Sticky { acts: 0 };
        assert_eq!(game.play(&mut a, &mut b, false), 0.0);
        // Steps 0 through max_steps + 1 are played.
        assert_eq!(a.acts, 12);
        assert_eq!(b.acts, 12);

        let metrics = game.evaluate(&mut a, &mut b, 5);
        assert_eq!(metrics.draws, 5);
        assert_eq!(metrics.win_rate(), 0.0);
    }

    #[test]
    fn stuck_training_reports_no_wins() {
        let cfg = TrainingConfig {
            num_episodes: 5,
            max_steps: 10,
            epsilon_start: 0.0,
            ..small_config()
        };
        let mut game = SoccerGame::new(cfg).unwrap();
        let report = game
            .train(&mut Sticky { acts: 0 }, &mut Sticky { acts: 0 })
            .unwrap();
        assert_eq!(report.win_rate, 0.0);
        assert!(report.deltas.iter().all(|d| *d == 0.0));
    }

    #[test]
    fn solver_failure_aborts_training() {
        let mut game = SoccerGame::new(small_config()).unwrap();
        let mut a = Broken;
        let mut b = RandomAgent::new(0);
        let err = game.train(&mut a, &mut b).unwrap_err();
        assert_eq!(err, TrainingError::Solver(SolverError::Infeasible));
    }

    #[test]
    fn random_players_split_outcomes() {
        let mut game = SoccerGame::new(small_config()).unwrap();
        let mut a = RandomAgent::new(3);
        let mut b = RandomAgent::new(4);
        let metrics = game.evaluate(&mut a, &mut b, 400);
        assert_eq!(metrics.episodes(), 400);
        assert!(metrics.wins > 100);
        assert!(metrics.losses > 100);
    }

    #[test]
    fn same_seed_same_run() {
        let run = || {
            let mut game = SoccerGame::new(small_config()).unwrap();
            let mut a = FriendQ::new(0.9, 5);
            let mut b = FriendQ::new(0.9, 6);
            game.train(&mut a, &mut b).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn friend_self_play_deltas_trend_down() {
        let cfg = TrainingConfig {
            num_episodes: 3000,
            alpha_decay: 0.998,
            gamma: 0.9,
            log_interval: 1000,
            seed: 2024,
            ..TrainingConfig::default()
        };
        let mut game = SoccerGame::new(cfg).unwrap();
        let mut a = FriendQ::new(0.9, 11);
        let mut b = FriendQ::new(0.9, 12);
        let report = game.train(&mut a, &mut b).unwrap();
        assert!(report.sample_visits > 0);

        // Moving averages whose window ends in the second half of the run.
        let window = 750;
        let trend: Vec<f64> = report
            .moving_average(window)
            .into_iter()
            .skip(1500 + 1 - window)
            .collect();
        assert_eq!(trend.len(), 1500);
        let chunk = trend.len() / 2;
        let means: Vec<f64> = trend
            .chunks(chunk)
            .map(|c| c.iter().sum::<f64>() / c.len() as f64)
            .collect();
        assert!(
            means.windows(2).all(|w| w[1] <= w[0]),
            "moving average rose: {:?}",
            means
        );
    }

    fn long_self_play(seed: u64) -> TrainingConfig {
        TrainingConfig {
            num_episodes: 3000,
            alpha_decay: 0.999,
            epsilon_decay: 0.999,
            log_interval: 1000,
            seed,
            ..TrainingConfig::default()
        }
    }

    fn assert_distribution(row: &[f64], state: State) {
        let total: f64 = row.iter().sum();
        assert!((total - 1.0).abs() < 1e-6, "policy at {} sums to {}", state, total);
        assert!(row.iter().all(|&p| p >= 0.0), "negative probability at {}", state);
    }

    #[test]
    fn correlated_self_play_runs_to_completion() {
        for seed in [0, 3] {
            let mut game = SoccerGame::new(long_self_play(seed)).unwrap();
            let mut a = CorrelatedQ::new(0.99, seed + 1);
            let mut b = CorrelatedQ::new(0.99, seed + 2);
            let report = game.train(&mut a, &mut b).unwrap();
            assert_eq!(report.episodes(), 3000);
            for agent in [&a, &b] {
                for state in State::all() {
                    assert_distribution(agent.joint_policy(state), state);
                }
            }
        }
    }

    #[test]
    fn foe_self_play_runs_to_completion() {
        let mut game = SoccerGame::new(long_self_play(5)).unwrap();
        let mut a = FoeQ::new(0.99, 6);
        let mut b = FoeQ::new(0.99, 7);
        let report = game.train(&mut a, &mut b).unwrap();
        assert_eq!(report.episodes(), 3000);
        for agent in [&a, &b] {
            for state in State::all() {
                assert_distribution(agent.policy(state), state);
            }
        }
    }
}
