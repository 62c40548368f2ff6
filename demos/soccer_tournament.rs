//! Trains every requested learner in self-play and prints the cross
//! evaluation table.
//!
//! ```text
//! RUST_LOG=info cargo run --release --example soccer_tournament -- --episodes 20000
//! ```

use clap::Parser;
use markov_soccer::{AgentKind, Experiment, SoccerGame, TrainingConfig, TrainingError};

#[derive(Parser, Debug)]
#[command(about = "Grid soccer self-play tournament")]
struct Args {
    /// Learners to train, comma separated.
    #[arg(long, value_delimiter = ',', default_value = "q-learning,friend-q,foe-q,ce-q")]
    agents: Vec<AgentKind>,
    /// Training episodes per learner.
    #[arg(long, default_value_t = 100_000)]
    episodes: usize,
    /// Greedy episodes per evaluated pairing.
    #[arg(long, default_value_t = 10_000)]
    eval_episodes: usize,
    /// Step cap per episode.
    #[arg(long, default_value_t = 500)]
    max_steps: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Render one greedy game of the first learner against itself.
    #[arg(long)]
    watch: bool,
}

fn main() -> Result<(), TrainingError> {
    env_logger::init();
    let args = Args::parse();

    let config = TrainingConfig {
        num_episodes: args.episodes,
        eval_episodes: args.eval_episodes,
        max_steps: args.max_steps,
        seed: args.seed,
        ..TrainingConfig::default()
    };
    let experiment = Experiment::new(config.clone(), args.agents)?;

    let mut runs = experiment.train_all()?;
    for run in &runs {
        println!("{}", run.report);
    }
    let matches = experiment.cross_evaluate(&mut runs)?;
    println!("=== Cross evaluation ===");
    for m in &matches {
        println!("{:<12} vs {:<12} {:.4}", m.agent, m.opponent, m.metrics.win_rate());
    }

    if args.watch {
        if let Some(run) = runs.first_mut() {
            let mut game = SoccerGame::new(config)?;
            let reward = game.play(run.agent.as_mut(), run.opponent.as_mut(), true);
            println!("\nfinal reward for A: {}", reward);
        }
    }
    Ok(())
}
