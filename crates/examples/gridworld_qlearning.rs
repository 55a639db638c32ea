//! Example: Tabular and approximate Q-learning on a gridworld
//!
//! Trains both learners on the book grid by sampling episodes, then saves
//! the tabular agent's Q-table as JSON.

use tracing_subscriber::EnvFilter;
use wayfarer_agent::{ApproximateQAgent, QLearningAgent};
use wayfarer_core::{LearningConfig, MarkovDecisionProcess, Persist, ValueEstimator};
use wayfarer_env::{
    CoordinateExtractor, EpisodeRunner, GridState, GridWorld, MdpEnvironment, RunnerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let grid = GridWorld::book()?;
    let config = LearningConfig {
        alpha: 0.5,
        epsilon: 0.3,
        discount: 0.9,
        num_training: 200,
    };
    let runner_config = RunnerConfig {
        num_episodes: 250,
        max_steps: 200,
    };

    // Tabular learner
    let legal = grid.clone();
    let learner = QLearningAgent::new(config.clone(), move |state: &GridState| {
        legal.possible_actions(state)
    })?
    .with_seed(42);
    let env = MdpEnvironment::new(grid.clone()).with_seed(42);
    let mut runner = EpisodeRunner::new(env, learner, runner_config.clone())?;
    let mean = runner.run()?;
    println!("Tabular Q-learning: mean reward {mean:.3} over {} episodes", runner.history().len());

    let start = grid.start_state();
    let learner = runner.into_learner();
    println!(
        "Start value {:.3}, greedy action {:?}",
        learner.get_value(&start),
        learner.get_policy(&start)
    );

    let path = std::env::temp_dir().join("wayfarer-book-qtable.json");
    learner.save(&path).await?;
    println!("Saved Q-table to {}", path.display());

    // Approximate learner over coordinate features
    let legal = grid.clone();
    let learner = ApproximateQAgent::new(config, CoordinateExtractor, move |state: &GridState| {
        legal.possible_actions(state)
    })?
    .with_seed(7);
    let env = MdpEnvironment::new(grid).with_seed(7);
    let mut runner = EpisodeRunner::new(env, learner, runner_config)?;
    let mean = runner.run()?;
    println!("\nApproximate Q-learning: mean reward {mean:.3}");

    let mut weights: Vec<(String, f64)> = runner
        .learner()
        .weights()
        .iter()
        .filter(|(name, _)| !name.starts_with('('))
        .map(|(name, weight)| (name.clone(), weight))
        .collect();
    weights.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, weight) in weights {
        println!("  {name:<14} {weight:>8.3}");
    }

    Ok(())
}
