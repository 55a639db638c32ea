//! Problems and worlds for the wayfarer agents
//!
//! This crate provides concrete instances of the core traits:
//! - Maze search problems (single goal, any food, all corners, all food)
//! - Noisy gridworld MDPs with the stock layouts and parameter presets
//! - Explicit game trees for adversarial search
//! - Feature extractors and an episode runner for Q-learning

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod corners;
pub mod features;
pub mod food;
pub mod grid;
pub mod gridworld;
pub mod position;
pub mod runner;
pub mod tree_game;

// Re-export maze problems
pub use corners::{corners_heuristic, CornersProblem, CornersState};
pub use food::{food_heuristic, FoodSearchProblem, FoodState};
pub use grid::{manhattan, step, Layout, Maze, Position};
pub use position::{
    closest_dot_plan, euclidean_heuristic, manhattan_heuristic, maze_distance,
    AnyFoodSearchProblem, PositionSearchProblem,
};

// Re-export decision processes and games
pub use analysis::AnalysisAnswer;
pub use gridworld::{Cell, GridAction, GridState, GridWorld, LAYOUT_NAMES};
pub use tree_game::{evaluate, NodeId, TreeBuilder, TreeGame};

// Re-export learning support
pub use features::{CoordinateExtractor, IdentityExtractor};
pub use runner::{run_episode, EpisodeRunner, MdpEnvironment, RunnerConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CornersProblem, EpisodeRunner, FoodSearchProblem, GridWorld, Layout, Maze,
        MdpEnvironment, PositionSearchProblem, TreeGame,
    };
    pub use wayfarer_agent::prelude::*;
}
