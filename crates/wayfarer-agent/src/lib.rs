//! Search and decision-making agents for wayfarer
//!
//! This crate provides the algorithms that run against the core traits:
//! - Graph search (depth-first, breadth-first, uniform-cost, A*)
//! - Adversarial search (minimax, alpha-beta, expectimax)
//! - Value iteration over a known MDP
//! - Tabular and approximate Q-learning

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adversarial;
pub mod policy;
pub mod qlearning;
pub mod search;
pub mod utils;
pub mod value_iteration;

// Re-export agents
pub use adversarial::{AdversarialSearch, AlphaBeta, Decision, Expectimax, Minimax};
pub use qlearning::{ApproximateQAgent, LegalActions, QLearningAgent};
pub use value_iteration::ValueIterationAgent;

// Re-export search entry points
pub use search::{
    a_star_search, breadth_first_search, depth_first_search, null_heuristic, search,
    uniform_cost_search, SearchResult, SearchStats, SearchStrategy,
};

// Re-export exploration
pub use policy::EpsilonGreedy;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        a_star_search, breadth_first_search, depth_first_search, search, uniform_cost_search,
        AdversarialSearch, AlphaBeta, ApproximateQAgent, Expectimax, Minimax, QLearningAgent,
        SearchStrategy, ValueIterationAgent,
    };
    pub use wayfarer_core::prelude::*;
}
