//! Core traits and types for wayfarer
//!
//! This crate provides the abstractions the search and decision-process
//! algorithms run against: search problems, multi-agent games, Markov
//! decision processes, feature extractors and sampled environments, plus the
//! default-valued tables every learner stores its estimates in.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod agent;
pub mod environment;
pub mod error;
pub mod features;
pub mod game;
pub mod mdp;
pub mod problem;
pub mod state;
pub mod value;

// Re-export core traits and types
pub use action::{Action, Direction};
pub use agent::{
    AgentMetrics, LearningConfig, Persist, ReinforcementLearner, TreeSearchConfig,
    ValueEstimator, ValueIterationConfig,
};
pub use environment::{Environment, Episode, Step, Transition};
pub use error::{Result, WayfarerError};
pub use features::{FeatureExtractor, FeatureVector};
pub use game::{GameState, Score};
pub use mdp::MarkovDecisionProcess;
pub use problem::{replay, SearchProblem, Successor, ILLEGAL_ACTION_COST};
pub use state::State;
pub use value::ValueTable;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, Direction, Environment, FeatureExtractor, GameState, MarkovDecisionProcess,
        ReinforcementLearner, Result, SearchProblem, Successor, Transition, ValueEstimator,
        ValueTable,
    };
}
