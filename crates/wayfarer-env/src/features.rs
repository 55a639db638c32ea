//! Feature extractors for approximate Q-learning

use std::fmt::Debug;

use wayfarer_core::{FeatureExtractor, FeatureVector};

use crate::gridworld::{GridAction, GridState};

fn identity_key<S: Debug, A: Debug>(state: &S, action: &A) -> String {
    format!("({state:?}, {action:?})")
}

/// One indicator feature per `(state, action)` pair.
///
/// With this extractor approximate Q-learning reduces to the tabular kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityExtractor;

impl<S: Debug, A: Debug> FeatureExtractor<S, A> for IdentityExtractor {
    fn features(&self, state: &S, action: &A) -> FeatureVector {
        let mut features = FeatureVector::new();
        features.set(identity_key(state, action), 1.0);
        features
    }
}

/// Gridworld indicators for the column, the row and the action taken, on
/// top of the identity feature
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateExtractor;

impl FeatureExtractor<GridState, GridAction> for CoordinateExtractor {
    fn features(&self, state: &GridState, action: &GridAction) -> FeatureVector {
        let mut features = FeatureVector::new();
        features.set(identity_key(state, action), 1.0);
        if let Some((x, y)) = state.position() {
            features.set(format!("x={x}"), 1.0);
            features.set(format!("y={y}"), 1.0);
        }
        features.set(format!("action={action}"), 1.0);
        features
    }
}
