//! Feature extraction for linear value approximation

use crate::ValueTable;

/// Named feature values for one `(state, action)` pair
pub type FeatureVector = ValueTable<String>;

/// Turns a `(state, action)` pair into named numeric features.
///
/// Approximate Q-learning scores a pair as the dot product of these
/// features with its learned weights.
pub trait FeatureExtractor<S, A> {
    /// Features of taking `action` in `state`
    fn features(&self, state: &S, action: &A) -> FeatureVector;
}

impl<S, A, F> FeatureExtractor<S, A> for F
where
    F: Fn(&S, &A) -> FeatureVector,
{
    fn features(&self, state: &S, action: &A) -> FeatureVector {
        self(state, action)
    }
}
