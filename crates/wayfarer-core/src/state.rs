//! State identity

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for positions in a search space or decision process.
///
/// Equality and hashing define node identity: two values that compare equal
/// share one entry in every visited set and value table.
pub trait State: Clone + Eq + Hash + Debug {}

impl<T> State for T where T: Clone + Eq + Hash + Debug {}
