//! Small helpers shared by the agents

use rand::Rng;

/// Return `true` with probability `p`.
///
/// `p` is clamped into `[0, 1]`.
pub fn flip_coin<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen_bool(p.clamp(0.0, 1.0))
}

/// Highest-scoring action and its score; the first maximiser wins ties
pub fn best_action<A, I, F>(actions: I, mut score: F) -> Option<(A, f64)>
where
    I: IntoIterator<Item = A>,
    F: FnMut(&A) -> f64,
{
    let mut best: Option<(A, f64)> = None;
    for action in actions {
        let value = score(&action);
        match &best {
            Some((_, best_value)) if value <= *best_value => {}
            _ => best = Some((action, value)),
        }
    }
    best
}

/// Largest score over `actions`, or `empty` when there are none
pub fn max_value<A, I, F>(actions: I, score: F, empty: f64) -> f64
where
    I: IntoIterator<Item = A>,
    F: FnMut(&A) -> f64,
{
    best_action(actions, score).map_or(empty, |(_, value)| value)
}
