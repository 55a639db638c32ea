//! Multi-agent game states for adversarial search

use crate::Action;

/// Score of a position for agent 0; higher is better.
///
/// `f64::INFINITY` and `f64::NEG_INFINITY` are reserved for a certain win
/// and a certain loss.
pub type Score = f64;

/// A turn-based game with `num_agents` players.
///
/// Agent 0 is the maximizing player; agents `1..num_agents` are its
/// adversaries (or chance agents, depending on the search).
pub trait GameState: Clone {
    /// Action type
    type Action: Action;

    /// Actions available to `agent` in this state, the stop action included
    fn legal_actions(&self, agent: usize) -> Vec<Self::Action>;

    /// The state after `agent` plays `action`
    fn generate_successor(&self, agent: usize, action: &Self::Action) -> Self;

    /// Agent 0 has won
    fn is_win(&self) -> bool;

    /// Agent 0 has lost
    fn is_lose(&self) -> bool;

    /// Number of agents taking turns
    fn num_agents(&self) -> usize;

    /// Whether the game is over
    fn is_over(&self) -> bool {
        self.is_win() || self.is_lose()
    }
}
