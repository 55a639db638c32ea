//! Depth-limited adversarial search: minimax, alpha-beta and expectimax
//!
//! Agent 0 maximizes. The other agents either minimize (minimax,
//! alpha-beta) or pick uniformly at random among their moves (expectimax).
//! Depth counts full rounds: it drops by one after the last agent moves.

use tracing::{debug, warn};
use wayfarer_core::{Action, GameState, Result, TreeSearchConfig, WayfarerError};

/// Value of a searched position together with the move that attains it.
///
/// `action` is `None` at leaves and chance nodes, and when the search depth
/// is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<A> {
    /// Backed-up value for agent 0
    pub value: f64,
    /// Chosen action for the agent to move
    pub action: Option<A>,
    /// Nodes visited to reach the decision
    pub nodes: usize,
    /// Positions below the root whose mover had no non-stop move before the
    /// depth ran out; they were scored as leaves
    pub stuck: usize,
}

/// A search choosing agent 0's move
pub trait AdversarialSearch<G: GameState> {
    /// Search from `state` with agent 0 to move
    ///
    /// # Errors
    ///
    /// Fails when agent 0 has no non-stop move in a state that is not over
    /// while depth remains, or when the game reports zero agents.
    fn decide(&self, state: &G) -> Result<Decision<G::Action>>;

    /// The chosen move alone; `None` if the game is already over
    ///
    /// # Errors
    ///
    /// See [`AdversarialSearch::decide`].
    fn get_action(&self, state: &G) -> Result<Option<G::Action>> {
        Ok(self.decide(state)?.action)
    }
}

/// Non-stop moves of `agent`
fn moves<G: GameState>(state: &G, agent: usize) -> Vec<G::Action> {
    state
        .legal_actions(agent)
        .into_iter()
        .filter(|action| !action.is_stop())
        .collect()
}

/// Who moves next and the depth they search at
fn next_turn(agent: usize, num_agents: usize, depth: usize) -> (usize, usize) {
    if agent + 1 == num_agents {
        (0, depth - 1)
    } else {
        (agent + 1, depth)
    }
}

fn check_root<G: GameState>(state: &G, depth: usize) -> Result<()> {
    if state.num_agents() == 0 {
        return Err(WayfarerError::InvalidParameter(
            "game reports zero agents".to_string(),
        ));
    }
    if depth > 0 && !state.is_over() && moves(state, 0).is_empty() {
        return Err(WayfarerError::NoLegalActions { agent: 0 });
    }
    Ok(())
}

/// Counters kept while one search recurses
#[derive(Debug, Default)]
struct Tally {
    nodes: usize,
    stuck: usize,
}

fn conclude<A>(
    search: &str,
    depth: usize,
    (value, action): (f64, Option<A>),
    tally: &Tally,
) -> Decision<A> {
    if tally.stuck > 0 {
        warn!(
            search,
            stuck = tally.stuck,
            "positions without a legal move were scored as leaves"
        );
    }
    debug!(search, value, nodes = tally.nodes, depth, "adversarial decision");
    Decision {
        value,
        action,
        nodes: tally.nodes,
        stuck: tally.stuck,
    }
}

/// Whether `candidate` beats the running best for the agent to move
fn improves(maximizing: bool, candidate: f64, best: Option<f64>) -> bool {
    match best {
        None => true,
        Some(best) if maximizing => candidate > best,
        Some(best) => candidate < best,
    }
}

/// Plain minimax
pub struct Minimax<E> {
    depth: usize,
    evaluate: E,
}

impl<E> Minimax<E> {
    /// Create a minimax searcher
    ///
    /// Depth zero scores the root as it stands.
    #[must_use]
    pub fn new(config: &TreeSearchConfig, evaluate: E) -> Self {
        Self {
            depth: config.depth,
            evaluate,
        }
    }

    /// Search depth in rounds
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn minimax<G>(
        &self,
        state: &G,
        agent: usize,
        depth: usize,
        tally: &mut Tally,
    ) -> (f64, Option<G::Action>)
    where
        G: GameState,
        E: Fn(&G) -> f64,
    {
        tally.nodes += 1;
        if depth == 0 || state.is_over() {
            return ((self.evaluate)(state), None);
        }
        let actions = moves(state, agent);
        if actions.is_empty() {
            tally.stuck += 1;
            return ((self.evaluate)(state), None);
        }

        let (next_agent, next_depth) = next_turn(agent, state.num_agents(), depth);
        let maximizing = agent == 0;
        let mut best: Option<(f64, G::Action)> = None;
        for action in actions {
            let successor = state.generate_successor(agent, &action);
            let (score, _) = self.minimax(&successor, next_agent, next_depth, tally);
            if improves(maximizing, score, best.as_ref().map(|(value, _)| *value)) {
                best = Some((score, action));
            }
        }
        match best {
            Some((value, action)) => (value, Some(action)),
            None => ((self.evaluate)(state), None),
        }
    }
}

impl<G, E> AdversarialSearch<G> for Minimax<E>
where
    G: GameState,
    E: Fn(&G) -> f64,
{
    fn decide(&self, state: &G) -> Result<Decision<G::Action>> {
        check_root(state, self.depth)?;
        let mut tally = Tally::default();
        let outcome = self.minimax(state, 0, self.depth, &mut tally);
        Ok(conclude("minimax", self.depth, outcome, &tally))
    }
}

/// Minimax with alpha-beta pruning.
///
/// Pruning skips work but never changes the value minimax would return.
pub struct AlphaBeta<E> {
    depth: usize,
    evaluate: E,
}

impl<E> AlphaBeta<E> {
    /// Create an alpha-beta searcher
    ///
    /// Depth zero scores the root as it stands.
    #[must_use]
    pub fn new(config: &TreeSearchConfig, evaluate: E) -> Self {
        Self {
            depth: config.depth,
            evaluate,
        }
    }

    /// Search depth in rounds
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[allow(clippy::too_many_arguments)]
    fn alpha_beta<G>(
        &self,
        state: &G,
        agent: usize,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
        tally: &mut Tally,
    ) -> (f64, Option<G::Action>)
    where
        G: GameState,
        E: Fn(&G) -> f64,
    {
        tally.nodes += 1;
        if depth == 0 || state.is_over() {
            return ((self.evaluate)(state), None);
        }
        let actions = moves(state, agent);
        if actions.is_empty() {
            tally.stuck += 1;
            return ((self.evaluate)(state), None);
        }

        let (next_agent, next_depth) = next_turn(agent, state.num_agents(), depth);
        let maximizing = agent == 0;
        let mut best: Option<(f64, G::Action)> = None;
        for action in actions {
            let successor = state.generate_successor(agent, &action);
            let (score, _) =
                self.alpha_beta(&successor, next_agent, next_depth, alpha, beta, tally);
            if improves(maximizing, score, best.as_ref().map(|(value, _)| *value)) {
                best = Some((score, action));
            }

            let Some((value, _)) = &best else { continue };
            let value = *value;
            if maximizing {
                if value > beta {
                    break;
                }
                alpha = alpha.max(value);
            } else {
                if value < alpha {
                    break;
                }
                beta = beta.min(value);
            }
        }
        match best {
            Some((value, action)) => (value, Some(action)),
            None => ((self.evaluate)(state), None),
        }
    }
}

impl<G, E> AdversarialSearch<G> for AlphaBeta<E>
where
    G: GameState,
    E: Fn(&G) -> f64,
{
    fn decide(&self, state: &G) -> Result<Decision<G::Action>> {
        check_root(state, self.depth)?;
        let mut tally = Tally::default();
        let outcome = self.alpha_beta(
            state,
            0,
            self.depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            &mut tally,
        );
        Ok(conclude("alpha-beta", self.depth, outcome, &tally))
    }
}

/// Expectimax: adversaries move uniformly at random among their non-stop moves
pub struct Expectimax<E> {
    depth: usize,
    evaluate: E,
}

impl<E> Expectimax<E> {
    /// Create an expectimax searcher
    ///
    /// Depth zero scores the root as it stands.
    #[must_use]
    pub fn new(config: &TreeSearchConfig, evaluate: E) -> Self {
        Self {
            depth: config.depth,
            evaluate,
        }
    }

    /// Search depth in rounds
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn expectimax<G>(
        &self,
        state: &G,
        agent: usize,
        depth: usize,
        tally: &mut Tally,
    ) -> (f64, Option<G::Action>)
    where
        G: GameState,
        E: Fn(&G) -> f64,
    {
        tally.nodes += 1;
        if depth == 0 || state.is_over() {
            return ((self.evaluate)(state), None);
        }
        let actions = moves(state, agent);
        if actions.is_empty() {
            tally.stuck += 1;
            return ((self.evaluate)(state), None);
        }

        let (next_agent, next_depth) = next_turn(agent, state.num_agents(), depth);
        if agent == 0 {
            let mut best: Option<(f64, G::Action)> = None;
            for action in actions {
                let successor = state.generate_successor(agent, &action);
                let (score, _) = self.expectimax(&successor, next_agent, next_depth, tally);
                if improves(true, score, best.as_ref().map(|(value, _)| *value)) {
                    best = Some((score, action));
                }
            }
            return match best {
                Some((value, action)) => (value, Some(action)),
                None => ((self.evaluate)(state), None),
            };
        }

        #[allow(clippy::cast_precision_loss)]
        let probability = 1.0 / actions.len() as f64;
        let expected: f64 = actions
            .iter()
            .map(|action| {
                let successor = state.generate_successor(agent, action);
                probability * self.expectimax(&successor, next_agent, next_depth, tally).0
            })
            .sum();
        (expected, None)
    }
}

impl<G, E> AdversarialSearch<G> for Expectimax<E>
where
    G: GameState,
    E: Fn(&G) -> f64,
{
    fn decide(&self, state: &G) -> Result<Decision<G::Action>> {
        check_root(state, self.depth)?;
        let mut tally = Tally::default();
        let outcome = self.expectimax(state, 0, self.depth, &mut tally);
        Ok(conclude("expectimax", self.depth, outcome, &tally))
    }
}
