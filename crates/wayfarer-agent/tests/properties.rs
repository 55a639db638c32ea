//! Property-based tests for the search cores.
//!
//! - Breadth-first search finds a fewest-actions path
//! - Uniform-cost search and A* with the null heuristic agree on cost, and
//!   both match an independent shortest-path computation
//! - Alpha-beta returns the minimax value while visiting no more nodes

use std::collections::VecDeque;

use proptest::prelude::*;
use wayfarer_agent::{
    a_star_search, breadth_first_search, null_heuristic, uniform_cost_search, AdversarialSearch,
    AlphaBeta, Minimax,
};
use wayfarer_core::{replay, GameState, SearchProblem, Successor, TreeSearchConfig};

// =============================================================================
// Random weighted digraphs
// =============================================================================

#[derive(Debug, Clone)]
struct Digraph {
    nodes: usize,
    edges: Vec<(usize, usize, u32)>,
}

impl SearchProblem for Digraph {
    type State = usize;
    type Action = usize;

    fn starting_state(&self) -> Option<usize> {
        Some(0)
    }

    fn is_goal(&self, state: &usize) -> bool {
        *state == self.nodes - 1
    }

    fn successor_states(&self, state: &usize) -> Vec<Successor<usize, usize>> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, (from, ..))| from == state)
            .map(|(index, &(_, to, cost))| Successor::new(to, index, f64::from(cost)))
            .collect()
    }
}

fn arb_digraph() -> impl Strategy<Value = Digraph> {
    (2usize..9).prop_flat_map(|nodes| {
        prop::collection::vec((0..nodes, 0..nodes, 1u32..10), 0..24)
            .prop_map(move |edges| Digraph { nodes, edges })
    })
}

/// Fewest edges from 0 to the last node
fn hop_distance(graph: &Digraph) -> Option<usize> {
    let mut distance = vec![None; graph.nodes];
    distance[0] = Some(0);
    let mut queue = VecDeque::from([0]);
    while let Some(node) = queue.pop_front() {
        let here = distance[node].unwrap_or(0);
        for &(from, to, _) in &graph.edges {
            if from == node && distance[to].is_none() {
                distance[to] = Some(here + 1);
                queue.push_back(to);
            }
        }
    }
    distance[graph.nodes - 1]
}

/// Cheapest cost from 0 to the last node (Bellman-Ford)
fn cheapest_cost(graph: &Digraph) -> Option<f64> {
    let mut cost: Vec<Option<u32>> = vec![None; graph.nodes];
    cost[0] = Some(0);
    for _ in 0..graph.nodes {
        for &(from, to, weight) in &graph.edges {
            if let Some(base) = cost[from] {
                if cost[to].map_or(true, |known| base + weight < known) {
                    cost[to] = Some(base + weight);
                }
            }
        }
    }
    cost[graph.nodes - 1].map(f64::from)
}

proptest! {
    #[test]
    fn prop_bfs_finds_fewest_actions(graph in arb_digraph()) {
        let result = breadth_first_search(&graph).unwrap();
        prop_assert_eq!(result.path.as_ref().map(|path| path.actions.len()), hop_distance(&graph));
        if result.is_found() {
            let end = replay(&graph, result.actions());
            prop_assert_eq!(end, Some(graph.nodes - 1));
        }
    }

    #[test]
    fn prop_ucs_matches_null_astar_and_shortest_path(graph in arb_digraph()) {
        let ucs = uniform_cost_search(&graph).unwrap();
        let astar = a_star_search(&graph, null_heuristic).unwrap();
        prop_assert_eq!(ucs.cost(), astar.cost());
        prop_assert_eq!(ucs.cost(), cheapest_cost(&graph));
        if let Some(cost) = ucs.cost() {
            prop_assert_eq!(graph.actions_cost(ucs.actions()), cost);
        }
    }
}

// =============================================================================
// Random game trees
// =============================================================================

#[derive(Debug, Clone)]
enum Tree {
    Leaf(i32),
    Branch(Vec<Tree>),
}

#[derive(Debug, Clone)]
struct Game {
    node: Tree,
    agents: usize,
}

impl GameState for Game {
    type Action = usize;

    fn legal_actions(&self, _agent: usize) -> Vec<usize> {
        match &self.node {
            Tree::Leaf(_) => vec![],
            Tree::Branch(children) => (0..children.len()).collect(),
        }
    }

    fn generate_successor(&self, _agent: usize, action: &usize) -> Self {
        let node = match &self.node {
            Tree::Branch(children) => children[*action].clone(),
            Tree::Leaf(value) => Tree::Leaf(*value),
        };
        Self {
            node,
            agents: self.agents,
        }
    }

    fn is_win(&self) -> bool {
        false
    }

    fn is_lose(&self) -> bool {
        false
    }

    fn num_agents(&self) -> usize {
        self.agents
    }
}

fn score(game: &Game) -> f64 {
    match game.node {
        Tree::Leaf(value) => f64::from(value),
        Tree::Branch(_) => 0.0,
    }
}

fn arb_tree() -> impl Strategy<Value = Tree> {
    let leaf = (-50i32..50).prop_map(Tree::Leaf);
    let tree = leaf.prop_recursive(5, 96, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(Tree::Branch)
    });
    prop::collection::vec(tree, 1..4).prop_map(Tree::Branch)
}

proptest! {
    #[test]
    fn prop_alpha_beta_matches_minimax(
        node in arb_tree(),
        agents in 1usize..4,
        depth in 1usize..4,
    ) {
        let game = Game { node, agents };
        let config = TreeSearchConfig { depth };
        let plain = Minimax::new(&config, score).decide(&game).unwrap();
        let pruned = AlphaBeta::new(&config, score).decide(&game).unwrap();

        prop_assert_eq!(pruned.value, plain.value);
        prop_assert!(pruned.nodes <= plain.nodes);
    }
}
