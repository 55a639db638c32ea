//! Generic graph search: depth-first, breadth-first, uniform-cost and A*
//!
//! All four variants run the same traversal ([`graph::graph_search`]) and
//! differ only in the frontier they plug in and, for A*, the priority
//! function.

pub mod frontier;
pub mod graph;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wayfarer_core::{Result, SearchProblem, WayfarerError};

pub use frontier::{Frontier, PriorityQueue, Queue, Stack};
pub use graph::{graph_search, Path, ReachPolicy, SearchResult, SearchStats};

/// Traversal discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Stack frontier
    DepthFirst,
    /// Queue frontier
    BreadthFirst,
    /// Priority queue keyed by path cost
    UniformCost,
    /// Priority queue keyed by path cost plus heuristic
    AStar,
}

impl FromStr for SearchStrategy {
    type Err = WayfarerError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dfs" | "depth_first" | "depthfirstsearch" => Ok(Self::DepthFirst),
            "bfs" | "breadth_first" | "breadthfirstsearch" => Ok(Self::BreadthFirst),
            "ucs" | "uniform_cost" | "uniformcostsearch" => Ok(Self::UniformCost),
            "astar" | "a_star" | "astarsearch" => Ok(Self::AStar),
            _ => Err(WayfarerError::UnknownStrategy(name.to_string())),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DepthFirst => "dfs",
            Self::BreadthFirst => "bfs",
            Self::UniformCost => "ucs",
            Self::AStar => "astar",
        };
        f.write_str(name)
    }
}

/// Heuristic that knows nothing; turns A* into uniform-cost search
pub fn null_heuristic<S, P: ?Sized>(_state: &S, _problem: &P) -> f64 {
    0.0
}

/// Search the deepest nodes first.
///
/// Completeness holds only for finite spaces; the path is not necessarily
/// the shortest.
///
/// # Errors
///
/// Fails only if the problem has no start state.
pub fn depth_first_search<P: SearchProblem>(problem: &P) -> Result<SearchResult<P::Action>> {
    graph_search(problem, Stack::new(), ReachPolicy::FirstVisit, |_, _| 0.0)
}

/// Search the shallowest nodes first; finds a fewest-actions path.
///
/// # Errors
///
/// Fails only if the problem has no start state.
pub fn breadth_first_search<P: SearchProblem>(problem: &P) -> Result<SearchResult<P::Action>> {
    graph_search(problem, Queue::new(), ReachPolicy::FirstVisit, |_, _| 0.0)
}

/// Search the node of least total cost first.
///
/// # Errors
///
/// Fails only if the problem has no start state.
pub fn uniform_cost_search<P: SearchProblem>(problem: &P) -> Result<SearchResult<P::Action>> {
    graph_search(
        problem,
        PriorityQueue::new(),
        ReachPolicy::CheaperPath,
        |_, cost| cost,
    )
}

/// Search the node of lowest cost plus heuristic first.
///
/// The path is optimal when `heuristic` is admissible.
///
/// # Errors
///
/// Fails only if the problem has no start state.
pub fn a_star_search<P, H>(problem: &P, heuristic: H) -> Result<SearchResult<P::Action>>
where
    P: SearchProblem,
    H: Fn(&P::State, &P) -> f64,
{
    graph_search(
        problem,
        PriorityQueue::new(),
        ReachPolicy::CheaperPath,
        |state, cost| cost + heuristic(state, problem),
    )
}

/// Dispatch on `strategy`; `heuristic` is consulted by A* only
///
/// # Errors
///
/// Fails only if the problem has no start state.
pub fn search<P, H>(
    problem: &P,
    strategy: SearchStrategy,
    heuristic: H,
) -> Result<SearchResult<P::Action>>
where
    P: SearchProblem,
    H: Fn(&P::State, &P) -> f64,
{
    match strategy {
        SearchStrategy::DepthFirst => depth_first_search(problem),
        SearchStrategy::BreadthFirst => breadth_first_search(problem),
        SearchStrategy::UniformCost => uniform_cost_search(problem),
        SearchStrategy::AStar => a_star_search(problem, heuristic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_core::{replay, Successor};

    type Edge = (char, &'static str, char, f64);

    struct Graph {
        start: Option<char>,
        goals: Vec<char>,
        edges: Vec<Edge>,
    }

    impl SearchProblem for Graph {
        type State = char;
        type Action = &'static str;

        fn starting_state(&self) -> Option<char> {
            self.start
        }

        fn is_goal(&self, state: &char) -> bool {
            self.goals.contains(state)
        }

        fn successor_states(&self, state: &char) -> Vec<Successor<char, &'static str>> {
            self.edges
                .iter()
                .filter(|(from, ..)| from == state)
                .map(|&(_, action, to, cost)| Successor::new(to, action, cost))
                .collect()
        }
    }

    /// Cheapest route S-a-A-c-B-e-G costs 4 over three hops; the two-hop
    /// routes cost 11 (via d) and 6 (via b).
    fn diamond() -> Graph {
        Graph {
            start: Some('S'),
            goals: vec!['G'],
            edges: vec![
                ('S', "a", 'A', 1.0),
                ('S', "b", 'B', 4.0),
                ('A', "c", 'B', 1.0),
                ('A', "d", 'G', 10.0),
                ('B', "e", 'G', 2.0),
            ],
        }
    }

    fn diamond_heuristic(state: &char, _problem: &Graph) -> f64 {
        match state {
            'S' | 'A' => 3.0,
            'B' => 2.0,
            _ => 0.0,
        }
    }

    #[test]
    fn test_dfs_follows_latest_branch() {
        let problem = diamond();
        let result = depth_first_search(&problem).unwrap();
        assert_eq!(result.actions(), ["b", "e"]);
        assert_eq!(result.cost(), Some(6.0));
    }

    #[test]
    fn test_bfs_finds_fewest_actions() {
        let problem = diamond();
        let result = breadth_first_search(&problem).unwrap();
        assert_eq!(result.actions(), ["a", "d"]);
        assert_eq!(result.cost(), Some(11.0));
    }

    #[test]
    fn test_ucs_requeues_cheaper_paths() {
        let problem = diamond();
        let result = uniform_cost_search(&problem).unwrap();
        assert_eq!(result.actions(), ["a", "c", "e"]);
        assert_eq!(result.cost(), Some(4.0));
        assert_eq!(problem.actions_cost(result.actions()), 4.0);
    }

    #[test]
    fn test_astar_matches_ucs_cost() {
        let problem = diamond();
        let informed = a_star_search(&problem, diamond_heuristic).unwrap();
        let blind = a_star_search(&problem, null_heuristic).unwrap();
        let ucs = uniform_cost_search(&problem).unwrap();

        assert_eq!(informed.cost(), ucs.cost());
        assert_eq!(blind.cost(), ucs.cost());
        assert!(informed.stats.expanded <= ucs.stats.expanded);
    }

    #[test]
    fn test_every_strategy_replays_onto_goal() {
        let problem = diamond();
        for strategy in [
            SearchStrategy::DepthFirst,
            SearchStrategy::BreadthFirst,
            SearchStrategy::UniformCost,
            SearchStrategy::AStar,
        ] {
            let result = search(&problem, strategy, diamond_heuristic).unwrap();
            let end = replay(&problem, result.actions()).unwrap();
            assert!(problem.is_goal(&end), "{strategy} ended on {end}");
        }
    }

    #[test]
    fn test_unreachable_goal_is_not_an_error() {
        let mut problem = diamond();
        problem.goals = vec!['Z'];
        for strategy in ["dfs", "bfs", "ucs", "astar"] {
            let strategy: SearchStrategy = strategy.parse().unwrap();
            let result = search(&problem, strategy, null_heuristic).unwrap();
            assert!(!result.is_found());
            assert!(result.actions().is_empty());
            assert_eq!(result.stats.expanded, 4);
        }
    }

    #[test]
    fn test_start_goal_yields_empty_path() {
        let mut problem = diamond();
        problem.goals = vec!['S'];
        let result = uniform_cost_search(&problem).unwrap();
        assert!(result.is_found());
        assert!(result.actions().is_empty());
        assert_eq!(result.stats.expanded, 0);
    }

    #[test]
    fn test_missing_start_fails() {
        let mut problem = diamond();
        problem.start = None;
        assert!(matches!(
            breadth_first_search(&problem),
            Err(WayfarerError::MissingStartState)
        ));
    }

    #[test]
    fn test_stop_is_never_expanded() {
        let problem = Graph {
            start: Some('S'),
            goals: vec!['G'],
            edges: vec![
                ('S', "Stop", 'G', 0.0),
                ('S', "x", 'A', 1.0),
                ('A', "y", 'G', 1.0),
            ],
        };
        for strategy in ["dfs", "bfs", "ucs", "astar"] {
            let result = search(&problem, strategy.parse().unwrap(), null_heuristic).unwrap();
            assert_eq!(result.actions(), ["x", "y"], "{strategy}");
        }
    }

    #[test]
    fn test_equal_cost_keeps_first_path() {
        let problem = Graph {
            start: Some('S'),
            goals: vec!['G'],
            edges: vec![
                ('S', "p", 'A', 1.0),
                ('S', "q", 'B', 1.0),
                ('A', "r", 'G', 1.0),
                ('B', "s", 'G', 1.0),
            ],
        };
        let result = uniform_cost_search(&problem).unwrap();
        assert_eq!(result.actions(), ["p", "r"]);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!("BFS".parse::<SearchStrategy>().unwrap(), SearchStrategy::BreadthFirst);
        assert_eq!(
            "aStarSearch".parse::<SearchStrategy>().unwrap(),
            SearchStrategy::AStar
        );
        assert_eq!(SearchStrategy::UniformCost.to_string(), "ucs");
        assert!(matches!(
            "greedy".parse::<SearchStrategy>(),
            Err(WayfarerError::UnknownStrategy(name)) if name == "greedy"
        ));
    }
}
