//! The shared frontier-driven traversal behind every graph search

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use wayfarer_core::{Action, Result, SearchProblem, WayfarerError};

use super::frontier::Frontier;

/// How a search treats a state it has already reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachPolicy {
    /// Any re-visit is dominated; each state enters the frontier once
    FirstVisit,
    /// Re-enqueue when a strictly cheaper path is found; equal cost keeps
    /// the first path
    CheaperPath,
}

/// Counters collected during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// States whose successors were generated
    pub expanded: usize,
    /// Nodes pushed onto the frontier, the root included
    pub generated: usize,
    /// Largest frontier size observed
    pub max_frontier: usize,
}

/// Action sequence from the start to a goal
#[derive(Debug, Clone, PartialEq)]
pub struct Path<A> {
    /// Actions in execution order
    pub actions: Vec<A>,
    /// Sum of step costs along the path
    pub cost: f64,
}

/// Outcome of a graph search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<A> {
    /// The path found, or `None` when no goal is reachable
    pub path: Option<Path<A>>,
    /// Work done
    pub stats: SearchStats,
}

impl<A> SearchResult<A> {
    /// Whether a goal was reached
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }

    /// Actions of the path; empty when there is no path
    #[must_use]
    pub fn actions(&self) -> &[A] {
        self.path.as_ref().map_or(&[][..], |path| path.actions.as_slice())
    }

    /// Cost of the path, if any
    #[must_use]
    pub fn cost(&self) -> Option<f64> {
        self.path.as_ref().map(|path| path.cost)
    }

    /// Take the action list out of the result
    #[must_use]
    pub fn into_actions(self) -> Option<Vec<A>> {
        self.path.map(|path| path.actions)
    }
}

#[derive(Debug)]
struct Node<S, A> {
    state: S,
    action: Option<A>,
    parent: Option<usize>,
    cost: f64,
}

fn reconstruct<S, A: Clone>(nodes: &[Node<S, A>], mut index: usize) -> Vec<A> {
    let mut actions = Vec::new();
    while let Some(parent) = nodes[index].parent {
        if let Some(action) = &nodes[index].action {
            actions.push(action.clone());
        }
        index = parent;
    }
    actions.reverse();
    actions
}

/// Run a graph search over `problem`.
///
/// `frontier` fixes the traversal order and `priority` maps a state and
/// its cumulative cost to the key the frontier orders by. The goal test
/// runs when a node is popped, and stop actions are never expanded.
///
/// # Errors
///
/// Returns [`WayfarerError::MissingStartState`] if the problem has no start
/// state. An unreachable goal is not an error: the result has no path.
pub fn graph_search<P, F, K>(
    problem: &P,
    mut frontier: F,
    policy: ReachPolicy,
    priority: K,
) -> Result<SearchResult<P::Action>>
where
    P: SearchProblem,
    F: Frontier<usize>,
    K: Fn(&P::State, f64) -> f64,
{
    let start = problem
        .starting_state()
        .ok_or(WayfarerError::MissingStartState)?;

    let mut stats = SearchStats::default();
    let mut reached: HashMap<P::State, f64> = HashMap::new();
    let mut nodes: Vec<Node<P::State, P::Action>> = Vec::new();

    reached.insert(start.clone(), 0.0);
    frontier.push(0, priority(&start, 0.0));
    nodes.push(Node {
        state: start,
        action: None,
        parent: None,
        cost: 0.0,
    });
    stats.generated = 1;
    stats.max_frontier = 1;

    while let Some(index) = frontier.pop() {
        let state = nodes[index].state.clone();
        let cost = nodes[index].cost;

        if policy == ReachPolicy::CheaperPath {
            if let Some(&best) = reached.get(&state) {
                if cost > best {
                    trace!(?state, cost, best, "skipping superseded frontier entry");
                    continue;
                }
            }
        }

        if problem.is_goal(&state) {
            let actions = reconstruct(&nodes, index);
            debug!(
                expanded = stats.expanded,
                generated = stats.generated,
                length = actions.len(),
                cost,
                "search reached goal"
            );
            return Ok(SearchResult {
                path: Some(Path { actions, cost }),
                stats,
            });
        }

        stats.expanded += 1;
        for successor in problem.successor_states(&state) {
            if successor.action.is_stop() {
                continue;
            }

            let child_cost = cost + successor.cost;
            let improves = match reached.get(&successor.state) {
                None => true,
                Some(&previous) => policy == ReachPolicy::CheaperPath && child_cost < previous,
            };
            if !improves {
                continue;
            }

            reached.insert(successor.state.clone(), child_cost);
            let child_priority = priority(&successor.state, child_cost);
            nodes.push(Node {
                state: successor.state,
                action: Some(successor.action),
                parent: Some(index),
                cost: child_cost,
            });
            frontier.push(nodes.len() - 1, child_priority);
            stats.generated += 1;
            stats.max_frontier = stats.max_frontier.max(frontier.len());
        }
    }

    debug!(
        expanded = stats.expanded,
        generated = stats.generated,
        "frontier exhausted without reaching a goal"
    );
    Ok(SearchResult { path: None, stats })
}
