//! Explicit game trees for exercising adversarial search

use std::sync::Arc;

use wayfarer_core::{GameState, Result, WayfarerError};

/// Index of a node inside a [`TreeBuilder`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum Node {
    Internal(Vec<(String, usize)>),
    Leaf { score: f64, win: bool, lose: bool },
}

/// Bottom-up builder: children are added before their parents
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Empty arena
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain leaf
    pub fn leaf(&mut self, score: f64) -> NodeId {
        self.push(Node::Leaf {
            score,
            win: false,
            lose: false,
        })
    }

    /// Leaf that ends the game in a win
    pub fn win(&mut self, score: f64) -> NodeId {
        self.push(Node::Leaf {
            score,
            win: true,
            lose: false,
        })
    }

    /// Leaf that ends the game in a loss
    pub fn lose(&mut self, score: f64) -> NodeId {
        self.push(Node::Leaf {
            score,
            win: false,
            lose: true,
        })
    }

    /// Internal node; `children` pairs each action label with its subtree
    pub fn node<S: Into<String>>(&mut self, children: Vec<(S, NodeId)>) -> NodeId {
        let children = children
            .into_iter()
            .map(|(action, NodeId(index))| (action.into(), index))
            .collect();
        self.push(Node::Internal(children))
    }

    /// Finish the tree rooted at `root`
    ///
    /// # Errors
    ///
    /// Fails for zero agents or a node id from another arena.
    pub fn build(self, root: NodeId, num_agents: usize) -> Result<TreeGame> {
        if num_agents == 0 {
            return Err(WayfarerError::InvalidParameter(
                "a game needs at least one agent".to_string(),
            ));
        }
        let in_arena = |index: usize| index < self.nodes.len();
        let dangling = !in_arena(root.0)
            || self.nodes.iter().any(|node| match node {
                Node::Internal(children) => children.iter().any(|&(_, child)| !in_arena(child)),
                Node::Leaf { .. } => false,
            });
        if dangling {
            return Err(WayfarerError::InvalidState(
                "game tree refers to a node outside its arena".to_string(),
            ));
        }
        Ok(TreeGame {
            nodes: Arc::new(self.nodes),
            current: root.0,
            num_agents,
        })
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

/// A position in an explicit game tree.
///
/// Agents take turns depth-first: whichever agent the search asks about
/// moves at the current node. Leaves have no moves.
#[derive(Debug, Clone)]
pub struct TreeGame {
    nodes: Arc<Vec<Node>>,
    current: usize,
    num_agents: usize,
}

impl TreeGame {
    /// Complete tree with `branching` children per node and the given leaf
    /// scores left to right. Actions are labelled `a`, `b`, `c`, ...
    ///
    /// # Errors
    ///
    /// Fails when `leaves.len()` is not a power of `branching`, or for
    /// zero agents.
    pub fn uniform(num_agents: usize, branching: usize, leaves: &[f64]) -> Result<Self> {
        if !(2..=26).contains(&branching) {
            return Err(WayfarerError::InvalidParameter(format!(
                "branching must be between 2 and 26, got {branching}"
            )));
        }
        let mut builder = TreeBuilder::new();
        let mut level: Vec<NodeId> = leaves.iter().map(|&score| builder.leaf(score)).collect();
        while level.len() > 1 {
            if level.len() % branching != 0 {
                return Err(WayfarerError::InvalidParameter(format!(
                    "{} leaves do not form a complete {branching}-ary tree",
                    leaves.len()
                )));
            }
            level = level
                .chunks(branching)
                .map(|chunk| builder.node(labelled(chunk)))
                .collect();
        }
        let root = level.first().copied().ok_or_else(|| {
            WayfarerError::InvalidParameter("a game tree needs at least one leaf".to_string())
        })?;
        builder.build(root, num_agents)
    }

    /// Whether the current node is a leaf
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.node(), Node::Leaf { .. })
    }

    fn node(&self) -> &Node {
        &self.nodes[self.current]
    }
}

fn labelled(children: &[NodeId]) -> Vec<(String, NodeId)> {
    ('a'..='z')
        .zip(children)
        .map(|(label, &child)| (label.to_string(), child))
        .collect()
}

/// Score of a leaf; internal nodes score 0
#[must_use]
pub fn evaluate(game: &TreeGame) -> f64 {
    match game.node() {
        Node::Leaf { score, .. } => *score,
        Node::Internal(_) => 0.0,
    }
}

impl GameState for TreeGame {
    type Action = String;

    fn legal_actions(&self, _agent: usize) -> Vec<String> {
        match self.node() {
            Node::Internal(children) => children.iter().map(|(action, _)| action.clone()).collect(),
            Node::Leaf { .. } => Vec::new(),
        }
    }

    /// Follows the child labelled `action`; an unknown label stays put
    fn generate_successor(&self, _agent: usize, action: &String) -> Self {
        let next = match self.node() {
            Node::Internal(children) => children
                .iter()
                .find(|(label, _)| label == action)
                .map_or(self.current, |&(_, child)| child),
            Node::Leaf { .. } => self.current,
        };
        Self {
            nodes: Arc::clone(&self.nodes),
            current: next,
            num_agents: self.num_agents,
        }
    }

    fn is_win(&self) -> bool {
        matches!(self.node(), Node::Leaf { win: true, .. })
    }

    fn is_lose(&self) -> bool {
        matches!(self.node(), Node::Leaf { lose: true, .. })
    }

    fn num_agents(&self) -> usize {
        self.num_agents
    }
}
