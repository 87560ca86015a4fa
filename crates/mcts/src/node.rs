//! MCTS node types for tree storage.
//!
//! Uses arena allocation with indices: the arena owns every node, children
//! are owned top-down, and the parent link is a plain index used only to
//! walk back up during backpropagation.

use spire_core::Action;

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Expansion state of a node, derived from its fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    /// Legal actions have not been computed yet.
    Unvisited,
    /// Legal actions computed, none expanded.
    Frontier,
    /// Some, but not all, legal actions expanded into children.
    PartiallyExpanded,
    /// Every legal action has a child.
    FullyExpanded,
}

/// A node in the MCTS tree.
///
/// Represents the decision point reached by following the path of actions
/// from the root.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Action that led to this node (None for root).
    pub action: Option<Action>,

    /// Parent node (None for root).
    pub parent: Option<NodeId>,

    /// Children in expansion order.
    pub children: Vec<(Action, NodeId)>,

    /// Number of completed iterations that passed through this node.
    pub visit_count: u32,

    /// Sum of rewards from all iterations through this node.
    pub total_reward: f64,

    /// Legal actions not yet expanded. `None` until first computed.
    pub pending: Option<Vec<Action>>,
}

impl Node {
    /// Create a new unvisited node.
    pub fn new(action: Option<Action>, parent: Option<NodeId>) -> Self {
        Self {
            action,
            parent,
            children: Vec::new(),
            visit_count: 0,
            total_reward: 0.0,
            pending: None,
        }
    }

    /// Create the root node.
    pub fn root() -> Self {
        Self::new(None, None)
    }

    /// Mean reward, or `None` if the node has never been visited.
    pub fn mean_reward(&self) -> Option<f64> {
        if self.visit_count == 0 {
            None
        } else {
            Some(self.total_reward / self.visit_count as f64)
        }
    }

    pub fn state(&self) -> NodeState {
        match &self.pending {
            None => NodeState::Unvisited,
            Some(pending) if pending.is_empty() => NodeState::FullyExpanded,
            Some(_) if self.children.is_empty() => NodeState::Frontier,
            Some(_) => NodeState::PartiallyExpanded,
        }
    }

    /// True if selection may descend past this node.
    pub fn is_fully_expanded(&self) -> bool {
        self.state() == NodeState::FullyExpanded && !self.children.is_empty()
    }
}
