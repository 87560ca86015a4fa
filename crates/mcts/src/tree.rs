//! Arena-allocated MCTS tree.
//!
//! Using a Vec<Node> with indices provides simple top-down ownership:
//! dropping the tree drops every node at once.

use crate::node::{Node, NodeId};
use spire_core::Action;

/// Arena-allocated MCTS tree. Always contains at least the root.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a new tree with a fresh root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Get the root node.
    pub fn root(&self) -> &Node {
        self.get(NodeId::ROOT)
    }

    /// Create a child of `parent` labelled with `action`, returning its ID.
    pub(crate) fn add_child(&mut self, parent: NodeId, action: Action) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(Some(action), Some(parent)));
        self.get_mut(parent).children.push((action, id));
        id
    }

    /// Children of a node in expansion order.
    pub fn children(&self, id: NodeId) -> &[(Action, NodeId)] {
        &self.get(id).children
    }

    /// Add one visit and `reward` to `leaf` and every ancestor up to the root.
    pub(crate) fn backpropagate(&mut self, leaf: NodeId, reward: f64) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visit_count += 1;
            node.total_reward += reward;
            current = node.parent;
        }
    }

    /// Child of `parent` with the largest visit count; the earliest expanded
    /// child wins ties. `None` if `parent` has no children.
    pub fn most_visited_child(&self, parent: NodeId) -> Option<(Action, NodeId)> {
        let mut best: Option<(Action, NodeId)> = None;
        for &(action, id) in self.children(parent) {
            let better = match best {
                None => true,
                Some((_, best_id)) => self.get(id).visit_count > self.get(best_id).visit_count,
            };
            if better {
                best = Some((action, id));
            }
        }
        best
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// Iterate over every node ID in allocation order (root first).
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is allocated on construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
