//! Text dump of a search tree for debugging.

use crate::node::NodeId;
use crate::tree::Tree;
use std::fmt::Write;

/// Render `tree` as indented lines of `<edge> <mean reward> (visits: n)`.
///
/// Siblings are listed by visit count, most visited first. Nodes deeper than
/// `max_depth` are omitted.
pub fn render_tree(tree: &Tree, max_depth: Option<usize>) -> String {
    let mut out = String::new();
    write_node(tree, NodeId::ROOT, 0, max_depth, &mut out);
    out
}

fn write_node(tree: &Tree, id: NodeId, depth: usize, max_depth: Option<usize>, out: &mut String) {
    let node = tree.get(id);
    let label = match node.action {
        Some(action) => action.key().to_string(),
        None => "root".to_string(),
    };
    let _ = writeln!(
        out,
        "{:indent$}{} {:.2} (visits: {})",
        "",
        label,
        node.mean_reward().unwrap_or(0.0),
        node.visit_count,
        indent = depth * 2
    );

    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }

    let mut children: Vec<NodeId> = node.children.iter().map(|(_, child)| *child).collect();
    children.sort_by(|a, b| tree.get(*b).visit_count.cmp(&tree.get(*a).visit_count));
    for child in children {
        write_node(tree, child, depth + 1, max_depth, out);
    }
}
