//! Builds the folder/album forest from flat, parent-linked records.

use super::types::{HierarchyNode, TreeNode};
use std::collections::HashMap;

/// Assemble flat nodes into a forest of roots with children attached.
///
/// Nodes whose parent is missing from the input (or is the node itself)
/// become roots. Children keep their input order. The input is only
/// read, so repeated calls on the same snapshot give equal forests.
pub fn assemble(nodes: &[HierarchyNode]) -> Vec<TreeNode> {
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(nodes.len());
    for (pos, node) in nodes.iter().enumerate() {
        index.entry(node.id).or_insert(pos);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut roots = Vec::new();

    for (pos, node) in nodes.iter().enumerate() {
        match node.parent_id.and_then(|parent| index.get(&parent)) {
            Some(&parent) if parent != pos => children[parent].push(pos),
            _ => roots.push(pos),
        }
    }

    roots
        .into_iter()
        .map(|root| build(nodes, &children, root))
        .collect()
}

// Only reachable from a root, so parent cycles are never entered.
fn build(nodes: &[HierarchyNode], children: &[Vec<usize>], pos: usize) -> TreeNode {
    TreeNode {
        node: nodes[pos].clone(),
        children: children[pos]
            .iter()
            .map(|&child| build(nodes, children, child))
            .collect(),
    }
}
