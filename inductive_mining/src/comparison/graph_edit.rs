//! Graph-edit similarity of process trees flattened to directed graphs
use std::collections::HashSet;
use std::hash::Hash;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::process_tree::process_tree_struct::{LeafLabel, Node, ProcessTree, TAU_LABEL};

/// Weight of the node Jaccard index in [`graph_edit_similarity`]
pub const NODE_WEIGHT: f64 = 0.3;
/// Weight of the edge Jaccard index in [`graph_edit_similarity`]
pub const EDGE_WEIGHT: f64 = 0.7;

fn node_label(node: &Node) -> &str {
    match node {
        Node::Operator(op) => op.operator_type.token(),
        Node::Leaf(LeafLabel::Activity(label)) => label.as_str(),
        Node::Leaf(LeafLabel::Tau) => TAU_LABEL,
    }
}

///
/// Flattens a process tree into a directed graph with parent → child edges
///
/// Every node is keyed `"{label}_{id}"`, where `label` is the operator token or leaf
/// label and `id` the node's position in a pre-order traversal.
///
pub fn tree_to_graph(tree: &ProcessTree) -> DiGraph<String, ()> {
    let mut graph = DiGraph::new();
    let mut stack: Vec<(&Node, Option<NodeIndex>)> = vec![(&tree.root, None)];
    let mut next_id = 0usize;
    while let Some((node, parent)) = stack.pop() {
        let index = graph.add_node(format!("{}_{}", node_label(node), next_id));
        next_id += 1;
        if let Some(parent) = parent {
            graph.add_edge(parent, index, ());
        }
        stack.extend(node.children().iter().rev().map(|c| (c, Some(index))));
    }
    graph
}

/// Jaccard index of two sets (`0.0` if both are empty)
fn jaccard<T: Eq + Hash>(set1: &HashSet<T>, set2: &HashSet<T>) -> f64 {
    let union = set1.union(set2).count();
    if union == 0 {
        0.0
    } else {
        set1.intersection(set2).count() as f64 / union as f64
    }
}

fn node_keys(graph: &DiGraph<String, ()>) -> HashSet<&str> {
    graph.node_weights().map(String::as_str).collect()
}

fn edge_keys(graph: &DiGraph<String, ()>) -> HashSet<(&str, &str)> {
    graph
        .raw_edges()
        .iter()
        .map(|e| (graph[e.source()].as_str(), graph[e.target()].as_str()))
        .collect()
}

///
/// Similarity of the flattened trees: `0.3 * Jaccard(nodes) + 0.7 * Jaccard(edges)`
///
/// Note that a single-leaf tree has no edges, so its similarity with itself is `0.3`.
///
pub fn graph_edit_similarity(tree1: &ProcessTree, tree2: &ProcessTree) -> f64 {
    let graph1 = tree_to_graph(tree1);
    let graph2 = tree_to_graph(tree2);
    NODE_WEIGHT * jaccard(&node_keys(&graph1), &node_keys(&graph2))
        + EDGE_WEIGHT * jaccard(&edge_keys(&graph1), &edge_keys(&graph2))
}
