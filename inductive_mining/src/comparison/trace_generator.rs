//! Random replay of process trees
use std::collections::HashSet;

use rand::Rng;

use crate::event_log::{EventLog, Trace};
use crate::process_tree::process_tree_struct::{LeafLabel, Node, OperatorType, ProcessTree};

/// Probability of entering the first redo iteration of a loop
pub const LOOP_REPEAT_PROBABILITY: f64 = 0.5;

///
/// Generates one random trace of the node's language
///
/// * Sequence: concatenation of the children's traces
/// * Exclusive choice: trace of one child, picked uniformly
/// * Parallel: random interleaving of all children's traces (each child keeps its order)
/// * Loop: body (first child), then, with probability `0.5` halved after every
///   iteration, a redo part (second child) followed by the body again
/// * Tau: nothing
///
pub fn generate_trace<R: Rng + ?Sized>(node: &Node, rng: &mut R) -> Trace {
    let mut trace = Vec::new();
    replay(node, rng, &mut trace);
    trace
}

fn replay<R: Rng + ?Sized>(node: &Node, rng: &mut R, trace: &mut Trace) {
    match node {
        Node::Leaf(LeafLabel::Activity(label)) => trace.push(label.clone()),
        Node::Leaf(LeafLabel::Tau) => {}
        Node::Operator(op) => match op.operator_type {
            OperatorType::Sequence => op.children.iter().for_each(|c| replay(c, rng, trace)),
            OperatorType::ExclusiveChoice => {
                if !op.children.is_empty() {
                    let pick = rng.random_range(0..op.children.len());
                    replay(&op.children[pick], rng, trace);
                }
            }
            OperatorType::Parallel => {
                let sub_traces: Vec<Trace> = op
                    .children
                    .iter()
                    .map(|c| generate_trace(c, rng))
                    .collect();
                trace.extend(interleave(sub_traces, rng));
            }
            OperatorType::Loop => {
                let Some(body) = op.children.first() else {
                    return;
                };
                replay(body, rng, trace);
                if let Some(redo) = op.children.get(1) {
                    let mut probability = LOOP_REPEAT_PROBABILITY;
                    while rng.random::<f64>() < probability {
                        replay(redo, rng, trace);
                        replay(body, rng, trace);
                        probability /= 2.0;
                    }
                }
            }
        },
    }
}

/// Uniformly random interleaving of the given traces, preserving each trace's order
fn interleave<R: Rng + ?Sized>(traces: Vec<Trace>, rng: &mut R) -> Trace {
    let total: usize = traces.iter().map(Vec::len).sum();
    let mut iters: Vec<_> = traces.into_iter().map(|t| t.into_iter()).collect();
    let mut result = Vec::with_capacity(total);
    for remaining in (1..=total).rev() {
        // picking a position among all remaining events makes every interleaving
        // equally likely
        let mut pick = rng.random_range(0..remaining);
        for it in iters.iter_mut() {
            let len = it.len();
            if pick < len {
                if let Some(event) = it.next() {
                    result.push(event);
                }
                break;
            }
            pick -= len;
        }
    }
    result
}

///
/// Replays the tree `num_samples` times
///
/// Returns every generated trace (including empty ones) in generation order.
///
pub fn sample_traces<R: Rng + ?Sized>(
    tree: &ProcessTree,
    num_samples: usize,
    rng: &mut R,
) -> Vec<Trace> {
    (0..num_samples)
        .map(|_| generate_trace(&tree.root, rng))
        .collect()
}

///
/// Sampled language of the tree: the distinct traces of `num_samples` replays
///
pub fn sample_language<R: Rng + ?Sized>(
    tree: &ProcessTree,
    num_samples: usize,
    rng: &mut R,
) -> HashSet<Trace> {
    sample_traces(tree, num_samples, rng).into_iter().collect()
}

///
/// Replays the tree `num_samples` times and collects the result as an [`EventLog`]
///
pub fn sample_event_log<R: Rng + ?Sized>(
    tree: &ProcessTree,
    num_samples: usize,
    rng: &mut R,
) -> EventLog {
    EventLog::from_traces(sample_traces(tree, num_samples, rng))
}
