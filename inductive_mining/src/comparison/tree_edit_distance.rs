//! Approximate tree edit distance between process trees
use std::collections::HashMap;

use crate::process_tree::process_tree_struct::{Node, OperatorType, ProcessTree};
use crate::utils::clamp_unit_interval;

/// Default recursion ceiling of [`tree_edit_distance`]
pub const DEFAULT_MAX_DEPTH: usize = 20;

///
/// Memoized edit distance computation for one pair of trees
///
/// The memo is keyed on structural node pairs together with their recursion depth, since
/// the ceiling makes the distance of a pair depend on where it is compared. It lives only
/// as long as this value.
///
#[derive(Debug)]
pub struct TreeEditDistance<'t> {
    max_depth: usize,
    memo: HashMap<(&'t Node, &'t Node, usize), f64>,
}

impl<'t> TreeEditDistance<'t> {
    /// Creates a new computation with an empty memo
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            memo: HashMap::new(),
        }
    }

    ///
    /// Edit distance between two subtrees
    ///
    /// * structurally equal subtrees: `0`, at any depth
    /// * two leaves: `0` if equal, `1` otherwise
    /// * leaf and operator: size of the operator subtree
    /// * same operators: ordered alignment of the children for sequence and loop,
    ///   greedy matching of the children for exclusive choice and parallel
    /// * different operators: `1` plus the greedy matching distance of the children
    ///
    /// Returns [`f64::INFINITY`] for differing subtrees once the recursion goes deeper than
    /// `max_depth`.
    ///
    pub fn distance(&mut self, t1: &'t Node, t2: &'t Node) -> f64 {
        self.distance_at(t1, t2, 0)
    }

    fn distance_at(&mut self, t1: &'t Node, t2: &'t Node, depth: usize) -> f64 {
        if t1 == t2 {
            return 0.0;
        }
        if depth > self.max_depth {
            tracing::debug!(max_depth = self.max_depth, "tree edit distance reached depth ceiling");
            return f64::INFINITY;
        }
        if let Some(result) = self.memo.get(&(t1, t2, depth)) {
            return *result;
        }

        let result = match (t1, t2) {
            (Node::Leaf(l1), Node::Leaf(l2)) => {
                if l1 == l2 {
                    0.0
                } else {
                    1.0
                }
            }
            (Node::Leaf(_), op @ Node::Operator(_)) | (op @ Node::Operator(_), Node::Leaf(_)) => {
                op.size() as f64
            }
            (Node::Operator(op1), Node::Operator(op2)) => {
                if op1.operator_type == op2.operator_type {
                    match op1.operator_type {
                        OperatorType::Sequence | OperatorType::Loop => {
                            self.ordered_children_distance(&op1.children, &op2.children, depth)
                        }
                        OperatorType::ExclusiveChoice | OperatorType::Parallel => {
                            self.unordered_children_distance(&op1.children, &op2.children, depth)
                        }
                    }
                } else {
                    1.0 + self.unordered_children_distance(&op1.children, &op2.children, depth)
                }
            }
        };

        self.memo.insert((t1, t2, depth), result);
        result
    }

    /// Alignment of two child sequences (substitute, delete or insert whole subtrees)
    fn ordered_children_distance(
        &mut self,
        children1: &'t [Node],
        children2: &'t [Node],
        depth: usize,
    ) -> f64 {
        let (m, n) = (children1.len(), children2.len());
        let mut dp = vec![vec![0.0; n + 1]; m + 1];
        for i in 1..=m {
            dp[i][0] = dp[i - 1][0] + children1[i - 1].size() as f64;
        }
        for j in 1..=n {
            dp[0][j] = dp[0][j - 1] + children2[j - 1].size() as f64;
        }
        for i in 1..=m {
            for j in 1..=n {
                let replace =
                    dp[i - 1][j - 1] + self.distance_at(&children1[i - 1], &children2[j - 1], depth + 1);
                let delete = dp[i - 1][j] + children1[i - 1].size() as f64;
                let insert = dp[i][j - 1] + children2[j - 1].size() as f64;
                dp[i][j] = replace.min(delete).min(insert);
            }
        }
        dp[m][n]
    }

    ///
    /// Greedy matching of two child sets
    ///
    /// Every child of `children1` (in order) is matched with the closest not yet matched
    /// child of `children2`; unmatched children on either side cost their size.
    ///
    // TODO: an optimal assignment (Hungarian method) would give the exact minimum
    fn unordered_children_distance(
        &mut self,
        children1: &'t [Node],
        children2: &'t [Node],
        depth: usize,
    ) -> f64 {
        let mut used = vec![false; children2.len()];
        let mut total = 0.0;
        for c1 in children1 {
            let mut best: Option<(usize, f64)> = None;
            for (j, c2) in children2.iter().enumerate() {
                if used[j] {
                    continue;
                }
                let d = self.distance_at(c1, c2, depth + 1);
                if d < best.map_or(f64::INFINITY, |(_, b)| b) {
                    best = Some((j, d));
                }
            }
            match best {
                Some((j, d)) => {
                    used[j] = true;
                    total += d;
                }
                None => total += c1.size() as f64,
            }
        }
        total
            + children2
                .iter()
                .zip(used)
                .filter(|(_, used)| !used)
                .map(|(c2, _)| c2.size() as f64)
                .sum::<f64>()
    }
}

///
/// Approximate tree edit distance between two process trees
///
/// See [`TreeEditDistance::distance`] for the cost model.
///
pub fn tree_edit_distance(tree1: &ProcessTree, tree2: &ProcessTree, max_depth: usize) -> f64 {
    TreeEditDistance::new(max_depth).distance(&tree1.root, &tree2.root)
}

///
/// Tree edit distance normalized to a similarity: `1 - distance / max(size)`
///
/// The result is clamped into `[0, 1]`.
///
pub fn normalized_edit_distance(tree1: &ProcessTree, tree2: &ProcessTree, max_depth: usize) -> f64 {
    normalize_distance(
        tree_edit_distance(tree1, tree2, max_depth),
        tree1.size().max(tree2.size()),
    )
}

pub(crate) fn normalize_distance(distance: f64, max_size: usize) -> f64 {
    if max_size == 0 {
        return 0.0;
    }
    clamp_unit_interval(1.0 - distance / max_size as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::arb_process_tree;
    use proptest::prelude::*;

    fn tree(json: &str) -> ProcessTree {
        ProcessTree::from_json(json).unwrap()
    }

    #[test]
    fn identical_trees_have_distance_zero() {
        let t = tree(r#"["seq","a",["xor","b","tau"],["loop","c",["par","d","e"]]]"#);
        assert_eq!(tree_edit_distance(&t, &t, DEFAULT_MAX_DEPTH), 0.0);
        assert_eq!(normalized_edit_distance(&t, &t, DEFAULT_MAX_DEPTH), 1.0);
    }

    #[test]
    fn leaves() {
        assert_eq!(tree_edit_distance(&tree(r#""a""#), &tree(r#""b""#), 20), 1.0);
        assert_eq!(tree_edit_distance(&tree(r#""a""#), &tree(r#""tau""#), 20), 1.0);
        assert_eq!(
            tree_edit_distance(&tree(r#""a""#), &tree(r#"["seq","a","b"]"#), 20),
            3.0
        );
        assert_eq!(
            tree_edit_distance(&tree(r#"["xor","a","b"]"#), &tree(r#""a""#), 20),
            3.0
        );
    }

    #[test]
    fn sequence_order_matters() {
        let t1 = tree(r#"["seq","a","b"]"#);
        let t2 = tree(r#"["seq","b","a"]"#);
        assert_eq!(tree_edit_distance(&t1, &t2, 20), 2.0);

        let t3 = tree(r#"["seq","a","b","c"]"#);
        assert_eq!(tree_edit_distance(&t1, &t3, 20), 1.0);
    }

    #[test]
    fn choice_and_parallel_ignore_order() {
        let t1 = tree(r#"["xor","a","b"]"#);
        let t2 = tree(r#"["xor","b","a"]"#);
        assert_eq!(tree_edit_distance(&t1, &t2, 20), 0.0);

        let t3 = tree(r#"["par","a",["seq","b","c"]]"#);
        let t4 = tree(r#"["par",["seq","b","c"],"d","a"]"#);
        assert_eq!(tree_edit_distance(&t3, &t4, 20), 1.0);
    }

    #[test]
    fn different_operators_cost_one_plus_children() {
        let t1 = tree(r#"["seq","a","b"]"#);
        let t2 = tree(r#"["par","b","a"]"#);
        assert_eq!(tree_edit_distance(&t1, &t2, 20), 1.0);

        let t3 = tree(r#"["xor","a","c"]"#);
        assert_eq!(tree_edit_distance(&t1, &t3, 20), 2.0);
        assert!((normalized_edit_distance(&t1, &t3, 20) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn depth_ceiling_yields_infinity() {
        let t1 = tree(r#"["seq",["seq",["seq","a"]]]"#);
        let t2 = tree(r#"["seq",["seq",["seq","b"]]]"#);
        assert_eq!(tree_edit_distance(&t1, &t2, 20), 1.0);
        // the leaves would be compared at depth 3, so the innermost operators are
        // deleted and inserted instead
        assert_eq!(tree_edit_distance(&t1, &t2, 2), 2.0);
        assert_eq!(normalized_edit_distance(&t1, &t2, 20), 0.75);

        let mut deep_1 = Node::activity("a");
        let mut deep_2 = Node::activity("b");
        for _ in 0..30 {
            deep_1 = Node::operator(OperatorType::Sequence, vec![deep_1]);
            deep_2 = Node::operator(OperatorType::Sequence, vec![deep_2]);
        }
        let (deep_1, deep_2) = (ProcessTree::new(deep_1), ProcessTree::new(deep_2));
        let distance = tree_edit_distance(&deep_1, &deep_2, DEFAULT_MAX_DEPTH);
        assert!(distance.is_finite());
        assert_eq!(normalized_edit_distance(&deep_1, &deep_2, 0), 0.0);
    }

    #[test]
    fn same_pair_at_different_depths() {
        // `["seq",["seq","a"]]` vs. `["seq",["seq","b"]]` costs 1 next to the root but 4
        // two levels further down, where the leaves are beyond the ceiling
        let t1 = tree(r#"["seq",["seq",["seq","a"]],["seq",["seq",["seq",["seq","a"]]]]]"#);
        let t2 = tree(r#"["seq",["seq",["seq","b"]],["seq",["seq",["seq",["seq","b"]]]]]"#);
        assert_eq!(tree_edit_distance(&t1, &t2, 3), 5.0);
        assert_eq!(tree_edit_distance(&t1, &t2, DEFAULT_MAX_DEPTH), 2.0);
    }

    #[test]
    fn parallel_children_order_beyond_ceiling() {
        let x = r#"["seq",["seq",["seq",["seq","a"]]]]"#;
        let y = r#"["seq",["seq","a"]]"#;
        let xy = tree(&format!(r#"["par",{x},{y}]"#));
        let yx = tree(&format!(r#"["par",{y},{x}]"#));
        assert_eq!(tree_edit_distance(&xy, &xy, 3), 0.0);
        assert_eq!(tree_edit_distance(&yx, &yx, 3), 0.0);
        assert_eq!(tree_edit_distance(&xy, &yx, 3), 0.0);
        assert_eq!(tree_edit_distance(&yx, &xy, 3), 0.0);
    }

    #[test]
    fn infinite_distance_normalizes_to_zero() {
        assert_eq!(normalize_distance(f64::INFINITY, 4), 0.0);
        assert_eq!(normalize_distance(0.0, 0), 0.0);
        assert_eq!(normalize_distance(9.0, 3), 0.0);
    }

    proptest! {
        #[test]
        fn normalized_distance_is_bounded(t1 in arb_process_tree(), t2 in arb_process_tree()) {
            let similarity = normalized_edit_distance(&t1, &t2, DEFAULT_MAX_DEPTH);
            prop_assert!((0.0..=1.0).contains(&similarity));
        }

        #[test]
        fn distance_to_itself_is_zero(t in arb_process_tree()) {
            prop_assert_eq!(tree_edit_distance(&t, &t, DEFAULT_MAX_DEPTH), 0.0);
        }
    }
}
