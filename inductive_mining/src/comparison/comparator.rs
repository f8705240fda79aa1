use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::behavioral_profile::behavioral_profile_similarity;
use super::graph_edit::graph_edit_similarity;
use super::language::{language_metrics, LanguageMetrics};
use super::tree_edit_distance::{normalize_distance, tree_edit_distance, DEFAULT_MAX_DEPTH};
use crate::event_log::Trace;
use crate::process_tree::process_tree_struct::ProcessTree;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Weights of the individual scores in [`ComparisonResult::combined_score`]
pub struct ComparisonWeights {
    /// Weight of the normalized tree edit distance
    pub normalized_ted: f64,
    /// Weight of the behavioral profile similarity
    pub behavioral: f64,
    /// Weight of the graph-edit similarity
    pub graph_edit: f64,
    /// Weight of the language F1 score
    pub language: f64,
}

impl Default for ComparisonWeights {
    fn default() -> Self {
        Self {
            normalized_ted: 0.25,
            behavioral: 0.25,
            graph_edit: 0.25,
            language: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Options for [`ProcessTreeComparator`]
pub struct ComparisonOptions {
    /// Number of replays per tree for the behavioral profiles
    pub behavioral_sample_size: usize,
    /// Number of replays per tree for the language metrics
    pub language_sample_size: usize,
    /// Recursion ceiling of the tree edit distance
    pub max_depth: usize,
    /// Weights of the combined score
    pub weights: ComparisonWeights,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            behavioral_sample_size: 100,
            language_sample_size: 1000,
            max_depth: DEFAULT_MAX_DEPTH,
            weights: ComparisonWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// All scores of a process tree comparison
pub struct ComparisonResult {
    /// Tree edit distance
    pub tree_edit_distance: f64,
    /// `1 - tree_edit_distance / max(size)`, clamped into `[0, 1]`
    pub normalized_ted: f64,
    /// Behavioral profile similarity
    pub behavioral_similarity: f64,
    /// Graph-edit similarity
    pub graph_edit_similarity: f64,
    /// Language precision
    pub language_precision: f64,
    /// Language recall
    pub language_recall: f64,
    /// Language F1 score
    pub language_f1: f64,
    /// Weighted sum of the normalized edit distance, behavioral similarity, graph-edit
    /// similarity and language F1
    pub combined_score: f64,
}

impl ComparisonResult {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

///
/// Compares two process trees structurally and behaviorally
///
/// # Examples
///
/// ```
/// use inductive_mining::comparison::comparator::{ComparisonOptions, ProcessTreeComparator};
/// use inductive_mining::process_tree::process_tree_struct::ProcessTree;
///
/// let t1 = ProcessTree::from_json(r#"["seq","a",["xor","b","c"]]"#).unwrap();
/// let t2 = ProcessTree::from_json(r#"["seq","a",["xor","c","b"]]"#).unwrap();
///
/// let comparator = ProcessTreeComparator::new(ComparisonOptions::default());
/// let result = comparator.compare_seeded(&t1, &t2, 42);
/// assert_eq!(result.tree_edit_distance, 0.0);
/// assert_eq!(result.normalized_ted, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcessTreeComparator {
    /// Options used for all comparisons
    pub options: ComparisonOptions,
}

impl ProcessTreeComparator {
    /// Creates a comparator with the given options
    pub fn new(options: ComparisonOptions) -> Self {
        Self { options }
    }

    /// Tree edit distance, see [`tree_edit_distance`]
    pub fn tree_edit_distance(&self, tree1: &ProcessTree, tree2: &ProcessTree) -> f64 {
        tree_edit_distance(tree1, tree2, self.options.max_depth)
    }

    /// Normalized tree edit distance in `[0, 1]`
    pub fn normalized_edit_distance(&self, tree1: &ProcessTree, tree2: &ProcessTree) -> f64 {
        normalize_distance(
            self.tree_edit_distance(tree1, tree2),
            tree1.size().max(tree2.size()),
        )
    }

    /// Behavioral profile similarity, see [`behavioral_profile_similarity`]
    pub fn behavioral_profile_similarity<R: Rng + ?Sized>(
        &self,
        tree1: &ProcessTree,
        tree2: &ProcessTree,
        rng: &mut R,
    ) -> f64 {
        behavioral_profile_similarity(tree1, tree2, self.options.behavioral_sample_size, rng)
    }

    /// Graph-edit similarity, see [`graph_edit_similarity`]
    pub fn graph_edit_similarity(&self, tree1: &ProcessTree, tree2: &ProcessTree) -> f64 {
        graph_edit_similarity(tree1, tree2)
    }

    /// Language precision, recall and F1, see [`language_metrics`]
    pub fn language_metrics<R: Rng + ?Sized>(
        &self,
        tree1: &ProcessTree,
        tree2: &ProcessTree,
        log_traces: Option<&[Trace]>,
        rng: &mut R,
    ) -> LanguageMetrics {
        language_metrics(
            tree1,
            tree2,
            log_traces,
            self.options.language_sample_size,
            rng,
        )
    }

    ///
    /// Computes all scores and the weighted combined score
    ///
    pub fn compare<R: Rng + ?Sized>(
        &self,
        tree1: &ProcessTree,
        tree2: &ProcessTree,
        rng: &mut R,
    ) -> ComparisonResult {
        self.compare_with_traces(tree1, tree2, None, rng)
    }

    ///
    /// Like [`ProcessTreeComparator::compare`], but the language metrics use
    /// `log_traces` (if non-empty) instead of replaying the trees
    ///
    pub fn compare_with_traces<R: Rng + ?Sized>(
        &self,
        tree1: &ProcessTree,
        tree2: &ProcessTree,
        log_traces: Option<&[Trace]>,
        rng: &mut R,
    ) -> ComparisonResult {
        let tree_edit_distance = self.tree_edit_distance(tree1, tree2);
        let normalized_ted =
            normalize_distance(tree_edit_distance, tree1.size().max(tree2.size()));
        let behavioral_similarity = self.behavioral_profile_similarity(tree1, tree2, rng);
        let graph_edit_similarity = self.graph_edit_similarity(tree1, tree2);
        let language = self.language_metrics(tree1, tree2, log_traces, rng);

        let weights = &self.options.weights;
        let combined_score = weights.normalized_ted * normalized_ted
            + weights.behavioral * behavioral_similarity
            + weights.graph_edit * graph_edit_similarity
            + weights.language * language.f1;

        tracing::debug!(
            tree_edit_distance,
            behavioral_similarity,
            graph_edit_similarity,
            language_f1 = language.f1,
            combined_score,
            "compared process trees"
        );

        ComparisonResult {
            tree_edit_distance,
            normalized_ted,
            behavioral_similarity,
            graph_edit_similarity,
            language_precision: language.precision,
            language_recall: language.recall,
            language_f1: language.f1,
            combined_score,
        }
    }

    ///
    /// [`ProcessTreeComparator::compare`] with a [`StdRng`] seeded from `seed`
    ///
    pub fn compare_seeded(
        &self,
        tree1: &ProcessTree,
        tree2: &ProcessTree,
        seed: u64,
    ) -> ComparisonResult {
        self.compare(tree1, tree2, &mut StdRng::seed_from_u64(seed))
    }
}

///
/// Compares two process trees with the given options and random source
///
pub fn compare_process_trees<R: Rng + ?Sized>(
    tree1: &ProcessTree,
    tree2: &ProcessTree,
    options: &ComparisonOptions,
    rng: &mut R,
) -> ComparisonResult {
    ProcessTreeComparator::new(*options).compare(tree1, tree2, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process_tree::process_tree_struct::{Node, OperatorType};
    use crate::trace;
    use crate::utils::test_utils::get_test_data_path;

    fn tree(json: &str) -> ProcessTree {
        ProcessTree::from_json(json).unwrap()
    }

    #[test]
    fn identical_trees_score_one() {
        let t = tree(r#"["seq","a",["xor","b","c"],["par","d","e"],["loop","f","g"]]"#);
        let result = ProcessTreeComparator::default().compare_seeded(&t, &t, 1);

        assert_eq!(result.tree_edit_distance, 0.0);
        assert_eq!(result.normalized_ted, 1.0);
        assert_eq!(result.behavioral_similarity, 1.0);
        assert!((result.graph_edit_similarity - 1.0).abs() < 1e-12);
        assert!(result.combined_score > 0.75);
        assert!(result.combined_score <= 1.0 + 1e-12);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let t1 = tree(r#"["seq","a",["par","b","c",["loop","d","e"]]]"#);
        let t2 = tree(r#"["seq","a",["xor","b","c"],["loop","d","e"]]"#);
        let options = ComparisonOptions::default();

        let result_1 =
            compare_process_trees(&t1, &t2, &options, &mut StdRng::seed_from_u64(99));
        let result_2 =
            compare_process_trees(&t1, &t2, &options, &mut StdRng::seed_from_u64(99));
        assert_eq!(result_1, result_2);
        for score in [
            result_1.normalized_ted,
            result_1.behavioral_similarity,
            result_1.graph_edit_similarity,
            result_1.language_precision,
            result_1.language_recall,
            result_1.language_f1,
        ] {
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn combined_score_uses_weights() {
        let t1 = tree(r#"["seq","a","b"]"#);
        let t2 = tree(r#"["seq","b","a"]"#);
        let options = ComparisonOptions {
            weights: ComparisonWeights {
                normalized_ted: 1.0,
                behavioral: 0.0,
                graph_edit: 0.0,
                language: 0.0,
            },
            ..Default::default()
        };
        let result = ProcessTreeComparator::new(options).compare_seeded(&t1, &t2, 3);

        // 2 of 3 nodes differ
        assert!((result.normalized_ted - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(result.combined_score, result.normalized_ted);
        assert_eq!(result.behavioral_similarity, 0.0);
        assert_eq!(result.language_f1, 0.0);
    }

    #[test]
    fn caller_supplied_traces() {
        let t1 = tree(r#"["seq","a","b"]"#);
        let t2 = tree(r#"["xor","c","d"]"#);
        let traces = vec![trace!("a", "b")];
        let comparator = ProcessTreeComparator::default();
        let mut rng = StdRng::seed_from_u64(0);

        let with_traces = comparator.compare_with_traces(&t1, &t2, Some(&traces), &mut rng);
        assert_eq!(with_traces.language_f1, 1.0);
        let sampled = comparator.compare(&t1, &t2, &mut rng);
        assert_eq!(sampled.language_f1, 0.0);
    }

    #[test]
    fn options_from_partial_json() {
        let options: ComparisonOptions =
            serde_json::from_str(r#"{"max_depth": 5, "weights": {"language": 0.5}}"#).unwrap();
        assert_eq!(options.max_depth, 5);
        assert_eq!(options.behavioral_sample_size, 100);
        assert_eq!(options.language_sample_size, 1000);
        assert_eq!(options.weights.language, 0.5);
        assert_eq!(options.weights.graph_edit, 0.25);
    }

    #[test]
    fn depth_ceiling_lowers_similarity() {
        let nested = |activity: &str| {
            let mut root = Node::activity(activity);
            for _ in 0..3 {
                root = Node::operator(OperatorType::Sequence, vec![root]);
            }
            ProcessTree::new(root)
        };
        let (t1, t2) = (nested("a"), nested("b"));
        let comparator = ProcessTreeComparator::new(ComparisonOptions {
            max_depth: 0,
            ..Default::default()
        });

        assert_eq!(comparator.tree_edit_distance(&t1, &t1), 0.0);
        // the children are never compared, so they are deleted and inserted
        assert_eq!(comparator.tree_edit_distance(&t1, &t2), 6.0);
        let result = comparator.compare_seeded(&t1, &t2, 0);
        assert_eq!(result.normalized_ted, 0.0);
        let json = result.to_json().unwrap();
        assert!(json.contains(r#""normalized_ted":0.0"#));
    }

    #[test]
    fn compare_trees_from_test_data() {
        let path = get_test_data_path().join("trees").join("loop_tree.json");
        let t1 = ProcessTree::from_json(&std::fs::read_to_string(path).unwrap()).unwrap();
        let t2 = tree(r#"["seq","a",["loop","b","c"],"d"]"#);
        let result = ProcessTreeComparator::default().compare_seeded(&t1, &t2, 17);
        assert!(result.tree_edit_distance > 0.0);
        assert!(result.combined_score < 1.0);
        assert!(result.combined_score > 0.0);
    }
}
