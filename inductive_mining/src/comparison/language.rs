//! Precision, recall and F1 of sampled trace languages
use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::trace_generator::sample_traces;
use crate::event_log::Trace;
use crate::process_tree::process_tree_struct::ProcessTree;

///
/// Language-based scores of one tree against another
///
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LanguageMetrics {
    /// Fraction of the first language that is also in the second
    pub precision: f64,
    /// Fraction of the second language that is also in the first
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1: f64,
}

impl LanguageMetrics {
    ///
    /// Compares two (distinct) trace languages
    ///
    /// If either language is empty, all scores are `0.0`.
    ///
    pub fn from_languages(language1: &HashSet<Trace>, language2: &HashSet<Trace>) -> Self {
        if language1.is_empty() || language2.is_empty() {
            return Self::default();
        }
        let common = language1.intersection(language2).count() as f64;
        let precision = common / language1.len() as f64;
        let recall = common / language2.len() as f64;
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
        }
    }
}

/// Distinct non-empty traces of `sample_size` replays
fn non_empty_language<R: Rng + ?Sized>(
    tree: &ProcessTree,
    sample_size: usize,
    rng: &mut R,
) -> HashSet<Trace> {
    sample_traces(tree, sample_size, rng)
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect()
}

///
/// Language precision, recall and F1 of two process trees
///
/// If `log_traces` holds at least one trace, these traces are used as the language of
/// both trees. Otherwise, each tree is replayed `sample_size` times and its distinct
/// non-empty traces form its language.
///
pub fn language_metrics<R: Rng + ?Sized>(
    tree1: &ProcessTree,
    tree2: &ProcessTree,
    log_traces: Option<&[Trace]>,
    sample_size: usize,
    rng: &mut R,
) -> LanguageMetrics {
    match log_traces {
        Some(traces) if !traces.is_empty() => {
            let language: HashSet<Trace> = traces.iter().cloned().collect();
            LanguageMetrics::from_languages(&language, &language)
        }
        _ => {
            let language1 = non_empty_language(tree1, sample_size, rng);
            let language2 = non_empty_language(tree2, sample_size, rng);
            LanguageMetrics::from_languages(&language1, &language2)
        }
    }
}
