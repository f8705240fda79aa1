//! Behavioral profiles: ordering relations between pairs of activities
use std::collections::{BTreeSet, HashMap};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::trace_generator::sample_traces;
use crate::event_log::{Activity, Trace};
use crate::process_tree::process_tree_struct::ProcessTree;

///
/// Ordering relation of an ordered activity pair `(a, b)` observed in a set of traces
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderingRelation {
    /// `a` and `b` never occur in the same trace
    Never,
    /// The first `a` is always before the first `b`
    Before,
    /// The first `a` is always after the first `b`
    After,
    /// Both orders were observed
    Concurrent,
}

/// Relation of every ordered pair of distinct activities
pub type BehavioralProfile = HashMap<(Activity, Activity), OrderingRelation>;

///
/// Computes the [`BehavioralProfile`] of `traces` over the given activities
///
/// Only the first occurrence of an activity in a trace is considered.
///
pub fn behavioral_profile<'a, I>(traces: &[Trace], activities: I) -> BehavioralProfile
where
    I: IntoIterator<Item = &'a Activity>,
    I::IntoIter: Clone,
{
    let first_positions: Vec<HashMap<&str, usize>> = traces
        .iter()
        .map(|trace| {
            let mut positions = HashMap::new();
            for (i, activity) in trace.iter().enumerate() {
                positions.entry(activity.as_str()).or_insert(i);
            }
            positions
        })
        .collect();

    let activities = activities.into_iter();
    let mut profile = BehavioralProfile::new();
    for a in activities.clone() {
        for b in activities.clone().filter(|b| *b != a) {
            let (mut before, mut after) = (false, false);
            for positions in &first_positions {
                if let (Some(pos_a), Some(pos_b)) =
                    (positions.get(a.as_str()), positions.get(b.as_str()))
                {
                    if pos_a < pos_b {
                        before = true;
                    } else {
                        after = true;
                    }
                }
            }
            let relation = match (before, after) {
                (false, false) => OrderingRelation::Never,
                (true, false) => OrderingRelation::Before,
                (false, true) => OrderingRelation::After,
                (true, true) => OrderingRelation::Concurrent,
            };
            profile.insert((a.clone(), b.clone()), relation);
        }
    }
    profile
}

///
/// Fraction of activity pairs with the same ordering relation in both trees
///
/// Both trees are replayed `sample_size` times (empty traces are discarded) and profiled
/// over the union of their visible activities. With fewer than two activities there
/// are no pairs; the score is then `1.0` if both trees have the same activities and
/// `0.0` otherwise.
///
pub fn behavioral_profile_similarity<R: Rng + ?Sized>(
    tree1: &ProcessTree,
    tree2: &ProcessTree,
    sample_size: usize,
    rng: &mut R,
) -> f64 {
    let activities1 = tree1.activities();
    let activities2 = tree2.activities();
    let all_activities: BTreeSet<&Activity> = activities1.union(&activities2).collect();

    if all_activities.len() < 2 {
        return if activities1 == activities2 { 1.0 } else { 0.0 };
    }

    let mut non_empty_samples = |tree: &ProcessTree| -> Vec<Trace> {
        sample_traces(tree, sample_size, &mut *rng)
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect()
    };
    let profile1 = behavioral_profile(&non_empty_samples(tree1), all_activities.iter().copied());
    let profile2 = behavioral_profile(&non_empty_samples(tree2), all_activities.iter().copied());

    let total = profile1.len();
    let matching = profile1
        .iter()
        .filter(|(pair, relation)| profile2.get(*pair) == Some(*relation))
        .count();
    matching as f64 / total as f64
}
