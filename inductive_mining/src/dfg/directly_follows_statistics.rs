use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clustering::{ClusteredFrequencies, DensityDistributionClustering, FrequencyClustering};
use super::dfg_struct::DirectlyFollowsGraph;
use crate::event_log::{Activity, EventLog};
use crate::utils::clamp_unit_interval;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Options for [`DirectlyFollowsStatistics`]
pub struct StatisticsOptions {
    /// Width of a node with scale factor `0`
    pub min_node_size: f64,
}

impl Default for StatisticsOptions {
    fn default() -> Self {
        Self { min_node_size: 1.5 }
    }
}

///
/// Directly-follows statistics of an [`EventLog`]
///
/// All artifacts are computed once on construction: the activities and their
/// frequencies, the succession (directly-follows) matrix, start and end activities, and
/// a clustering of the activity frequencies used to scale nodes.
///
#[derive(Debug, Clone)]
pub struct DirectlyFollowsStatistics {
    /// All distinct activities, in the order they first appear in the log
    pub events: Vec<Activity>,
    /// Number of occurrences of each activity (weighted by trace frequency)
    pub appearance_frequency: HashMap<Activity, u64>,
    /// Row/column index of each activity in the `succession_matrix`
    pub event_positions: HashMap<Activity, usize>,
    /// Cell `(i, j)` holds how often activity `i` is directly followed by activity `j`
    pub succession_matrix: DMatrix<u64>,
    /// First activities of all non-empty traces
    pub start_nodes: HashSet<Activity>,
    /// Last activities of all non-empty traces
    pub end_nodes: HashSet<Activity>,
    /// Clustering of the activity frequencies
    pub clustered_frequencies: ClusteredFrequencies,
    /// Highest frequency of any trace (`None` for an empty log)
    pub max_trace_frequency: Option<u64>,
    /// Options used for node sizing
    pub options: StatisticsOptions,
}

/// `round(value * threshold)` with ties rounded to even
fn scaled_minimum(value: u64, threshold: f64) -> u64 {
    (value as f64 * clamp_unit_interval(threshold)).round_ties_even() as u64
}

impl DirectlyFollowsStatistics {
    ///
    /// Computes the statistics with default options and [`DensityDistributionClustering`]
    ///
    pub fn new(log: &EventLog) -> Self {
        Self::with_options(log, StatisticsOptions::default())
    }

    ///
    /// Computes the statistics with the given options and [`DensityDistributionClustering`]
    ///
    pub fn with_options(log: &EventLog, options: StatisticsOptions) -> Self {
        Self::with_clustering(log, options, &DensityDistributionClustering::default())
    }

    ///
    /// Computes the statistics using the given frequency clustering procedure
    ///
    /// If the clustering fails (e.g., because all activities are equally frequent), the
    /// first frequency is used as the only clustered value with scale `1.0`.
    ///
    pub fn with_clustering<C: FrequencyClustering + ?Sized>(
        log: &EventLog,
        options: StatisticsOptions,
        clustering: &C,
    ) -> Self {
        let events = log.activities();
        let event_positions: HashMap<Activity, usize> = events
            .iter()
            .enumerate()
            .map(|(i, a)| (a.clone(), i))
            .collect();

        let mut appearance_frequency: HashMap<Activity, u64> = HashMap::new();
        let mut succession_matrix: DMatrix<u64> = DMatrix::zeros(events.len(), events.len());
        let mut start_nodes = HashSet::new();
        let mut end_nodes = HashSet::new();
        for (trace, frequency) in log.traces() {
            for activity in trace {
                *appearance_frequency.entry(activity.clone()).or_default() += frequency;
            }
            for (a, b) in trace.iter().tuple_windows() {
                succession_matrix[(event_positions[a], event_positions[b])] += frequency;
            }
            if let (Some(first), Some(last)) = (trace.first(), trace.last()) {
                start_nodes.insert(first.clone());
                end_nodes.insert(last.clone());
            }
        }

        let frequencies: Vec<f64> = events
            .iter()
            .map(|e| appearance_frequency[e] as f64)
            .collect();
        let clustered_frequencies = match clustering.cluster(&frequencies) {
            Ok(clustered) => clustered,
            Err(err) => {
                debug!(%err, "frequency clustering failed, falling back to a single cluster");
                frequencies
                    .first()
                    .map(|f| ClusteredFrequencies::singleton(*f))
                    .unwrap_or_default()
            }
        };

        Self {
            events,
            appearance_frequency,
            event_positions,
            succession_matrix,
            start_nodes,
            end_nodes,
            clustered_frequencies,
            max_trace_frequency: log.max_trace_frequency(),
            options,
        }
    }

    /// Number of occurrences of `activity` (`0` if unknown)
    pub fn activity_frequency(&self, activity: &str) -> u64 {
        self.appearance_frequency.get(activity).copied().unwrap_or(0)
    }

    /// How often `from` is directly followed by `to` (`0` if any of them is unknown)
    pub fn directly_follows(&self, from: &str, to: &str) -> u64 {
        match (self.event_positions.get(from), self.event_positions.get(to)) {
            (Some(&i), Some(&j)) => self.succession_matrix[(i, j)],
            _ => 0,
        }
    }

    ///
    /// Activities that occur less often than `round(max activity frequency * threshold)`
    ///
    /// The threshold is clamped into `[0, 1]`.
    ///
    pub fn get_events_to_remove(&self, threshold: f64) -> HashSet<Activity> {
        let Some(max_frequency) = self.appearance_frequency.values().max() else {
            return HashSet::new();
        };
        let minimum = scaled_minimum(*max_frequency, threshold);
        self.appearance_frequency
            .iter()
            .filter(|(_, f)| **f < minimum)
            .map(|(a, _)| a.clone())
            .collect()
    }

    ///
    /// Minimum trace frequency for a threshold: `round(max trace frequency * threshold)`
    ///
    /// The threshold is clamped into `[0, 1]`. Returns `0` for an empty log.
    ///
    pub fn calulate_minimum_traces_frequency(&self, threshold: f64) -> u64 {
        self.max_trace_frequency
            .map(|max| scaled_minimum(max, threshold))
            .unwrap_or(0)
    }

    /// Same as [`DirectlyFollowsStatistics::calulate_minimum_traces_frequency`]
    pub fn calculate_minimum_traces_frequency(&self, threshold: f64) -> u64 {
        self.calulate_minimum_traces_frequency(threshold)
    }

    ///
    /// Scale factor of an activity's node, derived from the frequency clustering
    ///
    /// Returns `1.0` if the activity or its frequency is unknown.
    ///
    pub fn get_scale_factor(&self, activity: &str) -> f64 {
        self.appearance_frequency
            .get(activity)
            .and_then(|f| self.clustered_frequencies.scale_of(*f as f64))
            .unwrap_or(1.0)
    }

    ///
    /// `(width, height)` of an activity's node
    ///
    pub fn calulate_node_size(&self, activity: &str) -> (f64, f64) {
        let width = self.get_scale_factor(activity) / 2.0 + self.options.min_node_size;
        (width, width / 3.0)
    }

    /// Same as [`DirectlyFollowsStatistics::calulate_node_size`]
    pub fn calculate_node_size(&self, activity: &str) -> (f64, f64) {
        self.calulate_node_size(activity)
    }

    ///
    /// Frequency-annotated [`DirectlyFollowsGraph`] view of these statistics
    ///
    pub fn to_directly_follows_graph(&self) -> DirectlyFollowsGraph {
        let mut graph = DirectlyFollowsGraph::new();
        for activity in &self.events {
            graph.add_activity(activity.clone(), self.activity_frequency(activity));
        }
        for ((i, j), frequency) in (0..self.events.len())
            .cartesian_product(0..self.events.len())
            .map(|(i, j)| ((i, j), self.succession_matrix[(i, j)]))
            .filter(|(_, f)| *f > 0)
        {
            graph.add_df_relation(self.events[i].clone(), self.events[j].clone(), frequency);
        }
        self.start_nodes
            .iter()
            .for_each(|a| graph.add_start_activity(a.clone()));
        self.end_nodes
            .iter()
            .for_each(|a| graph.add_end_activity(a.clone()));
        graph
    }
}
