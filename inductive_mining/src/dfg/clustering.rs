//! One-dimensional clustering of activity frequencies (used for node scaling)
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

///
/// Errors that can occur when clustering frequencies
///
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusteringError {
    /// No frequencies were given
    #[error("cannot cluster an empty list of frequencies")]
    EmptyInput,
    /// All frequencies are equal, so they cannot be normalized (division by zero)
    #[error("all frequencies are equal to {0}, cannot normalize a zero range")]
    ZeroRange(f64),
}

///
/// Result of a frequency clustering: two parallel lists
///
/// The scale label of a frequency is found at the position of that frequency in
/// `sorted_values`.
///
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusteredFrequencies {
    /// All clustered values in ascending order
    pub sorted_values: Vec<f64>,
    /// Scale label for the value at the same position
    pub scale_labels: Vec<f64>,
}

impl ClusteredFrequencies {
    ///
    /// Fallback for degenerate input: the single value `value` with scale `1.0`
    ///
    pub fn singleton(value: f64) -> Self {
        Self {
            sorted_values: vec![value],
            scale_labels: vec![1.0],
        }
    }

    /// Scale label of the first occurrence of `value` (`None` if it was not clustered)
    pub fn scale_of(&self, value: f64) -> Option<f64> {
        self.sorted_values
            .iter()
            .position(|v| *v == value)
            .and_then(|pos| self.scale_labels.get(pos).copied())
    }
}

///
/// A procedure grouping a list of frequencies into natural clusters
///
/// Implementations must return [`ClusteringError`] for degenerate input instead of
/// producing non-finite labels, so that callers can apply a fallback.
///
pub trait FrequencyClustering {
    /// Cluster the given (not necessarily unique) frequencies
    fn cluster(&self, frequencies: &[f64]) -> Result<ClusteredFrequencies, ClusteringError>;
}

///
/// Density-based clustering of one-dimensional data
///
/// The values are sorted and min-max normalized. A new cluster starts wherever the gap
/// between two neighbouring values is larger than the mean gap, i.e., where the data is
/// less dense than a uniform distribution over the same range. Cluster `k` of `K`
/// clusters is labelled `k * max_scale / (K - 1)`; if only one cluster emerges every
/// value gets the label `1.0`.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityDistributionClustering {
    /// Label of the cluster with the highest values
    pub max_scale: f64,
}

impl Default for DensityDistributionClustering {
    fn default() -> Self {
        Self { max_scale: 5.0 }
    }
}

/// Tolerance for comparing normalized gaps
const GAP_EPSILON: f64 = 1e-9;

impl FrequencyClustering for DensityDistributionClustering {
    fn cluster(&self, frequencies: &[f64]) -> Result<ClusteredFrequencies, ClusteringError> {
        let sorted_values: Vec<f64> = frequencies
            .iter()
            .copied()
            .sorted_by_key(|v| OrderedFloat(*v))
            .collect();
        let (min, max) = match (sorted_values.first(), sorted_values.last()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => return Err(ClusteringError::EmptyInput),
        };
        let range = max - min;
        if range == 0.0 {
            return Err(ClusteringError::ZeroRange(min));
        }

        // range > 0 implies at least two values
        let mean_gap = 1.0 / (sorted_values.len() - 1) as f64;
        let mut cluster_ids: Vec<usize> = Vec::with_capacity(sorted_values.len());
        cluster_ids.push(0);
        let mut current = 0;
        for (a, b) in sorted_values.iter().tuple_windows() {
            if (b - a) / range > mean_gap + GAP_EPSILON {
                current += 1;
            }
            cluster_ids.push(current);
        }

        let num_clusters = current + 1;
        let scale_labels = cluster_ids
            .into_iter()
            .map(|k| {
                if num_clusters == 1 {
                    1.0
                } else {
                    k as f64 * self.max_scale / (num_clusters - 1) as f64
                }
            })
            .collect();

        Ok(ClusteredFrequencies {
            sorted_values,
            scale_labels,
        })
    }
}
