#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

///
/// Event Logs as multisets of traces, filters and splitting along cuts
///
pub mod event_log {
    /// [`EventLog`] struct
    pub mod event_log_struct;
    /// Splitting an event log into one sub event log per partition of a cut
    pub mod event_log_splitter;
    /// Frequency-based filtering of event logs
    pub mod filters;
    /// Macros for the creation of [`EventLog`]s, traces and partitions
    pub mod macros;

    pub use event_log_struct::{Activity, EventLog, Partition, Trace};
}

///
/// Directly-follows graph and directly-follows statistics
///
pub mod dfg {
    /// Clustering of activity frequencies
    pub mod clustering;
    /// [`DirectlyFollowsGraph`] struct
    pub mod dfg_struct;
    /// [`DirectlyFollowsStatistics`] of an event log
    pub mod directly_follows_statistics;

    #[doc(inline)]
    pub use crate::dfg::dfg_struct::DirectlyFollowsGraph;

    #[doc(inline)]
    pub use crate::dfg::directly_follows_statistics::DirectlyFollowsStatistics;
}

///
/// Process trees
///
pub mod process_tree {
    /// [`ProcessTree`] struct and nodes
    pub mod process_tree_struct;

    #[doc(inline)]
    pub use crate::process_tree::process_tree_struct::ProcessTree;
}

///
/// Structural and behavioral comparison of process trees
///
pub mod comparison {
    /// Behavioral profiles and their similarity
    pub mod behavioral_profile;
    /// [`ProcessTreeComparator`] combining all scores
    pub mod comparator;
    /// Graph-edit similarity
    pub mod graph_edit;
    /// Language precision, recall and F1
    pub mod language;
    /// Random replay of process trees
    pub mod trace_generator;
    /// Tree edit distance
    pub mod tree_edit_distance;

    #[doc(inline)]
    pub use crate::comparison::comparator::ProcessTreeComparator;
}

/// Util module with smaller helper functions
pub mod utils;

#[doc(inline)]
pub use event_log::event_log_struct::EventLog;

#[doc(inline)]
pub use event_log::event_log_splitter::{
    exclusive_split, loop_split, parallel_split, sequence_split, PartitionSplitter, SplitStrategy,
};

#[doc(inline)]
pub use dfg::directly_follows_statistics::{DirectlyFollowsStatistics, StatisticsOptions};

#[doc(inline)]
pub use dfg::dfg_struct::DirectlyFollowsGraph;

#[doc(inline)]
pub use process_tree::process_tree_struct::{
    LeafLabel, Node, OperatorType, ProcessTree, ProcessTreeError, TreeTuple,
};

#[doc(inline)]
pub use comparison::comparator::{
    compare_process_trees, ComparisonOptions, ComparisonResult, ComparisonWeights,
    ProcessTreeComparator,
};

#[doc(inline)]
pub use comparison::trace_generator::{sample_language, sample_traces};
