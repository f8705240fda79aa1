//! Splitting Event Logs along a Cut into Multiple Sublogs
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::event_log_struct::{Activity, EventLog, Partition, Trace};

///
/// The process tree operator a cut corresponds to, which determines how traces are
/// distributed over the partitions
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitStrategy {
    /// Exclusive choice cut: every trace goes wholesale to one partition
    Exclusive,
    /// Sequence cut: every trace is cut into consecutive pieces, one per partition
    Sequence,
    /// Parallel cut: every trace is projected onto every partition
    Parallel,
    /// Loop cut: every trace is cut into runs that belong to the same partition
    Loop,
}

/// A `PartitionSplitter` is used to split an event log into one sub event log per
/// partition of a cut.
///
/// Partitions are expected to be disjoint. If an activity is contained in more than
/// one partition, the first partition (in the given order) containing it wins.
/// Events with an activity that is in no partition are dropped.
///
/// Empty traces are never distributed.
///
/// # Examples
///
/// ```
/// use inductive_mining::event_log::event_log_splitter::{PartitionSplitter, SplitStrategy};
/// use inductive_mining::{event_log, partition};
///
/// let log = event_log!([1, 2, 3, 4] => 1, [2, 1, 4, 3] => 1);
/// let partitions = vec![partition!(1, 2), partition!(3, 4)];
///
/// let splitter = PartitionSplitter::new(&log, &partitions);
/// assert!(splitter.check_split_set_validity());
///
/// let sublogs = splitter.split(SplitStrategy::Sequence);
/// assert_eq!(sublogs[0], event_log!([1, 2] => 1, [2, 1] => 1));
/// assert_eq!(sublogs[1], event_log!([3, 4] => 1, [4, 3] => 1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionSplitter<'a> {
    /// The activity sets to split by
    pub partitions: &'a [Partition],
    /// The input event log to be split
    pub event_log: &'a EventLog,
}

impl<'a> PartitionSplitter<'a> {
    ///
    /// Creates a new `PartitionSplitter` for the given event log. The number of sub event
    /// logs obtained is the number of `partitions`.
    ///
    pub fn new(event_log: &'a EventLog, partitions: &'a [Partition]) -> Self {
        Self {
            partitions,
            event_log,
        }
    }

    ///
    /// Checks whether the partitions are pairwise disjoint.
    ///
    pub fn check_split_set_validity(&self) -> bool {
        self.partitions.iter().flatten().all_unique()
    }

    ///
    /// Index of the first partition that contains `activity` (`None` if there is none).
    ///
    pub fn find_activity_set(&self, activity: &str) -> Option<usize> {
        self.partitions.iter().position(|p| p.contains(activity))
    }

    ///
    /// Splits the event log using the given [`SplitStrategy`].
    ///
    pub fn split(&self, strategy: SplitStrategy) -> Vec<EventLog> {
        match strategy {
            SplitStrategy::Exclusive => self.exclusive_split(),
            SplitStrategy::Sequence => self.sequence_split(),
            SplitStrategy::Parallel => self.parallel_split(),
            SplitStrategy::Loop => self.loop_split(),
        }
    }

    fn empty_sublogs(&self) -> Vec<EventLog> {
        vec![EventLog::new(); self.partitions.len()]
    }

    fn non_empty_traces(&self) -> impl Iterator<Item = (&'a Trace, u64)> + 'a {
        self.event_log.traces().filter(|(t, _)| !t.is_empty())
    }

    ///
    /// Assigns every trace to the first partition that contains all of its events.
    ///
    /// Traces that mix activities of several partitions are dropped.
    ///
    pub fn exclusive_split(&self) -> Vec<EventLog> {
        let mut result = self.empty_sublogs();
        for (trace, frequency) in self.non_empty_traces() {
            match self
                .partitions
                .iter()
                .position(|p| trace.iter().all(|e| p.contains(e)))
            {
                Some(pos) => result[pos].add_trace(trace.clone(), frequency),
                None => tracing::trace!(?trace, frequency, "dropping trace not covered by a single partition"),
            }
        }
        result
    }

    ///
    /// Projects every trace onto every partition.
    ///
    /// Each partition receives one (possibly empty) sub-trace per trace, with the
    /// trace's frequency.
    ///
    pub fn parallel_split(&self) -> Vec<EventLog> {
        let mut result = self.empty_sublogs();
        for (trace, frequency) in self.non_empty_traces() {
            let mut sub_traces: Vec<Trace> = vec![Vec::new(); self.partitions.len()];
            for event in trace {
                if let Some(pos) = self.find_activity_set(event) {
                    sub_traces[pos].push(event.clone());
                }
            }
            for (sublog, sub_trace) in result.iter_mut().zip(sub_traces) {
                sublog.add_trace(sub_trace, frequency);
            }
        }
        result
    }

    ///
    /// Cuts every trace into consecutive pieces, in partition order.
    ///
    /// A cursor moves forward through the partitions whenever an event is not in the
    /// current partition. Skipped partitions receive an empty sub-trace. An event that
    /// is in no partition at or after the cursor is dropped and the cursor stays put.
    ///
    pub fn sequence_split(&self) -> Vec<EventLog> {
        let mut result = self.empty_sublogs();
        for (trace, frequency) in self.non_empty_traces() {
            let mut sub_traces: Vec<Trace> = vec![Vec::new(); self.partitions.len()];
            let mut cursor = 0;
            for event in trace {
                match self.partitions[cursor..]
                    .iter()
                    .position(|p| p.contains(event))
                {
                    Some(offset) => {
                        cursor += offset;
                        sub_traces[cursor].push(event.clone());
                    }
                    None => tracing::trace!(event = %event, "dropping event outside of remaining partitions"),
                }
            }
            for (sublog, sub_trace) in result.iter_mut().zip(sub_traces) {
                sublog.add_trace(sub_trace, frequency);
            }
        }
        result
    }

    ///
    /// Cuts every trace into maximal runs of events that belong to the same partition.
    ///
    /// Each run is added to the log of its partition, which is the first partition
    /// containing the run's first event. Repeated runs are merged by equality.
    ///
    pub fn loop_split(&self) -> Vec<EventLog> {
        let mut result = self.empty_sublogs();
        for (trace, frequency) in self.non_empty_traces() {
            let mut current_run: Option<(usize, Trace)> = None;
            for event in trace {
                let continues_run = current_run
                    .as_ref()
                    .is_some_and(|(pos, _)| self.partitions[*pos].contains(event));
                if continues_run {
                    if let Some((_, run)) = current_run.as_mut() {
                        run.push(event.clone());
                    }
                } else {
                    if let Some((pos, run)) = current_run.take() {
                        result[pos].add_trace(run, frequency);
                    }
                    current_run = self.find_activity_set(event).map(|pos| (pos, vec![event.clone()]));
                    if current_run.is_none() {
                        tracing::trace!(event = %event, "dropping event outside of all partitions");
                    }
                }
            }
            if let Some((pos, run)) = current_run {
                result[pos].add_trace(run, frequency);
            }
        }
        result
    }
}

/// Splits `log` along an exclusive choice cut. See [`PartitionSplitter::exclusive_split`].
pub fn exclusive_split(log: &EventLog, partitions: &[Partition]) -> Vec<EventLog> {
    PartitionSplitter::new(log, partitions).exclusive_split()
}

/// Splits `log` along a parallel cut. See [`PartitionSplitter::parallel_split`].
pub fn parallel_split(log: &EventLog, partitions: &[Partition]) -> Vec<EventLog> {
    PartitionSplitter::new(log, partitions).parallel_split()
}

/// Splits `log` along a sequence cut. See [`PartitionSplitter::sequence_split`].
pub fn sequence_split(log: &EventLog, partitions: &[Partition]) -> Vec<EventLog> {
    PartitionSplitter::new(log, partitions).sequence_split()
}

/// Splits `log` along a loop cut. See [`PartitionSplitter::loop_split`].
pub fn loop_split(log: &EventLog, partitions: &[Partition]) -> Vec<EventLog> {
    PartitionSplitter::new(log, partitions).loop_split()
}

/// Sum of all frequencies over a list of sub event logs
pub fn total_frequency(logs: &[EventLog]) -> u64 {
    logs.iter().map(EventLog::total_frequency).sum()
}

/// All activities contained in any of the partitions
pub fn partitioned_activities(partitions: &[Partition]) -> Vec<&Activity> {
    partitions.iter().flatten().unique().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_log, partition};
    use proptest::prelude::*;

    #[test]
    fn exclusive_split_two_partitions() {
        let log = event_log!([1, 2] => 2, [3, 4] => 1);
        let partitions = vec![partition!(1, 2), partition!(3, 4)];

        let split_logs = exclusive_split(&log, &partitions);
        assert_eq!(
            split_logs,
            vec![event_log!([1, 2] => 2), event_log!([3, 4] => 1)]
        );
    }

    #[test]
    fn exclusive_split_drops_mixed_and_empty_traces() {
        let log = event_log!([1, 2] => 2, [1, 3] => 5, [] => 4, [3] => 1);
        let partitions = vec![partition!(1, 2), partition!(3)];

        let split_logs = exclusive_split(&log, &partitions);
        assert_eq!(split_logs, vec![event_log!([1, 2] => 2), event_log!([3] => 1)]);
        assert_eq!(total_frequency(&split_logs), 3);
    }

    #[test]
    fn parallel_split_two_partitions_of_size_one() {
        let log = event_log!([1, 2] => 2, [2, 1] => 4);
        let partitions = vec![partition!(1), partition!(2)];

        let split_logs = parallel_split(&log, &partitions);
        assert_eq!(split_logs, vec![event_log!([1] => 6), event_log!([2] => 6)]);
    }

    #[test]
    fn parallel_split_records_empty_projections() {
        let log = event_log!([1, 1] => 1, [1, 2] => 2);
        let partitions = vec![partition!(1), partition!(2)];

        let split_logs = parallel_split(&log, &partitions);
        assert_eq!(
            split_logs,
            vec![
                event_log!([1, 1] => 1, [1] => 2),
                event_log!([] => 1, [2] => 2)
            ]
        );
    }

    #[test]
    fn sequence_split_two_partitions() {
        let log = event_log!([1, 2, 3, 4] => 1, [2, 1, 4, 3] => 1);
        let partitions = vec![partition!(1, 2), partition!(3, 4)];

        let split_logs = sequence_split(&log, &partitions);
        assert_eq!(
            split_logs,
            vec![
                event_log!([1, 2] => 1, [2, 1] => 1),
                event_log!([3, 4] => 1, [4, 3] => 1)
            ]
        );
    }

    #[test]
    fn sequence_split_when_partition_is_skipped() {
        let log = event_log!([1, 2, 3, 4] => 1, [1, 3, 2, 4] => 1, [1, 4] => 3);
        let partitions = vec![partition!(1), partition!(2, 3), partition!(4)];

        let split_logs = sequence_split(&log, &partitions);
        assert_eq!(
            split_logs,
            vec![
                event_log!([1] => 5),
                event_log!([2, 3] => 1, [3, 2] => 1, [] => 3),
                event_log!([4] => 5)
            ]
        );
    }

    #[test]
    fn sequence_split_drops_unknown_events_without_moving_the_cursor() {
        let log = event_log!([1, 9, 1, 2] => 1);
        let partitions = vec![partition!(1), partition!(2)];

        let split_logs = sequence_split(&log, &partitions);
        assert_eq!(split_logs, vec![event_log!([1, 1] => 1), event_log!([2] => 1)]);
    }

    #[test]
    fn sequence_split_drops_events_of_earlier_partitions() {
        let log = event_log!([1, 2, 1] => 1);
        let partitions = vec![partition!(1), partition!(2)];

        let split_logs = sequence_split(&log, &partitions);
        assert_eq!(split_logs, vec![event_log!([1] => 1), event_log!([2] => 1)]);
    }

    #[test]
    fn loop_split_two_partitions_of_size_one() {
        let log = event_log!([1, 2, 1] => 2);
        let partitions = vec![partition!(1), partition!(2)];

        let split_logs = loop_split(&log, &partitions);
        assert_eq!(split_logs, vec![event_log!([1] => 4), event_log!([2] => 2)]);
    }

    #[test]
    fn loop_split_more_than_two_partitions() {
        let log = event_log!(
            [1, 2, 1, 3, 1, 2, 1] => 1,
            [1] => 1,
            [1, 2, 1] => 1,
            [1, 3, 1] => 1,
        );
        let partitions = vec![partition!(1), partition!(2), partition!(3)];

        let split_logs = loop_split(&log, &partitions);
        assert_eq!(
            split_logs,
            vec![event_log!([1] => 9), event_log!([2] => 3), event_log!([3] => 2)]
        );
    }

    #[test]
    fn loop_split_partitions_with_more_than_one_element() {
        let log = event_log!(
            [1, 2, 3, 4, 5, 6, 1, 2, 3] => 1,
            [1, 2, 3, 7, 8, 1, 3] => 1,
            [1, 3, 5, 4, 6, 1, 2, 3, 7, 8, 1, 3] => 1,
        );
        let partitions = vec![partition!(1, 2, 3), partition!(4, 5, 6), partition!(7, 8)];

        let split_logs = loop_split(&log, &partitions);
        assert_eq!(
            split_logs,
            vec![
                event_log!([1, 2, 3] => 4, [1, 3] => 3),
                event_log!([4, 5, 6] => 1, [5, 4, 6] => 1),
                event_log!([7, 8] => 2)
            ]
        );
    }

    #[test]
    fn loop_split_unknown_events_end_the_run() {
        let log = event_log!([1, 1, 9, 1] => 1, [9] => 3);
        let partitions = vec![partition!(1), partition!(2)];

        let split_logs = loop_split(&log, &partitions);
        assert_eq!(
            split_logs,
            vec![event_log!([1, 1] => 1, [1] => 1), EventLog::new()]
        );
    }

    #[test]
    fn overlapping_partitions_first_match_wins() {
        let log = event_log!([1, 2] => 1);
        let partitions = vec![partition!(1, 2), partition!(2)];
        let splitter = PartitionSplitter::new(&log, &partitions);

        assert!(!splitter.check_split_set_validity());
        assert_eq!(splitter.find_activity_set("2"), Some(0));
        assert_eq!(splitter.find_activity_set("3"), None);
        assert_eq!(
            splitter.split(SplitStrategy::Parallel),
            vec![event_log!([1, 2] => 1), event_log!([] => 1)]
        );
        assert_eq!(
            splitter.split(SplitStrategy::Exclusive),
            vec![event_log!([1, 2] => 1), EventLog::new()]
        );
    }

    #[test]
    fn empty_log_and_empty_partitions() {
        let log = event_log!([] => 3);
        let partitions = vec![partition!(1)];
        for strategy in [
            SplitStrategy::Exclusive,
            SplitStrategy::Sequence,
            SplitStrategy::Parallel,
            SplitStrategy::Loop,
        ] {
            assert_eq!(
                PartitionSplitter::new(&log, &partitions).split(strategy),
                vec![EventLog::new()]
            );
            assert!(PartitionSplitter::new(&log, &[]).split(strategy).is_empty());
        }
        assert_eq!(partitioned_activities(&partitions), vec!["1"]);
    }

    fn disjoint_log_and_partitions() -> impl Strategy<Value = (EventLog, Vec<Partition>)> {
        let traces = prop::collection::vec(
            (prop::collection::vec(0u8..6, 0..8), 1u64..20),
            0..12,
        );
        (traces, 1usize..4).prop_map(|(traces, num_partitions)| {
            let mut partitions = vec![Partition::new(); num_partitions];
            for activity in 0u8..6 {
                partitions[activity as usize % num_partitions].insert(activity.to_string());
            }
            let log: EventLog = traces
                .into_iter()
                .map(|(t, f)| (t.into_iter().map(|a| a.to_string()).collect(), f))
                .collect();
            (log, partitions)
        })
    }

    proptest! {
        #[test]
        fn exclusive_split_preserves_frequency_of_covered_traces(
            (log, partitions) in disjoint_log_and_partitions()
        ) {
            let splitter = PartitionSplitter::new(&log, &partitions);
            let covered: u64 = log
                .traces()
                .filter(|(t, _)| !t.is_empty())
                .filter(|(t, _)| partitions.iter().any(|p| t.iter().all(|e| p.contains(e))))
                .map(|(_, f)| f)
                .sum();
            prop_assert_eq!(total_frequency(&splitter.exclusive_split()), covered);
        }

        #[test]
        fn parallel_and_sequence_split_preserve_frequency_per_partition(
            (log, partitions) in disjoint_log_and_partitions()
        ) {
            let non_empty: u64 = log
                .traces()
                .filter(|(t, _)| !t.is_empty())
                .map(|(_, f)| f)
                .sum();
            for sublog in parallel_split(&log, &partitions)
                .iter()
                .chain(sequence_split(&log, &partitions).iter())
            {
                prop_assert_eq!(sublog.total_frequency(), non_empty);
            }
        }

        #[test]
        fn loop_split_preserves_event_counts(
            (log, partitions) in disjoint_log_and_partitions()
        ) {
            let events: u64 = log.traces().map(|(t, f)| t.len() as u64 * f).sum();
            let split_events: u64 = loop_split(&log, &partitions)
                .iter()
                .flat_map(|l| l.traces().map(|(t, f)| t.len() as u64 * f).collect::<Vec<_>>())
                .sum();
            prop_assert_eq!(split_events, events);
        }
    }
}
