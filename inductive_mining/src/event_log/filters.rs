//! Frequency-based filtering of event logs
use std::collections::HashSet;

use super::event_log_struct::{Activity, EventLog, Trace};

///
/// Removes all events with an activity in `events_to_remove` from every trace.
///
/// Traces that become empty are dropped, traces that become equal are merged (their
/// frequencies are summed up).
///
/// # Examples
///
/// ```
/// use inductive_mining::{event_log, event_log::filters::filter_events};
/// use std::collections::HashSet;
///
/// let log = event_log!(["a", "x", "b"] => 2, ["a", "b"] => 1, ["x"] => 4);
/// let to_remove: HashSet<String> = HashSet::from(["x".to_string()]);
///
/// assert_eq!(filter_events(&log, &to_remove), event_log!(["a", "b"] => 3));
/// ```
pub fn filter_events(log: &EventLog, events_to_remove: &HashSet<Activity>) -> EventLog {
    log.traces()
        .filter_map(|(trace, frequency)| {
            let filtered: Trace = trace
                .iter()
                .filter(|a| !events_to_remove.contains(*a))
                .cloned()
                .collect();
            if filtered.is_empty() {
                None
            } else {
                Some((filtered, frequency))
            }
        })
        .collect()
}

///
/// Keeps only traces that have a frequency of at least `min_frequency`.
///
pub fn filter_traces(log: &EventLog, min_frequency: u64) -> EventLog {
    log.traces()
        .filter(|(_, frequency)| *frequency >= min_frequency)
        .map(|(trace, frequency)| (trace.clone(), frequency))
        .collect()
}
