use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Activity label of an event
pub type Activity = String;

/// A trace: the ordered activity labels of one recorded process execution
pub type Trace = Vec<Activity>;

/// A set of activities that a log is split on
pub type Partition = HashSet<Activity>;

///
/// Event log as a multiset of traces
///
/// Every distinct [`Trace`] is stored once together with its frequency (the number of
/// cases that followed exactly this trace). Frequencies are always at least 1.
///
/// Traces are kept in the order they were first added so that all derived orders
/// (e.g., the first-seen order of activities) are deterministic. Equality does not
/// depend on this order.
///
/// Serialized as a list of `[trace, frequency]` pairs.
///
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(Trace, u64)>", into = "Vec<(Trace, u64)>")]
pub struct EventLog {
    traces: Vec<(Trace, u64)>,
    trace_positions: HashMap<Trace, usize>,
}

impl EventLog {
    /// Create a new empty [`EventLog`]
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Add a trace with the given frequency
    ///
    /// If the trace is already contained, the frequency is added to the existing one.
    /// A frequency of `0` leaves the log unchanged.
    ///
    pub fn add_trace(&mut self, trace: Trace, frequency: u64) {
        if frequency == 0 {
            return;
        }
        match self.trace_positions.get(&trace) {
            Some(&pos) => self.traces[pos].1 += frequency,
            None => {
                self.trace_positions.insert(trace.clone(), self.traces.len());
                self.traces.push((trace, frequency));
            }
        }
    }

    ///
    /// Build an [`EventLog`] from single trace occurrences
    ///
    /// Every occurrence counts with frequency 1, so repeated traces are aggregated.
    ///
    pub fn from_traces<I: IntoIterator<Item = Trace>>(traces: I) -> Self {
        traces.into_iter().map(|t| (t, 1)).collect()
    }

    /// Iterate over all distinct traces and their frequencies (in insertion order)
    pub fn traces(&self) -> impl Iterator<Item = (&Trace, u64)> + '_ {
        self.traces.iter().map(|(t, f)| (t, *f))
    }

    /// Frequency of a trace (`0` if the trace is not part of the log)
    pub fn frequency_of(&self, trace: &[Activity]) -> u64 {
        self.trace_positions
            .get(trace)
            .map(|&pos| self.traces[pos].1)
            .unwrap_or(0)
    }

    /// Returns `true` if the trace occurs in the log
    pub fn contains_trace(&self, trace: &[Activity]) -> bool {
        self.trace_positions.contains_key(trace)
    }

    /// Number of distinct traces
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Returns `true` if the log has no traces
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Sum of all trace frequencies (i.e., the number of cases)
    pub fn total_frequency(&self) -> u64 {
        self.traces.iter().map(|(_, f)| f).sum()
    }

    /// Highest frequency of any trace (`None` for an empty log)
    pub fn max_trace_frequency(&self) -> Option<u64> {
        self.traces.iter().map(|(_, f)| *f).max()
    }

    /// All distinct activities in the order they first appear in the log
    pub fn activities(&self) -> Vec<Activity> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.traces
            .iter()
            .flat_map(|(t, _)| t.iter())
            .filter(|a| seen.insert(a.as_str()))
            .cloned()
            .collect()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string (a list of `[trace, frequency]` pairs)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl PartialEq for EventLog {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .traces
                .iter()
                .all(|(t, f)| other.frequency_of(t) == *f)
    }
}

impl Eq for EventLog {}

impl FromIterator<(Trace, u64)> for EventLog {
    fn from_iter<I: IntoIterator<Item = (Trace, u64)>>(iter: I) -> Self {
        let mut log = EventLog::new();
        log.extend(iter);
        log
    }
}

impl Extend<(Trace, u64)> for EventLog {
    fn extend<I: IntoIterator<Item = (Trace, u64)>>(&mut self, iter: I) {
        for (trace, frequency) in iter {
            self.add_trace(trace, frequency);
        }
    }
}

impl From<Vec<(Trace, u64)>> for EventLog {
    fn from(value: Vec<(Trace, u64)>) -> Self {
        value.into_iter().collect()
    }
}

impl From<EventLog> for Vec<(Trace, u64)> {
    fn from(value: EventLog) -> Self {
        value.traces
    }
}
