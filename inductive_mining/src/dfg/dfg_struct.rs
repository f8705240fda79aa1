use crate::event_log::{Activity, EventLog};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::collections::{HashMap, HashSet};

///
/// Frequency-annotated directly-follows graph of an [`EventLog`]
///
/// Nodes carry the number of occurrences of their activity, arcs the number of times one
/// activity is immediately followed by another. Start and end activities are kept as
/// plain sets, there are no artificial start or end nodes.
///
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectlyFollowsGraph {
    /// Occurrences per activity
    pub activities: HashMap<Activity, u64>,
    /// Frequency per `(from, to)` arc, serialized as a list of `[[from, to], frequency]`
    #[serde_as(as = "Vec<(_, _)>")]
    pub directly_follows_relations: HashMap<(Activity, Activity), u64>,
    /// Activities some trace starts with
    pub start_activities: HashSet<Activity>,
    /// Activities some trace ends with
    pub end_activities: HashSet<Activity>,
}

impl DirectlyFollowsGraph {
    /// Empty graph
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Counts activities and arcs of a weighted log
    ///
    /// Each trace contributes its frequency to every activity occurrence and every
    /// directly-follows pair it contains. Empty traces contribute nothing.
    ///
    pub fn create_from_log(event_log: &EventLog) -> Self {
        let mut result = Self::new();
        for (trace, frequency) in event_log.traces() {
            for activity in trace {
                result.add_activity(activity.clone(), frequency);
            }
            for (from, to) in trace.iter().tuple_windows() {
                result.add_df_relation(from.clone(), to.clone(), frequency);
            }
            if let (Some(first), Some(last)) = (trace.first(), trace.last()) {
                result.start_activities.insert(first.clone());
                result.end_activities.insert(last.clone());
            }
        }
        result
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Adds `frequency` occurrences of `activity`
    pub fn add_activity(&mut self, activity: Activity, frequency: u64) {
        *self.activities.entry(activity).or_default() += frequency;
    }

    /// Marks `activity` as a start activity
    pub fn add_start_activity(&mut self, activity: Activity) {
        self.start_activities.insert(activity);
    }

    /// Marks `activity` as an end activity
    pub fn add_end_activity(&mut self, activity: Activity) {
        self.end_activities.insert(activity);
    }

    /// Adds `frequency` to the arc `from -> to`
    pub fn add_df_relation(&mut self, from: Activity, to: Activity, frequency: u64) {
        *self
            .directly_follows_relations
            .entry((from, to))
            .or_default() += frequency;
    }

    /// Frequency of the arc `from -> to` (`0` if absent)
    pub fn df_frequency(&self, from: &str, to: &str) -> u64 {
        self.directly_follows_relations
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Whether the arc `from -> to` occurs at all
    pub fn contains_df_relation(&self, from: &str, to: &str) -> bool {
        self.df_frequency(from, to) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log;
    use crate::utils::test_utils::get_test_data_path;

    #[test]
    fn dfg_from_weighted_log() {
        let log = event_log!(
            ["A", "B", "C"] => 10,
            ["A", "C", "B"] => 5,
            ["A", "B"] => 3,
            [] => 2,
        );
        let graph = DirectlyFollowsGraph::create_from_log(&log);

        assert_eq!(graph.activities.get("A"), Some(&18));
        assert_eq!(graph.activities.get("C"), Some(&15));
        assert_eq!(graph.df_frequency("A", "B"), 13);
        assert_eq!(graph.df_frequency("C", "B"), 5);
        assert_eq!(graph.df_frequency("B", "A"), 0);
        assert_eq!(graph.directly_follows_relations.len(), 4);
        assert_eq!(
            graph.start_activities,
            HashSet::from(["A".to_string()])
        );
        assert_eq!(
            graph.end_activities,
            HashSet::from(["B".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn dfg_from_loop_log() {
        let path = get_test_data_path().join("logs").join("loop_example.json");
        let log = EventLog::from_json(&std::fs::read_to_string(path).unwrap()).unwrap();
        let graph = DirectlyFollowsGraph::create_from_log(&log);

        assert_eq!(graph.activities.len(), 4);
        assert!(graph.contains_df_relation("b", "b"));
        assert!(graph.contains_df_relation("c", "b"));
        assert!(!graph.contains_df_relation("d", "a"));
        assert_eq!(graph.df_frequency("b", "c"), 6);
    }

    #[test]
    fn json_lists_arcs_as_pairs() {
        let mut graph = DirectlyFollowsGraph::new();
        graph.add_activity("register".into(), 4);
        graph.add_activity("approve".into(), 3);
        graph.add_df_relation("register".into(), "approve".into(), 3);
        graph.add_start_activity("register".into());
        graph.add_end_activity("approve".into());
        graph.add_end_activity("register".into());

        let json = graph.to_json().unwrap();
        assert!(json.contains(r#"[["register","approve"],3]"#));
        assert_eq!(DirectlyFollowsGraph::from_json(&json).unwrap(), graph);
        assert!(DirectlyFollowsGraph::from_json(r#"{"activities": {}}"#).is_err());
    }
}
