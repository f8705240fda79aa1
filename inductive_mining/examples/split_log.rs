use inductive_mining::event_log::filters::filter_events;
use inductive_mining::{DirectlyFollowsStatistics, EventLog, PartitionSplitter, SplitStrategy};
use std::collections::HashSet;
use std::env;
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Filters infrequent activities from a log and splits it along a sequence cut given as
/// `a,b|c,d` (one partition per `|`).
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!(
            "Usage: {} <log.json> <noise_threshold> <partitions, e.g. a,b|c,d>",
            args[0]
        );
        std::process::exit(1);
    }

    let log = EventLog::from_json(&std::fs::read_to_string(&args[1])?)?;
    let threshold: f64 = args[2].parse()?;
    let partitions: Vec<HashSet<String>> = args[3]
        .split('|')
        .map(|p| p.split(',').map(|a| a.trim().to_string()).collect())
        .collect();

    let stats = DirectlyFollowsStatistics::new(&log);
    println!("Activities: {:?}", stats.events);
    println!("Start activities: {:?}", stats.start_nodes);
    println!("End activities: {:?}", stats.end_nodes);
    for activity in &stats.events {
        let (width, height) = stats.calulate_node_size(activity);
        println!(
            "  {activity}: frequency {}, node size {width:.2} x {height:.2}",
            stats.activity_frequency(activity)
        );
    }

    let to_remove = stats.get_events_to_remove(threshold);
    println!("Removing infrequent activities: {:?}", to_remove);
    let filtered = filter_events(&log, &to_remove);

    let splitter = PartitionSplitter::new(&filtered, &partitions);
    if !splitter.check_split_set_validity() {
        println!("Warning: partitions are not disjoint");
    }
    for (i, sublog) in splitter.split(SplitStrategy::Sequence).iter().enumerate() {
        println!("Sublog {i}: {}", sublog.to_json()?);
    }
    Ok(())
}
