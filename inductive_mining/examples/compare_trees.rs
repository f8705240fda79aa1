use inductive_mining::{ComparisonOptions, ProcessTree, ProcessTreeComparator};
use std::env;
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 && args.len() != 4 {
        eprintln!(
            "Usage: {} <tree_1.json> <tree_2.json> [seed]\n\
             Trees are given in tuple form, e.g. [\"seq\", \"a\", [\"xor\", \"b\", \"tau\"]]",
            args[0]
        );
        std::process::exit(1);
    }

    let tree_1 = ProcessTree::from_json(&std::fs::read_to_string(&args[1])?)?;
    let tree_2 = ProcessTree::from_json(&std::fs::read_to_string(&args[2])?)?;
    let seed: u64 = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(42);

    println!("Tree 1: {tree_1}");
    println!("Tree 2: {tree_2}");
    if !tree_1.is_valid() || !tree_2.is_valid() {
        println!("Warning: at least one tree has operators with too few children");
    }

    let comparator = ProcessTreeComparator::new(ComparisonOptions::default());
    let result = comparator.compare_seeded(&tree_1, &tree_2, seed);

    println!("Tree edit distance:      {}", result.tree_edit_distance);
    println!("Normalized edit distance: {:.3}", result.normalized_ted);
    println!("Behavioral similarity:   {:.3}", result.behavioral_similarity);
    println!("Graph-edit similarity:   {:.3}", result.graph_edit_similarity);
    println!(
        "Language P/R/F1:         {:.3} / {:.3} / {:.3}",
        result.language_precision, result.language_recall, result.language_f1
    );
    println!("Combined score:          {:.3}", result.combined_score);
    println!("{}", result.to_json()?);
    Ok(())
}
