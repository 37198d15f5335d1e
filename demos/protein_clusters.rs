//! Cluster a small abundance table and report cluster-specific GO terms.
//!
//! Run with `RUST_LOG=debug cargo run --example protein_clusters` to see the
//! per-stage log output.

use std::collections::{BTreeSet, HashMap};

use protclump::{analyze, AbundanceTable, AnalysisConfig, AnnotationSummary, SelectionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Six samples; the first three proteins rise, the last two fall.
    let accessions: Vec<String> = ["P98160", "P08238", "P06733", "O00468-6", "Q15149-4"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let table = AbundanceTable::new(
        accessions,
        vec![
            1.53e9, 2.93e9, 3.65e9, 9.38e9, 1.82e10, //
            1.89e9, 3.50e9, 4.29e9, 8.20e9, 1.59e10, //
            2.19e9, 3.72e9, 4.95e9, 6.17e9, 1.28e10, //
            2.45e9, 4.23e9, 5.69e9, 4.30e9, 6.40e9, //
            2.98e9, 4.41e9, 7.68e9, 3.11e9, 7.70e9, //
            3.27e9, 5.12e9, 8.01e9, 1.02e9, 2.20e9, //
        ],
    )?;

    let config = AnalysisConfig::new().with_selection(SelectionConfig::new().with_range(2, 4));
    let analysis = analyze(&table, &config)?;

    println!("=== Davies-Bouldin by cluster count (lower is better) ===");
    for &(k, score) in analysis.scores() {
        println!("  k={k}: {score:.4}");
    }

    let assignment = analysis.assignment();
    println!("\n=== Selected k={} ===", assignment.n_clusters());
    for (accession, cluster) in assignment.iter() {
        println!("  {accession:>10} => cluster {cluster}");
    }

    let go = |terms: &[&str]| terms.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
    let annotations = HashMap::from([
        ("P98160".to_string(), go(&["GO:0005737", "GO:0006096"])),
        ("P08238".to_string(), go(&["GO:0006096", "GO:0006457"])),
        ("P06733".to_string(), go(&["GO:0005737", "GO:0000015"])),
        ("O00468-6".to_string(), go(&["GO:0005576", "GO:0005737"])),
        ("Q15149-4".to_string(), go(&["GO:0005576", "GO:0005856"])),
    ]);

    let summary = AnnotationSummary::compute(assignment, &annotations);
    println!("\n=== Cluster-specific GO terms ===");
    for cluster in summary.clusters() {
        println!(
            "  cluster {} ({} proteins): {} specific of {} terms",
            cluster.cluster,
            cluster.proteins.len(),
            cluster.specific_terms.len(),
            cluster.terms.len()
        );
        for (count, proteins) in cluster.count_histogram() {
            println!("    {proteins} protein(s) carry {count} specific term(s)");
        }
    }

    Ok(())
}
