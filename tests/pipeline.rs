use std::collections::{BTreeSet, HashMap};

use protclump::cluster::davies_bouldin;
use protclump::{
    analyze, AbundanceTable, AnalysisConfig, AnnotationSummary, CorrelationMatrix,
    CorrelationMethod, Error, SelectionConfig,
};

fn table(accessions: &[&str], rows: &[&[f64]]) -> AbundanceTable {
    let values = rows.iter().flat_map(|r| r.iter().copied()).collect();
    AbundanceTable::new(accessions.iter().map(|s| s.to_string()).collect(), values).unwrap()
}

/// Three proteins rising across samples, two falling.
fn anti_correlated() -> AbundanceTable {
    table(
        &["P98160", "P08238", "P06733", "O00468-6", "Q15149-4"],
        &[
            &[1.53, 2.93, 3.65, 9.38, 18.2],
            &[1.89, 3.50, 4.29, 8.20, 15.9],
            &[2.19, 3.72, 4.95, 6.17, 12.8],
            &[2.45, 4.23, 5.69, 4.30, 6.4],
            &[2.98, 4.41, 7.68, 3.11, 7.7],
            &[3.27, 5.12, 8.01, 1.02, 2.2],
        ],
    )
}

#[test]
fn two_anti_correlated_groups_select_k2() {
    let config = AnalysisConfig::new().with_selection(SelectionConfig::new().with_range(2, 4));
    let analysis = analyze(&anti_correlated(), &config).unwrap();
    let a = analysis.assignment();

    assert_eq!(a.n_clusters(), 2);
    let mut groups: Vec<Vec<&str>> = a.clusters();
    groups.sort_by_key(|g| std::cmp::Reverse(g.len()));
    assert_eq!(groups[0], vec!["P98160", "P08238", "P06733"]);
    assert_eq!(groups[1], vec!["O00468-6", "Q15149-4"]);

    let ks: Vec<usize> = analysis.scores().iter().map(|s| s.0).collect();
    assert_eq!(ks, vec![2, 3, 4]);
    assert!(a.score() >= 0.0);
    assert!(analysis.scores().iter().all(|&(_, s)| s >= a.score()));
}

#[test]
fn perfectly_correlated_proteins_are_degenerate() {
    // Every column is the first scaled by a power of two.
    let base = [1.0, 3.0, 2.0, 5.0, 4.0];
    let rows: Vec<Vec<f64>> = base.iter().map(|&x| vec![x, 2.0 * x, 4.0 * x, 0.5 * x]).collect();
    let rows: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
    let t = table(&["P1", "P2", "P3", "P4"], &rows);

    let corr = CorrelationMatrix::from_table(&t, CorrelationMethod::Pearson).unwrap();
    for i in 0..4 {
        for j in 0..4 {
            assert!((corr.get(i, j) - 1.0).abs() < 1e-12);
        }
    }

    let features = corr.feature_vectors();
    let tree = protclump::ward_linkage(&features).unwrap();
    let first = tree.cut(2).unwrap();
    let second = protclump::ward_linkage(&features).unwrap().cut(2).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.labels()[0], first.labels()[1]);
    assert_eq!(first.members().iter().map(Vec::len).sum::<usize>(), 4);

    for k in 2..=3 {
        let score = davies_bouldin(&features, tree.cut(k).unwrap().labels()).unwrap();
        assert_eq!(score, f64::INFINITY, "k={k}");
    }

    assert_eq!(
        analyze(&t, &AnalysisConfig::default()).unwrap_err(),
        Error::NoValidCutFound { k_min: 2, k_max: 3 }
    );
}

#[test]
fn zero_variance_protein_is_named() {
    let t = table(
        &["P05067", "P08238", "P06733"],
        &[&[1.0, 7.5, 3.0], &[2.0, 7.5, 1.0], &[3.0, 7.5, 2.0]],
    );
    assert_eq!(
        analyze(&t, &AnalysisConfig::default()).unwrap_err(),
        Error::DegenerateProtein {
            accession: "P08238".to_string()
        }
    );
}

#[test]
fn runs_are_bit_identical() {
    let t = anti_correlated();
    for method in [
        CorrelationMethod::Pearson,
        CorrelationMethod::Spearman,
        CorrelationMethod::Kendall,
    ] {
        let config = AnalysisConfig::new().with_correlation(method);
        let a = analyze(&t, &config).unwrap();
        let b = analyze(&t, &config).unwrap();

        assert_eq!(a.assignment(), b.assignment());
        assert_eq!(a.dendrogram, b.dendrogram);
        let bits = |s: &[(usize, f64)]| {
            s.iter()
                .map(|(k, v)| (*k, v.to_bits()))
                .collect::<Vec<_>>()
        };
        assert_eq!(bits(a.scores()), bits(b.scores()));
    }
}

#[test]
fn insufficient_samples() {
    let t = table(&["P1", "P2", "P3"], &[&[1.0, 2.0, 3.0]]);
    assert_eq!(
        analyze(&t, &AnalysisConfig::default()).unwrap_err(),
        Error::InsufficientSamples { found: 1 }
    );
}

#[test]
fn annotations_follow_clusters() {
    let analysis = analyze(&anti_correlated(), &AnalysisConfig::default()).unwrap();
    let go = |terms: &[&str]| terms.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
    let annotations = HashMap::from([
        ("P98160".to_string(), go(&["GO:0005737", "GO:0006096"])),
        ("P08238".to_string(), go(&["GO:0006096"])),
        ("P06733".to_string(), go(&["GO:0005737", "GO:0000015"])),
        ("O00468-6".to_string(), go(&["GO:0005576", "GO:0005737"])),
        ("Q15149-4".to_string(), go(&["GO:0005576"])),
    ]);

    let summary = AnnotationSummary::compute(analysis.assignment(), &annotations);
    let rising = analysis.assignment().cluster_of("P98160").unwrap();
    let falling = analysis.assignment().cluster_of("Q15149-4").unwrap();
    let clusters = summary.clusters();

    assert_eq!(
        clusters[rising].specific_terms,
        go(&["GO:0000015", "GO:0006096"])
    );
    assert_eq!(clusters[falling].specific_terms, go(&["GO:0005576"]));
    assert!(!clusters[rising].specific_terms.contains("GO:0005737"));
}
