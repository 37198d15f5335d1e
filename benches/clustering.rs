use criterion::{black_box, criterion_group, criterion_main, Criterion};
use protclump::{
    analyze, ward_linkage, AbundanceTable, AnalysisConfig, CorrelationMatrix, CorrelationMethod,
};
use rand::prelude::*;

/// Proteins driven by one of `groups` latent profiles plus noise.
fn synthetic_table(
    rng: &mut StdRng,
    n_proteins: usize,
    n_samples: usize,
    groups: usize,
) -> AbundanceTable {
    let profiles: Vec<Vec<f64>> = (0..groups)
        .map(|_| (0..n_samples).map(|_| rng.random::<f64>()).collect())
        .collect();

    let mut values = Vec::with_capacity(n_proteins * n_samples);
    for s in 0..n_samples {
        for p in 0..n_proteins {
            let base = profiles[p % groups][s];
            values.push(1e6 * (1.0 + base + 0.1 * rng.random::<f64>()));
        }
    }
    let accessions = (0..n_proteins).map(|i| format!("P{:05}", i)).collect();
    AbundanceTable::new(accessions, values).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    let mut rng = StdRng::seed_from_u64(42);
    let table = synthetic_table(&mut rng, 300, 24, 5);

    group.bench_function("pearson_p300_n24", |b| {
        b.iter(|| {
            CorrelationMatrix::from_table(black_box(&table), CorrelationMethod::Pearson).unwrap()
        })
    });

    let features = CorrelationMatrix::from_table(&table, CorrelationMethod::Pearson)
        .unwrap()
        .feature_vectors();
    group.bench_function("ward_p300", |b| {
        b.iter(|| ward_linkage(black_box(&features)).unwrap())
    });

    group.bench_function("analyze_p300_n24", |b| {
        b.iter(|| analyze(black_box(&table), &AnalysisConfig::default()).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
