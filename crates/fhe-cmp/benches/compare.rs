use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fhe_cmp::reference::{ReferenceEngine, ReferenceParametersBuilder};
use fhe_cmp::threshold::KeyCombination;
use fhe_cmp::{EvaluationOptions, Evaluator, KeyMaterial, SinglePartyKeys};
use rand::thread_rng;
use std::time::Duration;

pub fn compare_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));
    let mut rng = thread_rng();

    for p in [17u64, 97, 257] {
        let par = ReferenceParametersBuilder::new()
            .set_plaintext_modulus(p)
            .set_slots(1)
            .build_arc()
            .unwrap();
        let keys = SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut rng).unwrap();
        let a = keys.encrypt(&[5]).unwrap();
        let b = keys.encrypt(&[-3]).unwrap();

        for parallel in [false, true] {
            let options = EvaluationOptions::default().with_parallel(parallel);
            let evaluator = Evaluator::with_options(&keys, options).unwrap();
            let suffix = if parallel { "/parallel" } else { "" };

            group.bench_function(BenchmarkId::new(format!("powers{suffix}"), p), |bench| {
                bench.iter(|| evaluator.powers(&a).unwrap());
            });

            group.bench_function(BenchmarkId::new(format!("gt{suffix}"), p), |bench| {
                bench.iter(|| evaluator.gt(&a, &b).unwrap());
            });

            group.bench_function(BenchmarkId::new(format!("max{suffix}"), p), |bench| {
                bench.iter(|| evaluator.max(&a, &b).unwrap());
            });

            group.bench_function(BenchmarkId::new(format!("divide{suffix}"), p), |bench| {
                bench.iter(|| evaluator.divide(&a, 2).unwrap());
            });
        }
    }

    group.finish();
}

pub fn private_division_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("divide_private");
    group.sample_size(10);
    let mut rng = thread_rng();

    for p in [11u64, 17, 31] {
        let par = ReferenceParametersBuilder::new()
            .set_plaintext_modulus(p)
            .set_slots(1)
            .build_arc()
            .unwrap();
        let keys = SinglePartyKeys::generate(ReferenceEngine::new(&par), &mut rng).unwrap();
        let a = keys.encrypt(&[5]).unwrap();
        let d = keys.encrypt(&[-2]).unwrap();
        let options = EvaluationOptions::default().with_parallel(true);
        let evaluator = Evaluator::with_options(&keys, options).unwrap();

        group.bench_function(BenchmarkId::new("divide_private", p), |bench| {
            bench.iter(|| evaluator.divide_private(&a, &d).unwrap());
        });
    }

    group.finish();
}

pub fn key_combination_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_combination");
    let par = ReferenceParametersBuilder::new()
        .set_plaintext_modulus(257)
        .build_arc()
        .unwrap();

    for n in [2usize, 8, 32] {
        group.bench_function(BenchmarkId::new("combine", n), |bench| {
            bench.iter(|| {
                let mut rng = thread_rng();
                let (mut run, lead) =
                    KeyCombination::init(ReferenceEngine::new(&par), &mut rng).unwrap();
                let mut holders = vec![];
                for _ in 1..n {
                    let (next, holder) = run.join(&mut rng).unwrap();
                    run = next;
                    holders.push(holder);
                }
                let mut added = run.accumulate_added(&holders[0], &mut rng).unwrap();
                for holder in &holders[1..] {
                    added = added.accumulate_added(holder, &mut rng).unwrap();
                }
                let seeded = added.seed_final(&lead, &mut rng).unwrap();
                let mut accumulated = seeded.accumulate_final(&holders[0], &mut rng).unwrap();
                for holder in &holders[1..] {
                    accumulated = accumulated.accumulate_final(holder, &mut rng).unwrap();
                }
                accumulated.install().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    compare_benchmark,
    private_division_benchmark,
    key_combination_benchmark
);
criterion_main!(benches);
