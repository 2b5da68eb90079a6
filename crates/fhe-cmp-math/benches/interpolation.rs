use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fhe_cmp_math::interpolation::InterpolationTable;
use fhe_cmp_math::poly::{evaluate, poly_mul};
use fhe_cmp_math::zq::Modulus;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

pub fn interpolation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolation");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    for p in [17u64, 97, 257] {
        let q = Modulus::new(p).unwrap();

        let table = InterpolationTable::sign(&q);
        group.bench_function(BenchmarkId::new("sign", p), |b| {
            b.iter(|| table.interpolate().unwrap());
        });

        let table = InterpolationTable::equal_zero(&q);
        group.bench_function(BenchmarkId::new("equal_zero", p), |b| {
            b.iter(|| table.interpolate().unwrap());
        });

        let table = InterpolationTable::integer_division(3, &q).unwrap();
        group.bench_function(BenchmarkId::new("integer_division", p), |b| {
            b.iter(|| table.interpolate().unwrap());
        });
    }

    group.finish();
}

pub fn poly_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("poly");
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    for p in [257u64, 65537] {
        let q = Modulus::new(p).unwrap();
        let a = q.random_vec(257, &mut rng);
        let b = q.random_vec(257, &mut rng);

        group.bench_function(BenchmarkId::new("poly_mul", p), |bench| {
            bench.iter(|| poly_mul(&a, &b, &q));
        });

        group.bench_function(BenchmarkId::new("evaluate", p), |bench| {
            bench.iter(|| evaluate(&a, 3, &q));
        });
    }

    group.finish();
}

criterion_group!(benches, interpolation_benchmark, poly_benchmark);
criterion_main!(benches);
