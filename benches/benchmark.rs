use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mrl_quantiles::{Parameters, Summary};

fn bench_add_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_input");

    for &n in &[1_000u64, 10_000, 100_000] {
        let params = Parameters::new(101).max_num_elements(n).build().unwrap();
        group.throughput(Throughput::Elements(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut summary = Summary::new(params);
                for v in 0..n {
                    summary.add_input(black_box(v as i64));
                }
                summary
            });
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for &shards in &[2u64, 4, 8] {
        let params = Parameters::new(101).max_num_elements(100_000).build().unwrap();
        let per_shard = 10_000 / shards;
        let summaries: Vec<Summary<i64>> = (0..shards)
            .map(|shard| {
                let mut summary = Summary::new(params);
                for v in 0..per_shard {
                    summary.add_input((shard * per_shard + v) as i64);
                }
                summary
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(shards), &summaries, |b, summaries| {
            b.iter(|| {
                let mut acc = Summary::new(params);
                for summary in summaries.iter().cloned() {
                    acc.merge(black_box(summary));
                }
                acc
            });
        });
    }

    group.finish();
}

fn bench_extract_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_output");

    for &n in &[1_000u64, 10_000, 100_000] {
        let params = Parameters::new(101).max_num_elements(n).build().unwrap();
        let mut summary = Summary::new(params);
        for v in 0..n {
            summary.add_input(v as i64);
        }

        group.bench_with_input(BenchmarkId::from_parameter(n), &summary, |b, summary| {
            b.iter(|| black_box(summary).extract_output());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add_input, bench_merge, bench_extract_output);
criterion_main!(benches);
