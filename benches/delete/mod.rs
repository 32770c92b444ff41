use criterion::{
    measurement::Measurement, BatchSize, BenchmarkGroup, BenchmarkId, Criterion, Throughput,
};

use crate::{random_tree, Lfsr};

#[derive(Debug, Clone, Copy)]
struct BenchName {
    n_values: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new("n_values", v.n_values)
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("delete");

    for n_values in [1, 100, 1_000, 10_000] {
        bench_param(&mut g, n_values)
    }
}

/// Measure the time needed to delete every value from a tree of `n_values`
/// randomly generated values, in insertion order.
fn bench_param<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    let (t, values) = random_tree(&mut Lfsr::default(), n_values);

    let bench_name = BenchName { n_values };
    g.throughput(Throughput::Elements(n_values as _)); // Keys deleted per second
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter_batched(
            || t.clone(),
            |mut t| {
                for v in &values {
                    t.delete(v).unwrap();
                }
                t
            },
            BatchSize::PerIteration,
        );
    });
}
