use criterion::{measurement::Measurement, BatchSize, BenchmarkGroup, BenchmarkId, Criterion};
use joinavl::AvlTree;

#[derive(Debug, Clone, Copy)]
struct BenchName {
    n_left: usize,
    n_right: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new(format!("{}_left_values", v.n_left), v.n_right)
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("join");

    // Left tree size
    for n_left in [1_000, 10_000] {
        // Right tree size
        for n_right in [1, 100, 10_000] {
            bench_param(&mut g, n_left, n_right)
        }
    }
}

/// Measure the time needed to join a tree of `n_left` values with a tree of
/// `n_right` greater values.
fn bench_param<M>(g: &mut BenchmarkGroup<'_, M>, n_left: usize, n_right: usize)
where
    M: Measurement,
{
    let mut left = AvlTree::with_capacity(n_left);
    for v in 0..n_left {
        left.insert(v).unwrap();
    }

    let mut right = AvlTree::with_capacity(n_right);
    for v in n_left..n_left + n_right {
        right.insert(v).unwrap();
    }

    let bench_name = BenchName { n_left, n_right };
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter_batched(
            || (left.clone(), right.clone()),
            |(l, r)| AvlTree::join(l, r).unwrap(),
            BatchSize::PerIteration,
        );
    });
}
