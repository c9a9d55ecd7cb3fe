//! Benchmarks for the Gaussian kernel smoother.
//!
//! Run with: cargo bench --package surface --bench kernel_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use map_common::{BoundingBox, GridSpec, Surface};
use surface::{gaussian_smooth, Bandwidth};

fn make_surface(n: usize) -> Surface {
    let grid = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), n, n);
    let values = (0..n * n)
        .map(|i| ((i % 17) as f64 * 0.3).sin().abs())
        .collect();
    Surface::new(grid, values)
}

fn bench_gaussian_smooth(c: &mut Criterion) {
    let mut group = c.benchmark_group("gaussian_smooth");
    group.sample_size(20);
    for &n in &[128usize, 256, 512] {
        let s = make_surface(n);
        let bw = Bandwidth::default_for(&s.grid);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| gaussian_smooth(black_box(&s), bw))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gaussian_smooth);
criterion_main!(benches);
