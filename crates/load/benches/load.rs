//! Kernel throughput benchmarks.
//!
//! Run: `cargo bench -p load`
//!
//! Throughput is reported in lane-ops: one logical add touches 8 lanes.

use core::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use load::{INITIAL, LANES, Workload, kernels};

const ITERATIONS: [u64; 3] = [1 << 10, 1 << 16, 1 << 20];

fn bench_kernels(c: &mut Criterion) {
  let mut group = c.benchmark_group("load/kernels");

  for id in kernels::available(platform::caps()) {
    for iterations in ITERATIONS {
      group.throughput(Throughput::Elements(iterations * LANES as u64));
      let workload = Workload::new(iterations).with_kernel(id);
      group.bench_with_input(BenchmarkId::new(id.name(), iterations), &workload, |b, w| {
        b.iter(|| black_box(w.run()));
      });
    }
  }

  group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("load/dispatch");
  group.throughput(Throughput::Elements(LANES as u64));
  group.bench_function("run/1", |b| b.iter(|| black_box(load::run(black_box(1)))));
  group.bench_function("selected", |b| b.iter(|| black_box(kernels::selected().func)(INITIAL, 1)));
  group.finish();
}

criterion_group!(benches, bench_kernels, bench_dispatch);
criterion_main!(benches);
