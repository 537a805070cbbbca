//! Work-volume and result invariants of the load generator.

use std::time::Instant;

use load::{HEAVY_LOAD_ITERATIONS, INITIAL, KernelId, Lanes, Workload, kernels};

const EXPECTED_HEAVY: Lanes = Lanes::splat(1_000_000_001);

#[test]
fn portable_is_always_listed() {
  let available: Vec<_> = kernels::available(platform::caps()).collect();
  assert_eq!(available.last(), Some(&KernelId::Portable));
}

#[test]
fn selected_kernel_is_available() {
  let name = load::selected_kernel();
  let id = KernelId::from_name(name).unwrap();
  assert!(id.is_available(platform::caps()), "{name} selected but not runnable");
}

#[test]
fn adds_equal_iterations_on_every_kernel() {
  for id in kernels::available(platform::detected_caps()) {
    for iterations in [0, 1, 2, 7, 1024, 65_537] {
      let outcome = Workload::new(iterations).with_kernel(id).run().unwrap();
      assert_eq!(outcome.adds, iterations, "kernel {id}");
    }
  }
}

#[test]
fn wraparound_is_silent() {
  let start = Lanes::splat(u32::MAX);
  for id in kernels::available(platform::detected_caps()) {
    let outcome = Workload::new(2).with_initial(start).with_kernel(id).run().unwrap();
    assert_eq!(outcome.lanes, Lanes::splat(1), "kernel {id}");
  }
}

#[test]
#[cfg_attr(debug_assertions, ignore = "one billion adds per kernel; run with --release")]
fn heavy_load_final_lanes_on_every_kernel() {
  for id in kernels::available(platform::detected_caps()) {
    let outcome = Workload::heavy().with_kernel(id).run().unwrap();
    assert_eq!(outcome.adds, HEAVY_LOAD_ITERATIONS, "kernel {id}");
    assert_eq!(outcome.lanes, EXPECTED_HEAVY, "kernel {id}");
  }
  assert_eq!(INITIAL, Lanes::ONES);
}

#[test]
#[cfg_attr(debug_assertions, ignore = "timing is only meaningful with optimizations")]
fn elapsed_time_scales_with_iterations() {
  fn best_of(iterations: u64) -> f64 {
    (0..5)
      .map(|_| {
        let start = Instant::now();
        let outcome = load::run(iterations);
        let elapsed = start.elapsed().as_secs_f64();
        assert_eq!(outcome.adds, iterations);
        elapsed
      })
      .fold(f64::INFINITY, f64::min)
  }

  let short = best_of(20_000_000);
  let long = best_of(80_000_000);
  let ratio = long / short;
  // 4x the work; generous bounds for noisy CI machines.
  assert!((1.5..12.0).contains(&ratio), "ratio {ratio:.2} (short {short:.4}s, long {long:.4}s)");
}
