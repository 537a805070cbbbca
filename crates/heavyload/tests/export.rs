//! The exported entry point and the re-exported API.

use heavyload::{HEAVY_LOAD_ITERATIONS, KernelId, Lanes, PerformHeavyLoad};

#[test]
fn c_abi_signature() {
  let entry: extern "C" fn() = PerformHeavyLoad;
  let _ = entry;
}

#[test]
fn reexports_drive_the_same_dispatcher() {
  let name = heavyload::selected_kernel();
  assert_eq!(heavyload::kernels::selected().name, name);
  assert!(KernelId::from_name(name).is_some());
  assert_eq!(heavyload::run(3).lanes, Lanes::splat(4));
}

#[test]
#[cfg_attr(debug_assertions, ignore = "one billion adds; run with --release")]
fn exported_call_returns() {
  let start = std::time::Instant::now();
  PerformHeavyLoad();
  let elapsed = start.elapsed();
  assert!(elapsed.as_nanos() > 0);
  assert_eq!(HEAVY_LOAD_ITERATIONS, 1_000_000_000);
}
