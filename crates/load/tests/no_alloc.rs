//! The load loop must not touch the heap.
//!
//! Allocations are counted per thread so the test harness's own bookkeeping
//! on other threads does not show up.

use std::{
  alloc::{GlobalAlloc, Layout, System},
  cell::Cell,
};

struct CountingAlloc;

thread_local! {
  static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn allocations() -> usize {
  ALLOCATIONS.with(Cell::get)
}

unsafe impl GlobalAlloc for CountingAlloc {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
    unsafe { System.alloc(layout) }
  }

  unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
    unsafe { System.dealloc(ptr, layout) }
  }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

#[test]
fn run_does_not_allocate() {
  // Detection, env lookup and dispatch caching may allocate once.
  let _ = load::run(1);

  let before = allocations();
  let outcome = load::run(100_000);
  let pinned = load::Workload::new(100_000).with_kernel(load::KernelId::Portable).run();
  let after = allocations();

  assert_eq!(outcome.adds, 100_000);
  assert!(pinned.is_ok());
  assert_eq!(after - before, 0, "load loop allocated {} times", after - before);
}

#[test]
#[cfg_attr(debug_assertions, ignore = "one billion adds; run with --release")]
fn perform_heavy_load_has_no_side_effects() {
  let _ = load::run(1);
  let config = load::config::get();
  let kernel = load::selected_kernel();
  let caps = platform::caps();

  let before = allocations();
  load::perform_heavy_load();
  let after = allocations();

  assert_eq!(after - before, 0, "perform_heavy_load allocated {} times", after - before);
  assert_eq!(load::config::get(), config);
  assert_eq!(load::selected_kernel(), kernel);
  assert_eq!(platform::caps(), caps);
}
