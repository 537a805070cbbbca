//! Synthetic SIMD CPU load.
//!
//! `heavyload` burns CPU time on the calling thread: one billion 8-lane,
//! 32-bit vector adds on the widest integer vector the CPU offers, result
//! discarded.
//!
//! # Quick Start
//!
//! ```no_run
//! heavyload::perform_heavy_load();
//! ```
//!
//! From C, link the `cdylib` or `staticlib` and call:
//!
//! ```c
//! void PerformHeavyLoad(void);
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | Yes | Runtime CPU detection and the `HEAVYLOAD_FORCE` override |
//!
//! Without `std`, kernel selection uses compile-time target features only.
//!
//! # Diagnostics
//!
//! ```
//! let outcome = heavyload::run(1_000);
//! assert_eq!(outcome.adds, 1_000);
//! println!("kernel: {}", heavyload::selected_kernel());
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(feature = "std"), no_std)]

pub use load::{
  HEAVY_LOAD_ITERATIONS, INCREMENT, INITIAL, KernelId, KernelTier, LANES, Lanes, LoadConfig, LoadError, LoadFn,
  LoadForce, LoadOutcome, Workload, config, kernels, perform_heavy_load, run, selected_kernel,
};
pub use platform;

/// C ABI entry point: `void PerformHeavyLoad(void)`.
///
/// Performs exactly one billion vector adds and returns. Takes nothing,
/// returns nothing, never fails.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "C" fn PerformHeavyLoad() {
  load::perform_heavy_load();
}
