//! Synthetic SIMD CPU load.
//!
//! [`perform_heavy_load`] adds an all-ones 8-lane, 32-bit vector to an
//! all-ones accumulator one billion times and throws the result away. It has
//! no inputs, no outputs and no error paths; it exists to burn CPU time.
//!
//! # Kernels
//!
//! The work runs on the widest integer vector the CPU offers:
//!
//! | Kernel | Instructions per logical add |
//! |--------|------------------------------|
//! | `x86_64/avx2` | 1 × `vpaddd ymm` |
//! | `x86_64/sse2` | 2 × `paddd xmm` |
//! | `aarch64/neon` | 2 × `add v.4s` |
//! | `portable` | 8 × scalar `add` |
//!
//! Every kernel performs the same number of *logical* adds, so the final lanes
//! are identical everywhere: `1 + 1_000_000_000 (mod 2^32)`.
//!
//! # Instrumented runs
//!
//! ```
//! let outcome = load::run(10_000);
//! assert_eq!(outcome.adds, 10_000);
//! assert_eq!(outcome.lanes, load::Lanes::splat(10_001));
//! ```
//!
//! # Overrides
//!
//! `HEAVYLOAD_FORCE=portable|sse2|avx2|neon` pins a kernel for the process.
//! Unsupported choices fall back to automatic selection.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod config;
mod error;
pub mod kernels;
mod lanes;
mod workload;

use core::hint::black_box;

pub use backend::KernelTier;
pub use config::{LoadConfig, LoadForce};
pub use error::LoadError;
pub use kernels::{KernelId, LoadFn};
pub use lanes::{LANES, Lanes};
pub use workload::{LoadOutcome, Workload};

/// Logical adds performed by [`perform_heavy_load`].
pub const HEAVY_LOAD_ITERATIONS: u64 = 1_000_000_000;

/// Value added to every lane per logical add.
pub const INCREMENT: u32 = 1;

/// Accumulator the heavy load starts from.
pub const INITIAL: Lanes = Lanes::ONES;

/// Burn CPU: one billion 8-lane vector adds on the calling thread.
///
/// Never fails, never allocates, returns nothing.
///
/// The first call in a process reads `HEAVYLOAD_FORCE` and fills the
/// write-once caches for CPU capabilities, the load configuration and the
/// selected kernel. That one-time initialization is the only global state
/// this touches; later calls only read those caches.
#[inline(never)]
pub fn perform_heavy_load() {
  let kernel = kernels::selected();
  let result = (kernel.func)(INITIAL, HEAVY_LOAD_ITERATIONS);
  black_box(result);
}

/// Run `iterations` adds from [`INITIAL`] on the selected kernel.
#[inline]
#[must_use]
pub fn run(iterations: u64) -> LoadOutcome {
  let kernel = kernels::selected();
  let (lanes, adds) = (kernel.func)(INITIAL, iterations);
  LoadOutcome {
    lanes,
    adds,
    kernel: kernel.name,
  }
}

/// Name of the kernel [`perform_heavy_load`] uses in this process.
#[inline]
#[must_use]
pub fn selected_kernel() -> &'static str {
  kernels::selected().name
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn run_uses_the_selected_kernel() {
    let outcome = run(100);
    assert_eq!(outcome.kernel, selected_kernel());
    assert_eq!(outcome.adds, 100);
    assert_eq!(outcome.lanes, INITIAL.wrapping_add_splat(INCREMENT, 100));
  }

  #[test]
  fn heavy_load_expectation() {
    assert_eq!(
      INITIAL.wrapping_add_splat(INCREMENT, HEAVY_LOAD_ITERATIONS),
      Lanes::splat(1_000_000_001)
    );
  }

  #[test]
  #[cfg_attr(debug_assertions, ignore = "one billion adds; run with --release")]
  fn perform_heavy_load_returns() {
    perform_heavy_load();
  }
}
