//! x86_64 vector kernels.
//!
//! - AVX2: one `vpaddd ymm` per logical add.
//! - SSE2: two `paddd xmm` per logical add (low and high 128-bit halves).
//!
//! Each iteration routes the accumulator through an empty `asm!` block that
//! claims to read and write the register. The block has no `pure` option, so
//! the compiler must keep every iteration and cannot fold the loop.
//!
//! # Safety
//!
//! Uses `unsafe` for x86 SIMD intrinsics. Callers must ensure the required
//! features are available before executing a kernel (the catalogue in
//! `kernels::KernelId` does this).
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::{asm, x86_64::*};

use crate::{INCREMENT, LANES, Lanes};

// ─────────────────────────────────────────────────────────────────────────────
// AVX2 (256-bit)
// ─────────────────────────────────────────────────────────────────────────────

#[inline(never)]
#[target_feature(enable = "avx2")]
unsafe fn add_loop_avx2(initial: Lanes, iterations: u64) -> (Lanes, u64) {
  let src = initial.into_array();
  let mut acc = _mm256_loadu_si256(src.as_ptr().cast());
  let step = _mm256_set1_epi32(INCREMENT as i32);
  let mut adds: u64 = 0;

  for _ in 0..iterations {
    acc = _mm256_add_epi32(acc, step);
    asm!("/* {0} */", inout(ymm_reg) acc, options(nomem, nostack, preserves_flags));
    adds = adds.wrapping_add(1);
  }

  let mut out = [0u32; LANES];
  _mm256_storeu_si256(out.as_mut_ptr().cast(), acc);
  (Lanes::from_array(out), adds)
}

/// Safe wrapper for the AVX2 kernel.
#[inline]
pub(crate) fn add_loop_avx2_safe(initial: Lanes, iterations: u64) -> (Lanes, u64) {
  // SAFETY: the kernel catalogue only hands this out when the hardware reports AVX2.
  unsafe { add_loop_avx2(initial, iterations) }
}

// ─────────────────────────────────────────────────────────────────────────────
// SSE2 (2 × 128-bit)
// ─────────────────────────────────────────────────────────────────────────────

#[inline(never)]
#[target_feature(enable = "sse2")]
unsafe fn add_loop_sse2(initial: Lanes, iterations: u64) -> (Lanes, u64) {
  let src = initial.into_array();
  let mut lo = _mm_loadu_si128(src.as_ptr().cast());
  let mut hi = _mm_loadu_si128(src.as_ptr().add(4).cast());
  let step = _mm_set1_epi32(INCREMENT as i32);
  let mut adds: u64 = 0;

  for _ in 0..iterations {
    lo = _mm_add_epi32(lo, step);
    hi = _mm_add_epi32(hi, step);
    asm!(
      "/* {0} {1} */",
      inout(xmm_reg) lo,
      inout(xmm_reg) hi,
      options(nomem, nostack, preserves_flags)
    );
    adds = adds.wrapping_add(1);
  }

  let mut out = [0u32; LANES];
  _mm_storeu_si128(out.as_mut_ptr().cast(), lo);
  _mm_storeu_si128(out.as_mut_ptr().add(4).cast(), hi);
  (Lanes::from_array(out), adds)
}

/// Safe wrapper for the SSE2 kernel.
#[inline]
pub(crate) fn add_loop_sse2_safe(initial: Lanes, iterations: u64) -> (Lanes, u64) {
  // SAFETY: SSE2 is part of the x86_64 baseline.
  unsafe { add_loop_sse2(initial, iterations) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sse2_matches_closed_form() {
    let start = Lanes::from_array([0, 1, 2, 3, 4, 5, 6, u32::MAX]);
    let (lanes, adds) = add_loop_sse2_safe(start, 257);
    assert_eq!(adds, 257);
    assert_eq!(lanes, start.wrapping_add_splat(INCREMENT, 257));
  }

  #[test]
  fn avx2_matches_closed_form() {
    if !platform::detected_caps().has(platform::caps::x86::AVX2_READY) {
      return;
    }
    let start = Lanes::from_array([u32::MAX, 1, 2, 3, 4, 5, 6, 7]);
    let (lanes, adds) = add_loop_avx2_safe(start, 257);
    assert_eq!(adds, 257);
    assert_eq!(lanes, start.wrapping_add_splat(INCREMENT, 257));
  }
}
