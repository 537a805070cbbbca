//! aarch64 NEON kernel: two `add v.4s` per logical add.
//!
//! # Safety
//!
//! Uses `unsafe` for NEON intrinsics. NEON is baseline on AArch64 targets;
//! the catalogue still checks the capability before handing the kernel out.
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::{aarch64::*, asm};

use crate::{INCREMENT, LANES, Lanes};

#[inline(never)]
#[target_feature(enable = "neon")]
unsafe fn add_loop_neon(initial: Lanes, iterations: u64) -> (Lanes, u64) {
  let src = initial.into_array();
  let mut lo = vld1q_u32(src.as_ptr());
  let mut hi = vld1q_u32(src.as_ptr().add(4));
  let step = vdupq_n_u32(INCREMENT);
  let mut adds: u64 = 0;

  for _ in 0..iterations {
    lo = vaddq_u32(lo, step);
    hi = vaddq_u32(hi, step);
    asm!(
      "/* {0:v} {1:v} */",
      inout(vreg) lo,
      inout(vreg) hi,
      options(nomem, nostack, preserves_flags)
    );
    adds = adds.wrapping_add(1);
  }

  let mut out = [0u32; LANES];
  vst1q_u32(out.as_mut_ptr(), lo);
  vst1q_u32(out.as_mut_ptr().add(4), hi);
  (Lanes::from_array(out), adds)
}

/// Safe wrapper for the NEON kernel.
#[inline]
pub(crate) fn add_loop_neon_safe(initial: Lanes, iterations: u64) -> (Lanes, u64) {
  // SAFETY: the kernel catalogue only hands this out when the hardware reports NEON.
  unsafe { add_loop_neon(initial, iterations) }
}
