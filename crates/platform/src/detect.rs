//! Runtime CPU detection.
//!
//! This module provides the cached [`caps`] entry point. It handles:
//!
//! - Compile-time detection (via `cfg!(target_feature = "...")`)
//! - Runtime detection (via `is_*_feature_detected!` with `std`)
//! - Caching (via `OnceLock` with `std`; without `std` detection is
//!   compile-time only and needs no cache)
//! - User-supplied overrides for bare metal and testing
//! - Miri fallback (always portable)

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::caps::{Arch, Caps};

// ─────────────────────────────────────────────────────────────────────────────
// Override Support
// ─────────────────────────────────────────────────────────────────────────────
//
// The override takes precedence over detection. It is stored in atomics so the
// same code path works with and without `std`.

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);
static OVERRIDE_BITS: [AtomicU64; 4] = [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)];

fn load_override() -> Option<Caps> {
  if !OVERRIDE_SET.load(Ordering::Acquire) {
    return None;
  }
  Some(Caps([
    OVERRIDE_BITS[0].load(Ordering::Acquire),
    OVERRIDE_BITS[1].load(Ordering::Acquire),
    OVERRIDE_BITS[2].load(Ordering::Acquire),
    OVERRIDE_BITS[3].load(Ordering::Acquire),
  ]))
}

pub(crate) fn set_caps_override(value: Option<Caps>) {
  match value {
    Some(caps) => {
      for (slot, word) in OVERRIDE_BITS.iter().zip(caps.0) {
        slot.store(word, Ordering::Release);
      }
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => OVERRIDE_SET.store(false, Ordering::Release),
  }
}

#[inline]
pub(crate) fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

// ─────────────────────────────────────────────────────────────────────────────
// Public Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Detected capabilities (override first, then cached detection).
#[inline]
pub(crate) fn caps() -> Caps {
  if let Some(caps) = load_override() {
    return caps;
  }
  detected()
}

/// Detected capabilities, ignoring any override.
#[cfg(feature = "std")]
#[inline]
pub(crate) fn detected() -> Caps {
  use std::sync::OnceLock;
  static CACHE: OnceLock<Caps> = OnceLock::new();
  *CACHE.get_or_init(detect_uncached)
}

#[cfg(not(feature = "std"))]
#[inline]
pub(crate) fn detected() -> Caps {
  detect_uncached()
}

#[inline]
pub(crate) const fn arch() -> Arch {
  Arch::current()
}

fn detect_uncached() -> Caps {
  if cfg!(miri) {
    return Caps::NONE;
  }
  caps_static().union(caps_runtime())
}

// ─────────────────────────────────────────────────────────────────────────────
// Compile-time Detection
// ─────────────────────────────────────────────────────────────────────────────

/// Capabilities guaranteed by the compilation target.
///
/// Always a subset of what runtime detection reports on the same machine.
#[must_use]
pub const fn caps_static() -> Caps {
  #[allow(unused_mut)]
  let mut caps = Caps::NONE;

  #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
  {
    use crate::caps::x86;
    if cfg!(target_feature = "sse2") {
      caps = caps.union(x86::SSE2);
    }
    if cfg!(target_feature = "avx") {
      caps = caps.union(x86::AVX);
    }
    if cfg!(target_feature = "avx2") {
      caps = caps.union(x86::AVX2);
    }
  }

  #[cfg(target_arch = "aarch64")]
  {
    use crate::caps::aarch64;
    if cfg!(target_feature = "neon") {
      caps = caps.union(aarch64::NEON);
    }
  }

  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime Detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(all(feature = "std", any(target_arch = "x86_64", target_arch = "x86")))]
fn caps_runtime() -> Caps {
  use crate::caps::x86;

  // `is_x86_feature_detected!` already gates AVX/AVX2 on OSXSAVE + XCR0, so a
  // reported AVX2 bit means the OS saves the upper YMM state.
  let mut caps = Caps::NONE;
  if std::arch::is_x86_feature_detected!("sse2") {
    caps |= x86::SSE2;
  }
  if std::arch::is_x86_feature_detected!("avx") {
    caps |= x86::AVX;
  }
  if std::arch::is_x86_feature_detected!("avx2") {
    caps |= x86::AVX2;
  }
  caps
}

#[cfg(all(feature = "std", target_arch = "aarch64"))]
fn caps_runtime() -> Caps {
  use crate::caps::aarch64;

  if std::arch::is_aarch64_feature_detected!("neon") {
    aarch64::NEON
  } else {
    Caps::NONE
  }
}

#[cfg(not(all(
  feature = "std",
  any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")
)))]
const fn caps_runtime() -> Caps {
  Caps::NONE
}
