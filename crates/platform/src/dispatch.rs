//! Dispatch primitives.
//!
//! - [`dispatch_static`]: compile-time features only (zero overhead)
//! - [`dispatch`]: runtime detection (cached)
//! - [`dispatch_auto`]: static when the widest integer vector is already
//!   guaranteed by the target, runtime otherwise
//!
//! # Usage
//!
//! ```
//! use platform::{caps::x86, dispatch_auto};
//!
//! let lanes = dispatch_auto(|caps| if caps.has(x86::AVX2_READY) { 8 } else { 4 });
//! assert!(lanes == 8 || lanes == 4);
//! ```

use crate::{Caps, detect};

/// Dispatch with compile-time known capabilities only.
///
/// Runtime-detected features are not included; use [`dispatch`] for those.
#[inline(always)]
pub fn dispatch_static<F, R>(f: F) -> R
where
  F: FnOnce(Caps) -> R,
{
  f(detect::caps_static())
}

/// Dispatch with runtime-detected capabilities.
///
/// The first call performs detection; later calls read the cached value.
#[inline]
pub fn dispatch<F, R>(f: F) -> R
where
  F: FnOnce(Caps) -> R,
{
  f(detect::caps())
}

/// Use compile-time dispatch when the top tier is statically known.
///
/// **Top tier**:
/// - x86_64: AVX2
/// - aarch64: NEON (baseline)
#[inline(always)]
pub fn dispatch_auto<F, R>(f: F) -> R
where
  F: FnOnce(Caps) -> R,
{
  if has_static_features() && !detect::has_override() {
    dispatch_static(f)
  } else {
    dispatch(f)
  }
}

/// Returns `true` if [`dispatch_auto`] resolves statically on this target.
#[inline(always)]
#[must_use]
pub const fn has_static_features() -> bool {
  cfg!(any(
    all(target_arch = "x86_64", target_feature = "avx", target_feature = "avx2"),
    all(target_arch = "aarch64", target_feature = "neon")
  ))
}
