//! CPU detection and capabilities for heavyload.
//!
//! This crate is the single source of truth for which vector instructions a
//! kernel may execute on the current machine.
//!
//! # Main Entry Point
//!
//! ```
//! use platform::caps::x86;
//!
//! let caps = platform::caps();
//! if caps.has(x86::AVX2_READY) {
//!   // 256-bit integer adds are available
//! }
//! ```
//!
//! # Design Philosophy
//!
//! 1. **One API**: kernels query `platform::caps()` instead of ad-hoc detection.
//! 2. **Zero-cost when possible**: compile-time features come from `cfg!`.
//! 3. **Cached otherwise**: runtime detection is cached in a `OnceLock`.
//! 4. **Miri-safe**: under Miri, runtime detection reports nothing.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;
pub mod dispatch;

pub use caps::{Arch, Caps};
pub use detect::caps_static;
pub use dispatch::{dispatch, dispatch_auto, dispatch_static};

/// Get detected CPU capabilities.
///
/// With `std` the result is cached after the first call. Without `std` only
/// compile-time features are reported. An override set through
/// [`set_caps_override`] takes precedence.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}

/// Capabilities reported by the hardware, ignoring any override.
#[inline]
#[must_use]
pub fn detected_caps() -> Caps {
  detect::detected()
}

/// Architecture of the compilation target.
#[inline]
#[must_use]
pub const fn arch() -> Arch {
  detect::arch()
}

/// Set or clear the capabilities override.
///
/// While set, [`caps()`] returns the override instead of detecting. Pass
/// `None` to resume detection. Intended for tests and bare-metal targets
/// where the CPU is known at deployment.
///
/// The override is a hint, not a proof: code that executes feature-gated
/// instructions must also check [`detected_caps()`].
///
/// ```
/// use platform::Caps;
///
/// platform::set_caps_override(Some(Caps::NONE));
/// assert!(platform::caps().is_empty());
/// platform::set_caps_override(None);
/// ```
#[inline]
pub fn set_caps_override(value: Option<Caps>) {
  detect::set_caps_override(value);
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
