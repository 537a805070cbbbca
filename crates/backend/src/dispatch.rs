//! Kernel dispatch: selection and caching.
//!
//! - [`Candidate`]: a kernel with capability requirements
//! - [`Selected`]: the result of kernel selection
//! - [`select`]: choose the best kernel from a candidate list
//! - [`Dispatcher`]: caches a selection for the process lifetime
//!
//! # Usage
//!
//! ```
//! use backend::{candidates, dispatch::{Selected, select_or}};
//! use platform::{Caps, caps::x86};
//!
//! type Kernel = fn(u32) -> u32;
//!
//! fn wide(x: u32) -> u32 { x + 1 }
//! fn portable(x: u32) -> u32 { x + 1 }
//!
//! let selected = select_or(
//!   Caps::NONE,
//!   candidates![
//!     "x86_64/avx2" => x86::AVX2_READY => wide as Kernel,
//!     "portable"    => Caps::NONE      => portable as Kernel,
//!   ],
//!   Selected::new("portable", portable as Kernel),
//! );
//! assert_eq!(selected.name, "portable");
//! ```

use platform::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Name for diagnostics (e.g., "x86_64/avx2").
  pub name: &'static str,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  pub func: F,
}

impl<F> Candidate<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  pub name: &'static str,
  pub func: F,
}

impl<F> Selected<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// Select the first candidate whose `requires` is satisfied by `caps`.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: Caps, candidates: &[Candidate<F>]) -> Option<Selected<F>> {
  candidates
    .iter()
    .find(|candidate| caps.has(candidate.requires))
    .map(|candidate| Selected::new(candidate.name, candidate.func))
}

/// Like [`select`], returning `fallback` when nothing matches.
#[inline]
#[must_use]
pub fn select_or<F: Copy>(caps: Caps, candidates: &[Candidate<F>], fallback: Selected<F>) -> Selected<F> {
  select(caps, candidates).unwrap_or(fallback)
}

/// Build a candidate slice: `"name" => requires => func, ...`.
#[macro_export]
macro_rules! candidates {
  ($($name:expr => $requires:expr => $func:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::new($name, $requires, $func)),+]
  };
}

// ─────────────────────────────────────────────────────────────────────────────
// Cached Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Caches the kernel chosen by `selector` on first access.
///
/// Under `std` the selection lives in a `OnceLock`. Without `std` the
/// selector runs on every call; it only reads compile-time capabilities
/// there, so it folds to a constant.
///
/// ```
/// use backend::dispatch::{Dispatcher, Selected};
///
/// fn kernel(x: u64) -> u64 { x * 2 }
/// fn pick() -> Selected<fn(u64) -> u64> { Selected::new("portable", kernel as fn(u64) -> u64) }
///
/// static DISPATCH: Dispatcher<fn(u64) -> u64> = Dispatcher::new(pick);
/// assert_eq!((DISPATCH.get().func)(21), 42);
/// assert_eq!(DISPATCH.backend_name(), "portable");
/// ```
pub struct Dispatcher<F: 'static> {
  #[cfg(feature = "std")]
  inner: std::sync::OnceLock<Selected<F>>,
  selector: fn() -> Selected<F>,
}

impl<F: Copy + 'static> Dispatcher<F> {
  #[must_use]
  pub const fn new(selector: fn() -> Selected<F>) -> Self {
    Self {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock::new(),
      selector,
    }
  }

  /// Get the selected kernel, initializing on first call.
  #[inline]
  #[must_use]
  pub fn get(&self) -> Selected<F> {
    #[cfg(feature = "std")]
    {
      *self.inner.get_or_init(self.selector)
    }

    #[cfg(not(feature = "std"))]
    {
      (self.selector)()
    }
  }

  /// Name of the selected backend.
  #[inline]
  #[must_use]
  pub fn backend_name(&self) -> &'static str {
    self.get().name
  }
}

#[cfg(test)]
mod tests {
  use platform::caps::{aarch64, x86};

  use super::*;

  type Kernel = fn() -> u8;

  fn wide() -> u8 {
    2
  }
  fn narrow() -> u8 {
    1
  }
  fn portable() -> u8 {
    0
  }

  const CANDIDATES: &[Candidate<Kernel>] = candidates![
    "wide" => x86::AVX2_READY => wide as Kernel,
    "narrow" => x86::SSE2 => narrow as Kernel,
    "portable" => Caps::NONE => portable as Kernel,
  ];

  #[test]
  fn picks_first_satisfied() {
    let all = x86::SSE2 | x86::AVX2_READY;
    assert_eq!(select(all, CANDIDATES).map(|s| s.name), Some("wide"));
    assert_eq!(select(x86::SSE2 | x86::AVX2, CANDIDATES).map(|s| s.name), Some("narrow"));
    assert_eq!(select(Caps::NONE, CANDIDATES).map(|s| s.name), Some("portable"));
    assert_eq!(select(aarch64::NEON, CANDIDATES).map(|s| (s.func)()), Some(0));
  }

  #[test]
  fn empty_candidates_use_fallback() {
    assert!(select::<Kernel>(Caps::NONE, &[]).is_none());
    let chosen = select_or::<Kernel>(x86::SSE2, &[], Selected::new("fallback", portable as Kernel));
    assert_eq!(chosen.name, "fallback");
  }

  #[test]
  fn dispatcher_caches_selection() {
    fn pick() -> Selected<Kernel> {
      select_or(x86::SSE2, CANDIDATES, Selected::new("portable", portable as Kernel))
    }
    static DISPATCH: Dispatcher<Kernel> = Dispatcher::new(pick);
    assert_eq!(DISPATCH.backend_name(), "narrow");
    assert_eq!((DISPATCH.get().func)(), 1);
  }
}
