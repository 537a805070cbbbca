//! Kernel catalogue and dispatch.
//!
//! Every kernel computes the same thing: add `splat(INCREMENT)` to an 8-lane
//! accumulator once per iteration. They differ in how many machine
//! instructions one logical add costs (see [`KernelTier`]).
//!
//! | Kernel | Tier | Requires |
//! |--------|------|----------|
//! | `x86_64/avx2` | Wide | AVX + AVX2 |
//! | `x86_64/sse2` | Narrow | SSE2 |
//! | `aarch64/neon` | Narrow | NEON |
//! | `portable` | Portable | nothing |

use backend::{
  KernelTier,
  dispatch::{Candidate, Dispatcher, Selected, select_or},
};
use platform::Caps;

use crate::{
  config::{self, LoadForce},
  error::LoadError,
};

pub mod portable;

#[cfg(target_arch = "x86_64")]
mod x86_64;

#[cfg(target_arch = "aarch64")]
mod aarch64;

/// Kernel signature: `(initial lanes, iterations) -> (final lanes, adds performed)`.
pub type LoadFn = fn(crate::Lanes, u64) -> (crate::Lanes, u64);

// ─────────────────────────────────────────────────────────────────────────────
// Catalogue
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies one kernel implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KernelId {
  /// Scalar lanes, all architectures.
  Portable,
  /// Two 128-bit SSE2 halves.
  X86Sse2,
  /// One 256-bit AVX2 register.
  X86Avx2,
  /// Two 128-bit NEON halves.
  ArmNeon,
}

impl KernelId {
  /// All kernels, best first.
  pub const ALL: [Self; 4] = [Self::X86Avx2, Self::X86Sse2, Self::ArmNeon, Self::Portable];

  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Portable => "portable",
      Self::X86Sse2 => "x86_64/sse2",
      Self::X86Avx2 => "x86_64/avx2",
      Self::ArmNeon => "aarch64/neon",
    }
  }

  #[inline]
  #[must_use]
  pub const fn tier(self) -> KernelTier {
    match self {
      Self::Portable => KernelTier::Portable,
      Self::X86Sse2 | Self::ArmNeon => KernelTier::Narrow,
      Self::X86Avx2 => KernelTier::Wide,
    }
  }

  /// Capabilities the kernel needs at runtime.
  #[inline]
  #[must_use]
  pub const fn requires(self) -> Caps {
    match self {
      Self::Portable => Caps::NONE,
      Self::X86Sse2 => platform::caps::x86::SSE2,
      Self::X86Avx2 => platform::caps::x86::AVX2_READY,
      Self::ArmNeon => platform::caps::aarch64::NEON,
    }
  }

  /// Look a kernel up by name.
  ///
  /// Accepts full names (`x86_64/avx2`) and the bare ISA (`avx2`),
  /// case-insensitively. `scalar` is an alias for `portable`.
  #[must_use]
  pub fn from_name(name: &str) -> Option<Self> {
    let name = name.trim();
    Self::ALL.into_iter().find(|id| {
      let full = id.name();
      let short = full.rsplit('/').next().unwrap_or(full);
      name.eq_ignore_ascii_case(full) || name.eq_ignore_ascii_case(short)
    })
    .or_else(|| name.eq_ignore_ascii_case("scalar").then_some(Self::Portable))
  }

  /// Kernel function compiled into this binary, ignoring capabilities.
  #[inline]
  fn compiled(self) -> Option<LoadFn> {
    match self {
      Self::Portable => Some(portable::add_loop as LoadFn),
      #[cfg(target_arch = "x86_64")]
      Self::X86Sse2 => Some(x86_64::add_loop_sse2_safe as LoadFn),
      #[cfg(target_arch = "x86_64")]
      Self::X86Avx2 => Some(x86_64::add_loop_avx2_safe as LoadFn),
      #[cfg(target_arch = "aarch64")]
      Self::ArmNeon => Some(aarch64::add_loop_neon_safe as LoadFn),
      _ => None,
    }
  }

  /// Returns `true` if the kernel is compiled in and `caps` satisfies it
  /// on this CPU.
  #[inline]
  #[must_use]
  pub fn is_available(self, caps: Caps) -> bool {
    self.compiled().is_some() && runnable_caps(caps).has(self.requires())
  }

  /// The kernel function, if it may run under `caps` on this CPU.
  #[inline]
  pub fn resolve(self, caps: Caps) -> Result<LoadFn, LoadError> {
    match self.compiled() {
      Some(func) if runnable_caps(caps).has(self.requires()) => Ok(func),
      _ => Err(LoadError::KernelUnavailable { kernel: self.name() }),
    }
  }
}

impl core::fmt::Display for KernelId {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

impl core::str::FromStr for KernelId {
  type Err = LoadError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_name(s).ok_or(LoadError::UnknownKernel)
  }
}

/// `caps` narrowed to what the hardware reports.
///
/// Every path that hands out a kernel function goes through this, so a
/// capability override can disable kernels but never enable one the CPU
/// lacks.
#[inline]
#[must_use]
pub fn runnable_caps(caps: Caps) -> Caps {
  caps.intersection(platform::detected_caps())
}

/// Kernels runnable under `caps`, best first.
pub fn available(caps: Caps) -> impl Iterator<Item = KernelId> {
  KernelId::ALL.into_iter().filter(move |id| id.is_available(caps))
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

const PORTABLE: Selected<LoadFn> = Selected::new("portable", portable::add_loop as LoadFn);

#[cfg(target_arch = "x86_64")]
const CANDIDATES: &[Candidate<LoadFn>] = backend::candidates![
  "x86_64/avx2" => platform::caps::x86::AVX2_READY => x86_64::add_loop_avx2_safe as LoadFn,
  "x86_64/sse2" => platform::caps::x86::SSE2 => x86_64::add_loop_sse2_safe as LoadFn,
  "portable" => Caps::NONE => portable::add_loop as LoadFn,
];

#[cfg(target_arch = "aarch64")]
const CANDIDATES: &[Candidate<LoadFn>] = backend::candidates![
  "aarch64/neon" => platform::caps::aarch64::NEON => aarch64::add_loop_neon_safe as LoadFn,
  "portable" => Caps::NONE => portable::add_loop as LoadFn,
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const CANDIDATES: &[Candidate<LoadFn>] = backend::candidates![
  "portable" => Caps::NONE => portable::add_loop as LoadFn,
];

/// Choose a kernel for `caps`, honoring `force` when the CPU allows it.
///
/// Never fails: a force the CPU cannot honor falls back to automatic
/// selection, and automatic selection always ends at the portable kernel.
#[must_use]
pub fn select_kernel(caps: Caps, force: LoadForce) -> Selected<LoadFn> {
  if let Some(id) = force.kernel()
    && let Ok(func) = id.resolve(caps)
  {
    return Selected::new(id.name(), func);
  }
  select_or(runnable_caps(caps), CANDIDATES, PORTABLE)
}

fn select_detected() -> Selected<LoadFn> {
  platform::dispatch_auto(|caps| select_kernel(caps, config::get().effective_force))
}

static DISPATCH: Dispatcher<LoadFn> = Dispatcher::new(select_detected);

/// The kernel chosen for this process (cached after the first call).
#[inline]
#[must_use]
pub fn selected() -> Selected<LoadFn> {
  DISPATCH.get()
}

/// `KernelId` of the cached selection.
#[must_use]
pub fn selected_id() -> KernelId {
  let name = DISPATCH.backend_name();
  KernelId::ALL
    .into_iter()
    .find(|id| id.name() == name)
    .unwrap_or(KernelId::Portable)
}
