//! Runtime configuration: the kernel force override.
//!
//! `HEAVYLOAD_FORCE` is read once per process (under `std`) and cached. A
//! forced kernel the CPU cannot run is clamped back to [`LoadForce::Auto`],
//! so a bad override can never reach an illegal instruction.

use platform::Caps;

use crate::kernels::KernelId;

/// Environment variable holding the force mode.
pub const FORCE_ENV: &str = "HEAVYLOAD_FORCE";

/// Forced kernel selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LoadForce {
  /// Best kernel the CPU supports.
  #[default]
  Auto,
  /// Scalar lanes.
  Portable,
  /// Two 128-bit SSE2 halves (x86_64).
  Sse2,
  /// One 256-bit AVX2 register (x86_64).
  Avx2,
  /// Two 128-bit NEON halves (aarch64).
  Neon,
}

impl LoadForce {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
      Self::Sse2 => "sse2",
      Self::Avx2 => "avx2",
      Self::Neon => "neon",
    }
  }

  /// The kernel this mode pins, or `None` for [`LoadForce::Auto`].
  #[inline]
  #[must_use]
  pub const fn kernel(self) -> Option<KernelId> {
    match self {
      Self::Auto => None,
      Self::Portable => Some(KernelId::Portable),
      Self::Sse2 => Some(KernelId::X86Sse2),
      Self::Avx2 => Some(KernelId::X86Avx2),
      Self::Neon => Some(KernelId::ArmNeon),
    }
  }

  /// Parse a force value. Case-insensitive, surrounding whitespace ignored.
  ///
  /// Returns `None` for empty or unrecognized input.
  ///
  /// ```
  /// use load::config::LoadForce;
  ///
  /// assert_eq!(LoadForce::parse(" AVX2 "), Some(LoadForce::Avx2));
  /// assert_eq!(LoadForce::parse("scalar"), Some(LoadForce::Portable));
  /// assert_eq!(LoadForce::parse("avx512"), None);
  /// ```
  #[must_use]
  pub fn parse(value: &str) -> Option<Self> {
    let value = value.trim();
    if value.is_empty() {
      return None;
    }

    if value.eq_ignore_ascii_case("auto") {
      return Some(Self::Auto);
    }
    if value.eq_ignore_ascii_case("portable") || value.eq_ignore_ascii_case("scalar") {
      return Some(Self::Portable);
    }
    if value.eq_ignore_ascii_case("sse2") {
      return Some(Self::Sse2);
    }
    if value.eq_ignore_ascii_case("avx2") {
      return Some(Self::Avx2);
    }
    if value.eq_ignore_ascii_case("neon") || value.eq_ignore_ascii_case("asimd") {
      return Some(Self::Neon);
    }

    None
  }

  /// Degrade to `Auto` when `caps` cannot run the forced kernel on this CPU.
  #[inline]
  #[must_use]
  pub fn clamp_to(self, caps: Caps) -> Self {
    match self.kernel() {
      Some(id) if !id.is_available(caps) => Self::Auto,
      _ => self,
    }
  }
}

impl core::fmt::Display for LoadForce {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Process-wide load configuration (after applying overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadConfig {
  /// Force mode as requested through the environment.
  pub requested_force: LoadForce,
  /// Force mode clamped to detected CPU capabilities.
  pub effective_force: LoadForce,
}

impl LoadConfig {
  /// Build a configuration from a requested force and the CPU's capabilities.
  #[inline]
  #[must_use]
  pub fn new(requested_force: LoadForce, caps: Caps) -> Self {
    Self {
      requested_force,
      effective_force: requested_force.clamp_to(caps),
    }
  }
}

#[cfg(feature = "std")]
fn requested_force() -> LoadForce {
  std::env::var(FORCE_ENV)
    .ok()
    .and_then(|value| LoadForce::parse(&value))
    .unwrap_or_default()
}

#[cfg(not(feature = "std"))]
fn requested_force() -> LoadForce {
  LoadForce::Auto
}

/// Cached process-wide configuration.
#[inline]
#[must_use]
pub fn get() -> LoadConfig {
  #[cfg(feature = "std")]
  {
    use std::sync::OnceLock;
    static CACHED: OnceLock<LoadConfig> = OnceLock::new();
    *CACHED.get_or_init(|| platform::dispatch_auto(|caps| LoadConfig::new(requested_force(), caps)))
  }

  #[cfg(not(feature = "std"))]
  {
    LoadConfig::new(requested_force(), platform::caps())
  }
}
