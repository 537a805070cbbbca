//! CPU capability representation.
//!
//! [`Caps`] answers one question: "which vector instructions may this process
//! legally execute?" Each bit corresponds to one ISA extension. Bits are
//! architecture-specific but the API is uniform across targets.
//!
//! # Bit Layout
//!
//! - Bits 0-63: x86/x86_64 features
//! - Bits 64-127: aarch64 features
//! - Bits 128-255: reserved

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 256-bit feature bitset.
///
/// `Caps` is `Copy` and can be shared freely across threads.
///
/// # Example
///
/// ```
/// use platform::caps::{Caps, x86};
///
/// let detected = x86::SSE2 | x86::AVX | x86::AVX2;
/// assert!(detected.has(x86::AVX2));
/// assert!(!Caps::NONE.has(x86::AVX2));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) [u64; 4]);

impl Caps {
  /// Empty capability set (no features).
  pub const NONE: Self = Self([0; 4]);

  /// Access the raw underlying words.
  #[cfg(test)]
  #[inline]
  #[must_use]
  pub const fn as_raw(&self) -> &[u64; 4] {
    &self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0[0] & required.0[0]) == required.0[0]
      && (self.0[1] & required.0[1]) == required.0[1]
      && (self.0[2] & required.0[2]) == required.0[2]
      && (self.0[3] & required.0[3]) == required.0[3]
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self([
      self.0[0] | other.0[0],
      self.0[1] | other.0[1],
      self.0[2] | other.0[2],
      self.0[3] | other.0[3],
    ])
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self([
      self.0[0] & other.0[0],
      self.0[1] & other.0[1],
      self.0[2] & other.0[2],
      self.0[3] & other.0[3],
    ])
  }

  /// Features in `self` that are not in `other`.
  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self([
      self.0[0] & !other.0[0],
      self.0[1] & !other.0[1],
      self.0[2] & !other.0[2],
      self.0[3] & !other.0[3],
    ])
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
  }

  /// Count the number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0[0].count_ones() + self.0[1].count_ones() + self.0[2].count_ones() + self.0[3].count_ones()
  }

  /// Create a capability set with a single bit set.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    let bit_in_word = bit % 64;
    let mut bits = [0u64; 4];
    match bit / 64 {
      0 => bits[0] = 1u64 << bit_in_word,
      1 => bits[1] = 1u64 << bit_in_word,
      2 => bits[2] = 1u64 << bit_in_word,
      _ => bits[3] = 1u64 << bit_in_word,
    }
    Self(bits)
  }

  /// Check if a specific bit is set.
  #[inline]
  #[must_use]
  pub const fn has_bit(self, bit: u8) -> bool {
    let word = match bit / 64 {
      0 => self.0[0],
      1 => self.0[1],
      2 => self.0[2],
      _ => self.0[3],
    };
    (word & (1u64 << (bit % 64))) != 0
  }

  /// Iterate over the names of all known features present in this set.
  pub fn names(self) -> impl Iterator<Item = &'static str> {
    FEATURE_NAMES
      .iter()
      .filter(move |(feature, _)| self.has(*feature))
      .map(|&(_, name)| name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_set().entries(self.names()).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture Identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  Arm,
  Riscv64,
  Wasm32,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    #[cfg(target_arch = "x86_64")]
    {
      Self::X86_64
    }
    #[cfg(target_arch = "x86")]
    {
      Self::X86
    }
    #[cfg(target_arch = "aarch64")]
    {
      Self::Aarch64
    }
    #[cfg(target_arch = "arm")]
    {
      Self::Arm
    }
    #[cfg(target_arch = "riscv64")]
    {
      Self::Riscv64
    }
    #[cfg(target_arch = "wasm32")]
    {
      Self::Wasm32
    }
    #[cfg(not(any(
      target_arch = "x86_64",
      target_arch = "x86",
      target_arch = "aarch64",
      target_arch = "arm",
      target_arch = "riscv64",
      target_arch = "wasm32"
    )))]
    {
      Self::Other
    }
  }

  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
      Self::Arm => "arm",
      Self::Riscv64 => "riscv64",
      Self::Wasm32 => "wasm32",
      Self::Other => "other",
    }
  }
}

impl core::fmt::Display for Arch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86/x86_64 Features (bits 0-63)
// ─────────────────────────────────────────────────────────────────────────────

/// x86/x86_64 integer-vector features.
pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const AVX: Caps = Caps::bit(6);
  pub const AVX2: Caps = Caps::bit(7);

  /// 256-bit integer vectors: AVX2 plus the AVX state it depends on.
  pub const AVX2_READY: Caps = AVX.union(AVX2);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 64-127)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 integer-vector features.
pub mod aarch64 {
  use super::Caps;

  /// Advanced SIMD. Baseline on every AArch64 target.
  pub const NEON: Caps = Caps::bit(64);
}

const FEATURE_NAMES: &[(Caps, &str)] = &[
  (x86::SSE2, "sse2"),
  (x86::AVX, "avx"),
  (x86::AVX2, "avx2"),
  (aarch64::NEON, "neon"),
];

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use super::*;

  #[test]
  fn none_has_nothing_but_itself() {
    assert!(Caps::NONE.is_empty());
    assert!(Caps::NONE.has(Caps::NONE));
    assert!(!Caps::NONE.has(x86::SSE2));
  }

  #[test]
  fn bit_lands_in_the_right_word() {
    assert_eq!(Caps::bit(0).as_raw(), &[1, 0, 0, 0]);
    assert_eq!(Caps::bit(64).as_raw(), &[0, 1, 0, 0]);
    assert_eq!(Caps::bit(255).as_raw(), &[0, 0, 0, 1u64 << 63]);
    assert!(Caps::bit(200).has_bit(200));
    assert!(!Caps::bit(200).has_bit(199));
  }

  #[test]
  fn avx2_ready_requires_both_bits() {
    assert!(!x86::AVX2.has(x86::AVX2_READY));
    assert!((x86::AVX | x86::AVX2).has(x86::AVX2_READY));
    assert_eq!(x86::AVX2_READY.count(), 2);
  }

  #[test]
  fn set_operations() {
    let a = x86::SSE2 | x86::AVX;
    let b = x86::AVX | x86::AVX2;
    assert_eq!(a & b, x86::AVX);
    assert_eq!(a.difference(b), x86::SSE2);
    assert_eq!((a | b).count(), 3);

    let mut c = Caps::NONE;
    c |= aarch64::NEON;
    assert!(c.has(aarch64::NEON));
  }

  #[test]
  fn names_follow_bits() {
    let caps = x86::SSE2 | x86::AVX2 | aarch64::NEON;
    let names: Vec<_> = caps.names().collect();
    assert_eq!(names, ["sse2", "avx2", "neon"]);
  }

  #[test]
  fn arch_names() {
    assert_eq!(Arch::X86_64.name(), "x86_64");
    assert_eq!(Arch::default(), Arch::Other);
    #[cfg(target_arch = "x86_64")]
    assert_eq!(Arch::current(), Arch::X86_64);
    #[cfg(target_arch = "aarch64")]
    assert_eq!(Arch::current(), Arch::Aarch64);
  }
}
