//! Kernel vector-width tiers.
//!
//! | Tier | Name | Ops per logical add | Description |
//! |------|------|---------------------|-------------|
//! | 0 | Portable | 8 scalar | Plain `u32` lanes, always available |
//! | 1 | Narrow | 2 | 128-bit vectors (SSE2 / NEON) |
//! | 2 | Wide | 1 | 256-bit vectors (AVX2) |

use core::fmt;

/// Kernel vector-width tier.
///
/// Ordered from always-available to widest. `tier >= KernelTier::Narrow`
/// means the kernel uses vector instructions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum KernelTier {
  /// Scalar lanes. No capability requirements.
  #[default]
  Portable = 0,

  /// Two 128-bit vector ops per 8-lane add.
  Narrow = 1,

  /// One 256-bit vector op per 8-lane add.
  Wide = 2,
}

impl KernelTier {
  /// All tiers in ascending order.
  pub const ALL: [Self; 3] = [Self::Portable, Self::Narrow, Self::Wide];

  /// Human-readable tier name.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Portable => "portable",
      Self::Narrow => "narrow",
      Self::Wide => "wide",
    }
  }

  /// Machine add instructions needed for one 256-bit logical add.
  #[inline]
  #[must_use]
  pub const fn ops_per_logical_add(self) -> u32 {
    match self {
      Self::Portable => 8,
      Self::Narrow => 2,
      Self::Wide => 1,
    }
  }
}

impl fmt::Display for KernelTier {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tier_ordering() {
    assert!(KernelTier::Portable < KernelTier::Narrow);
    assert!(KernelTier::Narrow < KernelTier::Wide);
    assert_eq!(KernelTier::default(), KernelTier::Portable);
  }

  #[test]
  fn ops_per_logical_add() {
    assert_eq!(KernelTier::Portable.ops_per_logical_add(), 8);
    assert_eq!(KernelTier::Narrow.ops_per_logical_add(), 2);
    assert_eq!(KernelTier::Wide.ops_per_logical_add(), 1);
  }

  #[test]
  fn names() {
    for tier in KernelTier::ALL {
      assert!(!tier.name().is_empty());
    }
  }
}
