//! The 256-bit lane accumulator.

use core::fmt;

/// Number of 32-bit lanes in the accumulator.
pub const LANES: usize = 8;

/// An 8-lane, 32-bit integer vector held in plain memory.
///
/// Kernels load it into whatever registers they use (one `__m256i`, two
/// 128-bit halves, or eight scalars) and store the result back. Lane `i` of
/// the array is lane `i` of the vector, low lane first.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(C, align(32))]
pub struct Lanes(pub(crate) [u32; LANES]);

impl Lanes {
  pub const ZERO: Self = Self([0; LANES]);
  pub const ONES: Self = Self([1; LANES]);

  /// All lanes set to `value`.
  #[inline]
  #[must_use]
  pub const fn splat(value: u32) -> Self {
    Self([value; LANES])
  }

  #[inline]
  #[must_use]
  pub const fn from_array(lanes: [u32; LANES]) -> Self {
    Self(lanes)
  }

  #[inline]
  #[must_use]
  pub const fn as_array(&self) -> &[u32; LANES] {
    &self.0
  }

  #[inline]
  #[must_use]
  pub const fn into_array(self) -> [u32; LANES] {
    self.0
  }

  /// Closed form of adding `splat(value)` to `self` `times` times with
  /// wraparound.
  ///
  /// Only `times mod 2^32` matters, so this never needs to loop.
  ///
  /// ```
  /// use load::Lanes;
  ///
  /// let after = Lanes::splat(1).wrapping_add_splat(1, 1_000_000_000);
  /// assert_eq!(after, Lanes::splat(1_000_000_001));
  ///
  /// let wrapped = Lanes::splat(u32::MAX).wrapping_add_splat(1, 2);
  /// assert_eq!(wrapped, Lanes::splat(1));
  /// ```
  #[inline]
  #[must_use]
  pub const fn wrapping_add_splat(self, value: u32, times: u64) -> Self {
    let delta = value.wrapping_mul(times as u32);
    let mut out = self.0;
    let mut i = 0;
    while i < LANES {
      out[i] = out[i].wrapping_add(delta);
      i += 1;
    }
    Self(out)
  }

  /// Returns `true` if every lane holds the same value.
  #[inline]
  #[must_use]
  pub fn is_uniform(&self) -> bool {
    self.0.iter().all(|&lane| lane == self.0[0])
  }
}

impl From<[u32; LANES]> for Lanes {
  #[inline]
  fn from(lanes: [u32; LANES]) -> Self {
    Self(lanes)
  }
}

impl From<Lanes> for [u32; LANES] {
  #[inline]
  fn from(lanes: Lanes) -> Self {
    lanes.0
  }
}

impl fmt::Debug for Lanes {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_uniform() {
      write!(f, "Lanes(splat {})", self.0[0])
    } else {
      f.debug_tuple("Lanes").field(&self.0).finish()
    }
  }
}
