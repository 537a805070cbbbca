//! Scalar kernel: eight `u32` lanes, one `wrapping_add` each.
//!
//! Runs everywhere. The accumulator passes through `black_box` every
//! iteration so the loop cannot be folded into a multiply.

use core::hint::black_box;

use crate::{INCREMENT, Lanes};

/// Add `splat(INCREMENT)` to `initial` `iterations` times.
///
/// Returns the final lanes and the number of logical 8-lane adds performed.
#[inline(never)]
pub fn add_loop(initial: Lanes, iterations: u64) -> (Lanes, u64) {
  let mut acc = initial.into_array();
  let mut adds: u64 = 0;

  for _ in 0..iterations {
    for lane in &mut acc {
      *lane = lane.wrapping_add(INCREMENT);
    }
    acc = black_box(acc);
    adds = adds.wrapping_add(1);
  }

  (Lanes::from_array(acc), adds)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_iterations_is_identity() {
    let start = Lanes::from_array([1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(add_loop(start, 0), (start, 0));
  }

  #[test]
  fn counts_every_add() {
    let (lanes, adds) = add_loop(Lanes::splat(1), 1000);
    assert_eq!(adds, 1000);
    assert_eq!(lanes, Lanes::splat(1001));
  }

  #[test]
  fn wraps_silently() {
    let (lanes, _) = add_loop(Lanes::splat(u32::MAX), 1);
    assert_eq!(lanes, Lanes::ZERO);
  }
}
