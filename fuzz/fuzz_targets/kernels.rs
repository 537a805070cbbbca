//! Differential fuzzing of the load kernels.
//!
//! Every kernel runnable on this CPU must agree with the closed form for any
//! starting accumulator and (bounded) iteration count.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use load::{INCREMENT, Lanes, Workload, kernels};

/// Keeps each input fast; wraparound is reached through `start`.
const MAX_ITERATIONS: u64 = 1 << 16;

#[derive(Debug, Arbitrary)]
struct Input {
  start: [u32; 8],
  iterations: u64,
}

fuzz_target!(|input: Input| {
  let start = Lanes::from_array(input.start);
  let iterations = input.iterations % MAX_ITERATIONS;
  let expected = start.wrapping_add_splat(INCREMENT, iterations);

  for id in kernels::available(platform::detected_caps()) {
    let outcome = match Workload::new(iterations).with_initial(start).with_kernel(id).run() {
      Ok(outcome) => outcome,
      Err(err) => panic!("{id} listed as available but failed: {err}"),
    };
    assert_eq!(
      outcome.lanes, expected,
      "{id} mismatch: start={start:?}, iterations={iterations}"
    );
    assert_eq!(outcome.adds, iterations, "{id} add count");
  }
});
