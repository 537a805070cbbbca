//! Property-based tests for the load kernels.
//!
//! Every kernel runnable on this CPU must agree with the closed form and with
//! every other kernel, for any starting accumulator and iteration count.

use load::{INCREMENT, KernelId, Lanes, Workload, kernels};
use proptest::prelude::*;

fn arb_lanes() -> impl Strategy<Value = Lanes> {
  prop_oneof![
    any::<[u32; 8]>().prop_map(Lanes::from_array),
    (u32::MAX - 64..=u32::MAX).prop_map(Lanes::splat),
  ]
}

fn runnable() -> Vec<KernelId> {
  kernels::available(platform::detected_caps()).collect()
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn kernels_match_closed_form(start in arb_lanes(), iterations in 0u64..20_000) {
    let expected = start.wrapping_add_splat(INCREMENT, iterations);
    for id in runnable() {
      let outcome = Workload::new(iterations).with_initial(start).with_kernel(id).run().unwrap();
      prop_assert_eq!(outcome.lanes, expected, "kernel {}", id);
      prop_assert_eq!(outcome.adds, iterations, "kernel {}", id);
      prop_assert_eq!(outcome.kernel, id.name());
    }
  }

  #[test]
  fn kernels_agree_with_portable(start in arb_lanes(), iterations in 0u64..5_000) {
    let (reference, _) = kernels::portable::add_loop(start, iterations);
    for id in runnable() {
      let outcome = Workload::new(iterations).with_initial(start).with_kernel(id).run().unwrap();
      prop_assert_eq!(outcome.lanes, reference, "kernel {}", id);
    }
  }

  #[test]
  fn runs_compose(start in arb_lanes(), a in 0u64..3_000, b in 0u64..3_000) {
    let first = Workload::new(a).with_initial(start).run().unwrap();
    let second = Workload::new(b).with_initial(first.lanes).run().unwrap();
    let whole = Workload::new(a + b).with_initial(start).run().unwrap();
    prop_assert_eq!(second.lanes, whole.lanes);
    prop_assert_eq!(first.adds + second.adds, whole.adds);
  }
}
