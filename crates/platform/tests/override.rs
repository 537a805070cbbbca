//! Capability override behavior.
//!
//! Lives in its own test binary: the override is process-global and would
//! leak into unrelated tests running on other threads.

use platform::{
  Caps,
  caps::{aarch64, x86},
};

#[test]
fn override_replaces_and_restores_detection() {
  let detected = platform::detected_caps();
  assert!(!platform::has_override());

  platform::set_caps_override(Some(Caps::NONE));
  assert!(platform::has_override());
  assert!(platform::caps().is_empty());
  assert!(!platform::dispatch(|caps| caps.has(x86::SSE2)));
  // detection itself is untouched
  assert_eq!(platform::detected_caps(), detected);

  platform::set_caps_override(Some(aarch64::NEON | x86::AVX2));
  assert_eq!(platform::caps(), aarch64::NEON | x86::AVX2);

  platform::set_caps_override(None);
  assert!(!platform::has_override());
  assert_eq!(platform::caps(), detected);
}

